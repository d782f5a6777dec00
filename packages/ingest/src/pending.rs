//! The pending-reprocessing queue.
//!
//! Solutions written under a temporary problem id are remembered in a flat
//! text file, one `<path> <title> <language>` record per line. The next run
//! checks each record against the ids it observed: entries still temporary
//! are carried forward, entries whose problem now has a final id have their
//! temporary file removed, and the file is rewritten from scratch.

use std::fmt;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use leetsync_ingest_models::ReconcileSummary;

use crate::naming::{PathNamer, extension_for, file_component};
use crate::problem_id;
use crate::visited::{DedupKey, VisitedSet};

/// A solution written under a temporary problem id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingEntry {
    pub path: PathBuf,
    pub title: String,
    pub language: String,
}

/// A pending-queue line that does not hold three fields.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("malformed pending entry: {line:?}")]
pub struct MalformedLine {
    pub line: String,
}

impl PendingEntry {
    #[must_use]
    pub fn key(&self) -> DedupKey {
        DedupKey::new(&self.title, &self.language)
    }

    /// Parses one `<path> <title> <language>` line.
    ///
    /// The language starts after the last space. Paths usually embed the
    /// title, so the path/title boundary is the first space whose path ends
    /// in the file name that title and language produce; without such a
    /// boundary the path ends at the first space.
    ///
    /// # Errors
    ///
    /// Returns [`MalformedLine`] unless all three fields are present and
    /// non-empty.
    pub fn parse_line(line: &str) -> Result<Self, MalformedLine> {
        let malformed = || MalformedLine {
            line: line.to_owned(),
        };

        let (head, language) = line.rsplit_once(' ').ok_or_else(malformed)?;
        let names_file = |path: &str, title: &str| {
            !title.trim().is_empty()
                && path.ends_with(&format!("{}{}", file_component(title), extension_for(language)))
        };
        let (path, title) = head
            .match_indices(' ')
            .map(|(i, _)| (&head[..i], &head[i + 1..]))
            .find(|(path, title)| names_file(path, title))
            .or_else(|| head.split_once(' '))
            .ok_or_else(malformed)?;

        if path.is_empty() || title.trim().is_empty() || language.is_empty() {
            return Err(malformed());
        }

        Ok(Self {
            path: PathBuf::from(path),
            title: title.to_owned(),
            language: language.to_owned(),
        })
    }
}

impl fmt::Display for PendingEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.path.display(), self.title, self.language)
    }
}

/// What reconciliation decided for one line of the previous queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingState {
    /// Seen this run and still temporary; carried into the new queue.
    ReconfirmedTemporary(PendingEntry),
    /// Seen this run under a final id; the temporary file goes away.
    Resolved(PendingEntry),
    /// Not seen this run; dropped.
    Unobserved(PendingEntry),
    /// Unparseable; skipped.
    Malformed(MalformedLine),
}

/// Classifies a previous queue line against the ids observed this run.
#[must_use]
pub fn classify(line: Result<PendingEntry, MalformedLine>, visited: &VisitedSet) -> PendingState {
    let entry = match line {
        Ok(entry) => entry,
        Err(malformed) => return PendingState::Malformed(malformed),
    };

    match visited.problem_id(&entry.key()) {
        None => PendingState::Unobserved(entry),
        Some(id) if problem_id::is_temporary(id) => PendingState::ReconfirmedTemporary(entry),
        Some(_) => PendingState::Resolved(entry),
    }
}

/// In-memory list of pending entries built during a run.
#[derive(Debug, Default)]
pub struct PendingQueue {
    entries: Vec<PendingEntry>,
}

impl PendingQueue {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `entry` unless an identical entry is already queued.
    pub fn push(&mut self, entry: PendingEntry) -> bool {
        if self.entries.contains(&entry) {
            return false;
        }
        self.entries.push(entry);
        true
    }

    #[must_use]
    pub fn entries(&self) -> &[PendingEntry] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// File contents for this queue, one entry per line.
    #[must_use]
    pub fn render(&self) -> String {
        self.entries
            .iter()
            .map(|entry| format!("{entry}\n"))
            .collect()
    }
}

/// Reads the previous queue file. A missing file is an empty queue.
///
/// Blank lines are ignored.
///
/// # Errors
///
/// Returns an I/O error if the file exists but cannot be read.
pub async fn load(path: &Path) -> std::io::Result<Vec<Result<PendingEntry, MalformedLine>>> {
    let contents = match tokio::fs::read_to_string(path).await {
        Ok(contents) => contents,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e),
    };

    Ok(contents
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(PendingEntry::parse_line)
        .collect())
}

/// Replaces the queue file with `queue`. An empty queue leaves an empty file.
///
/// # Errors
///
/// Returns an I/O error if the file cannot be written.
pub async fn persist(path: &Path, queue: &PendingQueue) -> std::io::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, queue.render()).await
}

/// Applies reconciliation to every previous line: carries still-temporary
/// entries into `queue` and removes files of resolved entries.
///
/// `namer` and `output_dir` locate where the resolved problem's solution
/// lives now. A temporary file is only removed once that final file exists,
/// and a file that is already at its final path is never removed. A resolved
/// entry without a stored final file is carried forward like a temporary one.
pub async fn reconcile(
    previous: Vec<Result<PendingEntry, MalformedLine>>,
    visited: &VisitedSet,
    namer: &PathNamer,
    output_dir: &Path,
    queue: &mut PendingQueue,
) -> ReconcileSummary {
    let mut summary = ReconcileSummary::default();

    for line in previous {
        match classify(line, visited) {
            PendingState::ReconfirmedTemporary(entry) => {
                log::debug!("{} is still temporary", entry.path.display());
                summary.reconfirmed += 1;
                queue.push(entry);
            }
            PendingState::Resolved(entry) => {
                let stored = stored_final_path(&entry, visited, namer, output_dir).await;
                let Some(final_path) = stored else {
                    log::warn!(
                        "{} has a final id but its solution was not stored this run, keeping temporary code",
                        entry.path.display()
                    );
                    summary.reconfirmed += 1;
                    queue.push(entry);
                    continue;
                };

                summary.resolved += 1;
                if final_path != entry.path {
                    log::info!(
                        "{} is no longer a temporary problem, deleting temporary code",
                        entry.path.display()
                    );
                    remove_temporary(&entry.path, output_dir).await;
                }
            }
            PendingState::Unobserved(entry) => {
                log::debug!("{} was not seen this run, dropping", entry.path.display());
                summary.unobserved += 1;
            }
            PendingState::Malformed(malformed) => {
                log::warn!("Skipping {malformed}");
                summary.malformed += 1;
            }
        }
    }

    summary
}

/// The final path of a resolved entry, if a solution file is stored there.
async fn stored_final_path(
    entry: &PendingEntry,
    visited: &VisitedSet,
    namer: &PathNamer,
    output_dir: &Path,
) -> Option<PathBuf> {
    let id = visited.problem_id(&entry.key())?;
    let path = namer
        .path_for(id, &entry.title, &entry.language, output_dir)
        .ok()?;

    match tokio::fs::metadata(&path).await {
        Ok(meta) if meta.is_file() => Some(path),
        _ => None,
    }
}

/// Deletes a temporary solution file, and its problem directory once empty.
async fn remove_temporary(path: &Path, output_dir: &Path) {
    match tokio::fs::remove_file(path).await {
        Ok(()) => {}
        Err(e) if e.kind() == ErrorKind::NotFound => {
            log::debug!("{} was already gone", path.display());
            return;
        }
        Err(e) => {
            log::warn!("Failed to delete {}: {e}", path.display());
            return;
        }
    }

    if let Some(parent) = path.parent()
        && parent != output_dir
        && parent.starts_with(output_dir)
        && let Err(e) = tokio::fs::remove_dir(parent).await
    {
        log::debug!("Keeping {}: {e}", parent.display());
    }
}
