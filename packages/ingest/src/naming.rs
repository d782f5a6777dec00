//! Destination paths for solution files.
//!
//! A pure mapping from `(problem id, title, language, output dir)` to the
//! file a solution is stored in. Nothing here touches the filesystem.

use std::path::{Path, PathBuf};

use leetsync_ingest_models::Layout;

/// Errors produced while naming a solution file.
#[derive(Debug, thiserror::Error)]
pub enum NamingError {
    /// The judge returned an empty problem id.
    #[error("problem id is empty")]
    EmptyProblemId,
}

/// File extension for a judge language name, including the leading dot.
///
/// Unknown languages map to an empty extension.
#[must_use]
pub fn extension_for(language: &str) -> &'static str {
    match language {
        "C++" => ".cpp",
        "Python3" | "Python" => ".py",
        "MySQL" => ".sql",
        "Go" => ".go",
        "Java" => ".java",
        "C" => ".c",
        "JavaScript" => ".js",
        "TypeScript" => ".ts",
        "PHP" => ".php",
        "C#" => ".cs",
        "Ruby" => ".rb",
        "Swift" => ".swift",
        "Scala" => ".scl",
        "Kotlin" => ".kt",
        "Rust" => ".rs",
        _ => "",
    }
}

/// Maps problems to solution file paths for a given [`Layout`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PathNamer {
    layout: Layout,
}

impl PathNamer {
    #[must_use]
    pub const fn new(layout: Layout) -> Self {
        Self { layout }
    }

    /// Returns the path the solution for this problem and language lives at.
    ///
    /// Ids made only of ASCII digits are zero-padded to four digits;
    /// any other id is used verbatim.
    ///
    /// # Errors
    ///
    /// Returns [`NamingError::EmptyProblemId`] if `problem_id` is empty.
    pub fn path_for(
        &self,
        problem_id: &str,
        title: &str,
        language: &str,
        output_dir: &Path,
    ) -> Result<PathBuf, NamingError> {
        if problem_id.is_empty() {
            return Err(NamingError::EmptyProblemId);
        }

        let title = file_component(title);
        let ext = extension_for(language);
        let numeric = problem_id
            .bytes()
            .all(|b| b.is_ascii_digit())
            .then(|| problem_id.parse::<u64>().ok())
            .flatten();

        let path = match (self.layout, numeric) {
            (Layout::Flat, Some(n)) => output_dir.join(format!("{n:04}.{title}{ext}")),
            (Layout::Flat, None) => output_dir.join(format!("{problem_id}.{title}{ext}")),
            (Layout::PerProblem, Some(n)) => output_dir
                .join(format!("{n:04}.{title}"))
                .join(format!("{n}-{title}{ext}")),
            (Layout::PerProblem, None) => output_dir
                .join(format!("{problem_id}.{title}"))
                .join(format!("{problem_id}-{title}{ext}")),
        };

        Ok(path)
    }
}

/// Keeps a title from introducing extra path segments.
pub(crate) fn file_component(title: &str) -> String {
    title.replace(['/', '\\'], "-")
}
