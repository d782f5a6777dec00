//! Problem id classification.

/// Leading characters at or above this are reserved for ids the judge has
/// not finalized yet.
const TEMPORARY_THRESHOLD: char = '6';

/// Returns `true` when the judge may still renumber `problem_id`.
///
/// Ids that do not start with a digit (contest-local numbering such as
/// `"LCP 01"`) and ids whose first digit is `6` or higher are provisional.
/// An empty id is never provisional.
#[must_use]
pub fn is_temporary(problem_id: &str) -> bool {
    problem_id
        .chars()
        .next()
        .is_some_and(|c| !c.is_ascii_digit() || c >= TEMPORARY_THRESHOLD)
}
