//! Deterministic formatting of per-type count summaries.

use std::collections::HashMap;

/// Formats a count mapping as `kind : count` pairs joined by `"; "`.
///
/// Entries are ordered by descending count, then ascending name, so the
/// same mapping always serializes to the same string regardless of how
/// it was built. An empty mapping formats as `none`.
pub fn format_counts(counts: &HashMap<String, u32>) -> String {
    if counts.is_empty() {
        return "none".to_string();
    }

    let mut entries: Vec<(&String, &u32)> = counts.iter().collect();
    entries.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));

    entries
        .iter()
        .map(|(kind, count)| format!("{} : {}", kind, count))
        .collect::<Vec<_>>()
        .join("; ")
}
