//! Prompt assembly for the bilingual summary.
//!
//! The instruction block asks for exactly three lines (German summary,
//! English summary, bilingual breaking-changes line) so the model's raw
//! response can be posted as the comment body without post-processing.

/// System prompt for the summarization call.
pub const SYSTEM_PROMPT: &str =
    "You are PR-Sense, an assistant that writes concise bilingual pull-request summaries.";

/// Keep only the first `max_lines` lines of a diff.
///
/// Large diffs blow the prompt budget without improving the summary; the
/// head of a unified diff carries the file list and the bulk of the signal.
pub fn truncate_diff(diff: &str, max_lines: usize) -> String {
    diff.lines()
        .take(max_lines)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Build the user prompt around an (already truncated) diff.
pub fn build_prompt(diff: &str) -> String {
    format!(
        r#"### Aufgabe
Gib exakt **drei** Zeilen zurück:

1. `DE: …`  (max 150 Zeichen, kurze Zusammenfassung auf Deutsch)
2. `EN: …`  (max 150 characters, same summary in English)
3. Eine Zeile für Breaking Changes:
   • <Deutsch> | <English>
   Wenn es keine Breaking Changes gibt, schreibe **genau**:
   • Keine Breaking Changes. | No breaking changes.

### Diff
{diff}
"#
    )
}
