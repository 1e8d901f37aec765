//! Post-processing: deterministic cleanup of engine-produced HTML.
//!
//! ## Why is post-processing necessary?
//!
//! Neither engine guarantees tidy text output. `pdftohtml` emits
//! Windows-style line endings on some platforms, and text extracted from
//! PDFs routinely carries NUL bytes, zero-width spaces and soft hyphens
//! left over from the original typesetting. These rules fix transport
//! artefacts without touching markup or content. Each rule is a pure
//! function (`&str → String`), independently testable.
//!
//! Rules (applied in order):
//! 1. Normalise line endings (CRLF → LF)
//! 2. Strip NUL and invisible Unicode (zero-width spaces, BOM, soft hyphens)
//! 3. Collapse 4+ consecutive newlines down to 3
//! 4. Ensure the document ends with exactly one newline

use once_cell::sync::Lazy;
use regex::Regex;

/// Apply all post-processing rules to the raw engine output.
pub fn clean_html(input: &str) -> String {
    let s = normalise_line_endings(input);
    let s = remove_invisible_chars(&s);
    let s = collapse_blank_lines(&s);
    ensure_final_newline(&s)
}

// ── Rule 1: Normalise line endings ───────────────────────────────────────────

fn normalise_line_endings(input: &str) -> String {
    input.replace("\r\n", "\n").replace('\r', "\n")
}

// ── Rule 2: Strip invisible Unicode ──────────────────────────────────────────

static RE_INVISIBLE: Lazy<Regex> =
    Lazy::new(|| Regex::new("[\u{0000}\u{00AD}\u{200B}\u{200C}\u{200D}\u{2060}\u{FEFF}]").unwrap());

fn remove_invisible_chars(input: &str) -> String {
    RE_INVISIBLE.replace_all(input, "").to_string()
}

// ── Rule 3: Collapse excessive blank lines ───────────────────────────────────

static RE_BLANK_LINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{4,}").unwrap());

fn collapse_blank_lines(input: &str) -> String {
    RE_BLANK_LINES.replace_all(input, "\n\n\n").to_string()
}

// ── Rule 4: Ensure file ends with single newline ─────────────────────────────

fn ensure_final_newline(input: &str) -> String {
    let trimmed = input.trim_end_matches('\n');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("{trimmed}\n")
    }
}
