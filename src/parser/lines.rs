/// Split raw report text into trimmed, non-empty lines.
///
/// Handles both `\n` and `\r\n` endings and strips stray byte-order marks left
/// behind by upstream text fields. An empty or whitespace-only input yields an
/// empty vector; downstream stages treat that as "no data", never as an error.
pub fn normalize(text: &str) -> Vec<String> {
    text.lines()
        .map(|l| l.trim().trim_start_matches('\u{feff}').trim())
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}

// ── Tests ──
