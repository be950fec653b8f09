pub(crate) fn clean_text(value: &str) -> String {
    let cleaned = value.replace(['\u{feff}', '\u{200b}'], "");
    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Maps a free-text role onto one of `titles`, ignoring case and spacing.
/// Unmatched roles are returned cleaned but otherwise untouched.
pub(crate) fn canonical_role<'a, I>(raw: &str, titles: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let cleaned = clean_text(raw);
    let key = cleaned.to_lowercase();
    titles
        .into_iter()
        .find(|title| clean_text(title).to_lowercase() == key)
        .map(str::to_string)
        .unwrap_or(cleaned)
}

pub(crate) fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "" | "0" | "no" | "n" | "false" => Some(false),
        "1" | "yes" | "y" | "true" | "x" | "si" | "sì" => Some(true),
        _ => None,
    }
}
