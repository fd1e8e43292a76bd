const UTF8_BOM: char = '\u{feff}';

pub(crate) fn strip_bom(content: &str) -> &str {
    content.strip_prefix(UTF8_BOM).unwrap_or(content)
}

pub(crate) fn looks_like_markup(content: &str) -> bool {
    strip_bom(content).trim_start().starts_with('<')
}
