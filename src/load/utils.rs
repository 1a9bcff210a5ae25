// src/load/utils.rs

/// Trim whitespace + strip outer quotes if present.
pub fn clean_str(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.starts_with('"') && trimmed.ends_with('"') && trimmed.len() >= 2 {
        trimmed[1..trimmed.len() - 1].trim().to_string()
    } else {
        trimmed.to_string()
    }
}

/// Decode file bytes: UTF-8 when valid, otherwise Latin-1 (every byte maps to
/// the code point of the same value). A leading UTF-8 BOM is dropped.
pub fn decode_text(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(s) => s.strip_prefix('\u{feff}').unwrap_or(s).to_string(),
        Err(_) => bytes.iter().map(|&b| b as char).collect(),
    }
}

/// Parse a number written with a decimal comma (`"0,061"`) or point.
///
/// Spaces used as thousands separators (`"1 256"`) are ignored. Returns
/// `None` for empty or non-numeric input.
pub fn parse_decimal(raw: &str) -> Option<f64> {
    let cleaned: String = clean_str(raw)
        .chars()
        .filter(|c| !matches!(c, ' ' | '\u{a0}' | '\u{202f}'))
        .map(|c| if c == ',' { '.' } else { c })
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok()
}
