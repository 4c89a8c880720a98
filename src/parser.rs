/// Extracts numbered ad copies from a model response.
///
/// A line counts when its first non-whitespace character is `1`-`9`. The
/// marker is everything up to and including the first `.`; a qualifying line
/// with no `.` is kept whole. Only that first character is inspected, so
/// `0.` lines are ignored and unnumbered prose starting with a digit is
/// picked up.
pub fn parse_variants(raw: &str) -> Vec<String> {
    raw.lines()
        .filter_map(|line| {
            let trimmed = line.trim();
            let first = trimmed.chars().next()?;
            if !matches!(first, '1'..='9') {
                return None;
            }
            let text = match trimmed.split_once('.') {
                Some((_, rest)) => rest.trim(),
                None => trimmed,
            };
            if text.is_empty() {
                None
            } else {
                Some(text.to_string())
            }
        })
        .collect()
}
