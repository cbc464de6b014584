use lazy_static::lazy_static;
use regex_lite::Regex;

#[allow(clippy::unwrap_used)]
lazy_static! {
    static ref BOLD_SPAN_REGEX: Regex = Regex::new(r"\*\*(.+?)\*\*").unwrap();
}

/// Reduce a model's title suggestion to one clean line.
///
/// Models often wrap the proposed name in bold or preface it with chatter;
/// the first bold span wins, otherwise the last non-empty line does.
pub fn sanitize_title(raw: &str) -> String {
    if let Some(caps) = BOLD_SPAN_REGEX.captures(raw) {
        if let Some(inner) = caps.get(1) {
            return inner.as_str().trim_matches('*').trim().to_string();
        }
    }
    raw.lines()
        .rev()
        .find(|line| !line.trim().is_empty())
        .map_or_else(|| raw.trim().to_string(), |line| line.trim().to_string())
}
