// Topic-exchange binding key matching.
//
// Keys are `.`-separated segments. In a binding pattern `*` matches exactly one
// segment and `#` matches zero or more segments.

pub const SEGMENT_SEPARATOR: char = '.';
pub const SINGLE_SEGMENT_WILDCARD: &str = "*";
pub const MULTI_SEGMENT_WILDCARD: &str = "#";

/// Returns true when `routing_key` is selected by the binding `pattern`.
///
/// ```
/// use switchyard_exchange::pattern::matches;
///
/// assert!(matches("#.weather.#", "station1.weather.stream"));
/// assert!(matches("*", "orders"));
/// assert!(!matches("*", "orders.stream"));
/// ```
pub fn matches(pattern: &str, routing_key: &str) -> bool {
    let pattern: Vec<&str> = pattern.split(SEGMENT_SEPARATOR).collect();
    // An empty key has no segments at all, not one empty segment.
    let key: Vec<&str> = if routing_key.is_empty() {
        Vec::new()
    } else {
        routing_key.split(SEGMENT_SEPARATOR).collect()
    };
    match_segments(&pattern, &key)
}

fn match_segments(pattern: &[&str], key: &[&str]) -> bool {
    match pattern.split_first() {
        None => key.is_empty(),
        Some((&MULTI_SEGMENT_WILDCARD, rest)) => {
            // Collapse runs of `#`; they match the same set as a single one.
            let rest = trim_leading_multi(rest);
            if rest.is_empty() {
                return true;
            }
            (0..=key.len()).any(|skip| match_segments(rest, &key[skip..]))
        }
        Some((&SINGLE_SEGMENT_WILDCARD, rest)) => {
            !key.is_empty() && match_segments(rest, &key[1..])
        }
        Some((segment, rest)) => key.first() == Some(segment) && match_segments(rest, &key[1..]),
    }
}

fn trim_leading_multi<'a, 'b>(mut pattern: &'a [&'b str]) -> &'a [&'b str] {
    while let Some((&MULTI_SEGMENT_WILDCARD, rest)) = pattern.split_first() {
        pattern = rest;
    }
    pattern
}
