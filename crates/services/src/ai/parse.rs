//! Recovery of a JSON array from a chatty model reply.

/// Pull the JSON-array payload out of a model reply.
///
/// Handles the two shapes models actually produce: a fenced code block
/// (with any info string) and a bare array, possibly wrapped in prose.
/// Returns `None` when no bracketed payload can be found.
pub(crate) fn extract_json_array(reply: &str) -> Option<&str> {
    let mut body = reply.trim();

    if let Some(rest) = body.strip_prefix("```") {
        // drop the info string ("json", "JSON", ...) up to the first newline
        body = rest.split_once('\n').map_or(rest, |(_, after)| after);
    }
    body = body.strip_suffix("```").unwrap_or(body).trim();

    if body.starts_with('[') && body.ends_with(']') {
        return Some(body);
    }

    // fallback: widest bracket window inside surrounding prose
    let start = body.find('[')?;
    let end = body.rfind(']')?;
    (end > start).then(|| &body[start..=end])
}
