//! Locates the JSON object a generative model embedded in a free-form reply.
//!
//! Replies often wrap the object in prose or markdown fences. The lookup
//! order is:
//! 1. the whole (trimmed) reply as a JSON object;
//! 2. the balanced `{...}` span opening at each `{`, left to right, first one
//!    that parses (so an object nested in unparseable braces is still found);
//! 3. the span from the first `{` to the last `}`, whose parse error is reported.
//!
//! Braces inside JSON strings (including escaped quotes) do not count toward
//! balance. A span that never closes is skipped, unless it is a valid JSON
//! prefix cut off by the end of the reply: a truncated object is reported,
//! never mined for fragments.

use serde_json::Value;
use tracing::debug;

use crate::error::FetchError;

/// Returns the embedded JSON object.
///
/// Fails with [`FetchError::NoJsonFound`] when the reply has no `{` followed
/// by a `}`, and with [`FetchError::Parse`] when braces exist but nothing
/// between them is valid JSON.
pub fn extract_object(text: &str) -> Result<Value, FetchError> {
    let trimmed = text.trim();
    if let Ok(value @ Value::Object(_)) = serde_json::from_str::<Value>(trimmed) {
        return Ok(value);
    }

    for (index, span) in candidate_spans(text).enumerate() {
        match serde_json::from_str::<Value>(span) {
            Ok(value) => {
                debug!(candidate = index, len = span.len(), "Located embedded JSON object");
                return Ok(value);
            }
            Err(e) => debug!(candidate = index, error = %e, "Skipping unparseable brace span"),
        }
    }

    let outermost = outermost_span(text).ok_or(FetchError::NoJsonFound)?;
    Ok(serde_json::from_str(outermost)?)
}

/// First `{` through last `}`, if they appear in that order.
fn outermost_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

/// Balanced spans opening at every `{`, in order of their opening brace.
/// Nested spans follow the span that encloses them.
fn candidate_spans(text: &str) -> impl Iterator<Item = &str> {
    let mut pos = 0;

    std::iter::from_fn(move || loop {
        let start = pos + text.get(pos..)?.find('{')?;
        pos = start + 1;

        match balanced_end(text.as_bytes(), start) {
            Some(end) => return Some(&text[start..=end]),
            None if is_truncated(&text[start..]) => {
                pos = text.len();
                return None;
            }
            None => continue,
        }
    })
}

/// Index of the `}` closing the `{` at `start`.
fn balanced_end(bytes: &[u8], start: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, &b) in bytes[start..].iter().enumerate() {
        if in_string {
            match b {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match b {
            b'"' => in_string = true,
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(start + offset);
                }
            }
            _ => {}
        }
    }

    None
}

/// Whether `rest` is well-formed JSON that simply ran out of input.
fn is_truncated(rest: &str) -> bool {
    matches!(serde_json::from_str::<Value>(rest), Err(e) if e.is_eof())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn plain_object_parses_directly() {
        let value = extract_object(r#"  {"schemes": []}  "#).unwrap();
        assert_eq!(value, json!({ "schemes": [] }));
    }

    #[test]
    fn object_in_prose_is_returned_unchanged() {
        let embedded = json!({ "title": "PM-KISAN", "requiredDocuments": ["Aadhaar Card"] });
        let reply = format!(
            "Sure! Here is the information you asked for:\n{}\nLet me know if you need more.",
            embedded
        );

        assert_eq!(extract_object(&reply).unwrap(), embedded);
    }

    #[test]
    fn markdown_fences_are_ignored() {
        let reply = "```json\n{\"schemes\": [{\"title\": \"PMFBY\"}]}\n```";
        let value = extract_object(reply).unwrap();
        assert_eq!(value["schemes"][0]["title"], "PMFBY");
    }

    #[test]
    fn braces_inside_strings_do_not_break_balance() {
        let reply = r#"Result: {"title": "Odd } name", "note": "say \"{hi\""} trailing"#;
        let value = extract_object(reply).unwrap();
        assert_eq!(value["title"], "Odd } name");
        assert_eq!(value["note"], "say \"{hi\"");
    }

    #[test]
    fn later_object_is_found_after_unrelated_braces() {
        let reply = r#"Templates look like {name}. Answer: {"schemes": [{"title": "e-NAM"}]}"#;
        let value = extract_object(reply).unwrap();
        assert_eq!(value["schemes"][0]["title"], "e-NAM");
    }

    #[test]
    fn prose_quotes_before_the_object_are_not_strings() {
        let reply = r#"The "best" answer is {"ok": true}"#;
        assert_eq!(extract_object(reply).unwrap(), json!({ "ok": true }));
    }

    #[test]
    fn text_without_braces_has_no_json() {
        assert!(matches!(
            extract_object("I could not find any schemes."),
            Err(FetchError::NoJsonFound)
        ));
        assert!(matches!(extract_object(""), Err(FetchError::NoJsonFound)));
        assert!(matches!(extract_object("} backwards {"), Err(FetchError::NoJsonFound)));
    }

    #[test]
    fn malformed_object_is_a_parse_error() {
        assert!(matches!(
            extract_object(r#"Here you go: {"schemes": [1, 2,}"#),
            Err(FetchError::Parse(_))
        ));
    }

    #[test]
    fn stray_quote_in_prose_does_not_hide_later_object() {
        let reply = r#"Pipes sized {5" diameter} are subsidised. {"schemes": []}"#;
        assert_eq!(extract_object(reply).unwrap(), json!({ "schemes": [] }));
    }

    #[test]
    fn object_nested_in_unparseable_braces_is_found() {
        let reply = r#"Example {note: {"schemes": [{"title": "PMFBY"}]}}"#;
        let value = extract_object(reply).unwrap();
        assert_eq!(value["schemes"][0]["title"], "PMFBY");
    }

    #[test]
    fn enclosing_object_wins_over_nested_one() {
        let reply = r#"Answer: {"schemes": [{"title": "KCC"}]} done"#;
        let value = extract_object(reply).unwrap();
        assert_eq!(value["schemes"][0]["title"], "KCC");
    }

    #[test]
    fn truncated_object_is_a_parse_error() {
        assert!(matches!(
            extract_object(r#"{"title": "PM-KISAN", "details": {"a": 1}"#),
            Err(FetchError::Parse(_))
        ));
    }
}
