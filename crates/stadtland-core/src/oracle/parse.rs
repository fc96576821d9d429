use crate::error::{RoundError, RoundResult};
use crate::verdict::VerdictGrid;

/// Find the verdict object in the judge's text and index it.
///
/// Prose or code fences around the JSON are skipped, including prose that
/// itself contains brackets: every `{` or `[` is tried in order and the first
/// complete object wins. Positions inside an already parsed value are not
/// retried, so a bare list reply stays a format error.
pub fn parse_verdict_grid(text: &str) -> RoundResult<VerdictGrid> {
    let text = text.trim();
    let mut first_error = None;
    let mut first_other = None;
    let mut parsed_until = 0;

    for (start, _) in text.match_indices(['{', '[']) {
        if start < parsed_until {
            continue;
        }
        let mut values =
            serde_json::Deserializer::from_str(&text[start..]).into_iter::<serde_json::Value>();
        match values.next() {
            Some(Ok(value @ serde_json::Value::Object(_))) => {
                return VerdictGrid::from_value(&value)
            }
            Some(Ok(value)) => {
                parsed_until = start + values.byte_offset();
                first_other.get_or_insert(value);
            }
            Some(Err(e)) => {
                first_error.get_or_insert(e);
            }
            None => {}
        }
    }

    match (first_other, first_error) {
        (Some(value), _) => VerdictGrid::from_value(&value),
        (None, Some(e)) => Err(RoundError::response_format(format!("invalid JSON: {}", e))),
        (None, None) => Err(RoundError::response_format(
            "no JSON value ({ or [) in judge reply",
        )),
    }
}
