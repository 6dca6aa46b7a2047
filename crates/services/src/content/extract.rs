//! Turning a free-text generator reply into a validated `Curriculum`.

use pathway_core::model::{Curriculum, CurriculumDraft};

use crate::error::PayloadError;

const JSON_FENCE: &str = "```json";
const FENCE: &str = "```";

/// Pick the part of a reply that should hold the JSON document.
///
/// First match wins: the inside of a ```` ```json ```` block, then the inside of
/// any fenced block, then the whole reply. An unclosed block runs to the end.
#[must_use]
pub fn extract_payload(reply: &str) -> &str {
    if let Some(rest) = after_json_fence(reply) {
        return until_fence(rest).trim();
    }
    if let Some((_, rest)) = reply.split_once(FENCE) {
        return strip_info_string(until_fence(rest)).trim();
    }
    reply.trim()
}

/// Text after the first ```` ```json ```` fence, with the tag matched in any case.
fn after_json_fence(reply: &str) -> Option<&str> {
    // ASCII lowercasing keeps byte offsets, so the index is valid in `reply`.
    let start = reply.to_ascii_lowercase().find(JSON_FENCE)?;
    Some(&reply[start + JSON_FENCE.len()..])
}

fn until_fence(block: &str) -> &str {
    block.split_once(FENCE).map_or(block, |(inner, _)| inner)
}

/// Drops a language tag such as `JSON` or `javascript` on the fence line.
fn strip_info_string(block: &str) -> &str {
    match block.split_once('\n') {
        Some((first, rest)) if is_info_string(first) => rest,
        _ => block,
    }
}

fn is_info_string(line: &str) -> bool {
    let line = line.trim();
    !line.is_empty()
        && line
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Best-effort cleanup for a payload that failed to parse.
///
/// Collapses line breaks to spaces and doubles every backslash.
#[must_use]
pub fn repair_payload(payload: &str) -> String {
    payload
        .replace('\r', "")
        .replace('\n', " ")
        .replace('\\', "\\\\")
}

/// Strictly decode and validate `payload` as a learning path for `subject`.
///
/// The reply's own `subject` field is replaced with `subject` so the stored
/// path is keyed by what the learner asked for.
///
/// # Errors
///
/// Returns `PayloadError::Json` on malformed or mis-shaped JSON and
/// `PayloadError::Schema` when the curriculum invariants do not hold.
pub fn parse_curriculum(payload: &str, subject: &str) -> Result<Curriculum, PayloadError> {
    let mut draft: CurriculumDraft = serde_json::from_str(payload)?;
    if draft.subject != subject {
        tracing::debug!(requested = subject, replied = %draft.subject, "using requested subject name");
        draft.subject = subject.to_string();
    }
    Ok(draft.validate()?)
}

/// Extract, parse, and on failure retry once with the repaired payload.
///
/// # Errors
///
/// Returns the first parse failure when the repaired payload fails too.
pub fn decode_reply(reply: &str, subject: &str) -> Result<Curriculum, PayloadError> {
    let payload = extract_payload(reply);
    match parse_curriculum(payload, subject) {
        Ok(curriculum) => Ok(curriculum),
        Err(first) => {
            tracing::debug!(error = %first, payload_len = payload.len(), "strict parse failed, trying repaired payload");
            parse_curriculum(&repair_payload(payload), subject).map_err(|_| first)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BODY: &str = r#"{
        "subject": "Algebra",
        "overview": "Letters for numbers",
        "modules": [
            {
                "id": 1,
                "title": "Variables",
                "description": "What x means",
                "content": "A variable stands for a value.",
                "exercises": [
                    {
                        "question": "Solve x + 1 = 3",
                        "options": ["1", "2", "3"],
                        "answer": "2",
                        "explanation": "Subtract 1 from both sides."
                    }
                ],
                "additional_resources": ["Khan Academy"]
            }
        ]
    }"#;

    #[test]
    fn bare_reply_is_used_verbatim() {
        assert_eq!(extract_payload("  {\"a\": 1}\n"), "{\"a\": 1}");
    }

    #[test]
    fn tagged_fence_wins_over_earlier_untagged_fence() {
        let reply = "Try `x`:\n```\nnot this\n```\nHere it is:\n```json\n{\"a\": 1}\n```\nEnjoy!";
        assert_eq!(extract_payload(reply), "{\"a\": 1}");
    }

    #[test]
    fn uppercase_tag_wins_over_earlier_untagged_fence() {
        let reply = "Run this first:\n```\nnpm install\n```\nPlan:\n```JSON\n{\"a\": 1}\n```";
        assert_eq!(extract_payload(reply), "{\"a\": 1}");
    }

    #[test]
    fn untagged_fence_interior_is_taken() {
        let reply = "Sure!\n```\n{\"a\": 1}\n```";
        assert_eq!(extract_payload(reply), "{\"a\": 1}");
    }

    #[test]
    fn language_tag_on_untagged_fence_is_dropped() {
        let reply = "```javascript\n{\"a\": 1}\n```";
        assert_eq!(extract_payload(reply), "{\"a\": 1}");
    }

    #[test]
    fn unclosed_fence_runs_to_end() {
        assert_eq!(extract_payload("```json\n{\"a\": 1}"), "{\"a\": 1}");
    }

    #[test]
    fn fenced_and_bare_replies_parse_identically() {
        let bare = decode_reply(BODY, "Algebra").unwrap();
        let tagged = decode_reply(&format!("Here you go:\n```json\n{BODY}\n```\n"), "Algebra").unwrap();
        let untagged = decode_reply(&format!("```\n{BODY}\n```"), "Algebra").unwrap();
        assert_eq!(bare, tagged);
        assert_eq!(bare, untagged);
        assert_eq!(bare.modules()[0].exercises[0].answer, "2");
    }

    #[test]
    fn requested_subject_replaces_replied_subject() {
        let curriculum = decode_reply(BODY, "algebra basics").unwrap();
        assert_eq!(curriculum.subject(), "algebra basics");
    }

    #[test]
    fn raw_newline_inside_string_is_repaired() {
        let broken = r#"{"subject": "Algebra", "overview": "line one
line two", "modules": [{"id": 1, "title": "T", "content": "c", "exercises": []}]}"#;
        assert!(parse_curriculum(broken, "Algebra").is_err());
        let curriculum = decode_reply(broken, "Algebra").unwrap();
        assert_eq!(curriculum.overview(), "line one line two");
    }

    #[test]
    fn prose_without_json_fails_with_json_error() {
        let err = decode_reply("I'm sorry, I can't help with that.", "Algebra").unwrap_err();
        assert!(matches!(err, PayloadError::Json(_)));
    }

    #[test]
    fn schema_violation_is_a_payload_error() {
        let gap = BODY.replace("\"id\": 1", "\"id\": 2");
        let err = decode_reply(&gap, "Algebra").unwrap_err();
        assert!(matches!(err, PayloadError::Schema(_)));
    }

    #[test]
    fn repair_doubles_backslashes_and_flattens_lines() {
        assert_eq!(repair_payload("a\\b\r\nc"), "a\\\\b c");
    }
}
