//! Pulling a JSON document out of free-form model output.

use serde::de::IgnoredAny;

/// Returns the JSON text embedded in a model reply.
///
/// A fenced code block holding valid JSON wins. Otherwise every balanced
/// `{...}` or `[...]` span is tried from left to right and the first one
/// that parses is returned, so bracketed prose such as `[deep]` ahead of the
/// document is skipped. Brackets inside string literals are ignored. `None`
/// when nothing parses.
pub fn extract_json(text: &str) -> Option<&str> {
    fenced_block(text)
        .filter(|block| is_json(block))
        .or_else(|| {
            text.match_indices(['{', '['])
                .filter_map(|(start, _)| balanced_span(text, start))
                .find(|span| is_json(span))
        })
}

fn is_json(candidate: &str) -> bool {
    serde_json::from_str::<IgnoredAny>(candidate).is_ok()
}

fn fenced_block(text: &str) -> Option<&str> {
    let open = text.find("```")?;
    let after_fence = &text[open + 3..];
    // skip the info string (`json`, `JSON`, ...) up to the end of the line
    let body_start = after_fence.find('\n')? + 1;
    let body = &after_fence[body_start..];
    let close = body.find("```")?;
    let block = body[..close].trim();
    (!block.is_empty()).then_some(block)
}

/// Balanced span opening at byte `start`, which must be `{` or `[`.
fn balanced_span(text: &str, start: usize) -> Option<&str> {
    let mut stack: Vec<u8> = Vec::new();
    let mut in_string = false;
    let mut escaped = false;

    for (offset, byte) in text.as_bytes()[start..].iter().copied().enumerate() {
        if in_string {
            match byte {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match byte {
            b'"' => in_string = true,
            b'{' => stack.push(b'}'),
            b'[' => stack.push(b']'),
            b'}' | b']' => {
                if stack.pop() != Some(byte) {
                    return None;
                }
                if stack.is_empty() {
                    return Some(&text[start..=start + offset]);
                }
            }
            _ => {}
        }
    }
    None
}
