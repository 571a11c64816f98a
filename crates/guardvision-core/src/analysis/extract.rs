//! Locate a JSON object embedded in free-form model output.

/// Return the first balanced top-level `{...}` block in `text`.
///
/// Braces inside JSON string literals (including escaped quotes) do not
/// count toward nesting. A `{` that never closes is skipped and the scan
/// resumes at the next one.
pub fn extract_json_object(text: &str) -> Option<&str> {
    json_object_candidates(text).next()
}

/// Every balanced top-level `{...}` block in `text`, in order.
pub fn json_object_candidates(text: &str) -> impl Iterator<Item = &str> {
    let mut pos = 0;
    std::iter::from_fn(move || {
        while let Some(offset) = text.get(pos..)?.find('{') {
            let start = pos + offset;
            match balanced_end(&text.as_bytes()[start..]) {
                Some(len) => {
                    pos = start + len;
                    return Some(&text[start..start + len]);
                }
                None => pos = start + 1,
            }
        }
        None
    })
}

/// Length of the balanced block at the start of `bytes` (which begins with `{`).
fn balanced_end(bytes: &[u8]) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, &b) in bytes.iter().enumerate() {
        if in_string {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_string = false;
            }
            continue;
        }
        match b {
            b'"' => in_string = true,
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i + 1);
                }
            }
            _ => {}
        }
    }
    None
}
