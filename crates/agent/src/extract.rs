//! Fenced code block extraction from free-form model output.

/// Marker that opens and closes a fenced block.
pub const FENCE: &str = "```";

/// Returned by [`extract_code`] when the text holds no usable block.
pub const NO_CODE_BLOCK: &str = "# No code block found";

/// Body of the first fenced block in `text`, if it has any lines.
///
/// A line whose trimmed content starts with [`FENCE`] opens a block (any
/// language tag after the marker is ignored) and the next such line closes
/// it. Fence lines are never part of the output. An unterminated block runs
/// to the end of the text. Later blocks are ignored.
pub fn first_code_block(text: &str) -> Option<String> {
    let mut inside = false;
    let mut lines = Vec::new();

    for line in text.lines() {
        let is_fence = line.trim().starts_with(FENCE);
        if !inside {
            inside = is_fence;
            continue;
        }
        if is_fence {
            break;
        }
        lines.push(line);
    }

    (!lines.is_empty()).then(|| lines.join("\n"))
}

/// Like [`first_code_block`] but yields [`NO_CODE_BLOCK`] on a miss.
pub fn extract_code(text: &str) -> String {
    first_code_block(text).unwrap_or_else(|| NO_CODE_BLOCK.to_string())
}
