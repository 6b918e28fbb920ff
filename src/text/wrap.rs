/// Greedily wrap `text` into lines of at most `max_width` characters.
///
/// Lines break at the last space that keeps the line within budget; the space itself is
/// dropped. A run without any usable space is hard-split every `max_width` characters. Widths
/// and offsets count `char`s, so multibyte text is never cut inside a character.
///
/// `max_width` below 1 is treated as 1. Empty or all-space input yields no lines.
pub fn wrap(text: &str, max_width: usize) -> Vec<String> {
    let max_width = max_width.max(1);
    let chars: Vec<char> = text.chars().collect();
    let len = chars.len();

    let mut lines = Vec::new();
    let mut offset = 0usize;
    while offset < len {
        if chars[offset] == ' ' {
            offset += 1;
            continue;
        }
        if len - offset <= max_width {
            break;
        }

        // `offset + max_width < len` holds here, so the window end is in bounds.
        let window = &chars[offset..=offset + max_width];
        match window.iter().rposition(|&c| c == ' ') {
            Some(space) => {
                lines.push(window[..space].iter().collect());
                offset += space + 1;
            }
            None => {
                lines.push(window[..max_width].iter().collect());
                offset += max_width;
            }
        }
    }

    if offset < len {
        lines.push(chars[offset..].iter().collect());
    }
    lines
}

#[cfg(test)]
#[path = "../../tests/unit/text/wrap.rs"]
mod tests;
