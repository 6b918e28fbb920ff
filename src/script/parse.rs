use crate::{
    foundation::error::{ChatstripError, ChatstripResult},
    script::conversation::Conversation,
};

/// Parse a whole script, one `nickname,text` message per line.
///
/// Blank lines are skipped. The text is everything after the first comma, kept verbatim.
pub fn parse_script(src: &str) -> ChatstripResult<Conversation> {
    let mut conversation = Conversation::new();
    for (idx, raw) in src.lines().enumerate() {
        let line_no = idx + 1;
        let Some((nick, text)) = parse_line(raw, line_no)? else {
            continue;
        };
        conversation.push(nick, text, line_no);
    }
    tracing::debug!(
        messages = conversation.messages().len(),
        speakers = conversation.speakers().len(),
        "parsed script"
    );
    Ok(conversation)
}

/// Split one script line into `(nick, text)`; `Ok(None)` for blank lines.
pub fn parse_line(raw: &str, line_no: usize) -> ChatstripResult<Option<(&str, &str)>> {
    let line = raw.strip_suffix('\r').unwrap_or(raw);
    if line.trim().is_empty() {
        return Ok(None);
    }
    let (nick, text) = line.split_once(',').ok_or_else(|| {
        ChatstripError::script(format!("line {line_no}: expected 'nickname,text'"))
    })?;
    if nick.is_empty() {
        return Err(ChatstripError::script(format!(
            "line {line_no}: empty nickname"
        )));
    }
    Ok(Some((nick, text)))
}

#[cfg(test)]
#[path = "../../tests/unit/script/parse.rs"]
mod tests;
