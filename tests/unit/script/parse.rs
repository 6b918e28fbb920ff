use super::*;

#[test]
fn splits_on_first_comma_only() {
    let conv = parse_script("anna,hi, how are you?\nbob,fine").unwrap();
    let msgs = conv.messages();
    assert_eq!(msgs.len(), 2);
    assert_eq!(msgs[0].text, "hi, how are you?");
    assert_eq!(msgs[1].text, "fine");
    assert_eq!(conv.speaker(msgs[0].speaker).unwrap().nick, "anna");
    assert_eq!(conv.speaker(msgs[1].speaker).unwrap().nick, "bob");
}

#[test]
fn crlf_and_blank_lines() {
    let conv = parse_script("anna,one\r\n\r\n   \nbob,two\r\n").unwrap();
    let msgs = conv.messages();
    assert_eq!(msgs.len(), 2);
    assert_eq!(msgs[0].text, "one");
    assert_eq!(msgs[1].text, "two");
    assert_eq!(msgs[1].line, 4);
}

#[test]
fn empty_input_is_empty_conversation() {
    let conv = parse_script("").unwrap();
    assert!(conv.is_empty());
    assert!(conv.speakers().is_empty());
}

#[test]
fn missing_comma_names_the_line() {
    let err = parse_script("anna,ok\nno comma here").unwrap_err();
    assert!(matches!(err, ChatstripError::Script(_)));
    let msg = err.to_string();
    assert!(msg.starts_with("script error:"));
    assert!(msg.contains("line 2"));
}

#[test]
fn empty_nickname_is_rejected() {
    let err = parse_script(",orphan text").unwrap_err();
    assert!(err.to_string().contains("line 1"));
}

#[test]
fn text_may_be_empty() {
    assert_eq!(parse_line("anna,", 1).unwrap(), Some(("anna", "")));
    assert_eq!(parse_line("  ", 1).unwrap(), None);
    assert_eq!(parse_line("a,b\r", 1).unwrap(), Some(("a", "b")));
}

#[test]
fn nicknames_are_case_sensitive() {
    let conv = parse_script("Anna,x\nanna,y").unwrap();
    assert_eq!(conv.speakers().len(), 2);
}
