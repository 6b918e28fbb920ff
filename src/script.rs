pub(crate) mod conversation;
pub(crate) mod parse;
