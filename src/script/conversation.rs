use std::collections::BTreeMap;

use rand::RngCore;

use crate::{
    assets::store::AssetProvider,
    foundation::error::{ChatstripError, ChatstripResult},
};

/// Index of a speaker within its [`Conversation`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SpeakerId(pub usize);

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Speaker {
    pub nick: String,
    /// Name of the character drawn for this speaker, once assigned.
    pub character: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Message {
    pub speaker: SpeakerId,
    pub text: String,
    /// 1-based line in the source script.
    pub line: usize,
}

/// Ordered messages plus the speakers they reference, in first-appearance order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Conversation {
    speakers: Vec<Speaker>,
    by_nick: BTreeMap<String, SpeakerId>,
    messages: Vec<Message>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message, registering `nick` as a speaker on first sight.
    pub fn push(&mut self, nick: &str, text: impl Into<String>, line: usize) -> SpeakerId {
        let speaker = match self.by_nick.get(nick) {
            Some(id) => *id,
            None => {
                let id = SpeakerId(self.speakers.len());
                self.speakers.push(Speaker {
                    nick: nick.to_string(),
                    character: None,
                });
                self.by_nick.insert(nick.to_string(), id);
                id
            }
        };
        self.messages.push(Message {
            speaker,
            text: text.into(),
            line,
        });
        speaker
    }

    pub fn speakers(&self) -> &[Speaker] {
        &self.speakers
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn speaker(&self, id: SpeakerId) -> Option<&Speaker> {
        self.speakers.get(id.0)
    }

    pub fn speaker_by_nick(&self, nick: &str) -> Option<&Speaker> {
        self.by_nick.get(nick).and_then(|id| self.speaker(*id))
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Give every speaker a character: the one named like their nick, else a random one.
    ///
    /// Speakers are visited in nick order so a seeded `rng` always casts the same way.
    pub fn assign_characters(
        &mut self,
        assets: &dyn AssetProvider,
        rng: &mut dyn RngCore,
    ) -> ChatstripResult<()> {
        for id in self.by_nick.values() {
            let speaker = &mut self.speakers[id.0];
            let character = match assets.character(&speaker.nick) {
                Some(c) => c,
                None => assets.random_character(rng).ok_or_else(|| {
                    ChatstripError::asset(format!(
                        "no characters loaded to cast speaker '{}'",
                        speaker.nick
                    ))
                })?,
            };
            tracing::debug!(nick = %speaker.nick, character = character.name(), "cast speaker");
            speaker.character = Some(character.name().to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/script/conversation.rs"]
mod tests;
