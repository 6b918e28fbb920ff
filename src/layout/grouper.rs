use crate::script::conversation::{Message, SpeakerId};

/// Side of the panel a character stands on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StagePosition {
    Left,
    Right,
}

/// Direction a character looks. Sprites are drawn facing right.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Facing {
    Left,
    Right,
}

impl Facing {
    pub fn is_flipped(self) -> bool {
        matches!(self, Facing::Left)
    }
}

/// Camera distance for a panel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ZoomLevel {
    /// Level 1: one character, cropped to the top half of the sprite.
    Close,
    /// Level 2: two characters at reduced size.
    Medium,
}

impl ZoomLevel {
    pub fn level(self) -> u8 {
        match self {
            ZoomLevel::Close => 1,
            ZoomLevel::Medium => 2,
        }
    }

    /// Fraction of the panel height taken from the background before stretching.
    pub fn background_scale(self) -> f64 {
        match self {
            ZoomLevel::Close => 0.6,
            ZoomLevel::Medium => 1.0,
        }
    }
}

/// One message placed on stage.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PanelSlot<'a> {
    pub message: &'a Message,
    pub position: StagePosition,
    pub facing: Facing,
}

/// Messages that share a panel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PanelGroup<'a> {
    Single(PanelSlot<'a>),
    Pair(PanelSlot<'a>, PanelSlot<'a>),
}

impl<'a> PanelGroup<'a> {
    fn single(message: &'a Message) -> Self {
        PanelGroup::Single(PanelSlot {
            message,
            position: StagePosition::Left,
            facing: Facing::Right,
        })
    }

    fn pair(first: &'a Message, second: &'a Message) -> Self {
        PanelGroup::Pair(
            PanelSlot {
                message: first,
                position: StagePosition::Left,
                facing: Facing::Right,
            },
            PanelSlot {
                message: second,
                position: StagePosition::Right,
                facing: Facing::Left,
            },
        )
    }

    pub fn zoom(&self) -> ZoomLevel {
        match self {
            PanelGroup::Single(_) => ZoomLevel::Close,
            PanelGroup::Pair(..) => ZoomLevel::Medium,
        }
    }

    pub fn slots(&self) -> Vec<PanelSlot<'a>> {
        match *self {
            PanelGroup::Single(a) => vec![a],
            PanelGroup::Pair(a, b) => vec![a, b],
        }
    }

    pub fn speakers(&self) -> Vec<SpeakerId> {
        self.slots().iter().map(|s| s.message.speaker).collect()
    }
}

/// Streaming panel grouper holding at most two pending messages.
///
/// A lone pending message is closed as a single panel when its speaker talks again; two pending
/// messages always close as a pair before the next one is buffered.
#[derive(Debug, Default)]
pub struct PanelGrouper<'a> {
    pending: Vec<&'a Message>,
}

impl<'a> PanelGrouper<'a> {
    pub fn new() -> Self {
        Self {
            pending: Vec::with_capacity(2),
        }
    }

    /// Feed the next message; returns a panel when one closes.
    pub fn push(&mut self, message: &'a Message) -> Option<PanelGroup<'a>> {
        let emitted = match self.pending.as_slice() {
            [only] if only.speaker == message.speaker => Some(PanelGroup::single(*only)),
            [first, second] => Some(PanelGroup::pair(*first, *second)),
            _ => None,
        };
        if emitted.is_some() {
            self.pending.clear();
        }
        self.pending.push(message);
        emitted
    }

    /// Flush whatever is still pending at end of stream.
    pub fn finish(self) -> Option<PanelGroup<'a>> {
        match self.pending.as_slice() {
            [only] => Some(PanelGroup::single(*only)),
            [first, second] => Some(PanelGroup::pair(*first, *second)),
            _ => None,
        }
    }
}

/// Group a full message stream into panels, in order.
pub fn group_panels(messages: &[Message]) -> Vec<PanelGroup<'_>> {
    let mut grouper = PanelGrouper::new();
    let mut out: Vec<PanelGroup<'_>> = messages.iter().filter_map(|m| grouper.push(m)).collect();
    out.extend(grouper.finish());
    out
}

#[cfg(test)]
#[path = "../../tests/unit/layout/grouper.rs"]
mod tests;
