use serde::{Deserialize, Serialize};

/// A slot the conversation can be waiting on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Slot {
    Genre,
    ReadingLevel,
    Length,
    /// Multi-criteria flow with neither genre nor length yet.
    Criteria,
    BookTitle,
    BookInfo,
    Author,
}

impl Slot {
    /// Parameter name the platform uses for this slot.
    pub fn parameter(self) -> &'static str {
        match self {
            Self::Genre => "genre",
            Self::ReadingLevel => "reading_level",
            Self::Length => "length",
            Self::Criteria => "criteria",
            Self::BookTitle => "book_title",
            Self::BookInfo => "book_info",
            Self::Author => "author",
        }
    }
}

/// Where a turn leaves the conversation.
///
/// Nothing stores this; the platform's context lifespans are the only state.
/// Handlers report it so a turn can be logged and asserted on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "slot", rename_all = "snake_case")]
pub enum FlowState {
    AwaitingSlot(Slot),
    RecommendationGiven,
}

impl FlowState {
    pub fn label(self) -> &'static str {
        match self {
            Self::AwaitingSlot(Slot::Genre) => "await_genre",
            Self::AwaitingSlot(Slot::ReadingLevel) => "await_reading_level",
            Self::AwaitingSlot(Slot::Length) => "await_length",
            Self::AwaitingSlot(Slot::Criteria) => "await_criteria",
            Self::AwaitingSlot(Slot::BookTitle) => "await_book_title",
            Self::AwaitingSlot(Slot::BookInfo) => "await_book_info",
            Self::AwaitingSlot(Slot::Author) => "await_author",
            Self::RecommendationGiven => "recommendation_given",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::RecommendationGiven)
    }
}
