use std::sync::Arc;

use bookbot_core::catalog::{Catalog, Table};
use bookbot_core::domain::{Context, ContextKind, ContextStore, IntentRequest, Response};
use bookbot_core::flows::{FlowState, Slot};

use super::{remembered, slot};
use crate::dispatcher::IntentHandler;
use crate::intents::Intent;

const ASK_GENRE: &str =
    "What genre of books are you interested in? For example, science fiction, fantasy, mystery, etc.";
const ASK_READING_LEVEL: &str =
    "Great choice! Do you prefer books that are easy, moderate, or challenging to read?";
const READING_LEVEL_CHIPS: [&str; 3] = ["Easy", "Moderate", "Challenging"];
const GENRE_BEFORE_LEVEL: &str = "I need to know what genre you're interested in before I can consider reading level. What type of books do you enjoy?";
const FOLLOW_UP: &str = "\nWould you like more information about any of these books?";

pub struct GenreRecommendationHandler {
    catalog: Arc<Catalog>,
}

impl GenreRecommendationHandler {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self { catalog }
    }
}

impl IntentHandler for GenreRecommendationHandler {
    fn intent(&self) -> Intent {
        Intent::GenreRecommendation
    }

    fn handle(
        &self,
        request: &IntentRequest,
        store: &mut dyn ContextStore,
        response: &mut Response,
    ) -> FlowState {
        recommend_by_genre(&self.catalog, slot(request, Slot::Genre), store, response)
    }
}

/// Follow-up turn answering the reading-level question.
pub struct ReadingLevelInputHandler {
    catalog: Arc<Catalog>,
}

impl ReadingLevelInputHandler {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self { catalog }
    }
}

impl IntentHandler for ReadingLevelInputHandler {
    fn intent(&self) -> Intent {
        Intent::ReadingLevelInput
    }

    fn handle(
        &self,
        request: &IntentRequest,
        store: &mut dyn ContextStore,
        response: &mut Response,
    ) -> FlowState {
        if store.get_kind(ContextKind::GenreSelected).is_none() {
            response.text(GENRE_BEFORE_LEVEL);
            return FlowState::AwaitingSlot(Slot::Genre);
        }

        let genre = remembered(store, ContextKind::GenreSelected, Slot::Genre);
        match (genre, slot(request, Slot::ReadingLevel)) {
            (Some(genre), None) => ask_reading_level(&genre, store, response),
            (Some(genre), Some(level)) => {
                store.set(preferences(&genre, &level));
                recommend_by_genre(&self.catalog, Some(genre), store, response)
            }
            (None, _) => recommend_by_genre(&self.catalog, None, store, response),
        }
    }
}

fn recommend_by_genre(
    catalog: &Catalog,
    genre: Option<String>,
    store: &mut dyn ContextStore,
    response: &mut Response,
) -> FlowState {
    let Some(genre) = genre else {
        response.text(ASK_GENRE);
        return FlowState::AwaitingSlot(Slot::Genre);
    };

    let Some(level) = remembered(store, ContextKind::UserPreferences, Slot::ReadingLevel) else {
        return ask_reading_level(&genre, store, response);
    };

    let picks = catalog.pick(Table::GenrePicks, &genre);
    response.text(format!(
        "Based on your interest in {genre} books with {level} reading level, here are my recommendations:\n\n{}{FOLLOW_UP}",
        picks.text
    ));
    store.set(preferences(&genre, &level));

    FlowState::RecommendationGiven
}

fn ask_reading_level(genre: &str, store: &mut dyn ContextStore, response: &mut Response) -> FlowState {
    store.set(Context::of_kind(ContextKind::GenreSelected).with_parameter("genre", genre));
    response.text(ASK_READING_LEVEL).suggestions(READING_LEVEL_CHIPS);
    FlowState::AwaitingSlot(Slot::ReadingLevel)
}

fn preferences(genre: &str, level: &str) -> Context {
    Context::of_kind(ContextKind::UserPreferences)
        .with_parameter("genre", genre)
        .with_parameter("reading_level", level)
}
