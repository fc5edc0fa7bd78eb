use std::sync::Arc;

use bookbot_core::catalog::Catalog;
use bookbot_core::domain::{Context, ContextKind, ContextStore, IntentRequest, Response};
use bookbot_core::flows::{FlowState, Slot};

use super::{remembered, slot};
use crate::dispatcher::IntentHandler;
use crate::intents::Intent;

const ASK_CRITERIA: &str = "I can recommend books based on specific criteria. Would you like recommendations based on genre, book length, or both?";
const CRITERIA_CHIPS: [&str; 3] = ["Genre", "Book length", "Both"];
const LENGTH_CHIPS: [&str; 3] = ["Short books", "Medium-length books", "Long books"];
const GENRE_CHIPS: [&str; 4] = ["Fantasy", "Science Fiction", "Mystery", "Romance"];
const GENRE_BEFORE_LENGTH: &str =
    "I need to know what genre you're interested in as well. What type of books do you enjoy?";

pub struct MultiCriteriaHandler {
    catalog: Arc<Catalog>,
}

impl MultiCriteriaHandler {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self { catalog }
    }
}

impl IntentHandler for MultiCriteriaHandler {
    fn intent(&self) -> Intent {
        Intent::MultiCriteria
    }

    fn handle(
        &self,
        request: &IntentRequest,
        store: &mut dyn ContextStore,
        response: &mut Response,
    ) -> FlowState {
        let genre = slot(request, Slot::Genre);
        // A length chosen on an earlier turn completes a genre given now.
        let mut length = slot(request, Slot::Length);
        if length.is_none() && genre.is_some() {
            length = remembered(store, ContextKind::LengthSelected, Slot::Length);
        }

        recommend_by_criteria(&self.catalog, genre, length, store, response)
    }
}

/// Follow-up turn answering the length question.
pub struct LengthInputHandler {
    catalog: Arc<Catalog>,
}

impl LengthInputHandler {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self { catalog }
    }
}

impl IntentHandler for LengthInputHandler {
    fn intent(&self) -> Intent {
        Intent::LengthInput
    }

    fn handle(
        &self,
        request: &IntentRequest,
        store: &mut dyn ContextStore,
        response: &mut Response,
    ) -> FlowState {
        if store.get_kind(ContextKind::GenreSelected).is_none() {
            response.text(GENRE_BEFORE_LENGTH);
            return FlowState::AwaitingSlot(Slot::Genre);
        }

        let genre = remembered(store, ContextKind::GenreSelected, Slot::Genre);
        recommend_by_criteria(&self.catalog, genre, slot(request, Slot::Length), store, response)
    }
}

fn recommend_by_criteria(
    catalog: &Catalog,
    genre: Option<String>,
    length: Option<String>,
    store: &mut dyn ContextStore,
    response: &mut Response,
) -> FlowState {
    match (genre, length) {
        (None, None) => {
            response.text(ASK_CRITERIA).suggestions(CRITERIA_CHIPS);
            FlowState::AwaitingSlot(Slot::Criteria)
        }
        (Some(genre), None) => {
            store.set(Context::of_kind(ContextKind::GenreSelected).with_parameter("genre", &genre));
            response
                .text(format!(
                    "Great! You're interested in {genre} books. Do you prefer short books (under 300 pages), medium-length books (300-500 pages), or long books (over 500 pages)?"
                ))
                .suggestions(LENGTH_CHIPS);
            FlowState::AwaitingSlot(Slot::Length)
        }
        (None, Some(length)) => {
            store.set(Context::of_kind(ContextKind::LengthSelected).with_parameter("length", &length));
            response
                .text(format!(
                    "I see you're looking for {length} books. What genre are you interested in?"
                ))
                .suggestions(GENRE_CHIPS);
            FlowState::AwaitingSlot(Slot::Genre)
        }
        (Some(genre), Some(length)) => {
            let picks = catalog.criteria_pick(&genre, &length);
            response.text(format!(
                "Based on your criteria (genre: {genre}, length: {length}), here are some recommendations:\n\n{}\nWould you like more information about any of these books?",
                picks.text
            ));
            FlowState::RecommendationGiven
        }
    }
}
