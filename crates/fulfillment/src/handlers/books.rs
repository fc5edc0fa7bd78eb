use std::sync::Arc;

use bookbot_core::catalog::{Catalog, Table};
use bookbot_core::domain::{ContextStore, IntentRequest, Response};
use bookbot_core::flows::{FlowState, Slot};

use super::slot;
use crate::dispatcher::IntentHandler;
use crate::intents::Intent;

const ASK_BOOK_TITLE: &str = "What book did you enjoy that you want similar recommendations for?";
const ASK_BOOK_INFO: &str = "What book would you like information about?";
const ASK_AUTHOR: &str = "Which author are you interested in?";
const TOP_RATED_FOLLOW_UP: &str = "\nThese books have consistently received praise from readers worldwide. Would you like more information about any of them?";

pub struct SimilarBooksHandler {
    catalog: Arc<Catalog>,
}

impl SimilarBooksHandler {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self { catalog }
    }
}

impl IntentHandler for SimilarBooksHandler {
    fn intent(&self) -> Intent {
        Intent::SimilarBooks
    }

    fn handle(
        &self,
        request: &IntentRequest,
        _store: &mut dyn ContextStore,
        response: &mut Response,
    ) -> FlowState {
        let Some(title) = slot(request, Slot::BookTitle) else {
            response.text(ASK_BOOK_TITLE);
            return FlowState::AwaitingSlot(Slot::BookTitle);
        };

        let picks = self.catalog.pick(Table::SimilarBooks, &title);
        response.text(format!(
            "Since you enjoyed \"{title}\", you might also like:\n\n{}\nThese books share similar themes, styles, or settings with \"{title}\".",
            picks.text
        ));
        FlowState::RecommendationGiven
    }
}

pub struct BookInformationHandler {
    catalog: Arc<Catalog>,
}

impl BookInformationHandler {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self { catalog }
    }
}

impl IntentHandler for BookInformationHandler {
    fn intent(&self) -> Intent {
        Intent::BookInformation
    }

    fn handle(
        &self,
        request: &IntentRequest,
        _store: &mut dyn ContextStore,
        response: &mut Response,
    ) -> FlowState {
        let Some(book) = slot(request, Slot::BookInfo) else {
            response.text(ASK_BOOK_INFO);
            return FlowState::AwaitingSlot(Slot::BookInfo);
        };

        let details = self.catalog.pick(Table::BookDetails, &book);
        response.text(format!(
            "Here's information about \"{book}\":\n\n{}\nWould you like recommendations for similar books?",
            details.text
        ));
        FlowState::RecommendationGiven
    }
}

/// Genre is optional here; without one the all-time list is used.
pub struct TopRatedHandler {
    catalog: Arc<Catalog>,
}

impl TopRatedHandler {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self { catalog }
    }
}

impl IntentHandler for TopRatedHandler {
    fn intent(&self) -> Intent {
        Intent::TopRated
    }

    fn handle(
        &self,
        request: &IntentRequest,
        _store: &mut dyn ContextStore,
        response: &mut Response,
    ) -> FlowState {
        let text = match slot(request, Slot::Genre) {
            Some(genre) => format!(
                "Here are some of the highest-rated {genre} books:\n\n{}",
                self.catalog.pick(Table::TopRated, &genre).text
            ),
            None => format!(
                "Here are some of the highest-rated books of all time:\n\n{}",
                self.catalog.all_time_top_rated()
            ),
        };

        response.text(format!("{text}{TOP_RATED_FOLLOW_UP}"));
        FlowState::RecommendationGiven
    }
}

pub struct AuthorWorksHandler {
    catalog: Arc<Catalog>,
}

impl AuthorWorksHandler {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self { catalog }
    }
}

impl IntentHandler for AuthorWorksHandler {
    fn intent(&self) -> Intent {
        Intent::AuthorWorks
    }

    fn handle(
        &self,
        request: &IntentRequest,
        _store: &mut dyn ContextStore,
        response: &mut Response,
    ) -> FlowState {
        let Some(author) = slot(request, Slot::Author) else {
            response.text(ASK_AUTHOR);
            return FlowState::AwaitingSlot(Slot::Author);
        };

        // Works entries end with their own newline; no blank line before the question.
        let works = self.catalog.pick(Table::AuthorWorks, &author);
        response.text(format!(
            "Here are some notable works by {author}:\n\n{}Would you like recommendations for similar authors?",
            works.text
        ));
        FlowState::RecommendationGiven
    }
}

#[cfg(test)]
mod tests {
    use bookbot_core::domain::{Context, ContextKind, IntentRequest};
    use bookbot_core::flows::{FlowState, Slot};

    use super::{AuthorWorksHandler, BookInformationHandler, SimilarBooksHandler, TopRatedHandler};
    use crate::handlers::test_support::{catalog, run};

    #[test]
    fn similar_books_asks_for_a_title() {
        let turn = run(
            &SimilarBooksHandler::new(catalog()),
            IntentRequest::new("SimilarBookRecommendationIntent"),
        );

        assert_eq!(
            turn.response.joined_text(),
            "What book did you enjoy that you want similar recommendations for?"
        );
        assert_eq!(turn.state, FlowState::AwaitingSlot(Slot::BookTitle));
    }

    #[test]
    fn similar_books_match_on_title_keywords() {
        let request = IntentRequest::new("SimilarBookRecommendationIntent")
            .with_parameter("book_title", "A Song of Ice and Fire");
        let turn = run(&SimilarBooksHandler::new(catalog()), request);

        let text = turn.response.joined_text();
        assert!(text.starts_with("Since you enjoyed \"A Song of Ice and Fire\", you might also like:\n\n"));
        assert!(text.contains("\"The Wheel of Time\" by Robert Jordan"));
        assert!(text.ends_with(
            "Unique magic system\n\nThese books share similar themes, styles, or settings with \"A Song of Ice and Fire\"."
        ));
        assert!(turn.writes.is_empty());
    }

    #[test]
    fn similar_books_fall_back_for_unknown_titles() {
        let request = IntentRequest::new("SimilarBookRecommendationIntent")
            .with_parameter("book_title", "Middlemarch");
        let turn = run(&SimilarBooksHandler::new(catalog()), request);

        assert!(turn.response.joined_text().contains("\"The Catcher in the Rye\" by J.D. Salinger"));
    }

    #[test]
    fn book_information_for_a_known_title() {
        let request =
            IntentRequest::new("BookInformationIntent").with_parameter("book_info", "1984");
        let turn = run(&BookInformationHandler::new(catalog()), request);

        let text = turn.response.joined_text();
        assert!(text.starts_with("Here's information about \"1984\":\n\nAuthor: George Orwell\n"));
        assert!(text.contains("Published: 1949"));
        assert!(text.ends_with("rebels against the Party.\n\nWould you like recommendations for similar books?"));
        assert_eq!(turn.state, FlowState::RecommendationGiven);
    }

    #[test]
    fn book_information_for_an_unknown_title_is_never_empty() {
        let request = IntentRequest::new("BookInformationIntent")
            .with_parameter("book_info", "The Left Hand of Darkness");
        let turn = run(&BookInformationHandler::new(catalog()), request);

        let text = turn.response.joined_text();
        assert!(text.contains("Author: [Author information not available]"));
        assert!(text.contains(
            "\nI apologize, but I don't have detailed information about this specific book in my database.\n"
        ));
        assert!(text.ends_with("Would you like recommendations for similar books?"));
    }

    #[test]
    fn book_information_asks_for_a_book() {
        let turn =
            run(&BookInformationHandler::new(catalog()), IntentRequest::new("BookInformationIntent"));

        assert_eq!(turn.response.joined_text(), "What book would you like information about?");
        assert_eq!(turn.state, FlowState::AwaitingSlot(Slot::BookInfo));
    }

    #[test]
    fn top_rated_for_a_genre() {
        let request =
            IntentRequest::new("TopRatedBooksIntent").with_parameter("genre", "thriller");
        let turn = run(&TopRatedHandler::new(catalog()), request);

        let text = turn.response.joined_text();
        assert!(text.starts_with("Here are some of the highest-rated thriller books:\n\n1. \"Gone Girl\""));
        assert!(text.ends_with(
            "(6,100+ ratings)\n\nThese books have consistently received praise from readers worldwide. Would you like more information about any of them?"
        ));
    }

    #[test]
    fn top_rated_without_genre_uses_all_time_list() {
        let turn = run(&TopRatedHandler::new(catalog()), IntentRequest::new("TopRatedBooksIntent"));

        let text = turn.response.joined_text();
        assert!(text.starts_with("Here are some of the highest-rated books of all time:\n\n"));
        assert!(text.contains("\"To Kill a Mockingbird\" by Harper Lee - 4.8/5 (10,000+ ratings)"));
        assert_eq!(turn.state, FlowState::RecommendationGiven);
    }

    #[test]
    fn top_rated_ignores_contexts() {
        let request = IntentRequest::new("TopRatedBooksIntent").with_context(
            Context::of_kind(ContextKind::UserPreferences).with_parameter("genre", "fantasy"),
        );
        let turn = run(&TopRatedHandler::new(catalog()), request);

        assert!(turn.response.joined_text().contains("of all time"));
        assert!(turn.writes.is_empty());
    }

    #[test]
    fn author_works_for_a_known_author() {
        let request = IntentRequest::new("AuthorBasedRecommendationIntent")
            .with_parameter("author", "J.R.R. Tolkien");
        let turn = run(&AuthorWorksHandler::new(catalog()), request);

        let text = turn.response.joined_text();
        assert!(text.starts_with("Here are some notable works by J.R.R. Tolkien:\n\n1. \"The Hobbit\" (1937)"));
        assert!(text.ends_with(
            "is his most famous and influential work.\nWould you like recommendations for similar authors?"
        ));
    }

    #[test]
    fn author_works_for_an_unknown_author() {
        let request = IntentRequest::new("AuthorBasedRecommendationIntent")
            .with_parameter("author", "Octavia Butler");
        let turn = run(&AuthorWorksHandler::new(catalog()), request);

        assert!(turn.response.joined_text().contains("I have limited information about this author"));
    }

    #[test]
    fn author_works_asks_for_an_author() {
        let turn = run(
            &AuthorWorksHandler::new(catalog()),
            IntentRequest::new("AuthorBasedRecommendationIntent"),
        );

        assert_eq!(turn.response.joined_text(), "Which author are you interested in?");
        assert_eq!(turn.state, FlowState::AwaitingSlot(Slot::Author));
    }
}
