//! The eight intent handlers.
//!
//! Every handler follows the same shape: read its slot, ask for it when it is
//! missing, classify the value against the catalog, then answer with the
//! matching entry and a follow-up question. Continuation intents reuse the
//! handler they continue with the slot recovered from a context.

mod books;
mod criteria;
mod genre;

use bookbot_core::domain::{ContextKind, ContextStore, IntentRequest};
use bookbot_core::flows::Slot;

pub use books::{AuthorWorksHandler, BookInformationHandler, SimilarBooksHandler, TopRatedHandler};
pub use criteria::{LengthInputHandler, MultiCriteriaHandler};
pub use genre::{GenreRecommendationHandler, ReadingLevelInputHandler};

fn slot(request: &IntentRequest, slot: Slot) -> Option<String> {
    request.parameters.get(slot.parameter()).map(str::to_owned)
}

fn remembered(store: &dyn ContextStore, kind: ContextKind, slot: Slot) -> Option<String> {
    store.get_kind(kind).and_then(|context| context.parameter(slot.parameter())).map(str::to_owned)
}
