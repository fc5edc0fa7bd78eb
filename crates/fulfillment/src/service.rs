use std::sync::Arc;

use bookbot_core::catalog::Catalog;
use bookbot_core::domain::IntentRequest;

use crate::dispatcher::{default_dispatcher, DispatchContext, DispatchError, IntentDispatcher, TurnOutcome};
use crate::store::TurnContexts;
use crate::wire::{self, WebhookResponse};

/// Answer for intents nobody registered a handler for.
pub const UNHANDLED_INTENT_TEXT: &str = "I'm sorry, I can't help with that yet. You can ask me for book recommendations by genre, author, length, or a book you enjoyed.";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Fulfilled {
    pub outcome: TurnOutcome,
    pub webhook: WebhookResponse,
}

/// One request in, one webhook response out. Shared by the HTTP server and
/// the offline `bookbot fulfill` command.
pub struct FulfillmentService {
    dispatcher: IntentDispatcher,
}

impl FulfillmentService {
    pub fn new(dispatcher: IntentDispatcher) -> Self {
        Self { dispatcher }
    }

    pub fn with_catalog(catalog: Arc<Catalog>) -> Self {
        Self::new(default_dispatcher(catalog))
    }

    pub fn dispatcher(&self) -> &IntentDispatcher {
        &self.dispatcher
    }

    pub fn fulfill(
        &self,
        request: &IntentRequest,
        ctx: &DispatchContext,
    ) -> Result<Fulfilled, DispatchError> {
        let mut store = TurnContexts::new(request.contexts.clone());
        let outcome = self.dispatcher.dispatch(request, &mut store, ctx)?;
        let webhook = wire::encode(&outcome.response, store.into_writes(), request.session.as_deref());

        Ok(Fulfilled { outcome, webhook })
    }

    pub fn unhandled() -> WebhookResponse {
        WebhookResponse::text_only(UNHANDLED_INTENT_TEXT)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use bookbot_core::catalog::Catalog;
    use bookbot_core::domain::{Context, ContextKind, IntentRequest};
    use bookbot_core::flows::{FlowState, Slot};

    use super::{FulfillmentService, UNHANDLED_INTENT_TEXT};
    use crate::dispatcher::{DispatchContext, DispatchError};
    use crate::intents::Intent;

    const SESSION: &str = "projects/bookbot/agent/sessions/s-1";

    fn service() -> FulfillmentService {
        FulfillmentService::with_catalog(Arc::new(Catalog::embedded().expect("embedded catalog")))
    }

    #[test]
    fn fulfill_encodes_written_contexts_against_the_session() {
        let request = IntentRequest::new("MultiCriteriaRecommendationIntent")
            .with_parameter("length", "short")
            .with_session(SESSION);

        let fulfilled = service().fulfill(&request, &DispatchContext::default()).expect("fulfill");

        assert_eq!(fulfilled.outcome.intent, Intent::MultiCriteria);
        assert_eq!(fulfilled.outcome.state, FlowState::AwaitingSlot(Slot::Genre));
        assert_eq!(fulfilled.webhook.output_contexts.len(), 1);
        assert_eq!(
            fulfilled.webhook.output_contexts[0].name,
            format!("{SESSION}/contexts/length_selected")
        );
        assert_eq!(fulfilled.webhook.output_contexts[0].lifespan_count, 5);
    }

    #[test]
    fn inbound_contexts_are_not_echoed_back() {
        let request = IntentRequest::new("TopRatedBooksIntent")
            .with_session(SESSION)
            .with_context(Context::of_kind(ContextKind::GenreSelected).with_parameter("genre", "x"));

        let fulfilled = service().fulfill(&request, &DispatchContext::default()).expect("fulfill");

        assert!(fulfilled.webhook.output_contexts.is_empty());
    }

    #[test]
    fn unknown_intents_surface_as_dispatch_errors() {
        let request = IntentRequest::new("SmallTalkIntent");

        let result = service().fulfill(&request, &DispatchContext::default());

        assert_eq!(result, Err(DispatchError::UnhandledIntent("SmallTalkIntent".to_owned())));
        assert_eq!(FulfillmentService::unhandled().fulfillment_text, UNHANDLED_INTENT_TEXT);
    }
}
