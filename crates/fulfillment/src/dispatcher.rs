use std::{collections::HashMap, sync::Arc};

use bookbot_core::catalog::Catalog;
use bookbot_core::domain::{ContextStore, IntentRequest, Response};
use bookbot_core::errors::ApplicationError;
use bookbot_core::flows::FlowState;
use thiserror::Error;
use tracing::{debug, info};

use crate::handlers::{
    AuthorWorksHandler, BookInformationHandler, GenreRecommendationHandler, LengthInputHandler,
    MultiCriteriaHandler, ReadingLevelInputHandler, SimilarBooksHandler, TopRatedHandler,
};
use crate::intents::Intent;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DispatchContext {
    pub correlation_id: String,
}

impl Default for DispatchContext {
    fn default() -> Self {
        Self { correlation_id: "unknown-correlation-id".to_owned() }
    }
}

/// What one turn produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TurnOutcome {
    pub intent: Intent,
    pub state: FlowState,
    pub response: Response,
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DispatchError {
    #[error("no handler registered for intent `{0}`")]
    UnhandledIntent(String),
}

impl From<DispatchError> for ApplicationError {
    fn from(value: DispatchError) -> Self {
        match value {
            DispatchError::UnhandledIntent(intent) => ApplicationError::UnhandledIntent(intent),
        }
    }
}

pub trait IntentHandler: Send + Sync {
    fn intent(&self) -> Intent;

    /// Appends this turn's output to `response` and reports where the
    /// conversation was left. Missing slots and contexts are answered with
    /// a prompt, never an error.
    fn handle(
        &self,
        request: &IntentRequest,
        store: &mut dyn ContextStore,
        response: &mut Response,
    ) -> FlowState;
}

#[derive(Default)]
pub struct IntentDispatcher {
    handlers: HashMap<Intent, Arc<dyn IntentHandler>>,
}

impl IntentDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<H>(&mut self, handler: H)
    where
        H: IntentHandler + 'static,
    {
        self.handlers.insert(handler.intent(), Arc::new(handler));
    }

    pub fn dispatch(
        &self,
        request: &IntentRequest,
        store: &mut dyn ContextStore,
        ctx: &DispatchContext,
    ) -> Result<TurnOutcome, DispatchError> {
        let Some((intent, handler)) = request
            .intent
            .parse::<Intent>()
            .ok()
            .and_then(|intent| self.handlers.get(&intent).map(|handler| (intent, handler)))
        else {
            debug!(
                event_name = "fulfillment.intent.unhandled",
                correlation_id = %ctx.correlation_id,
                intent = %request.intent,
                "no handler registered for intent"
            );
            return Err(DispatchError::UnhandledIntent(request.intent.clone()));
        };

        let mut response = Response::new();
        let state = handler.handle(request, store, &mut response);

        info!(
            event_name = "fulfillment.intent.handled",
            correlation_id = %ctx.correlation_id,
            intent = intent.as_str(),
            session = request.session.as_deref().unwrap_or("unknown"),
            flow_state = state.label(),
            completed = state.is_terminal(),
            fragments = response.fragments().len(),
            "intent fulfilled"
        );

        Ok(TurnOutcome { intent, state, response })
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    pub fn handles(&self, intent: Intent) -> bool {
        self.handlers.contains_key(&intent)
    }
}

pub fn default_dispatcher(catalog: Arc<Catalog>) -> IntentDispatcher {
    let mut dispatcher = IntentDispatcher::new();
    dispatcher.register(GenreRecommendationHandler::new(catalog.clone()));
    dispatcher.register(SimilarBooksHandler::new(catalog.clone()));
    dispatcher.register(BookInformationHandler::new(catalog.clone()));
    dispatcher.register(TopRatedHandler::new(catalog.clone()));
    dispatcher.register(MultiCriteriaHandler::new(catalog.clone()));
    dispatcher.register(AuthorWorksHandler::new(catalog.clone()));
    dispatcher.register(ReadingLevelInputHandler::new(catalog.clone()));
    dispatcher.register(LengthInputHandler::new(catalog));
    dispatcher
}
