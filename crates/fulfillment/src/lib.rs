//! Webhook fulfillment for the book recommendation agent.
//!
//! - **Wire** (`wire`) - Dialogflow ES v2 request/response bodies
//! - **Store** (`store`) - per-turn view over the platform's contexts
//! - **Intents** (`intents`) - the display names this service answers
//! - **Dispatcher** (`dispatcher`) - routes one intent to one handler
//! - **Handlers** (`handlers`) - slot filling and catalog lookups
//!
//! ```text
//! WebhookRequest → IntentRequest → IntentDispatcher → Handler → Response
//!                                        ↕                         ↓
//!                                   TurnContexts  →  WebhookResponse (text, chips, contexts)
//! ```

pub mod dispatcher;
pub mod handlers;
pub mod intents;
pub mod service;
pub mod store;
pub mod wire;

pub use dispatcher::{
    default_dispatcher, DispatchContext, DispatchError, IntentDispatcher, IntentHandler,
    TurnOutcome,
};
pub use intents::Intent;
pub use service::{Fulfilled, FulfillmentService, UNHANDLED_INTENT_TEXT};
pub use store::TurnContexts;
pub use wire::{WebhookRequest, WebhookResponse, WireError};
