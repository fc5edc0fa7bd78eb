pub mod context;
pub mod request;
pub mod response;

pub use context::{Context, ContextKind, ContextStore};
pub use request::{IntentRequest, Parameters};
pub use response::{Fragment, Response};
