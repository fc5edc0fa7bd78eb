pub mod states;

pub use states::{FlowState, Slot};
