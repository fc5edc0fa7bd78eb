use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Named conversation state carried by the platform between turns.
///
/// `name` is always the short form (`genre_selected`); expanding it to the
/// session-qualified resource name is the wire layer's job.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Context {
    pub name: String,
    pub lifespan: u32,
    pub parameters: BTreeMap<String, String>,
}

impl Context {
    pub fn new(name: impl Into<String>, lifespan: u32) -> Self {
        Self { name: name.into(), lifespan, parameters: BTreeMap::new() }
    }

    pub fn of_kind(kind: ContextKind) -> Self {
        Self::new(kind.name(), kind.lifespan())
    }

    pub fn with_parameter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.insert(key.into(), value.into());
        self
    }

    pub fn parameter(&self, key: &str) -> Option<&str> {
        self.parameters.get(key).map(String::as_str).filter(|value| !value.trim().is_empty())
    }
}

/// Contexts this service reads or writes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ContextKind {
    GenreSelected,
    LengthSelected,
    UserPreferences,
}

impl ContextKind {
    pub fn name(self) -> &'static str {
        match self {
            Self::GenreSelected => "genre_selected",
            Self::LengthSelected => "length_selected",
            Self::UserPreferences => "user_preferences",
        }
    }

    /// Turns the platform keeps the context alive for.
    pub fn lifespan(self) -> u32 {
        match self {
            Self::GenreSelected | Self::LengthSelected => 5,
            Self::UserPreferences => 50,
        }
    }
}

/// Key-value view over the platform's context store for a single turn.
pub trait ContextStore {
    fn get(&self, name: &str) -> Option<&Context>;
    fn set(&mut self, context: Context);

    fn get_kind(&self, kind: ContextKind) -> Option<&Context> {
        self.get(kind.name())
    }
}
