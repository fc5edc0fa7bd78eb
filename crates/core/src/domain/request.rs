use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::context::Context;

/// Slot values extracted by the platform for one turn.
///
/// Unfilled slots arrive as empty strings; they are stored as absent so
/// handlers only ever see `Some` for a usable value.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameters(BTreeMap<String, String>);

impl Parameters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let value = value.into();
        let key = key.into();
        if value.trim().is_empty() {
            self.0.remove(&key);
        } else {
            self.0.insert(key, value);
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(key, value)| (key.as_str(), value.as_str()))
    }
}

impl<K, V> FromIterator<(K, V)> for Parameters
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut parameters = Self::new();
        for (key, value) in iter {
            parameters.insert(key, value);
        }
        parameters
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IntentRequest {
    pub intent: String,
    pub parameters: Parameters,
    pub contexts: Vec<Context>,
    pub session: Option<String>,
    pub response_id: Option<String>,
    pub query_text: Option<String>,
}

impl IntentRequest {
    pub fn new(intent: impl Into<String>) -> Self {
        Self {
            intent: intent.into(),
            parameters: Parameters::new(),
            contexts: Vec::new(),
            session: None,
            response_id: None,
            query_text: None,
        }
    }

    pub fn with_parameter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.insert(key, value);
        self
    }

    pub fn with_context(mut self, context: Context) -> Self {
        self.contexts.push(context);
        self
    }

    pub fn with_session(mut self, session: impl Into<String>) -> Self {
        self.session = Some(session.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::{IntentRequest, Parameters};

    #[test]
    fn empty_values_are_treated_as_missing() {
        let parameters: Parameters =
            [("genre", "fantasy"), ("reading_level", ""), ("length", "   ")].into_iter().collect();

        assert_eq!(parameters.get("genre"), Some("fantasy"));
        assert_eq!(parameters.get("reading_level"), None);
        assert_eq!(parameters.get("length"), None);
        assert_eq!(parameters.len(), 1);
    }

    #[test]
    fn inserting_a_blank_value_clears_a_previous_one() {
        let mut parameters = Parameters::new().with("genre", "mystery");
        parameters.insert("genre", "");

        assert!(parameters.is_empty());
    }

    #[test]
    fn request_builder_collects_parameters() {
        let request = IntentRequest::new("BookInformationIntent")
            .with_parameter("book_info", "1984")
            .with_session("projects/demo/agent/sessions/abc");

        assert_eq!(request.parameters.get("book_info"), Some("1984"));
        assert_eq!(request.session.as_deref(), Some("projects/demo/agent/sessions/abc"));
        assert!(request.contexts.is_empty());
    }
}
