use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Fragment {
    Text(String),
    Suggestion(String),
}

/// Ordered output of one turn.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Response {
    fragments: Vec<Fragment>,
}

impl Response {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&mut self, text: impl Into<String>) -> &mut Self {
        self.fragments.push(Fragment::Text(text.into()));
        self
    }

    pub fn suggestion(&mut self, label: impl Into<String>) -> &mut Self {
        self.fragments.push(Fragment::Suggestion(label.into()));
        self
    }

    pub fn suggestions<I, S>(&mut self, labels: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for label in labels {
            self.suggestion(label);
        }
        self
    }

    pub fn fragments(&self) -> &[Fragment] {
        &self.fragments
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.fragments.iter().filter_map(|fragment| match fragment {
            Fragment::Text(text) => Some(text.as_str()),
            Fragment::Suggestion(_) => None,
        })
    }

    pub fn suggestion_labels(&self) -> impl Iterator<Item = &str> {
        self.fragments.iter().filter_map(|fragment| match fragment {
            Fragment::Suggestion(label) => Some(label.as_str()),
            Fragment::Text(_) => None,
        })
    }

    /// All text fragments joined by newlines, as the platform's plain
    /// `fulfillmentText` expects.
    pub fn joined_text(&self) -> String {
        self.texts().collect::<Vec<_>>().join("\n")
    }
}
