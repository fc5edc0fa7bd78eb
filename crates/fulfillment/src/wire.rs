//! Dialogflow ES v2 webhook request and response bodies.
//!
//! Only the fields the fulfillment reads or writes are modelled; everything
//! else in the platform's payload is ignored on decode.

use std::collections::BTreeMap;

use bookbot_core::domain::{Context, Fragment, IntentRequest, Parameters, Response};
use bookbot_core::errors::ApplicationError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

const CONTEXT_SEGMENT: &str = "/contexts/";

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum WireError {
    #[error("request body is not a valid webhook request: {0}")]
    InvalidJson(String),
    #[error("request is missing `{0}`")]
    MissingField(&'static str),
}

impl From<WireError> for ApplicationError {
    fn from(value: WireError) -> Self {
        ApplicationError::MalformedRequest(value.to_string())
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookRequest {
    #[serde(default)]
    pub response_id: Option<String>,
    #[serde(default)]
    pub session: Option<String>,
    #[serde(default)]
    pub query_result: Option<QueryResult>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResult {
    #[serde(default)]
    pub query_text: Option<String>,
    #[serde(default)]
    pub parameters: Option<Map<String, Value>>,
    #[serde(default)]
    pub output_contexts: Option<Vec<WireContext>>,
    #[serde(default)]
    pub intent: Option<WireIntent>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireIntent {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireContext {
    pub name: String,
    #[serde(default)]
    pub lifespan_count: Option<u32>,
    #[serde(default)]
    pub parameters: Option<Map<String, Value>>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookResponse {
    pub fulfillment_text: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fulfillment_messages: Vec<Message>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub output_contexts: Vec<OutputContext>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Message {
    #[serde(rename = "text")]
    Text { text: Vec<String> },
    #[serde(rename = "quickReplies")]
    QuickReplies {
        #[serde(rename = "quickReplies")]
        quick_replies: Vec<String>,
    },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputContext {
    pub name: String,
    pub lifespan_count: u32,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub parameters: BTreeMap<String, String>,
}

pub fn decode(body: &[u8]) -> Result<IntentRequest, WireError> {
    let request = serde_json::from_slice::<WebhookRequest>(body)
        .map_err(|error| WireError::InvalidJson(error.to_string()))?;
    request.into_intent_request()
}

impl WebhookRequest {
    pub fn into_intent_request(self) -> Result<IntentRequest, WireError> {
        let query = self.query_result.ok_or(WireError::MissingField("queryResult"))?;
        let intent = query
            .intent
            .and_then(|intent| intent.display_name)
            .filter(|name| !name.trim().is_empty())
            .ok_or(WireError::MissingField("queryResult.intent.displayName"))?;

        let parameters = query.parameters.as_ref().map(scalar_parameters).unwrap_or_default();
        let contexts = query
            .output_contexts
            .unwrap_or_default()
            .into_iter()
            .map(WireContext::into_context)
            .collect();

        Ok(IntentRequest {
            intent,
            parameters: Parameters::from_iter(parameters),
            contexts,
            session: self.session.filter(|session| !session.trim().is_empty()),
            response_id: self.response_id.filter(|id| !id.trim().is_empty()),
            query_text: query.query_text,
        })
    }
}

impl WireContext {
    pub fn into_context(self) -> Context {
        Context {
            name: short_context_name(&self.name).to_owned(),
            lifespan: self.lifespan_count.unwrap_or_default(),
            parameters: self.parameters.as_ref().map(scalar_parameters).unwrap_or_default(),
        }
    }
}

impl WebhookResponse {
    /// A plain answer with no chips and no context writes.
    pub fn text_only(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            fulfillment_messages: vec![Message::Text { text: vec![text.clone()] }],
            fulfillment_text: text,
            output_contexts: Vec::new(),
        }
    }
}

pub fn encode(response: &Response, writes: Vec<Context>, session: Option<&str>) -> WebhookResponse {
    let mut messages = Vec::new();
    let mut quick_replies = Vec::new();
    for fragment in response.fragments() {
        match fragment {
            Fragment::Text(text) => messages.push(Message::Text { text: vec![text.clone()] }),
            Fragment::Suggestion(label) => quick_replies.push(label.clone()),
        }
    }
    if !quick_replies.is_empty() {
        messages.push(Message::QuickReplies { quick_replies });
    }

    let output_contexts = writes
        .into_iter()
        .map(|context| OutputContext {
            name: qualified_context_name(session, &context.name),
            lifespan_count: context.lifespan,
            parameters: context.parameters,
        })
        .collect();

    WebhookResponse {
        fulfillment_text: response.joined_text(),
        fulfillment_messages: messages,
        output_contexts,
    }
}

/// `projects/p/agent/sessions/s/contexts/genre_selected` -> `genre_selected`.
pub fn short_context_name(name: &str) -> &str {
    name.rsplit_once(CONTEXT_SEGMENT).map_or(name, |(_, short)| short)
}

pub fn qualified_context_name(session: Option<&str>, name: &str) -> String {
    match session {
        Some(session) => format!("{}{CONTEXT_SEGMENT}{name}", session.trim_end_matches('/')),
        None => name.to_owned(),
    }
}

// Strings pass through, numbers and booleans are rendered, anything structured
// is dropped. Blank values are dropped later by `Parameters`.
fn scalar_parameters(raw: &Map<String, Value>) -> BTreeMap<String, String> {
    raw.iter()
        .filter_map(|(key, value)| {
            let value = match value {
                Value::String(value) => value.clone(),
                Value::Number(number) => number.to_string(),
                Value::Bool(flag) => flag.to_string(),
                Value::Null | Value::Array(_) | Value::Object(_) => return None,
            };
            Some((key.clone(), value))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use bookbot_core::domain::{Context, ContextKind, Response};
    use bookbot_core::errors::ApplicationError;
    use serde_json::json;

    use super::{
        decode, encode, qualified_context_name, short_context_name, Message, WebhookResponse,
        WireError,
    };

    const SESSION: &str = "projects/bookbot/agent/sessions/abc123";

    #[test]
    fn decodes_the_fields_handlers_use() {
        let body = json!({
            "responseId": "resp-1",
            "session": SESSION,
            "queryResult": {
                "queryText": "recommend me a fantasy book",
                "parameters": { "genre": "fantasy", "reading_level": "", "count": 3, "tags": ["a"] },
                "outputContexts": [{
                    "name": format!("{SESSION}/contexts/user_preferences"),
                    "lifespanCount": 49,
                    "parameters": { "reading_level": "easy", "reading_level.original": "Easy" }
                }],
                "intent": { "name": "projects/bookbot/agent/intents/1", "displayName": "GenreBasedRecommendationIntent" }
            }
        });

        let request = decode(body.to_string().as_bytes()).expect("decode");

        assert_eq!(request.intent, "GenreBasedRecommendationIntent");
        assert_eq!(request.response_id.as_deref(), Some("resp-1"));
        assert_eq!(request.session.as_deref(), Some(SESSION));
        assert_eq!(request.query_text.as_deref(), Some("recommend me a fantasy book"));
        assert_eq!(request.parameters.get("genre"), Some("fantasy"));
        assert_eq!(request.parameters.get("reading_level"), None);
        assert_eq!(request.parameters.get("count"), Some("3"));
        assert_eq!(request.parameters.get("tags"), None);
        assert_eq!(request.contexts.len(), 1);
        assert_eq!(request.contexts[0].name, "user_preferences");
        assert_eq!(request.contexts[0].lifespan, 49);
        assert_eq!(request.contexts[0].parameter("reading_level"), Some("easy"));
    }

    #[test]
    fn missing_display_name_is_rejected() {
        let body = json!({ "queryResult": { "queryText": "hi", "intent": {} } });

        let error = decode(body.to_string().as_bytes()).expect_err("must fail");
        assert_eq!(error, WireError::MissingField("queryResult.intent.displayName"));
        assert!(matches!(ApplicationError::from(error), ApplicationError::MalformedRequest(_)));
    }

    #[test]
    fn invalid_json_is_rejected() {
        assert!(matches!(decode(b"{not json"), Err(WireError::InvalidJson(_))));
        assert_eq!(decode(b"{}").expect_err("no query result"), WireError::MissingField("queryResult"));
    }

    #[test]
    fn null_collections_read_as_empty() {
        let body = json!({
            "queryResult": {
                "parameters": null,
                "outputContexts": null,
                "intent": { "displayName": "TopRatedBooksIntent" }
            }
        });

        let request = decode(body.to_string().as_bytes()).expect("decode");
        assert!(request.parameters.is_empty());
        assert!(request.contexts.is_empty());
        assert_eq!(request.session, None);
    }

    #[test]
    fn encodes_text_chips_and_qualified_contexts() {
        let mut response = Response::new();
        response.text("Pick a level").suggestions(["Easy", "Moderate"]);
        let writes =
            vec![Context::of_kind(ContextKind::GenreSelected).with_parameter("genre", "fantasy")];

        let encoded = encode(&response, writes, Some(SESSION));
        let value = serde_json::to_value(&encoded).expect("serialize");

        assert_eq!(
            value,
            json!({
                "fulfillmentText": "Pick a level",
                "fulfillmentMessages": [
                    { "text": { "text": ["Pick a level"] } },
                    { "quickReplies": { "quickReplies": ["Easy", "Moderate"] } }
                ],
                "outputContexts": [{
                    "name": format!("{SESSION}/contexts/genre_selected"),
                    "lifespanCount": 5,
                    "parameters": { "genre": "fantasy" }
                }]
            })
        );
    }

    #[test]
    fn text_only_response_has_no_contexts() {
        let value = serde_json::to_value(WebhookResponse::text_only("hello")).expect("serialize");

        assert_eq!(
            value,
            json!({ "fulfillmentText": "hello", "fulfillmentMessages": [{ "text": { "text": ["hello"] } }] })
        );
    }

    #[test]
    fn responses_decode_back_for_offline_inspection() {
        let raw = json!({
            "fulfillmentText": "a",
            "fulfillmentMessages": [{ "quickReplies": { "quickReplies": ["x"] } }]
        });

        let decoded: WebhookResponse = serde_json::from_value(raw).expect("deserialize");
        assert_eq!(decoded.fulfillment_messages, vec![Message::QuickReplies { quick_replies: vec!["x".to_owned()] }]);
        assert!(decoded.output_contexts.is_empty());
    }

    #[test]
    fn context_names_map_between_short_and_qualified_forms() {
        assert_eq!(short_context_name(&format!("{SESSION}/contexts/length_selected")), "length_selected");
        assert_eq!(short_context_name("length_selected"), "length_selected");
        assert_eq!(
            qualified_context_name(Some(SESSION), "user_preferences"),
            format!("{SESSION}/contexts/user_preferences")
        );
        assert_eq!(qualified_context_name(None, "user_preferences"), "user_preferences");
    }
}
