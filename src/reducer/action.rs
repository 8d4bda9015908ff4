use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt::Debug;

/// A request for a state transition.
///
/// `kind` is the discriminator reducers match on. It is also what the store
/// reports in logs and errors, so it should be short and stable.
pub trait Action: Debug {
    fn kind(&self) -> &str;
}

impl<A: Action + ?Sized> Action for Box<A> {
    fn kind(&self) -> &str {
        (**self).kind()
    }
}

/// An untyped action: a `type` string plus an optional JSON payload.
///
/// Useful when actions arrive from outside the program or are recorded for
/// later replay. Typed enums implementing [`Action`] are preferable otherwise.
///
/// ```
/// use reservoir::{Action, TaggedAction};
///
/// let action = TaggedAction::new("ADD_TODO").with_payload(serde_json::json!({ "title": "milk" }));
/// assert_eq!(action.kind(), "ADD_TODO");
/// assert_eq!(action.payload_field("title").and_then(|v| v.as_str()), Some("milk"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaggedAction {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<Value>,
}

impl TaggedAction {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            payload: None,
        }
    }

    pub fn with_payload(mut self, payload: Value) -> Self {
        self.payload = Some(payload);
        self
    }

    /// Look up a field of an object payload.
    pub fn payload_field(&self, field: &str) -> Option<&Value> {
        self.payload.as_ref()?.get(field)
    }
}

impl Action for TaggedAction {
    fn kind(&self) -> &str {
        &self.kind
    }
}
