//! GraphQL operation payloads and the response envelope.

use serde::{Deserialize, Serialize};

use crate::error::GraphqlError;

/// Whether an operation reads or writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    /// A read operation.
    Query,
    /// A write operation.
    Mutation,
}

/// A GraphQL operation to execute.
///
/// Ephemeral: constructed per call, never persisted. The document text is
/// forwarded verbatim; parsing is the execution engine's concern.
#[derive(Debug, Clone)]
pub struct Operation {
    /// Query or mutation.
    pub kind: OperationKind,
    /// GraphQL document text.
    pub document: String,
    /// Operation variables.
    pub variables: serde_json::Value,
    /// Optional operation name carried in the wire body.
    pub operation_name: Option<String>,
}

impl Operation {
    /// Create a query operation.
    #[must_use]
    pub fn query(document: impl Into<String>, variables: serde_json::Value) -> Self {
        Self {
            kind: OperationKind::Query,
            document: document.into(),
            variables,
            operation_name: None,
        }
    }

    /// Create a mutation operation.
    #[must_use]
    pub fn mutation(document: impl Into<String>, variables: serde_json::Value) -> Self {
        Self {
            kind: OperationKind::Mutation,
            document: document.into(),
            variables,
            operation_name: None,
        }
    }

    /// Attach an operation name.
    #[must_use]
    pub fn with_operation_name(mut self, name: impl Into<String>) -> Self {
        self.operation_name = Some(name.into());
        self
    }

    /// Wire body: `{query, variables}` plus `operationName` when set.
    #[must_use]
    pub fn to_body(&self) -> serde_json::Value {
        let mut body = serde_json::Map::new();
        body.insert(
            "query".to_string(),
            serde_json::Value::String(self.document.clone()),
        );
        body.insert("variables".to_string(), self.variables.clone());
        if let Some(name) = &self.operation_name {
            body.insert(
                "operationName".to_string(),
                serde_json::Value::String(name.clone()),
            );
        }
        serde_json::Value::Object(body)
    }
}

/// GraphQL response container.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct GraphqlResponse<T> {
    /// Response data.
    #[serde(default)]
    pub data: Option<T>,
    /// GraphQL errors.
    #[serde(default)]
    pub errors: Vec<GraphqlError>,
    /// Extensions payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<serde_json::Value>,
}

impl<T> GraphqlResponse<T> {
    /// Returns `true` if no GraphQL errors were returned.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_carries_query_and_variables() {
        let operation = Operation::query("query{ping}", serde_json::json!({"x": 1}));
        let body = operation.to_body();
        assert_eq!(body["query"], "query{ping}");
        assert_eq!(body["variables"]["x"], 1);
        assert!(body.get("operationName").is_none());
    }

    #[test]
    fn body_includes_operation_name_when_set() {
        let operation =
            Operation::mutation("mutation{doThing}", serde_json::json!({})).with_operation_name("DoThing");
        let body = operation.to_body();
        assert_eq!(body["operationName"], "DoThing");
        assert_eq!(operation.kind, OperationKind::Mutation);
    }

    #[test]
    fn response_envelope_decodes_errors_only() {
        let response: GraphqlResponse<serde_json::Value> = serde_json::from_value(
            serde_json::json!({"errors": [{"message": "boom"}]}),
        )
        .expect("decode");
        assert!(!response.is_ok());
        assert!(response.data.is_none());
        assert_eq!(response.errors[0].message, "boom");
    }
}
