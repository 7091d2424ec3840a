use std::ops::Index;

use reqwest::StatusCode;
use serde_json::{Map, Value, json};

use crate::error::Error;
use crate::transactions::transport::RawOutcome;
use crate::{GATEWAY, Result};

const ERROR_KEY: &str = "Error";
const TRANSACTION_STATUS: &str = "transaction_status";

static NULL: Value = Value::Null;

#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum_macros::Display)]
#[strum(serialize_all = "snake_case")]
pub enum ResponseKind {
    Success,
    GatewayError,
    InternalError,
}

/// Normalized result of one transaction.
#[non_exhaustive]
#[derive(Debug)]
pub enum Response {
    /// Parsed JSON body of a 2xx response.
    Success {
        status: StatusCode,
        body: Map<String, Value>,
    },
    /// Parsed JSON body of a non-2xx response authored by the gateway.
    GatewayError {
        status: StatusCode,
        body: Map<String, Value>,
    },
    /// Transport failure or unparsable body.
    ///
    /// `body` is always synthesized locally as `{"Error": {"messages": ...}}`.
    InternalError {
        status: Option<StatusCode>,
        body: Map<String, Value>,
        source: Error,
    },
}

impl Response {
    #[must_use]
    pub fn from_outcome(outcome: RawOutcome) -> Self {
        match outcome {
            RawOutcome::Success { status, body } => match parse(&body) {
                Ok(parsed) => Response::Success {
                    status,
                    body: parsed,
                },
                Err(e) => Self::invalid(status, &body, e),
            },
            RawOutcome::GatewayError { status, body } => match parse(&body) {
                Ok(parsed) => {
                    #[cfg(feature = "tracing")]
                    tracing::warn!(status = %status, body = ?parsed, "gateway rejected transaction");

                    Response::GatewayError {
                        status,
                        body: parsed,
                    }
                }
                Err(e) => Self::invalid(status, &body, e),
            },
            RawOutcome::TransportFailure(source) => {
                #[cfg(feature = "tracing")]
                tracing::warn!(error = %source, "transaction did not reach the gateway");

                Response::InternalError {
                    status: None,
                    body: error_payload(source.to_string()),
                    source,
                }
            }
        }
    }

    fn invalid(status: StatusCode, raw: &str, source: Error) -> Self {
        #[cfg(feature = "tracing")]
        tracing::warn!(status = %status, raw = %raw, "gateway returned a non-JSON body");

        Response::InternalError {
            status: Some(status),
            body: json_error(raw),
            source,
        }
    }

    #[must_use]
    pub const fn kind(&self) -> ResponseKind {
        match self {
            Response::Success { .. } => ResponseKind::Success,
            Response::GatewayError { .. } => ResponseKind::GatewayError,
            Response::InternalError { .. } => ResponseKind::InternalError,
        }
    }

    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Response::Success { .. })
    }

    /// HTTP status, if a response was received at all.
    #[must_use]
    pub const fn status(&self) -> Option<StatusCode> {
        match self {
            Response::Success { status, .. } | Response::GatewayError { status, .. } => {
                Some(*status)
            }
            Response::InternalError { status, .. } => *status,
        }
    }

    #[must_use]
    pub const fn body(&self) -> &Map<String, Value> {
        match self {
            Response::Success { body, .. }
            | Response::GatewayError { body, .. }
            | Response::InternalError { body, .. } => body,
        }
    }

    #[must_use]
    pub fn into_body(self) -> Map<String, Value> {
        match self {
            Response::Success { body, .. }
            | Response::GatewayError { body, .. }
            | Response::InternalError { body, .. } => body,
        }
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.body().get(key)
    }

    /// Human-readable summary, see [`handle_message`].
    #[must_use]
    pub fn message(&self) -> String {
        handle_message(self.body(), self.is_success())
    }

    /// Converts into a plain `Result`, turning both error variants into [`Error`].
    pub fn into_result(self) -> Result<Map<String, Value>> {
        match self {
            Response::Success { body, .. } => Ok(body),
            Response::GatewayError { status, body } => {
                Err(Error::status(status, handle_message(&body, false)))
            }
            Response::InternalError { source, .. } => Err(source),
        }
    }
}

impl<'key> Index<&'key str> for Response {
    type Output = Value;

    fn index(&self, key: &'key str) -> &Value {
        self.get(key).unwrap_or(&NULL)
    }
}

/// Parses a response body, accepting JSON objects only.
pub fn parse(body: &str) -> Result<Map<String, Value>> {
    Ok(serde_json::from_str(body)?)
}

/// Payload substituted for a body the gateway sent that is not a JSON object.
#[must_use]
pub fn json_error(raw: &str) -> Map<String, Value> {
    error_payload(format!("{GATEWAY} has returned an invalid response: [{raw}]"))
}

fn error_payload(message: String) -> Map<String, Value> {
    let mut payload = Map::new();
    payload.insert(ERROR_KEY.to_owned(), json!({ "messages": message }));
    payload
}

/// Formats a response body for display.
///
/// Successful bodies yield their `transaction_status`. Error bodies yield
/// every message string under `Error` joined with `". "`. Anything else is
/// rendered with `Debug`.
#[must_use]
pub fn handle_message(body: &Map<String, Value>, success: bool) -> String {
    if success {
        return match body.get(TRANSACTION_STATUS) {
            Some(Value::String(status)) => status.clone(),
            Some(other) => other.to_string(),
            None => String::new(),
        };
    }

    match body.get(ERROR_KEY) {
        Some(errors) => {
            let mut messages = Vec::new();
            collect_messages(errors, &mut messages);
            messages.join(". ")
        }
        None => format!("{body:?}"),
    }
}

fn collect_messages(value: &Value, out: &mut Vec<String>) {
    match value {
        Value::Null => {}
        Value::String(message) => out.push(message.clone()),
        Value::Array(values) => values.iter().for_each(|v| collect_messages(v, out)),
        Value::Object(map) => map.values().for_each(|v| collect_messages(v, out)),
        other => out.push(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Kind;

    fn success(body: &str) -> RawOutcome {
        RawOutcome::Success {
            status: StatusCode::CREATED,
            body: body.to_owned(),
        }
    }

    fn gateway_error(body: &str) -> RawOutcome {
        RawOutcome::GatewayError {
            status: StatusCode::BAD_REQUEST,
            body: body.to_owned(),
        }
    }

    #[test]
    fn success_body_is_wrapped() {
        let response = Response::from_outcome(success(
            r#"{"transaction_status":"approved","transaction_id":"ET1234"}"#,
        ));

        assert_eq!(response.kind(), ResponseKind::Success);
        assert_eq!(response.status(), Some(StatusCode::CREATED));
        assert_eq!(response["transaction_id"], "ET1234");
        assert_eq!(response["missing"], Value::Null);
        assert_eq!(response.message(), "approved");
    }

    #[test]
    fn gateway_error_body_is_wrapped() {
        let response = Response::from_outcome(gateway_error(r#"{"Error":{"1":"invalid card"}}"#));

        assert_eq!(response.kind(), ResponseKind::GatewayError);
        assert!(!response.is_success(), "gateway errors are not successes");
        assert_eq!(response.message(), "invalid card");

        let err = response.into_result().expect_err("gateway error");
        assert_eq!(err.kind(), Kind::Status, "kind should be Status");
    }

    #[test]
    fn non_json_body_becomes_internal_error() {
        for outcome in [success("<html>502</html>"), gateway_error("<html>502</html>")] {
            let response = Response::from_outcome(outcome);

            assert_eq!(response.kind(), ResponseKind::InternalError);
            let message = response["Error"]["messages"]
                .as_str()
                .expect("synthesized message");
            assert_eq!(
                message,
                "Payeezy has returned an invalid response: [<html>502</html>]"
            );
        }
    }

    #[test]
    fn non_object_json_is_invalid() {
        let response = Response::from_outcome(success(r#"["approved"]"#));

        assert_eq!(response.kind(), ResponseKind::InternalError);
        assert!(
            response.message().contains(r#"[["approved"]]"#),
            "raw body should be quoted in {}",
            response.message()
        );
    }

    #[test]
    fn transport_failure_skips_parsing() {
        let source = Error::validation("connection refused");
        let response = Response::from_outcome(RawOutcome::TransportFailure(source));

        assert_eq!(response.kind(), ResponseKind::InternalError);
        assert_eq!(response.status(), None);
        assert_eq!(
            response.message(),
            "Validation: invalid: connection refused"
        );
        let err = response.into_result().expect_err("internal error");
        assert_eq!(err.kind(), Kind::Validation, "source is passed through");
    }

    #[test]
    fn handle_message_flattens_nested_errors() {
        let body = parse(
            r#"{"Error":{"messages":[{"code":"invalid_card_number","description":"The credit card number check failed"},{"code":"card_expired"}]}}"#,
        )
        .expect("valid json");

        assert_eq!(
            handle_message(&body, false),
            "invalid_card_number. The credit card number check failed. card_expired"
        );
    }

    #[test]
    fn handle_message_falls_back_to_debug() {
        let body = parse(r#"{"validation_status":"failed"}"#).expect("valid json");

        assert_eq!(
            handle_message(&body, false),
            r#"{"validation_status": String("failed")}"#
        );
    }

    #[test]
    fn handle_message_without_status_is_empty() {
        let body = parse(r#"{"transaction_id":"ET1"}"#).expect("valid json");

        assert_eq!(handle_message(&body, true), "");
    }

    #[test]
    fn response_kind_displays_snake_case() {
        assert_eq!(ResponseKind::GatewayError.to_string(), "gateway_error");
        assert_eq!(ResponseKind::InternalError.to_string(), "internal_error");
    }
}
