use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde_json::{Map, Value};

use crate::{Nonce, Timestamp};

/// Caller-supplied transaction fields, serialized in insertion order.
pub type Params = Map<String, Value>;

/// Transaction type, sent as the `transaction_type` body field.
#[non_exhaustive]
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Action {
    #[default]
    Purchase,
    Authorize,
    Capture,
    Void,
    Refund,
    Split,
    /// Any other gateway-defined transaction type, sent verbatim.
    Other(String),
}

impl Action {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Action::Purchase => "purchase",
            Action::Authorize => "authorize",
            Action::Capture => "capture",
            Action::Void => "void",
            Action::Refund => "refund",
            Action::Split => "split",
            Action::Other(name) => name,
        }
    }

    /// Whether the action operates on an earlier transaction and therefore
    /// needs its `transaction_id` in the URL path.
    ///
    /// Decided on the wire string, so `Other("capture")` routes like `Capture`.
    #[must_use]
    pub fn requires_transaction_id(&self) -> bool {
        matches!(self.as_str(), "capture" | "void" | "refund" | "split")
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        let action = match name.to_ascii_lowercase().as_str() {
            "purchase" => Action::Purchase,
            "authorize" => Action::Authorize,
            "capture" => Action::Capture,
            "void" => Action::Void,
            "refund" => Action::Refund,
            "split" => Action::Split,
            _ => Action::Other(name.to_owned()),
        };
        Ok(action)
    }
}

/// Per-transaction overrides for the signing inputs.
///
/// Values left unset are generated fresh for every request.
#[derive(Clone, Copy, Debug, Default)]
pub struct TransactOverrides {
    pub nonce: Option<Nonce>,
    pub timestamp: Option<Timestamp>,
}

impl TransactOverrides {
    #[must_use]
    pub const fn with_nonce(mut self, nonce: Nonce) -> Self {
        self.nonce = Some(nonce);
        self
    }

    #[must_use]
    pub const fn with_timestamp(mut self, timestamp: Timestamp) -> Self {
        self.timestamp = Some(timestamp);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_actions_case_insensitively() {
        assert_eq!("CAPTURE".parse::<Action>(), Ok(Action::Capture));
        assert_eq!(" void ".parse::<Action>(), Ok(Action::Void));
        assert_eq!("purchase".parse::<Action>(), Ok(Action::Purchase));
    }

    #[test]
    fn unknown_actions_pass_through() {
        let action = "tagged_refund".parse::<Action>().expect("infallible");

        assert_eq!(action, Action::Other("tagged_refund".to_owned()));
        assert_eq!(action.to_string(), "tagged_refund");
        assert!(
            !action.requires_transaction_id(),
            "gateway-defined actions post to the base url"
        );
    }

    #[test]
    fn unknown_actions_are_trimmed_like_known_ones() {
        let action = " tagged_refund ".parse::<Action>().expect("infallible");

        assert_eq!(action.as_str(), "tagged_refund");
    }

    #[test]
    fn other_with_follow_up_wire_name_requires_transaction_id() {
        for name in ["capture", "void", "refund", "split"] {
            assert!(
                Action::Other(name.to_owned()).requires_transaction_id(),
                "{name} must be routed by its wire string"
            );
        }
        assert!(
            !Action::Other("purchase".to_owned()).requires_transaction_id(),
            "purchase posts to the base url"
        );
    }

    #[test]
    fn only_follow_up_actions_require_transaction_id() {
        let with_id = [Action::Capture, Action::Void, Action::Refund, Action::Split];
        let without_id = [Action::Purchase, Action::Authorize];

        assert!(
            with_id.iter().all(Action::requires_transaction_id),
            "capture, void, refund and split need a transaction id"
        );
        assert!(
            !without_id.iter().any(Action::requires_transaction_id),
            "purchase and authorize post to the base url"
        );
    }
}
