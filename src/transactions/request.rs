use serde_json::Value;
use url::Url;

use crate::Result;
use crate::error::Error;
use crate::transactions::{Action, Params};

pub const TRANSACTION_ID: &str = "transaction_id";
pub const TRANSACTION_TYPE: &str = "transaction_type";

/// Endpoint and body of one transaction.
///
/// `body` is serialized exactly once. The same string is signed and sent.
#[non_exhaustive]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CanonicalRequest {
    pub url: Url,
    pub body: String,
}

impl CanonicalRequest {
    /// Routes `action` to its endpoint and serializes `params` with the
    /// injected `transaction_type`.
    ///
    /// Follow-up actions move `transaction_id` out of the body and append it
    /// to the base URL as exactly one path segment. A missing or empty id, or
    /// one that would escape that segment, is rejected.
    ///
    /// `url` is the parsed form of `base_url`, so a bare origin such as
    /// `https://host` is sent as `https://host/`.
    pub fn build(base_url: &str, action: &Action, mut params: Params) -> Result<Self> {
        let mut url = Url::parse(base_url)?;

        if action.requires_transaction_id() {
            let id = params
                .shift_remove(TRANSACTION_ID)
                .ok_or_else(|| {
                    Error::validation(format!("{action} requires a `{TRANSACTION_ID}` field"))
                })
                .and_then(|value| path_segment(action, value))?;

            url.path_segments_mut()
                .map_err(|()| Error::validation(format!("{base_url} cannot take a path segment")))?
                .pop_if_empty()
                .push(&id);
        }

        params.insert(
            TRANSACTION_TYPE.to_owned(),
            Value::String(action.as_str().to_owned()),
        );

        Ok(Self {
            url,
            body: post_data(&params)?,
        })
    }
}

/// Serializes params in insertion order.
pub fn post_data(params: &Params) -> Result<String> {
    Ok(serde_json::to_string(params)?)
}

fn path_segment(action: &Action, value: Value) -> Result<String> {
    let id = match value {
        Value::String(id) => id,
        Value::Number(id) => id.to_string(),
        other => {
            return Err(Error::validation(format!(
                "{action} `{TRANSACTION_ID}` must be a string or number, got {other}"
            )));
        }
    };

    if id.trim().is_empty() {
        return Err(Error::validation(format!(
            "{action} `{TRANSACTION_ID}` must not be empty"
        )));
    }
    if matches!(id.as_str(), "." | "..") || id.contains(['/', '\\', '?', '#']) {
        return Err(Error::validation(format!(
            "{action} `{TRANSACTION_ID}` must be a single path segment, got {id:?}"
        )));
    }

    Ok(id)
}
