#![cfg_attr(doc, doc = include_str!("../README.md"))]

pub mod auth;
pub mod error;
pub mod transactions;

pub use error::Error;
pub use transactions::{
    Action, CanonicalRequest, Client, Credentials, Instrumentation, Params, Response,
    ResponseKind, TransactOverrides, TransactionLog, TransactionObserver,
};

pub type Result<T> = std::result::Result<T, Error>;

/// Milliseconds since the unix epoch, as sent in the `timestamp` header.
pub type Timestamp = i64;

/// Per-request random value sent in the `nonce` header.
pub type Nonce = u64;

/// Display name of the gateway, used in synthesized error messages and log records.
pub const GATEWAY: &str = "Payeezy";
