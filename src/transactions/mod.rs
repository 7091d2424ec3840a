//! Transaction commit pipeline.
//!
//! One call to [`Client::transact`] runs the whole flow:
//! - route the action to `<url>` or `<url>/<transaction_id>` and serialize the body once
//! - sign the body with a fresh nonce and timestamp
//! - POST it, optionally timed by [`Instrumentation`]
//! - normalize the outcome into a [`Response`]

mod client;
mod config;
mod instrumentation;
pub mod request;
pub mod response;
pub mod transport;
mod types;

pub use client::Client;
pub use config::Credentials;
pub use instrumentation::{Instrumentation, TransactionLog, TransactionObserver};
pub use request::CanonicalRequest;
pub use response::{Response, ResponseKind, handle_message};
pub use transport::{RawOutcome, ReqwestTransport, Transport};
pub use types::{Action, Params, TransactOverrides};
