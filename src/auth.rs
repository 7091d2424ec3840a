//! Request signing for the gateway's HMAC authentication scheme.
//!
//! Every transaction carries six headers: `Content-Type`, `apikey`, `token`,
//! `nonce`, `timestamp` and `Authorization`. The `Authorization` value is
//! computed over the exact body bytes that are sent, so the same body string,
//! nonce and timestamp must be used for signing and for transmission.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use chrono::Utc;
use hmac::{Hmac, Mac as _};
use rand::Rng as _;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use secrecy::ExposeSecret as _;
use sha2::Sha256;

use crate::error::Error;
use crate::transactions::Credentials;
use crate::{Nonce, Result, Timestamp};

pub const API_KEY: &str = "apikey";
pub const TOKEN: &str = "token";
pub const NONCE: &str = "nonce";
pub const TIMESTAMP: &str = "timestamp";

/// Exclusive upper bound of generated nonces.
const NONCE_BOUND: Nonce = 10_000_000_000;

/// Computes the `Authorization` header value.
///
/// The message is `api_key ++ nonce ++ timestamp ++ token ++ body` with no
/// separators. The HMAC-SHA256 digest is hex encoded (lowercase) and the hex
/// text itself is then Base64 encoded, which is what the gateway verifies.
pub fn sign(
    api_key: &str,
    api_secret: &str,
    token: &str,
    nonce: Nonce,
    timestamp: Timestamp,
    body: &str,
) -> Result<String> {
    let message = format!("{api_key}{nonce}{timestamp}{token}{body}");

    let mut mac = Hmac::<Sha256>::new_from_slice(api_secret.as_bytes())
        .map_err(|e| Error::validation(format!("invalid api secret: {e}")))?;
    mac.update(message.as_bytes());

    let hex_digest = hex::encode(mac.finalize().into_bytes());
    Ok(STANDARD.encode(hex_digest))
}

/// [`sign`] using the secrets held by `credentials`.
pub fn generate_hmac(
    credentials: &Credentials,
    nonce: Nonce,
    timestamp: Timestamp,
    body: &str,
) -> Result<String> {
    sign(
        &credentials.api_key,
        credentials.api_secret.expose_secret(),
        &credentials.token,
        nonce,
        timestamp,
        body,
    )
}

/// Builds the full header set for one request.
pub fn create_headers(
    credentials: &Credentials,
    nonce: Nonce,
    timestamp: Timestamp,
    body: &str,
) -> Result<HeaderMap> {
    let signature = generate_hmac(credentials, nonce, timestamp, body)?;

    let mut map = HeaderMap::new();
    map.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    map.insert(API_KEY, credentials.api_key.parse()?);
    map.insert(TOKEN, credentials.token.parse()?);
    map.insert(NONCE, nonce.into());
    map.insert(TIMESTAMP, timestamp.into());

    let mut authorization = HeaderValue::from_str(&signature)?;
    authorization.set_sensitive(true);
    map.insert(AUTHORIZATION, authorization);

    Ok(map)
}

#[must_use]
pub fn generate_nonce() -> Nonce {
    rand::rng().random_range(0..NONCE_BOUND)
}

#[must_use]
pub fn current_timestamp() -> Timestamp {
    Utc::now().timestamp_millis()
}
