use bon::Builder;
use secrecy::SecretString;
use serde::Deserialize;

/// Gateway endpoint and the credentials used to sign every request.
///
/// Nothing is validated here: an empty or malformed field surfaces later as a
/// request that cannot be built or as a signature the gateway rejects.
#[non_exhaustive]
#[derive(Clone, Debug, Builder, Deserialize)]
#[builder(on(String, into))]
pub struct Credentials {
    /// Base transactions URL, e.g. `https://api-cert.payeezy.com/v1/transactions`.
    #[serde(default)]
    pub url: String,
    #[serde(default, alias = "apikey", alias = "apiKey")]
    pub api_key: String,
    #[builder(into)]
    #[serde(alias = "apisecret", alias = "apiSecret", default = "empty_secret")]
    pub api_secret: SecretString,
    #[serde(default)]
    pub token: String,
}

impl Credentials {
    #[must_use]
    pub fn new<U, K, S, T>(url: U, api_key: K, api_secret: S, token: T) -> Self
    where
        U: Into<String>,
        K: Into<String>,
        S: Into<SecretString>,
        T: Into<String>,
    {
        Self {
            url: url.into(),
            api_key: api_key.into(),
            api_secret: api_secret.into(),
            token: token.into(),
        }
    }

    /// Builds credentials from loosely keyed configuration entries.
    ///
    /// Keys match case-insensitively, may carry a leading `:` and may use `_`
    /// or `-` freely, so `url`, `:url`, `apikey`, `api_key` and `API-KEY` are
    /// all recognised. Unknown keys are ignored and missing ones stay empty.
    pub fn from_map<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut credentials = Self::new("", "", empty_secret(), "");

        for (key, value) in entries {
            match normalize_key(key.as_ref()).as_str() {
                "url" => credentials.url = value.into(),
                "apikey" => credentials.api_key = value.into(),
                "apisecret" => {
                    let secret: String = value.into();
                    credentials.api_secret = SecretString::from(secret);
                }
                "token" => credentials.token = value.into(),
                _ => {}
            }
        }

        credentials
    }
}

fn normalize_key(key: &str) -> String {
    key.trim()
        .trim_start_matches(':')
        .chars()
        .filter(|c| !matches!(c, '_' | '-'))
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

fn empty_secret() -> SecretString {
    SecretString::from("")
}
