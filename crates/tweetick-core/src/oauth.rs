//! OAuth 1.0a HMAC-SHA1 request signing for the Twitter v1.1 API.
//!
//! 1. Collect the `oauth_*` protocol parameters and the request parameters.
//! 2. Percent-encode every key and value, sort, join as `k=v&k=v`.
//! 3. Build the base string `METHOD&enc(url)&enc(params)`.
//! 4. Sign with `enc(consumer_secret)&enc(token_secret)` and base64 the MAC.

use base64::Engine;
use hmac::{Hmac, Mac};
use sha1::Sha1;

use crate::config::OAuthCredentials;
use crate::tweet_source::SourceError;

type HmacSha1 = Hmac<Sha1>;

/// Produces `Authorization: OAuth ...` header values.
#[derive(Debug, Clone)]
pub struct OAuthSigner {
    credentials: OAuthCredentials,
}

impl OAuthSigner {
    pub fn new(credentials: OAuthCredentials) -> Self {
        Self { credentials }
    }

    /// Header for a GET request, with a fresh nonce and the current time.
    pub fn authorization_header(
        &self,
        url: &str,
        params: &[(String, String)],
    ) -> Result<String, SourceError> {
        let nonce = uuid::Uuid::new_v4().simple().to_string();
        let timestamp = time::OffsetDateTime::now_utc().unix_timestamp();
        self.authorization_header_with(url, params, &nonce, timestamp)
    }

    /// Deterministic variant of [`authorization_header`](Self::authorization_header).
    pub fn authorization_header_with(
        &self,
        url: &str,
        params: &[(String, String)],
        nonce: &str,
        timestamp: i64,
    ) -> Result<String, SourceError> {
        let mut oauth_params = vec![
            (String::from("oauth_consumer_key"), self.credentials.api_key.clone()),
            (String::from("oauth_nonce"), nonce.to_owned()),
            (String::from("oauth_signature_method"), String::from("HMAC-SHA1")),
            (String::from("oauth_timestamp"), timestamp.to_string()),
            (String::from("oauth_token"), self.credentials.access_token.clone()),
            (String::from("oauth_version"), String::from("1.0")),
        ];

        let mut all_params = oauth_params.clone();
        all_params.extend(params.iter().cloned());

        let base = signature_base_string("GET", url, &all_params);
        let signature = sign(
            &base,
            &self.credentials.api_secret,
            &self.credentials.access_token_secret,
        )?;
        oauth_params.push((String::from("oauth_signature"), signature));
        oauth_params.sort();

        let fields = oauth_params
            .iter()
            .map(|(key, value)| format!("{}=\"{}\"", encode(key), encode(value)))
            .collect::<Vec<_>>()
            .join(", ");

        Ok(format!("OAuth {fields}"))
    }
}

/// `METHOD&enc(base_url)&enc(sorted_params)`.
pub fn signature_base_string(method: &str, base_url: &str, params: &[(String, String)]) -> String {
    let mut encoded = params
        .iter()
        .map(|(key, value)| (encode(key), encode(value)))
        .collect::<Vec<_>>();
    encoded.sort();

    let joined = encoded
        .iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join("&");

    format!("{method}&{}&{}", encode(base_url), encode(&joined))
}

/// Base64 HMAC-SHA1 of `base` keyed with both secrets.
pub fn sign(base: &str, consumer_secret: &str, token_secret: &str) -> Result<String, SourceError> {
    let key = format!("{}&{}", encode(consumer_secret), encode(token_secret));
    let mut mac = HmacSha1::new_from_slice(key.as_bytes())
        .map_err(|error| SourceError::internal(format!("cannot initialise HMAC: {error}")))?;
    mac.update(base.as_bytes());
    Ok(base64::engine::general_purpose::STANDARD.encode(mac.finalize().into_bytes()))
}

fn encode(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}
