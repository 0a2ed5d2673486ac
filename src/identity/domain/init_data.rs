//! Telegram Mini App init-data verification.
//!
//! The Mini App client forwards the `initData` query string it received from
//! Telegram. The string is signed by the bot token: every parameter except
//! `hash` is sorted by key, rendered as `key=value` lines, and authenticated
//! with HMAC-SHA256 under a secret derived from the bot token with the fixed
//! key `WebAppData`.

use super::{ExternalIdentity, Handle, InitDataError};
use chrono::{DateTime, Duration, Utc};
use hmac::{Hmac, Mac};
use serde::Deserialize;
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

const SECRET_DERIVATION_KEY: &[u8] = b"WebAppData";

#[derive(Debug, Deserialize)]
struct InitDataUser {
    id: i64,
    first_name: String,
    #[serde(default)]
    last_name: Option<String>,
    #[serde(default)]
    username: Option<String>,
    #[serde(default)]
    language_code: Option<String>,
    #[serde(default)]
    photo_url: Option<String>,
}

/// Verifies signed init data and extracts the asserted identity.
#[derive(Clone)]
pub struct InitDataVerifier {
    secret: Vec<u8>,
    max_age: Option<Duration>,
}

impl std::fmt::Debug for InitDataVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InitDataVerifier")
            .field("max_age", &self.max_age)
            .finish_non_exhaustive()
    }
}

impl InitDataVerifier {
    /// Creates a verifier for the given bot token.
    ///
    /// `max_age` bounds how old `auth_date` may be; `None` accepts any age.
    #[must_use]
    pub fn new(bot_token: &str, max_age: Option<Duration>) -> Self {
        let secret = hmac_sha256(SECRET_DERIVATION_KEY, bot_token.as_bytes());
        Self { secret, max_age }
    }

    /// Verifies `raw` and returns the identity it asserts.
    ///
    /// # Errors
    ///
    /// Returns [`InitDataError`] when the payload is malformed, unsigned,
    /// signed with another token, expired, or carries no usable user.
    pub fn verify(&self, raw: &str, now: DateTime<Utc>) -> Result<ExternalIdentity, InitDataError> {
        let mut pairs = parse_pairs(raw)?;
        let position = pairs
            .iter()
            .position(|(key, _)| key == "hash")
            .ok_or(InitDataError::MissingHash)?;
        let (_, hash) = pairs.swap_remove(position);
        let expected = hex::decode(hash).map_err(|_| InitDataError::SignatureMismatch)?;

        pairs.sort_by(|left, right| left.0.cmp(&right.0));
        let check_string = data_check_string(&pairs);
        let mut mac = HmacSha256::new_from_slice(&self.secret)
            .map_err(|_| InitDataError::SignatureMismatch)?;
        mac.update(check_string.as_bytes());
        mac.verify_slice(&expected)
            .map_err(|_| InitDataError::SignatureMismatch)?;

        self.check_auth_date(&pairs, now)?;

        let user_json = field(&pairs, "user").ok_or(InitDataError::MissingField("user"))?;
        let user: InitDataUser = serde_json::from_str(user_json)
            .map_err(|err| InitDataError::MalformedUser(err.to_string()))?;
        Ok(into_identity(user))
    }

    /// Signs `fields` and renders them as an init-data query string.
    ///
    /// Produces exactly what a Telegram client would forward for the same
    /// fields, which makes it suitable for local clients and fixtures.
    #[must_use]
    pub fn sign(&self, fields: &[(&str, String)]) -> String {
        let mut pairs: Vec<(String, String)> = fields
            .iter()
            .map(|(key, value)| ((*key).to_owned(), value.clone()))
            .collect();
        pairs.sort_by(|left, right| left.0.cmp(&right.0));
        let hash = hex::encode(hmac_sha256(
            &self.secret,
            data_check_string(&pairs).as_bytes(),
        ));
        let mut encoded: Vec<String> = pairs
            .iter()
            .map(|(key, value)| format!("{key}={}", percent_encode(value)))
            .collect();
        encoded.push(format!("hash={hash}"));
        encoded.join("&")
    }

    fn check_auth_date(
        &self,
        pairs: &[(String, String)],
        now: DateTime<Utc>,
    ) -> Result<(), InitDataError> {
        let Some(max_age) = self.max_age else {
            return Ok(());
        };
        let seconds: i64 = field(pairs, "auth_date")
            .ok_or(InitDataError::MissingField("auth_date"))?
            .parse()
            .map_err(|_| InitDataError::MissingField("auth_date"))?;
        let auth_date =
            DateTime::from_timestamp(seconds, 0).ok_or(InitDataError::MissingField("auth_date"))?;
        if now.signed_duration_since(auth_date) > max_age {
            return Err(InitDataError::Expired);
        }
        Ok(())
    }
}

fn into_identity(user: InitDataUser) -> ExternalIdentity {
    let mut identity = ExternalIdentity::new(user.id, user.first_name);
    if let Some(last_name) = user.last_name.filter(|value| !value.is_empty()) {
        identity = identity.with_last_name(last_name);
    }
    // Telegram usernames allow the same character class as handles; anything
    // else is dropped rather than rejecting the login.
    if let Some(handle) = user.username.and_then(|name| Handle::new(name).ok()) {
        identity = identity.with_handle(handle);
    }
    if let Some(language_code) = user.language_code {
        identity = identity.with_language_code(language_code);
    }
    if let Some(photo_url) = user.photo_url {
        identity = identity.with_avatar_url(photo_url);
    }
    identity
}

fn field<'a>(pairs: &'a [(String, String)], key: &str) -> Option<&'a str> {
    pairs
        .iter()
        .find(|(candidate, _)| candidate == key)
        .map(|(_, value)| value.as_str())
}

fn data_check_string(sorted: &[(String, String)]) -> String {
    sorted
        .iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join("\n")
}

fn hmac_sha256(key: &[u8], message: &[u8]) -> Vec<u8> {
    // HMAC accepts keys of any length, so construction cannot fail here.
    HmacSha256::new_from_slice(key).map_or_else(
        |_| Vec::new(),
        |mut mac| {
            mac.update(message);
            mac.finalize().into_bytes().to_vec()
        },
    )
}

fn parse_pairs(raw: &str) -> Result<Vec<(String, String)>, InitDataError> {
    raw.trim()
        .trim_start_matches('?')
        .split('&')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut kv = part.splitn(2, '=');
            let key = kv.next().unwrap_or_default();
            let value = kv.next().unwrap_or_default();
            Ok((percent_decode(key)?, percent_decode(value)?))
        })
        .collect()
}

fn percent_decode(input: &str) -> Result<String, InitDataError> {
    let bytes = input.as_bytes();
    let mut decoded = Vec::with_capacity(bytes.len());
    let mut iter = bytes.iter().copied();
    while let Some(byte) = iter.next() {
        match byte {
            b'+' => decoded.push(b' '),
            b'%' => {
                let high = iter.next().and_then(hex_value);
                let low = iter.next().and_then(hex_value);
                match (high, low) {
                    (Some(high), Some(low)) => decoded.push(high << 4 | low),
                    _ => return Err(InitDataError::InvalidEncoding),
                }
            }
            other => decoded.push(other),
        }
    }
    String::from_utf8(decoded).map_err(|_| InitDataError::InvalidEncoding)
}

const fn hex_value(byte: u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'a'..=b'f' => Some(byte - b'a' + 10),
        b'A'..=b'F' => Some(byte - b'A' + 10),
        _ => None,
    }
}

fn percent_encode(input: &str) -> String {
    let mut encoded = String::with_capacity(input.len());
    for byte in input.bytes() {
        if byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'_' | b'.' | b'~') {
            encoded.push(char::from(byte));
        } else {
            encoded.push_str(&format!("%{byte:02X}"));
        }
    }
    encoded
}
