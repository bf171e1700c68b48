//! Server-side validation of `tma` Authorization headers
//!
//! Telegram signs init data with a key derived from the bot token:
//! `secret = HMAC_SHA256(key = "WebAppData", msg = bot_token)`, then
//! `hash = HMAC_SHA256(key = secret, msg = data_check_string)`.
//! The data-check-string is every `key=value` pair except `hash`,
//! percent-decoded, sorted by key and joined with `\n`.

use hmac::Mac;
use serde_json::Value;
use std::collections::BTreeMap;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use thiserror::Error;

use crate::telegram::init_data::HASH_KEY;
use crate::telegram::webapp_auth::{hmac_sha256, HmacSha256, SCHEME, WEBAPP_DATA_KEY};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum VerifyError {
    #[error("Authorization header does not use the tma scheme")]
    MissingScheme,

    #[error("Missing hash parameter")]
    MissingHash,

    #[error("Invalid hash - data may be tampered")]
    InvalidHash,

    #[error("Missing or malformed auth_date")]
    MissingAuthDate,

    #[error("Init data is too old ({0} seconds)")]
    Expired(u64),

    #[error("Missing user parameter")]
    MissingUser,

    #[error("Malformed user parameter: {0}")]
    MalformedUser(String),
}

/// Init data that passed signature and freshness checks
#[derive(Debug, Clone, PartialEq)]
pub struct VerifiedInitData {
    pub user_id: i64,
    pub user: Value,
    pub auth_date: u64,
    /// Every decoded field except `hash`
    pub fields: BTreeMap<String, String>,
}

/// Splits a query string into percent-decoded `(key, value)` pairs
///
/// Pairs without `=` or with undecodable values are skipped.
pub fn parse_pairs(query: &str) -> Vec<(String, String)> {
    query
        .split('&')
        .filter_map(|pair| {
            let (key, value) = pair.split_once('=')?;
            let decoded = urlencoding::decode(value).ok()?;
            Some((key.to_string(), decoded.into_owned()))
        })
        .collect()
}

/// Secret key derived from the bot token
pub fn secret_key(bot_token: &str) -> Vec<u8> {
    hmac_sha256(WEBAPP_DATA_KEY, bot_token.as_bytes())
}

/// Data-check-string over decoded pairs; `hash` pairs are left out
pub fn check_string<K: AsRef<str>, V: AsRef<str>>(pairs: &[(K, V)]) -> String {
    let mut signed: Vec<(&str, &str)> = pairs
        .iter()
        .map(|(k, v)| (k.as_ref(), v.as_ref()))
        .filter(|(k, _)| *k != HASH_KEY)
        .collect();

    signed.sort_by(|a, b| a.0.cmp(b.0));

    signed
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Produces a signed init data query string (`...&hash=<hex>`)
pub fn sign_init_data(pairs: &[(&str, &str)], bot_token: &str) -> String {
    let hash = hex::encode(hmac_sha256(&secret_key(bot_token), check_string(pairs).as_bytes()));

    let mut query: Vec<String> = pairs
        .iter()
        .filter(|(k, _)| *k != HASH_KEY)
        .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
        .collect();
    query.push(format!("{}={}", HASH_KEY, hash));
    query.join("&")
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Verifies an `Authorization: tma <init data>` header value
pub fn verify_authorization(header: &str, bot_token: &str, max_age: Duration) -> Result<VerifiedInitData, VerifyError> {
    verify_authorization_at(header, bot_token, max_age, unix_now())
}

/// [`verify_authorization`] against an explicit clock (unix seconds)
pub fn verify_authorization_at(
    header: &str,
    bot_token: &str,
    max_age: Duration,
    now: u64,
) -> Result<VerifiedInitData, VerifyError> {
    let query = header
        .trim_start()
        .strip_prefix(SCHEME)
        .and_then(|rest| rest.strip_prefix(' '))
        .ok_or(VerifyError::MissingScheme)?;

    verify_init_data_at(query.trim(), bot_token, max_age, now)
}

/// Verifies a raw init data query string
pub fn verify_init_data_at(
    query: &str,
    bot_token: &str,
    max_age: Duration,
    now: u64,
) -> Result<VerifiedInitData, VerifyError> {
    let pairs = parse_pairs(query);

    let received_hash = pairs
        .iter()
        .rev()
        .find(|(k, _)| k == HASH_KEY)
        .map(|(_, v)| v.as_str())
        .ok_or(VerifyError::MissingHash)?;
    let received = hex::decode(received_hash).map_err(|_| VerifyError::InvalidHash)?;

    let mut mac = HmacSha256::new_from_slice(&secret_key(bot_token)).map_err(|_| VerifyError::InvalidHash)?;
    mac.update(check_string(&pairs).as_bytes());
    mac.verify_slice(&received).map_err(|_| VerifyError::InvalidHash)?;

    let fields: BTreeMap<String, String> = pairs.into_iter().filter(|(k, _)| k != HASH_KEY).collect();

    let auth_date = fields
        .get("auth_date")
        .and_then(|raw| raw.trim_matches('"').parse::<u64>().ok())
        .ok_or(VerifyError::MissingAuthDate)?;

    let age = now.saturating_sub(auth_date);
    if age > max_age.as_secs() {
        return Err(VerifyError::Expired(age));
    }

    let user_json = fields.get("user").ok_or(VerifyError::MissingUser)?;
    let user: Value = serde_json::from_str(user_json).map_err(|e| VerifyError::MalformedUser(e.to_string()))?;
    let user_id = user
        .get("id")
        .and_then(Value::as_i64)
        .ok_or_else(|| VerifyError::MalformedUser("missing user id".to_string()))?;

    Ok(VerifiedInitData {
        user_id,
        user,
        auth_date,
        fields,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOKEN: &str = "123456:TEST-TOKEN";
    const NOW: u64 = 1_700_000_000;
    const DAY: Duration = Duration::from_secs(86_400);

    fn signed(auth_date: &str) -> String {
        sign_init_data(
            &[
                ("query_id", "AAHdF6IQAAAAAN0XohDhrOrc"),
                ("user", r#"{"id":279058397,"first_name":"Vladislav","username":"vdkfrost"}"#),
                ("auth_date", auth_date),
            ],
            TOKEN,
        )
    }

    #[test]
    fn test_valid_header_yields_user() {
        let header = format!("tma {}", signed("1699999000"));
        let verified = verify_authorization_at(&header, TOKEN, DAY, NOW).unwrap();
        assert_eq!(verified.user_id, 279058397);
        assert_eq!(verified.auth_date, 1_699_999_000);
        assert_eq!(verified.user["username"], "vdkfrost");
        assert!(!verified.fields.contains_key("hash"));
    }

    #[test]
    fn test_wrong_token_is_rejected() {
        let header = format!("tma {}", signed("1699999000"));
        assert_eq!(
            verify_authorization_at(&header, "other:token", DAY, NOW),
            Err(VerifyError::InvalidHash)
        );
    }

    #[test]
    fn test_tampered_field_is_rejected() {
        let query = signed("1699999000").replace("vdkfrost", "mallory");
        assert_eq!(
            verify_init_data_at(&query, TOKEN, DAY, NOW),
            Err(VerifyError::InvalidHash)
        );
    }

    #[test]
    fn test_expired_data_is_rejected() {
        let header = format!("tma {}", signed("1600000000"));
        assert_eq!(
            verify_authorization_at(&header, TOKEN, DAY, NOW),
            Err(VerifyError::Expired(100_000_000))
        );
    }

    #[test]
    fn test_scheme_and_hash_are_required() {
        assert_eq!(
            verify_authorization_at("Bearer abc", TOKEN, DAY, NOW),
            Err(VerifyError::MissingScheme)
        );
        assert_eq!(
            verify_authorization_at("tma auth_date=1", TOKEN, DAY, NOW),
            Err(VerifyError::MissingHash)
        );
        assert_eq!(
            verify_authorization_at("tma auth_date=1&hash=zz", TOKEN, DAY, NOW),
            Err(VerifyError::InvalidHash)
        );
    }

    #[test]
    fn test_check_string_sorts_by_key_and_skips_hash() {
        let pairs = [("user", "{}"), ("hash", "x"), ("auth_date", "1"), ("a1", "z")];
        assert_eq!(check_string(&pairs), "a1=z\nauth_date=1\nuser={}");
    }

    #[test]
    fn test_parse_pairs_decodes_and_skips_garbage() {
        let pairs = parse_pairs("user=%7B%22id%22%3A1%7D&flag&x=a%20b");
        assert_eq!(
            pairs,
            vec![
                ("user".to_string(), "{\"id\":1}".to_string()),
                ("x".to_string(), "a b".to_string())
            ]
        );
    }
}
