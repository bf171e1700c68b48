use hmac::{Hmac, Mac};
use sha2::Sha256;
use strum::{Display, EnumString};

use crate::core::error::{AppError, AppResult};
use crate::telegram::host::HostEnvironment;
use crate::telegram::init_data::InitData;

pub(crate) type HmacSha256 = Hmac<Sha256>;

/// HMAC key Telegram uses for WebApp data
pub const WEBAPP_DATA_KEY: &[u8] = b"WebAppData";

/// `Authorization` scheme of Mini-App requests
pub const SCHEME: &str = "tma";

/// Which entries end up in the payload after `tma `
///
/// The signature never covers `hash`. `All` transmits every entry as the
/// host supplied it, so a pre-existing `hash` is sent next to the
/// computed one. `ExcludeHash` transmits the same filtered set that is
/// signed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, EnumString, Display)]
#[strum(serialize_all = "kebab-case")]
pub enum PayloadScope {
    #[default]
    All,
    ExcludeHash,
}

/// HMAC-SHA256 over `message` with `key`
#[allow(clippy::expect_used)]
pub(crate) fn hmac_sha256(key: &[u8], message: &[u8]) -> Vec<u8> {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC can take key of any size");
    mac.update(message);
    mac.finalize().into_bytes().to_vec()
}

/// Percent-encoding identical to JavaScript's `encodeURIComponent`
///
/// `urlencoding` keeps only `A-Z a-z 0-9 - _ . ~`; `encodeURIComponent`
/// additionally keeps `! ' ( ) *`.
pub fn encode_uri_component(raw: &str) -> String {
    urlencoding::encode(raw)
        .replace("%21", "!")
        .replace("%27", "'")
        .replace("%28", "(")
        .replace("%29", ")")
        .replace("%2A", "*")
}

/// `key=encodeURIComponent(JSON(value))`
fn encode_pair(key: &str, value: &serde_json::Value) -> String {
    format!("{}={}", key, encode_uri_component(&value.to_string()))
}

/// Canonical data-check-string: every entry but `hash`, encoded, sorted
/// by the full `key=value` string and joined with newlines.
pub fn data_check_string(init_data: &InitData) -> String {
    let mut pairs: Vec<String> = init_data
        .signed_entries()
        .map(|(key, value)| encode_pair(key, value))
        .collect();

    pairs.sort();
    pairs.join("\n")
}

/// Hex HMAC-SHA256 of the data-check-string keyed with `WebAppData`
pub fn sign_data_check_string(data_check_string: &str) -> String {
    hex::encode(hmac_sha256(WEBAPP_DATA_KEY, data_check_string.as_bytes()))
}

/// The unsorted `&`-joined payload placed after `tma `
pub fn build_payload(init_data: &InitData, scope: PayloadScope) -> String {
    let pairs: Vec<String> = match scope {
        PayloadScope::All => init_data.entries().map(|(k, v)| encode_pair(k, v)).collect(),
        PayloadScope::ExcludeHash => init_data.signed_entries().map(|(k, v)| encode_pair(k, v)).collect(),
    };
    pairs.join("&")
}

/// Builds the `Authorization` header value: `tma <payload>&hash=<signature>`
///
/// Pure function of `init_data` (key order included) and `scope`.
///
/// # Errors
/// `MissingUser` when init data has no `user.id`.
pub fn build_authorization_header(init_data: &InitData, scope: PayloadScope) -> AppResult<String> {
    init_data.user_id()?;

    let hash = sign_data_check_string(&data_check_string(init_data));
    let payload = build_payload(init_data, scope);

    Ok(format!("{} {}&hash={}", SCHEME, payload, hash))
}

/// Same as [`build_authorization_header`], reading init data from the host
///
/// # Errors
/// `NotInHostEnvironment` when the host exposes no init data.
pub fn authorization_header_from_host(host: &dyn HostEnvironment, scope: PayloadScope) -> AppResult<String> {
    let init_data = host.init_data().ok_or(AppError::NotInHostEnvironment)?;
    build_authorization_header(&init_data, scope)
}
