use chrono::Utc;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;
use uuid::Uuid;

use crate::config::StorageConfig;

type HmacSha256 = Hmac<Sha256>;

/// Compute the signature over `method`, `key` and `expires`. The method
/// is part of the signed message, so an upload URL cannot be replayed
/// as a download and vice versa.
fn signature(signing_key: &str, method: &str, key: &str, expires: i64) -> String {
    hex::encode(mac_for(signing_key, method, key, expires).finalize().into_bytes())
}

fn mac_for(signing_key: &str, method: &str, key: &str, expires: i64) -> HmacSha256 {
    let mut mac = HmacSha256::new_from_slice(signing_key.as_bytes())
        .expect("HMAC-SHA256 accepts keys of any length");
    mac.update(method.as_bytes());
    mac.update(b"\n");
    mac.update(key.as_bytes());
    mac.update(b"\n");
    mac.update(expires.to_string().as_bytes());
    mac
}

fn signed_url(cfg: &StorageConfig, method: &str, key: &str) -> String {
    let expires = Utc::now().timestamp() + cfg.url_ttl_secs as i64;
    let sig = signature(&cfg.signing_key, method, key, expires);
    let query = form_urlencoded::Serializer::new(String::new())
        .append_pair("method", method)
        .append_pair("expires", &expires.to_string())
        .append_pair("signature", &sig)
        .finish();
    format!("{}/{}?{}", cfg.base_url.trim_end_matches('/'), key, query)
}

pub fn signed_upload_url(cfg: &StorageConfig, key: &str) -> String {
    signed_url(cfg, "PUT", key)
}

pub fn signed_download_url(cfg: &StorageConfig, key: &str) -> String {
    signed_url(cfg, "GET", key)
}

/// Check a presented signature in constant time, then the expiry.
pub fn verify(cfg: &StorageConfig, method: &str, key: &str, expires: i64, presented: &str) -> bool {
    let Ok(presented) = hex::decode(presented) else {
        return false;
    };
    let expected = mac_for(&cfg.signing_key, method, key, expires)
        .finalize()
        .into_bytes();
    if !bool::from(expected.as_slice().ct_eq(&presented)) {
        return false;
    }
    expires >= Utc::now().timestamp()
}

/// Build an object key for an uploaded resume. Keys are namespaced per
/// user and carry a random component so re-uploads never collide.
pub fn resume_key(user_id: Uuid, filename: &str) -> String {
    let nonce: [u8; 8] = rand::random();
    format!(
        "resumes/{}/{}-{}",
        user_id,
        hex::encode(nonce),
        sanitize_filename(filename)
    )
}

/// Lowercase the name and replace anything outside `[a-z0-9._-]`,
/// including path separators, with a dash.
fn sanitize_filename(name: &str) -> String {
    let cleaned: String = name
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c.to_ascii_lowercase()
            } else {
                '-'
            }
        })
        .collect();
    let cleaned = cleaned.trim_matches(|c| c == '-' || c == '.');
    if cleaned.is_empty() {
        "file".to_string()
    } else {
        cleaned.to_string()
    }
}
