//! Stable SHA-256 fingerprints over JSON-shaped inputs.
//!
//! `serde_json` maps are ordered, so equal inputs always serialize to the same
//! bytes and hash to the same digest.

use serde::Serialize;
use serde_json::json;
use sha2::{Digest, Sha256};

use crate::error::AppResult;
use crate::models::domain::Domain;

pub fn fingerprint<T: Serialize + ?Sized>(value: &T) -> AppResult<String> {
    let bytes = serde_json::to_vec(value)?;
    let digest = Sha256::digest(&bytes);
    Ok(format!("{digest:x}"))
}

/// Cache key for one producer's proposal: `(domain, user_id, constraints)`.
pub fn proposal_cache_key(
    domain: Domain,
    user_id: Option<&str>,
    constraints: &serde_json::Value,
) -> AppResult<String> {
    fingerprint(&json!({
        "domain": domain.as_str(),
        "user_id": user_id,
        "constraints": constraints,
    }))
}
