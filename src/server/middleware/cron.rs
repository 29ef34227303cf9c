use axum::http::{header::AUTHORIZATION, HeaderMap};
use sha2::{Digest, Sha256};

use crate::server::error::auth::AuthError;

/// Checks the `Authorization: Bearer <secret>` header of a cron request.
///
/// The token is compared through SHA-256 digests in constant time, so the time taken
/// does not depend on how much of the secret matched.
pub fn verify_cron_secret(headers: &HeaderMap, secret: &str) -> Result<(), AuthError> {
    let provided = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "));

    match provided {
        Some(token) if !secret.is_empty() && digests_match(token, secret) => Ok(()),
        _ => Err(AuthError::InvalidCronSecret),
    }
}

fn digests_match(a: &str, b: &str) -> bool {
    let a = Sha256::digest(a.as_bytes());
    let b = Sha256::digest(b.as_bytes());

    a.iter().zip(b.iter()).fold(0u8, |diff, (x, y)| diff | (x ^ y)) == 0
}
