//! Signed request parameters for the CDN admin API.
//!
//! string_to_sign = sorted `key=value` pairs joined with `&`, followed directly
//! by the API secret. signature = hex digest of string_to_sign, SHA-1 or
//! SHA-256 depending on the account setting.
//! `api_key`, `resource_type`, `file` and `signature` itself are never signed.

use sha1::Sha1;
use sha2::{Digest, Sha256};
use tripdesk_core::SignatureAlgorithm;

const UNSIGNED_PARAMS: [&str; 4] = ["api_key", "resource_type", "file", "signature"];

/// Build the canonical string that gets hashed (without the secret).
pub fn string_to_sign(params: &[(&str, String)]) -> String {
    let mut signed: Vec<&(&str, String)> = params
        .iter()
        .filter(|(k, v)| !UNSIGNED_PARAMS.contains(k) && !v.is_empty())
        .collect();
    signed.sort_by(|a, b| a.0.cmp(b.0));
    signed
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&")
}

fn hex_digest<D: Digest>(payload: &str, api_secret: &str) -> String {
    let mut hasher = D::new();
    hasher.update(payload.as_bytes());
    hasher.update(api_secret.as_bytes());
    hex::encode(hasher.finalize())
}

/// Sign request parameters with the account secret.
pub fn sign_params(
    params: &[(&str, String)],
    api_secret: &str,
    algorithm: SignatureAlgorithm,
) -> String {
    let payload = string_to_sign(params);
    match algorithm {
        SignatureAlgorithm::Sha1 => hex_digest::<Sha1>(&payload, api_secret),
        SignatureAlgorithm::Sha256 => hex_digest::<Sha256>(&payload, api_secret),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_params() -> Vec<(&'static str, String)> {
        vec![
            ("timestamp", "1315060510".to_string()),
            ("public_id", "sample_image".to_string()),
            ("api_key", "1234".to_string()),
        ]
    }

    #[test]
    fn test_params_are_sorted_and_filtered() {
        let params = vec![
            ("timestamp", "1700000000".to_string()),
            ("public_id", "folder/pic".to_string()),
            ("api_key", "123".to_string()),
            ("invalidate", "true".to_string()),
            ("resource_type", "image".to_string()),
            ("empty", String::new()),
        ];
        assert_eq!(
            string_to_sign(&params),
            "invalidate=true&public_id=folder/pic&timestamp=1700000000"
        );
    }

    #[test]
    fn test_sha1_signature_matches_known_digest() {
        // sha1("public_id=sample_image&timestamp=1315060510abcd")
        assert_eq!(
            sign_params(&sample_params(), "abcd", SignatureAlgorithm::Sha1),
            "b4ad47fb4e25c7bf5f92a20089f9db59bc302313"
        );
    }

    #[test]
    fn test_sha256_signature_matches_known_digest() {
        // sha256("public_id=sample_image&timestamp=1315060510abcd")
        assert_eq!(
            sign_params(&sample_params(), "abcd", SignatureAlgorithm::Sha256),
            "e3c44b54e67a3ecc918f5d7236ca5faa36250ea8a8cd6cbabfd2d6bb2453acac"
        );
    }

    #[test]
    fn test_signature_depends_on_secret() {
        let params = vec![("timestamp", "1".to_string())];
        for algorithm in [SignatureAlgorithm::Sha1, SignatureAlgorithm::Sha256] {
            assert_ne!(
                sign_params(&params, "a", algorithm),
                sign_params(&params, "b", algorithm)
            );
        }
    }
}
