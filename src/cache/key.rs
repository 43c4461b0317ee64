//! Cache key generation using SHA-256 hashes

use sha2::{Digest, Sha256};

/// Generate a deterministic cache key from a fetch kind and its effective parameters.
///
/// The key is a SHA-256 hash of the kind and the sorted parameters, so the
/// same parameter set always maps to the same key regardless of the order in
/// which the pairs were collected. Parameter values are length-prefixed so
/// that no two distinct parameter sets can serialize to the same byte stream.
pub fn cache_key(kind: &str, params: &[(&str, &str)]) -> String {
    let mut hasher = Sha256::new();

    hasher.update(kind.as_bytes());
    hasher.update(b"|");

    let mut sorted_params: Vec<_> = params.iter().collect();
    sorted_params.sort_by_key(|(k, _)| *k);

    for (k, v) in sorted_params {
        hasher.update(k.as_bytes());
        hasher.update(b"=");
        hasher.update(v.len().to_string().as_bytes());
        hasher.update(b":");
        hasher.update(v.as_bytes());
        hasher.update(b"&");
    }

    format!("{:x}", hasher.finalize())
}
