use sha2::{Digest, Sha256};

/// Compute a stable SHA-256 fingerprint for a scan result.
///
/// Identity fields:
/// - rule_code
/// - resource address
/// - source path (repo-relative)
pub fn fingerprint_for_result(rule_code: &str, resource: &str, path: &str) -> String {
    let canonical = [rule_code, resource, path].join("|");

    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    let digest = hasher.finalize();
    hex::encode(digest)
}
