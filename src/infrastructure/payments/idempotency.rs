//! Idempotency keys for gateway requests.

use chrono::Utc;
use rand::Rng;

const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const SUFFIX_LEN: usize = 9;

/// Generates a fresh key: current Unix time in milliseconds, a dash and nine
/// random base36 characters (`1767225600000-k3v9q0x2a`).
///
/// A new key is made for every gateway call, so a retried request is never
/// deduplicated by the gateway.
pub fn generate_idempotency_key() -> String {
    let mut rng = rand::rng();
    let suffix: String = (0..SUFFIX_LEN)
        .map(|_| BASE36[rng.random_range(0..BASE36.len())] as char)
        .collect();

    format!("{}-{}", Utc::now().timestamp_millis(), suffix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_key_format() {
        let key = generate_idempotency_key();
        let (millis, suffix) = key.split_once('-').unwrap();

        assert!(millis.parse::<i64>().unwrap() > 0);
        assert_eq!(suffix.len(), SUFFIX_LEN);
        assert!(
            suffix
                .chars()
                .all(|c| c.is_ascii_digit() || c.is_ascii_lowercase())
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_keys_unique_under_concurrency() {
        let handles: Vec<_> = (0..8)
            .map(|_| {
                tokio::spawn(async {
                    (0..500)
                        .map(|_| generate_idempotency_key())
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        let mut seen = HashSet::new();
        for handle in handles {
            for key in handle.await.unwrap() {
                assert!(seen.insert(key), "duplicate idempotency key");
            }
        }
        assert_eq!(seen.len(), 4000);
    }
}
