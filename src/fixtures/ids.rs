//! Collision-resistant identifiers for test isolation.
//!
//! Every id embeds the current Unix time in milliseconds plus a random base-36
//! suffix, so records created by concurrent or repeated runs never collide and
//! are easy to spot in the services' data.

use chrono::Utc;
use rand::Rng;

const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

fn random_base36(len: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..len)
        .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
        .collect()
}

/// `test-{unix_ms}-{9 base-36 chars}`.
pub fn generate_test_id() -> String {
    format!("test-{}-{}", Utc::now().timestamp_millis(), random_base36(9))
}

/// `user-test-{unix_ms}-{9 base-36 chars}`.
pub fn generate_user_id() -> String {
    format!("user-{}", generate_test_id())
}

/// `PROD-{unix_ms}-{5 upper-case base-36 chars}`.
pub fn generate_product_id() -> String {
    format!(
        "PROD-{}-{}",
        Utc::now().timestamp_millis(),
        random_base36(5).to_ascii_uppercase()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn suffix(id: &str) -> &str {
        id.rsplit('-').next().unwrap()
    }

    #[test]
    fn test_id_formats() {
        let test_id = generate_test_id();
        let parts: Vec<&str> = test_id.split('-').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "test");
        assert!(parts[1].parse::<i64>().unwrap() > 0);
        assert_eq!(parts[2].len(), 9);
        assert!(parts[2]
            .chars()
            .all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));

        assert!(generate_user_id().starts_with("user-test-"));

        let product = generate_product_id();
        assert!(product.starts_with("PROD-"));
        assert_eq!(suffix(&product).len(), 5);
        assert!(suffix(&product)
            .chars()
            .all(|c| c.is_ascii_digit() || c.is_ascii_uppercase()));
    }

    #[test]
    fn test_ids_do_not_collide() {
        let ids: HashSet<String> = (0..1000).map(|_| generate_user_id()).collect();
        assert_eq!(ids.len(), 1000);
    }
}
