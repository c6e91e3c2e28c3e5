//! Exponential backoff between retry attempts.

use std::time::Duration;

/// Calculate the delay that follows a failed attempt.
///
/// `completed_attempt` is the zero-based index of the attempt that just failed,
/// so the first wait is `initial`, the second `2 × initial`, and so on.
/// Saturates at `Duration::MAX` instead of overflowing.
pub fn calculate_backoff(completed_attempt: u32, initial: Duration) -> Duration {
    let factor = 2u32.saturating_pow(completed_attempt);
    initial.saturating_mul(factor)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backoff_calculation() {
        let base = Duration::from_millis(100);

        assert_eq!(calculate_backoff(0, base), Duration::from_millis(100));
        assert_eq!(calculate_backoff(1, base), Duration::from_millis(200));
        assert_eq!(calculate_backoff(2, base), Duration::from_millis(400));
        assert_eq!(calculate_backoff(5, base), Duration::from_millis(3200));
    }

    #[test]
    fn test_zero_initial_delay_stays_zero() {
        assert_eq!(calculate_backoff(7, Duration::ZERO), Duration::ZERO);
    }

    #[test]
    fn test_backoff_saturates() {
        let huge = calculate_backoff(64, Duration::from_secs(u64::MAX / 2));
        assert_eq!(huge, Duration::MAX);
    }
}
