//! Exponential backoff with jitter for the accept loop.

use std::time::Duration;

use rand::Rng;

use crate::config::AcceptConfig;

/// Delay before retrying accept after `consecutive_errors` transient failures in a row.
///
/// Doubles from `backoff_base_ms` per failure, capped at `backoff_max_ms`, plus up
/// to 10% jitter so restarted peers do not retry in lockstep. Zero failures, zero delay.
pub fn calculate_backoff(consecutive_errors: u32, config: &AcceptConfig) -> Duration {
    let Some(doublings) = consecutive_errors.checked_sub(1) else {
        return Duration::ZERO;
    };

    let delay_ms = 1u64
        .checked_shl(doublings)
        .map_or(u64::MAX, |factor| config.backoff_base_ms.saturating_mul(factor))
        .min(config.backoff_max_ms);
    let jitter_ms = rand::thread_rng().gen_range(0..=delay_ms / 10);

    Duration::from_millis(delay_ms + jitter_ms)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn accept(base: u64, max: u64) -> AcceptConfig {
        AcceptConfig {
            backoff_base_ms: base,
            backoff_max_ms: max,
            ..AcceptConfig::default()
        }
    }

    #[test]
    fn no_errors_no_delay() {
        assert_eq!(calculate_backoff(0, &accept(100, 2000)), Duration::ZERO);
    }

    #[test]
    fn doubles_per_consecutive_error() {
        let config = accept(100, 2000);

        let first = calculate_backoff(1, &config).as_millis();
        assert!((100..=110).contains(&first), "{first}");

        let third = calculate_backoff(3, &config).as_millis();
        assert!((400..=440).contains(&third), "{third}");
    }

    #[test]
    fn capped_at_max_plus_jitter() {
        let config = accept(100, 1000);
        for errors in [5, 40, 64, 65, u32::MAX] {
            let delay = calculate_backoff(errors, &config).as_millis();
            assert!((1000..=1100).contains(&delay), "{errors}: {delay}");
        }
    }
}
