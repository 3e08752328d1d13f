use std::time::Duration;

use crate::config::RetryConfig;

/// Retry-relevant classification of a failed request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Connect or transfer timed out.
    Timeout,
    /// Server asked us to slow down (429, 503).
    Throttled,
    /// Network-level failure (reset, DNS, short read).
    Connection,
    /// Other 5xx.
    Http5xx(u16),
    /// Not worth retrying (4xx, bad URL, cancellation).
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    NoRetry,
    RetryAfter(Duration),
}

/// Capped exponential backoff.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    /// Attempts per request, the first one included. 1 disables retries.
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(250),
            max_delay: Duration::from_secs(5),
        }
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(cfg: &RetryConfig) -> Self {
        let max_delay = Duration::from_secs(cfg.max_delay_secs);
        // NaN and negatives become zero; anything past the cap clamps to it.
        let base_delay = Duration::try_from_secs_f64(cfg.base_delay_secs.max(0.0))
            .unwrap_or(max_delay)
            .min(max_delay);
        Self {
            max_attempts: cfg.max_attempts.max(1),
            base_delay,
            max_delay,
        }
    }
}

impl RetryPolicy {
    /// A policy that never retries.
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    /// `attempt` is 1-based: the attempt that just failed.
    pub fn decide(&self, attempt: u32, kind: ErrorKind) -> RetryDecision {
        if attempt >= self.max_attempts || kind == ErrorKind::Other {
            return RetryDecision::NoRetry;
        }
        // base * 2^(attempt-1), exponent capped so the shift cannot overflow.
        let factor = 1u32 << attempt.saturating_sub(1).min(16);
        RetryDecision::RetryAfter(self.base_delay.saturating_mul(factor).min(self.max_delay))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_retry_for_other() {
        let p = RetryPolicy::default();
        assert_eq!(p.decide(1, ErrorKind::Other), RetryDecision::NoRetry);
    }

    #[test]
    fn backoff_doubles_then_caps() {
        let p = RetryPolicy {
            max_attempts: 20,
            base_delay: Duration::from_millis(100),
            max_delay: Duration::from_millis(350),
        };
        assert_eq!(p.decide(1, ErrorKind::Timeout), RetryDecision::RetryAfter(Duration::from_millis(100)));
        assert_eq!(p.decide(2, ErrorKind::Timeout), RetryDecision::RetryAfter(Duration::from_millis(200)));
        assert_eq!(p.decide(3, ErrorKind::Timeout), RetryDecision::RetryAfter(Duration::from_millis(350)));
        assert_eq!(p.decide(19, ErrorKind::Timeout), RetryDecision::RetryAfter(Duration::from_millis(350)));
    }

    #[test]
    fn respects_max_attempts() {
        let p = RetryPolicy::default();
        assert!(matches!(p.decide(1, ErrorKind::Throttled), RetryDecision::RetryAfter(_)));
        assert!(matches!(p.decide(2, ErrorKind::Http5xx(502)), RetryDecision::RetryAfter(_)));
        assert_eq!(p.decide(3, ErrorKind::Throttled), RetryDecision::NoRetry);
        assert_eq!(RetryPolicy::none().decide(1, ErrorKind::Timeout), RetryDecision::NoRetry);
    }

    #[test]
    fn from_config() {
        let cfg = RetryConfig {
            max_attempts: 0,
            base_delay_secs: 0.5,
            max_delay_secs: 2,
        };
        let p = RetryPolicy::from(&cfg);
        assert_eq!(p.max_attempts, 1);
        assert_eq!(p.base_delay, Duration::from_millis(500));
        assert_eq!(p.max_delay, Duration::from_secs(2));
    }

    #[test]
    fn huge_or_non_finite_base_delay_clamps_to_max() {
        for base in [f64::INFINITY, 1e30, 10.0] {
            let cfg = RetryConfig {
                max_attempts: 3,
                base_delay_secs: base,
                max_delay_secs: 5,
            };
            let p = RetryPolicy::from(&cfg);
            assert_eq!(p.base_delay, Duration::from_secs(5), "base_delay_secs = {}", base);
        }
        for base in [-1.0, f64::NAN] {
            let cfg = RetryConfig {
                max_attempts: 3,
                base_delay_secs: base,
                max_delay_secs: 5,
            };
            assert_eq!(RetryPolicy::from(&cfg).base_delay, Duration::ZERO);
        }
    }
}
