//! Daily ceiling on upstream calls.
//!
//! Running out of quota is not an error: callers that fail to reserve fall
//! through to synthetic data. The counter is reset by the maintenance task.

use std::sync::atomic::{AtomicU32, Ordering};

#[derive(Debug)]
pub struct QuotaLimiter {
    used: AtomicU32,
    ceiling: u32,
}

impl QuotaLimiter {
    pub fn new(ceiling: u32) -> Self {
        Self {
            used: AtomicU32::new(0),
            ceiling,
        }
    }

    /// Reserve one upstream call. Returns `false` without counting when the
    /// ceiling has been reached.
    pub fn try_reserve(&self) -> bool {
        self.used
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |used| {
                (used < self.ceiling).then_some(used + 1)
            })
            .is_ok()
    }

    /// Start a new period with zero calls used.
    pub fn reset_daily(&self) {
        let previous = self.used.swap(0, Ordering::AcqRel);
        tracing::info!(
            "Quota reset: {}/{} upstream calls were used in the last period",
            previous,
            self.ceiling
        );
    }

    pub fn used(&self) -> u32 {
        self.used.load(Ordering::Acquire)
    }

    pub fn ceiling(&self) -> u32 {
        self.ceiling
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_reserve_exactly_ceiling_times() {
        let quota = QuotaLimiter::new(30);
        let granted = (0..45).filter(|_| quota.try_reserve()).count();
        assert_eq!(granted, 30);
        assert_eq!(quota.used(), 30);
    }

    #[test]
    fn test_denied_until_reset() {
        let quota = QuotaLimiter::new(2);
        assert!(quota.try_reserve());
        assert!(quota.try_reserve());
        assert!(!quota.try_reserve());
        assert!(!quota.try_reserve());
        assert_eq!(quota.used(), 2);

        quota.reset_daily();
        assert_eq!(quota.used(), 0);
        assert!(quota.try_reserve());
        assert!(quota.try_reserve());
        assert!(!quota.try_reserve());
    }

    #[test]
    fn test_zero_ceiling_never_grants() {
        let quota = QuotaLimiter::new(0);
        assert!(!quota.try_reserve());
        assert_eq!(quota.used(), 0);
    }

    #[test]
    fn test_concurrent_reservations_never_exceed_ceiling() {
        let quota = Arc::new(QuotaLimiter::new(50));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let quota = Arc::clone(&quota);
                std::thread::spawn(move || (0..20).filter(|_| quota.try_reserve()).count())
            })
            .collect();

        let granted: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
        assert_eq!(granted, 50);
        assert_eq!(quota.used(), 50);
    }
}
