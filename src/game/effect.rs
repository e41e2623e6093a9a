use std::time::{Duration, Instant};

/// How long a speed boost lasts
pub const BOOST_DURATION: Duration = Duration::from_millis(5000);
/// Boosted interval as a fraction of the base interval (40% faster)
const BOOST_FACTOR: f64 = 0.6;

/// Timing state of the temporary speed boost. The engine reads
/// `current_interval` after every tick to reprogram its scheduler.
#[derive(Debug, Clone, PartialEq)]
pub struct EffectState {
    active: bool,
    expires_at: Option<Instant>,
    base_interval: Duration,
    boosted_interval: Duration,
}

impl EffectState {
    pub fn new(base_interval: Duration) -> Self {
        let boosted_ms = (base_interval.as_millis() as f64 * BOOST_FACTOR).round() as u64;
        Self {
            active: false,
            expires_at: None,
            base_interval,
            boosted_interval: Duration::from_millis(boosted_ms),
        }
    }

    /// Start the boost, or reset its expiry if one is already running.
    /// Boosts never stack.
    pub fn activate(&mut self, now: Instant) {
        self.active = true;
        self.expires_at = Some(now + BOOST_DURATION);
    }

    /// Expire the boost once its deadline has passed. Returns true when
    /// the interval changed, so the scheduler can be reprogrammed.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.expires_at {
            Some(deadline) if self.active && now >= deadline => {
                self.active = false;
                self.expires_at = None;
                true
            }
            _ => false,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// The tick interval currently in effect
    pub fn current_interval(&self) -> Duration {
        if self.active {
            self.boosted_interval
        } else {
            self.base_interval
        }
    }

    /// Time left on the boost, zero when inactive
    pub fn remaining(&self, now: Instant) -> Duration {
        match self.expires_at {
            Some(deadline) if self.active => deadline.saturating_duration_since(now),
            _ => Duration::ZERO,
        }
    }
}
