pub const DEFAULT_POLL_INTERVAL_MS: u32 = 5000;
pub const DEFAULT_RETRY_MS: u32 = 1000;
pub const DEFAULT_MAX_RETRY_MS: u32 = 30000;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PollPolicy {
    pub interval_ms: u32,
    pub retry_ms: u32,
    pub max_retry_ms: u32,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval_ms: DEFAULT_POLL_INTERVAL_MS,
            retry_ms: DEFAULT_RETRY_MS,
            max_retry_ms: DEFAULT_MAX_RETRY_MS,
        }
    }
}

/// Delay before the next fetch: the steady interval after a success, a
/// doubling backoff after consecutive failures.
#[derive(Clone, Debug)]
pub struct PollSchedule {
    policy: PollPolicy,
    failures: u32,
}

impl PollSchedule {
    pub fn new(policy: PollPolicy) -> Self {
        Self {
            policy,
            failures: 0,
        }
    }

    pub fn policy(&self) -> PollPolicy {
        self.policy
    }

    pub fn failures(&self) -> u32 {
        self.failures
    }

    pub fn on_success(&mut self) -> u32 {
        self.failures = 0;
        self.policy.interval_ms
    }

    pub fn on_failure(&mut self) -> u32 {
        let shift = self.failures.min(16);
        self.failures = self.failures.saturating_add(1);
        let base = self.policy.retry_ms.max(1);
        base.saturating_mul(1u32 << shift)
            .min(self.policy.max_retry_ms.max(base))
    }
}

impl Default for PollSchedule {
    fn default() -> Self {
        Self::new(PollPolicy::default())
    }
}
