//! Telemetry link health
//!
//! Ages the last snapshot each tick. Past the timeout the link is stale and
//! every instrument falls back to "no data" rather than freezing.

/// Link state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkStatus {
    /// No snapshot received yet
    Waiting,
    /// Last snapshot is within the timeout
    Live,
    /// Last snapshot is older than the timeout
    Stale,
}

/// Tracks time since the last snapshot
#[derive(Debug, Clone)]
pub struct LinkMonitor {
    timeout_ms: u32,
    since_snapshot_ms: u32,
    received: bool,
}

impl LinkMonitor {
    pub fn new(timeout_ms: u32) -> Self {
        Self {
            timeout_ms,
            since_snapshot_ms: 0,
            received: false,
        }
    }

    /// Record a snapshot arrival
    pub fn snapshot_received(&mut self) {
        self.received = true;
        self.since_snapshot_ms = 0;
    }

    /// Advance time by `delta_ms`
    pub fn update_time(&mut self, delta_ms: u32) {
        self.since_snapshot_ms = self.since_snapshot_ms.saturating_add(delta_ms);
    }

    pub fn status(&self) -> LinkStatus {
        if !self.received {
            LinkStatus::Waiting
        } else if self.since_snapshot_ms >= self.timeout_ms {
            LinkStatus::Stale
        } else {
            LinkStatus::Live
        }
    }

    pub fn is_live(&self) -> bool {
        self.status() == LinkStatus::Live
    }

    /// Age of the last snapshot
    pub fn age_ms(&self) -> u32 {
        self.since_snapshot_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_waiting_until_first_snapshot() {
        let mut link = LinkMonitor::new(1000);
        assert_eq!(link.status(), LinkStatus::Waiting);
        link.update_time(5000);
        assert_eq!(link.status(), LinkStatus::Waiting);
        link.snapshot_received();
        assert!(link.is_live());
    }

    #[test]
    fn test_goes_stale_after_timeout() {
        let mut link = LinkMonitor::new(1000);
        link.snapshot_received();
        link.update_time(999);
        assert_eq!(link.status(), LinkStatus::Live);
        link.update_time(1);
        assert_eq!(link.status(), LinkStatus::Stale);
        link.update_time(20);
        assert_eq!(link.age_ms(), 1020);
    }

    #[test]
    fn test_snapshot_revives_link() {
        let mut link = LinkMonitor::new(100);
        link.snapshot_received();
        link.update_time(500);
        assert_eq!(link.status(), LinkStatus::Stale);
        link.snapshot_received();
        assert_eq!(link.status(), LinkStatus::Live);
        assert_eq!(link.age_ms(), 0);
    }

    #[test]
    fn test_age_saturates() {
        let mut link = LinkMonitor::new(100);
        link.snapshot_received();
        link.update_time(u32::MAX);
        link.update_time(u32::MAX);
        assert_eq!(link.age_ms(), u32::MAX);
        assert_eq!(link.status(), LinkStatus::Stale);
    }
}
