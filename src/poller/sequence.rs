//! Ordering guard for overlapping polls.
//!
//! A new poll is issued on every tick whether or not the previous one has
//! finished, so responses can arrive out of order. Each poll carries a
//! sequence number and an outcome is only applied when it is newer than the
//! last applied one.

/// Monotonic poll numbering plus the newest outcome applied so far.
#[derive(Debug, Clone, Default)]
pub struct PollSequence {
    issued: u64,
    applied: Option<u64>,
}

impl PollSequence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number the next poll.
    pub fn issue(&mut self) -> u64 {
        self.issued += 1;
        self.issued
    }

    /// Decide whether the outcome of poll `seq` may be applied.
    ///
    /// Returns `false` for outcomes older than (or equal to) one already
    /// applied, and for numbers that were never issued.
    pub fn accept(&mut self, seq: u64) -> bool {
        if seq == 0 || seq > self.issued {
            return false;
        }
        match self.applied {
            Some(applied) if seq <= applied => false,
            _ => {
                self.applied = Some(seq);
                true
            }
        }
    }

    /// Most recently issued poll number (0 before the first poll).
    pub fn latest_issued(&self) -> u64 {
        self.issued
    }

    /// Number of the newest applied outcome.
    pub fn last_applied(&self) -> Option<u64> {
        self.applied
    }

    /// Polls issued but not yet superseded by an applied outcome.
    pub fn in_flight(&self) -> u64 {
        self.issued - self.applied.unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_is_monotonic() {
        let mut seq = PollSequence::new();
        assert_eq!(seq.latest_issued(), 0);
        assert_eq!(seq.issue(), 1);
        assert_eq!(seq.issue(), 2);
        assert_eq!(seq.issue(), 3);
    }

    #[test]
    fn test_in_order_outcomes_are_applied() {
        let mut seq = PollSequence::new();
        let first = seq.issue();
        assert!(seq.accept(first));
        let second = seq.issue();
        assert!(seq.accept(second));
        assert_eq!(seq.last_applied(), Some(second));
    }

    #[test]
    fn test_stale_outcome_is_discarded() {
        let mut seq = PollSequence::new();
        let slow = seq.issue();
        let fast = seq.issue();

        assert!(seq.accept(fast));
        assert!(!seq.accept(slow));
        assert_eq!(seq.last_applied(), Some(fast));
    }

    #[test]
    fn test_duplicate_outcome_is_discarded() {
        let mut seq = PollSequence::new();
        let n = seq.issue();
        assert!(seq.accept(n));
        assert!(!seq.accept(n));
    }

    #[test]
    fn test_unissued_numbers_are_rejected() {
        let mut seq = PollSequence::new();
        assert!(!seq.accept(0));
        assert!(!seq.accept(1));
        seq.issue();
        assert!(!seq.accept(2));
    }

    #[test]
    fn test_in_flight_count() {
        let mut seq = PollSequence::new();
        seq.issue();
        seq.issue();
        seq.issue();
        assert_eq!(seq.in_flight(), 3);
        seq.accept(2);
        assert_eq!(seq.in_flight(), 1);
    }
}
