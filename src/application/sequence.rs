//! Last-issued-wins sequencing for overlapping fetches.

use std::fmt;

/// Identifies one issued fetch within a [`RequestSequencer`] stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestTicket(u64);

impl fmt::Display for RequestTicket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Hands out monotonically increasing tickets; only the newest one is current.
#[derive(Debug, Default)]
pub struct RequestSequencer {
    latest: u64,
}

impl RequestSequencer {
    pub fn issue(&mut self) -> RequestTicket {
        self.latest += 1;
        RequestTicket(self.latest)
    }

    pub fn is_latest(&self, ticket: RequestTicket) -> bool {
        self.latest != 0 && ticket.0 == self.latest
    }

    pub fn latest(&self) -> Option<RequestTicket> {
        (self.latest != 0).then_some(RequestTicket(self.latest))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newer_ticket_supersedes_older() {
        let mut sequencer = RequestSequencer::default();
        let first = sequencer.issue();
        assert!(sequencer.is_latest(first));

        let second = sequencer.issue();
        assert!(second > first);
        assert!(!sequencer.is_latest(first));
        assert!(sequencer.is_latest(second));
        assert_eq!(sequencer.latest(), Some(second));
    }

    #[test]
    fn fresh_sequencer_has_no_latest() {
        let sequencer = RequestSequencer::default();
        assert_eq!(sequencer.latest(), None);
    }
}
