//! Request correlation for in-flight backend calls.
//!
//! Every view that can be refreshed owns a [`Generation`]. Starting a
//! request issues a [`Ticket`]; when the response arrives it is applied only
//! if its ticket is still the latest one issued for that view. A response to
//! a superseded request is dropped instead of overwriting newer data.

/// Proof that a request was started, stamped with its generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(u64);

impl Ticket {
    pub fn value(self) -> u64 {
        self.0
    }
}

/// Monotonic per-view request counter.
#[derive(Debug, Clone, Default)]
pub struct Generation {
    issued: u64,
}

impl Generation {
    /// Start a new request, superseding every earlier ticket.
    pub fn issue(&mut self) -> Ticket {
        self.issued += 1;
        Ticket(self.issued)
    }

    /// Whether `ticket` belongs to the most recently started request.
    pub fn is_current(&self, ticket: Ticket) -> bool {
        ticket.0 == self.issued
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_latest_ticket_is_current() {
        let mut generation = Generation::default();
        let first = generation.issue();
        assert!(generation.is_current(first));

        let second = generation.issue();
        assert!(!generation.is_current(first));
        assert!(generation.is_current(second));
        assert!(second > first);
    }

    #[test]
    fn generations_are_independent() {
        let mut calendar = Generation::default();
        let mut booking = Generation::default();
        let cal = calendar.issue();
        let _ = booking.issue();
        let _ = booking.issue();
        assert!(calendar.is_current(cal));
    }
}
