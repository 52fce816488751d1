//! Generation-tagged publication cell for the "current" dashboard data.
//!
//! Scenario switches are not canceled when a newer switch starts; instead
//! every load takes a ticket up front and may only publish while its ticket
//! is still the latest. A stale in-flight load therefore cannot clobber a
//! newer selection.

/// Proof that a load was initiated; only the most recently issued ticket
/// may publish.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct LoadTicket(u64);

#[derive(Debug)]
pub struct CurrentCell<T> {
    generation: u64,
    value: Option<T>,
}

impl<T> Default for CurrentCell<T> {
    fn default() -> Self {
        Self { generation: 0, value: None }
    }
}

impl<T> CurrentCell<T> {
    /// Start a new load, invalidating every ticket issued before.
    pub const fn begin(&mut self) -> LoadTicket {
        self.generation += 1;
        LoadTicket(self.generation)
    }

    /// Install the value if the ticket is still the latest; returns whether
    /// the value was published. The previous value stays in place otherwise.
    pub fn publish(&mut self, ticket: LoadTicket, value: T) -> bool {
        if ticket.0 == self.generation {
            self.value = Some(value);
            true
        } else {
            false
        }
    }

    pub const fn get(&self) -> Option<&T> {
        self.value.as_ref()
    }
}
