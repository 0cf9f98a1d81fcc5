//! Core aggregate and domain event traits.

use common::Version;
use serde::{Serialize, de::DeserializeOwned};

/// Trait for domain events.
///
/// Domain events represent facts that have happened in the domain.
/// They are immutable and named in past tense.
pub trait DomainEvent: Serialize + DeserializeOwned + Send + Sync + Clone {
    /// Returns the event type name, used for logging and routing.
    fn event_type(&self) -> &'static str;
}

/// Trait for aggregate roots that record domain events while they mutate.
///
/// Every mutating operation on the aggregate appends to an internal
/// pending-events buffer. The aggregate never publishes anything itself;
/// the application layer drains the buffer with [`take_events`] after the
/// aggregate has been persisted.
///
/// [`take_events`]: AggregateRoot::take_events
pub trait AggregateRoot: Send + Sync {
    /// Identifier type of the aggregate.
    type Id: Copy + Eq + std::fmt::Display;

    /// The type of events this aggregate records.
    type Event: DomainEvent;

    /// Returns the aggregate type name.
    fn aggregate_type() -> &'static str;

    /// Returns the aggregate's unique identifier.
    fn id(&self) -> Self::Id;

    /// Returns the persistence version the aggregate was loaded at.
    fn version(&self) -> Version;

    /// Sets the persistence version.
    ///
    /// Called by the application layer after a successful write.
    fn set_version(&mut self, version: Version);

    /// Returns the events recorded since the buffer was last drained.
    fn pending_events(&self) -> &[Self::Event];

    /// Drains the pending events in recording order, leaving the buffer empty.
    fn take_events(&mut self) -> Vec<Self::Event>;

    /// Returns true if there are events waiting to be dispatched.
    fn has_pending_events(&self) -> bool {
        !self.pending_events().is_empty()
    }
}
