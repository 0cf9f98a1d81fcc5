//! Domain event dispatch.

use async_trait::async_trait;
use domain::{DomainEvent, SaleEvent};
use thiserror::Error;

use crate::error::DispatchError;

/// Failure reported by an event handler.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct HandlerError(String);

impl HandlerError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }

    pub fn message(&self) -> &str {
        &self.0
    }
}

/// A subscriber to sale events.
///
/// Handlers run after the sale has been persisted. A handler that fails
/// stops delivery of the remaining events to every handler.
#[async_trait]
pub trait EventHandler: Send + Sync {
    /// Returns the name of this handler, used in logs and errors.
    fn name(&self) -> &'static str;

    /// Handles a single event.
    async fn handle(&self, event: &SaleEvent) -> Result<(), HandlerError>;
}

/// Delivers sale events to an explicit, ordered list of handlers.
///
/// Each event, in the order it was recorded, goes to every handler in the
/// order they were registered. Events are delivered at most once: they have
/// already been drained from the aggregate and are not retried.
#[derive(Default)]
pub struct EventDispatcher {
    handlers: Vec<Box<dyn EventHandler>>,
}

impl EventDispatcher {
    /// Creates a dispatcher with no handlers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a handler after the existing ones.
    pub fn register(&mut self, handler: Box<dyn EventHandler>) {
        self.handlers.push(handler);
    }

    /// Builder-style [`register`](Self::register).
    pub fn with_handler(mut self, handler: impl EventHandler + 'static) -> Self {
        self.register(Box::new(handler));
        self
    }

    /// Returns the number of registered handlers.
    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    /// Returns the handler names in registration order.
    pub fn handler_names(&self) -> Vec<&'static str> {
        self.handlers.iter().map(|h| h.name()).collect()
    }

    /// Delivers `events` to every handler, stopping at the first failure.
    #[tracing::instrument(skip(self, events), fields(event_count = events.len()))]
    pub async fn dispatch(&self, events: &[SaleEvent]) -> Result<(), DispatchError> {
        for event in events {
            for handler in &self.handlers {
                if let Err(source) = handler.handle(event).await {
                    tracing::error!(
                        handler = handler.name(),
                        event_type = event.event_type(),
                        sale_id = %event.sale_id(),
                        error = %source,
                        "event handler failed"
                    );
                    metrics::counter!("sale_event_handler_failures_total").increment(1);
                    return Err(DispatchError {
                        handler: handler.name(),
                        event_type: event.event_type(),
                        sale_id: event.sale_id(),
                        source,
                    });
                }
            }
            metrics::counter!("sale_events_dispatched_total", "event_type" => event.event_type())
                .increment(1);
        }
        Ok(())
    }
}
