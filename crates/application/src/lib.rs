//! Application layer for the sales system.
//!
//! Wires the [`Sale`](domain::Sale) aggregate to a
//! [`SaleRepository`](sale_store::SaleRepository) and an
//! [`EventDispatcher`]. Every use case on [`SaleService`] follows the same
//! unit of work: load, mutate, persist, then dispatch the drained events.

pub mod config;
pub mod dispatcher;
pub mod error;
pub mod handlers;
pub mod service;
pub mod telemetry;

pub use config::{Config, LogFormat};
pub use dispatcher::{EventDispatcher, EventHandler, HandlerError};
pub use error::{ApplicationError, DispatchError, Result};
pub use handlers::{LoggingHandler, SaleActivity, SaleStatus, SalesActivityView};
pub use service::{Page, SaleService};
