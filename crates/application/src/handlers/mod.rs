//! Built-in event handlers.

mod activity;
mod logging;

pub use activity::{SaleActivity, SaleStatus, SalesActivityView};
pub use logging::LoggingHandler;
