//! Infrastructure: venue access, the book cache, configuration, logging.

pub mod book_cache;
pub mod config;
pub mod logging;
pub mod sim;
pub mod venue;

pub use book_cache::{BookCache, BookError};
pub use config::{ConfigError, QuoterConfig};
pub use sim::SimVenue;
pub use venue::{BatchConfirmation, MarketData, OrderGateway, VenueError};
