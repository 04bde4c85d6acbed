//! Service layer: fetching, formatting and notifying.

pub mod fetcher;
pub mod formatter;
pub mod notifier;

pub use fetcher::{HttpFetcher, PageSource};
pub use formatter::{format_change, format_heartbeat};
pub use notifier::{Notifier, NotifierConfig};
