//! Terminal check-in clock. Shows the current time once a second, records
//! emoji-tagged check-ins on demand, and keeps the latest five across runs in
//! a single json slot under the application state directory.
//!

pub mod cli;
pub mod projector;
pub mod store;
pub mod tags;
pub mod ticker;
pub mod utils;
pub mod view;
