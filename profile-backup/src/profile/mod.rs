//! What gets copied for each browser profile, and where it lives.

pub mod manifest;
pub mod target;

pub use manifest::Manifest;
pub use target::{Browser, BrowserTarget};
