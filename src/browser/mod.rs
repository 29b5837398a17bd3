//! Browser control over the Chrome DevTools Protocol.

mod client;

pub use client::{BrowserClient, DEFAULT_WAIT_TIMEOUT};
