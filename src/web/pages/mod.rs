//! Maud-based page templates for the web UI.
//!
//! Each page module exports a render function that produces the complete HTML.

pub mod feed;
pub mod login;

pub use feed::{render_feed_page, FeedPageParams};
pub use login::render_login_page;
