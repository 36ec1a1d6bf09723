//! Shared constants used across the application.

/// Base URL of the hosted posts API.
pub const DEFAULT_API_BASE_URL: &str = "https://dev.codeleap.co.uk";

/// Collection path of the posts resource, relative to the base URL.
pub const POSTS_PATH: &str = "/careers/";

/// User agent sent with every API request.
pub const USER_AGENT: &str = concat!("social-feed/", env!("CARGO_PKG_VERSION"));

/// Storage key holding the logged-in display name.
pub const LOGGED_NAME_KEY: &str = "logged_name";
