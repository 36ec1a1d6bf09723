//! Social feed library.
//!
//! A small social feed front: a named session, a post list backed by the
//! `/careers/` REST API, and a server-rendered web UI for creating,
//! editing, deleting, liking and filtering posts.

// Allow raw string hashes for safety - they're harmless and prevent issues if content changes
#![allow(clippy::needless_raw_string_hashes)]

pub mod api;
pub mod components;
pub mod config;
pub mod constants;
pub mod feed;
pub mod modal;
pub mod session;
pub mod time_utils;
pub mod web;
