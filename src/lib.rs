//! Vidport - video upload and adaptive playback client
//!
//! This library crate exposes the upload pipeline and playback selector for
//! embedding shells and integration testing.

pub mod api;
pub mod catalog;
pub mod config;
pub mod notifications;
pub mod playback;
pub mod session;
pub mod upload;
