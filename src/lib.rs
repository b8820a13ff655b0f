//! Attendance Engine: employee time clock with pause tracking
//!
//! This crate implements the clock-in/clock-out state machine with nested
//! pauses, the effective worked-time computation that nets pauses out of a
//! span, an in-memory store behind a repository trait, and a JSON API.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod service;
pub mod store;
