//! Common library for the Agora platform
//!
//! This crate provides shared functionality used across the Agora services,
//! currently database connectivity and the error types that go with it.

pub mod database;
pub mod error;
