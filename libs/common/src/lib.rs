//! Common library for the identity platform
//!
//! This crate provides shared infrastructure used across services:
//! PostgreSQL connection pooling, health checks, and the store-level
//! error type every repository builds on.

pub mod database;
pub mod error;
