//! Reference database catalog boundary
//!
//! This crate owns the connection trait the pipeline introspects through,
//! the snapshot capture step, and a mock connection for tests and
//! fixture-driven runs. Real driver-backed connections live outside this
//! workspace; anything implementing [`DatabaseConnection`] plugs in.

pub mod capture;
pub mod connection;
pub mod mock;

pub use capture::capture;
pub use connection::{DatabaseConnection, QuotingGuard};
pub use mock::MockConnection;
