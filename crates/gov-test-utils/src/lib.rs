//! Shared test utilities for the governance engine workspace.
//!
//! A dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`project`]: [`TestProject`] builder for scratch project trees

pub mod project;

pub use project::TestProject;
