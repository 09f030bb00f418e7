//! Helpers for tests that need a trained network on disk.

pub mod model;

pub use model::{ModelFixture, logistic_artifact};
