pub mod adapters;
pub mod application;
pub mod domain;
pub mod infra;

// Factories, in-memory repos and the test AppState builder
#[cfg(test)]
pub mod test_utils;

// Re-exports for shorter use statements.
pub use application::*;
pub use domain::*;
