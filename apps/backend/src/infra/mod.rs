//! Infrastructure layer: application state assembly.

pub mod state;
