//! App layer - navigation stack and screen state
//!
//! The App actor receives UI events and network responses, applies the
//! screen rules in `commands`, and emits network commands and render state.

pub mod state;
pub mod actor;
pub mod commands;

pub use state::AppState;
pub use actor::AppActor;
