//! Messages exchanged by the actors.
//!
//! Keys become [`UiEvent`]s for the app actor, which talks to the network
//! actor through [`NetworkCommand`] / [`NetworkResponse`] and publishes a
//! [`RenderState`] snapshot after every change.

pub mod network;
pub mod render;
pub mod ui_events;

pub use network::{NetworkCommand, NetworkResponse};
pub use render::RenderState;
pub use ui_events::{InputMode, Screen, UiEvent};
