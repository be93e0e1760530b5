//! Quiz session state machine
//!
//! Implements the Elm Architecture pattern with pure state transitions.
//! The transcript, feedback reconciler, question cursor and score all live
//! in [`SessionModel`]; only [`transition`] mutates them.

mod cursor;
mod effect;
pub mod event;
pub mod log;
mod reconcile;
mod score;
pub mod state;
pub(crate) mod transition;


pub use cursor::{CursorPosition, Progress};
pub use effect::{Effect, UiEvent};
pub use event::Event;
pub use log::Sender;
pub use state::{SessionContext, SessionModel};
pub use transition::transition;
