//! Deck: projection, shuffle and the judgment state machine.

mod engine;
mod projector;
mod shuffle;

pub use engine::DeckEngine;
pub use projector::{dedupe_key, normalize_display, project};
pub use shuffle::shuffle;
