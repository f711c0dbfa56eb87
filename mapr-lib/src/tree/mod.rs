//! Headless browser tree: ordering, state, events and deep links

mod deep_link;
mod event;
mod sort;
mod state;

pub use deep_link::*;
pub use event::*;
pub use sort::*;
pub use state::*;
