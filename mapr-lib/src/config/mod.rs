//! Menu and tree configuration

mod menu;
mod settings;

pub use menu::*;
pub use settings::*;
