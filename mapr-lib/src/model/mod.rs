//! Data model

mod id;
mod kind;
mod node;
mod payload;

pub use id::*;
pub use kind::*;
pub use node::*;
pub use payload::*;
