//! Backend read API: routes, loading and search

mod decode;
mod filter;
mod loader;
mod routes;
mod search;
mod source;

pub use decode::*;
pub use filter::*;
pub use loader::*;
pub use routes::*;
pub use search::*;
pub use source::*;

#[cfg(test)]
pub(crate) use source::fixture;
