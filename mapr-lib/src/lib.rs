//! Annotation browser tree library
//!
//! A Rust async client for the OMERO.web read API behind the mapr and map
//! annotation browsers: a lazily loaded object tree, annotation value search
//! and `?show=` deep links.

pub mod api;
pub mod autocomplete;
pub mod config;
pub mod error;
pub mod model;
pub mod session;
pub mod tree;

mod client;

pub use client::*;
pub use session::Session;
pub use session::SessionProvider;
pub use session::StaticSession;
