//! HTTP layer.
//!
//! Serves the config selection page and the list/get endpoints on top of a
//! loaded [`ConfigStore`](crate::store::ConfigStore).

mod server;
pub mod templates;

pub use server::{AppState, ServerHandle, build_router, start_server};
pub use templates::IndexPage;
