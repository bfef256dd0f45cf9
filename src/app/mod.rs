// App layer: the HTTP surface and the wiring that builds a store from config.

pub mod error;
pub mod routes;
pub mod state;

pub use routes::build_router;
pub use state::build_store;
