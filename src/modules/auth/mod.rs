pub mod controller;
pub mod extractor;
pub mod interface;
pub mod routes;
pub mod schema;

pub use routes::{admin_routes, auth_routes};
