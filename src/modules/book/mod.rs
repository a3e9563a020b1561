pub mod controller;
pub mod crud;
pub mod geo;
pub mod interface;
pub mod model;
pub mod routes;
pub mod schema;
pub mod service;

pub use routes::book_routes;
