pub mod analysis;
pub mod handlers;
pub mod routes;
pub mod tickets;

pub use routes::create_router;
