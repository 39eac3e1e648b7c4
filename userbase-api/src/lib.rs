pub mod docs;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod routes;

pub use routes::app;
