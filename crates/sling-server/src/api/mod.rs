pub mod lock;
pub mod route;

pub use route::routes;
