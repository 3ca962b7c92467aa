mod error;
pub mod extract;
pub mod middleware;
pub mod models;
mod server;
pub mod services;
pub mod state;
pub(crate) mod utils;

pub use error::{ApiError, ApiResult, ErrorReport};
pub use server::{App, router, run};
