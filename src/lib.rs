pub mod config;
pub mod entities;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod store;
pub mod utils;

use std::sync::Arc;

use store::RowStore;

pub use config::Config;
pub use error::{AppError, AppResult};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn RowStore>,
    pub config: Config,
}
