pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod store;

use config::Config;
use store::Stores;

pub struct AppState {
    pub stores: Stores,
    pub config: Config,
}
