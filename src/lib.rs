pub mod aggregate;
pub mod app;
pub mod chart;
pub mod config;
pub mod csv;
pub mod errors;
pub mod export;
pub mod filter;
pub mod handlers;
pub mod institutions;
pub mod locations;
pub mod marriage;
pub mod models;
pub mod news;
pub mod prayer;
pub mod qibla;
pub mod record;
pub mod services;
pub mod state;
pub mod stats;
pub mod storage;
pub mod ui;
pub mod worship;

pub use app::router;
pub use config::Settings;
pub use state::AppState;
pub use storage::Upstream;
