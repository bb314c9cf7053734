pub mod app;
pub mod dashboard;
pub mod errors;
pub mod handlers;
pub mod input;
pub mod metrics;
pub mod models;
pub mod state;
pub mod storage;
pub mod totals;
pub mod ui;

pub use app::router;
pub use dashboard::Dashboard;
pub use state::SharedState;
pub use storage::{resolve_data_path, restore};
