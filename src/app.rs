use crate::handlers;
use crate::state::SharedState;
use axum::{routing::{get, post}, Router};

pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/api/dashboard", get(handlers::get_dashboard))
        .route("/api/state", get(handlers::get_state))
        .route("/api/expenses", post(handlers::update_expense))
        .route("/api/income", post(handlers::update_income))
        .route("/api/budget", post(handlers::update_budget))
        .route("/api/view", post(handlers::update_view))
        .with_state(state)
}
