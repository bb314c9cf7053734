use crate::dashboard::Dashboard;
use crate::errors::AppError;
use crate::models::{
    AppState, BudgetInput, BudgetResponse, DashboardSnapshot, ExpenseInput, IncomeInput, ViewInput,
};
use crate::state::SharedState;
use crate::storage::persist_state;
use crate::ui::render_index;
use axum::{extract::State, response::Html, Json};
use tracing::error;

pub async fn index(State(state): State<SharedState>) -> Html<String> {
    let dashboard = state.dashboard.lock().await;
    Html(render_index(&dashboard))
}

pub async fn get_dashboard(State(state): State<SharedState>) -> Json<DashboardSnapshot> {
    let dashboard = state.dashboard.lock().await;
    Json(dashboard.snapshot())
}

pub async fn get_state(State(state): State<SharedState>) -> Json<AppState> {
    let dashboard = state.dashboard.lock().await;
    Json(dashboard.to_state())
}

pub async fn update_expense(
    State(state): State<SharedState>,
    Json(payload): Json<ExpenseInput>,
) -> Result<Json<DashboardSnapshot>, AppError> {
    let mut dashboard = state.dashboard.lock().await;
    dashboard.apply_expense(&payload)?;
    save(&state, &dashboard).await?;
    Ok(Json(dashboard.snapshot()))
}

pub async fn update_income(
    State(state): State<SharedState>,
    Json(payload): Json<IncomeInput>,
) -> Result<Json<DashboardSnapshot>, AppError> {
    let mut dashboard = state.dashboard.lock().await;
    dashboard.apply_income(&payload)?;
    save(&state, &dashboard).await?;
    Ok(Json(dashboard.snapshot()))
}

pub async fn update_budget(
    State(state): State<SharedState>,
    Json(payload): Json<BudgetInput>,
) -> Result<Json<BudgetResponse>, AppError> {
    let mut dashboard = state.dashboard.lock().await;
    let budget_applied = dashboard.apply_budget(&payload);
    if budget_applied {
        save(&state, &dashboard).await?;
    }
    Ok(Json(BudgetResponse {
        budget_applied,
        dashboard: dashboard.snapshot(),
    }))
}

pub async fn update_view(
    State(state): State<SharedState>,
    Json(payload): Json<ViewInput>,
) -> Result<Json<DashboardSnapshot>, AppError> {
    let mut dashboard = state.dashboard.lock().await;
    dashboard.apply_view(&payload)?;
    save(&state, &dashboard).await?;
    Ok(Json(dashboard.snapshot()))
}

async fn save(state: &SharedState, dashboard: &Dashboard) -> Result<(), AppError> {
    persist_state(&state.data_path, &dashboard.to_state())
        .await
        .inspect_err(|err| error!("failed to save dashboard state: {}", err.message))
}
