use crate::dashboard::Dashboard;
use crate::errors::AppError;
use crate::models::AppState;
use std::{env, path::Path, path::PathBuf};
use tokio::fs;
use tracing::{error, info};

/// Key the whole dashboard state is stored under.
pub const STATE_KEY: &str = "expenseAppState_v1";

pub fn resolve_data_path() -> Result<PathBuf, std::io::Error> {
    if let Ok(path) = env::var("APP_DATA_PATH") {
        return Ok(PathBuf::from(path));
    }

    Ok(PathBuf::from("data").join(format!("{STATE_KEY}.json")))
}

/// Never fails: a missing or unreadable blob yields the empty state.
pub async fn load_state(path: &Path) -> AppState {
    match fs::read(path).await {
        Ok(bytes) => match serde_json::from_slice(&bytes) {
            Ok(state) => state,
            Err(err) => {
                error!("failed to parse saved state {}: {err}", path.display());
                AppState::default()
            }
        },
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => AppState::default(),
        Err(err) => {
            error!("failed to read saved state {}: {err}", path.display());
            AppState::default()
        }
    }
}

/// Overwrites the saved state. The blob is written beside the target and
/// renamed over it, so readers see either the old or the new state.
pub async fn persist_state(path: &Path, state: &AppState) -> Result<(), AppError> {
    let payload = serde_json::to_vec_pretty(state).map_err(AppError::internal)?;
    let staging = path.with_extension("json.tmp");
    fs::write(&staging, payload).await?;
    fs::rename(&staging, path).await?;
    Ok(())
}

/// Loads the saved state and rebuilds all totals from its raw text.
pub async fn restore(path: &Path) -> Dashboard {
    let state = load_state(path).await;
    let dashboard = Dashboard::from_state(&state);
    info!(
        "restored dashboard from {}: expense {}, income {}",
        path.display(),
        dashboard.totals().total_expense(),
        dashboard.totals().total_income()
    );
    dashboard
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, ViewMode};

    fn scratch_path(name: &str) -> PathBuf {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        env::temp_dir().join(format!(
            "budget_dashboard_{name}_{}_{nanos}.json",
            std::process::id()
        ))
    }

    fn sample_state() -> AppState {
        let mut state = AppState::default();
        state.expenses.insert(
            Category::BasicLiving,
            vec!["1200".into(), "".into(), " 7 ".into(), "n/a".into()],
        );
        state.expenses.insert(Category::Savings, vec!["-15".into()]);
        state.income = vec!["".into(), "3000".into(), "".into(), "".into(), "1e2".into()];
        state.monthly_budget = 2500.0;
        state.active_mode = ViewMode::Income;
        state.sidebar_view = "category".into();
        state.sidebar_category = Some("Savings".into());
        state
    }

    #[tokio::test]
    async fn save_then_load_preserves_raw_text() {
        let path = scratch_path("roundtrip");
        let state = sample_state();

        persist_state(&path, &state).await.unwrap();
        assert_eq!(load_state(&path).await, state);

        persist_state(&path, &AppState::default()).await.unwrap();
        assert_eq!(load_state(&path).await, AppState::default());

        let _ = fs::remove_file(&path).await;
    }

    #[tokio::test]
    async fn missing_blob_loads_default() {
        let path = scratch_path("missing");
        assert_eq!(load_state(&path).await, AppState::default());
    }

    #[tokio::test]
    async fn corrupt_blob_loads_default() {
        let path = scratch_path("corrupt");
        fs::write(&path, b"{\"expenses\": [oops").await.unwrap();
        assert_eq!(load_state(&path).await, AppState::default());

        fs::write(&path, b"{\"income\": \"2500\"}").await.unwrap();
        assert_eq!(load_state(&path).await, AppState::default());

        let _ = fs::remove_file(&path).await;
    }

    #[tokio::test]
    async fn unknown_category_keeps_the_rest_of_the_blob() {
        let path = scratch_path("unknown_category");
        fs::write(
            &path,
            br#"{"expenses":{"Food":["300"],"Pets":["5"]},"income":["","2500"],"monthlyBudget":900}"#,
        )
        .await
        .unwrap();

        let dashboard = restore(&path).await;
        assert_eq!(dashboard.totals().categories().get(Category::Food), 300.0);
        assert_eq!(dashboard.totals().total_expense(), 300.0);
        assert_eq!(dashboard.totals().total_income(), 2500.0);
        assert_eq!(dashboard.totals().budget().value(), 900.0);

        let _ = fs::remove_file(&path).await;
    }

    #[tokio::test]
    async fn restore_recomputes_from_raw_text() {
        let path = scratch_path("restore");
        persist_state(&path, &sample_state()).await.unwrap();

        let dashboard = restore(&path).await;
        assert_eq!(dashboard.totals().total_expense(), 1192.0);
        assert_eq!(dashboard.totals().total_income(), 3100.0);
        assert_eq!(dashboard.totals().budget().value(), 2500.0);

        let snapshot = dashboard.snapshot();
        assert_eq!(snapshot.active_mode, ViewMode::Income);
        assert_eq!(snapshot.sidebar_category.as_deref(), Some("Savings"));

        let _ = fs::remove_file(&path).await;
    }
}
