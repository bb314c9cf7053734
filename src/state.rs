use crate::dashboard::Dashboard;
use std::{path::PathBuf, sync::Arc};
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct SharedState {
    pub data_path: PathBuf,
    pub dashboard: Arc<Mutex<Dashboard>>,
}

impl SharedState {
    pub fn new(data_path: PathBuf, dashboard: Dashboard) -> Self {
        Self {
            data_path,
            dashboard: Arc::new(Mutex::new(dashboard)),
        }
    }
}
