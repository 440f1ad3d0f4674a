use std::sync::Arc;

use crate::auth::jwt::JwtKeys;
use crate::auth::repo::UserRepo;
use crate::config::AppConfig;
use crate::recordings::repo::RecordingRepo;
use crate::storage::StorageClient;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub jwt: JwtKeys,
    pub users: Arc<dyn UserRepo>,
    pub recordings: Arc<dyn RecordingRepo>,
    pub storage: Arc<dyn StorageClient>,
}

impl AppState {
    pub fn from_parts(
        config: Arc<AppConfig>,
        users: Arc<dyn UserRepo>,
        recordings: Arc<dyn RecordingRepo>,
        storage: Arc<dyn StorageClient>,
    ) -> Self {
        let jwt = JwtKeys::from_config(&config.jwt);
        Self {
            config,
            jwt,
            users,
            recordings,
            storage,
        }
    }
}
