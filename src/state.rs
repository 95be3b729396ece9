use std::sync::Arc;

use crate::config::SecurityConfig;
use crate::database::Store;
use crate::services::{AddRoleService, RemoveRoleService, RoleAssigner, RoleRemover, UserService};
use crate::views::Views;

/// Shared handles injected into every handler
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub users: Arc<UserService>,
    pub role_assigner: Arc<dyn RoleAssigner>,
    pub role_remover: Arc<dyn RoleRemover>,
    pub views: Arc<Views>,
    pub security: Arc<SecurityConfig>,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, security: SecurityConfig) -> Result<Self, minijinja::Error> {
        Ok(Self {
            users: Arc::new(UserService::new(store.clone())),
            role_assigner: Arc::new(AddRoleService::new(store.clone())),
            role_remover: Arc::new(RemoveRoleService::new(store.clone())),
            views: Arc::new(Views::new()?),
            security: Arc::new(security),
            store,
        })
    }

    pub fn with_role_assigner(mut self, assigner: Arc<dyn RoleAssigner>) -> Self {
        self.role_assigner = assigner;
        self
    }

    pub fn with_role_remover(mut self, remover: Arc<dyn RoleRemover>) -> Self {
        self.role_remover = remover;
        self
    }
}
