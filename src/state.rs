use crate::db::{DB, EmployeeStore, UserStore};
use crate::utils::jwt::{JwtConfig, TokenService};

/// Everything a handler needs. Cloned per request, so every field is a cheap handle.
#[derive(Clone)]
pub struct AppState {
    pub db: DB,
    pub users: UserStore,
    pub employees: EmployeeStore,
    pub tokens: TokenService,
}

impl AppState {
    pub fn new(db: DB, jwt: &JwtConfig) -> Self {
        Self {
            users: UserStore::new(db.clone()),
            employees: EmployeeStore::new(db.clone()),
            tokens: TokenService::new(jwt),
            db,
        }
    }
}
