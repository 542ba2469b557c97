use crate::handlers::{
    auth::{login, me, register},
    employees::{
        average_salary, create_employee, delete_employee, get_employee, list_employees,
        search_by_skill,
    },
    health::health_check,
};
use crate::middleware::rate_limit::LoginConfig;
use crate::state::AppState;
use axum::{
    Router,
    handler::Handler,
    routing::{get, post},
};
use std::sync::Arc;
use tower_governor::GovernorLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub fn create_routes(state: AppState, login_conf: Arc<LoginConfig>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let auth_routes = Router::new()
        .route("/register", post(register))
        .route("/login", post(login.layer(GovernorLayer::new(login_conf))))
        .route("/me", get(me));

    // Reads need any valid token, writes need an admin one. The handlers'
    // extractors enforce that, so no route layer is needed here.
    let employee_routes = Router::new()
        .route("/", get(list_employees).post(create_employee))
        .route("/search", get(search_by_skill))
        .route("/avg-salary", get(average_salary))
        .route("/{id}", get(get_employee).delete(delete_employee));

    Router::new()
        .route("/health", get(health_check))
        .nest("/auth", auth_routes)
        .nest("/employees", employee_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
