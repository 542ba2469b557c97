use crate::error::AppError;
use crate::middleware::auth::{AdminUser, AuthenticatedUser};
use crate::models::employee::{
    CreatedEmployee, DepartmentAvgSalary, Employee, ListQuery, NewEmployee, SkillQuery,
};
use crate::state::AppState;
use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde_json::{Value, json};

/// Lists employees.
///
/// Supports query parameters:
/// - department: exact match
/// - page / limit: 1-based paging, limit capped at 100
///
/// Without `page` or `limit` everything comes back.
pub async fn list_employees(
    _user: AuthenticatedUser,
    State(state): State<AppState>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<Json<Vec<Employee>>, AppError> {
    let Query(query) = query?;
    let filter = query.into_filter().map_err(AppError::Validation)?;

    let employees = state.employees.list(&filter).await?;
    tracing::debug!(count = employees.len(), department = ?filter.department, "listed employees");
    Ok(Json(employees))
}

pub async fn get_employee(
    _user: AuthenticatedUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Employee>, AppError> {
    state
        .employees
        .get(&id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Employee '{id}' not found")))
}

pub async fn create_employee(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    payload: Result<Json<NewEmployee>, JsonRejection>,
) -> Result<(StatusCode, Json<CreatedEmployee>), AppError> {
    let Json(payload) = payload?;
    payload.validate().map_err(AppError::Validation)?;

    let id = state.employees.insert(payload).await?;

    tracing::info!(employee_id = %id, by = %admin.username, "employee created");
    Ok((
        StatusCode::CREATED,
        Json(CreatedEmployee {
            message: format!("Employee {id} created successfully"),
            id,
        }),
    ))
}

pub async fn delete_employee(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    state.employees.delete(&id).await?;

    tracing::info!(employee_id = %id, by = %admin.username, "employee deleted");
    Ok(Json(json!({ "message": format!("Employee {id} deleted successfully") })))
}

/// Names of employees with the given skill, alphabetically.
pub async fn search_by_skill(
    _user: AuthenticatedUser,
    State(state): State<AppState>,
    query: Result<Query<SkillQuery>, QueryRejection>,
) -> Result<Json<Vec<String>>, AppError> {
    let Query(query) = query?;
    let skill = query
        .skill
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| AppError::Validation("skill query parameter is required".to_string()))?;

    Ok(Json(state.employees.search_by_skill(&skill).await?))
}

pub async fn average_salary(
    _user: AuthenticatedUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<DepartmentAvgSalary>>, AppError> {
    Ok(Json(state.employees.average_salary_by_department().await?))
}
