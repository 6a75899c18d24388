//! # Employee Handlers
//!
//! Thin request binding around [`EmployeeAccessor`](employee_persistence::EmployeeAccessor).

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use chrono::Utc;
use serde::Deserialize;

use crate::context::ApiContext;
use crate::error::{ApiError, ApiResult};
use employee_domain::{
    Employee, EmployeeCreateRequest, EmployeeList, EmployeeUpdateRequest, Pagination,
};

/// Raw pagination query; values are parsed leniently by [`Pagination`].
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub page: Option<String>,
    #[serde(rename = "perPage")]
    pub per_page: Option<String>,
}

/// `GET /api/employee`
pub async fn list_employees(
    State(ctx): State<ApiContext>,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<EmployeeList>> {
    let pagination = Pagination::from_query(params.per_page.as_deref(), params.page.as_deref())?;

    tracing::debug!(
        limit = pagination.limit(),
        page = pagination.page(),
        "Listing employees"
    );

    let list = ctx.accessor.list(&pagination).await?;
    Ok(Json(list))
}

/// `GET /api/employee/{id}`
pub async fn get_employee(
    State(ctx): State<ApiContext>,
    Path(raw_id): Path<String>,
) -> ApiResult<Response> {
    let Ok(id) = raw_id.parse::<i64>() else {
        return Ok(StatusCode::NOT_FOUND.into_response());
    };

    let employee = ctx.accessor.get_by_id(id).await?;
    Ok(Json(employee).into_response())
}

/// `POST /api/employee`
pub async fn create_employee(
    State(ctx): State<ApiContext>,
    payload: Result<Json<EmployeeCreateRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Employee>)> {
    let Json(mut request) = payload.map_err(|e| ApiError::InvalidInput(e.body_text()))?;
    request.normalize();
    request.validate(Utc::now())?;

    let employee = ctx.accessor.create(&request).await?;
    Ok((StatusCode::CREATED, Json(employee)))
}

/// `PUT /api/employee/{id}`
pub async fn update_employee(
    State(ctx): State<ApiContext>,
    Path(raw_id): Path<String>,
    payload: Result<Json<EmployeeUpdateRequest>, JsonRejection>,
) -> ApiResult<Response> {
    let Ok(id) = raw_id.parse::<i64>() else {
        return Ok(StatusCode::NOT_FOUND.into_response());
    };

    let Json(mut request) = payload.map_err(|e| ApiError::InvalidInput(e.body_text()))?;
    request.normalize();
    request.validate(Utc::now())?;
    request.id = id;

    tracing::info!(id, "Updating employee");

    let employee = ctx.accessor.update(&request).await?;
    Ok(Json(employee).into_response())
}
