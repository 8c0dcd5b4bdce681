//! HTTP request handlers for the backend API.
//!
//! This module contains the handler functions for all API endpoints. The
//! two engine cores (estimation, attendance reconciliation) live in their
//! own modules; everything else here is thin glue over the document store.

use axum::{
    Json, Router,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use chrono::Utc;
use serde_json::{Value, json};
use tracing::{info, warn};
use uuid::Uuid;

use crate::attendance::record_attendance;
use crate::error::{EngineError, EngineResult};
use crate::estimation::estimate;
use crate::models::{
    AttendanceEntry, DEFAULT_PICTURE, EstimateRequest, Labour, Material, MaterialUsage, Project,
    SavedEstimate, UserProfile,
};
use crate::store::collections;

use super::request::{
    AddLabourRequest, AddMaterialRequest, AddMaterialToProjectRequest, AddProjectRequest,
    AttendanceRequest, EditMaterialInProjectRequest, EditProfileRequest, MarkStatusRequest,
    MaterialIdQuery, ProjectIdQuery, RegisterRequest, RosterUpdateRequest, SaveEstimateRequest,
    UidQuery, UpdateMaterialRequest, UpsertCoefficientsRequest, UpsertPricesRequest, UserIdQuery,
};
use super::response::{ApiError, ApiErrorResponse};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/estimateMaterialCost", post(estimate_handler))
        .route("/saveEstimate", post(save_estimate_handler))
        .route("/myEstimates", get(my_estimates_handler))
        .route("/prices", get(prices_handler).post(upsert_prices_handler))
        .route("/coefficients", post(upsert_coefficients_handler))
        .route("/coefficients/:projectType", get(coefficients_handler))
        .route("/addLabour", post(add_labour_handler))
        .route("/labour", get(labour_list_handler))
        .route("/addLabourAttendance", post(attendance_handler))
        .route("/addMaterial", post(add_material_handler))
        .route("/material", get(material_list_handler))
        .route("/getMaterialById", get(material_by_id_handler))
        .route("/updateMaterial", post(update_material_handler))
        .route("/addProject", post(add_project_handler))
        .route("/projects", get(project_list_handler))
        .route("/getProjectById", get(project_by_id_handler))
        .route("/markProjectStatus", post(mark_status_handler))
        .route("/addLabourToProject", post(roster_update_handler))
        .route("/addMaterialToProject", post(add_material_to_project_handler))
        .route("/editMaterialInProject", put(edit_material_in_project_handler))
        .route("/registerId", post(register_handler))
        .route("/getCurrentUser", get(current_user_handler))
        .route("/editProfile", post(edit_profile_handler))
        .with_state(state)
}

/// Maps a JSON extraction failure to an error response, shared by every
/// POST/PUT handler below.
fn require_json<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, Response> {
    match payload {
        Ok(Json(body)) => Ok(body),
        Err(rejection) => {
            let error = match rejection {
                JsonRejection::JsonDataError(err) => {
                    let body_text = err.body_text();
                    warn!(error = %body_text, "JSON data error");
                    if body_text.contains("missing field") {
                        ApiError::new("VALIDATION_ERROR", body_text)
                    } else {
                        ApiError::malformed_json(body_text)
                    }
                }
                JsonRejection::JsonSyntaxError(err) => {
                    warn!(error = %err, "JSON syntax error");
                    ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
                }
                JsonRejection::MissingJsonContentType(_) => ApiError::new(
                    "MISSING_CONTENT_TYPE",
                    "Content-Type must be application/json",
                ),
                _ => ApiError::malformed_json("Failed to parse request body"),
            };
            Err((StatusCode::BAD_REQUEST, Json(error)).into_response())
        }
    }
}

/// Maps a query-string extraction failure to a validation error response.
fn require_query<T>(query: Result<Query<T>, QueryRejection>) -> Result<T, Response> {
    match query {
        Ok(Query(params)) => Ok(params),
        Err(rejection) => Err((
            StatusCode::BAD_REQUEST,
            Json(ApiError::validation_error(rejection.body_text())),
        )
            .into_response()),
    }
}

fn engine_error(err: EngineError) -> Response {
    ApiErrorResponse::from(err).into_response()
}

fn non_empty(field: &str, value: &str) -> EngineResult<()> {
    if value.trim().is_empty() {
        return Err(EngineError::validation(field, "is required"));
    }
    Ok(())
}

/// Extracts the token from an `Authorization: Bearer` header.
fn bearer_token(headers: &HeaderMap) -> EngineResult<String> {
    let header = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| EngineError::Unauthorized {
            message: "Authorization token missing or malformed".to_string(),
        })?;
    header
        .strip_prefix("Bearer ")
        .map(str::to_string)
        .ok_or_else(|| EngineError::Unauthorized {
            message: "Authorization token missing or malformed".to_string(),
        })
}

// ---------------------------------------------------------------------------
// Estimation
// ---------------------------------------------------------------------------

/// Handler for `POST /estimateMaterialCost`.
async fn estimate_handler(
    State(state): State<AppState>,
    payload: Result<Json<EstimateRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing estimate request");

    let request = match require_json(payload) {
        Ok(request) => request,
        Err(response) => return response,
    };

    match estimate(state.store(), &request).await {
        Ok(result) => {
            info!(
                correlation_id = %correlation_id,
                total = %result.total,
                currency = %result.currency,
                "Estimate completed"
            );
            (
                StatusCode::OK,
                [(header::CONTENT_TYPE, "application/json")],
                Json(result),
            )
                .into_response()
        }
        Err(err) => {
            warn!(correlation_id = %correlation_id, error = %err, "Estimate failed");
            engine_error(err)
        }
    }
}

/// Handler for `POST /saveEstimate`.
async fn save_estimate_handler(
    State(state): State<AppState>,
    payload: Result<Json<SaveEstimateRequest>, JsonRejection>,
) -> Response {
    let request = match require_json(payload) {
        Ok(request) => request,
        Err(response) => return response,
    };

    let saved = SavedEstimate {
        id: String::new(),
        user_id: request.user_id,
        created_at: Utc::now(),
        input: request.input,
        result: request.result,
    };
    let doc = match serde_json::to_value(&saved) {
        Ok(doc) => doc,
        Err(e) => {
            return engine_error(EngineError::Storage {
                message: format!("failed to serialize estimate: {e}"),
            });
        }
    };

    match state.store().add(collections::ESTIMATES, doc).await {
        Ok(id) => (StatusCode::OK, Json(json!({"message": "Estimate saved", "id": id})))
            .into_response(),
        Err(err) => engine_error(err),
    }
}

/// Handler for `GET /myEstimates?userId=`.
async fn my_estimates_handler(
    State(state): State<AppState>,
    query: Result<Query<UserIdQuery>, QueryRejection>,
) -> Response {
    let params = match require_query(query) {
        Ok(params) => params,
        Err(response) => return response,
    };

    let docs = match state
        .store()
        .query_eq(collections::ESTIMATES, "userId", &json!(params.user_id))
        .await
    {
        Ok(docs) => docs,
        Err(err) => return engine_error(err),
    };

    let mut estimates = Vec::with_capacity(docs.len());
    for doc in docs {
        let id = doc.get("id").and_then(Value::as_str).unwrap_or("?").to_string();
        match serde_json::from_value::<SavedEstimate>(doc) {
            Ok(saved) => estimates.push(saved),
            Err(e) => {
                return engine_error(EngineError::Storage {
                    message: format!("malformed estimate document '{id}': {e}"),
                });
            }
        }
    }
    estimates.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    (StatusCode::OK, Json(json!({"estimates": estimates}))).into_response()
}

// ---------------------------------------------------------------------------
// Catalog administration
// ---------------------------------------------------------------------------

/// Handler for `GET /prices`: every price catalog entry keyed by material.
async fn prices_handler(State(state): State<AppState>) -> Response {
    match state.store().all(collections::PRICES).await {
        Ok(docs) => {
            let data: serde_json::Map<String, Value> = docs.into_iter().collect();
            (StatusCode::OK, Json(Value::Object(data))).into_response()
        }
        Err(err) => engine_error(err),
    }
}

/// Handler for `POST /prices`: merge-upsert catalog entries.
async fn upsert_prices_handler(
    State(state): State<AppState>,
    payload: Result<Json<UpsertPricesRequest>, JsonRejection>,
) -> Response {
    let request = match require_json(payload) {
        Ok(request) => request,
        Err(response) => return response,
    };
    if request.prices.is_empty() {
        return engine_error(EngineError::validation("prices", "object is required"));
    }

    let count = request.prices.len();
    let docs: Vec<String> = request.prices.keys().cloned().collect();
    for (material, entry) in request.prices {
        // Merge the submitted fields as-is; fields absent from the payload
        // stay untouched in the stored document.
        if !entry.is_object() {
            return engine_error(EngineError::validation(
                format!("prices.{material}"),
                "must be an object",
            ));
        }
        if let Err(err) = state
            .store()
            .set_merge(collections::PRICES, &material, entry)
            .await
        {
            return engine_error(err);
        }
    }

    (
        StatusCode::OK,
        Json(json!({"message": "Prices upserted", "count": count, "docs": docs})),
    )
        .into_response()
}

/// Handler for `GET /coefficients/:projectType`.
async fn coefficients_handler(
    State(state): State<AppState>,
    Path(project_type): Path<String>,
) -> Response {
    match state
        .store()
        .get(collections::COEFFICIENTS, &project_type)
        .await
    {
        Ok(Some(doc)) => (StatusCode::OK, Json(doc)).into_response(),
        Ok(None) => engine_error(EngineError::not_found("coefficients", project_type)),
        Err(err) => engine_error(err),
    }
}

/// Handler for `POST /coefficients`: merge-upsert coefficient documents.
async fn upsert_coefficients_handler(
    State(state): State<AppState>,
    payload: Result<Json<UpsertCoefficientsRequest>, JsonRejection>,
) -> Response {
    let request = match require_json(payload) {
        Ok(request) => request,
        Err(response) => return response,
    };
    if request.coefficients.is_empty() {
        return engine_error(EngineError::validation("coefficients", "object is required"));
    }

    let count = request.coefficients.len();
    let docs: Vec<String> = request.coefficients.keys().cloned().collect();
    for (project_type, set) in request.coefficients {
        if !set.is_object() {
            return engine_error(EngineError::validation(
                format!("coefficients.{project_type}"),
                "must be an object",
            ));
        }
        if let Err(err) = state
            .store()
            .set_merge(collections::COEFFICIENTS, &project_type, set)
            .await
        {
            return engine_error(err);
        }
    }

    (
        StatusCode::OK,
        Json(json!({"message": "Coefficients upserted", "count": count, "docs": docs})),
    )
        .into_response()
}

// ---------------------------------------------------------------------------
// Labour
// ---------------------------------------------------------------------------

/// Handler for `POST /addLabour`.
async fn add_labour_handler(
    State(state): State<AppState>,
    payload: Result<Json<AddLabourRequest>, JsonRejection>,
) -> Response {
    let request = match require_json(payload) {
        Ok(request) => request,
        Err(response) => return response,
    };
    for (field, value) in [
        ("userId", &request.user_id),
        ("name", &request.name),
        ("contact", &request.contact),
        ("role", &request.role),
        ("adhaarNo", &request.adhaar_no),
    ] {
        if let Err(err) = non_empty(field, value) {
            return engine_error(err);
        }
    }

    let now = Utc::now();
    let attendance: Vec<AttendanceEntry> = request
        .valid_attendance()
        .iter()
        .map(|event| AttendanceEntry::from_event(event, now))
        .collect();

    let labour = Labour {
        id: String::new(),
        user_id: Some(request.user_id),
        name: request.name,
        wages: request.wages,
        contact: request.contact,
        adhaar_no: request.adhaar_no,
        role: request.role,
        is_logged_in: request.is_logged_in,
        attendance,
        created_at: now,
    };
    let doc = match serde_json::to_value(&labour) {
        Ok(doc) => doc,
        Err(e) => {
            return engine_error(EngineError::Storage {
                message: format!("failed to serialize labour: {e}"),
            });
        }
    };

    match state.store().add(collections::LABOURS, doc).await {
        Ok(id) => (
            StatusCode::CREATED,
            Json(json!({"message": "Labour added successfully", "id": id})),
        )
            .into_response(),
        Err(err) => engine_error(err),
    }
}

/// Handler for `GET /labour?userId=`.
async fn labour_list_handler(
    State(state): State<AppState>,
    query: Result<Query<UserIdQuery>, QueryRejection>,
) -> Response {
    let params = match require_query(query) {
        Ok(params) => params,
        Err(response) => return response,
    };
    match state
        .store()
        .query_eq(collections::LABOURS, "userId", &json!(params.user_id))
        .await
    {
        Ok(labours) => (StatusCode::OK, Json(json!({"labours": labours}))).into_response(),
        Err(err) => engine_error(err),
    }
}

/// Handler for `POST /addLabourAttendance`.
async fn attendance_handler(
    State(state): State<AppState>,
    payload: Result<Json<AttendanceRequest>, JsonRejection>,
) -> Response {
    let request = match require_json(payload) {
        Ok(request) => request,
        Err(response) => return response,
    };

    match record_attendance(state.store(), &request.labour_id, &request.attendance).await {
        Ok(updated) => (
            StatusCode::OK,
            Json(json!({
                "message": "Attendance and login status updated successfully",
                "updatedLabour": updated,
            })),
        )
            .into_response(),
        Err(err) => engine_error(err),
    }
}

// ---------------------------------------------------------------------------
// Material inventory
// ---------------------------------------------------------------------------

/// Handler for `POST /addMaterial`.
async fn add_material_handler(
    State(state): State<AppState>,
    payload: Result<Json<AddMaterialRequest>, JsonRejection>,
) -> Response {
    let request = match require_json(payload) {
        Ok(request) => request,
        Err(response) => return response,
    };
    for (field, value) in [
        ("userId", &request.user_id),
        ("material", &request.material),
        ("unit", &request.unit),
        ("status", &request.status),
    ] {
        if let Err(err) = non_empty(field, value) {
            return engine_error(err);
        }
    }

    let material = Material {
        id: String::new(),
        user_id: request.user_id,
        material: request.material,
        quantity: request.quantity,
        unit: request.unit,
        status: request.status,
        created_at: Utc::now(),
        updated_at: None,
    };
    let doc = match serde_json::to_value(&material) {
        Ok(doc) => doc,
        Err(e) => {
            return engine_error(EngineError::Storage {
                message: format!("failed to serialize material: {e}"),
            });
        }
    };

    match state.store().add(collections::MATERIALS, doc).await {
        Ok(id) => (
            StatusCode::CREATED,
            Json(json!({"message": "Material added successfully", "id": id})),
        )
            .into_response(),
        Err(err) => engine_error(err),
    }
}

/// Handler for `GET /material?userId=`.
async fn material_list_handler(
    State(state): State<AppState>,
    query: Result<Query<UserIdQuery>, QueryRejection>,
) -> Response {
    let params = match require_query(query) {
        Ok(params) => params,
        Err(response) => return response,
    };
    match state
        .store()
        .query_eq(collections::MATERIALS, "userId", &json!(params.user_id))
        .await
    {
        Ok(materials) => (StatusCode::OK, Json(json!({"materials": materials}))).into_response(),
        Err(err) => engine_error(err),
    }
}

/// Handler for `GET /getMaterialById?materialId=`.
async fn material_by_id_handler(
    State(state): State<AppState>,
    query: Result<Query<MaterialIdQuery>, QueryRejection>,
) -> Response {
    let params = match require_query(query) {
        Ok(params) => params,
        Err(response) => return response,
    };
    match state
        .store()
        .get(collections::MATERIALS, &params.material_id)
        .await
    {
        Ok(Some(doc)) => (StatusCode::OK, Json(json!({"material": doc}))).into_response(),
        Ok(None) => engine_error(EngineError::not_found("material", params.material_id)),
        Err(err) => engine_error(err),
    }
}

/// Handler for `POST /updateMaterial`.
async fn update_material_handler(
    State(state): State<AppState>,
    payload: Result<Json<UpdateMaterialRequest>, JsonRejection>,
) -> Response {
    let request = match require_json(payload) {
        Ok(request) => request,
        Err(response) => return response,
    };

    let existing = match state.store().get(collections::MATERIALS, &request.id).await {
        Ok(existing) => existing,
        Err(err) => return engine_error(err),
    };
    if existing.is_none() {
        return engine_error(EngineError::not_found("material", request.id));
    }

    let update = json!({
        "material": request.material,
        "quantity": request.quantity,
        "unit": request.unit,
        "status": request.status,
        "updatedAt": Utc::now(),
    });
    match state
        .store()
        .update(collections::MATERIALS, &request.id, update)
        .await
    {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({"message": "Material updated successfully"})),
        )
            .into_response(),
        Err(err) => engine_error(err),
    }
}

// ---------------------------------------------------------------------------
// Projects
// ---------------------------------------------------------------------------

/// Handler for `POST /addProject`.
async fn add_project_handler(
    State(state): State<AppState>,
    payload: Result<Json<AddProjectRequest>, JsonRejection>,
) -> Response {
    let request = match require_json(payload) {
        Ok(request) => request,
        Err(response) => return response,
    };
    for (field, value) in [
        ("uid", &request.uid),
        ("projectName", &request.project_name),
        ("location", &request.location),
    ] {
        if let Err(err) = non_empty(field, value) {
            return engine_error(err);
        }
    }

    let now = Utc::now();
    let project = Project {
        id: String::new(),
        uid: request.uid,
        project_name: request.project_name,
        location: request.location,
        description: request.description,
        start_date: request.start_date.unwrap_or(now),
        end_date: request.end_date.unwrap_or(now),
        is_completed: request.is_completed,
        project_labours: request.project_labours,
        project_materials: request.project_materials,
        created_at: now,
    };
    let doc = match serde_json::to_value(&project) {
        Ok(doc) => doc,
        Err(e) => {
            return engine_error(EngineError::Storage {
                message: format!("failed to serialize project: {e}"),
            });
        }
    };

    match state.store().add(collections::PROJECTS, doc).await {
        Ok(id) => (
            StatusCode::CREATED,
            Json(json!({"message": "Project added", "id": id})),
        )
            .into_response(),
        Err(err) => engine_error(err),
    }
}

/// Handler for `GET /projects?uid=`.
async fn project_list_handler(
    State(state): State<AppState>,
    query: Result<Query<UidQuery>, QueryRejection>,
) -> Response {
    let params = match require_query(query) {
        Ok(params) => params,
        Err(response) => return response,
    };
    match state
        .store()
        .query_eq(collections::PROJECTS, "uid", &json!(params.uid))
        .await
    {
        Ok(projects) => (StatusCode::OK, Json(json!({"projects": projects}))).into_response(),
        Err(err) => engine_error(err),
    }
}

/// Handler for `GET /getProjectById?projectId=`.
async fn project_by_id_handler(
    State(state): State<AppState>,
    query: Result<Query<ProjectIdQuery>, QueryRejection>,
) -> Response {
    let params = match require_query(query) {
        Ok(params) => params,
        Err(response) => return response,
    };
    match state
        .store()
        .get(collections::PROJECTS, &params.project_id)
        .await
    {
        Ok(Some(doc)) => (StatusCode::OK, Json(json!({"project": doc}))).into_response(),
        Ok(None) => engine_error(EngineError::not_found("project", params.project_id)),
        Err(err) => engine_error(err),
    }
}

/// Handler for `POST /markProjectStatus`.
async fn mark_status_handler(
    State(state): State<AppState>,
    payload: Result<Json<MarkStatusRequest>, JsonRejection>,
) -> Response {
    let request = match require_json(payload) {
        Ok(request) => request,
        Err(response) => return response,
    };

    match state
        .store()
        .get(collections::PROJECTS, &request.project_id)
        .await
    {
        Ok(Some(_)) => {}
        Ok(None) => return engine_error(EngineError::not_found("project", request.project_id)),
        Err(err) => return engine_error(err),
    }

    if let Err(err) = state
        .store()
        .update(
            collections::PROJECTS,
            &request.project_id,
            json!({"isCompleted": request.is_completed}),
        )
        .await
    {
        return engine_error(err);
    }

    match state.store().get(collections::PROJECTS, &request.project_id).await {
        Ok(Some(project)) => (
            StatusCode::OK,
            Json(json!({"message": "Project status updated", "project": project})),
        )
            .into_response(),
        Ok(None) => engine_error(EngineError::not_found("project", request.project_id)),
        Err(err) => engine_error(err),
    }
}

/// Handler for `POST /addLabourToProject`: replaces the roster wholesale.
async fn roster_update_handler(
    State(state): State<AppState>,
    payload: Result<Json<RosterUpdateRequest>, JsonRejection>,
) -> Response {
    let request = match require_json(payload) {
        Ok(request) => request,
        Err(response) => return response,
    };

    match state
        .store()
        .get(collections::PROJECTS, &request.project_id)
        .await
    {
        Ok(Some(_)) => {}
        Ok(None) => return engine_error(EngineError::not_found("project", request.project_id)),
        Err(err) => return engine_error(err),
    }

    let roster = match serde_json::to_value(&request.project_labours) {
        Ok(roster) => roster,
        Err(e) => {
            return engine_error(EngineError::Storage {
                message: format!("failed to serialize roster: {e}"),
            });
        }
    };
    if let Err(err) = state
        .store()
        .update(
            collections::PROJECTS,
            &request.project_id,
            json!({"projectLabours": roster}),
        )
        .await
    {
        return engine_error(err);
    }

    match state.store().get(collections::PROJECTS, &request.project_id).await {
        Ok(Some(project)) => (
            StatusCode::OK,
            Json(json!({"message": "Labour added to project", "project": project})),
        )
            .into_response(),
        Ok(None) => engine_error(EngineError::not_found("project", request.project_id)),
        Err(err) => engine_error(err),
    }
}

/// Handler for `POST /addMaterialToProject`.
///
/// Records a material draw-down on the project and decrements the inventory
/// record it was drawn from. Both documents are checked before either write;
/// the decrement is not guarded against going negative.
async fn add_material_to_project_handler(
    State(state): State<AppState>,
    payload: Result<Json<AddMaterialToProjectRequest>, JsonRejection>,
) -> Response {
    let request = match require_json(payload) {
        Ok(request) => request,
        Err(response) => return response,
    };
    let draw = request.project_material;

    match state
        .store()
        .get(collections::PROJECTS, &request.project_id)
        .await
    {
        Ok(Some(_)) => {}
        Ok(None) => return engine_error(EngineError::not_found("project", request.project_id)),
        Err(err) => return engine_error(err),
    }

    let inventory_doc = match state.store().get(collections::MATERIALS, &draw.id).await {
        Ok(Some(doc)) => doc,
        Ok(None) => return engine_error(EngineError::not_found("material", draw.id)),
        Err(err) => return engine_error(err),
    };
    let inventory: Material = match serde_json::from_value(inventory_doc) {
        Ok(inventory) => inventory,
        Err(e) => {
            return engine_error(EngineError::Storage {
                message: format!("malformed material document '{}': {e}", draw.id),
            });
        }
    };

    let usage = MaterialUsage {
        id: crate::store::DocumentStore::generate_id(),
        material_id: Some(draw.id.clone()),
        quantity: draw.quantity,
        extra: draw.extra,
    };
    let usage_value = match serde_json::to_value(&usage) {
        Ok(value) => value,
        Err(e) => {
            return engine_error(EngineError::Storage {
                message: format!("failed to serialize material usage: {e}"),
            });
        }
    };
    if let Err(err) = state
        .store()
        .array_union(
            collections::PROJECTS,
            &request.project_id,
            "projectMaterials",
            vec![usage_value],
        )
        .await
    {
        return engine_error(err);
    }

    let remaining = inventory.quantity - draw.quantity;
    if let Err(err) = state
        .store()
        .update(
            collections::MATERIALS,
            &draw.id,
            json!({"quantity": remaining, "updatedAt": Utc::now()}),
        )
        .await
    {
        return engine_error(err);
    }

    (
        StatusCode::OK,
        Json(json!({"message": "Material added to project", "usageId": usage.id})),
    )
        .into_response()
}

/// Handler for `PUT /editMaterialInProject`: merges fields into the usage
/// entry with the matching id.
async fn edit_material_in_project_handler(
    State(state): State<AppState>,
    payload: Result<Json<EditMaterialInProjectRequest>, JsonRejection>,
) -> Response {
    let request = match require_json(payload) {
        Ok(request) => request,
        Err(response) => return response,
    };
    let Some(target_id) = request
        .updated_material
        .get("id")
        .and_then(Value::as_str)
        .map(str::to_string)
    else {
        return engine_error(EngineError::validation(
            "updatedMaterial.id",
            "is required",
        ));
    };

    let project_doc = match state
        .store()
        .get(collections::PROJECTS, &request.project_id)
        .await
    {
        Ok(Some(doc)) => doc,
        Ok(None) => return engine_error(EngineError::not_found("project", request.project_id)),
        Err(err) => return engine_error(err),
    };

    let mut usages: Vec<Value> = project_doc
        .get("projectMaterials")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();
    let mut found = false;
    for usage in usages.iter_mut() {
        if usage.get("id").and_then(Value::as_str) == Some(target_id.as_str()) {
            if let Value::Object(fields) = usage {
                for (key, value) in &request.updated_material {
                    fields.insert(key.clone(), value.clone());
                }
            }
            found = true;
        }
    }
    if !found {
        return engine_error(EngineError::not_found("projectMaterial", target_id));
    }

    if let Err(err) = state
        .store()
        .update(
            collections::PROJECTS,
            &request.project_id,
            json!({"projectMaterials": usages}),
        )
        .await
    {
        return engine_error(err);
    }

    (
        StatusCode::OK,
        Json(json!({
            "message": "Project material updated successfully",
            "updatedMaterial": request.updated_material,
        })),
    )
        .into_response()
}

// ---------------------------------------------------------------------------
// Authentication
// ---------------------------------------------------------------------------

/// Handler for `POST /registerId`: verifies a token and creates the user
/// profile on first sight.
async fn register_handler(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Response {
    let request = match require_json(payload) {
        Ok(request) => request,
        Err(response) => return response,
    };
    if let Err(err) = non_empty("token", &request.token) {
        return engine_error(err);
    }

    let claims = match state.auth().verify_id_token(&request.token).await {
        Ok(claims) => claims,
        Err(err) => {
            warn!(error = %err, "Token verification failed");
            return engine_error(err);
        }
    };

    let phone_number = claims.phone_number.clone().or(request.phone_number);

    let existing = match state.store().get(collections::USERS, &claims.uid).await {
        Ok(existing) => existing,
        Err(err) => return engine_error(err),
    };
    if existing.is_none() {
        let profile = UserProfile {
            uid: claims.uid.clone(),
            name: claims.name.clone(),
            email: claims.email.clone(),
            phone_number: phone_number.clone(),
            picture: claims.picture.clone().unwrap_or_else(|| DEFAULT_PICTURE.to_string()),
            created_at: Utc::now(),
        };
        let doc = match serde_json::to_value(&profile) {
            Ok(doc) => doc,
            Err(e) => {
                return engine_error(EngineError::Storage {
                    message: format!("failed to serialize profile: {e}"),
                });
            }
        };
        if let Err(err) = state
            .store()
            .set_merge(collections::USERS, &claims.uid, doc)
            .await
        {
            return engine_error(err);
        }
        info!(uid = %claims.uid, "User profile created");
    }

    (
        StatusCode::OK,
        Json(json!({
            "message": "User authenticated",
            "uid": claims.uid,
            "email": claims.email,
            "phoneNumber": phone_number,
        })),
    )
        .into_response()
}

/// Handler for `GET /getCurrentUser` with `Authorization: Bearer`.
async fn current_user_handler(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let token = match bearer_token(&headers) {
        Ok(token) => token,
        Err(err) => return engine_error(err),
    };
    let claims = match state.auth().verify_id_token(&token).await {
        Ok(claims) => claims,
        Err(err) => return engine_error(err),
    };

    match state.store().get(collections::USERS, &claims.uid).await {
        Ok(Some(doc)) => (StatusCode::OK, Json(json!({"user": doc}))).into_response(),
        Ok(None) => engine_error(EngineError::not_found("user", claims.uid)),
        Err(err) => engine_error(err),
    }
}

/// Handler for `POST /editProfile`: partial profile update.
async fn edit_profile_handler(
    State(state): State<AppState>,
    payload: Result<Json<EditProfileRequest>, JsonRejection>,
) -> Response {
    let request = match require_json(payload) {
        Ok(request) => request,
        Err(response) => return response,
    };
    if let Err(err) = non_empty("uid", &request.uid) {
        return engine_error(err);
    }

    let existing = match state.store().get(collections::USERS, &request.uid).await {
        Ok(existing) => existing,
        Err(err) => return engine_error(err),
    };
    if existing.is_none() {
        return engine_error(EngineError::not_found("user", request.uid));
    }

    let mut update = serde_json::Map::new();
    if let Some(email) = request.email {
        update.insert("email".to_string(), json!(email));
    }
    if let Some(name) = request.name {
        update.insert("name".to_string(), json!(name));
    }
    if let Some(phone_number) = request.phone_number {
        update.insert("phoneNumber".to_string(), json!(phone_number));
    }
    if let Some(picture) = request.picture {
        update.insert("picture".to_string(), json!(picture));
    }
    update.insert("updatedAt".to_string(), json!(Utc::now()));

    match state
        .store()
        .update(collections::USERS, &request.uid, Value::Object(update))
        .await
    {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({"message": "Profile updated successfully"})),
        )
            .into_response(),
        Err(err) => engine_error(err),
    }
}
