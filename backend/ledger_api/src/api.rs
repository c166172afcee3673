//! Axum REST API handlers.
//!
//! Every response body is an [`Envelope`]: `{"ok": true, "value": ...}` on
//! success, `{"ok": false, "error": "<reason>"}` on failure. Mutating routes
//! take the caller from the `x-caller-identity` header. Journaling happens
//! inside the ledger through its event sink, not in the handlers.

use std::sync::Arc;

use art_restoration::{types::amount_str, Amount, GuardedLedger, Identity, LedgerPolicy, ProjectId};
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tracing::debug;

use crate::db::{self, JournalRecord};
use crate::errors::{ApiError, Result};

pub const CALLER_HEADER: &str = "x-caller-identity";

pub struct ApiState {
    pub ledger: GuardedLedger<Box<dyn LedgerPolicy>>,
    pub pool: SqlitePool,
}

pub fn router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/projects", post(create_project))
        .route("/projects/:id", get(get_project))
        .route("/projects/:id/fund", post(fund_project))
        .route("/projects/:id/funders/:funder", get(get_funder_amount))
        .route("/projects/:id/shares", post(mint_shares).get(get_share_total))
        .route("/projects/:id/shares/transfer", post(transfer_shares))
        .route("/projects/:id/events", get(get_project_events))
        .route("/events", get(get_all_events))
        .with_state(state)
}

// ─────────────────────────────────────────────────────────
// Request / response shapes
// ─────────────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> Envelope<T> {
    pub fn success(value: T) -> Self {
        Self {
            ok: true,
            value: Some(value),
            error: None,
        }
    }

    pub fn failure(error: String) -> Self {
        Self {
            ok: false,
            value: None,
            error: Some(error),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateProjectRequest {
    pub name: String,
    pub description: String,
    #[serde(with = "amount_str")]
    pub funding_goal: Amount,
}

#[derive(Debug, Deserialize)]
pub struct FundRequest {
    #[serde(with = "amount_str")]
    pub amount: Amount,
}

#[derive(Debug, Deserialize)]
pub struct MintRequest {
    pub shares: u64,
}

#[derive(Debug, Deserialize)]
pub struct TransferRequest {
    pub recipient: Identity,
}

#[derive(Serialize)]
pub struct EventsResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<ProjectId>,
    pub count: usize,
    pub events: Vec<JournalRecord>,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub policy: &'static str,
}

// ─────────────────────────────────────────────────────────
// Extraction helpers
// ─────────────────────────────────────────────────────────

fn caller(headers: &HeaderMap) -> Result<Identity> {
    headers
        .get(CALLER_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(Identity::from)
        .ok_or_else(|| ApiError::BadRequest(format!("Missing {CALLER_HEADER} header")))
}

fn project_id(raw: &str) -> Result<ProjectId> {
    raw.parse()
        .map_err(|_| ApiError::BadRequest(format!("Invalid project id {raw:?}")))
}

fn body<T>(payload: std::result::Result<Json<T>, JsonRejection>) -> Result<T> {
    payload
        .map(|Json(v)| v)
        .map_err(|e| ApiError::BadRequest(e.body_text()))
}

// ─────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────

/// `GET /health`
pub async fn health(State(state): State<Arc<ApiState>>) -> impl IntoResponse {
    Json(Envelope::success(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        policy: state.ledger.policy().name(),
    }))
}

/// `POST /projects`
pub async fn create_project(
    State(state): State<Arc<ApiState>>,
    headers: HeaderMap,
    payload: std::result::Result<Json<CreateProjectRequest>, JsonRejection>,
) -> Result<impl IntoResponse> {
    let owner = caller(&headers)?;
    let req = body(payload)?;

    let id = state
        .ledger
        .create_project(&owner, req.name, req.description, req.funding_goal);

    Ok((StatusCode::CREATED, Json(Envelope::success(id))))
}

/// `GET /projects/:id`
pub async fn get_project(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let project = state.ledger.get_project(project_id(&id)?)?;
    Ok(Json(Envelope::success(project)))
}

/// `POST /projects/:id/fund`
///
/// The caller is recorded as the funder.
pub async fn fund_project(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<String>,
    headers: HeaderMap,
    payload: std::result::Result<Json<FundRequest>, JsonRejection>,
) -> Result<impl IntoResponse> {
    let funder = caller(&headers)?;
    let id = project_id(&id)?;
    let req = body(payload)?;

    state.ledger.fund_project(id, req.amount, &funder)?;

    Ok(Json(Envelope::success(true)))
}

/// `GET /projects/:id/funders/:funder`
///
/// Amount is a decimal string; unknown pairs report `"0"`.
pub async fn get_funder_amount(
    State(state): State<Arc<ApiState>>,
    Path((id, funder)): Path<(String, String)>,
) -> Result<impl IntoResponse> {
    let id = project_id(&id)?;
    let amount = state.ledger.get_funder_amount(id, &Identity::from(funder));
    Ok(Json(Envelope::success(amount.to_string())))
}

/// `POST /projects/:id/shares`
pub async fn mint_shares(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<String>,
    headers: HeaderMap,
    payload: std::result::Result<Json<MintRequest>, JsonRejection>,
) -> Result<impl IntoResponse> {
    let minter = caller(&headers)?;
    let id = project_id(&id)?;
    let req = body(payload)?;

    state.ledger.mint_shares(&minter, id, req.shares)?;

    Ok(Json(Envelope::success(true)))
}

/// `GET /projects/:id/shares`
pub async fn get_share_total(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let total = state.ledger.get_share_total(project_id(&id)?);
    Ok(Json(Envelope::success(total)))
}

/// `POST /projects/:id/shares/transfer`
///
/// Succeeds when the project has shares but moves nothing; holders are not
/// tracked by the ledger.
pub async fn transfer_shares(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<String>,
    headers: HeaderMap,
    payload: std::result::Result<Json<TransferRequest>, JsonRejection>,
) -> Result<impl IntoResponse> {
    let sender = caller(&headers)?;
    let id = project_id(&id)?;
    let req = body(payload)?;

    state.ledger.transfer_shares(id, &req.recipient)?;
    debug!(project_id = id, %sender, recipient = %req.recipient, "Transfer request accepted");

    Ok(Json(Envelope::success(true)))
}

/// `GET /projects/:id/events`
pub async fn get_project_events(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let id = project_id(&id)?;
    let events = db::get_events_for_project(&state.pool, id).await?;
    Ok(Json(Envelope::success(EventsResponse {
        project_id: Some(id),
        count: events.len(),
        events,
    })))
}

/// `GET /events`
pub async fn get_all_events(State(state): State<Arc<ApiState>>) -> Result<impl IntoResponse> {
    let events = db::get_all_events(&state.pool).await?;
    Ok(Json(Envelope::success(EventsResponse {
        project_id: None,
        count: events.len(),
        events,
    })))
}
