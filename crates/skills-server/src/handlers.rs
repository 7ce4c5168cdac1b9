//! HTTP handlers

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use skills_model::{
    FieldDefinition, FormSchema, Level, ManagerReview, NewSurveyResponse, Rating, ResponseId,
    ResponseUpdate, SurveyResponse, ValidationError,
};
use skills_review::{analyze, AnalyticsReport, GapStatus, ReviewPhase, ReviewSession, SkillStats};
use skills_store::StoreError;
use skills_taxonomy::TaxonomyConfig;
use tracing::info;

use crate::error::ApiResult;
use crate::state::AppState;

const DEFAULT_TOP: usize = 10;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: crate::VERSION,
    })
}

// --- Responses ---

#[derive(Debug, Serialize, Deserialize)]
pub struct CreatedResponse {
    pub id: ResponseId,
}

pub async fn list_responses(State(state): State<AppState>) -> ApiResult<Json<Vec<SurveyResponse>>> {
    Ok(Json(state.responses.list_responses().await?))
}

pub async fn create_response(
    State(state): State<AppState>,
    Json(intake): Json<NewSurveyResponse>,
) -> ApiResult<(StatusCode, Json<CreatedResponse>)> {
    let id = state.responses.create_response(intake).await?;
    info!(%id, "Survey response submitted");
    Ok((StatusCode::CREATED, Json(CreatedResponse { id })))
}

pub async fn get_response(
    State(state): State<AppState>,
    Path(id): Path<ResponseId>,
) -> ApiResult<Json<SurveyResponse>> {
    Ok(Json(load(&state, id).await?))
}

pub async fn update_response(
    State(state): State<AppState>,
    Path(id): Path<ResponseId>,
    Json(update): Json<ResponseUpdate>,
) -> ApiResult<Json<SurveyResponse>> {
    Ok(Json(state.responses.update_response(id, update).await?))
}

pub async fn delete_response(
    State(state): State<AppState>,
    Path(id): Path<ResponseId>,
) -> ApiResult<StatusCode> {
    state.responses.delete_response(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn load(state: &AppState, id: ResponseId) -> ApiResult<SurveyResponse> {
    state
        .responses
        .get_response(id)
        .await?
        .ok_or_else(|| StoreError::NotFound(id).into())
}

// --- Manager review ---

/// One reconciled record as sent to clients
#[derive(Debug, Serialize)]
pub struct RecordView {
    pub skill: String,
    pub section: String,
    pub self_rating: Rating,
    pub expectation: Rating,
    pub manager_rating: Rating,
    pub gap: Option<i8>,
    pub status: GapStatus,
}

#[derive(Debug, Serialize)]
pub struct SectionSummary {
    pub key: String,
    pub title: String,
    pub skills: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ReviewView {
    pub response_id: ResponseId,
    pub phase: ReviewPhase,
    pub records: Vec<RecordView>,
    pub sections: Vec<SectionSummary>,
    pub overall_manager_review: Option<String>,
}

impl From<&ReviewSession> for ReviewView {
    fn from(session: &ReviewSession) -> Self {
        let sheet = session.sheet();
        Self {
            response_id: sheet.response_id(),
            phase: session.phase(),
            records: sheet
                .records()
                .iter()
                .map(|r| RecordView {
                    skill: r.skill.clone(),
                    section: r.section.clone(),
                    self_rating: r.self_rating,
                    expectation: r.expectation,
                    manager_rating: r.manager_rating,
                    gap: r.gap(),
                    status: r.status(),
                })
                .collect(),
            sections: sheet
                .sections()
                .into_iter()
                .map(|s| SectionSummary {
                    key: s.key.to_string(),
                    title: s.title.to_string(),
                    skills: s.records.iter().map(|r| r.skill.clone()).collect(),
                })
                .collect(),
            overall_manager_review: sheet.overall().map(str::to_string),
        }
    }
}

/// Manager rating edit; a null or zero rating clears it
#[derive(Debug, Deserialize)]
pub struct RatingEdit {
    pub skill: String,
    #[serde(default)]
    pub section: Option<String>,
    #[serde(default)]
    pub rating: Rating,
}

#[derive(Debug, Deserialize)]
pub struct ExpectationEdit {
    pub skill: String,
    #[serde(default)]
    pub section: Option<String>,
    pub expectation: u8,
}

/// Edits applied through the review engine
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ReviewEdits {
    pub ratings: Vec<RatingEdit>,
    pub expectations: Vec<ExpectationEdit>,
    pub overall: Option<String>,
}

pub async fn get_review(
    State(state): State<AppState>,
    Path(id): Path<ResponseId>,
) -> ApiResult<Json<ReviewView>> {
    let response = load(&state, id).await?;
    let session = ReviewSession::open(response, state.taxonomy.clone());
    Ok(Json(ReviewView::from(&session)))
}

pub async fn put_review(
    State(state): State<AppState>,
    Path(id): Path<ResponseId>,
    Json(review): Json<ManagerReview>,
) -> ApiResult<Json<SurveyResponse>> {
    Ok(Json(state.responses.save_manager_review(id, review).await?))
}

pub async fn post_review(
    State(state): State<AppState>,
    Path(id): Path<ResponseId>,
    Json(edits): Json<ReviewEdits>,
) -> ApiResult<Json<ReviewView>> {
    let response = load(&state, id).await?;
    let mut session = ReviewSession::open(response, state.taxonomy.clone());
    session.edit()?;

    for edit in edits.ratings {
        let section = edit
            .section
            .unwrap_or_else(|| state.taxonomy.section_of(&edit.skill).to_string());
        match edit.rating.level() {
            Some(level) => session.apply_manager_rating(&edit.skill, &section, level)?,
            None => session.clear_manager_rating(&edit.skill, &section)?,
        }
    }

    for edit in edits.expectations {
        let level = Level::new(edit.expectation).ok_or(ValidationError::ExpectationOutOfRange {
            skill: edit.skill.clone(),
            value: edit.expectation,
        })?;
        let section = edit
            .section
            .unwrap_or_else(|| state.taxonomy.section_of(&edit.skill).to_string());
        session.set_expectation(&edit.skill, &section, level)?;
    }

    if edits.overall.is_some() {
        session.set_overall(edits.overall)?;
    }

    session.save(state.responses.as_ref()).await?;
    Ok(Json(ReviewView::from(&session)))
}

// --- Form schema ---

#[derive(Debug, Deserialize)]
pub struct SchemaRequest {
    pub fields: Vec<FieldDefinition>,
}

pub async fn get_schema(State(state): State<AppState>) -> ApiResult<Json<FormSchema>> {
    let schema = state
        .schemas
        .get_schema()
        .await?
        .ok_or(StoreError::SchemaNotFound)?;
    Ok(Json(schema))
}

pub async fn create_schema(
    State(state): State<AppState>,
    Json(request): Json<SchemaRequest>,
) -> ApiResult<(StatusCode, Json<FormSchema>)> {
    let schema = state.schemas.create_schema(request.fields).await?;
    Ok((StatusCode::CREATED, Json(schema)))
}

pub async fn update_schema(
    State(state): State<AppState>,
    Json(request): Json<SchemaRequest>,
) -> ApiResult<Json<FormSchema>> {
    Ok(Json(state.schemas.update_schema(request.fields).await?))
}

// --- Analytics / taxonomy ---

#[derive(Debug, Deserialize)]
pub struct AnalyticsQuery {
    pub top: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct AnalyticsResponse {
    #[serde(flatten)]
    pub report: AnalyticsReport,
    pub top: Vec<SkillStats>,
}

pub async fn analytics(
    State(state): State<AppState>,
    Query(query): Query<AnalyticsQuery>,
) -> ApiResult<Json<AnalyticsResponse>> {
    let responses = state.responses.list_responses().await?;
    let report = analyze(&responses, &state.taxonomy);
    let top = report
        .top_by_count(query.top.unwrap_or(DEFAULT_TOP))
        .into_iter()
        .cloned()
        .collect();
    Ok(Json(AnalyticsResponse { report, top }))
}

pub async fn taxonomy(State(state): State<AppState>) -> Json<TaxonomyConfig> {
    Json(state.taxonomy.to_config())
}
