use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    error::{AppError, Result},
    notification::notification_models::NotificationEvent,
    state::AppState,
    websocket::types::{JobPostedPayload, WsMessage},
};
use super::{job_dto::CreateJobRequest, job_models::Job};

/// Post a new job (clients only)
#[utoipa::path(
    post,
    path = "/api/jobs",
    request_body = CreateJobRequest,
    responses(
        (status = 201, description = "Job posted", body = Job),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Only clients can post jobs"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "jobs",
    security(("bearer_auth" = []))
)]
pub async fn create_job(
    State(state): State<AppState>,
    Extension(user_id): Extension<Uuid>,
    Json(payload): Json<CreateJobRequest>,
) -> Result<impl IntoResponse> {
    payload.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let user = state
        .user_repository
        .find_by_id(user_id)
        .await?
        .ok_or(AppError::NotFound("User not found".to_string()))?;

    if !user.is_client() {
        return Err(AppError::Forbidden("Only clients can post jobs".to_string()));
    }

    let job = state
        .job_repository
        .create(user_id, &payload.title, payload.description.as_deref(), payload.budget)
        .await?;

    // Let connected freelancers see new work as it appears
    state.ws_connections.broadcast(WsMessage::JobPosted(JobPostedPayload {
        job_id: job.id,
        client_id: job.client_id,
        title: job.title.clone(),
        budget: job.budget,
    }));

    // Durable inbox entries for freelancers this client already worked with
    match state.chat_service.freelancer_contacts(user_id).await {
        Ok(contacts) => {
            for freelancer_id in contacts {
                state
                    .notification_service
                    .notify(
                        freelancer_id,
                        NotificationEvent::JobPosted { job_id: job.id },
                        format!("{} posted a new job: {}", user.username, job.title),
                    )
                    .await;
            }
        }
        Err(e) => {
            tracing::error!("Failed to fan out job posting {}: {}", job.id, e);
        }
    }

    Ok((StatusCode::CREATED, Json(job)))
}

/// List recently posted jobs
#[utoipa::path(
    get,
    path = "/api/jobs",
    responses(
        (status = 200, description = "List of jobs", body = Vec<Job>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "jobs",
    security(("bearer_auth" = []))
)]
pub async fn get_jobs(State(state): State<AppState>) -> Result<Json<Vec<Job>>> {
    let jobs = state.job_repository.find_recent(50).await?;
    Ok(Json(jobs))
}

/// Get a single job
#[utoipa::path(
    get,
    path = "/api/jobs/{id}",
    params(
        ("id" = Uuid, Path, description = "Job ID")
    ),
    responses(
        (status = 200, description = "Job", body = Job),
        (status = 404, description = "Job not found"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "jobs",
    security(("bearer_auth" = []))
)]
pub async fn get_job(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
) -> Result<Json<Job>> {
    let job = state
        .job_repository
        .find_by_id(job_id)
        .await?
        .ok_or(AppError::NotFound("Job not found".to_string()))?;

    Ok(Json(job))
}
