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
    state::AppState,
};
use super::{
    offer_dto::{CreateOfferRequest, OfferResolution, RespondOfferRequest},
    offer_models::Offer,
};

/// Propose an offer in a conversation (freelancer only)
#[utoipa::path(
    post,
    path = "/api/chats/{id}/offers",
    params(
        ("id" = Uuid, Path, description = "Chat ID")
    ),
    request_body = CreateOfferRequest,
    responses(
        (status = 201, description = "Offer created", body = Offer),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Only the freelancer can make an offer"),
        (status = 404, description = "Chat not found"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "offers",
    security(("bearer_auth" = []))
)]
pub async fn create_offer(
    State(state): State<AppState>,
    Extension(user_id): Extension<Uuid>,
    Path(chat_id): Path<Uuid>,
    Json(payload): Json<CreateOfferRequest>,
) -> Result<impl IntoResponse> {
    payload.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let offer = state.offer_service.create_offer(user_id, chat_id, payload).await?;

    Ok((StatusCode::CREATED, Json(offer)))
}

/// List a conversation's offers, newest first
#[utoipa::path(
    get,
    path = "/api/chats/{id}/offers",
    params(
        ("id" = Uuid, Path, description = "Chat ID")
    ),
    responses(
        (status = 200, description = "Offers, newest first", body = Vec<Offer>),
        (status = 403, description = "Not a party of this conversation"),
        (status = 404, description = "Chat not found"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "offers",
    security(("bearer_auth" = []))
)]
pub async fn get_chat_offers(
    State(state): State<AppState>,
    Extension(user_id): Extension<Uuid>,
    Path(chat_id): Path<Uuid>,
) -> Result<Json<Vec<Offer>>> {
    let offers = state.offer_service.list_for_chat(user_id, chat_id).await?;
    Ok(Json(offers))
}

/// Accept or reject a pending offer (client only)
#[utoipa::path(
    post,
    path = "/api/offers/{id}/respond",
    params(
        ("id" = Uuid, Path, description = "Offer ID")
    ),
    request_body = RespondOfferRequest,
    responses(
        (status = 200, description = "Offer resolved", body = OfferResolution),
        (status = 403, description = "Only the client can respond"),
        (status = 404, description = "Offer not found"),
        (status = 409, description = "Offer already resolved"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "offers",
    security(("bearer_auth" = []))
)]
pub async fn respond_to_offer(
    State(state): State<AppState>,
    Extension(user_id): Extension<Uuid>,
    Path(offer_id): Path<Uuid>,
    Json(payload): Json<RespondOfferRequest>,
) -> Result<Json<OfferResolution>> {
    let resolution = state
        .offer_service
        .respond_to_offer(user_id, offer_id, payload.accept)
        .await?;

    Ok(Json(resolution))
}

/// Confirm checkout payment for an accepted offer (client only)
#[utoipa::path(
    post,
    path = "/api/offers/{id}/paid",
    params(
        ("id" = Uuid, Path, description = "Offer ID")
    ),
    responses(
        (status = 204, description = "Payment recorded"),
        (status = 403, description = "Only the client can confirm payment"),
        (status = 404, description = "Offer not found"),
        (status = 409, description = "Offer is not accepted"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "offers",
    security(("bearer_auth" = []))
)]
pub async fn confirm_payment(
    State(state): State<AppState>,
    Extension(user_id): Extension<Uuid>,
    Path(offer_id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    state.offer_service.confirm_payment(user_id, offer_id).await?;

    Ok(StatusCode::NO_CONTENT)
}
