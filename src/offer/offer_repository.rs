use crate::error::Result;
use sqlx::PgPool;
use uuid::Uuid;

use super::offer_models::{Offer, OfferStatus};

#[derive(Clone)]
pub struct OfferRepository {
    pool: PgPool,
}

impl OfferRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        chat_id: Uuid,
        freelancer_id: Uuid,
        client_id: Uuid,
        amount: f64,
        delivery_time: &str,
        description: &str,
    ) -> Result<Offer> {
        let offer = sqlx::query_as::<_, Offer>(
            "INSERT INTO offers (chat_id, freelancer_id, client_id, amount, delivery_time, description)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING *",
        )
        .bind(chat_id)
        .bind(freelancer_id)
        .bind(client_id)
        .bind(amount)
        .bind(delivery_time)
        .bind(description)
        .fetch_one(&self.pool)
        .await?;

        Ok(offer)
    }

    pub async fn find_by_id(&self, offer_id: Uuid) -> Result<Option<Offer>> {
        let offer = sqlx::query_as::<_, Offer>("SELECT * FROM offers WHERE id = $1")
            .bind(offer_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(offer)
    }

    /// All offers of a chat, newest first; resolved history stays visible
    /// next to fresh proposals.
    pub async fn find_for_chat(&self, chat_id: Uuid) -> Result<Vec<Offer>> {
        let offers = sqlx::query_as::<_, Offer>(
            "SELECT * FROM offers
             WHERE chat_id = $1
             ORDER BY created_at DESC",
        )
        .bind(chat_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(offers)
    }

    /// Compare-and-swap on the pending precondition. Of two concurrent
    /// responses exactly one matches the WHERE clause; the other gets `None`
    /// and is reported as a state conflict.
    pub async fn resolve_if_pending(
        &self,
        offer_id: Uuid,
        status: OfferStatus,
    ) -> Result<Option<Offer>> {
        let offer = sqlx::query_as::<_, Offer>(
            "UPDATE offers
             SET status = $2, updated_at = now()
             WHERE id = $1 AND status = 'pending'
             RETURNING *",
        )
        .bind(offer_id)
        .bind(status)
        .fetch_optional(&self.pool)
        .await?;

        Ok(offer)
    }
}
