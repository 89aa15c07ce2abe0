use uuid::Uuid;

use crate::{
    chat::chat_repository::ChatRepository,
    error::{AppError, Result},
    notification::{notification_models::NotificationEvent, notification_service::NotificationService},
    websocket::{
        types::{OfferCreatedPayload, OfferResolvedPayload, WsMessage},
        ConnectionManager,
    },
};
use super::{
    offer_dto::{CreateOfferRequest, OfferResolution},
    offer_models::{Offer, OfferStatus},
    offer_repository::OfferRepository,
};

#[derive(Clone)]
pub struct OfferService {
    repo: OfferRepository,
    chat_repo: ChatRepository,
    notifier: NotificationService,
    ws: ConnectionManager,
}

impl OfferService {
    pub fn new(
        repo: OfferRepository,
        chat_repo: ChatRepository,
        notifier: NotificationService,
        ws: ConnectionManager,
    ) -> Self {
        Self {
            repo,
            chat_repo,
            notifier,
            ws,
        }
    }

    /// Only the freelancer side of a conversation proposes offers.
    pub async fn create_offer(
        &self,
        actor_id: Uuid,
        chat_id: Uuid,
        req: CreateOfferRequest,
    ) -> Result<Offer> {
        let chat = self
            .chat_repo
            .find_by_id(chat_id)
            .await?
            .ok_or(AppError::NotFound("Chat not found".to_string()))?;

        if actor_id != chat.freelancer_id {
            return Err(AppError::Forbidden(
                "Only the freelancer can make an offer".to_string(),
            ));
        }

        let offer = self
            .repo
            .create(
                chat_id,
                chat.freelancer_id,
                chat.client_id,
                req.amount,
                &req.delivery_time,
                &req.description,
            )
            .await?;

        self.chat_repo.touch_last_activity(chat_id).await?;

        self.ws.send_to_user(
            &chat.client_id,
            WsMessage::OfferCreated(OfferCreatedPayload {
                offer_id: offer.id,
                chat_id: offer.chat_id,
                freelancer_id: offer.freelancer_id,
                amount: offer.amount,
                delivery_time: offer.delivery_time.clone(),
                created_at: offer.created_at,
            }),
        );

        self.notifier
            .notify(
                chat.client_id,
                NotificationEvent::NewOffer {
                    chat_id,
                    offer_id: offer.id,
                },
                format!("You received a new offer of ${:.2}", offer.amount),
            )
            .await;

        Ok(offer)
    }

    /// Client accept/reject. The repository enforces the pending
    /// precondition, so a concurrent double-submit resolves to exactly one
    /// winner; the loser sees a conflict.
    pub async fn respond_to_offer(
        &self,
        actor_id: Uuid,
        offer_id: Uuid,
        accept: bool,
    ) -> Result<OfferResolution> {
        let offer = self
            .repo
            .find_by_id(offer_id)
            .await?
            .ok_or(AppError::NotFound("Offer not found".to_string()))?;

        if actor_id != offer.client_id {
            return Err(AppError::Forbidden(
                "Only the client can respond to this offer".to_string(),
            ));
        }

        if offer.status.is_terminal() {
            return Err(AppError::Conflict(
                "Offer has already been resolved".to_string(),
            ));
        }

        let status = OfferStatus::resolve(accept);
        let offer = self
            .repo
            .resolve_if_pending(offer_id, status)
            .await?
            .ok_or(AppError::Conflict(
                "Offer has already been resolved".to_string(),
            ))?;

        let checkout_url = accept.then(|| format!("/checkout/{}", offer.id));

        let event = if accept {
            NotificationEvent::OfferAccepted {
                chat_id: offer.chat_id,
                offer_id: offer.id,
            }
        } else {
            NotificationEvent::OfferRejected {
                chat_id: offer.chat_id,
                offer_id: offer.id,
            }
        };
        let message = if accept {
            format!("Your offer of ${:.2} was accepted", offer.amount)
        } else {
            format!("Your offer of ${:.2} was declined", offer.amount)
        };
        self.notifier.notify(offer.freelancer_id, event, message).await;

        self.ws.send_to_user(
            &offer.freelancer_id,
            WsMessage::OfferResolved(OfferResolvedPayload {
                offer_id: offer.id,
                chat_id: offer.chat_id,
                status: offer.status,
                checkout_url: checkout_url.clone(),
            }),
        );

        Ok(OfferResolution {
            offer,
            checkout_url,
        })
    }

    /// Checkout callback: the client reports the accepted offer as paid.
    /// Both sides get a receipt in their inbox.
    pub async fn confirm_payment(&self, actor_id: Uuid, offer_id: Uuid) -> Result<()> {
        let offer = self
            .repo
            .find_by_id(offer_id)
            .await?
            .ok_or(AppError::NotFound("Offer not found".to_string()))?;

        if actor_id != offer.client_id {
            return Err(AppError::Forbidden(
                "Only the client can confirm payment".to_string(),
            ));
        }

        if offer.status != OfferStatus::Accepted {
            return Err(AppError::Conflict(
                "Only an accepted offer can be paid".to_string(),
            ));
        }

        let chat = self
            .chat_repo
            .find_by_id(offer.chat_id)
            .await?
            .ok_or(AppError::NotFound("Chat not found".to_string()))?;

        self.notifier
            .notify(
                offer.client_id,
                NotificationEvent::OrderPaid {
                    job_id: chat.job_id,
                    offer_id: offer.id,
                },
                format!("Your payment of ${:.2} was received", offer.amount),
            )
            .await;
        self.notifier
            .notify(
                offer.freelancer_id,
                NotificationEvent::PaymentReceived {
                    job_id: chat.job_id,
                    offer_id: offer.id,
                },
                format!("The client paid ${:.2}; you can start working", offer.amount),
            )
            .await;

        Ok(())
    }

    pub async fn list_for_chat(&self, actor_id: Uuid, chat_id: Uuid) -> Result<Vec<Offer>> {
        let chat = self
            .chat_repo
            .find_by_id(chat_id)
            .await?
            .ok_or(AppError::NotFound("Chat not found".to_string()))?;

        if !chat.is_party(actor_id) {
            return Err(AppError::Forbidden(
                "Not a party of this conversation".to_string(),
            ));
        }

        self.repo.find_for_chat(chat_id).await
    }
}
