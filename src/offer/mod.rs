pub mod offer_dto;
pub mod offer_handlers;
pub mod offer_models;
pub mod offer_repository;
pub mod offer_service;

pub use offer_handlers::{confirm_payment, create_offer, get_chat_offers, respond_to_offer};
pub use offer_models::{Offer, OfferStatus};
pub use offer_repository::OfferRepository;
pub use offer_service::OfferService;
