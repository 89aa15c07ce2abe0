use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::offer_models::Offer;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateOfferRequest {
    #[validate(range(min = 0.01))]
    pub amount: f64,
    #[validate(length(min = 1, max = 100))]
    pub delivery_time: String,
    #[validate(length(min = 1, max = 2000))]
    pub description: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct RespondOfferRequest {
    pub accept: bool,
}

/// Accept/reject outcome. `checkout_url` is only present on acceptance and
/// hands the client off to the external payment flow.
#[derive(Debug, Serialize, ToSchema)]
pub struct OfferResolution {
    pub offer: Offer,
    pub checkout_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offer_requires_positive_amount() {
        let req = CreateOfferRequest {
            amount: 0.0,
            delivery_time: "3 days".to_string(),
            description: "logo design".to_string(),
        };
        assert!(req.validate().is_err());

        let req = CreateOfferRequest {
            amount: -5.0,
            delivery_time: "3 days".to_string(),
            description: "logo design".to_string(),
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_offer_requires_all_fields() {
        let req = CreateOfferRequest {
            amount: 100.0,
            delivery_time: "".to_string(),
            description: "logo design".to_string(),
        };
        assert!(req.validate().is_err());

        let req = CreateOfferRequest {
            amount: 100.0,
            delivery_time: "3 days".to_string(),
            description: "".to_string(),
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_valid_offer_passes() {
        let req = CreateOfferRequest {
            amount: 100.0,
            delivery_time: "3 days".to_string(),
            description: "logo design".to_string(),
        };
        assert!(req.validate().is_ok());
    }
}
