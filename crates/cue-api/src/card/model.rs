use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct CreateCardRequest {
    #[validate(
        length(min = 1, max = 2000),
        custom(function = "crate::validation::not_blank")
    )]
    pub front: String,
    #[validate(
        length(min = 1, max = 2000),
        custom(function = "crate::validation::not_blank")
    )]
    pub back: String,
    #[validate(length(max = 50))]
    pub tag: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateCardRequest {
    #[validate(
        length(min = 1, max = 2000),
        custom(function = "crate::validation::not_blank")
    )]
    pub front: String,
    #[validate(
        length(min = 1, max = 2000),
        custom(function = "crate::validation::not_blank")
    )]
    pub back: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_validation() {
        let card: CreateCardRequest =
            serde_json::from_str(r#"{"front": "2 + 2", "back": "4", "tag": "math"}"#).unwrap();
        assert!(card.validate().is_ok());

        let blank_back: CreateCardRequest =
            serde_json::from_str(r#"{"front": "2 + 2", "back": " "}"#).unwrap();
        assert!(blank_back.validate().is_err());

        let long_front = UpdateCardRequest {
            front: "x".repeat(2001),
            back: "ok".to_string(),
        };
        assert!(long_front.validate().is_err());
    }
}
