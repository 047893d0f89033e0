//! Product reviews.

use crate::ids::{ProductId, ReviewId, UserId};
use crate::CommerceError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Moderation status of a review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ReviewStatus {
    /// Waiting for an admin.
    #[default]
    Pending,
    /// Visible on the product page.
    Approved,
    /// Hidden.
    Rejected,
}

impl ReviewStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReviewStatus::Pending => "pending",
            ReviewStatus::Approved => "approved",
            ReviewStatus::Rejected => "rejected",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Some(ReviewStatus::Pending),
            "approved" => Some(ReviewStatus::Approved),
            "rejected" => Some(ReviewStatus::Rejected),
            _ => None,
        }
    }
}

/// A review left by a customer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Review {
    pub id: ReviewId,
    pub product_id: ProductId,
    pub user_id: Option<UserId>,
    /// Author name as shown on the product page.
    pub author: String,
    /// Stars, 1 to 5.
    pub rating: u8,
    pub comment: String,
    pub status: ReviewStatus,
    pub created_at: Option<DateTime<Utc>>,
}

impl Review {
    /// Whether the review is shown publicly.
    pub fn is_visible(&self) -> bool {
        self.status == ReviewStatus::Approved
    }
}

/// A review about to be submitted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewReview {
    pub product_id: ProductId,
    pub rating: u8,
    pub comment: String,
}

impl NewReview {
    /// Form validation before the request is sent.
    pub fn validate(&self) -> Result<(), CommerceError> {
        if !(1..=5).contains(&self.rating) {
            return Err(CommerceError::ValidationError(
                "Rating must be between 1 and 5".to_string(),
            ));
        }
        if self.comment.trim().is_empty() {
            return Err(CommerceError::ValidationError(
                "Please write a comment".to_string(),
            ));
        }
        Ok(())
    }
}

/// Average rating of the visible reviews, or `None` when there are none.
pub fn average_rating(reviews: &[Review]) -> Option<f64> {
    let visible: Vec<&Review> = reviews.iter().filter(|r| r.is_visible()).collect();
    if visible.is_empty() {
        return None;
    }
    let total: u32 = visible.iter().map(|r| u32::from(r.rating)).sum();
    Some(f64::from(total) / visible.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn review(rating: u8, status: ReviewStatus) -> Review {
        Review {
            id: ReviewId::new("r1"),
            product_id: ProductId::new("p1"),
            user_id: None,
            author: "Sam".to_string(),
            rating,
            comment: "Nice".to_string(),
            status,
            created_at: None,
        }
    }

    #[test]
    fn test_new_review_validation() {
        let mut new = NewReview {
            product_id: ProductId::new("p1"),
            rating: 5,
            comment: "Great fit".to_string(),
        };
        assert!(new.validate().is_ok());

        new.rating = 0;
        assert!(new.validate().is_err());

        new.rating = 4;
        new.comment = "   ".to_string();
        assert!(new.validate().is_err());
    }

    #[test]
    fn test_average_ignores_unapproved() {
        let reviews = vec![
            review(5, ReviewStatus::Approved),
            review(3, ReviewStatus::Approved),
            review(1, ReviewStatus::Rejected),
            review(1, ReviewStatus::Pending),
        ];
        assert_eq!(average_rating(&reviews), Some(4.0));
        assert_eq!(average_rating(&[]), None);
    }

    #[test]
    fn test_status_parsing() {
        assert_eq!(ReviewStatus::from_str("Approved"), Some(ReviewStatus::Approved));
        assert_eq!(ReviewStatus::from_str("nope"), None);
    }
}
