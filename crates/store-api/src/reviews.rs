//! Review endpoints, public and moderation.

use crate::wire::{IdDto, Populated, UserRefDto};
use crate::StoreApi;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use store_commerce::catalog::{NewReview, Review, ReviewStatus};
use store_commerce::{ProductId, ReviewId, UserId};
use store_data::ApiError;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReviewDto {
    #[serde(rename = "_id")]
    id: String,
    product: Populated<IdDto>,
    #[serde(default)]
    user: Option<Populated<UserRefDto>>,
    #[serde(default)]
    name: Option<String>,
    rating: u8,
    #[serde(default)]
    comment: String,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
}

impl From<ReviewDto> for Review {
    fn from(dto: ReviewDto) -> Self {
        let author = dto
            .name
            .filter(|n| !n.trim().is_empty())
            .or_else(|| {
                dto.user
                    .as_ref()
                    .and_then(|u| u.doc())
                    .and_then(|u| u.name.clone())
            })
            .unwrap_or_else(|| "Anonymous".to_string());

        Review {
            id: ReviewId::new(dto.id),
            product_id: ProductId::new(dto.product.id()),
            user_id: dto.user.as_ref().map(|u| UserId::new(u.id())),
            author,
            rating: dto.rating.clamp(1, 5),
            comment: dto.comment,
            status: dto
                .status
                .as_deref()
                .and_then(ReviewStatus::from_str)
                .unwrap_or_default(),
            created_at: dto.created_at,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct NewReviewBody<'a> {
    product_id: &'a str,
    rating: u8,
    comment: &'a str,
}

/// `/reviews` endpoints.
pub struct ReviewsApi<'a> {
    pub(crate) api: &'a StoreApi,
}

impl ReviewsApi<'_> {
    pub async fn for_product(&self, product_id: &ProductId) -> Result<Vec<Review>, ApiError> {
        let client = self.api.client();
        let dtos: Vec<ReviewDto> = client
            .execute(client.get(&format!("/reviews/product/{product_id}")))
            .await?;
        Ok(dtos.into_iter().map(Review::from).collect())
    }

    /// Submit a review. New reviews wait for moderation.
    pub async fn create(&self, review: &NewReview) -> Result<Review, ApiError> {
        review.validate().map_err(crate::wire::invalid)?;

        let client = self.api.client();
        let body = NewReviewBody {
            product_id: review.product_id.as_str(),
            rating: review.rating,
            comment: review.comment.trim(),
        };
        let dto: ReviewDto = client.execute(client.post("/reviews").json(&body)?).await?;
        Ok(dto.into())
    }

    pub async fn delete(&self, id: &ReviewId) -> Result<(), ApiError> {
        let client = self.api.client();
        client
            .execute_unit(client.delete(&format!("/reviews/{id}")))
            .await
    }

    /// Every review, for moderation.
    pub async fn admin_list(&self) -> Result<Vec<Review>, ApiError> {
        let client = self.api.client();
        let dtos: Vec<ReviewDto> = client.execute(client.get("/reviews/admin")).await?;
        Ok(dtos.into_iter().map(Review::from).collect())
    }

    pub async fn set_status(&self, id: &ReviewId, status: ReviewStatus) -> Result<Review, ApiError> {
        let client = self.api.client();
        let body = serde_json::json!({ "status": status });
        let dto: ReviewDto = client
            .execute(client.put(&format!("/reviews/admin/{id}")).json(&body)?)
            .await?;
        Ok(dto.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::api_with_mock;
    use serde_json::json;
    use store_data::Method;

    #[tokio::test]
    async fn test_product_reviews_normalized() {
        let (api, mock) = api_with_mock();
        mock.json(
            Method::Get,
            "/reviews/product/p1",
            200,
            json!([
                { "_id": "r1", "product": "p1", "user": { "_id": "u1", "name": "Ada" }, "rating": 5, "comment": "Great", "status": "approved", "createdAt": "2026-01-02T03:04:05.000Z" },
                { "_id": "r2", "product": { "_id": "p1" }, "name": "Bo", "rating": 3, "comment": "Fine" }
            ]),
        );

        let reviews = api.reviews().for_product(&ProductId::new("p1")).await.unwrap();
        assert_eq!(reviews[0].author, "Ada");
        assert!(reviews[0].is_visible());
        assert!(reviews[0].created_at.is_some());
        assert_eq!(reviews[1].author, "Bo");
        assert_eq!(reviews[1].status, ReviewStatus::Pending);
        assert_eq!(reviews[1].product_id, ProductId::new("p1"));
    }

    #[tokio::test]
    async fn test_invalid_review_not_sent() {
        let (api, mock) = api_with_mock();
        let review = NewReview {
            product_id: ProductId::new("p1"),
            rating: 0,
            comment: "meh".to_string(),
        };

        assert!(api.reviews().create(&review).await.is_err());
        assert!(mock.requests().is_empty());
    }

    #[tokio::test]
    async fn test_moderation_sends_status() {
        let (api, mock) = api_with_mock();
        mock.json(
            Method::Put,
            "/reviews/admin/r1",
            200,
            json!({ "_id": "r1", "product": "p1", "rating": 4, "comment": "ok", "status": "rejected" }),
        );

        let review = api
            .reviews()
            .set_status(&ReviewId::new("r1"), ReviewStatus::Rejected)
            .await
            .unwrap();
        assert_eq!(review.status, ReviewStatus::Rejected);
        assert_eq!(mock.requests()[0].body, Some(json!({ "status": "rejected" })));
    }
}
