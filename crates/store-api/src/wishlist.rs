//! Wishlist endpoints.

use crate::wire::{optional_money, Document, Populated};
use crate::StoreApi;
use serde::Deserialize;
use store_commerce::wishlist::{Wishlist, WishlistItem};
use store_commerce::{Currency, ProductId, RawPrice};
use store_data::ApiError;

#[derive(Debug, Clone, Deserialize)]
struct WishlistProductDto {
    #[serde(rename = "_id")]
    id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    price: Option<RawPrice>,
    #[serde(default)]
    image: Option<String>,
    #[serde(default)]
    images: Vec<String>,
}

impl Document for WishlistProductDto {
    fn doc_id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum WishlistDto {
    Wrapped {
        #[serde(alias = "items")]
        products: Vec<Populated<WishlistProductDto>>,
    },
    Bare(Vec<Populated<WishlistProductDto>>),
}

impl WishlistDto {
    fn into_wishlist(self, currency: Currency) -> Result<Wishlist, ApiError> {
        let entries = match self {
            WishlistDto::Wrapped { products } => products,
            WishlistDto::Bare(products) => products,
        };

        let items = entries
            .into_iter()
            .map(|entry| match entry {
                Populated::Id(id) => Ok(WishlistItem::reference(ProductId::new(id))),
                Populated::Doc(doc) => Ok(WishlistItem {
                    product_id: ProductId::new(doc.id),
                    name: doc.name,
                    price: optional_money(doc.price.as_ref(), currency)?,
                    image: doc.image.or_else(|| doc.images.into_iter().next()),
                }),
            })
            .collect::<Result<_, ApiError>>()?;

        Ok(Wishlist::with_items(items))
    }
}

/// `/wishlist` endpoints. Mutations answer with the whole wishlist.
pub struct WishlistApi<'a> {
    pub(crate) api: &'a StoreApi,
}

impl WishlistApi<'_> {
    pub async fn get(&self) -> Result<Wishlist, ApiError> {
        let client = self.api.client();
        let dto: WishlistDto = client.execute(client.get("/wishlist")).await?;
        dto.into_wishlist(self.api.currency())
    }

    pub async fn add(&self, product_id: &ProductId) -> Result<Wishlist, ApiError> {
        let client = self.api.client();
        let body = serde_json::json!({ "productId": product_id });
        let dto: WishlistDto = client.execute(client.post("/wishlist").json(&body)?).await?;
        dto.into_wishlist(self.api.currency())
    }

    pub async fn remove(&self, product_id: &ProductId) -> Result<Wishlist, ApiError> {
        let client = self.api.client();
        let dto: WishlistDto = client
            .execute(client.delete(&format!("/wishlist/{product_id}")))
            .await?;
        dto.into_wishlist(self.api.currency())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::api_with_mock;
    use serde_json::json;
    use store_data::Method;

    #[test]
    fn test_mixed_entries() {
        let dto: WishlistDto = serde_json::from_value(json!({
            "products": ["p1", { "_id": "p2", "name": "Hat", "price": "12.00", "images": ["/hat.jpg"] }]
        }))
        .unwrap();
        let wishlist = dto.into_wishlist(Currency::USD).unwrap();

        assert!(wishlist.contains(&ProductId::new("p1")));
        assert_eq!(wishlist.items[1].name, "Hat");
        assert_eq!(wishlist.items[1].image.as_deref(), Some("/hat.jpg"));
        assert_eq!(wishlist.items[1].price.map(|p| p.amount_cents), Some(1200));
    }

    #[tokio::test]
    async fn test_add_and_remove() {
        let (api, mock) = api_with_mock();
        mock.json(Method::Post, "/wishlist", 200, json!(["p1"]));
        mock.json(Method::Delete, "/wishlist/p1", 200, json!({ "products": [] }));

        let wishlist = api.wishlist().add(&ProductId::new("p1")).await.unwrap();
        assert_eq!(wishlist.len(), 1);
        assert_eq!(mock.requests()[0].body, Some(json!({ "productId": "p1" })));

        let wishlist = api.wishlist().remove(&ProductId::new("p1")).await.unwrap();
        assert!(wishlist.is_empty());
    }
}
