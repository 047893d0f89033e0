//! Server-side cart endpoints.

use crate::products::VariantDto;
use crate::wire::{invalid, optional_money, Document, Populated};
use crate::StoreApi;
use serde::{Deserialize, Serialize};
use store_commerce::cart::{Cart, CartItem, NewCartItem, VariantChoice};
use store_commerce::{CartItemId, CommerceError, Currency, ProductId, RawPrice};
use store_data::ApiError;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CartProductDto {
    #[serde(rename = "_id")]
    id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    image: Option<String>,
    #[serde(default)]
    images: Vec<String>,
    #[serde(default)]
    price: Option<RawPrice>,
    #[serde(default)]
    count_in_stock: Option<i64>,
    #[serde(default)]
    variants: Vec<VariantDto>,
}

impl Document for CartProductDto {
    fn doc_id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CartItemDto {
    #[serde(rename = "_id")]
    id: String,
    product: Populated<CartProductDto>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    image: Option<String>,
    #[serde(default)]
    price: Option<RawPrice>,
    #[serde(alias = "qty")]
    quantity: i64,
    #[serde(default)]
    size: Option<String>,
    #[serde(default)]
    color: Option<String>,
    #[serde(default, alias = "countInStock")]
    stock: Option<i64>,
}

impl CartItemDto {
    fn into_item(self, currency: Currency) -> Result<CartItem, ApiError> {
        let product = self.product.doc();

        let variant = match (self.size, self.color) {
            (Some(size), Some(color)) if !size.is_empty() && !color.is_empty() => {
                Some(VariantChoice { size, color })
            }
            _ => None,
        };

        let matching_variant = product.and_then(|p| {
            variant.as_ref().and_then(|choice| {
                p.variants
                    .iter()
                    .find(|v| v.size == choice.size && v.color == choice.color)
            })
        });

        // Line price, then variant override, then product price.
        let raw_price = self
            .price
            .as_ref()
            .or_else(|| matching_variant.and_then(|v| v.price.as_ref()))
            .or_else(|| product.and_then(|p| p.price.as_ref()));
        let unit_price = optional_money(raw_price, currency)?.ok_or_else(|| {
            invalid(CommerceError::InvalidPrice(format!(
                "cart line {} has no price",
                self.id
            )))
        })?;

        let stock = self.stock.or_else(|| match matching_variant {
            Some(v) => Some(v.stock),
            None => product.and_then(|p| p.count_in_stock),
        });

        let name = self
            .name
            .filter(|n| !n.is_empty())
            .or_else(|| product.map(|p| p.name.clone()))
            .unwrap_or_default();
        let image = self.image.or_else(|| {
            product.and_then(|p| p.image.clone().or_else(|| p.images.first().cloned()))
        });

        Ok(CartItem {
            id: CartItemId::new(self.id),
            product_id: ProductId::new(self.product.id()),
            name,
            image,
            variant,
            unit_price,
            quantity: self.quantity,
            stock,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
struct CartDto {
    #[serde(default, alias = "cartItems")]
    items: Vec<CartItemDto>,
}

impl CartDto {
    fn into_cart(self, currency: Currency) -> Result<Cart, ApiError> {
        let items = self
            .items
            .into_iter()
            .map(|item| item.into_item(currency))
            .collect::<Result<_, _>>()?;
        Ok(Cart::with_items(items, currency))
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AddBody<'a> {
    product_id: &'a str,
    quantity: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    size: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    color: Option<&'a str>,
}

/// `/cart` endpoints. Every mutation answers with the whole cart.
pub struct CartApi<'a> {
    pub(crate) api: &'a StoreApi,
}

impl CartApi<'_> {
    pub async fn get(&self) -> Result<Cart, ApiError> {
        let client = self.api.client();
        let dto: CartDto = client.execute(client.get("/cart")).await?;
        dto.into_cart(self.api.currency())
    }

    pub async fn add(&self, item: &NewCartItem) -> Result<Cart, ApiError> {
        let client = self.api.client();
        let body = AddBody {
            product_id: item.product_id.as_str(),
            quantity: item.quantity,
            size: item.variant.as_ref().map(|v| v.size.as_str()),
            color: item.variant.as_ref().map(|v| v.color.as_str()),
        };
        let dto: CartDto = client.execute(client.post("/cart").json(&body)?).await?;
        dto.into_cart(self.api.currency())
    }

    pub async fn update(&self, item_id: &CartItemId, quantity: i64) -> Result<Cart, ApiError> {
        let client = self.api.client();
        let body = serde_json::json!({ "quantity": quantity });
        let dto: CartDto = client
            .execute(client.put(&format!("/cart/{item_id}")).json(&body)?)
            .await?;
        dto.into_cart(self.api.currency())
    }

    pub async fn remove(&self, item_id: &CartItemId) -> Result<Cart, ApiError> {
        let client = self.api.client();
        let dto: CartDto = client
            .execute(client.delete(&format!("/cart/{item_id}")))
            .await?;
        dto.into_cart(self.api.currency())
    }

    /// Empty the cart. The server's reply body is not used.
    pub async fn clear(&self) -> Result<Cart, ApiError> {
        let client = self.api.client();
        client.execute_unit(client.delete("/cart")).await?;
        Ok(Cart::new(self.api.currency()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::api_with_mock;
    use serde_json::json;
    use store_commerce::Money;
    use store_data::Method;

    #[test]
    fn test_populated_line_falls_back_to_product() {
        let dto: CartDto = serde_json::from_value(json!({
            "items": [{
                "_id": "l1",
                "product": {
                    "_id": "p1",
                    "name": "Tee",
                    "image": "/tee.jpg",
                    "price": 25,
                    "variants": [{ "size": "M", "color": "red", "stock": 3, "price": "27.5" }]
                },
                "qty": 2,
                "size": "M",
                "color": "red"
            }]
        }))
        .unwrap();

        let cart = dto.into_cart(Currency::USD).unwrap();
        let line = &cart.items[0];
        assert_eq!(line.name, "Tee");
        assert_eq!(line.image.as_deref(), Some("/tee.jpg"));
        assert_eq!(line.unit_price, Money::new(2750, Currency::USD));
        assert_eq!(line.stock, Some(3));
        assert_eq!(line.title(), "Tee (M / red)");
        assert_eq!(cart.subtotal().unwrap().amount_cents, 5500);
    }

    #[test]
    fn test_bare_line_without_price_rejected() {
        let dto: CartDto = serde_json::from_value(json!({
            "items": [{ "_id": "l1", "product": "p1", "quantity": 1 }]
        }))
        .unwrap();
        assert!(dto.into_cart(Currency::USD).is_err());
    }

    #[tokio::test]
    async fn test_add_sends_variant() {
        let (api, mock) = api_with_mock();
        mock.json(
            Method::Post,
            "/cart",
            200,
            json!({ "items": [{ "_id": "l1", "product": "p1", "name": "Tee", "price": 25, "quantity": 1, "size": "M", "color": "red" }] }),
        );

        let item = NewCartItem {
            product_id: ProductId::new("p1"),
            quantity: 1,
            variant: Some(VariantChoice {
                size: "M".to_string(),
                color: "red".to_string(),
            }),
            unit_price: Money::new(2500, Currency::USD),
        };
        let cart = api.cart().add(&item).await.unwrap();

        assert_eq!(cart.item_count(), 1);
        assert_eq!(
            mock.requests()[0].body,
            Some(json!({ "productId": "p1", "quantity": 1, "size": "M", "color": "red" }))
        );
    }

    #[tokio::test]
    async fn test_clear_returns_empty_cart() {
        let (api, mock) = api_with_mock();
        mock.json(Method::Delete, "/cart", 200, json!({ "message": "Cart cleared" }));

        let cart = api.cart().clear().await.unwrap();
        assert!(cart.is_empty());
    }
}
