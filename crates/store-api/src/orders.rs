//! Order endpoints.

use crate::addresses::AddressDto;
use crate::wire::{invalid, money, IdDto, Populated, UserRefDto};
use crate::StoreApi;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use store_commerce::cart::{OrderTotals, VariantChoice};
use store_commerce::checkout::{NewOrder, Order, OrderItem, PaymentMethod, PaymentResult};
use store_commerce::{Currency, OrderId, ProductId, RawPrice, UserId};
use store_data::ApiError;
use tracing::info;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OrderItemDto {
    product: Populated<IdDto>,
    #[serde(default)]
    name: String,
    #[serde(default)]
    image: Option<String>,
    price: RawPrice,
    #[serde(alias = "quantity")]
    qty: i64,
    #[serde(default)]
    size: Option<String>,
    #[serde(default)]
    color: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OrderDto {
    #[serde(rename = "_id")]
    id: String,
    #[serde(default)]
    user: Option<Populated<UserRefDto>>,
    #[serde(default)]
    order_items: Vec<OrderItemDto>,
    shipping_address: AddressDto,
    payment_method: String,
    items_price: RawPrice,
    shipping_price: RawPrice,
    tax_price: RawPrice,
    total_price: RawPrice,
    #[serde(default)]
    is_paid: bool,
    #[serde(default)]
    paid_at: Option<DateTime<Utc>>,
    #[serde(default)]
    is_delivered: bool,
    #[serde(default)]
    delivered_at: Option<DateTime<Utc>>,
    #[serde(default)]
    payment_result: Option<PaymentResult>,
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
}

impl OrderDto {
    fn into_order(self, currency: Currency) -> Result<Order, ApiError> {
        let payment_method: PaymentMethod = self.payment_method.parse().map_err(invalid)?;

        let items = self
            .order_items
            .into_iter()
            .map(|item| {
                let variant = match (item.size, item.color) {
                    (Some(size), Some(color)) => Some(VariantChoice { size, color }),
                    _ => None,
                };
                Ok(OrderItem {
                    product_id: ProductId::new(item.product.id()),
                    name: item.name,
                    image: item.image,
                    variant,
                    quantity: item.qty,
                    unit_price: money(&item.price, currency)?,
                })
            })
            .collect::<Result<_, ApiError>>()?;

        let totals = OrderTotals {
            items_price: money(&self.items_price, currency)?,
            shipping_price: money(&self.shipping_price, currency)?,
            tax_price: money(&self.tax_price, currency)?,
            total_price: money(&self.total_price, currency)?,
        };

        let customer_name = self
            .user
            .as_ref()
            .and_then(|u| u.doc())
            .and_then(|u| u.name.clone());

        Ok(Order {
            id: OrderId::new(self.id),
            user_id: self.user.as_ref().map(|u| UserId::new(u.id())),
            customer_name,
            items,
            shipping_address: self.shipping_address.into(),
            payment_method,
            totals,
            is_paid: self.is_paid,
            paid_at: self.paid_at,
            is_delivered: self.is_delivered,
            delivered_at: self.delivered_at,
            payment_result: self.payment_result,
            created_at: self.created_at,
        })
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct OrderItemBody<'a> {
    product: &'a str,
    name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    image: Option<&'a str>,
    price: f64,
    qty: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    size: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    color: Option<&'a str>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct NewOrderBody<'a> {
    order_items: Vec<OrderItemBody<'a>>,
    shipping_address: AddressDto,
    payment_method: PaymentMethod,
    items_price: f64,
    shipping_price: f64,
    tax_price: f64,
    total_price: f64,
}

impl<'a> From<&'a NewOrder> for NewOrderBody<'a> {
    fn from(order: &'a NewOrder) -> Self {
        Self {
            order_items: order
                .items
                .iter()
                .map(|item| OrderItemBody {
                    product: item.product_id.as_str(),
                    name: &item.name,
                    image: item.image.as_deref(),
                    price: item.unit_price.to_f64(),
                    qty: item.quantity,
                    size: item.variant.as_ref().map(|v| v.size.as_str()),
                    color: item.variant.as_ref().map(|v| v.color.as_str()),
                })
                .collect(),
            shipping_address: AddressDto::from(&order.shipping_address),
            payment_method: order.payment_method,
            items_price: order.totals.items_price.to_f64(),
            shipping_price: order.totals.shipping_price.to_f64(),
            tax_price: order.totals.tax_price.to_f64(),
            total_price: order.totals.total_price.to_f64(),
        }
    }
}

/// `/orders` endpoints.
pub struct OrdersApi<'a> {
    pub(crate) api: &'a StoreApi,
}

impl OrdersApi<'_> {
    /// Place an order. It starts unpaid.
    pub async fn create(&self, order: &NewOrder) -> Result<Order, ApiError> {
        let client = self.api.client();
        let request = client.post("/orders").json(&NewOrderBody::from(order))?;
        let dto: OrderDto = client.execute(request).await?;
        let order = dto.into_order(self.api.currency())?;
        info!(order_id = %order.id, method = order.payment_method.as_str(), "order created");
        Ok(order)
    }

    pub async fn get(&self, id: &OrderId) -> Result<Order, ApiError> {
        let client = self.api.client();
        let dto: OrderDto = client.execute(client.get(&format!("/orders/{id}"))).await?;
        dto.into_order(self.api.currency())
    }

    /// The signed-in user's orders.
    pub async fn mine(&self) -> Result<Vec<Order>, ApiError> {
        let client = self.api.client();
        let dtos: Vec<OrderDto> = client.execute(client.get("/orders/myorders")).await?;
        self.convert_all(dtos)
    }

    /// Every order, for admins.
    pub async fn list(&self) -> Result<Vec<Order>, ApiError> {
        let client = self.api.client();
        let dtos: Vec<OrderDto> = client.execute(client.get("/orders")).await?;
        self.convert_all(dtos)
    }

    /// Mark paid with capture details.
    pub async fn pay(&self, id: &OrderId, result: &PaymentResult) -> Result<Order, ApiError> {
        let client = self.api.client();
        let dto: OrderDto = client
            .execute(client.put(&format!("/orders/{id}/pay")).json(result)?)
            .await?;
        dto.into_order(self.api.currency())
    }

    pub async fn deliver(&self, id: &OrderId) -> Result<Order, ApiError> {
        let client = self.api.client();
        let dto: OrderDto = client
            .execute(client.put(&format!("/orders/{id}/deliver")))
            .await?;
        dto.into_order(self.api.currency())
    }

    pub async fn delete(&self, id: &OrderId) -> Result<(), ApiError> {
        let client = self.api.client();
        client
            .execute_unit(client.delete(&format!("/orders/{id}")))
            .await
    }

    fn convert_all(&self, dtos: Vec<OrderDto>) -> Result<Vec<Order>, ApiError> {
        let currency = self.api.currency();
        dtos.into_iter().map(|o| o.into_order(currency)).collect()
    }
}

/// A full order document, for tests in this crate.
#[cfg(test)]
pub(crate) fn order_json(id: &str, paid: bool) -> serde_json::Value {
    serde_json::json!({
        "_id": id,
        "user": { "_id": "u1", "name": "Ada" },
        "orderItems": [
            { "product": "p1", "name": "Tee", "price": 25, "qty": 2, "size": "M", "color": "red" }
        ],
        "shippingAddress": {
            "fullName": "Ada", "address": "1 Main", "city": "Austin",
            "postalCode": "73301", "country": "US"
        },
        "paymentMethod": "bank_transfer",
        "itemsPrice": 50, "shippingPrice": 10, "taxPrice": 7.5, "totalPrice": 67.5,
        "isPaid": paid
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::api_with_mock;
    use serde_json::json;
    use store_commerce::cart::{Cart, CartItem, PricingRules};
    use store_commerce::checkout::{Address, OrderStatus};
    use store_commerce::{CartItemId, Money};
    use store_data::Method;

    #[test]
    fn test_order_normalization() {
        let dto: OrderDto = serde_json::from_value(order_json("o1", false)).unwrap();
        let order = dto.into_order(Currency::USD).unwrap();

        assert_eq!(order.status(), OrderStatus::AwaitingPayment);
        assert_eq!(order.customer_name.as_deref(), Some("Ada"));
        assert_eq!(order.totals.total_price.amount_cents, 6750);
        assert_eq!(order.items[0].variant.as_ref().map(|v| v.size.as_str()), Some("M"));
        assert_eq!(order.payment_method, PaymentMethod::BankTransfer);
    }

    #[test]
    fn test_unknown_payment_method_rejected() {
        let mut json = order_json("o1", false);
        json["paymentMethod"] = json!("barter");
        let dto: OrderDto = serde_json::from_value(json).unwrap();
        assert!(dto.into_order(Currency::USD).is_err());
    }

    #[tokio::test]
    async fn test_create_body() {
        let (api, mock) = api_with_mock();
        mock.json(Method::Post, "/orders", 201, order_json("o1", false));

        let cart = Cart::with_items(
            vec![CartItem {
                id: CartItemId::new("l1"),
                product_id: ProductId::new("p1"),
                name: "Tee".to_string(),
                image: None,
                variant: None,
                unit_price: Money::new(2500, Currency::USD),
                quantity: 2,
                stock: None,
            }],
            Currency::USD,
        );
        let new_order = NewOrder::from_cart(
            &cart,
            Address::new("Ada", "1 Main", "Austin", "73301", "US"),
            PaymentMethod::BankTransfer,
            &PricingRules::default(),
        )
        .unwrap();

        let order = api.orders().create(&new_order).await.unwrap();
        assert_eq!(order.id, OrderId::new("o1"));

        let body = mock.requests()[0].body.clone().unwrap();
        assert_eq!(body["paymentMethod"], json!("bank_transfer"));
        assert_eq!(body["orderItems"][0]["qty"], json!(2));
        assert_eq!(body["totalPrice"], json!(67.5));
        assert_eq!(body["shippingAddress"]["postalCode"], json!("73301"));
    }
}
