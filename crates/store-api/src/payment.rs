//! The generic process-payment endpoint.

use crate::StoreApi;
use serde::{Deserialize, Serialize};
use store_commerce::checkout::{PaymentDetails, PaymentMethod, PaymentResult};
use store_commerce::{Money, OrderId};
use store_data::ApiError;

/// A payment attempt for an existing order.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentRequest {
    pub order_id: OrderId,
    pub method: PaymentMethod,
    pub amount: Money,
    pub details: PaymentDetails,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PaymentBody<'a> {
    order_id: &'a str,
    payment_method: PaymentMethod,
    amount: f64,
    currency: &'static str,
    details: &'a PaymentDetails,
}

/// Outcome reported by the payment endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentReceipt {
    #[serde(default = "accepted")]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub transaction_id: Option<String>,
    #[serde(default)]
    pub payment_result: Option<PaymentResult>,
}

fn accepted() -> bool {
    true
}

/// `/payment` endpoint.
pub struct PaymentApi<'a> {
    pub(crate) api: &'a StoreApi,
}

impl PaymentApi<'_> {
    /// Submit a payment. A 2xx answer with `success: false` is returned as is.
    pub async fn process(&self, request: &PaymentRequest) -> Result<PaymentReceipt, ApiError> {
        let client = self.api.client();
        let body = PaymentBody {
            order_id: request.order_id.as_str(),
            payment_method: request.method,
            amount: request.amount.to_f64(),
            currency: request.amount.currency.code(),
            details: &request.details,
        };
        client.execute(client.post("/payment").json(&body)?).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::api_with_mock;
    use serde_json::json;
    use store_commerce::Currency;
    use store_data::Method;

    #[tokio::test]
    async fn test_process_body_and_receipt() {
        let (api, mock) = api_with_mock();
        mock.json(Method::Post, "/payment", 200, json!({ "transactionId": "tx-9" }));

        let receipt = api
            .payment()
            .process(&PaymentRequest {
                order_id: OrderId::new("o1"),
                method: PaymentMethod::CashOnDelivery,
                amount: Money::new(6750, Currency::USD),
                details: PaymentDetails::Offline,
            })
            .await
            .unwrap();

        assert!(receipt.success);
        assert_eq!(receipt.transaction_id.as_deref(), Some("tx-9"));
        assert_eq!(
            mock.requests()[0].body,
            Some(json!({
                "orderId": "o1",
                "paymentMethod": "cash_on_delivery",
                "amount": 67.5,
                "currency": "USD",
                "details": { "type": "offline" }
            }))
        );
    }
}
