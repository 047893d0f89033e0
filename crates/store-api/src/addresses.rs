//! Address book endpoints.

use crate::StoreApi;
use serde::{Deserialize, Serialize};
use store_commerce::checkout::Address;
use store_commerce::AddressId;
use store_data::ApiError;

/// Address as it travels on the wire, in both directions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AddressDto {
    #[serde(rename = "_id", default, skip_serializing)]
    pub id: Option<String>,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub postal_code: String,
    #[serde(default)]
    pub country: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default)]
    pub is_default: bool,
}

impl From<&Address> for AddressDto {
    fn from(a: &Address) -> Self {
        Self {
            id: a.id.as_ref().map(|id| id.to_string()),
            full_name: a.full_name.trim().to_string(),
            address: a.address.trim().to_string(),
            city: a.city.trim().to_string(),
            postal_code: a.postal_code.trim().to_string(),
            country: a.country.trim().to_string(),
            phone: a.phone.clone().filter(|p| !p.trim().is_empty()),
            is_default: a.is_default,
        }
    }
}

impl From<AddressDto> for Address {
    fn from(dto: AddressDto) -> Self {
        Self {
            id: dto.id.map(AddressId::new),
            full_name: dto.full_name,
            address: dto.address,
            city: dto.city,
            postal_code: dto.postal_code,
            country: dto.country,
            phone: dto.phone,
            is_default: dto.is_default,
        }
    }
}

/// `/addresses` endpoints.
pub struct AddressesApi<'a> {
    pub(crate) api: &'a StoreApi,
}

impl AddressesApi<'_> {
    pub async fn list(&self) -> Result<Vec<Address>, ApiError> {
        let client = self.api.client();
        let dtos: Vec<AddressDto> = client.execute(client.get("/addresses")).await?;
        Ok(dtos.into_iter().map(Address::from).collect())
    }

    /// Save a new address. The returned address carries its id.
    pub async fn create(&self, address: &Address) -> Result<Address, ApiError> {
        let client = self.api.client();
        let dto: AddressDto = client
            .execute(client.post("/addresses").json(&AddressDto::from(address))?)
            .await?;
        Ok(dto.into())
    }

    pub async fn update(&self, id: &AddressId, address: &Address) -> Result<Address, ApiError> {
        let client = self.api.client();
        let dto: AddressDto = client
            .execute(
                client
                    .put(&format!("/addresses/{id}"))
                    .json(&AddressDto::from(address))?,
            )
            .await?;
        Ok(dto.into())
    }

    pub async fn delete(&self, id: &AddressId) -> Result<(), ApiError> {
        let client = self.api.client();
        client
            .execute_unit(client.delete(&format!("/addresses/{id}")))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::api_with_mock;
    use serde_json::json;
    use store_data::Method;

    #[tokio::test]
    async fn test_create_round_trip() {
        let (api, mock) = api_with_mock();
        mock.json(
            Method::Post,
            "/addresses",
            201,
            json!({
                "_id": "a1", "fullName": "Jane", "address": "1 Main", "city": "Austin",
                "postalCode": "73301", "country": "US", "isDefault": true
            }),
        );

        let draft = Address::new(" Jane ", "1 Main", "Austin", "73301", "US");
        let saved = api.addresses().create(&draft).await.unwrap();

        assert_eq!(saved.id, Some(AddressId::new("a1")));
        assert!(saved.is_default);
        assert_eq!(
            mock.requests()[0].body,
            Some(json!({
                "fullName": "Jane", "address": "1 Main", "city": "Austin",
                "postalCode": "73301", "country": "US", "isDefault": false
            }))
        );
    }
}
