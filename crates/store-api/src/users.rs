//! Admin user management.

use crate::auth::UserDto;
use crate::StoreApi;
use serde::Serialize;
use store_commerce::user::{Role, User};
use store_commerce::UserId;
use store_data::ApiError;

/// Fields an admin may change on a user.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UserUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}

/// `/users` admin endpoints.
pub struct UsersApi<'a> {
    pub(crate) api: &'a StoreApi,
}

impl UsersApi<'_> {
    pub async fn list(&self) -> Result<Vec<User>, ApiError> {
        let client = self.api.client();
        let users: Vec<UserDto> = client.execute(client.get("/users")).await?;
        Ok(users.into_iter().map(UserDto::into_user).collect())
    }

    pub async fn get(&self, id: &UserId) -> Result<User, ApiError> {
        let client = self.api.client();
        let user: UserDto = client.execute(client.get(&format!("/users/{id}"))).await?;
        Ok(user.into_user())
    }

    pub async fn update(&self, id: &UserId, update: &UserUpdate) -> Result<User, ApiError> {
        let client = self.api.client();
        let user: UserDto = client
            .execute(client.put(&format!("/users/{id}")).json(update)?)
            .await?;
        Ok(user.into_user())
    }

    pub async fn delete(&self, id: &UserId) -> Result<(), ApiError> {
        let client = self.api.client();
        client.execute_unit(client.delete(&format!("/users/{id}"))).await
    }

    /// Change a user's role. Only super admins are allowed to by the server.
    pub async fn promote(&self, id: &UserId, role: Role) -> Result<User, ApiError> {
        let client = self.api.client();
        let body = serde_json::json!({ "role": role });
        let user: UserDto = client
            .execute(client.put(&format!("/users/{id}/promote")).json(&body)?)
            .await?;
        Ok(user.into_user())
    }
}

#[cfg(test)]
mod tests {
    use crate::testing::api_with_mock;
    use serde_json::json;
    use store_commerce::user::Role;
    use store_commerce::UserId;
    use store_data::Method;

    #[tokio::test]
    async fn test_promote_sends_role() {
        let (api, mock) = api_with_mock();
        mock.json(
            Method::Put,
            "/users/u2/promote",
            200,
            json!({ "_id": "u2", "name": "Bo", "email": "bo@x", "role": "admin" }),
        );

        let user = api.users().promote(&UserId::new("u2"), Role::Admin).await.unwrap();
        assert!(user.is_admin());
        assert_eq!(mock.requests()[0].body, Some(json!({ "role": "admin" })));
    }

    #[tokio::test]
    async fn test_list_users() {
        let (api, mock) = api_with_mock();
        mock.json(
            Method::Get,
            "/users",
            200,
            json!([
                { "_id": "u1", "name": "Ada", "email": "a@x", "role": "superadmin" },
                { "_id": "u2", "name": "Bo", "email": "b@x" }
            ]),
        );

        let users = api.users().list().await.unwrap();
        assert_eq!(users.len(), 2);
        assert!(users[0].is_super_admin());
        assert!(!users[1].is_admin());
    }
}
