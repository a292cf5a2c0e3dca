use reqwest::{Client, Response};
use serde::Serialize;

/// Thin wrapper over the `/api/users` routes. One request per call, no
/// retries; callers read the payload off the returned response.
#[derive(Clone, Debug)]
pub struct UsersClient {
    http: Client,
    base_url: String,
}

impl UsersClient {
    pub fn new(base_url: &str) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(http: Client, base_url: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn users_url(&self) -> String {
        format!("{}/api/users", self.base_url)
    }

    fn user_url(&self, id: i64) -> String {
        format!("{}/api/users/{}", self.base_url, id)
    }

    pub async fn list_users(&self) -> reqwest::Result<Response> {
        self.http.get(self.users_url()).send().await
    }

    pub async fn get_user(&self, id: i64) -> reqwest::Result<Response> {
        self.http.get(self.user_url(id)).send().await
    }

    pub async fn create_user<T: Serialize + ?Sized>(&self, body: &T) -> reqwest::Result<Response> {
        self.http.post(self.users_url()).json(body).send().await
    }

    pub async fn update_user<T: Serialize + ?Sized>(
        &self,
        id: i64,
        body: &T,
    ) -> reqwest::Result<Response> {
        self.http.put(self.user_url(id)).json(body).send().await
    }

    pub async fn delete_user(&self, id: i64) -> reqwest::Result<Response> {
        self.http.delete(self.user_url(id)).send().await
    }
}
