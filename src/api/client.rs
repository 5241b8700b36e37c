use reqwest::header::{ACCEPT, ACCEPT_CHARSET};
use serde::de::DeserializeOwned;

use crate::api::models::*;
use crate::config::settings::Config;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    // Medium's own error message, as sent
    #[error("{message}")]
    Api {
        status: u16,
        code: i64,
        message: String,
    },

    // Error body that is not Medium's JSON envelope, as sent
    #[error("{message}")]
    Server { status: u16, message: String },
}

/// The two remote operations the CLI needs.
#[allow(async_fn_in_trait)]
pub trait Publisher {
    /// Account that owns the integration token.
    async fn current_user(&self) -> Result<User, ClientError>;

    /// Creates a post owned by `user_id`. Not idempotent: every call makes a new post.
    async fn create_post(&self, user_id: &str, post: &CreatePost) -> Result<Post, ClientError>;
}

pub struct MediumClient {
    base_url: String,
    http_client: reqwest::Client,
    token: String,
}

impl MediumClient {
    pub fn new(config: &Config, token: String) -> Result<Self, ClientError> {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            base_url: config.api_url.clone(),
            http_client,
            token,
        })
    }

    fn build_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, ClientError> {
        let status = response.status();
        log::debug!("{} -> {}", response.url(), status);

        if status.is_success() {
            let envelope: Envelope<T> = response.json().await?;
            Ok(envelope.data)
        } else {
            let message = response.text().await?;
            Err(map_http_error(status.as_u16(), message))
        }
    }
}

impl Publisher for MediumClient {
    async fn current_user(&self) -> Result<User, ClientError> {
        let url = self.build_url("/me");
        log::debug!("GET {}", url);

        let response = self
            .http_client
            .get(&url)
            .bearer_auth(&self.token)
            .header(ACCEPT, "application/json")
            .header(ACCEPT_CHARSET, "utf-8")
            .send()
            .await?;

        self.handle_response(response).await
    }

    async fn create_post(&self, user_id: &str, post: &CreatePost) -> Result<Post, ClientError> {
        let url = self.build_url(&format!("/users/{}/posts", urlencoding::encode(user_id)));
        log::debug!("POST {}", url);

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&self.token)
            .header(ACCEPT, "application/json")
            .header(ACCEPT_CHARSET, "utf-8")
            .json(post)
            .send()
            .await?;

        self.handle_response(response).await
    }
}

fn map_http_error(status: u16, body: String) -> ClientError {
    match serde_json::from_str::<ErrorEnvelope>(&body) {
        Ok(envelope) if !envelope.errors.is_empty() => {
            let first = &envelope.errors[0];
            ClientError::Api {
                status,
                code: first.code,
                message: first.message.clone(),
            }
        }
        _ => ClientError::Server {
            status,
            message: body,
        },
    }
}
