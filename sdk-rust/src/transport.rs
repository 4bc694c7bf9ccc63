use crate::{config, ConnectXError, ConnectXResult};
use reqwest::{
    header::{self, HeaderMap, HeaderValue},
    Client,
};

/// One JSON POST to the collection service.
#[derive(Debug, Clone, PartialEq)]
pub struct PostRequest {
    pub url: String,
    pub token: String,
    pub headers: HeaderMap,
    /// Serialized JSON body.
    pub body: String,
}

#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    /// Send the request. Any non-success status is a `Delivery` error.
    async fn post_json(&self, request: PostRequest) -> ConnectXResult<()>;

    /// GET a plain-text resource. A non-success status yields `Ok(None)`;
    /// only connection failures are errors.
    async fn get_text(&self, url: &str) -> ConnectXResult<Option<String>>;
}

/// [`Transport`] over `reqwest`, one request per call and no retries.
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    #[must_use]
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl Transport for HttpTransport {
    async fn post_json(&self, request: PostRequest) -> ConnectXResult<()> {
        let PostRequest {
            url,
            token,
            mut headers,
            body,
        } = request;

        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        headers.insert(header::AUTHORIZATION, config::bearer(&token)?);

        let response = self
            .client
            .post(url)
            .headers(headers)
            .body(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ConnectXError::Delivery(
                status,
                response.text().await.unwrap_or_default(),
            ));
        }

        Ok(())
    }

    async fn get_text(&self, url: &str) -> ConnectXResult<Option<String>> {
        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            tracing::warn!(status = %response.status(), url, "non-success response");
            return Ok(None);
        }
        Ok(Some(response.text().await?))
    }
}
