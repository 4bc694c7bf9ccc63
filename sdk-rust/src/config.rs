use crate::{ConnectXError, ConnectXResult};
use reqwest::{
    header::{self, HeaderMap, HeaderName, HeaderValue},
    Client,
};
use std::collections::HashMap;

const DEFAULT_API_ROOT: &str = "https://backend.connect-x.tech/connectx/api";
const GENERATE_COOKIE_PATH: &str = "/webtracking/generateCookie";

/// Options accepted by [`crate::ConnectX`] when initializing a session.
#[derive(Clone, Default)]
pub struct ConnectXOptions {
    pub token: String,
    pub organize_id: String,
    /// Deployment tag, e.g. `"staging"` resolves to
    /// `https://backend-staging.connect-x.tech/connectx/api`.
    pub env: Option<String>,
    /// Overrides the root derived from `env`.
    pub base_url: Option<String>,
    pub client: Option<Client>,
    pub headers: Option<HashMap<String, String>>,
}

impl ConnectXOptions {
    #[must_use]
    pub fn new(token: impl Into<String>, organize_id: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            organize_id: organize_id.into(),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_env(mut self, env: impl Into<String>) -> Self {
        self.env = Some(env.into());
        self
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Read options from `CONNECTX_TOKEN`, `CONNECTX_ORGANIZE_ID`,
    /// `CONNECTX_ENV` and `CONNECTX_BASE_URL`.
    ///
    /// Missing credentials are left empty and rejected at initialization.
    #[must_use]
    pub fn from_env() -> Self {
        let var = |name: &str| std::env::var(name).ok().filter(|value| !value.is_empty());
        Self {
            token: var("CONNECTX_TOKEN").unwrap_or_default(),
            organize_id: var("CONNECTX_ORGANIZE_ID").unwrap_or_default(),
            env: var("CONNECTX_ENV"),
            base_url: var("CONNECTX_BASE_URL"),
            ..Default::default()
        }
    }
}

/// Resolve the API root for an optional deployment tag.
#[must_use]
pub fn api_root(env: Option<&str>) -> String {
    match env.map(str::trim).filter(|env| !env.is_empty()) {
        Some(env) => format!("https://backend-{env}.connect-x.tech/connectx/api"),
        None => DEFAULT_API_ROOT.to_string(),
    }
}

/// Validated, immutable session state shared by every submission.
#[derive(Debug, Clone)]
pub(crate) struct Session {
    pub token: String,
    pub organize_id: String,
    pub base_url: String,
    pub headers: HeaderMap,
    pub anonymous_id: Option<String>,
}

impl Session {
    pub fn cookie_url(&self) -> String {
        format!("{}{GENERATE_COOKIE_PATH}", self.base_url)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

/// Check the options and turn them into a session that still lacks its
/// anonymous id.
pub(crate) fn validate(options: &ConnectXOptions) -> ConnectXResult<Session> {
    if options.token.is_empty() {
        return Err(ConnectXError::InvalidArgument(
            "Token must not be empty.".to_string(),
        ));
    }
    if options.organize_id.is_empty() {
        return Err(ConnectXError::InvalidArgument(
            "Organize ID must not be empty.".to_string(),
        ));
    }
    bearer(&options.token)?;

    let base_url = options
        .base_url
        .clone()
        .unwrap_or_else(|| api_root(options.env.as_deref()))
        .trim_end_matches('/')
        .to_string();

    let mut headers = HeaderMap::new();
    for (key, value) in options.headers.iter().flatten() {
        let header_name = HeaderName::from_bytes(key.as_bytes()).map_err(|error| {
            ConnectXError::InvalidArgument(format!("Invalid header name '{key}': {error}"))
        })?;
        if header_name == header::AUTHORIZATION || header_name == header::CONTENT_TYPE {
            return Err(ConnectXError::InvalidArgument(format!(
                "Header '{key}' is set by the SDK and cannot be overridden"
            )));
        }
        let header_value = HeaderValue::from_str(value).map_err(|error| {
            ConnectXError::InvalidArgument(format!("Invalid header value for '{key}': {error}"))
        })?;
        headers.insert(header_name, header_value);
    }

    Ok(Session {
        token: options.token.clone(),
        organize_id: options.organize_id.clone(),
        base_url,
        headers,
        anonymous_id: None,
    })
}

/// `Authorization` value for a session token.
pub(crate) fn bearer(token: &str) -> ConnectXResult<HeaderValue> {
    HeaderValue::from_str(&format!("Bearer {token}")).map_err(|error| {
        ConnectXError::InvalidArgument(format!("Invalid token header value: {error}"))
    })
}
