use crate::{
    config::{self, ConnectXOptions, Session},
    context::{self, ClientContext},
    envelope::{self, IdentifyPayload, OpenTicketPayload},
    opentelemetry::trace_submit,
    platform::{ConnectivityProvider, DeviceInfoProvider, HostPlatform},
    transport::{HttpTransport, PostRequest, Transport},
    ConnectXError, ConnectXResult,
};
use serde::Serialize;
use std::sync::{Arc, PoisonError, RwLock};

/// Session plus the transport it was configured with.
struct State {
    session: Session,
    transport: Arc<dyn Transport>,
}

pub struct ConnectXBuilder {
    device: Arc<dyn DeviceInfoProvider>,
    connectivity: Arc<dyn ConnectivityProvider>,
    transport: Option<Arc<dyn Transport>>,
}

impl Default for ConnectXBuilder {
    fn default() -> Self {
        let host = Arc::new(HostPlatform);
        Self {
            device: host.clone(),
            connectivity: host,
            transport: None,
        }
    }
}

impl ConnectXBuilder {
    #[must_use]
    pub fn device_info(mut self, device: impl DeviceInfoProvider + 'static) -> Self {
        self.device = Arc::new(device);
        self
    }

    #[must_use]
    pub fn connectivity(mut self, connectivity: impl ConnectivityProvider + 'static) -> Self {
        self.connectivity = Arc::new(connectivity);
        self
    }

    /// Use one value for both device and connectivity information.
    #[must_use]
    pub fn platform<P>(mut self, platform: P) -> Self
    where
        P: DeviceInfoProvider + ConnectivityProvider + 'static,
    {
        let platform = Arc::new(platform);
        self.device = platform.clone();
        self.connectivity = platform;
        self
    }

    /// Replace the HTTP transport. When set, `ConnectXOptions::client` is
    /// ignored.
    #[must_use]
    pub fn transport(mut self, transport: impl Transport + 'static) -> Self {
        self.transport = Some(Arc::new(transport));
        self
    }

    /// Validate the credentials, fetch the anonymous id and return a ready
    /// handle.
    pub async fn initialize(self, options: ConnectXOptions) -> ConnectXResult<ConnectX> {
        let state = connect(&options, self.transport.as_ref()).await?;
        let user_agent = context::user_agent(self.device.as_ref());

        tracing::info!(
            organize_id = %state.session.organize_id,
            base_url = %state.session.base_url,
            anonymous_id = state.session.anonymous_id.is_some(),
            "ConnectX initialized"
        );

        Ok(ConnectX {
            device: self.device,
            connectivity: self.connectivity,
            transport: self.transport,
            user_agent,
            state: RwLock::new(Arc::new(state)),
            init_lock: tokio::sync::Mutex::new(()),
        })
    }
}

/// Handle to an initialized ConnectX session.
///
/// Create one per process and share it by reference (or in an `Arc`).
/// Every submission builds its own envelope, so calls may run concurrently.
///
/// Re-initializing swaps the session atomically for new calls; calls
/// already in flight finish with the session they started with.
pub struct ConnectX {
    device: Arc<dyn DeviceInfoProvider>,
    connectivity: Arc<dyn ConnectivityProvider>,
    transport: Option<Arc<dyn Transport>>,
    user_agent: String,
    state: RwLock<Arc<State>>,
    init_lock: tokio::sync::Mutex<()>,
}

impl ConnectX {
    #[must_use]
    pub fn builder() -> ConnectXBuilder {
        ConnectXBuilder::default()
    }

    /// Replace the session with new credentials. Concurrent calls are
    /// serialized. On error the previous session stays active.
    pub async fn initialize(&self, options: ConnectXOptions) -> ConnectXResult<()> {
        let _guard = self.init_lock.lock().await;
        let state = connect(&options, self.transport.as_ref()).await?;

        tracing::info!(
            organize_id = %state.session.organize_id,
            base_url = %state.session.base_url,
            anonymous_id = state.session.anonymous_id.is_some(),
            "ConnectX re-initialized"
        );

        *self.state.write().unwrap_or_else(PoisonError::into_inner) = Arc::new(state);
        Ok(())
    }

    /// Visitor identifier issued by the backend during initialization.
    #[must_use]
    pub fn anonymous_id(&self) -> Option<String> {
        self.state().session.anonymous_id.clone()
    }

    /// Ask the backend for a fresh anonymous id without storing it.
    pub async fn fetch_anonymous_id(&self) -> ConnectXResult<Option<String>> {
        let state = self.state();
        state.transport.get_text(&state.session.cookie_url()).await
    }

    #[must_use]
    pub fn organize_id(&self) -> String {
        self.state().session.organize_id.clone()
    }

    #[must_use]
    pub fn base_url(&self) -> String {
        self.state().session.base_url.clone()
    }

    #[must_use]
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Current device, app and network metadata.
    #[must_use]
    pub fn client_context(&self) -> ClientContext {
        ClientContext::build(
            self.device.as_ref(),
            self.connectivity.as_ref(),
            &self.user_agent,
        )
    }

    /// Post a tracking event. Fields overwrite context keys of the same
    /// name; `organizeId` is always the session's.
    pub async fn try_track<T>(&self, fields: &T) -> ConnectXResult<()>
    where
        T: Serialize + ?Sized,
    {
        let state = self.state();
        let organize_id = state.session.organize_id.as_str();
        trace_submit("track", envelope::TRACKING_PATH, organize_id, async {
            let fields = envelope::to_object(fields, "tracking fields")?;
            let body = envelope::tracking(self.client_context().to_map()?, fields, organize_id);
            post(&state, envelope::TRACKING_PATH, &body).await
        })
        .await
    }

    /// Fire-and-forget [`Self::try_track`]. Failures are logged.
    pub async fn track<T>(&self, fields: &T)
    where
        T: Serialize + ?Sized,
    {
        let _ = self.try_track(fields).await;
    }

    pub async fn try_identify(&self, payload: IdentifyPayload) -> ConnectXResult<()> {
        let state = self.state();
        let organize_id = state.session.organize_id.as_str();
        trace_submit("identify", envelope::IDENTIFY_PATH, organize_id, async {
            let body = envelope::identify(self.client_context().to_map()?, payload, organize_id);
            post(&state, envelope::IDENTIFY_PATH, &body).await
        })
        .await
    }

    /// Fire-and-forget [`Self::try_identify`]. Failures are logged.
    pub async fn identify(&self, payload: IdentifyPayload) {
        let _ = self.try_identify(payload).await;
    }

    /// Create records of `object_name` in one composite request.
    pub async fn try_create_records<T>(
        &self,
        object_name: &str,
        records: &[T],
    ) -> ConnectXResult<()>
    where
        T: Serialize,
    {
        let state = self.state();
        let organize_id = state.session.organize_id.as_str();
        let path = envelope::records_path(object_name);
        trace_submit("create_records", &path, organize_id, async {
            if object_name.trim().is_empty() {
                return Err(ConnectXError::InvalidArgument(
                    "Object name must not be empty.".to_string(),
                ));
            }
            let body = envelope::records(records)?;
            post(&state, &path, &body).await
        })
        .await
    }

    /// Fire-and-forget [`Self::try_create_records`]. Failures are logged.
    pub async fn create_records<T>(&self, object_name: &str, records: &[T])
    where
        T: Serialize,
    {
        let _ = self.try_create_records(object_name, records).await;
    }

    pub async fn try_open_ticket(&self, payload: OpenTicketPayload) -> ConnectXResult<()> {
        let state = self.state();
        let organize_id = state.session.organize_id.as_str();
        trace_submit("open_ticket", envelope::OPEN_TICKET_PATH, organize_id, async {
            let body =
                envelope::open_ticket(self.client_context().to_map()?, payload, organize_id);
            post(&state, envelope::OPEN_TICKET_PATH, &body).await
        })
        .await
    }

    /// Fire-and-forget [`Self::try_open_ticket`]. Failures are logged.
    pub async fn open_ticket(&self, payload: OpenTicketPayload) {
        let _ = self.try_open_ticket(payload).await;
    }

    fn state(&self) -> Arc<State> {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

async fn connect(
    options: &ConnectXOptions,
    transport: Option<&Arc<dyn Transport>>,
) -> ConnectXResult<State> {
    let mut session = config::validate(options)?;
    let transport: Arc<dyn Transport> = match transport {
        Some(transport) => transport.clone(),
        None => Arc::new(HttpTransport::new(
            options.client.clone().unwrap_or_default(),
        )),
    };

    session.anonymous_id = transport
        .get_text(&session.cookie_url())
        .await
        .map_err(|error| match error {
            ConnectXError::Network(source) => ConnectXError::InitializationNetwork(source),
            other => other,
        })?;

    if session.anonymous_id.is_none() {
        tracing::warn!("cookie endpoint refused; continuing without an anonymous id");
    }

    Ok(State { session, transport })
}

async fn post<B>(state: &State, path: &str, body: &B) -> ConnectXResult<()>
where
    B: Serialize + ?Sized,
{
    let body = serde_json::to_string(body)?;
    state
        .transport
        .post_json(PostRequest {
            url: state.session.url(path),
            token: state.session.token.clone(),
            headers: state.session.headers.clone(),
            body,
        })
        .await
}
