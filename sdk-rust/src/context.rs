use crate::{
    platform::{
        ConnectivityProvider, DeviceInfo, DeviceInfoProvider, NetworkTransport, NetworkType,
        PackageInfo, ScreenClass,
    },
    ConnectXError, ConnectXResult,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

const LIBRARY_VERSION: &str = env!("CARGO_PKG_VERSION");
const FALLBACK_LANGUAGE: &str = "en";
const FALLBACK_APP_VERSION: &str = "Unknown Version";
const FALLBACK_APP_BUILD: &str = "-1";
const FALLBACK_USER_AGENT_VERSION: &str = "1.0";

/// Device, application and network metadata attached to every event.
///
/// Every field is always present on the wire; unavailable platform values
/// are replaced with fixed fallbacks rather than omitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientContext {
    #[serde(rename = "cx_isBrowser")]
    pub is_browser: String,
    #[serde(rename = "cx_language")]
    pub language: String,
    #[serde(rename = "cx_browserName")]
    pub browser_name: String,
    #[serde(rename = "cx_browserVersion")]
    pub browser_version: String,
    #[serde(rename = "cx_engineName")]
    pub engine_name: String,
    #[serde(rename = "cx_engineVersion")]
    pub engine_version: String,
    #[serde(rename = "cx_userAgent")]
    pub user_agent: String,
    #[serde(rename = "cx_source")]
    pub source: String,
    #[serde(rename = "cx_type")]
    pub client_type: String,
    #[serde(rename = "cx_deviceType")]
    pub device_type: ScreenClass,
    #[serde(rename = "cx_networkType")]
    pub network_type: NetworkType,
    #[serde(rename = "cx_appVersion")]
    pub app_version: String,
    #[serde(rename = "cx_appBuild")]
    pub app_build: String,
    #[serde(rename = "cx_libraryVersion")]
    pub library_version: String,
    #[serde(rename = "cx_libraryPlatform")]
    pub library_platform: String,
    #[serde(rename = "cx_fingerprint")]
    pub fingerprint: String,
    #[serde(rename = "cx_deviceId")]
    pub device_id: String,
    #[serde(rename = "cx_device")]
    pub device_product: String,
    #[serde(rename = "cx_deviceManufacturer")]
    pub device_manufacturer: String,
    #[serde(rename = "cx_os")]
    pub cx_os: String,
    #[serde(rename = "cx_osVersion")]
    pub cx_os_version: String,
    pub os: String,
    #[serde(rename = "osVersion")]
    pub os_version: String,
    #[serde(rename = "device")]
    pub device_model: String,
}

impl ClientContext {
    /// Snapshot the current platform state.
    pub fn build(
        device: &dyn DeviceInfoProvider,
        connectivity: &dyn ConnectivityProvider,
        user_agent: &str,
    ) -> Self {
        let package = device.package_info();
        let info = device.device_info();
        let fingerprint = info.device_id.clone().unwrap_or_default();
        let network = connectivity.transport().unwrap_or(NetworkTransport::Other);

        Self {
            is_browser: "false".to_string(),
            language: device
                .locale_language()
                .filter(|lang| !lang.is_empty())
                .unwrap_or_else(|| FALLBACK_LANGUAGE.to_string()),
            browser_name: String::new(),
            browser_version: String::new(),
            engine_name: info.os_name.clone(),
            engine_version: info
                .sdk_level
                .clone()
                .unwrap_or_else(|| info.os_version.clone()),
            user_agent: user_agent.to_string(),
            source: app_name(package.as_ref(), &info),
            client_type: "Mobile App".to_string(),
            device_type: ScreenClass::from_metrics(device.display_metrics()),
            network_type: network.into(),
            app_version: package
                .as_ref()
                .and_then(|p| p.version.clone())
                .unwrap_or_else(|| FALLBACK_APP_VERSION.to_string()),
            app_build: package
                .as_ref()
                .and_then(|p| p.build_number.clone())
                .unwrap_or_else(|| FALLBACK_APP_BUILD.to_string()),
            library_version: LIBRARY_VERSION.to_string(),
            library_platform: info.os_name.clone(),
            fingerprint: fingerprint.clone(),
            device_id: fingerprint,
            device_product: info.product.clone(),
            device_manufacturer: info.manufacturer.clone(),
            cx_os: info.os_name.clone(),
            cx_os_version: info.os_version.clone(),
            os: info.os_name.clone(),
            os_version: info.os_version.clone(),
            device_model: info.model,
        }
    }

    /// The context as a JSON object, ready for merging.
    pub fn to_map(&self) -> ConnectXResult<Map<String, Value>> {
        match serde_json::to_value(self)? {
            Value::Object(map) => Ok(map),
            other => Err(ConnectXError::InvalidPayload(format!(
                "client context serialized to {other} instead of an object"
            ))),
        }
    }
}

/// `MyApp/2.1.0 (Android 14; Pixel 8)`, computed once per handle.
pub fn user_agent(device: &dyn DeviceInfoProvider) -> String {
    let package = device.package_info();
    let info = device.device_info();
    let version = package
        .as_ref()
        .and_then(|p| p.version.as_deref())
        .unwrap_or(FALLBACK_USER_AGENT_VERSION);
    format!(
        "{}/{version} ({} {}; {})",
        app_name(package.as_ref(), &info),
        info.os_name,
        info.os_version,
        info.model
    )
}

fn app_name(package: Option<&PackageInfo>, info: &DeviceInfo) -> String {
    package
        .map(|p| p.app_name.clone())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| format!("{} App", info.os_name))
}
