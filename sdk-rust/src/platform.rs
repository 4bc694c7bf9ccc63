//! Interfaces to the host platform. The SDK never introspects the device
//! itself; embedders supply these capabilities.

use serde::{Deserialize, Serialize};

/// Screens narrower than this many density-independent pixels are phones.
const TABLET_MIN_WIDTH_DP: f32 = 600.0;

/// Metadata of the embedding application package.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageInfo {
    pub app_name: String,
    pub version: Option<String>,
    pub build_number: Option<String>,
}

/// Static description of the device and operating system.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceInfo {
    pub os_name: String,
    pub os_version: String,
    /// Platform API level when the OS has one (e.g. Android SDK int).
    pub sdk_level: Option<String>,
    pub model: String,
    pub product: String,
    pub manufacturer: String,
    /// Stable per-install identifier, used as the fingerprint.
    pub device_id: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayMetrics {
    pub width_pixels: u32,
    pub density: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScreenClass {
    Mobile,
    Tablet,
}

impl ScreenClass {
    /// Classify a display; unknown metrics count as a phone.
    #[must_use]
    pub fn from_metrics(metrics: Option<DisplayMetrics>) -> Self {
        match metrics {
            #[allow(clippy::cast_precision_loss)]
            Some(DisplayMetrics {
                width_pixels,
                density,
            }) if density > 0.0 && width_pixels as f32 / density >= TABLET_MIN_WIDTH_DP => {
                Self::Tablet
            }
            _ => Self::Mobile,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkTransport {
    Wifi,
    Cellular,
    Other,
}

/// The `{label, value}` pair reported as `cx_networkType`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkType {
    pub label: String,
    pub value: String,
}

impl From<NetworkTransport> for NetworkType {
    fn from(transport: NetworkTransport) -> Self {
        let (label, value) = match transport {
            NetworkTransport::Wifi => ("WiFi", "wifi"),
            NetworkTransport::Cellular => ("Cellular", "cellular"),
            NetworkTransport::Other => ("Other", "other"),
        };
        Self {
            label: label.to_string(),
            value: value.to_string(),
        }
    }
}

pub trait DeviceInfoProvider: Send + Sync {
    /// `None` when the package manager cannot resolve the running app.
    fn package_info(&self) -> Option<PackageInfo>;
    fn device_info(&self) -> DeviceInfo;
    fn display_metrics(&self) -> Option<DisplayMetrics>;
    /// ISO 639 language code of the current locale.
    fn locale_language(&self) -> Option<String>;
}

pub trait ConnectivityProvider: Send + Sync {
    /// Transport of the active network. `None` when the connectivity
    /// service is unavailable or there is no active network.
    fn transport(&self) -> Option<NetworkTransport>;
}

/// Best-effort provider for hosts without a richer platform layer. Reads
/// compile-time target information and the `LANG` environment variable.
#[derive(Debug, Clone, Default)]
pub struct HostPlatform;

impl DeviceInfoProvider for HostPlatform {
    fn package_info(&self) -> Option<PackageInfo> {
        None
    }

    fn device_info(&self) -> DeviceInfo {
        DeviceInfo {
            os_name: std::env::consts::OS.to_string(),
            os_version: String::new(),
            sdk_level: None,
            model: std::env::consts::ARCH.to_string(),
            product: std::env::consts::FAMILY.to_string(),
            manufacturer: String::new(),
            device_id: None,
        }
    }

    fn display_metrics(&self) -> Option<DisplayMetrics> {
        None
    }

    fn locale_language(&self) -> Option<String> {
        let lang = std::env::var("LANG").ok()?;
        language_from_locale(&lang)
    }
}

impl ConnectivityProvider for HostPlatform {
    fn transport(&self) -> Option<NetworkTransport> {
        None
    }
}

/// `"th_TH.UTF-8"` -> `"th"`. The POSIX `C`/`POSIX` locales carry no language.
fn language_from_locale(locale: &str) -> Option<String> {
    let language = locale
        .split(['_', '-', '.', '@'])
        .next()
        .filter(|lang| !lang.is_empty() && *lang != "C" && *lang != "POSIX")?;
    Some(language.to_ascii_lowercase())
}
