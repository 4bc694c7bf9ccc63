use crate::platform::{
    ConnectivityProvider, DeviceInfo, DeviceInfoProvider, DisplayMetrics, NetworkTransport,
    PackageInfo,
};

/// Fixed platform answers. Each query can be switched to its "unavailable"
/// form to exercise fallbacks.
#[derive(Debug, Clone)]
pub struct StaticPlatform {
    pub package: Option<PackageInfo>,
    pub device: DeviceInfo,
    pub display: Option<DisplayMetrics>,
    pub language: Option<String>,
    pub network: Option<NetworkTransport>,
}

impl StaticPlatform {
    /// A phone on Wi-Fi running Android 14.
    pub fn android() -> Self {
        Self {
            package: Some(PackageInfo {
                app_name: "Demo".to_string(),
                version: Some("2.1.0".to_string()),
                build_number: Some("42".to_string()),
            }),
            device: DeviceInfo {
                os_name: "Android".to_string(),
                os_version: "14".to_string(),
                sdk_level: Some("34".to_string()),
                model: "Pixel 8".to_string(),
                product: "shiba".to_string(),
                manufacturer: "Google".to_string(),
                device_id: Some("device-abc".to_string()),
            },
            display: Some(DisplayMetrics {
                width_pixels: 1080,
                density: 2.625,
            }),
            language: Some("th".to_string()),
            network: Some(NetworkTransport::Wifi),
        }
    }

    #[must_use]
    pub fn without_package_info(mut self) -> Self {
        self.package = None;
        self
    }

    #[must_use]
    pub fn without_connectivity(mut self) -> Self {
        self.network = None;
        self
    }

    #[must_use]
    pub fn without_locale(mut self) -> Self {
        self.language = None;
        self
    }

    #[must_use]
    pub fn with_network(mut self, network: NetworkTransport) -> Self {
        self.network = Some(network);
        self
    }

    #[must_use]
    pub fn with_display(mut self, display: DisplayMetrics) -> Self {
        self.display = Some(display);
        self
    }
}

impl DeviceInfoProvider for StaticPlatform {
    fn package_info(&self) -> Option<PackageInfo> {
        self.package.clone()
    }

    fn device_info(&self) -> DeviceInfo {
        self.device.clone()
    }

    fn display_metrics(&self) -> Option<DisplayMetrics> {
        self.display
    }

    fn locale_language(&self) -> Option<String> {
        self.language.clone()
    }
}

impl ConnectivityProvider for StaticPlatform {
    fn transport(&self) -> Option<NetworkTransport> {
        self.network
    }
}
