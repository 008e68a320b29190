use std::sync::OnceLock;

use crate::vouch_export;

use super::platform::PlatformKind;

/// Global configuration for Vouch
static CONFIG_INSTANCE: OnceLock<VouchConfig> = OnceLock::new();

/// Represents the environment for Vouch operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, uniffi::Enum)]
pub enum VouchEnvironment {
    /// Staging environment
    Staging,
    /// Production environment
    Production,
}

impl VouchEnvironment {
    /// Returns the string representation of the environment
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Staging => "staging",
            Self::Production => "production",
        }
    }
}

impl std::fmt::Display for VouchEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Global configuration for Vouch, registered once by the host application.
#[derive(Debug, Clone, uniffi::Object)]
pub struct VouchConfig {
    environment: VouchEnvironment,
    platform: PlatformKind,
    os_version: String,
}

#[vouch_export]
impl VouchConfig {
    /// Creates a new `VouchConfig`.
    ///
    /// # Arguments
    /// * `environment` - The environment to use for this configuration
    /// * `platform` - The host platform the library is embedded in
    /// * `os_version` - The host OS version string, e.g. `"14"` or `"17.2"`
    #[uniffi::constructor]
    #[must_use]
    pub fn new(
        environment: VouchEnvironment,
        platform: PlatformKind,
        os_version: String,
    ) -> Self {
        Self {
            environment,
            platform,
            os_version,
        }
    }

    /// Gets the configured environment
    #[must_use]
    pub fn environment(&self) -> VouchEnvironment {
        self.environment
    }

    /// Host platform name and OS version, e.g. `"Android 14"`.
    #[must_use]
    pub fn platform_version(&self) -> String {
        format!("{} {}", self.platform.display_name(), self.os_version)
    }
}

/// Initializes the global Vouch configuration.
///
/// This function should be called once at application startup before any other
/// Vouch operations. Subsequent calls are ignored with a warning.
///
/// # Examples
///
/// ## Swift
///
/// ```swift
/// import Vouch
///
/// // In your app delegate or during app initialization
/// Vouch.initVouchConfig(environment: .production, platform: .ios,
///                       osVersion: UIDevice.current.systemVersion)
/// ```
#[uniffi::export]
pub fn init_vouch_config(
    environment: VouchEnvironment,
    platform: PlatformKind,
    os_version: String,
) {
    let config = VouchConfig::new(environment, platform, os_version);

    match CONFIG_INSTANCE.set(config) {
        Ok(()) => {
            crate::info!("Vouch config initialized for {environment} on {platform}");
        }
        Err(_) => {
            crate::warn!("Vouch config already initialized, ignoring");
        }
    }
}

/// Gets the current Vouch environment.
///
/// # Returns
/// The configured environment, or Production as a safe default when the config
/// has not been initialized.
#[must_use]
pub fn current_environment() -> VouchEnvironment {
    CONFIG_INSTANCE.get().map_or_else(
        || {
            crate::warn!("Vouch config not initialized, defaulting to Production");
            VouchEnvironment::Production
        },
        VouchConfig::environment,
    )
}

/// Gets the host platform name and OS version, e.g. `"Android 14"`.
///
/// # Returns
/// The registered platform string, or `"unknown"` when the config has not been
/// initialized.
#[must_use]
pub fn platform_version() -> String {
    CONFIG_INSTANCE.get().map_or_else(
        || {
            crate::warn!("Vouch config not initialized, platform version unknown");
            "unknown".to_string()
        },
        VouchConfig::platform_version,
    )
}

/// Checks whether the Vouch configuration has been initialized.
#[must_use]
pub fn is_initialized() -> bool {
    CONFIG_INSTANCE.get().is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_display() {
        assert_eq!(VouchEnvironment::Staging.as_str(), "staging");
        assert_eq!(VouchEnvironment::Production.as_str(), "production");

        assert_eq!(VouchEnvironment::Staging.to_string(), "staging");
        assert_eq!(VouchEnvironment::Production.to_string(), "production");
    }

    #[test]
    fn test_platform_version_formatting() {
        let config = VouchConfig::new(
            VouchEnvironment::Staging,
            PlatformKind::Android,
            "14".to_string(),
        );
        assert_eq!(config.platform_version(), "Android 14");

        let config = VouchConfig::new(
            VouchEnvironment::Production,
            PlatformKind::Ios,
            "17.2".to_string(),
        );
        assert_eq!(config.platform_version(), "iOS 17.2");
    }

    #[test]
    fn test_global_initialization() {
        init_vouch_config(
            VouchEnvironment::Staging,
            PlatformKind::Android,
            "14".to_string(),
        );
        assert!(is_initialized());
        assert_eq!(current_environment(), VouchEnvironment::Staging);
        assert_eq!(platform_version(), "Android 14");

        // A second initialization is ignored.
        init_vouch_config(
            VouchEnvironment::Production,
            PlatformKind::Ios,
            "17.2".to_string(),
        );
        assert_eq!(current_environment(), VouchEnvironment::Staging);
    }
}
