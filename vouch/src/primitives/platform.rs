use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Platform enum as reported by host applications
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, uniffi::Enum)]
pub enum PlatformKind {
    /// Android platform
    #[serde(rename = "android")]
    Android,
    /// iOS platform
    #[serde(rename = "ios")]
    Ios,
}

impl PlatformKind {
    /// Returns the lowercase string representation for wire format
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Android => "android",
            Self::Ios => "ios",
        }
    }

    /// Returns the user-facing platform name, as the OS brands itself
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Android => "Android",
            Self::Ios => "iOS",
        }
    }
}

impl Display for PlatformKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_representations() {
        assert_eq!(PlatformKind::Android.as_str(), "android");
        assert_eq!(PlatformKind::Ios.as_str(), "ios");
        assert_eq!(PlatformKind::Android.display_name(), "Android");
        assert_eq!(PlatformKind::Ios.display_name(), "iOS");
    }

    #[test]
    fn test_platform_wire_format() {
        assert_eq!(serde_json::to_string(&PlatformKind::Ios).unwrap(), "\"ios\"");
        let parsed: PlatformKind = serde_json::from_str("\"android\"").unwrap();
        assert_eq!(parsed, PlatformKind::Android);
    }
}
