use super::VerificationResult;

/// Terminal outcome reported by the external verification engine.
#[derive(Debug, Clone, PartialEq, Eq, uniffi::Enum)]
pub enum EngineOutcome {
    /// The engine finished the capture flow and accepted the uploads.
    Completed {
        /// Engine-issued token identifying the device session.
        device_session_token: String,
    },
    /// The engine gave up or was dismissed.
    Failed {
        /// Classified failure reason.
        error: EngineErrorKind,
        /// The engine may have created a device session before failing; when
        /// it did, the token is a partial-progress marker and is forwarded.
        device_session_token: Option<String>,
    },
}

/// Vendor-neutral classification of engine failures.
///
/// The native wrapper maps the vendor SDK's error enumeration onto these
/// variants before crossing the FFI. Values the wrapper does not recognize
/// must map to [`EngineErrorKind::Unknown`], so a vendor-side addition never
/// breaks the bridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, uniffi::Enum)]
pub enum EngineErrorKind {
    /// The credential key was rejected by the engine backend.
    InvalidCredential,
    /// The session token was rejected or malformed.
    InvalidSessionToken,
    /// No network connection was available.
    NoNetwork,
    /// The user backed out of the capture flow.
    UserCanceled,
    /// The user declined the camera permission.
    CameraPermissionDenied,
    /// The session token was valid but had expired.
    SessionExpired,
    /// The engine failed to initiate the session with its backend.
    SessionStartFailure,
    /// Captured documents could not be uploaded.
    UploadFailure,
    /// The user declined the engine's consent prompt.
    ConsentDeclined,
    /// Any failure without a more specific classification.
    Unknown,
}

impl EngineErrorKind {
    /// Stable error code delivered to callers.
    ///
    /// Total over the enumeration; [`EngineErrorKind::Unknown`] is the
    /// fallback arm for engine-side additions.
    #[must_use]
    pub const fn error_code(self) -> &'static str {
        match self {
            Self::InvalidCredential => "INVALID_KEY",
            Self::InvalidSessionToken => "INVALID_TOKEN",
            Self::NoNetwork => "NETWORK_ERROR",
            Self::UserCanceled => "USER_CANCELED",
            Self::CameraPermissionDenied => "CAMERA_PERMISSION_DENIED",
            Self::SessionExpired => "SESSION_EXPIRED",
            Self::SessionStartFailure => "INITIALIZATION_ERROR",
            Self::UploadFailure => "CAPTURE_ERROR",
            Self::ConsentDeclined => "CONSENT_DECLINED",
            Self::Unknown => "UNKNOWN",
        }
    }
}

impl std::fmt::Display for EngineErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let description = match self {
            Self::InvalidCredential => "the credential key was rejected",
            Self::InvalidSessionToken => "the session token was rejected",
            Self::NoNetwork => "no internet connection was available",
            Self::UserCanceled => "the user canceled the verification flow",
            Self::CameraPermissionDenied => "the camera permission was declined",
            Self::SessionExpired => "the verification session expired",
            Self::SessionStartFailure => "the engine could not initiate the session",
            Self::UploadFailure => "the captured documents could not be uploaded",
            Self::ConsentDeclined => "the user declined consent",
            Self::Unknown => "the engine reported an unclassified failure",
        };
        write!(f, "{description}")
    }
}

impl From<EngineOutcome> for VerificationResult {
    fn from(outcome: EngineOutcome) -> Self {
        match outcome {
            EngineOutcome::Completed {
                device_session_token,
            } => Self::completed(device_session_token),
            EngineOutcome::Failed {
                error,
                device_session_token,
            } => Self::failed(error, device_session_token),
        }
    }
}
