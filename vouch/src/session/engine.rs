use super::outcome::EngineOutcome;

/// Opaque reference to the host's foreground surface (an activity or view
/// controller) able to present the engine UI.
///
/// The native side resolves `surface_id` back to the real platform object;
/// the bridge never interprets it.
#[derive(Debug, Clone, PartialEq, Eq, uniffi::Record)]
pub struct PresentationContext {
    /// Host-chosen identifier for the surface.
    pub surface_id: String,
}

/// Faults raised by the native engine wrapper itself, as opposed to failed
/// verification outcomes.
#[crate::vouch_error]
pub enum EngineError {
    /// The engine could not build a launch handle from the given inputs.
    #[error("engine is misconfigured: {message}")]
    Misconfigured {
        /// Detail reported by the vendor SDK.
        message: String,
    },
    /// A delivered outcome payload did not parse as a vendor result.
    #[error("outcome payload could not be parsed: {message}")]
    MalformedPayload {
        /// Detail reported by the vendor SDK.
        message: String,
    },
}

/// Converts unexpected `UniFFI` callback errors to [`EngineError`].
///
/// When the native implementation hits an unhandled exception or panic,
/// `UniFFI` hands it to this conversion instead of aborting the Rust side.
impl From<uniffi::UnexpectedUniFFICallbackError> for EngineError {
    fn from(error: uniffi::UnexpectedUniFFICallbackError) -> Self {
        Self::Generic {
            message: error.reason,
        }
    }
}

/// Contract the native side implements around the vendor verification SDK.
///
/// The engine is opaque: once [`Self::begin_foreground`] succeeds it owns the
/// entire foreground UI, performs capture, upload and verification on its own
/// schedule and may suspend indefinitely. Its terminal outcome comes back
/// through the platform's result-delivery channel — see
/// [`super::VerificationBridge::on_engine_outcome`] — not through these calls.
#[uniffi::export(with_foreign)]
#[async_trait::async_trait]
pub trait VerificationEngine: Send + Sync {
    /// Builds the vendor launch handle for one session.
    ///
    /// The returned string is an opaque handle the engine resolves in
    /// [`Self::begin_foreground`].
    ///
    /// # Errors
    /// [`EngineError::Misconfigured`] when the vendor SDK rejects the inputs
    /// synchronously.
    fn build_launch_handle(
        &self,
        context: PresentationContext,
        credential_key: String,
        session_token: String,
        use_alternate_endpoint: bool,
    ) -> Result<String, EngineError>;

    /// Transfers foreground control to the engine UI for the session
    /// identified by `correlation_token`.
    ///
    /// The same token must accompany the outcome the platform later
    /// delivers.
    ///
    /// # Errors
    /// [`EngineError::Misconfigured`] when the flow cannot be presented.
    fn begin_foreground(
        &self,
        context: PresentationContext,
        handle: String,
        correlation_token: u64,
    ) -> Result<(), EngineError>;

    /// Parses the platform's delivered payload into a terminal outcome. The
    /// vendor SDK may complete this asynchronously.
    ///
    /// # Errors
    /// [`EngineError::MalformedPayload`] when the payload is not a valid
    /// vendor result.
    async fn extract_outcome(&self, payload: Vec<u8>) -> Result<EngineOutcome, EngineError>;
}
