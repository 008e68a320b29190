use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc, Mutex, MutexGuard, PoisonError,
};

use serde::{Deserialize, Serialize};
use tokio::sync::oneshot;

use crate::{debug, info, vouch_export, warn};

/// Dynamic method-call surface for hosts that route string-keyed calls.
mod channel;

/// Outbound contract the native side implements around the vendor SDK.
mod engine;

/// Engine outcome taxonomy and its mapping to stable error codes.
mod outcome;


pub use channel::{MethodCall, MethodResponse};
pub use engine::{EngineError, PresentationContext, VerificationEngine};
pub use outcome::{EngineErrorKind, EngineOutcome};

/// Caller-supplied description of one verification attempt. Immutable once
/// submitted.
#[derive(Debug, Clone, Deserialize, uniffi::Record)]
#[serde(rename_all = "camelCase")]
pub struct VerificationRequest {
    /// Identifies the calling application to the verification engine.
    pub credential_key: String,
    /// Identifies this specific verification attempt. Single use.
    pub session_token: String,
    /// Selects the engine's regulatory endpoint variant.
    #[serde(default)]
    #[uniffi(default = false)]
    pub use_alternate_endpoint: bool,
}

/// The value delivered back to the caller once a session terminates.
///
/// `success` is always set; the remaining fields are filled according to the
/// branch taken. `device_session_token` may be present even on failure, as a
/// partial-progress marker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, uniffi::Record)]
#[serde(rename_all = "camelCase")]
pub struct VerificationResult {
    /// Whether the engine completed the verification flow.
    pub success: bool,
    /// Engine-issued token for the device session, when one was created.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_session_token: Option<String>,
    /// Stable error code, present when `success` is false.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
    /// Human-readable description of the failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl VerificationResult {
    pub(crate) fn completed(device_session_token: String) -> Self {
        Self {
            success: true,
            device_session_token: Some(device_session_token),
            error_code: None,
            error_message: None,
        }
    }

    pub(crate) fn failed(
        error: EngineErrorKind,
        device_session_token: Option<String>,
    ) -> Self {
        Self {
            success: false,
            device_session_token,
            error_code: Some(error.error_code().to_string()),
            error_message: Some(error.to_string()),
        }
    }

    pub(crate) fn no_data(message: String) -> Self {
        Self {
            success: false,
            device_session_token: None,
            error_code: Some("NO_DATA".to_string()),
            error_message: Some(message),
        }
    }
}

/// Failures surfaced to the caller before or while starting the engine.
///
/// Engine outcomes are not errors, even failed ones; they are delivered as
/// [`VerificationResult`] values.
#[crate::vouch_error]
pub enum VerificationError {
    /// No presentation surface is attached to host the engine UI.
    #[error("no presentation context is available to host the verification UI")]
    NoContext,
    /// The single in-flight session slot is occupied.
    #[error("a verification session is already active")]
    AlreadyActive,
    /// The request carried an empty credential key.
    #[error("credential key must not be empty")]
    InvalidKey,
    /// The request carried an empty session token.
    #[error("session token must not be empty")]
    InvalidToken,
    /// The engine rejected the start request synchronously.
    #[error("failed to start the verification engine: {message}")]
    Initialization {
        /// Failure detail reported by the engine.
        message: String,
    },
}

impl VerificationError {
    /// Stable string code for the method-call surface.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::NoContext => "NO_CONTEXT",
            Self::AlreadyActive => "ALREADY_ACTIVE",
            Self::InvalidKey => "INVALID_KEY",
            Self::InvalidToken => "INVALID_TOKEN",
            Self::Initialization { .. } => "INITIALIZATION_ERROR",
            Self::Generic { .. } => "UNKNOWN",
        }
    }
}

/// Record of the single in-flight session: the correlation token handed to
/// the engine, and the channel that resolves the suspended caller.
struct PendingSession {
    correlation_token: u64,
    resolver: oneshot::Sender<VerificationResult>,
}

/// Connects a caller's request/response model to the externally-owned,
/// asynchronously-completing verification engine.
///
/// At most one session is in flight at any time. The engine owns the entire
/// foreground UI and cannot be multiplexed, so a concurrent launch is
/// rejected rather than queued.
#[derive(uniffi::Object)]
pub struct VerificationBridge {
    engine: Arc<dyn VerificationEngine>,
    host: Mutex<Option<PresentationContext>>,
    pending: Mutex<Option<PendingSession>>,
    next_correlation: AtomicU64,
}

#[vouch_export]
impl VerificationBridge {
    /// Creates a bridge that delegates verification sessions to `engine`.
    #[uniffi::constructor]
    #[must_use]
    pub fn new(engine: Arc<dyn VerificationEngine>) -> Self {
        Self {
            engine,
            host: Mutex::new(None),
            pending: Mutex::new(None),
            next_correlation: AtomicU64::new(1),
        }
    }

    /// Attaches the foreground surface able to host the engine UI.
    pub fn attach_host(&self, context: PresentationContext) {
        debug!("host surface {} attached", context.surface_id);
        *lock(&self.host) = Some(context);
    }

    /// Detaches the foreground surface. An in-flight session stays pending:
    /// the engine may still deliver an outcome for it.
    pub fn detach_host(&self) {
        *lock(&self.host) = None;
    }

    /// Detaches the host surface and releases the pending session without
    /// resolving it through the engine path.
    ///
    /// The suspended caller's future fails with a generic error. An engine
    /// outcome arriving later no longer matches any session and is ignored,
    /// so a restart never resolves a caller twice or after its listener is
    /// gone.
    pub fn teardown(&self) {
        *lock(&self.host) = None;
        if lock(&self.pending).take().is_some() {
            warn!("bridge torn down with a verification session still in flight");
        }
    }

    /// Runs one verification session end to end.
    ///
    /// Validates the request, hands foreground control to the engine and
    /// suspends until [`Self::on_engine_outcome`] delivers the matching
    /// outcome. The bridge imposes no timeout of its own; a caller that wants
    /// one must race this future against a timer and treat a timeout as an
    /// abandoned (but not retracted) session.
    ///
    /// # Errors
    /// - [`VerificationError::NoContext`] when no host surface is attached.
    /// - [`VerificationError::AlreadyActive`] when a session is in flight.
    ///   The existing session is left untouched.
    /// - [`VerificationError::InvalidKey`] / [`VerificationError::InvalidToken`]
    ///   for empty credentials. The engine is not started.
    /// - [`VerificationError::Initialization`] when the engine rejects the
    ///   start synchronously. The session slot is released again.
    pub async fn launch_verification(
        &self,
        request: VerificationRequest,
    ) -> Result<VerificationResult, VerificationError> {
        let context = lock(&self.host)
            .clone()
            .ok_or(VerificationError::NoContext)?;

        let VerificationRequest {
            credential_key,
            session_token,
            use_alternate_endpoint,
        } = request;

        // Claiming the slot and the remaining precondition checks happen
        // under one lock so two concurrent launches cannot both observe it
        // free.
        let (correlation_token, outcome) = {
            let mut pending = lock(&self.pending);
            if pending.is_some() {
                return Err(VerificationError::AlreadyActive);
            }
            if credential_key.is_empty() {
                return Err(VerificationError::InvalidKey);
            }
            if session_token.is_empty() {
                return Err(VerificationError::InvalidToken);
            }

            let correlation_token = self.next_correlation.fetch_add(1, Ordering::Relaxed);
            let (resolver, outcome) = oneshot::channel();
            *pending = Some(PendingSession {
                correlation_token,
                resolver,
            });
            (correlation_token, outcome)
        };

        info!("starting verification session (correlation token {correlation_token})");

        let started = self
            .engine
            .build_launch_handle(
                context.clone(),
                credential_key,
                session_token,
                use_alternate_endpoint,
            )
            .and_then(|handle| {
                self.engine
                    .begin_foreground(context, handle, correlation_token)
            });

        if let Err(source) = started {
            // The slot must not leak into a permanently blocked state when
            // the engine never started.
            self.release_pending(correlation_token);
            return Err(VerificationError::Initialization {
                message: source.to_string(),
            });
        }

        match outcome.await {
            Ok(result) => Ok(result),
            Err(_) => Err(VerificationError::Generic {
                message: "the bridge was torn down before an outcome was delivered"
                    .to_string(),
            }),
        }
    }

    /// Entry point for the platform's out-of-band outcome delivery.
    ///
    /// A delivery that matches no pending session — a stale delivery after a
    /// teardown, or a foreign correlation token — is ignored. A matching
    /// delivery frees the session slot first, then resolves the suspended
    /// caller exactly once: with the mapped engine outcome, or with a
    /// `NO_DATA` result when the payload is absent or unparseable.
    pub async fn on_engine_outcome(&self, correlation_token: u64, payload: Option<Vec<u8>>) {
        let Some(session) = self.take_pending(correlation_token) else {
            warn!("ignoring engine outcome with unmatched correlation token {correlation_token}");
            return;
        };

        let result = match payload {
            None => VerificationResult::no_data(
                "no payload was delivered with the engine outcome".to_string(),
            ),
            Some(payload) => match self.engine.extract_outcome(payload).await {
                Ok(engine_outcome) => engine_outcome.into(),
                Err(source) => VerificationResult::no_data(source.to_string()),
            },
        };

        info!(
            "verification session {correlation_token} resolved (success: {})",
            result.success
        );

        if session.resolver.send(result).is_err() {
            warn!("verification caller went away before the outcome could be delivered");
        }
    }
}

impl VerificationBridge {
    /// Takes the pending session out, provided `correlation_token` matches it.
    fn take_pending(&self, correlation_token: u64) -> Option<PendingSession> {
        let mut pending = lock(&self.pending);
        if pending
            .as_ref()
            .is_some_and(|session| session.correlation_token == correlation_token)
        {
            pending.take()
        } else {
            None
        }
    }

    /// Frees the slot after a failed engine start. Dropping the resolver is
    /// intentional: the caller is resolved through the error path instead.
    fn release_pending(&self, correlation_token: u64) {
        drop(self.take_pending(correlation_token));
    }
}

/// Locks `mutex`, recovering the guard when a panicking thread poisoned it.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
