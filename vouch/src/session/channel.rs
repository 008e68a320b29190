use crate::primitives::config;
use crate::{vouch_export, warn};

use super::{VerificationBridge, VerificationRequest};

const METHOD_PLATFORM_VERSION: &str = "getPlatformVersion";
const METHOD_LAUNCH_VERIFICATION: &str = "launchVerification";

/// A method invocation forwarded from the host's dynamic call channel.
#[derive(Debug, Clone, uniffi::Record)]
pub struct MethodCall {
    /// Operation name, e.g. `"launchVerification"`.
    pub method: String,
    /// JSON-encoded argument map, when the operation takes one.
    #[uniffi(default = None)]
    pub arguments: Option<String>,
}

/// Terminal reply to a [`MethodCall`].
#[derive(Debug, Clone, PartialEq, Eq, uniffi::Enum)]
pub enum MethodResponse {
    /// The operation ran to a terminal result.
    Success {
        /// JSON-encoded return value.
        value: String,
    },
    /// The operation failed.
    Error {
        /// Stable error code, e.g. `"INVALID_KEY"`.
        code: String,
        /// Human-readable failure description.
        message: String,
    },
    /// The bridge exposes no operation with the requested name. Distinct
    /// from every error code an operation can produce.
    NotImplemented,
}

#[vouch_export]
impl VerificationBridge {
    /// Host OS name and version, as registered through
    /// [`crate::primitives::config::init_vouch_config`].
    #[must_use]
    pub fn platform_version(&self) -> String {
        config::platform_version()
    }

    /// Dispatches one dynamic method call to the matching typed operation.
    pub async fn handle_method_call(&self, call: MethodCall) -> MethodResponse {
        match call.method.as_str() {
            METHOD_PLATFORM_VERSION => MethodResponse::Success {
                value: serde_json::Value::String(self.platform_version()).to_string(),
            },
            METHOD_LAUNCH_VERIFICATION => self.launch_from_call(call.arguments).await,
            unknown => {
                warn!("method {unknown} is not implemented");
                MethodResponse::NotImplemented
            }
        }
    }
}

impl VerificationBridge {
    async fn launch_from_call(&self, arguments: Option<String>) -> MethodResponse {
        let request = match parse_request(arguments) {
            Ok(request) => request,
            Err(response) => return response,
        };

        match self.launch_verification(request).await {
            Ok(result) => serde_json::to_string(&result).map_or_else(
                |error| MethodResponse::Error {
                    code: "UNKNOWN".to_string(),
                    message: error.to_string(),
                },
                |value| MethodResponse::Success { value },
            ),
            Err(error) => MethodResponse::Error {
                code: error.code().to_string(),
                message: error.to_string(),
            },
        }
    }
}

fn parse_request(arguments: Option<String>) -> Result<VerificationRequest, MethodResponse> {
    let Some(raw) = arguments else {
        return Err(invalid_arguments("an argument map is required"));
    };
    serde_json::from_str(&raw).map_err(|error| invalid_arguments(&error.to_string()))
}

fn invalid_arguments(message: &str) -> MethodResponse {
    MethodResponse::Error {
        code: "INVALID_ARGUMENTS".to_string(),
        message: format!("invalid arguments provided: {message}"),
    }
}

#[cfg(test)]
mod tests {
    use tokio_test::{assert_pending, assert_ready};

    use crate::session::test::{bridge_with, MockEngine};
    use crate::session::{EngineErrorKind, EngineOutcome};

    use super::*;

    fn call(method: &str, arguments: Option<&str>) -> MethodCall {
        MethodCall {
            method: method.to_string(),
            arguments: arguments.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn test_unknown_method_resolves_not_implemented() {
        let bridge = bridge_with(MockEngine::new());

        let response = bridge.handle_method_call(call("scanBarcode", None)).await;

        assert_eq!(response, MethodResponse::NotImplemented);
    }

    #[tokio::test]
    async fn test_platform_version_resolves_a_json_string() {
        let bridge = bridge_with(MockEngine::new());

        let response = bridge
            .handle_method_call(call("getPlatformVersion", None))
            .await;

        let MethodResponse::Success { value } = response else {
            panic!("expected a success response, got {response:?}");
        };
        let version: String = serde_json::from_str(&value).unwrap();
        assert!(!version.is_empty());
    }

    #[tokio::test]
    async fn test_launch_without_arguments_is_rejected() {
        let bridge = bridge_with(MockEngine::new());

        let response = bridge
            .handle_method_call(call("launchVerification", None))
            .await;

        let MethodResponse::Error { code, .. } = response else {
            panic!("expected an error response, got {response:?}");
        };
        assert_eq!(code, "INVALID_ARGUMENTS");
    }

    #[tokio::test]
    async fn test_launch_with_malformed_arguments_is_rejected() {
        let bridge = bridge_with(MockEngine::new());

        let response = bridge
            .handle_method_call(call("launchVerification", Some("not a map")))
            .await;

        let MethodResponse::Error { code, .. } = response else {
            panic!("expected an error response, got {response:?}");
        };
        assert_eq!(code, "INVALID_ARGUMENTS");
    }

    #[tokio::test]
    async fn test_precondition_failure_carries_its_code() {
        let engine = MockEngine::new();
        let bridge = bridge_with(engine.clone());

        let response = bridge
            .handle_method_call(call(
                "launchVerification",
                Some(r#"{"credentialKey":"","sessionToken":"t1"}"#),
            ))
            .await;

        assert_eq!(
            response,
            MethodResponse::Error {
                code: "INVALID_KEY".to_string(),
                message: "credential key must not be empty".to_string(),
            }
        );
        assert_eq!(engine.build_count(), 0);
    }

    #[tokio::test]
    async fn test_completed_launch_serializes_the_result_map() {
        let engine = MockEngine::new();
        let bridge = bridge_with(engine.clone());

        // useAlternateEndpoint is omitted on purpose; it defaults to false.
        let mut pending_call = tokio_test::task::spawn(bridge.handle_method_call(call(
            "launchVerification",
            Some(r#"{"credentialKey":"k1","sessionToken":"t1"}"#),
        )));
        assert_pending!(pending_call.poll());

        engine.set_outcome(Ok(EngineOutcome::Completed {
            device_session_token: "abc".to_string(),
        }));
        bridge
            .on_engine_outcome(engine.last_correlation_token(), Some(b"payload".to_vec()))
            .await;

        let response = assert_ready!(pending_call.poll());
        assert_eq!(
            response,
            MethodResponse::Success {
                value: r#"{"success":true,"deviceSessionToken":"abc"}"#.to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_failed_launch_serializes_the_error_fields() {
        let engine = MockEngine::new();
        let bridge = bridge_with(engine.clone());

        let mut pending_call = tokio_test::task::spawn(bridge.handle_method_call(call(
            "launchVerification",
            Some(r#"{"credentialKey":"k1","sessionToken":"t1","useAlternateEndpoint":true}"#),
        )));
        assert_pending!(pending_call.poll());

        engine.set_outcome(Ok(EngineOutcome::Failed {
            error: EngineErrorKind::UserCanceled,
            device_session_token: None,
        }));
        bridge
            .on_engine_outcome(engine.last_correlation_token(), Some(b"payload".to_vec()))
            .await;

        let response = assert_ready!(pending_call.poll());
        let MethodResponse::Success { value } = response else {
            panic!("failed outcomes are results, not errors; got {response:?}");
        };

        let map: serde_json::Value = serde_json::from_str(&value).unwrap();
        assert_eq!(map["success"], false);
        assert_eq!(map["errorCode"], "USER_CANCELED");
        assert_eq!(map["errorMessage"], "the user canceled the verification flow");
        assert!(map.get("deviceSessionToken").is_none());
    }
}
