use std::fmt::Write;

use serde_json::Value;
use thiserror::Error;

use super::spec::{BodyCheck, ProbeSpec};

/// Classified result of one probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Passed,
    Warning(String),
    Failed(String),
}

impl Outcome {
    pub fn is_pass(&self) -> bool {
        matches!(self, Outcome::Passed)
    }

    pub fn is_warning(&self) -> bool {
        matches!(self, Outcome::Warning(_))
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Outcome::Failed(_))
    }

    pub fn mark(&self) -> &'static str {
        match self {
            Outcome::Passed => "✅",
            Outcome::Warning(_) => "⚠️",
            Outcome::Failed(_) => "❌",
        }
    }
}

/// Why a probe failed. The report wording is stable; operator dashboards
/// grep for these lines.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("Error: {0}")]
    Transport(String),
    #[error("Invalid JSON response")]
    InvalidJson,
    #[error("Unexpected response: {0}")]
    UnexpectedBody(String),
    #[error("Missing '{0}' field")]
    MissingKey(&'static str),
    #[error("Unexpected response format")]
    UnexpectedFormat,
    #[error("Failed with status {0}")]
    UnexpectedStatus(u16),
}

/// Classify a received response against the probe's rules.
///
/// Warning rules are consulted first, then the accepted status set and the
/// body check. Anything else is a failure carrying the status code.
pub fn classify(spec: &ProbeSpec, status: u16, content_type: &str, body: &str) -> Outcome {
    if let Some(rule) = spec.warnings.iter().find(|rule| rule.status == status) {
        return Outcome::Warning(rule.reason.to_string());
    }

    if !spec.accepted.contains(&status) {
        return Outcome::Failed(ProbeError::UnexpectedStatus(status).to_string());
    }

    match &spec.check {
        BodyCheck::None => Outcome::Passed,
        BodyCheck::SuccessFlag => match serde_json::from_str::<Value>(body) {
            Ok(json) if json.get("success") == Some(&Value::Bool(true)) => Outcome::Passed,
            Ok(json) => Outcome::Failed(ProbeError::UnexpectedBody(json.to_string()).to_string()),
            Err(_) => Outcome::Failed(ProbeError::InvalidJson.to_string()),
        },
        BodyCheck::RequireKey(key) => match serde_json::from_str::<Value>(body) {
            Ok(Value::Object(map)) if map.contains_key(*key) => Outcome::Passed,
            Ok(_) => Outcome::Failed(ProbeError::MissingKey(*key).to_string()),
            Err(_) => Outcome::Failed(ProbeError::InvalidJson.to_string()),
        },
        BodyCheck::JsonCollection => match serde_json::from_str::<Value>(body) {
            Ok(Value::Array(_) | Value::Object(_)) => Outcome::Passed,
            Ok(_) => Outcome::Failed(ProbeError::UnexpectedFormat.to_string()),
            Err(_) => Outcome::Failed(ProbeError::InvalidJson.to_string()),
        },
        BodyCheck::EventStream => {
            if content_type.contains("text/event-stream") {
                Outcome::Passed
            } else {
                Outcome::Warning("Accessible but not SSE format".to_string())
            }
        }
    }
}

/// Render an error together with its full source chain on one line.
pub fn error_chain(mut err: &(dyn std::error::Error + 'static)) -> String {
    let mut s = format!("{}", err);
    while let Some(src) = err.source() {
        let _ = write!(s, ": {}", src);
        err = src;
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probe::spec::ProbeGroup;
    use url::Url;

    fn plain_get() -> ProbeSpec {
        let url = Url::parse("http://localhost:8001/api/").unwrap();
        ProbeSpec::get(ProbeGroup::LocalBackend, url)
    }

    fn agent_get(path: &str) -> ProbeSpec {
        let url = Url::parse("http://localhost:8002").unwrap().join(path).unwrap();
        ProbeSpec::get(ProbeGroup::AgentService, url)
    }

    #[test]
    fn test_accepted_status_passes() {
        let outcome = classify(&plain_get(), 200, "application/json", r#"{"message":"Hello World"}"#);
        assert_eq!(outcome, Outcome::Passed);
    }

    #[test]
    fn test_unexpected_status_fails() {
        let outcome = classify(&plain_get(), 500, "application/json", "");
        assert_eq!(outcome, Outcome::Failed("Failed with status 500".to_string()));
    }

    #[test]
    fn test_auth_warning_never_fails() {
        let spec = agent_get("/api/conversations").warn_on(401, "Requires authentication (expected)");
        let outcome = classify(&spec, 401, "application/json", "");
        assert!(outcome.is_warning());
        assert!(!outcome.is_failure());
    }

    #[test]
    fn test_success_flag_true_passes() {
        let spec = agent_get("/api/auth/send-otp").check(BodyCheck::SuccessFlag);
        let outcome = classify(&spec, 200, "application/json", r#"{"success": true}"#);
        assert_eq!(outcome, Outcome::Passed);
    }

    #[test]
    fn test_success_flag_false_fails() {
        let spec = agent_get("/api/auth/send-otp").check(BodyCheck::SuccessFlag);
        let outcome = classify(&spec, 200, "application/json", r#"{"success": false}"#);
        assert!(outcome.is_failure());
    }

    #[test]
    fn test_success_flag_non_json_fails() {
        let spec = agent_get("/api/auth/send-otp").check(BodyCheck::SuccessFlag);
        let outcome = classify(&spec, 200, "text/html", "<html>gateway error</html>");
        assert_eq!(outcome, Outcome::Failed("Invalid JSON response".to_string()));
    }

    #[test]
    fn test_require_key_present_passes() {
        let spec = agent_get("/api/auth/status").check(BodyCheck::RequireKey("authenticated"));
        let outcome = classify(&spec, 200, "application/json", r#"{"authenticated": false}"#);
        assert_eq!(outcome, Outcome::Passed);
    }

    #[test]
    fn test_require_key_missing_fails() {
        let spec = agent_get("/api/auth/status").check(BodyCheck::RequireKey("authenticated"));
        let outcome = classify(&spec, 200, "application/json", r#"{"status": "ok"}"#);
        assert_eq!(
            outcome,
            Outcome::Failed("Missing 'authenticated' field".to_string())
        );
    }

    #[test]
    fn test_json_collection_accepts_arrays_and_objects() {
        let spec = agent_get("/api/vps-servers").check(BodyCheck::JsonCollection);
        assert!(classify(&spec, 200, "application/json", "[]").is_pass());
        assert!(classify(&spec, 200, "application/json", r#"{"servers": []}"#).is_pass());
        assert!(classify(&spec, 200, "application/json", r#""just a string""#).is_failure());
    }

    #[test]
    fn test_event_stream_content_type_passes() {
        let spec = agent_get("/api/chat").check(BodyCheck::EventStream);
        let outcome = classify(&spec, 200, "text/event-stream; charset=utf-8", "");
        assert_eq!(outcome, Outcome::Passed);
    }

    #[test]
    fn test_event_stream_plain_json_warns() {
        let spec = agent_get("/api/chat").check(BodyCheck::EventStream);
        let outcome = classify(&spec, 200, "application/json", "{}");
        assert_eq!(
            outcome,
            Outcome::Warning("Accessible but not SSE format".to_string())
        );
    }

    #[test]
    fn test_discover_not_found_warns_but_server_error_fails() {
        let spec = agent_get("/api/vps-servers/test-id/discover")
            .warn_on(401, "Requires authentication (expected)")
            .warn_on(404, "Server not found (expected for test ID)");
        assert!(classify(&spec, 404, "application/json", "").is_warning());
        assert!(classify(&spec, 500, "application/json", "").is_failure());
    }

    #[test]
    fn test_error_chain_walks_sources() {
        use std::fmt;

        #[derive(Debug)]
        struct Inner;
        impl fmt::Display for Inner {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "connection refused")
            }
        }
        impl std::error::Error for Inner {}

        #[derive(Debug)]
        struct Outer(Inner);
        impl fmt::Display for Outer {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "request failed")
            }
        }
        impl std::error::Error for Outer {
            fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
                Some(&self.0)
            }
        }

        assert_eq!(error_chain(&Outer(Inner)), "request failed: connection refused");
    }
}
