use serde::Deserialize;

/// Run configuration for the smokebox CLI.
/// Every field has a default, so the binary runs with no config file at all.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Base URL of the local backend under test.
    #[serde(default = "default_backend_url")]
    pub backend_url: String,

    /// Base URL of the remote agent service under test.
    #[serde(default = "default_agent_url")]
    pub agent_url: String,

    /// Per-request timeout in seconds, applied to every probe.
    /// Defaults to 10 if not specified.
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// Client name submitted when creating a status check.
    #[serde(default = "default_client_name")]
    pub client_name: String,

    /// Email address submitted to the OTP endpoint.
    #[serde(default = "default_email")]
    pub email: String,

    /// Synthetic server identifier used by the discovery probes.
    /// Lookups against it are expected to come back 404.
    #[serde(default = "default_test_server_id")]
    pub test_server_id: String,
}

fn default_backend_url() -> String {
    "https://auto-exec-1.preview.emergentagent.com".to_string()
}

fn default_agent_url() -> String {
    "https://vps.coengine.ai".to_string()
}

fn default_timeout_seconds() -> u64 {
    10
}

fn default_client_name() -> String {
    "test_client_vps_agent".to_string()
}

fn default_email() -> String {
    "smoke-test@example.com".to_string()
}

fn default_test_server_id() -> String {
    "test-id".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend_url: default_backend_url(),
            agent_url: default_agent_url(),
            timeout_seconds: default_timeout_seconds(),
            client_name: default_client_name(),
            email: default_email(),
            test_server_id: default_test_server_id(),
        }
    }
}
