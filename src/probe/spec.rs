use reqwest::Method;
use serde_json::Value;
use url::Url;

/// Which section of the report a probe belongss to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeGroup {
    LocalBackend,
    AgentService,
    Knowledge,
}

impl ProbeGroup {
    pub const ALL: [ProbeGroup; 3] = [
        ProbeGroup::LocalBackend,
        ProbeGroup::AgentService,
        ProbeGroup::Knowledge,
    ];

    /// Banner printed before the group's probes run.
    pub fn banner(&self) -> &'static str {
        match self {
            ProbeGroup::LocalBackend => "TESTING LOCAL BACKEND ENDPOINTS",
            ProbeGroup::AgentService => "TESTING AGENT SERVICE ENDPOINTS - COMPREHENSIVE",
            ProbeGroup::Knowledge => "TESTING INFRASTRUCTURE KNOWLEDGE",
        }
    }

    /// Heading used for the group's section of the final report.
    pub fn heading(&self) -> &'static str {
        match self {
            ProbeGroup::LocalBackend => "Local Backend Results",
            ProbeGroup::AgentService => "Agent API Results",
            ProbeGroup::Knowledge => "Infrastructure Knowledge Results",
        }
    }
}

/// How an accepted response body is judged beyond the status code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BodyCheck {
    /// The status code alone decides.
    None,
    /// JSON body carrying `"success": true`.
    SuccessFlag,
    /// JSON object containing the given key.
    RequireKey(&'static str),
    /// JSON array or object of any shape.
    JsonCollection,
    /// `text/event-stream` content type. Other content types on an accepted
    /// status downgrade to a warning rather than a failure.
    EventStream,
}

/// A status code that is anticipated rather than wrong, with the wording
/// used for the report line.
#[derive(Debug, Clone)]
pub struct WarnRule {
    pub status: u16,
    pub reason: &'static str,
}

/// A single named HTTP probe and its classification rules.
#[derive(Debug, Clone)]
pub struct ProbeSpec {
    pub label: String,
    pub group: ProbeGroup,
    pub method: Method,
    pub url: Url,
    pub body: Option<Value>,
    /// Status codes counted as success, subject to the body check.
    pub accepted: Vec<u16>,
    /// Status codes reported as expected warnings.
    pub warnings: Vec<WarnRule>,
    pub check: BodyCheck,
    /// Wording of the success report line.
    pub pass_text: &'static str,
}

impl ProbeSpec {
    fn new(group: ProbeGroup, method: Method, url: Url, body: Option<Value>) -> Self {
        let label = format!("{} {}", method, url.path());
        Self {
            label,
            group,
            method,
            url,
            body,
            accepted: vec![200],
            warnings: Vec::new(),
            check: BodyCheck::None,
            pass_text: "Working",
        }
    }

    pub fn get(group: ProbeGroup, url: Url) -> Self {
        Self::new(group, Method::GET, url, None)
    }

    pub fn post(group: ProbeGroup, url: Url, body: Value) -> Self {
        Self::new(group, Method::POST, url, Some(body))
    }

    /// POST without a body, used by the discovery trigger endpoints.
    pub fn post_empty(group: ProbeGroup, url: Url) -> Self {
        Self::new(group, Method::POST, url, None)
    }

    pub fn labeled(mut self, label: &str) -> Self {
        self.label = label.to_string();
        self
    }

    pub fn accept(mut self, codes: &[u16]) -> Self {
        self.accepted = codes.to_vec();
        self
    }

    pub fn warn_on(mut self, status: u16, reason: &'static str) -> Self {
        self.warnings.push(WarnRule { status, reason });
        self
    }

    pub fn check(mut self, check: BodyCheck) -> Self {
        self.check = check;
        self
    }

    pub fn pass_text(mut self, text: &'static str) -> Self {
        self.pass_text = text;
        self
    }
}
