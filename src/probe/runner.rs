use std::time::{Duration, Instant};

use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use tracing::debug;
use unicode_truncate::UnicodeTruncateStr;

use super::outcome::{Outcome, ProbeError, classify, error_chain};
use super::spec::{BodyCheck, ProbeGroup, ProbeSpec};

/// Width of the response excerpt echoed during the run.
const RESPONSE_PREVIEW_WIDTH: usize = 160;

/// What one probe execution produced. Exactly one record exists per probe,
/// even when the request never left the machine.
#[derive(Debug, Clone)]
pub struct ProbeRecord {
    pub label: String,
    pub group: ProbeGroup,
    pub outcome: Outcome,
    pub status: Option<u16>,
    pub elapsed: Duration,
    pub pass_text: &'static str,
}

impl ProbeRecord {
    /// The report line for this record, in the `mark label - text` shape.
    pub fn line(&self) -> String {
        let text = match &self.outcome {
            Outcome::Passed => self.pass_text,
            Outcome::Warning(reason) | Outcome::Failed(reason) => reason.as_str(),
        };
        format!("{} {} - {}", self.outcome.mark(), self.label, text)
    }
}

/// Execute a single probe and classify the response.
///
/// Transport errors are folded into the record rather than returned, so a
/// dead endpoint never aborts the rest of the run. `seq` is the probe's
/// position within its group, used only for the trace output.
pub async fn run_probe(client: &Client, spec: &ProbeSpec, seq: usize) -> ProbeRecord {
    println!();
    println!("{}. Testing {}", seq, spec.label);

    let start = Instant::now();

    let mut request = client.request(spec.method.clone(), spec.url.clone());
    if let Some(body) = &spec.body {
        request = request.json(body);
    }

    let (status, outcome) = match request.send().await {
        Ok(response) => {
            let status = response.status().as_u16();
            let content_type = response
                .headers()
                .get(CONTENT_TYPE)
                .and_then(|value| value.to_str().ok())
                .unwrap_or_default()
                .to_string();
            println!("Status Code: {status}");

            if matches!(spec.check, BodyCheck::EventStream) {
                // The streaming endpoint would hold the body open until the
                // client timeout, and only the header matters here.
                println!("Response Content-Type: {content_type}");
                (Some(status), classify(spec, status, &content_type, ""))
            } else {
                match response.text().await {
                    Ok(body) => {
                        println!("Response: {}", preview(&body));
                        (Some(status), classify(spec, status, &content_type, &body))
                    }
                    Err(e) => {
                        let reason = ProbeError::Transport(error_chain(&e)).to_string();
                        println!("{reason}");
                        (Some(status), Outcome::Failed(reason))
                    }
                }
            }
        }
        Err(e) => {
            let reason = ProbeError::Transport(error_chain(&e)).to_string();
            println!("{reason}");
            (None, Outcome::Failed(reason))
        }
    };

    let elapsed = start.elapsed();
    debug!(
        "{} finished in {:.2}ms",
        spec.label,
        elapsed.as_secs_f64() * 1000.0
    );

    ProbeRecord {
        label: spec.label.clone(),
        group: spec.group,
        outcome,
        status,
        elapsed,
        pass_text: spec.pass_text,
    }
}

fn preview(body: &str) -> String {
    let flat = body.split_whitespace().collect::<Vec<_>>().join(" ");
    let (excerpt, _) = flat.unicode_truncate(RESPONSE_PREVIEW_WIDTH);
    if excerpt.len() < flat.len() {
        format!("{excerpt}...")
    } else {
        flat
    }
}
