//! Triage helper: free-text symptoms in, advisory text out.
//!
//! The advisory never blocks booking. Any failure of the external model
//! (connection, timeout, bad status, unparsable body, empty answer) resolves
//! to [`FALLBACK_ADVICE`]; `TriageError` stays inside this module's callers.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::AppConfig;

/// Shown whenever the assistant cannot answer.
pub const FALLBACK_ADVICE: &str = "Não foi possível processar a assistência virtual no momento. \
Por favor, prossiga com o agendamento se julgar necessário.";

#[derive(Debug, thiserror::Error)]
pub enum TriageError {
    #[error("Cannot connect to triage service at {0}")]
    Connection(String),
    #[error("Triage request timed out after {0}s")]
    Timeout(u64),
    #[error("Triage service returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("HTTP client error: {0}")]
    Http(String),
    #[error("Cannot parse triage response: {0}")]
    ResponseParsing(String),
    #[error("Triage service returned an empty answer")]
    EmptyAnswer,
}

/// Conversational model answering one triage question.
pub trait TriageClient: Send + Sync {
    fn assess(&self, prompt: &str) -> Result<String, TriageError>;
}

/// Prompt sent to the model. Asks only for a UPA-vs-emergency orientation.
pub fn build_prompt(symptoms: &str) -> String {
    format!(
        "Analise brevemente estes sintomas de um paciente que quer agendar UPA: \"{}\".\n\
         Diga apenas se é um caso adequado para UPA ou se deve ir imediatamente para uma \
         Emergência Hospitalar (casos graves de vida ou morte).\n\
         Seja empático e curto. Não dê diagnóstico médico formal.",
        symptoms.trim()
    )
}

/// Ask the model, degrading to the fallback sentence on any failure.
pub fn advise(client: &dyn TriageClient, symptoms: &str) -> String {
    match client.assess(&build_prompt(symptoms)) {
        Ok(answer) if !answer.trim().is_empty() => answer.trim().to_string(),
        Ok(_) => {
            tracing::warn!("Triage fallback: {}", TriageError::EmptyAnswer);
            FALLBACK_ADVICE.to_string()
        }
        Err(e) => {
            tracing::warn!("Triage fallback: {e}");
            FALLBACK_ADVICE.to_string()
        }
    }
}

// ═══════════════════════════════════════════════════════════
// Ollama-compatible client
// ═══════════════════════════════════════════════════════════

/// Client for an Ollama-compatible `/api/generate` endpoint.
pub struct OllamaTriageClient {
    base_url: String,
    model: String,
    timeout: Duration,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Serialize)]
struct GenerateOptions {
    temperature: f32,
}

#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
}

impl OllamaTriageClient {
    pub fn new(base_url: &str, model: &str, timeout: Duration) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            timeout,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(&config.triage_url, &config.triage_model, config.triage_timeout)
    }
}

impl TriageClient for OllamaTriageClient {
    /// Blocking; run it off the async runtime.
    fn assess(&self, prompt: &str) -> Result<String, TriageError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| TriageError::Http(e.to_string()))?;

        let url = format!("{}/api/generate", self.base_url);
        let body = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
            options: GenerateOptions { temperature: 0.7 },
        };

        let response = client.post(&url).json(&body).send().map_err(|e| {
            if e.is_connect() {
                TriageError::Connection(self.base_url.clone())
            } else if e.is_timeout() {
                TriageError::Timeout(self.timeout.as_secs())
            } else {
                TriageError::Http(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(TriageError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateResponse = response
            .json()
            .map_err(|e| TriageError::ResponseParsing(e.to_string()))?;
        Ok(parsed.response)
    }
}

/// Mock triage client for testing: returns a fixed answer or fails,
/// optionally after a delay.
pub struct MockTriageClient {
    answer: Option<String>,
    delay: Duration,
}

impl MockTriageClient {
    pub fn answering(answer: &str) -> Self {
        Self {
            answer: Some(answer.to_string()),
            delay: Duration::ZERO,
        }
    }

    pub fn failing() -> Self {
        Self {
            answer: None,
            delay: Duration::ZERO,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

impl TriageClient for MockTriageClient {
    fn assess(&self, _prompt: &str) -> Result<String, TriageError> {
        if !self.delay.is_zero() {
            std::thread::sleep(self.delay);
        }
        self.answer
            .clone()
            .ok_or_else(|| TriageError::Connection("mock".into()))
    }
}

// ═══════════════════════════════════════════════════════════
// Per-session request slot
// ═══════════════════════════════════════════════════════════

/// One in-flight triage request per booking session. Every request bumps
/// the generation; an answer is applied only if its generation is still
/// the latest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TriageSlot {
    pub symptoms: String,
    pub advice: Option<String>,
    pub in_flight: bool,
    #[serde(skip)]
    generation: u64,
}

impl TriageSlot {
    /// Start a request. `None` when there is nothing to ask about.
    pub fn begin(&mut self, symptoms: &str) -> Option<u64> {
        let symptoms = symptoms.trim();
        if symptoms.is_empty() {
            return None;
        }
        self.generation += 1;
        self.symptoms = symptoms.to_string();
        self.in_flight = true;
        Some(self.generation)
    }

    /// Apply an answer. Returns false (and changes nothing) for a stale one.
    pub fn complete(&mut self, generation: u64, advice: String) -> bool {
        if generation != self.generation {
            return false;
        }
        self.advice = Some(advice);
        self.in_flight = false;
        true
    }

    /// Drop a request that will never be completed. Only the latest
    /// generation releases the control.
    pub fn abandon(&mut self, generation: u64) -> bool {
        if generation != self.generation || !self.in_flight {
            return false;
        }
        self.in_flight = false;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_embeds_trimmed_symptoms() {
        let prompt = build_prompt("  febre e tosse ");
        assert!(prompt.contains("\"febre e tosse\""));
        assert!(prompt.contains("Emergência Hospitalar"));
    }

    #[test]
    fn advise_returns_model_answer() {
        let client = MockTriageClient::answering("  Procure a UPA.  ");
        assert_eq!(advise(&client, "dor de cabeça"), "Procure a UPA.");
    }

    #[test]
    fn advise_falls_back_on_failure() {
        let client = MockTriageClient::failing();
        assert_eq!(advise(&client, "dor no peito"), FALLBACK_ADVICE);
    }

    #[test]
    fn advise_falls_back_on_empty_answer() {
        let client = MockTriageClient::answering("   ");
        assert_eq!(advise(&client, "tontura"), FALLBACK_ADVICE);
    }

    #[test]
    fn unreachable_service_falls_back() {
        // Port 9 (discard) is not an Ollama server on any test host.
        let client = OllamaTriageClient::new("http://127.0.0.1:9/", "medgemma:4b", Duration::from_secs(2));
        assert_eq!(advise(&client, "febre"), FALLBACK_ADVICE);
    }

    #[test]
    fn empty_symptoms_do_not_start_a_request() {
        let mut slot = TriageSlot::default();
        assert_eq!(slot.begin("   "), None);
        assert!(!slot.in_flight);
    }

    #[test]
    fn newer_request_supersedes_older() {
        let mut slot = TriageSlot::default();
        let first = slot.begin("febre").unwrap();
        let second = slot.begin("febre alta").unwrap();
        assert!(second > first);

        assert!(!slot.complete(first, "old".into()));
        assert!(slot.in_flight);
        assert_eq!(slot.advice, None);

        assert!(slot.complete(second, "new".into()));
        assert!(!slot.in_flight);
        assert_eq!(slot.advice.as_deref(), Some("new"));
    }

    #[test]
    fn abandoned_request_releases_control() {
        let mut slot = TriageSlot::default();
        let first = slot.begin("febre").unwrap();
        let second = slot.begin("febre alta").unwrap();

        assert!(!slot.abandon(first));
        assert!(slot.in_flight);

        assert!(slot.abandon(second));
        assert!(!slot.in_flight);
        assert_eq!(slot.advice, None);

        // Already released; a late completion still applies.
        assert!(!slot.abandon(second));
        assert!(slot.complete(second, "late".into()));
    }

    #[test]
    fn client_trims_trailing_slash() {
        let client = OllamaTriageClient::new("http://localhost:11434/", "m", Duration::from_secs(1));
        assert_eq!(client.base_url, "http://localhost:11434");
    }
}
