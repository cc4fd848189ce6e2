use anyhow::{anyhow, bail, Context, Result};
use reqwest::blocking::Client;
use reqwest::{StatusCode, Url};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{debug, warn};

pub const DEFAULT_ENDPOINT: &str = "https://hexgrad-kokoro-tts.hf.space";

/// Prediction routes tried in order; Gradio versions disagree on the path.
const PREDICT_ROUTES: [&str; 3] = ["api/predict", "run/predict", "api/v1/predict"];

/// Audio returned by a synthesizer: a URL to fetch, or whatever inline
/// payload the service produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum SpeechAudio {
    Url(String),
    Inline(Value),
}

pub trait SpeechProvider {
    fn synthesize(&self, text: &str) -> Result<SpeechAudio>;
}

#[derive(Debug, Clone)]
pub struct GradioSpeech {
    http: Client,
    base: Url,
}

impl GradioSpeech {
    pub fn new(endpoint: Option<&str>) -> Result<Self> {
        let raw = endpoint.unwrap_or(DEFAULT_ENDPOINT);
        let mut base = Url::parse(raw).with_context(|| format!("invalid speech endpoint '{raw}'"))?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let http = Client::builder().build()?;
        Ok(Self { http, base })
    }

    pub fn base(&self) -> &Url {
        &self.base
    }
}

impl SpeechProvider for GradioSpeech {
    fn synthesize(&self, text: &str) -> Result<SpeechAudio> {
        validate_text(text)?;
        let body = json!({ "data": [text], "fn_index": 0 });
        let mut last_error = None;

        for route in PREDICT_ROUTES {
            let url = self.base.join(route)?;
            debug!(%url, "requesting speech synthesis");
            let response = match self.http.post(url.clone()).json(&body).send() {
                Ok(response) => response,
                Err(err) => {
                    warn!(%url, "speech request failed: {err}");
                    last_error = Some(anyhow!(err).context(format!("requesting {url}")));
                    continue;
                }
            };
            let status = response.status();
            if status == StatusCode::NOT_FOUND {
                continue;
            }
            if !status.is_success() {
                last_error = Some(anyhow!("{url} returned {status}"));
                continue;
            }
            let payload: Value = response
                .json()
                .with_context(|| format!("decoding response from {url}"))?;
            return extract_audio(&payload);
        }

        Err(last_error.unwrap_or_else(|| anyhow!("no speech endpoint answered")))
    }
}

fn validate_text(text: &str) -> Result<()> {
    if text.trim().is_empty() {
        bail!("speech text must not be empty");
    }
    Ok(())
}

/// Picks `data[0]` out of a Gradio prediction result, falling back to `data`.
pub fn extract_audio(payload: &Value) -> Result<SpeechAudio> {
    let data = payload
        .get("data")
        .ok_or_else(|| anyhow!("speech response has no 'data' field"))?;
    let first = match data {
        Value::Array(items) => items.first().cloned().unwrap_or(Value::Null),
        other => other.clone(),
    };
    Ok(match first {
        Value::String(url) => SpeechAudio::Url(url),
        other => SpeechAudio::Inline(other),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_text_never_reaches_the_network() {
        // unroutable base; a request would fail with a connection error instead
        let speech = GradioSpeech::new(Some("http://127.0.0.1:9")).expect("client");
        let err = speech.synthesize("   ").unwrap_err();
        assert!(err.to_string().contains("must not be empty"));
    }

    #[test]
    fn base_gains_a_trailing_slash() {
        let speech = GradioSpeech::new(Some("https://example.invalid/space")).expect("client");
        assert_eq!(
            speech.base().join("api/predict").unwrap().as_str(),
            "https://example.invalid/space/api/predict"
        );
        assert!(GradioSpeech::new(Some("not a url")).is_err());
    }

    #[test]
    fn first_data_element_is_returned() {
        let payload = json!({ "data": ["https://cdn/voice.wav", 1.5] });
        assert_eq!(
            extract_audio(&payload).unwrap(),
            SpeechAudio::Url("https://cdn/voice.wav".into())
        );

        let inline = json!({ "data": [{ "name": "voice.wav", "is_file": true }] });
        assert_eq!(
            extract_audio(&inline).unwrap(),
            SpeechAudio::Inline(json!({ "name": "voice.wav", "is_file": true }))
        );
    }

    #[test]
    fn bare_data_falls_back_to_the_whole_field() {
        let payload = json!({ "data": { "path": "/tmp/a.wav" } });
        assert_eq!(
            extract_audio(&payload).unwrap(),
            SpeechAudio::Inline(json!({ "path": "/tmp/a.wav" }))
        );
        assert!(extract_audio(&json!({ "error": "busy" })).is_err());
    }
}
