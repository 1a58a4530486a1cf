//! Remote speech recognition: one utterance, one multipart POST, one
//! transcript. The request shape is the OpenAI-compatible transcription
//! API (`model`, `language`, `file` → `{text}`), final results only, a
//! single alternative.

use serde::Deserialize;
use thiserror::Error;

use crate::config::SpeechConfig;
use crate::voice::ErrorClass;

/// Recognition failure carrying the class the voice machine reacts to.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct SpeechError {
    pub class: ErrorClass,
    pub message: String,
}

#[derive(Deserialize)]
struct TranscriptionResponse {
    text: String,
}

/// Post the utterance WAV to the configured endpoint and return the
/// transcript. The same bytes can be re-posted on retry.
pub async fn transcribe(
    client: &reqwest::Client,
    config: &SpeechConfig,
    wav: &[u8],
) -> Result<String, SpeechError> {
    let form = reqwest::multipart::Form::new()
        .text("model", config.model.clone())
        .text("language", config.locale.clone())
        .part(
            "file",
            reqwest::multipart::Part::bytes(wav.to_vec())
                .file_name("utterance.wav")
                .mime_str("audio/wav")
                .map_err(|e| SpeechError {
                    class: ErrorClass::Other,
                    message: e.to_string(),
                })?,
        );

    let response = client
        .post(&config.endpoint)
        .bearer_auth(&config.api_key)
        .multipart(form)
        .send()
        .await
        .map_err(from_transport)?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        log::warn!("Speech service answered {status}: {body}");
        return Err(SpeechError {
            class: classify_status(status),
            message: format!("speech service error ({status})"),
        });
    }

    let parsed: TranscriptionResponse = response.json().await.map_err(|e| SpeechError {
        class: ErrorClass::Other,
        message: format!("unreadable transcription response: {e}"),
    })?;
    Ok(parsed.text.trim().to_string())
}

fn from_transport(err: reqwest::Error) -> SpeechError {
    let class = if err.is_timeout() || err.is_connect() || err.is_request() {
        ErrorClass::Network
    } else {
        ErrorClass::Other
    };
    SpeechError {
        class,
        message: err.to_string(),
    }
}

fn classify_status(status: reqwest::StatusCode) -> ErrorClass {
    use reqwest::StatusCode;
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ErrorClass::ServiceBlocked,
        StatusCode::REQUEST_TIMEOUT | StatusCode::TOO_MANY_REQUESTS => ErrorClass::Network,
        s if s.is_server_error() => ErrorClass::Network,
        _ => ErrorClass::Other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_failures_are_service_blocked() {
        assert_eq!(
            classify_status(reqwest::StatusCode::UNAUTHORIZED),
            ErrorClass::ServiceBlocked
        );
        assert_eq!(
            classify_status(reqwest::StatusCode::FORBIDDEN),
            ErrorClass::ServiceBlocked
        );
    }

    #[test]
    fn transient_statuses_are_network_class() {
        assert_eq!(
            classify_status(reqwest::StatusCode::TOO_MANY_REQUESTS),
            ErrorClass::Network
        );
        assert_eq!(
            classify_status(reqwest::StatusCode::BAD_GATEWAY),
            ErrorClass::Network
        );
    }

    #[test]
    fn everything_else_is_other() {
        assert_eq!(
            classify_status(reqwest::StatusCode::UNPROCESSABLE_ENTITY),
            ErrorClass::Other
        );
    }
}
