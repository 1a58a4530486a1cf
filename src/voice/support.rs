//! One-shot startup probe deciding whether the mic buttons are usable.

use crate::config::SpeechConfig;

/// Outcome of the probe. The reason is shown as a tooltip on the disabled
/// mic buttons.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Support {
    Supported,
    Unsupported { reason: String },
}

impl Support {
    pub fn is_supported(&self) -> bool {
        matches!(self, Support::Supported)
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            Support::Supported => None,
            Support::Unsupported { reason } => Some(reason),
        }
    }
}

/// True for encrypted schemes and loopback hosts, the same rule browsers
/// apply before granting microphone access.
pub fn endpoint_is_secure(endpoint: &str) -> bool {
    let Ok(url) = reqwest::Url::parse(endpoint) else {
        return false;
    };
    if url.scheme() == "https" {
        return true;
    }
    matches!(
        url.host_str(),
        Some("localhost") | Some("127.0.0.1") | Some("[::1]") | Some("::1")
    )
}

/// Probe once at startup: a recognition endpoint must be configured over a
/// secure origin, and the microphone must open (requested by opening and
/// immediately closing a capture stream).
pub fn probe(config: &SpeechConfig) -> Support {
    if config.endpoint.trim().is_empty() {
        return Support::Unsupported {
            reason: "no speech endpoint configured".into(),
        };
    }
    if !endpoint_is_secure(&config.endpoint) {
        return Support::Unsupported {
            reason: "insecure origin".into(),
        };
    }
    match crate::recorder::probe_microphone() {
        Ok(()) => Support::Supported,
        Err(e) => {
            log::warn!("Microphone probe failed: {e}");
            Support::Unsupported {
                reason: "permission denied".into(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn https_is_secure() {
        assert!(endpoint_is_secure("https://api.example.com/v1/transcribe"));
    }

    #[test]
    fn plain_http_is_insecure() {
        assert!(!endpoint_is_secure("http://api.example.com/v1/transcribe"));
    }

    #[test]
    fn loopback_hosts_are_secure_even_over_http() {
        assert!(endpoint_is_secure("http://localhost:9000/transcribe"));
        assert!(endpoint_is_secure("http://127.0.0.1/transcribe"));
        assert!(endpoint_is_secure("http://[::1]:8080/transcribe"));
    }

    #[test]
    fn garbage_urls_are_insecure() {
        assert!(!endpoint_is_secure("not a url"));
        assert!(!endpoint_is_secure(""));
    }
}
