//! Voice input: turn one microphone utterance into discrete text tokens
//! appended to an ingredient or tag field.
//!
//! The behavior lives in a pure state machine ([`machine::VoiceMachine`])
//! driven by an event queue; the GTK side owns timers, the capture stream,
//! and the recognition request, and only interprets the machine's effects.

mod machine;
mod support;

pub use machine::{Effect, ErrorClass, Event, Params, Phase, SessionId, VoiceMachine};
pub use support::{endpoint_is_secure, probe, Support};

/// Split a transcript into trimmed, non-empty tokens on commas and
/// semicolons.
pub fn split_transcript(text: &str) -> Vec<String> {
    text.split([',', ';'])
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::split_transcript;

    #[test]
    fn splits_on_commas_and_semicolons() {
        assert_eq!(
            split_transcript("eggs, flour; milk"),
            vec!["eggs", "flour", "milk"]
        );
    }

    #[test]
    fn drops_empty_and_whitespace_segments() {
        assert_eq!(
            split_transcript("eggs,  flour ,, milk"),
            vec!["eggs", "flour", "milk"]
        );
        assert_eq!(split_transcript(" ; , ; "), Vec::<String>::new());
    }

    #[test]
    fn single_segment_passes_through_trimmed() {
        assert_eq!(split_transcript("  two cups of sugar  "), vec!["two cups of sugar"]);
    }
}
