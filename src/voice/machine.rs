//! The voice-input state machine.
//!
//! One session runs from a start press to a terminal outcome: tokens
//! appended, an error notice, a timeout notice, or a silent abort. At most
//! one session is ever active; starting a new one aborts the old one first.
//! Events are tagged with the session they belong to, so anything arriving
//! late from a discarded session falls through without effect.

use std::time::Duration;

use super::split_transcript;

/// Error classes for a failed recognition attempt. Only `Network` is
/// retried; everything else surfaces immediately.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    Network,
    Permission,
    NoSpeech,
    NoMicrophone,
    ServiceBlocked,
    Other,
}

impl ErrorClass {
    /// User-facing message for a terminal failure.
    pub fn message(self) -> &'static str {
        match self {
            ErrorClass::Network => {
                "Speech service unreachable. Check your connection and try again."
            }
            ErrorClass::Permission => "Microphone access was denied.",
            ErrorClass::NoSpeech => "No speech detected. Try again.",
            ErrorClass::NoMicrophone => "No microphone was found.",
            ErrorClass::ServiceBlocked => "The speech service rejected the request.",
            ErrorClass::Other => "Speech recognition failed. Try again.",
        }
    }
}

/// Identifies one recognition session from start to its terminal outcome.
pub type SessionId = u64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Mic button pressed to start. `online` is the environment's
    /// connectivity report at the time of the press.
    StartPressed { online: bool },
    /// Mic button pressed again while a session is active.
    StopPressed,
    /// Dialog closed, target switched, or app teardown. Never an error.
    Cancel,
    TimeoutFired { session: SessionId },
    TranscriptReady { session: SessionId, text: String },
    TranscribeFailed { session: SessionId, class: ErrorClass },
    RetryDelayElapsed { session: SessionId },
}

/// What the driver must do in response to a step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Tear down the capture stream and any buffered audio.
    AbortCapture,
    /// Open the microphone and start buffering the utterance.
    StartCapture { session: SessionId },
    ArmTimeout { session: SessionId, after: Duration },
    DisarmTimeout,
    /// Stop capture (first time) and post the buffered audio for recognition.
    SubmitAudio { session: SessionId },
    /// Re-post the same audio after the backoff delay.
    ScheduleRetry { session: SessionId, after: Duration },
    /// Deliver recognised tokens to the target field.
    AppendTokens(Vec<String>),
    /// Show a user-facing notice.
    Notify(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Listening,
    Transcribing,
}

/// Tunables, lifted out so tests can shrink them.
#[derive(Debug, Clone, Copy)]
pub struct Params {
    pub listen_timeout: Duration,
    pub network_retries: u32,
    pub retry_backoff: Duration,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            listen_timeout: Duration::from_secs(15),
            network_retries: 2,
            retry_backoff: Duration::from_secs(1),
        }
    }
}

#[derive(Debug)]
pub struct VoiceMachine {
    params: Params,
    phase: Phase,
    session: SessionId,
    retries_left: u32,
}

impl VoiceMachine {
    pub fn new(params: Params) -> Self {
        Self {
            params,
            phase: Phase::Idle,
            session: 0,
            retries_left: 0,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn session(&self) -> SessionId {
        self.session
    }

    pub fn is_active(&self) -> bool {
        self.phase != Phase::Idle
    }

    pub fn step(&mut self, event: Event) -> Vec<Effect> {
        match event {
            Event::StartPressed { online } => self.on_start(online),
            Event::StopPressed => self.on_stop(),
            Event::Cancel => self.abort_quietly(),
            Event::TimeoutFired { session } => {
                if session != self.session {
                    return Vec::new();
                }
                self.on_timeout()
            }
            Event::TranscriptReady { session, text } => {
                if session != self.session {
                    return Vec::new();
                }
                self.on_transcript(&text)
            }
            Event::TranscribeFailed { session, class } => {
                if session != self.session {
                    return Vec::new();
                }
                self.on_failed(class)
            }
            Event::RetryDelayElapsed { session } => {
                if session != self.session {
                    return Vec::new();
                }
                self.on_retry_elapsed()
            }
        }
    }

    fn on_start(&mut self, online: bool) -> Vec<Effect> {
        let mut effects = Vec::new();
        // Core invariant: at most one active session. Whatever is running
        // dies before anything new begins.
        if self.phase != Phase::Idle {
            effects.push(Effect::DisarmTimeout);
            effects.push(Effect::AbortCapture);
        }
        // Bump unconditionally so stragglers from any prior session are stale.
        self.session += 1;
        if !online {
            self.phase = Phase::Idle;
            effects.push(Effect::Notify(
                "You appear to be offline. Voice input needs a network connection.".into(),
            ));
            return effects;
        }
        self.phase = Phase::Listening;
        self.retries_left = self.params.network_retries;
        effects.push(Effect::StartCapture {
            session: self.session,
        });
        effects.push(Effect::ArmTimeout {
            session: self.session,
            after: self.params.listen_timeout,
        });
        effects
    }

    fn on_stop(&mut self) -> Vec<Effect> {
        match self.phase {
            Phase::Listening => {
                // Finalise the utterance: the timer must not outlive listening.
                self.phase = Phase::Transcribing;
                vec![
                    Effect::DisarmTimeout,
                    Effect::SubmitAudio {
                        session: self.session,
                    },
                ]
            }
            // Stopping mid-recognition abandons the attempt quietly.
            Phase::Transcribing => self.abort_quietly(),
            Phase::Idle => Vec::new(),
        }
    }

    fn abort_quietly(&mut self) -> Vec<Effect> {
        self.phase = Phase::Idle;
        self.session += 1;
        vec![Effect::DisarmTimeout, Effect::AbortCapture]
    }

    fn on_timeout(&mut self) -> Vec<Effect> {
        if self.phase != Phase::Listening {
            return Vec::new();
        }
        self.phase = Phase::Idle;
        self.session += 1;
        vec![
            Effect::AbortCapture,
            Effect::Notify("Listening timed out. Try again.".into()),
        ]
    }

    fn on_transcript(&mut self, text: &str) -> Vec<Effect> {
        if self.phase != Phase::Transcribing {
            return Vec::new();
        }
        self.phase = Phase::Idle;
        self.session += 1;
        let tokens = split_transcript(text);
        // The submitted audio must not survive into the next session.
        let mut effects = vec![Effect::AbortCapture];
        if tokens.is_empty() {
            effects.push(Effect::Notify(ErrorClass::NoSpeech.message().into()));
        } else {
            effects.push(Effect::AppendTokens(tokens));
        }
        effects
    }

    fn on_failed(&mut self, class: ErrorClass) -> Vec<Effect> {
        if self.phase == Phase::Idle {
            return Vec::new();
        }
        if self.phase == Phase::Transcribing
            && class == ErrorClass::Network
            && self.retries_left > 0
        {
            self.retries_left -= 1;
            return vec![Effect::ScheduleRetry {
                session: self.session,
                after: self.params.retry_backoff,
            }];
        }
        // Terminal failure: exactly one notice, regardless of how many
        // attempts went before it.
        let was_listening = self.phase == Phase::Listening;
        self.phase = Phase::Idle;
        self.session += 1;
        let mut effects = Vec::new();
        if was_listening {
            // Capture never came up or died mid-listen.
            effects.push(Effect::DisarmTimeout);
        }
        // Release the captured audio on every terminal failure, including
        // retry exhaustion while transcribing.
        effects.push(Effect::AbortCapture);
        effects.push(Effect::Notify(class.message().into()));
        effects
    }

    fn on_retry_elapsed(&mut self) -> Vec<Effect> {
        if self.phase != Phase::Transcribing {
            return Vec::new();
        }
        vec![Effect::SubmitAudio {
            session: self.session,
        }]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn machine() -> VoiceMachine {
        VoiceMachine::new(Params::default())
    }

    fn notices(effects: &[Effect]) -> Vec<&str> {
        effects
            .iter()
            .filter_map(|e| match e {
                Effect::Notify(msg) => Some(msg.as_str()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn start_opens_capture_and_arms_timeout() {
        let mut m = machine();
        let effects = m.step(Event::StartPressed { online: true });
        let session = m.session();
        assert_eq!(m.phase(), Phase::Listening);
        assert!(effects.contains(&Effect::StartCapture { session }));
        assert!(effects
            .iter()
            .any(|e| matches!(e, Effect::ArmTimeout { session: s, .. } if *s == session)));
    }

    #[test]
    fn offline_start_is_rejected_before_capture() {
        let mut m = machine();
        let effects = m.step(Event::StartPressed { online: false });
        assert_eq!(m.phase(), Phase::Idle);
        assert!(!effects
            .iter()
            .any(|e| matches!(e, Effect::StartCapture { .. })));
        assert_eq!(notices(&effects).len(), 1);
    }

    #[test]
    fn restart_aborts_the_active_session_first() {
        let mut m = machine();
        m.step(Event::StartPressed { online: true });
        let first = m.session();
        let effects = m.step(Event::StartPressed { online: true });
        assert_ne!(m.session(), first);
        // Old capture and timer are torn down before the new capture starts.
        let abort_at = effects
            .iter()
            .position(|e| *e == Effect::AbortCapture)
            .expect("abort");
        let start_at = effects
            .iter()
            .position(|e| matches!(e, Effect::StartCapture { .. }))
            .expect("start");
        assert!(abort_at < start_at);
        assert!(effects.contains(&Effect::DisarmTimeout));
    }

    #[test]
    fn stale_timeout_after_restart_is_ignored() {
        let mut m = machine();
        m.step(Event::StartPressed { online: true });
        let old = m.session();
        m.step(Event::StartPressed { online: true });
        // The first session's timer fires late: nothing may happen.
        assert!(m.step(Event::TimeoutFired { session: old }).is_empty());
        assert_eq!(m.phase(), Phase::Listening);
    }

    #[test]
    fn timeout_while_listening_notifies_and_goes_idle() {
        let mut m = machine();
        m.step(Event::StartPressed { online: true });
        let session = m.session();
        let effects = m.step(Event::TimeoutFired { session });
        assert_eq!(m.phase(), Phase::Idle);
        assert!(effects.contains(&Effect::AbortCapture));
        assert_eq!(notices(&effects).len(), 1);
    }

    #[test]
    fn stop_submits_audio_and_emits_no_notice() {
        let mut m = machine();
        m.step(Event::StartPressed { online: true });
        let session = m.session();
        let effects = m.step(Event::StopPressed);
        assert_eq!(m.phase(), Phase::Transcribing);
        assert!(effects.contains(&Effect::DisarmTimeout));
        assert!(effects.contains(&Effect::SubmitAudio { session }));
        assert!(notices(&effects).is_empty());
    }

    #[test]
    fn cancel_is_always_silent() {
        let mut m = machine();
        m.step(Event::StartPressed { online: true });
        assert!(notices(&m.step(Event::Cancel)).is_empty());
        // Cancelling while idle is harmless too.
        assert!(notices(&m.step(Event::Cancel)).is_empty());
    }

    #[test]
    fn transcript_appends_split_tokens() {
        let mut m = machine();
        m.step(Event::StartPressed { online: true });
        let session = m.session();
        m.step(Event::StopPressed);
        let effects = m.step(Event::TranscriptReady {
            session,
            text: "eggs,  flour ,, milk".into(),
        });
        assert_eq!(m.phase(), Phase::Idle);
        assert!(effects.contains(&Effect::AppendTokens(vec![
            "eggs".into(),
            "flour".into(),
            "milk".into()
        ])));
    }

    #[test]
    fn empty_transcript_counts_as_no_speech() {
        let mut m = machine();
        m.step(Event::StartPressed { online: true });
        let session = m.session();
        m.step(Event::StopPressed);
        let effects = m.step(Event::TranscriptReady {
            session,
            text: " ; ".into(),
        });
        assert_eq!(notices(&effects), vec![ErrorClass::NoSpeech.message()]);
    }

    #[test]
    fn network_failures_retry_then_surface_one_notice() {
        let mut m = machine();
        m.step(Event::StartPressed { online: true });
        let session = m.session();
        m.step(Event::StopPressed);

        let mut total_notices = 0;
        // First attempt fails, two retries are granted.
        for _ in 0..2 {
            let effects = m.step(Event::TranscribeFailed {
                session,
                class: ErrorClass::Network,
            });
            total_notices += notices(&effects).len();
            assert!(effects
                .iter()
                .any(|e| matches!(e, Effect::ScheduleRetry { session: s, .. } if *s == session)));
            let effects = m.step(Event::RetryDelayElapsed { session });
            assert!(effects.contains(&Effect::SubmitAudio { session }));
        }
        // Third failure exhausts the budget.
        let effects = m.step(Event::TranscribeFailed {
            session,
            class: ErrorClass::Network,
        });
        total_notices += notices(&effects).len();
        assert_eq!(m.phase(), Phase::Idle);
        assert_eq!(total_notices, 1);
    }

    #[test]
    fn non_network_failure_surfaces_immediately() {
        let mut m = machine();
        m.step(Event::StartPressed { online: true });
        let session = m.session();
        m.step(Event::StopPressed);
        let effects = m.step(Event::TranscribeFailed {
            session,
            class: ErrorClass::ServiceBlocked,
        });
        assert_eq!(m.phase(), Phase::Idle);
        assert_eq!(notices(&effects), vec![ErrorClass::ServiceBlocked.message()]);
    }

    #[test]
    fn capture_failure_while_listening_tears_down_timer() {
        let mut m = machine();
        m.step(Event::StartPressed { online: true });
        let session = m.session();
        let effects = m.step(Event::TranscribeFailed {
            session,
            class: ErrorClass::NoMicrophone,
        });
        assert_eq!(m.phase(), Phase::Idle);
        assert!(effects.contains(&Effect::DisarmTimeout));
        assert_eq!(notices(&effects), vec![ErrorClass::NoMicrophone.message()]);
    }

    #[test]
    fn stop_during_transcription_abandons_quietly() {
        let mut m = machine();
        m.step(Event::StartPressed { online: true });
        let session = m.session();
        m.step(Event::StopPressed);
        let effects = m.step(Event::StopPressed);
        assert_eq!(m.phase(), Phase::Idle);
        assert!(notices(&effects).is_empty());
        // A transcript from the abandoned attempt lands on a stale session.
        assert!(m
            .step(Event::TranscriptReady {
                session,
                text: "eggs".into()
            })
            .is_empty());
    }

    #[test]
    fn terminal_outcomes_release_the_captured_audio() {
        // Success releases it.
        let mut m = machine();
        m.step(Event::StartPressed { online: true });
        let session = m.session();
        m.step(Event::StopPressed);
        let effects = m.step(Event::TranscriptReady {
            session,
            text: "eggs".into(),
        });
        assert!(effects.contains(&Effect::AbortCapture));

        // Retry exhaustion while transcribing releases it too.
        let mut m = machine();
        m.step(Event::StartPressed { online: true });
        let session = m.session();
        m.step(Event::StopPressed);
        for _ in 0..2 {
            m.step(Event::TranscribeFailed {
                session,
                class: ErrorClass::Network,
            });
            m.step(Event::RetryDelayElapsed { session });
        }
        let effects = m.step(Event::TranscribeFailed {
            session,
            class: ErrorClass::Network,
        });
        assert!(effects.contains(&Effect::AbortCapture));
    }

    #[test]
    fn next_session_submits_its_own_audio() {
        let mut m = machine();
        m.step(Event::StartPressed { online: true });
        let first = m.session();
        m.step(Event::StopPressed);
        // The first dictation completes; its audio must be dropped before
        // anything else is submitted.
        let released = m
            .step(Event::TranscriptReady {
                session: first,
                text: "eggs".into(),
            })
            .contains(&Effect::AbortCapture);
        assert!(released);

        m.step(Event::StartPressed { online: true });
        let second = m.session();
        assert_ne!(second, first);
        let effects = m.step(Event::StopPressed);
        assert!(effects.contains(&Effect::SubmitAudio { session: second }));
    }

    #[test]
    fn stale_transcript_after_restart_is_dropped() {
        let mut m = machine();
        m.step(Event::StartPressed { online: true });
        let old = m.session();
        m.step(Event::StopPressed);
        m.step(Event::StartPressed { online: true });
        assert!(m
            .step(Event::TranscriptReady {
                session: old,
                text: "stale".into()
            })
            .is_empty());
        assert_eq!(m.phase(), Phase::Listening);
    }
}
