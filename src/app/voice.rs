//! GTK-side driver for the voice-input machine: owns the capture stream,
//! the timeout and retry timers, and the recognition request, and applies
//! the machine's effects to the dialogs.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use gtk4::glib;
use gtk4::prelude::*;

use crate::audio_feedback::{self, Cue};
use crate::form::TokenField;
use crate::voice::{self, Effect, ErrorClass, SessionId};

use super::state::{AppState, BackendEvent};

/// Which dialog a session delivers tokens to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogKind {
    Create,
    Edit,
    Generate,
}

/// Target of the active session: one field in one dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoiceTarget {
    pub dialog: DialogKind,
    pub field: TokenField,
}

/// Mic button handler. Pressing the button of the active target stops the
/// session; any other press (re)starts one aimed at the new target.
pub fn press_mic(state: &Rc<RefCell<AppState>>, target: VoiceTarget) {
    {
        let s = state.borrow();
        if let Some(reason) = s.voice_support.reason() {
            set_status_for(&s, target.dialog, &format!("Voice input unavailable: {reason}"));
            return;
        }
    }
    let active = state.borrow().voice.is_active();
    let same_target = state.borrow().voice_target == Some(target);
    if active && same_target {
        drive(state, voice::Event::StopPressed);
    } else {
        // Connectivity is checked before the capability is touched.
        let online = network_available();
        state.borrow_mut().voice_target = Some(target);
        drive(state, voice::Event::StartPressed { online });
    }
}

/// Silent abort: dialog closed or app shutting down. Safe to call in any
/// state.
pub fn cancel_voice(state: &Rc<RefCell<AppState>>) {
    drive(state, voice::Event::Cancel);
}

/// Feed one event through the machine and apply the resulting effects.
pub fn drive(state: &Rc<RefCell<AppState>>, event: voice::Event) {
    let effects = state.borrow_mut().voice.step(event);
    for effect in effects {
        apply(state, effect);
    }
}

fn network_available() -> bool {
    gtk4::gio::NetworkMonitor::default().is_network_available()
}

fn apply(state: &Rc<RefCell<AppState>>, effect: Effect) {
    match effect {
        Effect::AbortCapture => {
            let mut s = state.borrow_mut();
            s.capture_stream = None;
            s.utterance_wav = None;
            s.capture_buffer.lock().unwrap().clear();
            if let Some(source) = s.retry_source.take() {
                source.remove();
            }
        }
        Effect::StartCapture { session } => start_capture(state, session),
        Effect::ArmTimeout { session, after } => {
            let mut s = state.borrow_mut();
            if let Some(source) = s.timeout_source.take() {
                source.remove();
            }
            let state_clone = state.clone();
            s.timeout_source = Some(glib::timeout_add_local_once(after, move || {
                state_clone.borrow_mut().timeout_source = None;
                drive(&state_clone, voice::Event::TimeoutFired { session });
            }));
        }
        Effect::DisarmTimeout => {
            if let Some(source) = state.borrow_mut().timeout_source.take() {
                source.remove();
            }
        }
        Effect::SubmitAudio { session } => submit_audio(state, session),
        Effect::ScheduleRetry { session, after } => {
            let mut s = state.borrow_mut();
            if let Some(source) = s.retry_source.take() {
                source.remove();
            }
            let state_clone = state.clone();
            s.retry_source = Some(glib::timeout_add_local_once(after, move || {
                state_clone.borrow_mut().retry_source = None;
                drive(&state_clone, voice::Event::RetryDelayElapsed { session });
            }));
            drop(s);
            set_status(state, "Retrying…");
        }
        Effect::AppendTokens(tokens) => {
            append_tokens(state, tokens);
            set_status(state, "");
        }
        Effect::Notify(message) => {
            log::info!("Voice notice: {message}");
            set_status(state, &message);
        }
    }
}

fn start_capture(state: &Rc<RefCell<AppState>>, session: SessionId) {
    let buffer = {
        let s = state.borrow();
        s.capture_buffer.lock().unwrap().clear();
        s.capture_buffer.clone()
    };
    match crate::recorder::start_capture(buffer) {
        Ok((stream, rate)) => {
            audio_feedback::play_cue(Cue::ListenStart);
            {
                let mut s = state.borrow_mut();
                s.capture_stream = Some(stream);
                s.capture_rate = rate;
            }
            set_status(state, "Listening… press the mic again when done.");
        }
        Err(e) => {
            log::error!("Failed to open microphone: {e}");
            drive(
                state,
                voice::Event::TranscribeFailed {
                    session,
                    class: ErrorClass::NoMicrophone,
                },
            );
        }
    }
}

fn submit_audio(state: &Rc<RefCell<AppState>>, session: SessionId) {
    let cached = state.borrow().utterance_wav.clone();
    let wav = match cached {
        // Retry path: re-post exactly the bytes of the original request.
        Some(wav) => wav,
        None => {
            let (samples, rate) = {
                let mut s = state.borrow_mut();
                s.capture_stream = None;
                let samples = s.capture_buffer.lock().unwrap().clone();
                (samples, s.capture_rate)
            };
            audio_feedback::play_cue(Cue::ListenStop);
            match crate::recorder::samples_to_wav(&samples, rate) {
                Ok(bytes) => {
                    let wav = Arc::new(bytes);
                    state.borrow_mut().utterance_wav = Some(wav.clone());
                    wav
                }
                Err(e) => {
                    log::error!("WAV encode failed: {e}");
                    drive(
                        state,
                        voice::Event::TranscribeFailed {
                            session,
                            class: ErrorClass::Other,
                        },
                    );
                    return;
                }
            }
        }
    };

    set_status(state, "Transcribing…");

    let s = state.borrow();
    let client = s.speech_http.clone();
    let speech = s.config.speech.clone();
    let sender = s.backend_sender.clone();
    s.tokio_rt.spawn(async move {
        let event = match crate::speech::transcribe(&client, &speech, &wav).await {
            Ok(text) => voice::Event::TranscriptReady { session, text },
            Err(e) => {
                log::warn!("Recognition attempt failed: {e}");
                voice::Event::TranscribeFailed {
                    session,
                    class: e.class,
                }
            }
        };
        let _ = sender.send(BackendEvent::Voice(event)).await;
    });
}

fn append_tokens(state: &Rc<RefCell<AppState>>, tokens: Vec<String>) {
    let s = state.borrow();
    let (Some(ui), Some(target)) = (&s.ui, s.voice_target) else {
        return;
    };
    match target.dialog {
        DialogKind::Create => {
            ui.create.form.borrow_mut().append_tokens(target.field, tokens);
            crate::ui::recipe_form::refresh_all_chips(&ui.create);
        }
        DialogKind::Edit => {
            ui.edit.form.borrow_mut().append_tokens(target.field, tokens);
            crate::ui::recipe_form::refresh_all_chips(&ui.edit);
        }
        DialogKind::Generate => {
            ui.generate
                .form
                .borrow_mut()
                .append_tokens(TokenField::Ingredients, tokens);
            crate::ui::generate::refresh_chips(&ui.generate);
        }
    }
}

/// Put a message on the status line of the dialog the session targets.
fn set_status(state: &Rc<RefCell<AppState>>, text: &str) {
    let s = state.borrow();
    let Some(target) = s.voice_target else { return };
    set_status_for(&s, target.dialog, text);
}

fn set_status_for(s: &AppState, dialog: DialogKind, text: &str) {
    let Some(ui) = &s.ui else { return };
    let label = match dialog {
        DialogKind::Create => &ui.create.voice_status,
        DialogKind::Edit => &ui.edit.voice_status,
        DialogKind::Generate => &ui.generate.voice_status,
    };
    label.set_text(text);
}
