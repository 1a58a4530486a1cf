//! Short audio cues marking the edges of a listening session.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use std::f32::consts::PI;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Which cue to play.
#[derive(Debug, Clone, Copy)]
pub enum Cue {
    /// Listening started: ascending 600→900 Hz chirp.
    ListenStart,
    /// Listening ended: descending 900→600 Hz chirp.
    ListenStop,
}

/// Play a cue. Spawns a thread and returns immediately; failures only log.
pub fn play_cue(cue: Cue) {
    std::thread::spawn(move || {
        if let Err(e) = play_blocking(cue) {
            log::warn!("Audio cue failed: {e}");
        }
    });
}

fn play_blocking(cue: Cue) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or("No output device found")?;
    let config = device.default_output_config()?;
    let sample_rate = config.sample_rate() as f32;
    let channels = config.channels() as usize;

    let (freq_start, freq_end) = match cue {
        Cue::ListenStart => (600.0_f32, 900.0_f32),
        Cue::ListenStop => (900.0_f32, 600.0_f32),
    };

    let samples = Arc::new(render_chirp(sample_rate, freq_start, freq_end));
    let total = samples.len();
    let position = Arc::new(AtomicUsize::new(0));

    let samples_cb = samples.clone();
    let position_cb = position.clone();
    let stream = device.build_output_stream(
        &config.into(),
        move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
            let mut idx = position_cb.load(Ordering::Relaxed);
            for frame in data.chunks_mut(channels) {
                let value = if idx < total { samples_cb[idx] } else { 0.0 };
                for sample in frame.iter_mut() {
                    *sample = value;
                }
                idx += 1;
            }
            position_cb.store(idx, Ordering::Relaxed);
        },
        |err| log::error!("Audio output error: {err}"),
        None,
    )?;

    stream.play()?;
    // Let the short chirp drain before tearing the stream down.
    std::thread::sleep(std::time::Duration::from_millis(200));
    drop(stream);
    Ok(())
}

fn render_chirp(sample_rate: f32, freq_start: f32, freq_end: f32) -> Vec<f32> {
    let duration_secs = 0.15_f32;
    let total = (sample_rate * duration_secs) as usize;
    let mut samples = Vec::with_capacity(total);
    for i in 0..total {
        let t = i as f32 / sample_rate;
        let progress = i as f32 / total as f32;
        let freq = freq_start + (freq_end - freq_start) * progress;
        let envelope = 1.0 - progress;
        samples.push((2.0 * PI * freq * t).sin() * envelope * 0.3);
    }
    samples
}
