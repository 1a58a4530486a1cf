//! Microphone capture for voice input. One utterance is buffered as ~16kHz
//! mono f32 samples; dropping the returned stream stops the capture.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use std::sync::{Arc, Mutex};

pub type CaptureError = Box<dyn std::error::Error>;

const TARGET_RATE: u32 = 16000;

/// Open the default input device and append samples into `buffer` until the
/// returned `Stream` is dropped. Returns the effective sample rate.
pub fn start_capture(
    buffer: Arc<Mutex<Vec<f32>>>,
) -> Result<(cpal::Stream, u32), CaptureError> {
    let host = cpal::default_host();
    let device = host
        .default_input_device()
        .ok_or("No input device found")?;

    log::info!("Input device: {:?}", device.description());

    let (config, effective_rate, decimation) = pick_config(&device)?;
    let channels = config.channels as usize;

    let stream = device.build_input_stream(
        &config,
        move |data: &[f32], _: &cpal::InputCallbackInfo| {
            let mut buf = buffer.lock().unwrap();
            for (i, frame) in data.chunks(channels).enumerate() {
                if i % decimation == 0 {
                    let mono = frame.iter().sum::<f32>() / channels as f32;
                    buf.push(mono);
                }
            }
        },
        |err| log::error!("Input stream error: {err}"),
        None,
    )?;

    stream.play()?;
    Ok((stream, effective_rate))
}

/// Prefer a native 16kHz mono f32 config; otherwise take the default config
/// and decimate down to roughly 16kHz.
fn pick_config(
    device: &cpal::Device,
) -> Result<(cpal::StreamConfig, u32, usize), CaptureError> {
    let supported: Vec<_> = device.supported_input_configs()?.collect();
    let native = supported.iter().find(|c| {
        c.channels() == 1
            && c.min_sample_rate() <= TARGET_RATE
            && c.max_sample_rate() >= TARGET_RATE
            && c.sample_format() == cpal::SampleFormat::F32
    });

    if let Some(cfg) = native {
        return Ok((cfg.with_sample_rate(TARGET_RATE).config(), TARGET_RATE, 1));
    }

    let default_config = device.default_input_config()?;
    let rate = default_config.sample_rate();
    let decimation = (rate / TARGET_RATE).max(1) as usize;
    let effective = rate / decimation as u32;
    log::info!("Using native rate {rate}Hz, decimating by {decimation}x to ~{effective}Hz");
    Ok((default_config.config(), effective, decimation))
}

/// Microphone permission probe: open a capture stream and close it again
/// right away. Run once at startup.
pub fn probe_microphone() -> Result<(), CaptureError> {
    let scratch = Arc::new(Mutex::new(Vec::new()));
    let (stream, _rate) = start_capture(scratch)?;
    drop(stream);
    Ok(())
}

/// Encode captured samples as mono 16-bit PCM WAV for upload.
pub fn samples_to_wav(samples: &[f32], sample_rate: u32) -> Result<Vec<u8>, CaptureError> {
    let mut cursor = std::io::Cursor::new(Vec::new());
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::new(&mut cursor, spec)?;
    for &s in samples {
        let clamped = s.clamp(-1.0, 1.0);
        writer.write_sample((clamped * i16::MAX as f32) as i16)?;
    }
    writer.finalize()?;
    Ok(cursor.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wav_encoding_produces_a_riff_header() {
        let samples = vec![0.0_f32, 0.5, -0.5, 1.5, -1.5];
        let wav = samples_to_wav(&samples, 16000).unwrap();
        assert_eq!(&wav[0..4], b"RIFF");
        assert_eq!(&wav[8..12], b"WAVE");
        // 44-byte header plus two bytes per sample.
        assert_eq!(wav.len(), 44 + samples.len() * 2);
    }
}
