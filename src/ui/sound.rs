/// Sound engine: procedural 8-bit style sound effects via rodio.
///
/// All sounds are generated as in-memory WAV buffers at init time.
/// Playback is fire-and-forget (non-blocking) via rodio's Sink.
///
/// Build without the "sound" feature to disable audio entirely
/// (the stub SoundEngine does nothing).

use crate::sim::event::GameEvent;

#[cfg(feature = "sound")]
mod inner {
    use std::f32::consts::PI;
    use std::io::Cursor;
    use std::sync::Arc;

    use rodio::{OutputStream, OutputStreamHandle, Sink};

    pub(super) const SAMPLE_RATE: u32 = 22050;

    pub struct SoundEngine {
        _stream: OutputStream,
        handle: OutputStreamHandle,
        sfx_jump: Arc<Vec<u8>>,
        sfx_land: Arc<Vec<u8>>,
        sfx_bump: Arc<Vec<u8>>,
        sfx_restart: Arc<Vec<u8>>,
    }

    impl SoundEngine {
        pub fn new() -> Option<Self> {
            let (stream, handle) = match OutputStream::try_default() {
                Ok(pair) => pair,
                Err(e) => {
                    tracing::warn!("no audio output: {e}");
                    return None;
                }
            };

            Some(SoundEngine {
                _stream: stream,
                handle,
                sfx_jump: Arc::new(make_wav(&gen_jump())),
                sfx_land: Arc::new(make_wav(&gen_land())),
                sfx_bump: Arc::new(make_wav(&gen_bump())),
                sfx_restart: Arc::new(make_wav(&gen_restart())),
            })
        }

        fn play(&self, buf: &Arc<Vec<u8>>) {
            if let Ok(sink) = Sink::try_new(&self.handle) {
                let cursor = Cursor::new(buf.as_ref().clone());
                if let Ok(src) = rodio::Decoder::new(cursor) {
                    sink.append(src);
                    sink.detach();
                }
            }
        }

        pub fn play_jump(&self) { self.play(&self.sfx_jump); }
        pub fn play_land(&self) { self.play(&self.sfx_land); }
        pub fn play_bump(&self) { self.play(&self.sfx_bump); }
        pub fn play_restart(&self) { self.play(&self.sfx_restart); }
    }

    // ════════════════════════════════════════════════════════════
    //  Waveform generators: mono f32 samples
    // ════════════════════════════════════════════════════════════

    /// Frequency sweep from `f0` to `f1` with a fading envelope.
    pub(super) fn sweep(f0: f32, f1: f32, duration: f32, volume: f32) -> Vec<f32> {
        let n = (SAMPLE_RATE as f32 * duration) as usize;
        let mut phase = 0.0_f32;
        (0..n)
            .map(|i| {
                let t = i as f32 / n as f32;
                let freq = f0 + (f1 - f0) * t;
                phase += freq * 2.0 * PI / SAMPLE_RATE as f32;
                // Sine + 3rd harmonic for a square-ish retro tone
                let wave = phase.sin() * 0.7 + (phase * 3.0).sin() * 0.3;
                wave * (1.0 - t).powf(0.6) * volume
            })
            .collect()
    }

    /// Jump: quick upward chirp
    fn gen_jump() -> Vec<f32> {
        sweep(300.0, 900.0, 0.09, 0.25)
    }

    /// Land: short low thud with a little noise
    fn gen_land() -> Vec<f32> {
        let mut samples = sweep(180.0, 90.0, 0.06, 0.3);
        let mut rng: u32 = 12345;
        let n = samples.len();
        for (i, s) in samples.iter_mut().enumerate() {
            rng = rng.wrapping_mul(1103515245).wrapping_add(12345);
            let noise = (rng as f32 / u32::MAX as f32) * 2.0 - 1.0;
            *s += noise * 0.1 * (1.0 - i as f32 / n as f32);
        }
        samples
    }

    /// Head bump: two fast descending blips
    fn gen_bump() -> Vec<f32> {
        let mut samples = sweep(700.0, 500.0, 0.04, 0.2);
        samples.extend(sweep(500.0, 300.0, 0.04, 0.2));
        samples
    }

    /// Restart: ascending arpeggio C5→E5→G5
    fn gen_restart() -> Vec<f32> {
        [523.0_f32, 659.0, 784.0]
            .iter()
            .flat_map(|&f| sweep(f, f, 0.07, 0.25))
            .collect()
    }

    // ════════════════════════════════════════════════════════════
    //  WAV encoder: wraps f32 samples into a 16-bit PCM WAV buffer
    // ════════════════════════════════════════════════════════════

    pub(super) fn make_wav(samples: &[f32]) -> Vec<u8> {
        let num_channels: u16 = 1;
        let bits_per_sample: u16 = 16;
        let byte_rate = SAMPLE_RATE * (num_channels as u32) * (bits_per_sample as u32) / 8;
        let block_align = num_channels * bits_per_sample / 8;
        let data_size = samples.len() as u32 * 2;
        let file_size = 36 + data_size;

        let mut buf = Vec::with_capacity(44 + data_size as usize);

        buf.extend_from_slice(b"RIFF");
        buf.extend_from_slice(&file_size.to_le_bytes());
        buf.extend_from_slice(b"WAVE");

        buf.extend_from_slice(b"fmt ");
        buf.extend_from_slice(&16u32.to_le_bytes());
        buf.extend_from_slice(&1u16.to_le_bytes()); // PCM
        buf.extend_from_slice(&num_channels.to_le_bytes());
        buf.extend_from_slice(&SAMPLE_RATE.to_le_bytes());
        buf.extend_from_slice(&byte_rate.to_le_bytes());
        buf.extend_from_slice(&block_align.to_le_bytes());
        buf.extend_from_slice(&bits_per_sample.to_le_bytes());

        buf.extend_from_slice(b"data");
        buf.extend_from_slice(&data_size.to_le_bytes());

        for &s in samples {
            let val = (s.clamp(-1.0, 1.0) * 32767.0) as i16;
            buf.extend_from_slice(&val.to_le_bytes());
        }

        buf
    }
}

// ════════════════════════════════════════════════════════════
//  Public API: no-ops when the sound feature is off
// ════════════════════════════════════════════════════════════

#[cfg(feature = "sound")]
pub use inner::SoundEngine;

#[cfg(not(feature = "sound"))]
pub struct SoundEngine;

#[cfg(not(feature = "sound"))]
impl SoundEngine {
    pub fn new() -> Option<Self> { Some(SoundEngine) }
    pub fn play_jump(&self) {}
    pub fn play_land(&self) {}
    pub fn play_bump(&self) {}
    pub fn play_restart(&self) {}
}

impl SoundEngine {
    /// Play the cue for each event that has one.
    pub fn play_events(&self, events: &[GameEvent]) {
        for ev in events {
            match ev {
                GameEvent::Jumped { .. } => self.play_jump(),
                GameEvent::Landed { .. } => self.play_land(),
                GameEvent::HitCeiling => self.play_bump(),
                GameEvent::LevelRestarted => self.play_restart(),
                GameEvent::FloorClamped
                | GameEvent::PanStarted { .. }
                | GameEvent::PanStopped => {}
            }
        }
    }
}

#[cfg(all(test, feature = "sound"))]
mod tests {
    use super::inner::{make_wav, sweep, SAMPLE_RATE};

    #[test]
    fn wav_header_matches_payload() {
        let samples = sweep(440.0, 440.0, 0.01, 0.5);
        let wav = make_wav(&samples);
        assert_eq!(&wav[0..4], b"RIFF");
        assert_eq!(&wav[8..12], b"WAVE");
        assert_eq!(wav.len(), 44 + samples.len() * 2);
        let rate = u32::from_le_bytes([wav[24], wav[25], wav[26], wav[27]]);
        assert_eq!(rate, SAMPLE_RATE);
    }

    #[test]
    fn sweep_stays_in_range() {
        let samples = sweep(200.0, 2000.0, 0.05, 1.0);
        assert!(!samples.is_empty());
        assert!(samples.iter().all(|s| s.abs() <= 1.0));
    }
}
