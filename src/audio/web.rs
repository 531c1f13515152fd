//! Web Audio backend
//!
//! Effects are synthesized with oscillators and noise buffers, voice lines
//! play through `<audio>` elements. Every JS failure is discarded.

use wasm_bindgen_futures::{JsFuture, spawn_local};
use web_sys::{AudioContext, GainNode, HtmlAudioElement, OscillatorNode, OscillatorType};

use super::{AudioPort, Layer, SoundEffect, VoiceLine, Waveform};

/// Clip volume for voice lines
const VOICE_VOLUME: f64 = 0.8;

pub struct WebAudio {
    ctx: Option<AudioContext>,
    voices: Vec<(VoiceLine, HtmlAudioElement)>,
    master_volume: f32,
    muted: bool,
}

impl Default for WebAudio {
    fn default() -> Self {
        Self::new()
    }
}

impl WebAudio {
    pub fn new() -> Self {
        // May fail outside a secure context
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - sound effects disabled");
        }

        let voices = VoiceLine::ALL
            .iter()
            .filter_map(|line| {
                let clip = HtmlAudioElement::new_with_src(&line.asset_path()).ok()?;
                clip.set_preload("auto");
                clip.set_volume(VOICE_VOLUME);
                Some((*line, clip))
            })
            .collect::<Vec<_>>();
        if voices.len() < VoiceLine::ALL.len() {
            log::warn!("{} voice clips unavailable", VoiceLine::ALL.len() - voices.len());
        }

        Self {
            ctx,
            voices,
            master_volume: 0.8,
            muted: false,
        }
    }

    fn clip(&self, line: VoiceLine) -> Option<&HtmlAudioElement> {
        self.voices
            .iter()
            .find(|(l, _)| *l == line)
            .map(|(_, clip)| clip)
    }

    /// Create an oscillator routed through its own gain node
    fn create_osc(
        &self,
        ctx: &AudioContext,
        freq: f32,
        osc_type: OscillatorType,
    ) -> Option<(OscillatorNode, GainNode)> {
        let osc = ctx.create_oscillator().ok()?;
        let gain = ctx.create_gain().ok()?;

        osc.set_type(osc_type);
        osc.frequency().set_value(freq);
        osc.connect_with_audio_node(&gain).ok()?;
        gain.connect_with_audio_node(&ctx.destination()).ok()?;

        Some((osc, gain))
    }

    fn play_tone(
        &self,
        ctx: &AudioContext,
        freq: f32,
        volume: f32,
        wave: Waveform,
        duration: f32,
        delay: f32,
    ) {
        let osc_type = match wave {
            Waveform::Sine => OscillatorType::Sine,
            Waveform::Square => OscillatorType::Square,
            Waveform::Sawtooth => OscillatorType::Sawtooth,
        };
        let Some((osc, gain)) = self.create_osc(ctx, freq, osc_type) else {
            return;
        };
        let t = ctx.current_time() + delay as f64;
        let duration = duration as f64;

        gain.gain().set_value_at_time(0.0, t).ok();
        gain.gain()
            .linear_ramp_to_value_at_time(volume * self.master_volume, t + 0.01)
            .ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.001, t + duration)
            .ok();

        osc.start_with_when(t).ok();
        osc.stop_with_when(t + duration + 0.1).ok();
    }

    /// White noise burst with a quadratic fade-out baked into the buffer
    fn play_noise(&self, ctx: &AudioContext, volume: f32, duration: f32) -> Option<()> {
        let rate = ctx.sample_rate();
        let len = ((rate * duration) as u32).max(1);
        let buffer = ctx.create_buffer(1, len, rate).ok()?;

        let mut samples: Vec<f32> = (0..len)
            .map(|i| {
                let fade = 1.0 - i as f32 / len as f32;
                (js_sys::Math::random() as f32 * 2.0 - 1.0) * fade * fade
            })
            .collect();
        buffer.copy_to_channel(&mut samples, 0).ok()?;

        let source = ctx.create_buffer_source().ok()?;
        source.set_buffer(Some(&buffer));
        let gain = ctx.create_gain().ok()?;
        gain.gain().set_value(volume * self.master_volume);
        source.connect_with_audio_node(&gain).ok()?;
        gain.connect_with_audio_node(&ctx.destination()).ok()?;
        source.start().ok()
    }
}

impl AudioPort for WebAudio {
    fn unlock(&mut self) {
        if let Some(ctx) = &self.ctx {
            let _ = ctx.resume();
        }

        // Play-then-pause every clip inside the gesture so later calls are allowed
        for (_, clip) in &self.voices {
            let Ok(promise) = clip.play() else {
                continue;
            };
            let clip = clip.clone();
            spawn_local(async move {
                if JsFuture::from(promise).await.is_ok() {
                    let _ = clip.pause();
                    clip.set_current_time(0.0);
                }
            });
        }
    }

    fn play_sound(&mut self, sound: SoundEffect) {
        if self.muted {
            return;
        }
        let Some(ctx) = &self.ctx else { return };

        // Resume context if suspended (browsers require user gesture)
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        for layer in sound.recipe() {
            match *layer {
                Layer::Tone {
                    freq,
                    volume,
                    wave,
                    duration,
                    delay,
                } => self.play_tone(ctx, freq, volume, wave, duration, delay),
                Layer::Noise { volume, duration } => {
                    let _ = self.play_noise(ctx, volume, duration);
                }
            }
        }
    }

    fn play_voice(&mut self, line: VoiceLine) {
        if self.muted {
            return;
        }
        let Some(clip) = self.clip(line) else { return };
        clip.set_current_time(0.0);
        if let Ok(promise) = clip.play() {
            // Await so a blocked autoplay rejection is handled, not reported
            spawn_local(async move {
                let _ = JsFuture::from(promise).await;
            });
        }
    }

    fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
        for (_, clip) in &self.voices {
            clip.set_muted(muted);
        }
    }
}
