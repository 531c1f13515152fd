//! Audio cue dispatch
//!
//! Sound effects are synthesized from small recipes (oscillator tones and
//! noise bursts); voice lines are pre-recorded clips. The simulation only
//! names cues. [`AudioDispatcher`] applies the voice cooldown and unlock
//! policy and forwards to an [`AudioPort`], which does the platform work and
//! must never fail outward.

#[cfg(target_arch = "wasm32")]
pub mod web;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::sim::GameEvent;

/// Shortest pause between two non-priority voice lines
pub const VOICE_COOLDOWN_MIN: f32 = 3.0;
/// Longest pause between two non-priority voice lines
pub const VOICE_COOLDOWN_MAX: f32 = 6.0;

/// Synthesized sound effects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundEffect {
    /// Player auto-fire
    Tick,
    Select,
    /// Bomb away / victory fanfare
    Launch,
    Navigate,
    /// Wave start
    Countdown,
    Hit,
    Explosion,
    Pickup,
    /// Player took damage
    Damage,
}

/// Oscillator shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Square,
    Sawtooth,
}

/// One layer of a synthesized effect; times in seconds
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Layer {
    /// Attack to `volume` over 10 ms, exponential release over `duration`
    Tone {
        freq: f32,
        volume: f32,
        wave: Waveform,
        duration: f32,
        delay: f32,
    },
    /// White noise with a quadratic fade
    Noise { volume: f32, duration: f32 },
}

const fn tone(freq: f32, volume: f32, wave: Waveform, duration: f32, delay: f32) -> Layer {
    Layer::Tone {
        freq,
        volume,
        wave,
        duration,
        delay,
    }
}

impl SoundEffect {
    pub const ALL: [SoundEffect; 9] = [
        SoundEffect::Tick,
        SoundEffect::Select,
        SoundEffect::Launch,
        SoundEffect::Navigate,
        SoundEffect::Countdown,
        SoundEffect::Hit,
        SoundEffect::Explosion,
        SoundEffect::Pickup,
        SoundEffect::Damage,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SoundEffect::Tick => "tick",
            SoundEffect::Select => "select",
            SoundEffect::Launch => "launch",
            SoundEffect::Navigate => "navigate",
            SoundEffect::Countdown => "countdown",
            SoundEffect::Hit => "hit",
            SoundEffect::Explosion => "explosion",
            SoundEffect::Pickup => "pickup",
            SoundEffect::Damage => "damage",
        }
    }

    /// Layers to synthesize, all scheduled relative to "now"
    pub fn recipe(&self) -> &'static [Layer] {
        use Waveform::*;
        match self {
            SoundEffect::Tick => const { &[tone(600.0, 0.03, Sine, 0.02, 0.0)] },
            SoundEffect::Select => const {
                &[
                    tone(523.0, 0.1, Sine, 0.08, 0.0),
                    tone(784.0, 0.15, Sine, 0.12, 0.08),
                ]
            },
            SoundEffect::Launch => const {
                &[
                    tone(262.0, 0.1, Sawtooth, 0.05, 0.0),
                    tone(330.0, 0.1, Sawtooth, 0.05, 0.05),
                    tone(392.0, 0.1, Sawtooth, 0.05, 0.1),
                    tone(523.0, 0.2, Sawtooth, 0.1, 0.15),
                    tone(659.0, 0.25, Sawtooth, 0.15, 0.2),
                ]
            },
            SoundEffect::Navigate => const {
                &[
                    tone(800.0, 0.05, Square, 0.03, 0.0),
                    tone(1000.0, 0.03, Square, 0.02, 0.02),
                ]
            },
            SoundEffect::Countdown => const { &[tone(440.0, 0.1, Square, 0.08, 0.0)] },
            SoundEffect::Hit => const {
                &[
                    Layer::Noise {
                        volume: 0.1,
                        duration: 0.05,
                    },
                    tone(200.0, 0.15, Sawtooth, 0.05, 0.0),
                ]
            },
            SoundEffect::Explosion => const {
                &[
                    Layer::Noise {
                        volume: 0.3,
                        duration: 0.2,
                    },
                    tone(80.0, 0.3, Sawtooth, 0.15, 0.0),
                    tone(60.0, 0.2, Sine, 0.2, 0.1),
                ]
            },
            SoundEffect::Pickup => const {
                &[
                    tone(880.0, 0.1, Sine, 0.05, 0.0),
                    tone(1100.0, 0.1, Sine, 0.05, 0.05),
                    tone(1320.0, 0.15, Sine, 0.08, 0.1),
                ]
            },
            SoundEffect::Damage => const {
                &[
                    Layer::Noise {
                        volume: 0.15,
                        duration: 0.08,
                    },
                    tone(150.0, 0.2, Sawtooth, 0.1, 0.0),
                ]
            },
        }
    }
}

/// Pre-recorded boss lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VoiceLine {
    Beware,
    Run,
    Escape,
    See,
    Ideas,
    Coward,
    Laugh,
}

impl VoiceLine {
    pub const ALL: [VoiceLine; 7] = [
        VoiceLine::Beware,
        VoiceLine::Run,
        VoiceLine::Escape,
        VoiceLine::See,
        VoiceLine::Ideas,
        VoiceLine::Coward,
        VoiceLine::Laugh,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            VoiceLine::Beware => "beware",
            VoiceLine::Run => "run",
            VoiceLine::Escape => "escape",
            VoiceLine::See => "see",
            VoiceLine::Ideas => "ideas",
            VoiceLine::Coward => "coward",
            VoiceLine::Laugh => "laugh",
        }
    }

    /// Clip URL on the host page
    pub fn asset_path(&self) -> String {
        format!("/audio/voice-{}.mp3", self.as_str())
    }
}

/// Which set of taunts to draw from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TauntPool {
    Wave,
    Boss,
}

impl TauntPool {
    pub fn lines(&self) -> &'static [VoiceLine] {
        match self {
            TauntPool::Wave => &[
                VoiceLine::Run,
                VoiceLine::Escape,
                VoiceLine::See,
                VoiceLine::Ideas,
                VoiceLine::Coward,
            ],
            TauntPool::Boss => &[
                VoiceLine::Coward,
                VoiceLine::Laugh,
                VoiceLine::Ideas,
                VoiceLine::Run,
                VoiceLine::Escape,
            ],
        }
    }
}

/// Platform audio backend
///
/// Implementations swallow every failure (missing clip, blocked autoplay,
/// no audio device); callers never see an error.
pub trait AudioPort {
    /// Prime every asset after a user gesture
    fn unlock(&mut self);
    fn play_sound(&mut self, sound: SoundEffect);
    fn play_voice(&mut self, line: VoiceLine);
    fn set_muted(&mut self, muted: bool);
}

/// Silent backend (native builds, tests, audio unavailable)
#[derive(Debug, Default, Clone, Copy)]
pub struct NullAudio;

impl AudioPort for NullAudio {
    fn unlock(&mut self) {}
    fn play_sound(&mut self, _sound: SoundEffect) {}
    fn play_voice(&mut self, _line: VoiceLine) {}
    fn set_muted(&mut self, _muted: bool) {}
}

/// Cue policy in front of a port
pub struct AudioDispatcher {
    port: Box<dyn AudioPort>,
    unlocked: bool,
    muted: bool,
    /// Seconds until a non-priority line may play
    voice_cooldown: f32,
    rng: Pcg32,
}

impl AudioDispatcher {
    pub fn new(port: Box<dyn AudioPort>, seed: u64) -> Self {
        Self {
            port,
            unlocked: false,
            muted: false,
            voice_cooldown: 0.0,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Forward the unlock to the port once; later calls are no-ops
    pub fn unlock(&mut self) {
        if self.unlocked {
            return;
        }
        self.unlocked = true;
        self.port.unlock();
        log::info!("Audio unlocked");
    }

    pub fn is_unlocked(&self) -> bool {
        self.unlocked
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
        self.port.set_muted(muted);
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn voice_cooldown(&self) -> f32 {
        self.voice_cooldown
    }

    /// Run the cooldown down by `dt` unscaled seconds
    pub fn update(&mut self, dt: f32) {
        if self.voice_cooldown > 0.0 {
            self.voice_cooldown = (self.voice_cooldown - dt).max(0.0);
        }
    }

    pub fn play_sound(&mut self, sound: SoundEffect) {
        if self.muted {
            return;
        }
        self.port.play_sound(sound);
    }

    /// Play a line unless the cooldown is running; priority lines always play
    pub fn play_voice(&mut self, line: VoiceLine, priority: bool) -> bool {
        if self.muted || (!priority && self.voice_cooldown > 0.0) {
            return false;
        }
        self.port.play_voice(line);
        self.voice_cooldown = self
            .rng
            .random_range(VOICE_COOLDOWN_MIN..=VOICE_COOLDOWN_MAX);
        log::debug!("Voice '{}' (next in {:.1}s)", line.as_str(), self.voice_cooldown);
        true
    }

    /// Play a random line from `pool` if the cooldown allows
    pub fn taunt(&mut self, pool: TauntPool) -> Option<VoiceLine> {
        if self.muted || self.voice_cooldown > 0.0 {
            return None;
        }
        let lines = pool.lines();
        let line = lines[self.rng.random_range(0..lines.len())];
        self.play_voice(line, false).then_some(line)
    }

    /// Route one simulation event
    pub fn dispatch(&mut self, event: &GameEvent) {
        match *event {
            GameEvent::Sound(sound) => self.play_sound(sound),
            GameEvent::Voice { line, priority } => {
                self.play_voice(line, priority);
            }
            GameEvent::Taunt(pool) => {
                self.taunt(pool);
            }
            GameEvent::PhaseChanged(_) => {}
        }
    }
}

/// Port that records what it was asked to play
#[cfg(test)]
#[derive(Debug, Default, Clone)]
pub struct RecordingAudio {
    pub log: std::rc::Rc<std::cell::RefCell<AudioLog>>,
}

#[cfg(test)]
#[derive(Debug, Default)]
pub struct AudioLog {
    pub unlocks: u32,
    pub sounds: Vec<SoundEffect>,
    pub voices: Vec<VoiceLine>,
    pub muted: bool,
}

#[cfg(test)]
impl AudioPort for RecordingAudio {
    fn unlock(&mut self) {
        self.log.borrow_mut().unlocks += 1;
    }
    fn play_sound(&mut self, sound: SoundEffect) {
        self.log.borrow_mut().sounds.push(sound);
    }
    fn play_voice(&mut self, line: VoiceLine) {
        self.log.borrow_mut().voices.push(line);
    }
    fn set_muted(&mut self, muted: bool) {
        self.log.borrow_mut().muted = muted;
    }
}
