//! Frame-driven engine facade
//!
//! The host owns one `Engine`, feeds it input and animation-frame
//! timestamps, and listens for phase/stats callbacks. Everything the
//! simulation emits during a frame is routed from here: sound and voice cues
//! to the audio dispatcher, phase changes to the host.

use glam::Vec2;

use crate::audio::{AudioDispatcher, AudioPort};
use crate::config::{GameConfig, Settings};
use crate::consts::GLITCH_DURATION;
use crate::host::FrameClock;
use crate::sim::{GameEvent, GamePhase, GameState, GameStats, Player, TickInput, tick};

/// Host callback fired once per phase transition
pub type PhaseCallback = Box<dyn FnMut(GamePhase)>;
/// Host callback fired every frame that ran combat
pub type StatsCallback = Box<dyn FnMut(&GameStats)>;

/// Logical keys the game reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Left,
    Right,
    Up,
    Down,
    Bomb,
}

impl Key {
    /// Map a DOM `KeyboardEvent.key` value (arrows, WASD, space)
    pub fn from_browser(key: &str) -> Option<Self> {
        match key {
            "ArrowLeft" | "a" | "A" => Some(Key::Left),
            "ArrowRight" | "d" | "D" => Some(Key::Right),
            "ArrowUp" | "w" | "W" => Some(Key::Up),
            "ArrowDown" | "s" | "S" => Some(Key::Down),
            " " | "Spacebar" => Some(Key::Bomb),
            _ => None,
        }
    }
}

pub struct Engine {
    state: GameState,
    audio: AudioDispatcher,
    input: TickInput,
    clock: FrameClock,
    settings: Settings,
    on_phase: Option<PhaseCallback>,
    on_stats: Option<StatsCallback>,
}

impl Engine {
    /// Build a match in the glitch intro; `config` is sanitized first
    pub fn new(config: GameConfig, port: Box<dyn AudioPort>, seed: u64) -> Self {
        if let Err(e) = config.validate() {
            log::warn!("Config rejected ({}), clamping to safe values", e);
        }
        let mut engine = Self {
            state: GameState::new(config, seed),
            audio: AudioDispatcher::new(port, seed.wrapping_add(1)),
            input: TickInput::default(),
            clock: FrameClock::new(),
            settings: Settings::default(),
            on_phase: None,
            on_stats: None,
        };
        engine.apply_settings(Settings::default());
        log::info!("Engine ready (seed {})", seed);
        engine
    }

    pub fn on_phase_change(&mut self, callback: impl FnMut(GamePhase) + 'static) {
        self.on_phase = Some(Box::new(callback));
    }

    pub fn on_stats(&mut self, callback: impl FnMut(&GameStats) + 'static) {
        self.on_stats = Some(Box::new(callback));
    }

    /// Push quality, shake and mute preferences into the running match
    pub fn apply_settings(&mut self, settings: Settings) {
        self.state.particles.set_capacity(settings.max_particles());
        self.state.effects.intensity = settings.effect_intensity();
        if settings.muted != self.audio.is_muted() {
            self.audio.set_muted(settings.muted);
        }
        self.settings = settings;
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Throw the match away and start over from the glitch intro
    ///
    /// Same seed, same match: calling this twice in a row is the same as
    /// calling it once.
    pub fn reset(&mut self) {
        let seed = self.state.seed;
        self.restart(seed);
    }

    /// Start over with a different seed
    pub fn restart(&mut self, seed: u64) {
        let config = self.state.config.clone();
        self.state = GameState::new(config, seed);
        self.input = TickInput::default();
        self.clock.reset();
        self.apply_settings(self.settings.clone());
        log::info!("Match reset (seed {})", seed);
        if let Some(on_phase) = self.on_phase.as_mut() {
            on_phase(self.state.phase);
        }
    }

    pub fn skip_glitch(&mut self) {
        self.state.skip_glitch();
    }

    pub fn pause(&mut self) -> bool {
        let paused = self.state.pause();
        self.flush_events();
        paused
    }

    pub fn resume(&mut self) -> bool {
        let resumed = self.state.resume();
        // No catch-up frame for the time spent paused
        self.clock.reset();
        self.flush_events();
        resumed
    }

    pub fn toggle_pause(&mut self) -> bool {
        if self.state.phase == GamePhase::Paused {
            self.resume()
        } else {
            self.pause()
        }
    }

    pub fn set_autopilot(&mut self, on: bool) {
        self.input.autopilot = on;
    }

    pub fn autopilot(&self) -> bool {
        self.input.autopilot
    }

    pub fn key_down(&mut self, key: Key) {
        // First gesture unlocks audio
        self.audio.unlock();
        self.set_key(key, true);
    }

    pub fn key_up(&mut self, key: Key) {
        self.set_key(key, false);
    }

    fn set_key(&mut self, key: Key, down: bool) {
        match key {
            Key::Left => self.input.left = down,
            Key::Right => self.input.right = down,
            Key::Up => self.input.up = down,
            Key::Down => self.input.down = down,
            Key::Bomb => self.input.bomb = down,
        }
    }

    /// Steer toward a playfield point (mouse drag / touch)
    pub fn pointer(&mut self, x: f32, y: f32) {
        self.audio.unlock();
        if x.is_finite() && y.is_finite() {
            self.input.pointer = Some(Vec2::new(x, y));
        }
    }

    pub fn release_pointer(&mut self) {
        self.input.pointer = None;
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.state.resize(width, height);
    }

    /// Run one animation frame stamped `now_ms`, returning the delta used
    pub fn frame(&mut self, now_ms: f64) -> f32 {
        let dt = self.clock.delta(now_ms);
        self.step(dt);
        dt
    }

    /// Advance by `dt` seconds and route everything the tick produced
    ///
    /// Stats go out before phase callbacks, so a match that ends this frame
    /// reports its final numbers before the host hears about the ending.
    pub fn step(&mut self, dt: f32) {
        let was_combat = self.state.phase.is_combat();
        tick(&mut self.state, &self.input, dt);
        self.audio.update(dt);

        if was_combat || self.state.phase.is_combat() {
            if let Some(on_stats) = self.on_stats.as_mut() {
                on_stats(&self.state.stats);
            }
        }
        self.flush_events();

        // Clear one-shot inputs after processing
        self.input.pause = false;
        self.input.skip_glitch = false;
    }

    fn flush_events(&mut self) {
        for event in self.state.drain_events() {
            if let (GameEvent::PhaseChanged(phase), Some(on_phase)) = (event, self.on_phase.as_mut()) {
                on_phase(phase);
            }
            self.audio.dispatch(&event);
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn stats(&self) -> &GameStats {
        &self.state.stats
    }

    pub fn player(&self) -> &Player {
        &self.state.player
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn audio(&self) -> &AudioDispatcher {
        &self.audio
    }

    /// 0..=1 through the glitch intro
    pub fn glitch_progress(&self) -> f32 {
        (self.state.glitch_elapsed / GLITCH_DURATION).clamp(0.0, 1.0)
    }
}
