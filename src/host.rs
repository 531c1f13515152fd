//! Frame clock and session tickets
//!
//! The browser hands us `requestAnimationFrame` timestamps in milliseconds.
//! `FrameClock` turns them into clamped deltas; `Sessions` lets a frame
//! callback notice that the game it was scheduled for has been quit.

use crate::consts::{MAX_FRAME_DT, REFERENCE_FPS};

/// Converts animation-frame timestamps into simulation deltas
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    last_ms: Option<f64>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seconds since the previous frame, clamped to `MAX_FRAME_DT`
    ///
    /// The first frame (and any frame after `reset`) reports one reference
    /// frame. Timestamps going backwards report zero.
    pub fn delta(&mut self, now_ms: f64) -> f32 {
        let dt = match self.last_ms {
            Some(last) if now_ms.is_finite() => ((now_ms - last) / 1000.0) as f32,
            Some(_) => 0.0,
            None => 1.0 / REFERENCE_FPS,
        };
        if now_ms.is_finite() {
            self.last_ms = Some(now_ms);
        }
        dt.clamp(0.0, MAX_FRAME_DT)
    }

    /// Forget the last timestamp (after a pause or restart)
    pub fn reset(&mut self) {
        self.last_ms = None;
    }
}

/// Proof that a frame loop belongs to a particular run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionTicket(u64);

/// Generation counter for game runs
///
/// Every `start` invalidates the tickets handed out before it, and `quit`
/// invalidates the current one. A scheduled frame that holds a stale
/// ticket must not touch the game.
#[derive(Debug, Clone, Default)]
pub struct Sessions {
    generation: u64,
    running: bool,
}

impl Sessions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self) -> SessionTicket {
        self.generation += 1;
        self.running = true;
        log::debug!("Session {} started", self.generation);
        SessionTicket(self.generation)
    }

    pub fn quit(&mut self) {
        if self.running {
            log::debug!("Session {} quit", self.generation);
        }
        self.running = false;
        self.generation += 1;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_current(&self, ticket: SessionTicket) -> bool {
        self.running && ticket.0 == self.generation
    }
}
