//! Match lifecycle
//!
//! `Glitch -> Wave -> Boss -> {Victory | Defeat}`, with `Wave -> Defeat` for an
//! early death and a `Paused` excursion from either combat phase.

use serde::{Deserialize, Serialize};

use crate::consts::{GLITCH_SCRAMBLE_END, GLITCH_WARNING_END};

/// Current phase of the match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GamePhase {
    /// Scripted intro, no input
    Glitch,
    /// Timed enemy wave
    Wave,
    /// Boss fight
    Boss,
    /// Frozen combat phase
    Paused,
    /// Boss defeated (terminal)
    Victory,
    /// Player defeated (terminal)
    Defeat,
}

impl GamePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            GamePhase::Glitch => "glitch",
            GamePhase::Wave => "wave",
            GamePhase::Boss => "boss",
            GamePhase::Paused => "paused",
            GamePhase::Victory => "victory",
            GamePhase::Defeat => "defeat",
        }
    }

    /// Player-controlled phases
    pub fn is_combat(&self) -> bool {
        matches!(self, GamePhase::Wave | GamePhase::Boss)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, GamePhase::Victory | GamePhase::Defeat)
    }

    /// Whether `self -> to` is a legal edge
    ///
    /// Resuming from `Paused` is legal to either combat phase here; the state
    /// additionally checks it matches the phase that was interrupted.
    pub fn can_transition(self, to: GamePhase) -> bool {
        use GamePhase::*;
        matches!(
            (self, to),
            (Glitch, Wave)
                | (Wave, Boss)
                | (Wave, Defeat)
                | (Boss, Victory)
                | (Boss, Defeat)
                | (Wave, Paused)
                | (Boss, Paused)
                | (Paused, Wave)
                | (Paused, Boss)
        )
    }
}

/// Presentation stage of the intro, derived from elapsed glitch time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlitchStage {
    /// Random symbol noise
    Scramble,
    /// Flashing warning banner
    Warning,
    /// Boss catchphrase
    Reveal,
}

impl GlitchStage {
    pub fn at(elapsed: f32) -> Self {
        if elapsed < GLITCH_SCRAMBLE_END {
            GlitchStage::Scramble
        } else if elapsed < GLITCH_WARNING_END {
            GlitchStage::Warning
        } else {
            GlitchStage::Reveal
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [GamePhase; 6] = [
        GamePhase::Glitch,
        GamePhase::Wave,
        GamePhase::Boss,
        GamePhase::Paused,
        GamePhase::Victory,
        GamePhase::Defeat,
    ];

    #[test]
    fn test_forward_edges() {
        assert!(GamePhase::Glitch.can_transition(GamePhase::Wave));
        assert!(GamePhase::Wave.can_transition(GamePhase::Boss));
        assert!(GamePhase::Boss.can_transition(GamePhase::Victory));
        assert!(GamePhase::Boss.can_transition(GamePhase::Defeat));
        assert!(GamePhase::Wave.can_transition(GamePhase::Defeat));
    }

    #[test]
    fn test_no_skipping_or_going_back() {
        assert!(!GamePhase::Glitch.can_transition(GamePhase::Boss));
        assert!(!GamePhase::Wave.can_transition(GamePhase::Victory));
        assert!(!GamePhase::Boss.can_transition(GamePhase::Wave));
        assert!(!GamePhase::Glitch.can_transition(GamePhase::Paused));
    }

    #[test]
    fn test_terminal_phases_have_no_exits() {
        for to in ALL {
            assert!(!GamePhase::Victory.can_transition(to));
            assert!(!GamePhase::Defeat.can_transition(to));
        }
    }

    #[test]
    fn test_paused_only_from_combat() {
        for from in ALL {
            assert_eq!(from.can_transition(GamePhase::Paused), from.is_combat());
        }
        assert!(!GamePhase::Paused.can_transition(GamePhase::Victory));
    }

    #[test]
    fn test_glitch_stages() {
        assert_eq!(GlitchStage::at(0.0), GlitchStage::Scramble);
        assert_eq!(GlitchStage::at(2.99), GlitchStage::Scramble);
        assert_eq!(GlitchStage::at(3.0), GlitchStage::Warning);
        assert_eq!(GlitchStage::at(5.0), GlitchStage::Reveal);
        assert_eq!(GlitchStage::at(6.9), GlitchStage::Reveal);
    }

    #[test]
    fn test_serializes_as_lowercase_tag() {
        let json = serde_json::to_string(&GamePhase::Victory).unwrap();
        assert_eq!(json, "\"victory\"");
        assert_eq!(GamePhase::Boss.as_str(), "boss");
    }
}
