//! Game Events
//!
//! Everything the engine tells the presentation layer: countdown updates,
//! chat lines, audio cues and the end-of-game summary.
//! The engine decides what and when; sinks decide how.

use serde::{Deserialize, Serialize};

use crate::game::state::PlayerId;
use crate::game::summary::GameSummary;

// =============================================================================
// AUDIENCE
// =============================================================================

/// Who a notification is meant for.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Audience {
    /// A single player
    Player(PlayerId),
    /// Everyone online
    Everyone,
    /// Everyone currently on a team
    Participants,
}

// =============================================================================
// AUDIO CUES
// =============================================================================

/// Audio cue identifiers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cue {
    /// Two-note chime marking 60/30/10 seconds left
    Ping,
    /// Clock tick during the last ten seconds
    ClockTick,
    /// First tone of the "found" pair
    FoundLow,
    /// Second tone of the "found" pair
    FoundHigh,
    /// First tone of the "not found" pair
    MissedHigh,
    /// Second tone of the "not found" pair
    MissedLow,
    /// Low step of the break countdown
    CountdownLow,
    /// Final step of the break countdown
    CountdownHigh,
}

impl Cue {
    /// Playback pitches for the cue (several notes play together).
    pub fn pitches(self) -> &'static [f32] {
        match self {
            Cue::Ping => &[0.5, 1.0],
            Cue::ClockTick => &[1.2],
            Cue::FoundLow => &[1.189_207],
            Cue::FoundHigh => &[1.781_797],
            Cue::MissedHigh => &[1.781_797],
            Cue::MissedLow => &[1.059_463],
            Cue::CountdownLow => &[0.629_961],
            Cue::CountdownHigh => &[1.259_921],
        }
    }

    /// Playback volume.
    pub fn volume(self) -> f32 {
        match self {
            Cue::ClockTick => 0.5,
            _ => 1.0,
        }
    }
}

/// A cue to play, possibly later.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CueRequest {
    /// Who hears it
    pub audience: Audience,
    /// What to play
    pub cue: Cue,
    /// Scheduler ticks to wait before playing (0 = now)
    pub delay_ticks: u32,
}

impl CueRequest {
    /// Cue that plays immediately.
    pub fn now(audience: Audience, cue: Cue) -> Self {
        Self { audience, cue, delay_ticks: 0 }
    }

    /// Cue that plays after `delay_ticks`.
    pub fn after(audience: Audience, cue: Cue, delay_ticks: u32) -> Self {
        Self { audience, cue, delay_ticks }
    }
}

// =============================================================================
// COUNTDOWN
// =============================================================================

/// Which timer a countdown update belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CountdownPhase {
    /// Search phase
    Round,
    /// Intermission
    Break,
}

/// Colour band of the countdown display.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimerBand {
    /// At least 75% of the round left
    Fresh,
    /// 50-75% left
    Fine,
    /// 30-50% left
    Caution,
    /// 20-30% left
    Warning,
    /// 10-20% left
    Danger,
    /// Under 10% left
    Critical,
    /// Break between rounds
    Intermission,
}

impl TimerBand {
    /// Band for a round progress value in [0, 1].
    pub fn for_round(progress: f64) -> Self {
        if progress < 0.1 {
            TimerBand::Critical
        } else if progress < 0.2 {
            TimerBand::Danger
        } else if progress < 0.3 {
            TimerBand::Warning
        } else if progress < 0.5 {
            TimerBand::Caution
        } else if progress < 0.75 {
            TimerBand::Fine
        } else {
            TimerBand::Fresh
        }
    }
}

/// One countdown refresh.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Countdown {
    /// Round or break
    pub phase: CountdownPhase,
    /// Fraction of the phase left, in [0, 1]
    pub progress: f64,
    /// Whole seconds left
    pub seconds_left: u32,
    /// Display band
    pub band: TimerBand,
}

impl Countdown {
    /// Build a countdown update for `seconds_left` out of `total`.
    pub fn new(phase: CountdownPhase, seconds_left: u32, total: u32) -> Self {
        let progress = if total == 0 {
            0.0
        } else {
            (seconds_left as f64 / total as f64).clamp(0.0, 1.0)
        };
        let band = match phase {
            CountdownPhase::Round => TimerBand::for_round(progress),
            CountdownPhase::Break => TimerBand::Intermission,
        };
        Self { phase, progress, seconds_left, band }
    }

    /// Title line shown above the bar.
    pub fn title(&self) -> String {
        match self.phase {
            CountdownPhase::Round => format!("Time left: {}s", self.seconds_left),
            CountdownPhase::Break => format!("New target in: {}s", self.seconds_left),
        }
    }
}

// =============================================================================
// NOTICE
// =============================================================================

/// A recorded notification, as delivered to a sink.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Notice {
    /// Countdown refresh
    Countdown(Countdown),
    /// Countdown display removed
    CountdownCleared,
    /// Chat line to everyone online
    Broadcast(String),
    /// Chat line to one player
    Message {
        /// Recipient
        player: PlayerId,
        /// Message text
        text: String,
    },
    /// Audio cue
    Cue {
        /// Who hears it
        audience: Audience,
        /// Which cue
        cue: Cue,
    },
    /// Final standings
    Summary(GameSummary),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cue_pitch_pairs() {
        // Found rises, missed falls, the break countdown ends high
        assert!(Cue::FoundHigh.pitches()[0] > Cue::FoundLow.pitches()[0]);
        assert!(Cue::MissedLow.pitches()[0] < Cue::MissedHigh.pitches()[0]);
        assert!(Cue::CountdownHigh.pitches()[0] > Cue::CountdownLow.pitches()[0]);
        assert_eq!(Cue::Ping.pitches().len(), 2);

        assert_eq!(Cue::ClockTick.volume(), 0.5);
        assert_eq!(Cue::Ping.volume(), 1.0);
    }

    #[test]
    fn test_timer_bands() {
        assert_eq!(TimerBand::for_round(1.0), TimerBand::Fresh);
        assert_eq!(TimerBand::for_round(0.75), TimerBand::Fresh);
        assert_eq!(TimerBand::for_round(0.6), TimerBand::Fine);
        assert_eq!(TimerBand::for_round(0.4), TimerBand::Caution);
        assert_eq!(TimerBand::for_round(0.25), TimerBand::Warning);
        assert_eq!(TimerBand::for_round(0.15), TimerBand::Danger);
        assert_eq!(TimerBand::for_round(0.0), TimerBand::Critical);
    }

    #[test]
    fn test_countdown_progress() {
        let countdown = Countdown::new(CountdownPhase::Round, 15, 30);
        assert_eq!(countdown.progress, 0.5);
        assert_eq!(countdown.band, TimerBand::Fine);
        assert_eq!(countdown.title(), "Time left: 15s");

        let countdown = Countdown::new(CountdownPhase::Break, 3, 10);
        assert_eq!(countdown.band, TimerBand::Intermission);
        assert_eq!(countdown.title(), "New target in: 3s");
    }

    #[test]
    fn test_notice_serializes() {
        let notice = Notice::Cue { audience: Audience::Everyone, cue: Cue::Ping };
        let json = serde_json::to_string(&notice).unwrap();
        let back: Notice = serde_json::from_str(&json).unwrap();
        assert_eq!(back, notice);
    }
}
