//! Presentation Sinks
//!
//! `RecordingSink` keeps every notification as a [`Notice`]; `TracingSink`
//! writes them to the log.

use tracing::{debug, info};

use crate::game::collaborators::PresentationSink;
use crate::game::events::{Audience, Countdown, Cue, Notice};
use crate::game::state::PlayerId;
use crate::game::summary::GameSummary;

/// Sink that records notifications in order.
#[derive(Clone, Debug, Default)]
pub struct RecordingSink {
    notices: Vec<Notice>,
}

impl RecordingSink {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything recorded so far.
    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    /// Take recorded notices (consumes them).
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    /// Recorded broadcast lines.
    pub fn broadcasts(&self) -> Vec<&str> {
        self.notices
            .iter()
            .filter_map(|notice| match notice {
                Notice::Broadcast(text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Recorded cues of a given kind.
    pub fn cues(&self, kind: Cue) -> Vec<&Audience> {
        self.notices
            .iter()
            .filter_map(|notice| match notice {
                Notice::Cue { audience, cue } if *cue == kind => Some(audience),
                _ => None,
            })
            .collect()
    }
}

impl PresentationSink for RecordingSink {
    fn update_countdown(&mut self, countdown: &Countdown) {
        self.notices.push(Notice::Countdown(countdown.clone()));
    }

    fn clear_countdown(&mut self) {
        self.notices.push(Notice::CountdownCleared);
    }

    fn broadcast(&mut self, text: &str) {
        self.notices.push(Notice::Broadcast(text.to_string()));
    }

    fn message(&mut self, player: &PlayerId, text: &str) {
        self.notices.push(Notice::Message {
            player: player.clone(),
            text: text.to_string(),
        });
    }

    fn play_cue(&mut self, audience: &Audience, cue: Cue) {
        self.notices.push(Notice::Cue {
            audience: audience.clone(),
            cue,
        });
    }

    fn show_summary(&mut self, summary: &GameSummary) {
        self.notices.push(Notice::Summary(summary.clone()));
    }
}

/// Sink that logs notifications.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

impl PresentationSink for TracingSink {
    fn update_countdown(&mut self, countdown: &Countdown) {
        // Only whole-ten seconds and the final stretch, or the log floods
        if countdown.seconds_left % 10 == 0 || countdown.seconds_left <= 5 {
            info!("[timer] {} ({:?})", countdown.title(), countdown.band);
        }
    }

    fn clear_countdown(&mut self) {}

    fn broadcast(&mut self, text: &str) {
        info!("[chat] {}", text);
    }

    fn message(&mut self, player: &PlayerId, text: &str) {
        info!("[chat -> {}] {}", player, text);
    }

    fn play_cue(&mut self, audience: &Audience, cue: Cue) {
        debug!(
            "[sound] {:?} for {:?} (pitches {:?}, volume {})",
            cue,
            audience,
            cue.pitches(),
            cue.volume()
        );
    }

    fn show_summary(&mut self, summary: &GameSummary) {
        for line in summary.render().lines() {
            info!("[summary] {}", line.trim());
        }
    }
}
