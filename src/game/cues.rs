//! Audio Cue Policy
//!
//! Pure functions from timer state to cue requests. Muting is applied by
//! the caller so these stay easy to test.

use crate::game::events::{Audience, Cue, CueRequest};
use crate::game::state::PlayerId;
use crate::TICKS_PER_SECOND;

/// Spacing between ping pulses (ticks).
pub const PULSE_SPACING_TICKS: u32 = 4;

/// Delay of the second "found" tone (ticks).
pub const FOUND_SECOND_TONE_TICKS: u32 = 4;

/// Delay of the second "not found" tone (ticks).
pub const MISSED_SECOND_TONE_TICKS: u32 = 3;

/// Cues for a round tick. Only called for `seconds_left < 61`.
///
/// 60s: one pulse (rounds longer than 120s), 30s: two pulses (longer than
/// 60s), 10s: three pulses (longer than 30s), below 10s: a clock tick every
/// second (longer than 30s).
pub fn round_cues(seconds_left: u32, round_length: u32) -> Vec<CueRequest> {
    let pulses = match seconds_left {
        60 if round_length > 120 => 1,
        30 if round_length > 60 => 2,
        10 if round_length > 30 => 3,
        s if s < 10 && round_length > 30 => {
            return vec![CueRequest::now(Audience::Everyone, Cue::ClockTick)];
        }
        _ => 0,
    };

    (0..pulses)
        .map(|i| CueRequest::after(Audience::Everyone, Cue::Ping, i * PULSE_SPACING_TICKS))
        .collect()
}

/// Cues for a break tick: low, low, high one second apart when one
/// second is left.
pub fn break_cues(seconds_left: u32) -> Vec<CueRequest> {
    if seconds_left != 1 {
        return Vec::new();
    }

    vec![
        CueRequest::now(Audience::Participants, Cue::CountdownLow),
        CueRequest::after(Audience::Participants, Cue::CountdownLow, TICKS_PER_SECOND),
        CueRequest::after(Audience::Participants, Cue::CountdownHigh, 2 * TICKS_PER_SECOND),
    ]
}

/// Rising pair for a find, falling pair for a miss.
pub fn discovery_cues(player: &PlayerId, found: bool) -> Vec<CueRequest> {
    let audience = Audience::Player(player.clone());
    if found {
        vec![
            CueRequest::now(audience.clone(), Cue::FoundLow),
            CueRequest::after(audience, Cue::FoundHigh, FOUND_SECOND_TONE_TICKS),
        ]
    } else {
        vec![
            CueRequest::now(audience.clone(), Cue::MissedHigh),
            CueRequest::after(audience, Cue::MissedLow, MISSED_SECOND_TONE_TICKS),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pings(requests: &[CueRequest]) -> Vec<u32> {
        requests
            .iter()
            .filter(|r| r.cue == Cue::Ping)
            .map(|r| r.delay_ticks)
            .collect()
    }

    #[test]
    fn test_long_round_pings() {
        assert_eq!(pings(&round_cues(60, 300)), vec![0]);
        assert_eq!(pings(&round_cues(30, 300)), vec![0, 4]);
        assert_eq!(pings(&round_cues(10, 300)), vec![0, 4, 8]);
        assert!(round_cues(45, 300).is_empty());
    }

    #[test]
    fn test_short_rounds_skip_pings() {
        assert!(round_cues(60, 120).is_empty());
        assert!(round_cues(30, 60).is_empty());
        assert!(round_cues(10, 30).is_empty());
        assert!(round_cues(5, 30).is_empty());

        // 90 second round still gets the 30 and 10 second pings
        assert_eq!(pings(&round_cues(30, 90)), vec![0, 4]);
        assert!(round_cues(60, 90).is_empty());
    }

    #[test]
    fn test_clock_ticks_in_last_ten_seconds() {
        for s in 0..10 {
            let cues = round_cues(s, 31);
            assert_eq!(cues, vec![CueRequest::now(Audience::Everyone, Cue::ClockTick)]);
        }
    }

    #[test]
    fn test_break_countdown() {
        assert!(break_cues(2).is_empty());
        assert!(break_cues(0).is_empty());

        let cues = break_cues(1);
        let steps: Vec<_> = cues.iter().map(|r| (r.cue, r.delay_ticks)).collect();
        assert_eq!(
            steps,
            vec![
                (Cue::CountdownLow, 0),
                (Cue::CountdownLow, TICKS_PER_SECOND),
                (Cue::CountdownHigh, 2 * TICKS_PER_SECOND),
            ]
        );
    }

    #[test]
    fn test_discovery_pairs() {
        let alice = PlayerId::new("alice");

        let found = discovery_cues(&alice, true);
        assert_eq!(found[0].cue, Cue::FoundLow);
        assert_eq!(found[1].cue, Cue::FoundHigh);
        assert_eq!(found[1].delay_ticks, FOUND_SECOND_TONE_TICKS);

        let missed = discovery_cues(&alice, false);
        assert_eq!(missed[0].cue, Cue::MissedHigh);
        assert_eq!(missed[1].cue, Cue::MissedLow);
        assert_eq!(missed[1].delay_ticks, MISSED_SECOND_TONE_TICKS);
        assert_eq!(missed[0].audience, Audience::Player(alice));
    }
}
