//! Score reporting seam
//!
//! The engine hands a frozen [`RunResult`] to its game-over observer; what
//! happens to it afterwards (leaderboard write, network submission) is the
//! collaborator's business. Sink failures are logged and never re-enter the
//! engine.

use serde::{Deserialize, Serialize};

use crate::consts::REWARD_SCORE_THRESHOLD;

/// Final statistics of a finished run, frozen at the collision tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RunResult {
    pub score: u64,
    pub distance: f32,
    pub time: f32,
    pub speed: f32,
}

impl RunResult {
    /// Whether this run clears the reward threshold
    pub fn reward_eligible(&self) -> bool {
        self.score >= REWARD_SCORE_THRESHOLD
    }
}

/// Destination for finished runs. Implementations must be fire-and-forget:
/// a failed submission is their problem to log, not the engine's.
pub trait ScoreSink {
    fn submit(&mut self, result: &RunResult);
}

/// Sink that only logs the result. Default for native builds and tests.
#[derive(Debug, Default)]
pub struct LogSink;

impl ScoreSink for LogSink {
    fn submit(&mut self, result: &RunResult) {
        log::info!(
            "run finished: score {} distance {:.0} time {:.1}s speed {:.1}{}",
            result.score,
            result.distance,
            result.time,
            result.speed,
            if result.reward_eligible() {
                " (reward eligible)"
            } else {
                ""
            }
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reward_threshold() {
        let mut result = RunResult {
            score: 9_999,
            distance: 999.9,
            time: 60.0,
            speed: 6.2,
        };
        assert!(!result.reward_eligible());
        result.score = 10_000;
        assert!(result.reward_eligible());
    }

    #[test]
    fn test_result_serializes_round_trip() {
        let result = RunResult {
            score: 1234,
            distance: 123.4,
            time: 9.9,
            speed: 5.2,
        };
        let json = serde_json::to_string(&result).unwrap();
        let back: RunResult = serde_json::from_str(&json).unwrap();
        assert_eq!(result, back);
    }
}
