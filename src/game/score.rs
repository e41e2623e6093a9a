use super::food::FoodKind;

/// Accumulates points and signals high-score records.
///
/// The tracked high score is live: it follows the current episode as soon
/// as the stored record is beaten, but the record event itself is reported
/// only once per episode.
#[derive(Debug, Clone)]
pub struct ScoreTracker {
    high_score: u32,
    record_reported: bool,
}

impl ScoreTracker {
    /// Create a tracker seeded with the persisted high score
    pub fn new(high_score: u32) -> Self {
        Self {
            high_score,
            record_reported: false,
        }
    }

    /// Clear the per-episode record flag
    pub fn start_episode(&mut self) {
        self.record_reported = false;
    }

    /// Score after consuming a food of the given kind
    pub fn on_food_consumed(&self, score: u32, kind: FoodKind) -> u32 {
        score + kind.points()
    }

    /// Track a new score against the high score. Returns true exactly
    /// once per episode, on the tick the record is first beaten.
    pub fn check_high_score(&mut self, score: u32) -> bool {
        if score <= self.high_score {
            return false;
        }
        self.high_score = score;
        if self.record_reported {
            false
        } else {
            self.record_reported = true;
            true
        }
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    /// Whether the current episode has beaten the stored record
    pub fn record_this_episode(&self) -> bool {
        self.record_reported
    }
}
