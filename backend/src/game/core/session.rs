use super::hints::hint_for;
use super::matcher::{DEFAULT_MATCH_THRESHOLD, DEFAULT_TOP_K, MatchParams, MatchResult};
use super::outcome::Outcome;
use super::player::PlayerRecord;
use std::time::{Duration, Instant};
use uuid::Uuid;

pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;
pub const DEFAULT_HINT_START_AT: u32 = 3;
pub const DEFAULT_MAX_HINTS: u32 = 2;
pub const DEFAULT_VERY_CLOSE_THRESHOLD: f32 = 0.65;

/// Game rules shared by every session
#[derive(Debug, Clone, PartialEq)]
pub struct GamePolicy {
    pub max_attempts: u32,
    /// First attempt number that may carry a hint
    pub hint_start_at: u32,
    pub max_hints: u32,
    pub match_threshold: f32,
    /// Wrong guesses scoring above this get a "very close" nudge
    pub very_close_threshold: f32,
    pub top_k: usize,
}

impl Default for GamePolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            hint_start_at: DEFAULT_HINT_START_AT,
            max_hints: DEFAULT_MAX_HINTS,
            match_threshold: DEFAULT_MATCH_THRESHOLD,
            very_close_threshold: DEFAULT_VERY_CLOSE_THRESHOLD,
            top_k: DEFAULT_TOP_K,
        }
    }
}

impl GamePolicy {
    pub fn match_params(&self) -> MatchParams {
        MatchParams {
            threshold: self.match_threshold,
            top_k: self.top_k,
        }
    }
}

/// One player's round against a hidden target (pure logic, no I/O)
pub struct GameSession {
    id: Uuid,
    target: PlayerRecord,
    attempts: u32,
    hints_given: u32,
    last_active: Instant,
}

impl GameSession {
    pub fn new(target: PlayerRecord) -> Self {
        Self {
            id: Uuid::new_v4(),
            target,
            attempts: 0,
            hints_given: 0,
            last_active: Instant::now(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn target(&self) -> &PlayerRecord {
        &self.target
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn hints_given(&self) -> u32 {
        self.hints_given
    }

    pub fn touch(&mut self) {
        self.last_active = Instant::now();
    }

    pub fn idle_for(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.last_active)
    }

    /// Outcome announcing a freshly started round
    pub fn intro(&self, policy: &GamePolicy) -> Outcome {
        Outcome::Started {
            career_path: self.target.career_path.clone(),
            max_attempts: policy.max_attempts,
            hint_start_at: policy.hint_start_at,
        }
    }

    /// Count one evaluated guess and decide what happens next.
    /// A terminal outcome means the caller must drop this session.
    pub fn record_guess(&mut self, result: &MatchResult, policy: &GamePolicy) -> Outcome {
        self.attempts += 1;

        if result.correct {
            return Outcome::Won {
                matched_name: result.matched_name.clone(),
            };
        }

        let remaining = policy.max_attempts.saturating_sub(self.attempts);

        let mut hint = None;
        if self.attempts >= policy.hint_start_at && self.hints_given < policy.max_hints {
            hint = hint_for(&self.target, self.hints_given + 1);
            if hint.is_some() {
                self.hints_given += 1;
            }
        }

        let very_close =
            (result.score > policy.very_close_threshold).then(|| result.matched_name.clone());

        if self.attempts >= policy.max_attempts {
            return Outcome::Lost {
                answer: self.target.name.clone(),
                hint,
                very_close,
            };
        }

        Outcome::Continue {
            remaining,
            hint,
            very_close,
        }
    }

    /// Give up on the round, revealing the target
    pub fn skip(&self) -> Outcome {
        Outcome::Skipped {
            answer: self.target.name.clone(),
        }
    }
}
