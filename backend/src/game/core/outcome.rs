use serde::{Deserialize, Serialize};

/// Result of one game action, ready to be rendered for the player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Outcome {
    Started {
        career_path: String,
        max_attempts: u32,
        hint_start_at: u32,
    },
    Won {
        matched_name: String,
    },
    Continue {
        remaining: u32,
        hint: Option<String>,
        /// Name of a near-miss worth pointing the player at
        very_close: Option<String>,
    },
    Lost {
        answer: String,
        hint: Option<String>,
        very_close: Option<String>,
    },
    Skipped {
        answer: String,
    },
    /// Skip without a running game
    NoActiveGame,
    /// Guess without a running game
    NoActiveSession,
    /// The guess could not be evaluated and was not counted
    MatchFailed {
        reason: String,
    },
}

impl Outcome {
    /// Won, Lost and Skipped end the session
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Outcome::Won { .. } | Outcome::Lost { .. } | Outcome::Skipped { .. }
        )
    }

    pub fn render(&self) -> String {
        match self {
            Outcome::Started {
                career_path,
                max_attempts,
                hint_start_at,
            } => format!(
                "🎯 Guess the football player from this transfer path:\n\n\
                 {career_path}\n\n\
                 You have {max_attempts} guesses.\n\
                 Hints start on wrong guess #{hint_start_at}.\nGood luck!"
            ),
            Outcome::Won { matched_name } => format!(
                "✅ Bravo! You guessed it right: {matched_name}\n\
                 Do you want to play again? Type /start"
            ),
            Outcome::Continue {
                remaining,
                hint,
                very_close,
            } => format!(
                "❌ Wrong guess.{}{}\nRemaining guesses: {remaining}",
                very_close_line(very_close),
                hint_line(hint)
            ),
            Outcome::Lost {
                answer,
                hint,
                very_close,
            } => format!(
                "❌ Wrong guess.{}{}\n\n\
                 Game over. The correct answer was: {answer}\n\
                 Do you want to play again? Type /start",
                very_close_line(very_close),
                hint_line(hint)
            ),
            Outcome::Skipped { answer } => format!(
                "⏭️ You skipped this player.\n\n\
                 The correct answer was: {answer}\n\n\
                 Type /start to play again!"
            ),
            Outcome::NoActiveGame => "No active game. Type /start to play.".to_string(),
            Outcome::NoActiveSession => "Type /start to begin a new game.".to_string(),
            Outcome::MatchFailed { .. } => {
                "Sorry, I couldn't check that guess right now. It didn't count, try again."
                    .to_string()
            }
        }
    }
}

fn very_close_line(very_close: &Option<String>) -> String {
    very_close
        .as_ref()
        .map(|name| format!("\n⚠️ Very close! Maybe you mean: {name}"))
        .unwrap_or_default()
}

fn hint_line(hint: &Option<String>) -> String {
    hint.as_ref()
        .map(|hint| format!("\nHint: {hint}"))
        .unwrap_or_default()
}
