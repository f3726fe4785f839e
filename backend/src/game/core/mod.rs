pub mod catalog;
pub mod hints;
pub mod matcher;
pub mod messages;
pub mod outcome;
mod player;
pub mod session;

pub use catalog::Catalog;
pub use matcher::{MatchParams, MatchResult, match_guess};
pub use outcome::Outcome;
pub use player::PlayerRecord;
pub use session::{GamePolicy, GameSession};
