pub mod core;
pub mod embedding;
pub mod engine;
pub mod flavor;
pub mod host;
pub mod ws;

pub use self::core::{Catalog, GamePolicy, GameSession, MatchParams, MatchResult, Outcome, PlayerRecord};
pub use self::core::messages;
pub use embedding::{Embedder, HttpEmbedder, TrigramEmbedder};
pub use engine::{GameRegistry, spawn_idle_sweeper};
pub use flavor::{ChatRewriter, FlavorService, Rewriter};
pub use host::GameHost;
