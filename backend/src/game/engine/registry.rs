use crate::game::core::{Catalog, GamePolicy, GameSession, Outcome, match_guess};
use crate::game::embedding::Embedder;
use dashmap::DashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

type SessionHandle = Arc<Mutex<GameSession>>;

/// Owns every running session, keyed by player id, and exposes the three
/// game actions. Each action only ever locks its own player's session.
pub struct GameRegistry {
    catalog: Arc<Catalog>,
    embedder: Arc<dyn Embedder>,
    policy: GamePolicy,
    sessions: DashMap<String, SessionHandle>,
}

impl GameRegistry {
    pub fn new(catalog: Arc<Catalog>, embedder: Arc<dyn Embedder>, policy: GamePolicy) -> Self {
        Self {
            catalog,
            embedder,
            policy,
            sessions: DashMap::new(),
        }
    }

    pub fn active_sessions(&self) -> usize {
        self.sessions.len()
    }

    pub fn has_session(&self, player_id: &str) -> bool {
        self.sessions.contains_key(player_id)
    }

    /// Begin a new round, discarding any round already in progress
    pub fn start(&self, player_id: &str) -> Outcome {
        let session = GameSession::new(self.catalog.pick_random().clone());
        let intro = session.intro(&self.policy);

        info!(player_id, session_id = %session.id(), "Session started");
        debug!(session_id = %session.id(), answer = session.target().name, "Target picked");

        if self
            .sessions
            .insert(player_id.to_string(), Arc::new(Mutex::new(session)))
            .is_some()
        {
            debug!(player_id, "Replaced previous session");
        }

        intro
    }

    /// Abandon the current round and reveal the answer
    pub async fn skip(&self, player_id: &str) -> Outcome {
        let Some(handle) = self.current(player_id) else {
            debug!(player_id, "Skip without active game");
            return Outcome::NoActiveGame;
        };

        let session = handle.lock().await;
        if !self.is_current(player_id, &handle) {
            return Outcome::NoActiveGame;
        }

        self.remove_if_current(player_id, &handle);
        info!(player_id, session_id = %session.id(), "Session skipped");
        session.skip()
    }

    /// Evaluate one guess. Match failures are reported without counting the attempt.
    pub async fn guess(&self, player_id: &str, text: &str) -> Outcome {
        let Some(handle) = self.current(player_id) else {
            debug!(player_id, "Guess without active session");
            return Outcome::NoActiveSession;
        };

        let mut session = handle.lock().await;
        // Replaced or finished while we waited for the lock
        if !self.is_current(player_id, &handle) {
            return Outcome::NoActiveSession;
        }
        session.touch();

        let result = match match_guess(
            text,
            &session.target().name,
            &self.catalog,
            self.embedder.as_ref(),
            self.policy.match_params(),
        )
        .await
        {
            Ok(result) => result,
            Err(err) => {
                warn!(player_id, session_id = %session.id(), error = %err, "Guess could not be evaluated");
                return Outcome::MatchFailed {
                    reason: err.to_string(),
                };
            }
        };

        // A restart may have replaced this round while the embedder was busy
        if !self.is_current(player_id, &handle) {
            debug!(player_id, session_id = %session.id(), "Session replaced during evaluation");
            return Outcome::NoActiveSession;
        }

        let outcome = session.record_guess(&result, &self.policy);

        debug!(
            player_id,
            session_id = %session.id(),
            attempt = session.attempts(),
            correct = result.correct,
            score = result.score,
            matched = result.matched_name,
            "Guess evaluated"
        );

        if outcome.is_terminal() {
            self.remove_if_current(player_id, &handle);
            info!(
                player_id,
                session_id = %session.id(),
                attempts = session.attempts(),
                won = matches!(outcome, Outcome::Won { .. }),
                "Session finished"
            );
        }

        outcome
    }

    /// Drop sessions untouched for at least `max_idle`. Sessions busy with
    /// an in-flight action are left alone. Returns how many were evicted.
    pub fn evict_idle(&self, max_idle: Duration) -> usize {
        let now = Instant::now();
        let mut evicted = 0;

        self.sessions.retain(|player_id, handle| {
            let Ok(session) = handle.try_lock() else {
                return true;
            };
            if session.idle_for(now) < max_idle {
                return true;
            }
            info!(player_id, session_id = %session.id(), "Evicting idle session");
            evicted += 1;
            false
        });

        evicted
    }

    fn current(&self, player_id: &str) -> Option<SessionHandle> {
        self.sessions.get(player_id).map(|entry| entry.value().clone())
    }

    fn is_current(&self, player_id: &str, handle: &SessionHandle) -> bool {
        self.sessions
            .get(player_id)
            .is_some_and(|entry| Arc::ptr_eq(entry.value(), handle))
    }

    fn remove_if_current(&self, player_id: &str, handle: &SessionHandle) {
        self.sessions
            .remove_if(player_id, |_, current| Arc::ptr_eq(current, handle));
    }
}
