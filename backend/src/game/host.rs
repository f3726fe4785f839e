use super::core::Outcome;
use super::core::messages::{ClientMessage, ServerMessage};
use super::engine::GameRegistry;
use super::flavor::FlavorService;
use std::sync::Arc;
use tracing::{debug, info};

/// Bridges transport messages to the game registry and flavors the replies
pub struct GameHost {
    registry: Arc<GameRegistry>,
    flavor: FlavorService,
}

impl GameHost {
    pub fn new(registry: Arc<GameRegistry>, flavor: FlavorService) -> Self {
        Self { registry, flavor }
    }

    pub async fn handle_message(&self, msg: ClientMessage) -> ServerMessage {
        debug!(user_id = msg.user_id(), "Handling message");
        let outcome = match msg {
            ClientMessage::Start { user_id } => {
                info!(user_id, "Player starting a game");
                self.registry.start(&user_id)
            }
            ClientMessage::Skip { user_id } => self.registry.skip(&user_id).await,
            ClientMessage::Guess { user_id, text } => self.registry.guess(&user_id, &text).await,
        };
        self.reply(outcome).await
    }

    async fn reply(&self, outcome: Outcome) -> ServerMessage {
        let text = self.flavor.render(&outcome.render()).await;
        ServerMessage::Reply { outcome, text }
    }
}
