use super::outcome::Outcome;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    Start { user_id: String },
    Skip { user_id: String },
    Guess { user_id: String, text: String },
}

impl ClientMessage {
    pub fn user_id(&self) -> &str {
        match self {
            ClientMessage::Start { user_id }
            | ClientMessage::Skip { user_id }
            | ClientMessage::Guess { user_id, .. } => user_id,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Structured outcome plus the text to show the player
    Reply { outcome: Outcome, text: String },
    Error { message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_start() {
        let json = r#"{"type": "start", "user_id": "42"}"#;
        let msg: ClientMessage = serde_json::from_str(json).unwrap();
        assert_eq!(
            msg,
            ClientMessage::Start {
                user_id: "42".to_string()
            }
        );
    }

    #[test]
    fn deserialize_guess() {
        let json = r#"{"type": "guess", "user_id": "42", "text": "O Rei"}"#;
        let msg: ClientMessage = serde_json::from_str(json).unwrap();
        assert_eq!(msg.user_id(), "42");
        assert_eq!(
            msg,
            ClientMessage::Guess {
                user_id: "42".to_string(),
                text: "O Rei".to_string()
            }
        );
    }

    #[test]
    fn guess_without_text_is_rejected() {
        let json = r#"{"type": "guess", "user_id": "42"}"#;
        assert!(serde_json::from_str::<ClientMessage>(json).is_err());
    }

    #[test]
    fn serialize_reply() {
        let msg = ServerMessage::Reply {
            outcome: Outcome::NoActiveGame,
            text: "No active game. Type /start to play.".to_string(),
        };
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains(r#""type":"reply""#));
        assert!(json.contains(r#""outcome":{"kind":"no_active_game"}"#));
    }

    #[test]
    fn serialize_error() {
        let msg = ServerMessage::Error {
            message: "bad frame".to_string(),
        };
        let json = serde_json::to_string(&msg).unwrap();
        assert_eq!(json, r#"{"type":"error","message":"bad frame"}"#);
    }
}
