#![allow(dead_code)]

use careerguess::game::{
    Catalog, FlavorService, GameHost, GamePolicy, GameRegistry, PlayerRecord, TrigramEmbedder,
};
use careerguess::messages::{ClientMessage, ServerMessage};
use futures_util::{SinkExt, StreamExt};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};

pub type WsStream = WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>;

pub struct TestServer {
    base_url: String,
}

impl TestServer {
    pub fn ws_url(&self) -> String {
        format!("{}/ws", self.base_url)
    }

    pub fn http_url(&self, path: &str) -> String {
        format!(
            "http://{}{}",
            self.base_url.strip_prefix("ws://").unwrap(),
            path
        )
    }
}

pub fn pele() -> PlayerRecord {
    PlayerRecord {
        position: "Forward".to_string(),
        nationality: "Brazil".to_string(),
        nickname: "O Rei".to_string(),
        ..PlayerRecord::new("Pelé", "Santos→NY Cosmos")
    }
}

pub async fn pele_host() -> Arc<GameHost> {
    let embedder = TrigramEmbedder::default();
    let catalog = Catalog::from_records(vec![pele()], &embedder).await.unwrap();
    let registry = GameRegistry::new(Arc::new(catalog), Arc::new(embedder), GamePolicy::default());
    Arc::new(GameHost::new(Arc::new(registry), FlavorService::disabled()))
}

pub async fn spawn_test_server() -> TestServer {
    let host = pele_host().await;

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let app = careerguess::app(host);
        axum::serve(listener, app).await.unwrap();
    });

    TestServer {
        base_url: format!("ws://{}", addr),
    }
}

pub async fn connect(server: &TestServer) -> WsStream {
    let (ws, _) = connect_async(&server.ws_url()).await.expect("Failed to connect");
    ws
}

fn to_message(msg: &ClientMessage) -> Message {
    Message::Text(serde_json::to_string(msg).unwrap().into())
}

pub fn start_msg(user_id: &str) -> Message {
    to_message(&ClientMessage::Start {
        user_id: user_id.to_string(),
    })
}

pub fn skip_msg(user_id: &str) -> Message {
    to_message(&ClientMessage::Skip {
        user_id: user_id.to_string(),
    })
}

pub fn guess_msg(user_id: &str, text: &str) -> Message {
    to_message(&ClientMessage::Guess {
        user_id: user_id.to_string(),
        text: text.to_string(),
    })
}

pub async fn recv(ws: &mut WsStream) -> ServerMessage {
    let msg = ws.next().await.unwrap().unwrap();
    serde_json::from_str(msg.to_text().unwrap()).unwrap()
}

pub async fn send_and_recv(ws: &mut WsStream, msg: Message) -> ServerMessage {
    ws.send(msg).await.unwrap();
    recv(ws).await
}
