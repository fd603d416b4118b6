//! Fake Impala coordinators shared by the collector and router tests.

use mockito::{Matcher, ServerGuard};
use tokio::net::TcpListener;

use crate::config::Target;

/// A coordinator answering `/sessions?json` and `/queries?json` with the
/// given status and body.
pub async fn coordinator(sessions: (usize, &str), queries: (usize, &str)) -> ServerGuard {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/sessions")
        .match_query(Matcher::Exact("json".to_string()))
        .with_status(sessions.0)
        .with_body(sessions.1)
        .create_async()
        .await;
    server
        .mock("GET", "/queries")
        .match_query(Matcher::Exact("json".to_string()))
        .with_status(queries.0)
        .with_body(queries.1)
        .create_async()
        .await;
    server
}

pub fn target_of(server: &ServerGuard) -> Target {
    server.host_with_port().parse().unwrap()
}

/// A coordinator that accepts connections and never writes a byte.
pub async fn silent_target() -> Target {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });
    addr.to_string().parse().unwrap()
}
