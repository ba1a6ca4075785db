//! Control socket: one JSON request per line, one JSON response per line.
//! Show requests block their connection until the menu cycle completes, so
//! automation callers get the chosen item back on the same stream.

use crate::events::AppEvent;
use async_channel::Sender;
use gyre_core::automation::{Request, Response};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::UnixListener;

pub const SOCKET_PATH: &str = "/tmp/gyre.sock";

pub async fn run_server(tx: Sender<AppEvent>) {
    // cleanup old socket if it exists
    if std::fs::metadata(SOCKET_PATH).is_ok() {
        let _ = std::fs::remove_file(SOCKET_PATH);
    }

    let listener = match UnixListener::bind(SOCKET_PATH) {
        Ok(l) => l,
        Err(e) => {
            log::error!("failed to bind unix socket: {e}");
            return;
        }
    };

    loop {
        match listener.accept().await {
            Ok((mut stream, _)) => {
                let tx = tx.clone();
                tokio::spawn(async move {
                    let (read, mut write) = stream.split();
                    let reader = BufReader::new(read);
                    let mut lines = reader.lines();

                    while let Ok(Some(line)) = lines.next_line().await {
                        let line = line.trim();
                        if line.is_empty() {
                            continue;
                        }
                        let response = dispatch(line, &tx).await;
                        let mut payload = match serde_json::to_string(&response) {
                            Ok(s) => s,
                            Err(e) => {
                                log::error!("unserializable response: {e}");
                                continue;
                            }
                        };
                        payload.push('\n');
                        if write.write_all(payload.as_bytes()).await.is_err() {
                            break;
                        }
                    }
                });
            }
            Err(e) => {
                log::error!("failed to accept connection: {e}");
            }
        }
    }
}

async fn dispatch(line: &str, tx: &Sender<AppEvent>) -> Response {
    let request: Request = match serde_json::from_str(line) {
        Ok(r) => r,
        Err(e) => {
            return Response::Error {
                kind: "malformed".to_string(),
                message: format!("bad request: {e}"),
            };
        }
    };

    let (event, reply) = AppEvent::from_request(request);
    if tx.send(event).await.is_err() {
        return Response::Error {
            kind: "shutdown".to_string(),
            message: "daemon is shutting down".to_string(),
        };
    }

    match reply {
        None => Response::Ok,
        Some(rx) => rx.await.unwrap_or(Response::Error {
            kind: "dropped".to_string(),
            message: "request was dropped before completion".to_string(),
        }),
    }
}
