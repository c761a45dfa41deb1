//! TCP IPC server — accept loop and per-connection handler.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;

use crate::bridge::{Bridge, Outcome};
use crate::ipc::codec::{Frame, MSG_ERROR, MSG_REQUEST, MSG_RESPONSE};
use crate::types::{IpcConfig, RequestId};

/// Encode a JSON value to msgpack. Logs and returns an error on failure
/// instead of silently producing an empty vec.
fn encode_msgpack(value: &serde_json::Value) -> std::io::Result<Vec<u8>> {
    rmp_serde::to_vec_named(value).map_err(|e| {
        tracing::error!("msgpack encoding failed: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
    })
}

fn error_payload(id: &str, code: &str, message: String) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "ok": false,
        "error": { "code": code, "message": message },
    })
}

/// IPC server wrapping the bridge.
#[derive(Debug)]
pub struct IpcServer {
    bridge: Arc<Bridge>,
    addr: SocketAddr,
    cancel: CancellationToken,
    ipc_config: IpcConfig,
}

impl IpcServer {
    pub fn new(bridge: Arc<Bridge>, addr: SocketAddr, ipc_config: IpcConfig) -> Self {
        Self {
            bridge,
            addr,
            cancel: CancellationToken::new(),
            ipc_config,
        }
    }

    /// Run the server until cancelled or a fatal error occurs.
    pub async fn serve(&self) -> std::io::Result<()> {
        let listener = TcpListener::bind(self.addr).await?;
        let conn_semaphore = Arc::new(Semaphore::new(self.ipc_config.max_connections));
        tracing::info!(
            "IPC server listening on {} (max_connections={})",
            self.addr,
            self.ipc_config.max_connections,
        );

        loop {
            tokio::select! {
                _ = self.cancel.cancelled() => {
                    tracing::info!("IPC server shutting down");
                    break;
                }
                accept = listener.accept() => {
                    let (stream, peer) = accept?;

                    // Acquire connection permit (backpressure when at capacity).
                    let permit = match conn_semaphore.clone().try_acquire_owned() {
                        Ok(permit) => permit,
                        Err(_) => {
                            tracing::warn!(
                                "Connection from {} rejected: at max_connections ({})",
                                peer,
                                self.ipc_config.max_connections,
                            );
                            drop(stream);
                            continue;
                        }
                    };

                    tracing::debug!("IPC connection from {} (active={})",
                        peer,
                        self.ipc_config.max_connections - conn_semaphore.available_permits(),
                    );
                    let bridge = self.bridge.clone();
                    let cancel = self.cancel.clone();
                    let ipc_config = self.ipc_config.clone();
                    tokio::spawn(async move {
                        if let Err(e) = handle_connection(stream, bridge, cancel, ipc_config).await {
                            tracing::warn!("Connection from {} error: {}", peer, e);
                        }
                        drop(permit); // release the connection slot
                    });
                }
            }
        }
        Ok(())
    }

    /// Request graceful shutdown.
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }
}

/// Handle a single TCP connection: read frames → dispatch → write replies.
async fn handle_connection(
    stream: tokio::net::TcpStream,
    bridge: Arc<Bridge>,
    cancel: CancellationToken,
    ipc_config: IpcConfig,
) -> std::io::Result<()> {
    let (mut reader, mut writer) = stream.into_split();

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            frame_result = tokio::time::timeout(ipc_config.read_timeout, Frame::read(&mut reader, ipc_config.max_frame_bytes)) => {
                let frame = match frame_result {
                    Err(_elapsed) => {
                        tracing::debug!("Read timeout ({:?}), dropping connection", ipc_config.read_timeout);
                        break;
                    }
                    Ok(result) => match result? {
                        Some(f) => f,
                        None => break, // clean EOF
                    },
                };

                if frame.msg_type != MSG_REQUEST {
                    let payload = error_payload(
                        "",
                        "INVALID_ARGUMENT",
                        format!("Unexpected message type: 0x{:02X}", frame.msg_type),
                    );
                    write_reply(&mut writer, MSG_ERROR, &payload, ipc_config.write_timeout).await?;
                    continue;
                }

                // Decode msgpack request
                let request: serde_json::Value = match rmp_serde::from_slice(&frame.payload) {
                    Ok(v) => v,
                    Err(e) => {
                        let payload = error_payload("", "INVALID_ARGUMENT", format!("Invalid msgpack: {}", e));
                        write_reply(&mut writer, MSG_ERROR, &payload, ipc_config.write_timeout).await?;
                        continue;
                    }
                };

                let request_id = request.get("id")
                    .and_then(|v| v.as_str())
                    .filter(|s| !s.is_empty())
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| RequestId::new().to_string());
                let method = request.get("method")
                    .and_then(|v| v.as_str())
                    .unwrap_or("");
                let body = request.get("body")
                    .cloned()
                    .unwrap_or(serde_json::Value::Null);

                tracing::debug!(id = %request_id, method, "dispatching call");
                let (msg_type, payload) = match bridge.dispatch(method, &body) {
                    Ok(Outcome::Success) => (
                        MSG_RESPONSE,
                        serde_json::json!({
                            "id": request_id,
                            "ok": true,
                            "body": serde_json::Value::Null,
                        }),
                    ),
                    Ok(Outcome::NotImplemented) => (
                        MSG_ERROR,
                        error_payload(
                            &request_id,
                            "UNIMPLEMENTED",
                            format!("Method not implemented: {}", method),
                        ),
                    ),
                    Err(e) => (
                        MSG_ERROR,
                        error_payload(&request_id, e.to_ipc_error_code(), e.to_string()),
                    ),
                };
                write_reply(&mut writer, msg_type, &payload, ipc_config.write_timeout).await?;
            }
        }
    }

    Ok(())
}

/// Encode and write a reply frame with a timeout. Returns an error if the
/// write takes too long (prevents slow consumers from holding connections
/// indefinitely).
async fn write_reply<W: tokio::io::AsyncWriteExt + Unpin>(
    writer: &mut W,
    msg_type: u8,
    payload: &serde_json::Value,
    timeout: Duration,
) -> std::io::Result<()> {
    let frame = Frame::new(msg_type, encode_msgpack(payload)?);
    tokio::time::timeout(timeout, frame.write(writer))
        .await
        .map_err(|_| {
            tracing::warn!("Write timeout ({:?}), dropping connection", timeout);
            std::io::Error::new(std::io::ErrorKind::TimedOut, "write timeout")
        })?
}
