// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Wire protocol for the local control socket `af-cli` speaks against
//! this daemon: a 4-byte big-endian length prefix followed by a JSON
//! payload, one `Request` in, one `Response` out per connection — the
//! same length-prefixed framing the teacher's daemon used for its own
//! Unix-socket IPC, carrying only the spawn/list/kill/send verbs spec
//! §4.5's Agent Manager operations table implies a caller needs (every
//! job/queue/worker verb from the teacher's own protocol sits outside
//! THE CORE per spec §1's scope line).

use af_core::Agent;
use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

/// One request frame.
#[derive(Debug, Clone, Serialize, serde::Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Request {
    Spawn {
        project: String,
        task: String,
        #[serde(default)]
        profile: Option<String>,
    },
    List,
    Get {
        id: String,
    },
    Kill {
        id: String,
    },
    Restart {
        id: String,
    },
    SendMessage {
        id: String,
        text: String,
    },
    SendControl {
        id: String,
        action: String,
    },
}

/// One response frame. `Error` carries a caller-facing message only —
/// never a `Debug`-formatted error value, so secrets held in connector
/// credentials or config never round-trip over the socket.
#[derive(Debug, Clone, Serialize, serde::Deserialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum Response {
    Agent { agent: Agent },
    Agents { agents: Vec<Agent> },
    Ok,
    NotFound,
    Error { message: String },
}

/// Protocol-level failures distinct from the `Response::Error` the
/// daemon returns for an application-level failure (e.g. cap-exceeded):
/// these mean the frame itself couldn't be read or written.
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed frame: {0}")]
    Json(#[from] serde_json::Error),
    #[error("frame too large: {size} bytes (max {max})")]
    MessageTooLarge { size: usize, max: usize },
    #[error("connection closed")]
    ConnectionClosed,
    #[error("timed out")]
    Timeout,
}

/// Matches the teacher's IPC cap — plenty for a spawn/list/kill/send
/// payload, which never carries terminal output (that's the Terminal
/// Bridge's job, not this socket's).
pub const MAX_MESSAGE_SIZE: usize = 16 * 1024 * 1024;
pub const DEFAULT_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(5);

pub fn encode<T: Serialize>(msg: &T) -> Result<Vec<u8>, ProtocolError> {
    let json = serde_json::to_vec(msg)?;
    if json.len() > MAX_MESSAGE_SIZE {
        return Err(ProtocolError::MessageTooLarge {
            size: json.len(),
            max: MAX_MESSAGE_SIZE,
        });
    }
    Ok(json)
}

pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, ProtocolError> {
    Ok(serde_json::from_slice(bytes)?)
}

async fn read_message<R: AsyncReadExt + Unpin>(reader: &mut R) -> Result<Vec<u8>, ProtocolError> {
    let mut len_buf = [0u8; 4];
    match reader.read_exact(&mut len_buf).await {
        Ok(_) => {}
        Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
            return Err(ProtocolError::ConnectionClosed)
        }
        Err(e) => return Err(ProtocolError::Io(e)),
    }
    let len = u32::from_be_bytes(len_buf) as usize;
    if len > MAX_MESSAGE_SIZE {
        return Err(ProtocolError::MessageTooLarge { size: len, max: MAX_MESSAGE_SIZE });
    }
    let mut buf = vec![0u8; len];
    reader.read_exact(&mut buf).await?;
    Ok(buf)
}

async fn write_message<W: AsyncWriteExt + Unpin>(writer: &mut W, data: &[u8]) -> Result<(), ProtocolError> {
    let len = data.len();
    if len > MAX_MESSAGE_SIZE {
        return Err(ProtocolError::MessageTooLarge { size: len, max: MAX_MESSAGE_SIZE });
    }
    writer.write_all(&(len as u32).to_be_bytes()).await?;
    writer.write_all(data).await?;
    writer.flush().await?;
    Ok(())
}

pub async fn read_request<R: AsyncReadExt + Unpin>(
    reader: &mut R,
    timeout: std::time::Duration,
) -> Result<Request, ProtocolError> {
    let bytes = tokio::time::timeout(timeout, read_message(reader))
        .await
        .map_err(|_| ProtocolError::Timeout)??;
    decode(&bytes)
}

pub async fn write_response<W: AsyncWriteExt + Unpin>(
    writer: &mut W,
    response: &Response,
    timeout: std::time::Duration,
) -> Result<(), ProtocolError> {
    let data = encode(response)?;
    tokio::time::timeout(timeout, write_message(writer, &data))
        .await
        .map_err(|_| ProtocolError::Timeout)?
}

pub async fn read_response<R: AsyncReadExt + Unpin>(
    reader: &mut R,
    timeout: std::time::Duration,
) -> Result<Response, ProtocolError> {
    let bytes = tokio::time::timeout(timeout, read_message(reader))
        .await
        .map_err(|_| ProtocolError::Timeout)??;
    decode(&bytes)
}

pub async fn write_request<W: AsyncWriteExt + Unpin>(
    writer: &mut W,
    request: &Request,
    timeout: std::time::Duration,
) -> Result<(), ProtocolError> {
    let data = encode(request)?;
    tokio::time::timeout(timeout, write_message(writer, &data))
        .await
        .map_err(|_| ProtocolError::Timeout)?
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn spawn_request_round_trips_over_the_wire() {
        let req = Request::Spawn { project: "api".into(), task: "fix bug".into(), profile: None };
        let mut buf = Vec::new();
        write_request(&mut buf, &req, DEFAULT_TIMEOUT).await.unwrap_or(());

        let mut cursor = std::io::Cursor::new(buf);
        let back = read_request(&mut cursor, DEFAULT_TIMEOUT).await.unwrap_or(Request::List);
        match back {
            Request::Spawn { project, task, profile } => {
                assert_eq!(project, "api");
                assert_eq!(task, "fix bug");
                assert_eq!(profile, None);
            }
            other => panic!("unexpected decode: {other:?}"),
        }
    }

    #[tokio::test]
    async fn truncated_frame_is_a_connection_closed_error() {
        let mut cursor = std::io::Cursor::new(Vec::<u8>::new());
        let err = read_request(&mut cursor, DEFAULT_TIMEOUT).await.unwrap_err();
        assert!(matches!(err, ProtocolError::ConnectionClosed));
    }
}
