use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tokio::io::{
    AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader, Lines, ReadHalf, WriteHalf,
};
use tracing::{debug, warn};

#[cfg(unix)]
pub type IpcStream = tokio::net::UnixStream;

#[cfg(windows)]
pub type IpcStream = tokio::net::windows::named_pipe::NamedPipeClient;

/// Observer ids registered with `observe_property`
pub const OBSERVE_TIME_POS: u64 = 1;
pub const OBSERVE_DURATION: u64 = 2;

#[derive(Debug, Serialize)]
struct IpcCommand {
    command: Vec<serde_json::Value>,
    request_id: u64,
}

#[derive(Debug, Deserialize)]
struct IpcMessage {
    #[serde(default)]
    event: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    data: Option<serde_json::Value>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    request_id: Option<u64>,
}

/// Something mpv pushed down the socket
#[derive(Debug, Clone, PartialEq)]
pub enum MpvEvent {
    /// An observed property changed; `None` while it is unavailable
    PropertyChange { name: String, value: Option<f64> },
    StartFile,
    EndFile,
    Shutdown,
    Reply { request_id: u64, error: String },
    Other(String),
}

/// Decode one line of mpv's JSON IPC stream
pub fn parse_message(line: &str) -> Option<MpvEvent> {
    let msg: IpcMessage = match serde_json::from_str(line) {
        Ok(msg) => msg,
        Err(e) => {
            debug!(error = %e, "Ignoring undecodable IPC line");
            return None;
        }
    };

    if let Some(event) = msg.event {
        let event = match event.as_str() {
            "property-change" => MpvEvent::PropertyChange {
                name: msg.name.unwrap_or_default(),
                value: msg.data.and_then(|v| v.as_f64()),
            },
            "start-file" => MpvEvent::StartFile,
            "end-file" => MpvEvent::EndFile,
            "shutdown" => MpvEvent::Shutdown,
            _ => MpvEvent::Other(event),
        };
        return Some(event);
    }

    match (msg.request_id, msg.error) {
        (Some(request_id), Some(error)) => Some(MpvEvent::Reply { request_id, error }),
        _ => None,
    }
}

/// Location of an mpv `--input-ipc-server` endpoint
pub struct MpvIpc {
    socket_path: PathBuf,
}

impl MpvIpc {
    pub fn new(socket_path: PathBuf) -> Self {
        Self { socket_path }
    }

    pub fn socket_path(&self) -> &Path {
        &self.socket_path
    }

    /// Single connection attempt; fails until mpv has created the endpoint
    pub async fn connect(&self) -> io::Result<MpvConnection<IpcStream>> {
        #[cfg(unix)]
        let stream = tokio::net::UnixStream::connect(&self.socket_path).await?;

        #[cfg(windows)]
        let stream =
            tokio::net::windows::named_pipe::ClientOptions::new().open(&self.socket_path)?;

        Ok(MpvConnection::new(stream))
    }

    pub fn cleanup(&self) {
        #[cfg(unix)]
        {
            if self.socket_path.exists() {
                if let Err(e) = std::fs::remove_file(&self.socket_path) {
                    warn!("Failed to cleanup mpv socket: {}", e);
                }
            }
        }
    }
}

impl Drop for MpvIpc {
    fn drop(&mut self) {
        self.cleanup();
    }
}

/// An open IPC session with a running player
pub struct MpvConnection<S> {
    lines: Lines<BufReader<ReadHalf<S>>>,
    writer: WriteHalf<S>,
    next_request_id: u64,
}

impl<S: AsyncRead + AsyncWrite> MpvConnection<S> {
    pub fn new(stream: S) -> Self {
        let (reader, writer) = tokio::io::split(stream);
        Self {
            lines: BufReader::new(reader).lines(),
            writer,
            next_request_id: 1,
        }
    }

    async fn send(&mut self, command: Vec<serde_json::Value>) -> io::Result<u64> {
        let request_id = self.next_request_id;
        self.next_request_id += 1;

        let cmd = IpcCommand {
            command,
            request_id,
        };
        let mut json = serde_json::to_string(&cmd)?;
        json.push('\n');

        self.writer.write_all(json.as_bytes()).await?;
        self.writer.flush().await?;
        Ok(request_id)
    }

    /// Ask mpv to push `property-change` events for `property`
    pub async fn observe(&mut self, observer_id: u64, property: &str) -> io::Result<u64> {
        self.send(vec![
            "observe_property".into(),
            observer_id.into(),
            property.into(),
        ])
        .await
    }

    /// Replace whatever is playing with `target`
    pub async fn load_file(&mut self, target: &str) -> io::Result<u64> {
        self.send(vec!["loadfile".into(), target.into(), "replace".into()])
            .await
    }

    /// Next decodable message, or `None` once the player hangs up
    pub async fn next_event(&mut self) -> io::Result<Option<MpvEvent>> {
        while let Some(line) = self.lines.next_line().await? {
            if let Some(event) = parse_message(&line) {
                return Ok(Some(event));
            }
        }
        Ok(None)
    }
}

pub fn generate_socket_path() -> PathBuf {
    let pid = std::process::id();

    #[cfg(unix)]
    {
        std::env::temp_dir().join(format!("randisode-mpv-{}.sock", pid))
    }

    #[cfg(windows)]
    {
        PathBuf::from(format!(r"\\.\pipe\randisode-mpv-{}", pid))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_property_change() {
        let event =
            parse_message(r#"{"event":"property-change","id":1,"name":"time-pos","data":12.5}"#);
        assert_eq!(
            event,
            Some(MpvEvent::PropertyChange {
                name: "time-pos".to_string(),
                value: Some(12.5)
            })
        );
    }

    #[test]
    fn test_parse_unavailable_property() {
        let event = parse_message(r#"{"event":"property-change","id":2,"name":"duration"}"#);
        assert_eq!(
            event,
            Some(MpvEvent::PropertyChange {
                name: "duration".to_string(),
                value: None
            })
        );
    }

    #[test]
    fn test_parse_lifecycle_events() {
        assert_eq!(
            parse_message(r#"{"event":"start-file","playlist_entry_id":2}"#),
            Some(MpvEvent::StartFile)
        );
        assert_eq!(
            parse_message(r#"{"event":"end-file","reason":"stop"}"#),
            Some(MpvEvent::EndFile)
        );
        assert_eq!(parse_message(r#"{"event":"shutdown"}"#), Some(MpvEvent::Shutdown));
        assert_eq!(
            parse_message(r#"{"event":"seek"}"#),
            Some(MpvEvent::Other("seek".to_string()))
        );
    }

    #[test]
    fn test_parse_reply_and_garbage() {
        assert_eq!(
            parse_message(r#"{"request_id":3,"error":"success","data":null}"#),
            Some(MpvEvent::Reply {
                request_id: 3,
                error: "success".to_string()
            })
        );
        assert_eq!(parse_message("not json"), None);
        assert_eq!(parse_message(r#"{"data":1}"#), None);
    }

    #[tokio::test]
    async fn test_commands_are_json_lines() {
        let (client, server) = tokio::io::duplex(4096);
        let mut conn = MpvConnection::new(client);

        conn.observe(OBSERVE_TIME_POS, "time-pos").await.unwrap();
        let id = conn.load_file("https://example.test/ep2").await.unwrap();
        assert_eq!(id, 2);

        let mut lines = BufReader::new(server).lines();
        let first: serde_json::Value =
            serde_json::from_str(&lines.next_line().await.unwrap().unwrap()).unwrap();
        assert_eq!(
            first,
            serde_json::json!({"command": ["observe_property", 1, "time-pos"], "request_id": 1})
        );

        let second: serde_json::Value =
            serde_json::from_str(&lines.next_line().await.unwrap().unwrap()).unwrap();
        assert_eq!(
            second["command"],
            serde_json::json!(["loadfile", "https://example.test/ep2", "replace"])
        );
    }

    #[tokio::test]
    async fn test_next_event_skips_noise_and_ends_on_hangup() {
        let (client, mut server) = tokio::io::duplex(4096);
        let mut conn = MpvConnection::new(client);

        server
            .write_all(b"garbage\n{\"event\":\"property-change\",\"name\":\"duration\",\"data\":60}\n")
            .await
            .unwrap();
        drop(server);

        assert_eq!(
            conn.next_event().await.unwrap(),
            Some(MpvEvent::PropertyChange {
                name: "duration".to_string(),
                value: Some(60.0)
            })
        );
        assert_eq!(conn.next_event().await.unwrap(), None);
    }
}
