use std::path::Path;
use std::process::Stdio;

use tokio::process::{Child, Command};
use tracing::{debug, info};

use crate::error::{Error, Result};

pub struct MpvPlayer {
    command: String,
    args: Vec<String>,
    child: Option<Child>,
}

impl MpvPlayer {
    pub fn new(command: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            command: command.into(),
            args,
            child: None,
        }
    }

    fn build(&self, target: &str, ipc_socket: Option<&Path>) -> Command {
        let mut cmd = Command::new(&self.command);

        // Keep the player quiet; the terminal belongs to us
        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::null());
        cmd.stderr(Stdio::null());

        for arg in &self.args {
            cmd.arg(arg);
        }

        if let Some(socket) = ipc_socket {
            cmd.arg(format!("--input-ipc-server={}", socket.display()));
        }

        cmd.arg(target);
        cmd
    }

    fn spawn(&self, mut cmd: Command) -> Result<Child> {
        cmd.spawn().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::PlayerNotFound(self.command.clone())
            } else {
                Error::PlayerLaunch(e.to_string())
            }
        })
    }

    /// Launch the player on `target`, optionally exposing an IPC socket
    pub fn play(&mut self, target: &str, ipc_socket: Option<&Path>) -> Result<()> {
        let mut cmd = self.build(target, ipc_socket);
        // A watched player never outlives us
        cmd.kill_on_drop(true);
        debug!(command = %self.command, url = %target, "Launching player");

        self.child = Some(self.spawn(cmd)?);
        Ok(())
    }

    /// Start an independent player window on `target` and forget about it
    pub fn open_detached(&self, target: &str) -> Result<()> {
        let cmd = self.build(target, None);
        let child = self.spawn(cmd)?;
        info!(url = %target, pid = ?child.id(), "Opened in new player");
        Ok(())
    }

    /// Terminate the player started by [`play`](Self::play), if any
    pub async fn stop(&mut self) -> Result<()> {
        if let Some(mut child) = self.child.take() {
            child.kill().await?;
            info!("Player stopped");
        }
        Ok(())
    }

    /// Wait for the player to exit and return whether it succeeded
    pub async fn wait(&mut self) -> Result<bool> {
        if let Some(ref mut child) = self.child {
            let status = child.wait().await?;
            self.child = None;
            Ok(status.success())
        } else {
            Ok(true)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_places_target_last() {
        let player = MpvPlayer::new("mpv", vec!["--fullscreen".to_string()]);
        let cmd = player.build("https://example.test/ep1", Some(Path::new("/tmp/ipc.sock")));
        let args: Vec<_> = cmd
            .as_std()
            .get_args()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();

        assert_eq!(
            args,
            vec![
                "--fullscreen",
                "--input-ipc-server=/tmp/ipc.sock",
                "https://example.test/ep1"
            ]
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_stop_terminates_watched_player() {
        let mut player = MpvPlayer::new("sleep", Vec::new());
        player.play("30", None).unwrap();

        tokio::time::timeout(std::time::Duration::from_secs(5), player.stop())
            .await
            .unwrap()
            .unwrap();
        assert!(player.child.is_none());
        assert!(player.wait().await.unwrap());
    }

    #[tokio::test]
    async fn test_missing_binary_is_player_not_found() {
        let mut player = MpvPlayer::new("randisode-no-such-player", Vec::new());
        let err = player.play("ep", None).unwrap_err();
        assert!(matches!(err, Error::PlayerNotFound(name) if name == "randisode-no-such-player"));
        assert!(player.wait().await.unwrap());
    }
}
