use std::{
    fmt,
    path::{Path, PathBuf},
    time::Duration,
};

use tokio::{process::Command, sync::mpsc::Sender};

use crate::{
    consts::{LAUNCH_DELAY_SECS, TOKEN_PREVIEW_LEN},
    error::{Error, Result},
    launcher_config,
};

/// One nickname/token pair selected for a launch.
#[derive(Clone, PartialEq, Eq)]
pub struct Account {
    pub nickname: String,
    pub token: String,
}

impl Account {
    pub fn new(nickname: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            nickname: nickname.into(),
            token: token.into(),
        }
    }

    /// The first few characters of the token, for display. The full
    /// token is a secret and is never logged or shown.
    pub fn masked(&self) -> String {
        if self.token.is_empty() {
            return "no token".to_owned();
        }

        let preview: String = self.token.chars().take(TOKEN_PREVIEW_LEN).collect();
        format!("{preview}...")
    }
}

impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Account")
            .field("nickname", &self.nickname)
            .field("token", &self.masked())
            .finish()
    }
}

/// One user-triggered batch: which accounts to launch and where the
/// launcher config and the game executable live. Never persisted.
#[derive(Debug, Clone)]
pub struct LaunchBatch {
    pub accounts: Vec<Account>,
    pub launcher_config: PathBuf,
    pub game: PathBuf,
    pub delay: Duration,
}

impl LaunchBatch {
    pub fn new(
        accounts: Vec<Account>,
        launcher_config: impl Into<PathBuf>,
        game: impl Into<PathBuf>,
    ) -> Self {
        Self {
            accounts,
            launcher_config: launcher_config.into(),
            game: game.into(),
            delay: Duration::from_secs(LAUNCH_DELAY_SECS),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

/// Progress reports emitted while a batch is running.
#[derive(Debug)]
pub enum LaunchEvent {
    /// The launcher config now points at this account.
    Switched { nickname: String },
    /// The game process was started for this account.
    Spawned { nickname: String },
    /// This account failed; the batch keeps going.
    Failed { nickname: String, error: Error },
    Finished { launched: usize, failed: usize },
}

/// Runs a batch to completion, reporting progress over `tx`.
///
/// For each account in order: point the launcher config at it, spawn
/// the game through the platform shell without waiting for it, then
/// sleep the batch delay. A failed account is reported and skipped, it
/// never aborts the rest of the batch. There is no rollback: the config
/// stays on whichever account was written last.
pub async fn run(batch: LaunchBatch, tx: Sender<LaunchEvent>) {
    let mut launched = 0;
    let mut failed = 0;

    for account in &batch.accounts {
        let nickname = account.nickname.clone();

        let result = launcher_config::set_active_account(
            &batch.launcher_config,
            &account.nickname,
            &account.token,
        )
        .await;

        let result = match result {
            Ok(()) => {
                let _ = tx
                    .send(LaunchEvent::Switched {
                        nickname: nickname.clone(),
                    })
                    .await;
                spawn_detached(&batch.game)
            }
            Err(error) => Err(error),
        };

        match result {
            Ok(()) => {
                launched += 1;
                tracing::info!("Launched the game for `{nickname}`");
                let _ = tx.send(LaunchEvent::Spawned { nickname }).await;
            }
            Err(error) => {
                failed += 1;
                tracing::error!("Cannot launch the game for `{nickname}`: {error}");
                let _ = tx.send(LaunchEvent::Failed { nickname, error }).await;
            }
        }

        // The throttle is applied even after a failure so two healthy
        // neighbours are never launched back-to-back.
        tokio::time::sleep(batch.delay).await;
    }

    let _ = tx.send(LaunchEvent::Finished { launched, failed }).await;
}

#[cfg(not(windows))]
const SHELL: (&str, &str) = ("sh", "-c");

#[cfg(windows)]
const SHELL: (&str, &str) = ("cmd", "/C");

/// Starts the game executable through the shell and lets go of it: no
/// waiting, no exit status, no captured output.
fn spawn_detached(program: &Path) -> Result<()> {
    let (shell, flag) = SHELL;
    spawn_via(shell, flag, program)
}

fn spawn_via(shell: &str, flag: &str, program: &Path) -> Result<()> {
    let mut command = Command::new(shell);
    command.arg(flag).arg(program);

    command.spawn().map(drop).map_err(|source| Error::Spawn {
        path: program.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("relog-launch-{name}.json"))
    }

    fn write_config(path: &Path) {
        std::fs::write(path, r#"{"accounts": {"bob": "tokB"}, "currentAccount": "bob"}"#).unwrap();
    }

    async fn drain(mut rx: tokio::sync::mpsc::Receiver<LaunchEvent>) -> Vec<LaunchEvent> {
        let mut events = Vec::new();
        while let Some(event) = rx.recv().await {
            events.push(event);
        }
        events
    }

    #[test]
    fn masked_token_is_a_short_prefix() {
        let account = Account::new("alice", "secret-token");
        assert_eq!(account.masked(), "secre...");
        assert_eq!(Account::new("alice", "").masked(), "no token");
        // The mask is what Debug shows as well.
        assert!(!format!("{account:?}").contains("secret-token"));
    }

    #[tokio::test]
    async fn every_account_is_attempted_and_throttled() {
        let config = test_path("throttle");
        write_config(&config);

        let batch = LaunchBatch::new(
            vec![Account::new("alice", "tokA"), Account::new("carol", "tokC")],
            &config,
            "/nonexistent/game/dir/game-binary-that-is-not-there",
        )
        .with_delay(Duration::from_millis(50));

        let (tx, rx) = tokio::sync::mpsc::channel(16);
        let started = std::time::Instant::now();
        run(batch, tx).await;
        let events = drain(rx).await;

        assert!(matches!(
            &events[0],
            LaunchEvent::Switched { nickname } if nickname == "alice"
        ));
        assert!(events.iter().any(
            |event| matches!(event, LaunchEvent::Switched { nickname } if nickname == "carol")
        ));
        assert!(matches!(events.last(), Some(LaunchEvent::Finished { .. })));
        assert!(started.elapsed() >= Duration::from_millis(100));

        // The config is left pointing at the last account written.
        let account = launcher_config::active_account(&config).await.unwrap();
        assert_eq!(account.nickname, "carol");
    }

    #[tokio::test]
    async fn a_missing_shell_is_a_spawn_error() {
        // The real shell comes from `SHELL` and spawning it hardly ever
        // fails; force the failure through the seam.
        let result = spawn_via("relog-shell-that-is-not-installed", "-c", Path::new("true"));

        assert!(matches!(
            result,
            Err(Error::Spawn { path, source })
                if path == Path::new("true") && source.kind() == std::io::ErrorKind::NotFound
        ));
    }

    #[tokio::test]
    async fn a_failed_account_does_not_stop_the_batch() {
        let config = test_path("unreadable-config");
        std::fs::write(&config, "not json at all").unwrap();

        let batch = LaunchBatch::new(
            vec![Account::new("alice", "tokA"), Account::new("carol", "tokC")],
            &config,
            "true",
        )
        .with_delay(Duration::from_millis(50));

        let (tx, rx) = tokio::sync::mpsc::channel(16);
        let started = std::time::Instant::now();
        run(batch, tx).await;
        let events = drain(rx).await;

        // The first failure still throttles and the second account is
        // still attempted.
        assert!(matches!(
            &events[0],
            LaunchEvent::Failed { nickname, error: Error::Json { .. } } if nickname == "alice"
        ));
        assert!(matches!(
            &events[1],
            LaunchEvent::Failed { nickname, error: Error::Json { .. } } if nickname == "carol"
        ));
        assert!(matches!(
            &events[2],
            LaunchEvent::Finished { launched: 0, failed: 2 }
        ));
        assert!(started.elapsed() >= Duration::from_millis(100));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn launches_every_account_in_order() {
        let config = test_path("in-order");
        write_config(&config);

        let batch = LaunchBatch::new(
            vec![Account::new("alice", "tokA"), Account::new("carol", "tokC")],
            &config,
            "true",
        )
        .with_delay(Duration::from_millis(10));

        let (tx, rx) = tokio::sync::mpsc::channel(16);
        run(batch, tx).await;
        let events = drain(rx).await;

        assert!(matches!(&events[0], LaunchEvent::Switched { nickname } if nickname == "alice"));
        assert!(matches!(&events[1], LaunchEvent::Spawned { nickname } if nickname == "alice"));
        assert!(matches!(&events[2], LaunchEvent::Switched { nickname } if nickname == "carol"));
        assert!(matches!(&events[3], LaunchEvent::Spawned { nickname } if nickname == "carol"));
        assert!(matches!(
            &events[4],
            LaunchEvent::Finished { launched: 2, failed: 0 }
        ));
    }
}
