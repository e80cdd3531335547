use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, Result},
    fs::{read_json_config, write_json_config},
};

/// The external launcher's own state file.
///
/// The schema belongs to the launcher, not to us. We read the whole
/// document, touch a fixed set of top-level fields and write the whole
/// document back; everything we do not understand is kept in `other`
/// and round-trips untouched.
#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LauncherConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_account: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accounts: Option<IndexMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory_amount: Option<u32>,
    #[serde(flatten)]
    pub other: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveAccount {
    pub nickname: String,
    /// Empty when the launcher knows the nickname but has no token
    /// stored for it. That is still a found account.
    pub token: String,
}

impl ActiveAccount {
    /// `false` when the launcher lists the nickname without a token.
    /// Such an account cannot be launched and is not worth storing.
    pub fn has_token(&self) -> bool {
        !self.token.is_empty()
    }
}

impl LauncherConfig {
    pub async fn read(path: impl AsRef<Path>) -> Result<Self> {
        read_json_config(path).await
    }

    pub async fn write(&self, path: impl AsRef<Path>) -> Result<()> {
        write_json_config(self, path).await
    }

    pub fn active_account(&self) -> Option<ActiveAccount> {
        let nickname = self.current_account.as_deref().filter(|n| !n.is_empty())?;
        let token = self
            .accounts
            .as_ref()
            .and_then(|accounts| accounts.get(nickname))
            .cloned()
            .unwrap_or_default();

        Some(ActiveAccount {
            nickname: nickname.to_owned(),
            token,
        })
    }

    /// Marks `nickname` as the active account. The token is only stored
    /// when the document already carries an `accounts` object; we never
    /// introduce fields the launcher did not write itself.
    pub fn set_active_account(&mut self, nickname: impl Into<String>, token: impl Into<String>) {
        let nickname = nickname.into();
        if let Some(accounts) = self.accounts.as_mut() {
            accounts.insert(nickname.clone(), token.into());
        }
        self.current_account = Some(nickname);
    }
}

/// Reads the config at `path` and extracts the active account.
///
/// A missing file, invalid JSON and an absent or empty `currentAccount`
/// are each a distinct [`Error`]; an account whose token is empty is not
/// an error.
pub async fn active_account(path: impl AsRef<Path>) -> Result<ActiveAccount> {
    let config = LauncherConfig::read(path).await?;
    config.active_account().ok_or(Error::NoActiveAccount)
}

pub async fn set_active_account(
    path: impl AsRef<Path>,
    nickname: impl Into<String>,
    token: impl Into<String>,
) -> Result<()> {
    let path = path.as_ref();

    let mut config = LauncherConfig::read(path).await?;
    config.set_active_account(nickname, token);
    config.write(path).await
}

pub async fn set_memory_amount(path: impl AsRef<Path>, megabytes: u32) -> Result<()> {
    let path = path.as_ref();

    let mut config = LauncherConfig::read(path).await?;
    config.memory_amount = Some(megabytes);
    config.write(path).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("relog-launcher-{name}.json"))
    }

    #[tokio::test]
    async fn extracts_the_active_account() {
        let path = test_path("extract");
        std::fs::write(
            &path,
            r#"{"accounts": {"alice": "tokA"}, "currentAccount": "alice"}"#,
        )
        .unwrap();

        let account = active_account(&path).await.unwrap();
        assert_eq!(
            account,
            ActiveAccount {
                nickname: "alice".into(),
                token: "tokA".into()
            }
        );
    }

    #[tokio::test]
    async fn missing_token_is_found_with_empty_token() {
        let path = test_path("no-token");
        std::fs::write(&path, r#"{"accounts": {}, "currentAccount": "alice"}"#).unwrap();

        let account = active_account(&path).await.unwrap();
        assert_eq!(account.nickname, "alice");
        assert!(account.token.is_empty());
        assert!(!account.has_token());
    }

    #[tokio::test]
    async fn a_stored_token_is_reported_as_present() {
        let path = test_path("has-token");
        std::fs::write(
            &path,
            r#"{"accounts": {"alice": "tokA"}, "currentAccount": "alice"}"#,
        )
        .unwrap();

        assert!(active_account(&path).await.unwrap().has_token());
    }

    #[tokio::test]
    async fn empty_current_account_is_not_found() {
        let path = test_path("empty-current");
        std::fs::write(&path, r#"{"accounts": {"alice": "tokA"}, "currentAccount": ""}"#).unwrap();

        assert!(matches!(
            active_account(&path).await,
            Err(Error::NoActiveAccount)
        ));
    }

    #[tokio::test]
    async fn missing_file_is_a_read_error() {
        assert!(matches!(
            active_account(test_path("does-not-exist")).await,
            Err(Error::Read { .. })
        ));
    }

    #[tokio::test]
    async fn invalid_json_is_a_json_error() {
        let path = test_path("invalid");
        std::fs::write(&path, "currentAccount = alice").unwrap();

        assert!(matches!(active_account(&path).await, Err(Error::Json { .. })));
    }

    #[tokio::test]
    async fn set_active_account_is_idempotent() {
        let path = test_path("idempotent");
        std::fs::write(
            &path,
            r#"{"accounts": {"bob": "tokB"}, "currentAccount": "bob"}"#,
        )
        .unwrap();

        set_active_account(&path, "alice", "tokA").await.unwrap();
        let once = std::fs::read_to_string(&path).unwrap();

        set_active_account(&path, "alice", "tokA").await.unwrap();
        let twice = std::fs::read_to_string(&path).unwrap();

        assert_eq!(once, twice);

        let account = active_account(&path).await.unwrap();
        assert_eq!(account.nickname, "alice");
        assert_eq!(account.token, "tokA");
    }

    #[tokio::test]
    async fn no_accounts_object_is_not_introduced() {
        let path = test_path("no-accounts");
        std::fs::write(&path, r#"{"currentAccount": "bob"}"#).unwrap();

        set_active_account(&path, "alice", "tokA").await.unwrap();

        let config = LauncherConfig::read(&path).await.unwrap();
        assert_eq!(config.current_account.as_deref(), Some("alice"));
        assert!(config.accounts.is_none());
    }

    #[tokio::test]
    async fn unknown_fields_survive_set_memory_amount() {
        let path = test_path("unknown-fields");
        std::fs::write(
            &path,
            r#"{"currentAccount": "alice", "accounts": {"alice": "tokA"}, "foo": "bar"}"#,
        )
        .unwrap();

        set_memory_amount(&path, 4096).await.unwrap();

        let config = LauncherConfig::read(&path).await.unwrap();
        assert_eq!(config.memory_amount, Some(4096));
        assert_eq!(
            config.other.get("foo"),
            Some(&serde_json::Value::String("bar".into()))
        );
    }
}
