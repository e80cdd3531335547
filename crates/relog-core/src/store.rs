use std::{fmt, path::Path};

use indexmap::IndexMap;
use serde::{
    de::{MapAccess, Visitor},
    ser::SerializeMap,
    Deserialize, Serialize,
};

use crate::{
    error::{Error, Result},
    fs::{write_json_config, write_json_config_sync},
};

const LAST_FILE_PATH: &str = "last_file_path";
const LAST_PROGRAM_PATH: &str = "last_program_path";
const LAST_TXT_PATH: &str = "last_txt_path";

/// Paths the user picked last time, so the pickers can be pre-filled
/// on the next start.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LastPaths {
    pub launcher_config: Option<String>,
    pub game: Option<String>,
    pub options: Option<String>,
}

/// Saved nickname/token pairs plus the last used paths.
///
/// The on-disk format is the historical one: a single flat JSON object
/// where three reserved keys (`last_file_path`, `last_program_path`,
/// `last_txt_path`) live next to the nicknames. In memory the two kinds
/// of data are separate fields, so enumerating [`AccountStore::accounts`]
/// can never yield a reserved key.
#[derive(Default, Clone, PartialEq, Eq)]
pub struct AccountStore {
    accounts: IndexMap<String, String>,
    pub paths: LastPaths,
}

// Tokens are secrets; only the nicknames show up in debug output.
impl fmt::Debug for AccountStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccountStore")
            .field("accounts", &self.accounts.keys().collect::<Vec<_>>())
            .field("paths", &self.paths)
            .finish()
    }
}

impl AccountStore {
    /// Reads the store from `path`.
    ///
    /// A missing or unparseable file yields an empty store. Losing the
    /// saved accounts to a stray edit is annoying but not fatal, so the
    /// parse failure is only logged.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();

        let string = match std::fs::read_to_string(path) {
            Ok(string) => string,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Self::default(),
            Err(err) => {
                tracing::warn!("Cannot read the accounts store {}: {err}", path.to_string_lossy());
                return Self::default();
            }
        };

        match serde_json::from_str(&string) {
            Ok(store) => store,
            Err(err) => {
                tracing::warn!(
                    "The accounts store {} is not valid JSON, starting with an empty one: {err}",
                    path.to_string_lossy()
                );
                Self::default()
            }
        }
    }

    /// Overwrites the file at `path` with the full store.
    pub async fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        write_json_config(self, path).await
    }

    pub fn save_sync(&self, path: impl AsRef<Path>) -> Result<()> {
        write_json_config_sync(self, path)
    }

    pub fn accounts(&self) -> &IndexMap<String, String> {
        &self.accounts
    }

    /// Inserts the pair, overwriting the token if the nickname is
    /// already stored.
    pub fn add_account(&mut self, nickname: impl Into<String>, token: impl Into<String>) {
        self.accounts.insert(nickname.into(), token.into());
    }

    pub fn delete_account(&mut self, nickname: &str) -> Result<()> {
        self.accounts
            .shift_remove(nickname)
            .map(|_| ())
            .ok_or_else(|| Error::AccountNotFound(nickname.to_owned()))
    }
}

impl Serialize for AccountStore {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let paths = [
            (LAST_FILE_PATH, &self.paths.launcher_config),
            (LAST_PROGRAM_PATH, &self.paths.game),
            (LAST_TXT_PATH, &self.paths.options),
        ];

        let len = self.accounts.len() + paths.iter().filter(|(_, path)| path.is_some()).count();
        let mut map = serializer.serialize_map(Some(len))?;

        for (nickname, token) in &self.accounts {
            map.serialize_entry(nickname, token)?;
        }
        for (key, path) in paths {
            if let Some(path) = path {
                map.serialize_entry(key, path)?;
            }
        }

        map.end()
    }
}

struct AccountStoreVisitor;

impl<'de> Visitor<'de> for AccountStoreVisitor {
    type Value = AccountStore;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("a map of nicknames and reserved path keys to strings")
    }

    fn visit_map<A>(self, mut access: A) -> std::result::Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut store = AccountStore::default();

        while let Some((key, value)) = access.next_entry::<String, String>()? {
            match key.as_str() {
                LAST_FILE_PATH => store.paths.launcher_config = Some(value),
                LAST_PROGRAM_PATH => store.paths.game = Some(value),
                LAST_TXT_PATH => store.paths.options = Some(value),
                _ => {
                    store.accounts.insert(key, value);
                }
            }
        }

        Ok(store)
    }
}

impl<'de> Deserialize<'de> for AccountStore {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_map(AccountStoreVisitor)
    }
}
