pub const DOT_RELOG_DIR: &str = "./.relog";
pub const DOT_RELOG_ACCOUNTS_CONFIG: &str = "./.relog/Accounts.json";
pub const DOT_RELOG_LOGS_DIR: &str = "./.relog/logs";

/// Seconds to wait between two launches. The launcher performs its own
/// login against the session server on startup and launching two copies
/// back-to-back makes them race for it.
pub const LAUNCH_DELAY_SECS: u64 = 5;

/// How many leading characters of a token are shown by [`masked`].
///
/// [`masked`]: crate::launch::Account::masked
pub const TOKEN_PREVIEW_LEN: usize = 5;

pub const RELOG_VERSION: &str = "0.1.0";
pub const RELOG_NAME: &str = "Relog";
