// src/config/model.rs

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

/// Built-in defaults applied when neither the CLI nor the defaults file
/// provides a value.
pub const DEFAULT_EDITOR_PATH: &str = "unity-editor";
pub const DEFAULT_PROJECT_PATH: &str = ".";
pub const DEFAULT_LICENSE_FILE: &str = ".ci/Unity_v2020.x.ulf";
pub const DEFAULT_LICENSE_TIMEOUT_SEC: u64 = 60;
pub const DEFAULT_RUN_TIMEOUT_SEC: u64 = 600;
pub const DEFAULT_BAKE_TIMEOUT_SEC: u64 = 240;
pub const DEFAULT_COMMAND_TIMEOUT_SEC: u64 = 600;

/// Top-level defaults file as read from TOML.
///
/// ```toml
/// [editor]
/// path = "unity-editor"
/// project_path = "steam-integration-sample"
/// license_file = ".ci/Unity_v2020.x.ulf"
///
/// [timeouts]
/// run_sec = 600
/// bake_sec = 240
/// license_sec = 60
/// ```
///
/// All sections and keys are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    /// `[editor]` section.
    #[serde(default)]
    pub editor: EditorSection,

    /// `[timeouts]` section.
    #[serde(default)]
    pub timeouts: TimeoutsSection,
}

/// `[editor]` section of the defaults file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EditorSection {
    #[serde(default)]
    pub path: Option<String>,

    #[serde(default)]
    pub project_path: Option<String>,

    #[serde(default)]
    pub license_file: Option<String>,
}

/// `[timeouts]` section of the defaults file. Values are seconds.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TimeoutsSection {
    #[serde(default)]
    pub license_sec: Option<u64>,

    #[serde(default)]
    pub run_sec: Option<u64>,

    #[serde(default)]
    pub bake_sec: Option<u64>,

    #[serde(default)]
    pub command_sec: Option<u64>,
}

/// Interactive license credentials.
///
/// These must never reach logs in clear text; the `Debug` impl redacts all
/// three values, and command-line logging goes through
/// [`crate::exec::mask_credentials`].
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
    pub serial: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &"*****")
            .field("password", &"*****")
            .field("serial", &"*****")
            .finish()
    }
}

/// Per-phase timeouts, resolved to durations.
#[derive(Debug, Clone, Copy)]
pub struct Timeouts {
    pub license: Duration,
    pub run: Duration,
    pub bake: Duration,
    pub command: Duration,
}

/// Resolved run configuration.
///
/// Constructed once at startup from CLI arguments merged over the optional
/// defaults file merged over built-in defaults; read-only afterwards. Every
/// operation receives it as a parameter; there is no ambient global state.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub editor_path: PathBuf,
    pub project_path: PathBuf,
    pub license_file: PathBuf,
    pub credentials: Option<Credentials>,
    pub timeouts: Timeouts,
}

impl RunConfig {
    /// Whether file-based license activation is available.
    pub fn license_file_exists(&self) -> bool {
        self.license_file.is_file()
    }
}
