// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::debug;

use crate::cli::CliArgs;
use crate::config::model::{
    ConfigFile, Credentials, RunConfig, Timeouts, DEFAULT_BAKE_TIMEOUT_SEC,
    DEFAULT_COMMAND_TIMEOUT_SEC, DEFAULT_EDITOR_PATH, DEFAULT_LICENSE_FILE,
    DEFAULT_LICENSE_TIMEOUT_SEC, DEFAULT_PROJECT_PATH, DEFAULT_RUN_TIMEOUT_SEC,
};
use crate::errors::{CibatchError, Result};

/// Load the defaults file from a given path.
///
/// A missing file is not an error: built-in defaults apply and CI jobs are
/// not forced to carry a `Cibatch.toml`.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<ConfigFile> {
    let path = path.as_ref();
    if !path.is_file() {
        debug!(path = %path.display(), "no defaults file; using built-in defaults");
        return Ok(ConfigFile::default());
    }

    let contents = fs::read_to_string(path)?;
    let config: ConfigFile = toml::from_str(&contents)?;
    Ok(config)
}

/// Build the resolved [`RunConfig`] from CLI arguments.
///
/// Precedence, highest first: CLI flag, defaults file value, built-in default.
pub fn resolve(args: &CliArgs) -> Result<RunConfig> {
    let file = load_from_path(&args.config)?;

    let editor_path = args
        .editor_path
        .clone()
        .or(file.editor.path)
        .unwrap_or_else(|| DEFAULT_EDITOR_PATH.to_string());

    let project_path = args
        .project_path
        .clone()
        .or(file.editor.project_path)
        .unwrap_or_else(|| DEFAULT_PROJECT_PATH.to_string());

    let license_file = args
        .license_file
        .clone()
        .or(file.editor.license_file)
        .unwrap_or_else(|| DEFAULT_LICENSE_FILE.to_string());

    let timeouts = Timeouts {
        license: timeout_from_secs(
            "license",
            args.license_timeout_sec
                .or(file.timeouts.license_sec)
                .unwrap_or(DEFAULT_LICENSE_TIMEOUT_SEC),
        )?,
        run: timeout_from_secs(
            "run",
            args.run_timeout_sec
                .or(file.timeouts.run_sec)
                .unwrap_or(DEFAULT_RUN_TIMEOUT_SEC),
        )?,
        bake: timeout_from_secs(
            "bake",
            args.bake_timeout_sec
                .or(file.timeouts.bake_sec)
                .unwrap_or(DEFAULT_BAKE_TIMEOUT_SEC),
        )?,
        command: timeout_from_secs(
            "command",
            args.command_timeout_sec
                .or(file.timeouts.command_sec)
                .unwrap_or(DEFAULT_COMMAND_TIMEOUT_SEC),
        )?,
    };

    let credentials = resolve_credentials(args)?;

    Ok(RunConfig {
        editor_path: PathBuf::from(editor_path),
        project_path: PathBuf::from(project_path),
        license_file: PathBuf::from(license_file),
        credentials,
        timeouts,
    })
}

fn timeout_from_secs(name: &str, secs: u64) -> Result<Duration> {
    if secs == 0 {
        return Err(CibatchError::Config(format!(
            "{name} timeout must be positive"
        )));
    }
    Ok(Duration::from_secs(secs))
}

/// Credentials are all-or-nothing. `clap` already enforces this for the CLI;
/// this guards any other construction path.
fn resolve_credentials(args: &CliArgs) -> Result<Option<Credentials>> {
    match (&args.username, &args.password, &args.serial) {
        (Some(username), Some(password), Some(serial)) => Ok(Some(Credentials {
            username: username.clone(),
            password: password.clone(),
            serial: serial.clone(),
        })),
        (None, None, None) => Ok(None),
        _ => Err(CibatchError::Config(
            "username, password and serial must be provided together".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use clap::Parser;

    use super::*;

    fn args(argv: &[&str]) -> CliArgs {
        let mut full = vec!["cibatch"];
        full.extend_from_slice(argv);
        full.push("run-project");
        CliArgs::parse_from(full)
    }

    #[test]
    fn built_in_defaults_apply_without_file_or_flags() {
        let config = resolve(&args(&["--config", "does-not-exist.toml"])).unwrap();

        assert_eq!(config.editor_path, PathBuf::from("unity-editor"));
        assert_eq!(config.project_path, PathBuf::from("."));
        assert_eq!(config.license_file, PathBuf::from(".ci/Unity_v2020.x.ulf"));
        assert!(config.credentials.is_none());
        assert_eq!(config.timeouts.license, Duration::from_secs(60));
        assert_eq!(config.timeouts.run, Duration::from_secs(600));
        assert_eq!(config.timeouts.bake, Duration::from_secs(240));
        assert_eq!(config.timeouts.command, Duration::from_secs(600));
    }

    #[test]
    fn cli_flags_override_file_values() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[editor]
path = "from-file"
project_path = "file-project"

[timeouts]
run_sec = 120
"#
        )
        .unwrap();

        let path = file.path().to_str().unwrap().to_string();
        let config = resolve(&args(&[
            "--config",
            &path,
            "--editor-path",
            "from-cli",
            "--run-timeout-sec",
            "30",
        ]))
        .unwrap();

        // CLI wins over file.
        assert_eq!(config.editor_path, PathBuf::from("from-cli"));
        assert_eq!(config.timeouts.run, Duration::from_secs(30));
        // File wins over built-in default.
        assert_eq!(config.project_path, PathBuf::from("file-project"));
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let err = resolve(&args(&[
            "--config",
            "does-not-exist.toml",
            "--bake-timeout-sec",
            "0",
        ]))
        .unwrap_err();

        assert!(matches!(err, CibatchError::Config(_)));
    }

    #[test]
    fn credentials_require_all_three_flags() {
        let config = resolve(&args(&[
            "--config",
            "does-not-exist.toml",
            "--username",
            "alice",
            "--password",
            "secret",
            "--serial",
            "XYZ123",
        ]))
        .unwrap();

        let creds = config.credentials.unwrap();
        assert_eq!(creds.username, "alice");
        assert_eq!(creds.serial, "XYZ123");
    }

    #[test]
    fn credentials_debug_is_redacted() {
        let creds = Credentials {
            username: "alice".into(),
            password: "secret".into(),
            serial: "XYZ123".into(),
        };

        let rendered = format!("{creds:?}");
        assert!(!rendered.contains("alice"));
        assert!(!rendered.contains("secret"));
        assert!(!rendered.contains("XYZ123"));
    }

    #[test]
    fn malformed_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "this is not toml [").unwrap();

        let path = file.path().to_str().unwrap().to_string();
        let err = resolve(&args(&["--config", &path])).unwrap_err();

        assert!(matches!(err, CibatchError::Toml(_)));
    }
}
