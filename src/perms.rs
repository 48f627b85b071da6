// src/perms.rs

//! Executable-bit fixes for the bundled replication-server binaries.
//!
//! Archive extraction in CI loses the executable bit, so the Linux and macOS
//! server binaries under the runtime directory get chmod'd before use.

use std::path::Path;

use crate::errors::Result;

/// Default runtime directory, relative to the repository root.
pub const DEFAULT_RUNTIME_DIR: &str = "sdk/.Runtime";

#[cfg(unix)]
const SERVER_BINARY: &str = "replication-server";

#[cfg(unix)]
const PLATFORM_DIRS: [&str; 2] = ["linux", "darwin"];

/// Mark the bundled server binaries executable (0755).
///
/// A missing binary is an error; a broken SDK layout should fail the job
/// loudly rather than surface later as a cryptic exec failure.
#[cfg(unix)]
pub fn set_binaries_permissions(runtime_dir: &Path) -> Result<()> {
    use std::fs;
    use std::os::unix::fs::PermissionsExt;

    use anyhow::Context;
    use tracing::info;

    for platform in PLATFORM_DIRS {
        let path = runtime_dir.join(platform).join(SERVER_BINARY);

        let mut perms = fs::metadata(&path)
            .with_context(|| format!("reading metadata for {}", path.display()))?
            .permissions();
        perms.set_mode(0o755);
        fs::set_permissions(&path, perms)
            .with_context(|| format!("setting permissions for {}", path.display()))?;

        let mode = fs::metadata(&path)?.permissions().mode();
        info!(path = %path.display(), mode = format!("{mode:o}"), "set binary permissions");
    }

    Ok(())
}

/// Windows has no executable bit; nothing to do.
#[cfg(not(unix))]
pub fn set_binaries_permissions(_runtime_dir: &Path) -> Result<()> {
    Ok(())
}

#[cfg(all(test, unix))]
mod tests {
    use std::fs;
    use std::os::unix::fs::PermissionsExt;

    use super::*;

    #[test]
    fn marks_both_server_binaries_executable() {
        let dir = tempfile::tempdir().unwrap();
        for platform in ["linux", "darwin"] {
            let bin_dir = dir.path().join(platform);
            fs::create_dir_all(&bin_dir).unwrap();
            let bin = bin_dir.join("replication-server");
            fs::write(&bin, b"#!/bin/sh\n").unwrap();
            fs::set_permissions(&bin, fs::Permissions::from_mode(0o644)).unwrap();
        }

        set_binaries_permissions(dir.path()).unwrap();

        for platform in ["linux", "darwin"] {
            let bin = dir.path().join(platform).join("replication-server");
            let mode = fs::metadata(&bin).unwrap().permissions().mode();
            assert_eq!(mode & 0o777, 0o755);
        }
    }

    #[test]
    fn missing_binary_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(set_binaries_permissions(dir.path()).is_err());
    }
}
