// src/editor/license.rs

//! License session wrapper: activate, run an operation, always deactivate.

use std::future::Future;

use tracing::{debug, info, warn};

use crate::config::RunConfig;
use crate::editor::args;
use crate::exec::CommandRunner;

/// Run `op` inside a license session.
///
/// Activation failure short-circuits: `op` never runs and no deactivation is
/// attempted. When activation succeeds, deactivation runs exactly once after
/// `op`, whatever `op` returned; its result is logged and discarded.
pub async fn with_license<F, Fut>(config: &RunConfig, runner: &dyn CommandRunner, op: F) -> i32
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = i32>,
{
    let rc = match args::activate_license(config) {
        Some(cmd) => {
            runner
                .run("license activation", &cmd, config.timeouts.license)
                .await
        }
        None => {
            info!(
                license_file = %config.license_file.display(),
                "no license file or credentials; skipping activation"
            );
            0
        }
    };

    if rc != 0 {
        warn!(exit_code = rc, "license activation failed; skipping operation");
        return rc;
    }

    let op_rc = op().await;

    match args::deactivate_license(config) {
        Some(cmd) => {
            let rc = runner
                .run("license deactivation", &cmd, config.timeouts.license)
                .await;
            if rc != 0 {
                warn!(exit_code = rc, "license deactivation failed");
            }
        }
        None => debug!("license deactivation not required"),
    }

    op_rc
}

/// Like [`with_license`], but skips license management entirely on Windows,
/// where the editor install carries its own licensing.
pub async fn with_license_if_required<F, Fut>(
    config: &RunConfig,
    runner: &dyn CommandRunner,
    op: F,
) -> i32
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = i32>,
{
    if cfg!(windows) {
        debug!("license management not required on this platform");
        return op().await;
    }
    with_license(config, runner, op).await
}
