// src/ops.rs

//! Top-level operations behind each CLI subcommand.

use std::path::Path;

use tracing::{info, warn};

use crate::config::RunConfig;
use crate::docker::{self, DockerBuildOptions, DockerRunOptions};
use crate::editor::args::{self, BAKE_METHOD, INITIALIZE_METHOD, TEST_RESULTS_FILE};
use crate::editor::license::with_license_if_required;
use crate::errors::Result;
use crate::exec::CommandRunner;
use crate::results;

/// Run the project's editor tests inside a license session and collect the
/// results file afterwards (best-effort).
pub async fn run_project(config: &RunConfig, runner: &dyn CommandRunner) -> i32 {
    with_license_if_required(config, runner, || async move {
        let cmd = args::run_tests(config);
        let rc = runner.run("project tests", &cmd, config.timeouts.run).await;

        let src = config.project_path.join(TEST_RESULTS_FILE);
        let dst = Path::new(results::TEST_RESULTS_DIR).join(TEST_RESULTS_FILE);
        results::collect_results(&src, &dst);

        rc
    })
    .await
}

/// Initialize then bake the project inside a license session. The bake phase
/// only runs when initialization succeeded.
pub async fn bake_project(config: &RunConfig, runner: &dyn CommandRunner) -> i32 {
    with_license_if_required(config, runner, || async move {
        let init = args::execute_method(config, INITIALIZE_METHOD);
        let rc = runner
            .run("project initialize", &init, config.timeouts.bake)
            .await;

        if rc != 0 {
            warn!(exit_code = rc, "initialize phase failed; skipping bake");
            return rc;
        }

        let bake = args::execute_method(config, BAKE_METHOD);
        runner.run("project bake", &bake, config.timeouts.bake).await
    })
    .await
}

/// Return the interactive license; no-op success with file-based activation.
pub async fn deactivate_license(config: &RunConfig, runner: &dyn CommandRunner) -> i32 {
    match args::deactivate_license(config) {
        Some(cmd) => {
            runner
                .run("license deactivation", &cmd, config.timeouts.license)
                .await
        }
        None => {
            info!("license file configured; deactivation not required");
            0
        }
    }
}

/// Build the sample project's docker image.
pub async fn docker_build(
    config: &RunConfig,
    runner: &dyn CommandRunner,
    opts: DockerBuildOptions,
) -> i32 {
    let cmd = docker::build_command(&opts);
    runner.run("docker build", &cmd, config.timeouts.command).await
}

/// Run the sample project's docker image.
pub async fn docker_run(
    config: &RunConfig,
    runner: &dyn CommandRunner,
    opts: DockerRunOptions,
) -> Result<i32> {
    let cmd = docker::run_command(&opts)?;
    Ok(runner.run("docker run", &cmd, config.timeouts.command).await)
}
