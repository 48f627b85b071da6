// src/lib.rs

pub mod cli;
pub mod config;
pub mod docker;
pub mod editor;
pub mod errors;
pub mod exec;
pub mod logging;
pub mod ops;
pub mod perms;
pub mod results;

use std::path::Path;

use tracing::info;

use crate::cli::{CliArgs, Command};
use crate::docker::{DockerBuildOptions, DockerRunOptions};
use crate::errors::Result;
use crate::exec::ProcessRunner;

/// High-level entry point used by `main.rs`.
///
/// Resolves the run configuration once, then dispatches to the requested
/// operation. The returned value is the process exit code: the underlying
/// tool's code, [`exec::TIMEOUT_EXIT_CODE`], or
/// [`exec::INTERNAL_ERROR_EXIT_CODE`].
pub async fn run(args: CliArgs) -> Result<i32> {
    let config = config::resolve(&args)?;
    let runner = ProcessRunner;

    info!(command = args.command.name(), "running command");

    let code = match args.command {
        Command::RunProject => ops::run_project(&config, &runner).await,

        Command::BakeProject => ops::bake_project(&config, &runner).await,

        Command::DeactivateLicense => ops::deactivate_license(&config, &runner).await,

        Command::SetBinariesPermissions { runtime_dir } => {
            perms::set_binaries_permissions(Path::new(&runtime_dir))?;
            0
        }

        Command::DockerBuildSample {
            tag,
            dockerfile,
            engine_version,
            image_base,
        } => {
            let mut build_args = Vec::new();
            if let Some(version) = engine_version {
                build_args.push(("ENGINE_VERSION".to_string(), version));
            }
            if let Some(base) = image_base {
                build_args.push(("BASE".to_string(), base));
            }

            let opts = DockerBuildOptions {
                tag,
                dockerfile,
                build_args,
            };
            ops::docker_build(&config, &runner, opts).await
        }

        Command::DockerRunSample {
            tag,
            volumes,
            additional_volumes,
            rm,
            workdir,
            entrypoint,
            editor_args,
        } => {
            let volumes = if volumes.is_empty() {
                docker::default_volumes()
            } else {
                volumes
            };

            let opts = DockerRunOptions {
                tag,
                rm,
                workdir,
                entrypoint,
                editor_args,
                volumes: volumes.into_iter().chain(additional_volumes).collect(),
            };
            ops::docker_run(&config, &runner, opts).await?
        }
    };

    Ok(code)
}
