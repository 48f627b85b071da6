// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{ArgAction, Parser, Subcommand, ValueEnum};

use crate::perms;

/// Command-line arguments for `cibatch`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "cibatch",
    version,
    about = "Batch-mode CI helper for editor and Docker invocations.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the defaults file (TOML).
    ///
    /// Default: `Cibatch.toml` in the current working directory. A missing
    /// file is not an error; built-in defaults apply.
    #[arg(long, value_name = "PATH", default_value = "Cibatch.toml")]
    pub config: String,

    /// Path to the editor executable.
    #[arg(long, value_name = "PATH")]
    pub editor_path: Option<String>,

    /// Path to the license file used for file-based activation.
    #[arg(long, value_name = "PATH")]
    pub license_file: Option<String>,

    /// Path to the project.
    #[arg(long, value_name = "PATH")]
    pub project_path: Option<String>,

    /// License username for interactive activation.
    #[arg(long, requires = "password", requires = "serial")]
    pub username: Option<String>,

    /// License password for interactive activation.
    #[arg(long, requires = "username", requires = "serial")]
    pub password: Option<String>,

    /// License serial for interactive activation.
    #[arg(long, requires = "username", requires = "password")]
    pub serial: Option<String>,

    /// Timeout in seconds for license activation/deactivation.
    #[arg(long, value_name = "SECONDS")]
    pub license_timeout_sec: Option<u64>,

    /// Timeout in seconds for the editor test run.
    #[arg(long, value_name = "SECONDS")]
    pub run_timeout_sec: Option<u64>,

    /// Timeout in seconds for each bake phase.
    #[arg(long, value_name = "SECONDS")]
    pub bake_timeout_sec: Option<u64>,

    /// Timeout in seconds for docker commands.
    #[arg(long, value_name = "SECONDS")]
    pub command_timeout_sec: Option<u64>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `CIBATCH_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Run the project's tests under a license session and collect results.
    RunProject,

    /// Initialize and bake the project under a license session.
    BakeProject,

    /// Return the interactive license (no-op when a license file is used).
    DeactivateLicense,

    /// Fix executable permissions for bundled server binaries.
    SetBinariesPermissions {
        /// Relative path to the runtime directory.
        #[arg(long, value_name = "PATH", default_value = perms::DEFAULT_RUNTIME_DIR)]
        runtime_dir: String,
    },

    /// Build the docker image for the sample project.
    DockerBuildSample {
        /// Docker image tag.
        #[arg(short, long, default_value = "sample")]
        tag: String,

        /// Dockerfile path.
        #[arg(short = 'f', long, default_value = ".ci/Dockerfile")]
        dockerfile: String,

        /// Editor version, forwarded as the ENGINE_VERSION build argument.
        #[arg(long, value_name = "VERSION")]
        engine_version: Option<String>,

        /// Base image, forwarded as the BASE build argument.
        #[arg(long, value_name = "IMAGE")]
        image_base: Option<String>,
    },

    /// Run the docker image for the sample project.
    DockerRunSample {
        /// Docker image tag.
        #[arg(short, long, default_value = "sample")]
        tag: String,

        /// Volumes to mount. Overrides the default TestResults volume.
        #[arg(short, long = "volumes", value_name = "HOST:CONTAINER", num_args = 1..)]
        volumes: Vec<String>,

        /// Additional volumes to mount on top of the default ones.
        #[arg(long, value_name = "HOST:CONTAINER", num_args = 1..)]
        additional_volumes: Vec<String>,

        /// Remove the container after the run.
        #[arg(short, long, value_name = "BOOL", default_value_t = true, action = ArgAction::Set)]
        rm: bool,

        /// Working directory inside the container.
        #[arg(short, long, default_value = "/")]
        workdir: String,

        /// Custom entrypoint.
        #[arg(short, long)]
        entrypoint: Option<String>,

        /// Arguments passed through to the editor inside the container.
        #[arg(
            short = 'a',
            long = "editor-args",
            value_name = "ARG",
            num_args = 1..,
            allow_hyphen_values = true
        )]
        editor_args: Vec<String>,
    },
}

impl Command {
    /// Subcommand name as spelled on the command line.
    pub fn name(&self) -> &'static str {
        match self {
            Command::RunProject => "run-project",
            Command::BakeProject => "bake-project",
            Command::DeactivateLicense => "deactivate-license",
            Command::SetBinariesPermissions { .. } => "set-binaries-permissions",
            Command::DockerBuildSample { .. } => "docker-build-sample",
            Command::DockerRunSample { .. } => "docker-run-sample",
        }
    }
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
