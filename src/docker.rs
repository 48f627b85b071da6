// src/docker.rs

//! Builders for `docker build` / `docker run` command lines.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::errors::Result;
use crate::exec::CommandLine;
use crate::results::TEST_RESULTS_DIR;

/// Parameters for `docker build`.
#[derive(Debug, Clone)]
pub struct DockerBuildOptions {
    pub tag: String,
    pub dockerfile: String,
    /// `--build-arg` key/value pairs, in order.
    pub build_args: Vec<(String, String)>,
}

/// Parameters for `docker run`.
#[derive(Debug, Clone)]
pub struct DockerRunOptions {
    pub tag: String,
    pub rm: bool,
    pub workdir: String,
    /// `host:container` mount specs.
    pub volumes: Vec<String>,
    pub entrypoint: Option<String>,
    /// Arguments appended after the image, passed through to the editor.
    pub editor_args: Vec<String>,
}

/// `docker build -t <tag> -f <dockerfile> [--build-arg K=V]... .`
pub fn build_command(opts: &DockerBuildOptions) -> CommandLine {
    let mut cmd = CommandLine::new("docker")
        .arg("build")
        .arg("-t")
        .arg(opts.tag.as_str())
        .arg("-f")
        .arg(opts.dockerfile.as_str());

    for (key, value) in &opts.build_args {
        cmd = cmd.arg("--build-arg").arg(format!("{key}={value}"));
    }

    cmd.arg(".")
}

/// `docker run [--rm] [-w <dir>] [-v host:container]... [--entrypoint <e>]
/// <tag> [editor args]...`
///
/// Each volume's host mount point is created first so Docker does not invent
/// it with root ownership.
pub fn run_command(opts: &DockerRunOptions) -> Result<CommandLine> {
    let mut cmd = CommandLine::new("docker").arg("run");

    if opts.rm {
        cmd = cmd.arg("--rm");
    }

    cmd = cmd.arg("-w").arg(opts.workdir.as_str());

    for volume in &opts.volumes {
        ensure_volume_path(volume)?;
        cmd = cmd.arg("-v").arg(volume.as_str());
    }

    if let Some(entrypoint) = &opts.entrypoint {
        cmd = cmd.arg("--entrypoint").arg(entrypoint.as_str());
    }

    Ok(cmd
        .arg(opts.tag.as_str())
        .args(opts.editor_args.iter().cloned()))
}

/// Default mount: the local results directory mapped into the container.
pub fn default_volumes() -> Vec<String> {
    let host = std::env::current_dir()
        .map(|cwd| cwd.join(TEST_RESULTS_DIR))
        .unwrap_or_else(|_| PathBuf::from(TEST_RESULTS_DIR));
    vec![format!("{}:/{TEST_RESULTS_DIR}", host.display())]
}

/// Create the host side of a `host:container` mount spec if missing.
fn ensure_volume_path(volume: &str) -> Result<()> {
    let Some((host, _)) = volume.split_once(':') else {
        return Ok(());
    };

    if !Path::new(host).exists() {
        debug!(host, "creating volume mount point");
        fs::create_dir_all(host)?;
    }
    Ok(())
}
