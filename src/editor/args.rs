// src/editor/args.rs

//! Pure builders for editor command lines.
//!
//! No process execution happens here; every function maps a [`RunConfig`]
//! (plus operation-specific parameters) to a [`CommandLine`].

use crate::config::RunConfig;
use crate::exec::CommandLine;

/// Results file produced by the editor test run, relative to the project.
pub const TEST_RESULTS_FILE: &str = "unit-test-results.xml";

/// Test platform passed to the editor.
pub const TEST_PLATFORM: &str = "EditMode";

/// Static method run by the first bake phase.
pub const INITIALIZE_METHOD: &str = "CiEntryPoints.Initialize";

/// Static method run by the second bake phase.
pub const BAKE_METHOD: &str = "CiEntryPoints.Bake";

/// Flags prepended to every editor invocation unless suppressed: batch mode,
/// no graphics, auto-accept API updates, log to console.
const COMMON_ARGS: [&str; 5] = [
    "-accept-apiupdate",
    "-batchmode",
    "-logfile",
    "-",
    "-nographics",
];

/// Base editor invocation, with the common flags unless suppressed.
pub fn editor_command(config: &RunConfig, use_common_args: bool) -> CommandLine {
    let cmd = CommandLine::new(&config.editor_path);
    if use_common_args {
        cmd.args(COMMON_ARGS)
    } else {
        cmd
    }
}

/// License activation command.
///
/// File-based activation when the license file exists; interactive
/// credential-based activation otherwise. `None` when neither source is
/// available (callers treat that as success without running the editor).
pub fn activate_license(config: &RunConfig) -> Option<CommandLine> {
    if config.license_file_exists() {
        return Some(
            editor_command(config, true)
                .arg("-manualLicenseFile")
                .arg(config.license_file.display().to_string()),
        );
    }

    let creds = config.credentials.as_ref()?;
    Some(
        editor_command(config, true)
            .arg("-username")
            .arg(creds.username.as_str())
            .arg("-password")
            .arg(creds.password.as_str())
            .arg("-serial")
            .arg(creds.serial.as_str())
            .arg("-quit"),
    )
}

/// License deactivation command.
///
/// File-based activation needs no return step, so `None` when the license
/// file exists. Otherwise the interactive license is returned; credential
/// flags are included when configured.
pub fn deactivate_license(config: &RunConfig) -> Option<CommandLine> {
    if config.license_file_exists() {
        return None;
    }

    let mut cmd = editor_command(config, true).arg("-returnlicense");
    if let Some(creds) = &config.credentials {
        cmd = cmd
            .arg("-username")
            .arg(creds.username.as_str())
            .arg("-password")
            .arg(creds.password.as_str())
            .arg("-serial")
            .arg(creds.serial.as_str());
    }
    Some(cmd.arg("-quit"))
}

/// Editor test run over the configured project. The results file path is
/// anchored under the project directory, matching where collection looks
/// for it afterwards.
pub fn run_tests(config: &RunConfig) -> CommandLine {
    editor_command(config, true)
        .arg("-projectPath")
        .arg(config.project_path.display().to_string())
        .arg("-runTests")
        .arg("-testResults")
        .arg(config.project_path.join(TEST_RESULTS_FILE).display().to_string())
        .arg("-testPlatform")
        .arg(TEST_PLATFORM)
}

/// One bake phase: open the project, run a static method, quit.
pub fn execute_method(config: &RunConfig, method: &str) -> CommandLine {
    editor_command(config, true)
        .arg("-quit")
        .arg("-projectPath")
        .arg(config.project_path.display().to_string())
        .arg("-executeMethod")
        .arg(method)
}
