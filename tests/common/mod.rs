// tests/common/mod.rs

//! Shared test helpers: a recording, scripted `CommandRunner` and a
//! `RunConfig` builder.

use std::collections::HashMap;
use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use std::sync::Mutex;
use std::time::Duration;

use cibatch::config::{Credentials, RunConfig, Timeouts};
use cibatch::exec::{CommandLine, CommandRunner};

#[derive(Debug, Clone)]
pub struct Call {
    pub name: String,
    pub display: String,
}

/// Fake runner: records every invocation and returns scripted exit codes
/// (default 0) without spawning any process.
#[derive(Default)]
pub struct FakeRunner {
    codes: HashMap<&'static str, i32>,
    calls: Mutex<Vec<Call>>,
}

impl FakeRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_code(mut self, name: &'static str, code: i32) -> Self {
        self.codes.insert(name, code);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_names(&self) -> Vec<String> {
        self.calls().into_iter().map(|call| call.name).collect()
    }
}

impl CommandRunner for FakeRunner {
    fn run<'a>(
        &'a self,
        name: &'a str,
        cmdline: &'a CommandLine,
        _timeout: Duration,
    ) -> Pin<Box<dyn Future<Output = i32> + Send + 'a>> {
        self.calls.lock().unwrap().push(Call {
            name: name.to_string(),
            display: cmdline.display(),
        });
        let code = self.codes.get(name).copied().unwrap_or(0);
        Box::pin(async move { code })
    }
}

pub fn test_config(license_file: PathBuf, credentials: Option<Credentials>) -> RunConfig {
    RunConfig {
        editor_path: PathBuf::from("unity-editor"),
        project_path: PathBuf::from("sample"),
        license_file,
        credentials,
        timeouts: Timeouts {
            license: Duration::from_secs(60),
            run: Duration::from_secs(600),
            bake: Duration::from_secs(240),
            command: Duration::from_secs(600),
        },
    }
}

pub fn test_credentials() -> Credentials {
    Credentials {
        username: "alice".into(),
        password: "secret".into(),
        serial: "XYZ123".into(),
    }
}
