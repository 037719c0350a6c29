//! vpncmd invocation boundary
//!
//! Every operation is one external `vpncmd` process: argv is built here, the
//! child is spawned with its stdout fully buffered, and a timeout guards the
//! wait. The [`VpncmdRunner`] trait is the seam that lets tests substitute
//! scripted transcripts for real processes.

use crate::error::{AdminError, Result};
use crate::report::extract_error_code;
use std::process::Stdio;
use std::time::Duration;

/// One vpncmd command invocation: command keyword plus its arguments.
///
/// The shared argv prefix (`/server host:port /password:... [/hub:...] /cmd`)
/// is supplied at build time so the call itself stays free of credentials.
#[derive(Debug, Clone)]
pub struct VpncmdCall {
    command: &'static str,
    hub: Option<String>,
    args: Vec<String>,
}

impl VpncmdCall {
    pub fn new(command: &'static str) -> Self {
        Self {
            command,
            hub: None,
            args: Vec::new(),
        }
    }

    /// Scope the invocation to a hub (`/hub:<name>` prefix argument).
    pub fn with_hub(mut self, hub: impl Into<String>) -> Self {
        self.hub = Some(hub.into());
        self
    }

    /// Positional argument after the command keyword.
    pub fn arg(mut self, value: impl Into<String>) -> Self {
        self.args.push(value.into());
        self
    }

    /// `/NAME:value` flag argument.
    pub fn flag(mut self, name: &str, value: impl AsRef<str>) -> Self {
        self.args.push(format!("/{}:{}", name, value.as_ref()));
        self
    }

    pub fn command(&self) -> &'static str {
        self.command
    }

    /// Full argv for the given endpoint and password.
    pub fn argv(&self, endpoint: &str, password: &str) -> Vec<String> {
        self.build(endpoint, password)
    }

    /// argv with the password masked, safe for logging.
    pub fn redacted(&self, endpoint: &str) -> Vec<String> {
        self.build(endpoint, "********")
    }

    fn build(&self, endpoint: &str, password: &str) -> Vec<String> {
        let mut argv = vec![
            "/server".to_string(),
            endpoint.to_string(),
            format!("/password:{password}"),
        ];
        if let Some(hub) = &self.hub {
            argv.push(format!("/hub:{hub}"));
        }
        argv.push("/cmd".to_string());
        argv.push(self.command.to_string());
        argv.extend(self.args.iter().cloned());
        argv
    }
}

/// Captured outcome of one vpncmd invocation
#[derive(Debug, Clone)]
pub struct RawOutput {
    /// Exit status was zero
    pub success: bool,
    /// Full captured standard output
    pub stdout: String,
    /// Failure text (stderr, or a synthesized exit-status message)
    pub message: String,
}

impl RawOutput {
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            success: true,
            stdout: stdout.into(),
            message: String::new(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            stdout: String::new(),
            message: message.into(),
        }
    }
}

/// Seam for running the external tool; tests substitute scripted output.
pub trait VpncmdRunner: Send + Sync {
    fn run(
        &self,
        binary: &str,
        argv: &[String],
        timeout: Duration,
    ) -> impl std::future::Future<Output = Result<RawOutput>> + Send;
}

/// Real runner on `tokio::process` with a kill-on-timeout guard
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

impl VpncmdRunner for ProcessRunner {
    async fn run(&self, binary: &str, argv: &[String], timeout: Duration) -> Result<RawOutput> {
        let child = tokio::process::Command::new(binary)
            .args(argv)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output();

        let output = match tokio::time::timeout(timeout, child).await {
            Ok(result) => result?,
            Err(_) => {
                return Err(AdminError::Timeout(format!(
                    "{binary} did not finish within {}s",
                    timeout.as_secs()
                )));
            }
        };

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        if output.status.success() {
            return Ok(RawOutput::ok(stdout));
        }

        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        let message = if stderr.is_empty() {
            match output.status.code() {
                Some(code) => format!("exit status {code}"),
                None => "terminated by signal".to_string(),
            }
        } else {
            stderr
        };
        Ok(RawOutput::failed(message))
    }
}

/// Map a failure message to the invocation error taxonomy: the first embedded
/// digit run is the tool's code; a message without digits is the distinct
/// unknown-failure outcome.
pub fn failure_to_error(message: String) -> AdminError {
    match extract_error_code(&message) {
        Some(code) => AdminError::Invocation { code, message },
        None => AdminError::InvocationUnknown(message),
    }
}
