//! Admin Client - control-plane operations against a `SoftEther` VPN server
//!
//! This module provides the main `AdminClient` struct that drives the
//! external vpncmd tool: one invocation per operation, output parsed through
//! the report core into typed records. Parameter contracts are checked
//! before any process is started.

use crate::config::Config;
use crate::error::{AdminError, Result};
use crate::invoke::{failure_to_error, ProcessRunner, VpncmdCall, VpncmdRunner};
use crate::records::{
    SessionDetail, SessionSummary, ServerStatus, UserDetail, UserSummary, SESSION_LIST_LAYOUT,
    SINGLE_LAYOUT, USER_LIST_LAYOUT,
};
use crate::report::{assemble_record, report_pairs, ListAssembler};
use std::time::Duration;

/// Request for the user-creation operation.
///
/// Name and real name are mandatory; the note defaults to empty. Validation
/// happens at the boundary, before vpncmd is spawned.
#[derive(Debug, Clone)]
pub struct CreateUserRequest {
    pub name: String,
    pub real_name: String,
    pub note: Option<String>,
}

impl CreateUserRequest {
    pub fn new(name: impl Into<String>, real_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            real_name: real_name.into(),
            note: None,
        }
    }

    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    fn validate(&self) -> Result<()> {
        require(&self.name, "user name")?;
        require(&self.real_name, "real name")?;
        Ok(())
    }
}

/// `SoftEther` VPN admin client
///
/// Wraps one server endpoint and drives vpncmd for every operation. The
/// runner type parameter is the process seam; production code uses the
/// default [`ProcessRunner`], tests inject scripted runners.
pub struct AdminClient<R: VpncmdRunner = ProcessRunner> {
    config: Config,
    runner: R,
}

impl AdminClient<ProcessRunner> {
    /// Create a client that spawns real vpncmd processes
    ///
    /// # Errors
    /// Returns an error if the configuration is invalid
    pub fn new(config: Config) -> Result<Self> {
        Self::with_runner(config, ProcessRunner)
    }
}

impl<R: VpncmdRunner> AdminClient<R> {
    /// Create a client with a custom runner
    pub fn with_runner(config: Config, runner: R) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, runner })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Get server-wide status (`ServerStatusGet`)
    pub async fn server_status(&self) -> Result<ServerStatus> {
        let stdout = self.invoke(VpncmdCall::new("ServerStatusGet")).await?;
        let record = assemble_record(report_pairs(&stdout), SINGLE_LAYOUT);
        if record.is_empty() {
            return Err(AdminError::NotFound("server status report was empty".to_string()));
        }
        Ok(ServerStatus::from_record(&record))
    }

    /// List sessions in the configured hub (`SessionList`)
    pub async fn session_list(&self) -> Result<Vec<SessionSummary>> {
        let call = VpncmdCall::new("SessionList").with_hub(self.hub()?);
        let stdout = self.invoke(call).await?;
        let records = ListAssembler::assemble(report_pairs(&stdout), SESSION_LIST_LAYOUT);
        Ok(records.iter().map(SessionSummary::from_record).collect())
    }

    /// Get one session's detail (`SessionGet`)
    pub async fn session_info(&self, session_name: &str) -> Result<SessionDetail> {
        require(session_name, "session name")?;
        let call = VpncmdCall::new("SessionGet")
            .with_hub(self.hub()?)
            .arg(session_name);
        let stdout = self.invoke(call).await?;
        let record = assemble_record(report_pairs(&stdout), SINGLE_LAYOUT);
        if record.is_empty() {
            return Err(AdminError::NotFound(format!("session {session_name:?}")));
        }
        Ok(SessionDetail::from_record(&record))
    }

    /// List users in the configured hub (`UserList`)
    pub async fn user_list(&self) -> Result<Vec<UserSummary>> {
        let call = VpncmdCall::new("UserList").with_hub(self.hub()?);
        let stdout = self.invoke(call).await?;
        let records = ListAssembler::assemble(report_pairs(&stdout), USER_LIST_LAYOUT);
        Ok(records.iter().map(UserSummary::from_record).collect())
    }

    /// Get one user's detail (`UserGet`)
    pub async fn user_info(&self, user_name: &str) -> Result<UserDetail> {
        require(user_name, "user name")?;
        let call = VpncmdCall::new("UserGet")
            .with_hub(self.hub()?)
            .arg(user_name);
        let stdout = self.invoke(call).await?;
        let record = assemble_record(report_pairs(&stdout), SINGLE_LAYOUT);
        if record.is_empty() {
            return Err(AdminError::NotFound(format!("user {user_name:?}")));
        }
        Ok(UserDetail::from_record(&record))
    }

    /// Create a user in the configured hub (`UserCreate`)
    pub async fn create_user(&self, request: &CreateUserRequest) -> Result<()> {
        request.validate()?;
        let call = VpncmdCall::new("UserCreate")
            .with_hub(self.hub()?)
            .arg(&request.name)
            .flag("REALNAME", &request.real_name)
            .flag("NOTE", request.note.as_deref().unwrap_or(""))
            .flag("GROUP", "");
        self.invoke(call).await?;
        Ok(())
    }

    /// Update a user's real name and note (`UserSet`)
    pub async fn update_user(&self, user_name: &str, real_name: &str, note: &str) -> Result<()> {
        require(user_name, "user name")?;
        require(real_name, "real name")?;
        let call = VpncmdCall::new("UserSet")
            .with_hub(self.hub()?)
            .arg(user_name)
            .flag("REALNAME", real_name)
            .flag("NOTE", note)
            .flag("GROUP", "");
        self.invoke(call).await?;
        Ok(())
    }

    /// Set a user's password (`UserPasswordSet`)
    pub async fn set_user_password(&self, user_name: &str, password: &str) -> Result<()> {
        require(user_name, "user name")?;
        let call = VpncmdCall::new("UserPasswordSet")
            .with_hub(self.hub()?)
            .arg(user_name)
            .flag("PASSWORD", password);
        self.invoke(call).await?;
        Ok(())
    }

    /// Delete a user (`UserDelete`)
    pub async fn delete_user(&self, user_name: &str) -> Result<()> {
        require(user_name, "user name")?;
        let call = VpncmdCall::new("UserDelete")
            .with_hub(self.hub()?)
            .arg(user_name);
        self.invoke(call).await?;
        Ok(())
    }

    /// Forcibly disconnect a session (`SessionDisconnect`)
    pub async fn disconnect_session(&self, session_name: &str) -> Result<()> {
        require(session_name, "session name")?;
        let call = VpncmdCall::new("SessionDisconnect")
            .with_hub(self.hub()?)
            .arg(session_name);
        self.invoke(call).await?;
        Ok(())
    }

    /// Enable or disable a user via its expiration date (`UserExpiresSet`)
    ///
    /// Disabling sets the expiry to one day in the past; enabling clears it.
    pub async fn set_user_enabled(&self, user_name: &str, enabled: bool) -> Result<()> {
        require(user_name, "user name")?;
        let expires = if enabled {
            "none".to_string()
        } else {
            (chrono::Local::now() - chrono::Duration::days(1))
                .format("%Y/%m/%d %H:%M:%S")
                .to_string()
        };
        let call = VpncmdCall::new("UserExpiresSet")
            .with_hub(self.hub()?)
            .arg(user_name)
            .flag("expires", expires);
        self.invoke(call).await?;
        Ok(())
    }

    /// Set the IPsec pre-shared key (`IPsecEnable`)
    ///
    /// Server-scoped: no `/hub:` prefix argument, but the configured hub
    /// becomes the IPsec default hub.
    pub async fn set_pre_shared_key(&self, pre_shared_key: &str) -> Result<()> {
        require(pre_shared_key, "pre-shared key")?;
        let call = VpncmdCall::new("IPsecEnable")
            .flag("L2TP", "yes")
            .flag("L2TPRAW", "no")
            .flag("ETHERIP", "no")
            .flag("DEFAULTHUB", self.hub()?)
            .flag("PSK", pre_shared_key);
        self.invoke(call).await?;
        Ok(())
    }

    fn hub(&self) -> Result<&str> {
        self.config
            .server
            .hub
            .as_deref()
            .ok_or_else(|| AdminError::Config("operation requires a hub name".to_string()))
    }

    async fn invoke(&self, call: VpncmdCall) -> Result<String> {
        log::debug!(
            "running {} {:?}",
            self.config.tool.binary,
            call.redacted(&self.config.endpoint())
        );

        let argv = call.argv(&self.config.endpoint(), &self.config.server.password);
        let timeout = Duration::from_secs(u64::from(self.config.tool.timeout));
        let output = self.runner.run(&self.config.tool.binary, &argv, timeout).await?;

        if output.success {
            log::debug!("{} succeeded ({} bytes of output)", call.command(), output.stdout.len());
            Ok(output.stdout)
        } else {
            log::warn!("{} failed: {}", call.command(), output.message);
            Err(failure_to_error(output.message))
        }
    }
}

fn require(value: &str, what: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(AdminError::InvalidParameters(format!(
            "{what} must not be empty"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> Config {
        r#"
[server]
address = "10.0.0.1"
password = "secret"
hub = "HUB1"
"#
        .parse()
        .expect("test config parses")
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let mut config = test_config();
        config.server.password = String::new();
        assert!(matches!(
            AdminClient::new(config).err(),
            Some(AdminError::Config(_))
        ));
    }

    #[test]
    fn test_create_user_request_validation() {
        assert!(CreateUserRequest::new("alice", "alice@example.com")
            .validate()
            .is_ok());
        assert!(matches!(
            CreateUserRequest::new("", "alice@example.com").validate(),
            Err(AdminError::InvalidParameters(_))
        ));
        assert!(matches!(
            CreateUserRequest::new("alice", " ").validate(),
            Err(AdminError::InvalidParameters(_))
        ));
    }

    #[tokio::test]
    async fn test_empty_identifier_rejected_before_spawn() {
        let client = AdminClient::new(test_config()).expect("client builds");
        // No vpncmd exists in the test environment; the parameter check must
        // fire before any spawn is attempted.
        assert!(matches!(
            client.user_info("").await,
            Err(AdminError::InvalidParameters(_))
        ));
        assert!(matches!(
            client.disconnect_session("  ").await,
            Err(AdminError::InvalidParameters(_))
        ));
    }
}
