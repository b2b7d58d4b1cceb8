use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result, ensure};
use clap::Parser;

/// Runtime configuration, populated once at startup from CLI flags with
/// environment-variable fallbacks, and validated before anything connects.
#[derive(Debug, Clone, Parser)]
#[command(name = "mensario")]
#[command(about = "Bank-account ledger service that emails monthly account summaries")]
#[command(version)]
pub struct AppConfig {
    /// SQLite database file path
    #[arg(long, env = "DATABASE_PATH", default_value = "mensario.db")]
    pub database: String,

    /// Address the HTTP server binds to
    #[arg(long, env = "BIND_ADDR", default_value = "0.0.0.0:8080")]
    pub bind_addr: String,

    /// SMTP relay host
    #[arg(long, env = "SMTP_HOST")]
    pub smtp_host: String,

    /// SMTP relay port
    #[arg(long, env = "SMTP_PORT", default_value_t = 587)]
    pub smtp_port: u16,

    /// SMTP username; also used as the sender address
    #[arg(long, env = "SMTP_USERNAME")]
    pub smtp_username: String,

    /// SMTP password
    #[arg(long, env = "SMTP_PASSWORD", hide_env_values = true)]
    pub smtp_password: String,

    /// Directory holding email assets (the inline logo image)
    #[arg(long, env = "ASSETS_DIR", default_value = "assets")]
    pub assets_dir: PathBuf,
}

impl AppConfig {
    /// Check everything that would otherwise only fail at first use.
    pub fn validate(&self) -> Result<()> {
        self.bind_addr
            .parse::<SocketAddr>()
            .with_context(|| format!("invalid bind address: {}", self.bind_addr))?;

        ensure!(!self.smtp_host.is_empty(), "SMTP host must not be empty");
        ensure!(
            !self.smtp_username.is_empty(),
            "SMTP username must not be empty"
        );

        let logo = self.assets_dir.join(crate::mailer::LOGO_FILENAME);
        ensure!(
            logo.is_file(),
            "logo asset not found at {}",
            logo.display()
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config(assets_dir: PathBuf) -> AppConfig {
        AppConfig {
            database: "test.db".into(),
            bind_addr: "127.0.0.1:8080".into(),
            smtp_host: "smtp.example.com".into(),
            smtp_port: 587,
            smtp_username: "noreply@example.com".into(),
            smtp_password: "secret".into(),
            assets_dir,
        }
    }

    #[test]
    fn test_validate_accepts_complete_config() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(crate::mailer::LOGO_FILENAME), b"png").unwrap();
        assert!(test_config(dir.path().to_path_buf()).validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_bind_addr() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(crate::mailer::LOGO_FILENAME), b"png").unwrap();
        let mut config = test_config(dir.path().to_path_buf());
        config.bind_addr = "not-an-addr".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_missing_logo() {
        let dir = tempfile::tempdir().unwrap();
        assert!(test_config(dir.path().to_path_buf()).validate().is_err());
    }
}
