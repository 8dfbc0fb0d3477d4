//! Application configuration
//!
//! Centralized configuration management with environment variable support
//! and sensible defaults.

use crate::tickets::SessionUser;
use std::env;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Desk bridge server configuration
    pub server: ServerConfig,
    /// Ticket service connection
    pub ticket_service: TicketServiceConfig,
    /// Agent the desk acts as
    pub session: SessionConfig,
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Port to bind the server to
    pub port: u16,
    /// Host address to bind to
    pub host: String,
}

/// Ticket service configuration
#[derive(Clone)]
pub struct TicketServiceConfig {
    /// Base URL of the ticket service REST API
    pub base_url: String,
    /// Bearer token sent with every request
    pub token: Option<String>,
}

// Keep the token out of the startup log
impl std::fmt::Debug for TicketServiceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TicketServiceConfig")
            .field("base_url", &self.base_url)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Logged-in agent
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// User ID; required to run transitions
    pub user_id: Option<i64>,
    /// Display name used in the accept greeting
    pub user_name: String,
    /// Profile checked against the rule table
    pub profile: String,
}

impl SessionConfig {
    /// The acting agent, if a user ID is configured
    pub fn user(&self) -> Option<SessionUser> {
        self.user_id.map(|id| SessionUser {
            id,
            name: self.user_name.clone(),
            profile: self.profile.clone(),
        })
    }
}

impl Config {
    /// Load configuration from environment variables with defaults
    pub fn from_env() -> Self {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable source
    pub fn from_vars<F>(var: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            server: ServerConfig {
                port: var("PORT").and_then(|p| p.parse().ok()).unwrap_or(8080),
                host: var("HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            },
            ticket_service: TicketServiceConfig {
                base_url: var("BACKEND_URL")
                    .unwrap_or_else(|| "http://localhost:8081".to_string()),
                token: var("BACKEND_TOKEN").filter(|t| !t.is_empty()),
            },
            session: SessionConfig {
                user_id: var("AGENT_USER_ID").and_then(|id| id.parse().ok()),
                user_name: var("AGENT_USER_NAME").unwrap_or_default(),
                profile: var("AGENT_PROFILE").unwrap_or_else(|| "user".to_string()),
            },
        }
    }

    /// Get the server address as a string
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_vars(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]);
        assert_eq!(config.server_addr(), "127.0.0.1:8080");
        assert_eq!(config.ticket_service.base_url, "http://localhost:8081");
        assert!(config.ticket_service.token.is_none());
        assert_eq!(config.session.profile, "user");
        assert!(config.session.user().is_none());
    }

    #[test]
    fn test_session_user() {
        let config = config_from(&[
            ("AGENT_USER_ID", "7"),
            ("AGENT_USER_NAME", "Carla"),
            ("AGENT_PROFILE", "admin"),
        ]);
        let user = config.session.user().unwrap();
        assert_eq!(user.id, 7);
        assert_eq!(user.name, "Carla");
        assert_eq!(user.profile, "admin");
    }

    #[test]
    fn test_invalid_numbers_fall_back() {
        let config = config_from(&[("PORT", "http"), ("AGENT_USER_ID", "seven")]);
        assert_eq!(config.server.port, 8080);
        assert!(config.session.user().is_none());
    }

    #[test]
    fn test_token_is_redacted_in_debug() {
        let config = config_from(&[("BACKEND_TOKEN", "s3cr3t")]);
        let printed = format!("{:?}", config);
        assert!(!printed.contains("s3cr3t"));
        assert!(printed.contains("<redacted>"));
    }

    #[test]
    #[serial]
    fn test_from_env_reads_process_environment() {
        env::set_var("BACKEND_URL", "http://tickets.internal:9000");
        let config = Config::from_env();
        env::remove_var("BACKEND_URL");
        assert_eq!(config.ticket_service.base_url, "http://tickets.internal:9000");
    }
}
