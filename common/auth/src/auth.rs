//! Configuration of the session handling

use std::time::Duration;

/// The secret used when none is configured. Only suitable for development.
pub const DEVELOPMENT_SECRET: &str = "venter-development-secret";

#[derive(Clone, Debug, clap::Args)]
#[command(
    rename_all_env = "SCREAMING_SNAKE_CASE",
    next_help_heading = "Authentication & authorization"
)]
#[group(id = "auth")]
pub struct AuthConfigArguments {
    /// The secret for signing session tokens
    #[arg(
        id = "session-secret",
        long = "session-secret",
        env = "VENTER_SESSION_SECRET",
        default_value = DEVELOPMENT_SECRET
    )]
    pub session_secret: String,

    /// The lifetime of a session, in seconds
    #[arg(
        id = "session-ttl",
        long = "session-ttl",
        env = "VENTER_SESSION_TTL",
        default_value_t = 14 * 24 * 60 * 60
    )]
    pub session_ttl: u64,
}

impl Default for AuthConfigArguments {
    fn default() -> Self {
        Self {
            session_secret: DEVELOPMENT_SECRET.into(),
            session_ttl: 14 * 24 * 60 * 60,
        }
    }
}

impl AuthConfigArguments {
    pub fn is_development_secret(&self) -> bool {
        self.session_secret == DEVELOPMENT_SECRET
    }

    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl)
    }
}
