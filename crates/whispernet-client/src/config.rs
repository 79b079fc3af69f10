//! Command-line arguments and validated client configuration.

use clap::{Parser, ValueEnum};
use thiserror::Error;
use url::Url;
use whispernet_core::FocusPolicy;

/// Path of the push channel endpoint.
pub const PUSH_PATH: &str = "/api/ws";

/// Path of the send endpoint.
pub const SEND_PATH: &str = "/api/send";

/// WhisperNet terminal client
#[derive(Parser, Debug, Clone)]
#[command(name = "whispernet")]
#[command(about = "Terminal client for the WhisperNet peer-to-peer chat")]
#[command(version)]
pub struct Args {
    /// Backend address, either `host:port` or an `http://` URL.
    #[arg(short, long, env = "WHISPERNET_SERVER", default_value = "127.0.0.1:8000")]
    pub server: String,

    /// Whether moving focus in the peer list also selects.
    #[arg(long, value_enum, default_value_t = PolicyArg::Follow)]
    pub policy: PolicyArg,
}

/// CLI spelling of [`FocusPolicy`].
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyArg {
    /// Enter or Space selects the focused peer.
    Manual,
    /// Arrow keys select as they move.
    Follow,
}

impl From<PolicyArg> for FocusPolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::Manual => Self::Manual,
            PolicyArg::Follow => Self::SelectionFollowsFocus,
        }
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Server address could not be parsed.
    #[error("invalid server address {address:?}: {source}")]
    InvalidServer {
        /// Address as given.
        address: String,
        /// Parser error.
        #[source]
        source: url::ParseError,
    },

    /// Server URL uses a scheme other than http.
    #[error("unsupported scheme {0:?}, expected http")]
    UnsupportedScheme(String),

    /// Server URL has no host.
    #[error("server address has no host")]
    MissingHost,
}

/// Validated client configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// WebSocket URL of the push channel.
    pub push_url: Url,
    /// HTTP URL for outbound messages.
    pub send_url: Url,
    /// Focus policy for the peer list.
    pub policy: FocusPolicy,
}

impl Config {
    /// Build a configuration for `server`.
    ///
    /// # Errors
    ///
    /// [`ConfigError`] if the address is not a usable http origin.
    pub fn new(server: &str, policy: FocusPolicy) -> Result<Self, ConfigError> {
        let candidate =
            if server.contains("://") { server.to_owned() } else { format!("http://{server}") };
        let base = Url::parse(&candidate)
            .map_err(|source| ConfigError::InvalidServer { address: server.to_owned(), source })?;

        if base.scheme() != "http" {
            return Err(ConfigError::UnsupportedScheme(base.scheme().to_owned()));
        }
        if base.host_str().is_none_or(str::is_empty) {
            return Err(ConfigError::MissingHost);
        }

        let mut send_url = base.clone();
        send_url.set_path(SEND_PATH);
        send_url.set_query(None);
        send_url.set_fragment(None);

        let mut push_url = send_url.clone();
        push_url.set_path(PUSH_PATH);
        push_url
            .set_scheme("ws")
            .map_err(|()| ConfigError::UnsupportedScheme(base.scheme().to_owned()))?;

        Ok(Self { push_url, send_url, policy })
    }
}

impl TryFrom<Args> for Config {
    type Error = ConfigError;

    fn try_from(args: Args) -> Result<Self, Self::Error> {
        Self::new(&args.server, args.policy.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_host_port_gets_http() {
        let config = Config::new("192.168.1.5:8000", FocusPolicy::Manual).unwrap();
        assert_eq!(config.push_url.as_str(), "ws://192.168.1.5:8000/api/ws");
        assert_eq!(config.send_url.as_str(), "http://192.168.1.5:8000/api/send");
    }

    #[test]
    fn explicit_http_url_drops_path_and_query() {
        let config = Config::new("http://chat.local/ignored?x=1", FocusPolicy::Manual).unwrap();
        assert_eq!(config.push_url.as_str(), "ws://chat.local/api/ws");
        assert_eq!(config.send_url.as_str(), "http://chat.local/api/send");
    }

    #[test]
    fn other_schemes_are_rejected() {
        assert!(matches!(
            Config::new("https://chat.local", FocusPolicy::Manual),
            Err(ConfigError::UnsupportedScheme(scheme)) if scheme == "https"
        ));
        assert!(matches!(
            Config::new("ftp://chat.local", FocusPolicy::Manual),
            Err(ConfigError::UnsupportedScheme(_))
        ));
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(matches!(
            Config::new("exa mple:80", FocusPolicy::Manual),
            Err(ConfigError::InvalidServer { .. })
        ));
    }

    #[test]
    fn args_parse_policy() {
        let args = Args::try_parse_from(["whispernet", "-s", "10.0.0.1:9000", "--policy", "follow"])
            .unwrap();
        let config = Config::try_from(args).unwrap();
        assert_eq!(config.policy, FocusPolicy::SelectionFollowsFocus);
        assert_eq!(config.send_url.as_str(), "http://10.0.0.1:9000/api/send");
    }

    #[test]
    fn policy_defaults_to_follow() {
        let args = Args::try_parse_from(["whispernet", "-s", "10.0.0.1:9000"]).unwrap();
        assert_eq!(FocusPolicy::from(args.policy), FocusPolicy::SelectionFollowsFocus);

        let args = Args::try_parse_from(["whispernet", "--policy", "manual"]).unwrap();
        assert_eq!(FocusPolicy::from(args.policy), FocusPolicy::Manual);
    }
}
