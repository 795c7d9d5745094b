use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

use crate::lobby::LobbySettings;
use crate::room::cleanup_task::CleanupConfig;

pub const BIND_ADDR_VAR: &str = "LOBBY_BIND_ADDR";
pub const MIN_PLAYERS_VAR: &str = "LOBBY_MIN_PLAYERS";
pub const MAX_PLAYERS_VAR: &str = "LOBBY_MAX_PLAYERS";
pub const HOST_ONLY_RESET_VAR: &str = "LOBBY_HOST_ONLY_RESET";
pub const CLEANUP_INTERVAL_VAR: &str = "LOBBY_CLEANUP_INTERVAL_SECS";
pub const EMPTY_ROOM_TTL_VAR: &str = "LOBBY_EMPTY_ROOM_TTL_SECS";
pub const IDLE_ROOM_TTL_VAR: &str = "LOBBY_IDLE_ROOM_TTL_SECS";

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:4001";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },

    #[error("Minimum player count must be at least 1")]
    ZeroMinPlayers,

    #[error("Minimum player count {min} exceeds maximum {max}")]
    PlayerBoundsInverted { min: usize, max: usize },
}

/// Server configuration, read from `LOBBY_*` environment variables
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub lobby: LobbySettings,
    pub cleanup: CleanupConfig,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup, falling back to
    /// defaults for absent keys
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lobby_defaults = LobbySettings::default();
        let cleanup_defaults = CleanupConfig::default();

        let bind_addr = parse_or(&lookup, BIND_ADDR_VAR, || {
            SocketAddr::from_str(DEFAULT_BIND_ADDR).map_err(|_| ConfigError::InvalidValue {
                key: BIND_ADDR_VAR,
                value: DEFAULT_BIND_ADDR.to_string(),
            })
        })?;

        let min_player_count = parse_or(&lookup, MIN_PLAYERS_VAR, || {
            Ok(lobby_defaults.min_player_count)
        })?;
        let max_player_count = parse_or(&lookup, MAX_PLAYERS_VAR, || {
            Ok(lobby_defaults.max_player_count)
        })?;
        let host_only_reset = parse_or(&lookup, HOST_ONLY_RESET_VAR, || {
            Ok(lobby_defaults.host_only_reset)
        })?;

        if min_player_count == 0 {
            return Err(ConfigError::ZeroMinPlayers);
        }
        if min_player_count > max_player_count {
            return Err(ConfigError::PlayerBoundsInverted {
                min: min_player_count,
                max: max_player_count,
            });
        }

        let cleanup = CleanupConfig {
            cleanup_interval: parse_secs_or(
                &lookup,
                CLEANUP_INTERVAL_VAR,
                cleanup_defaults.cleanup_interval,
            )?,
            empty_room_ttl: parse_secs_or(
                &lookup,
                EMPTY_ROOM_TTL_VAR,
                cleanup_defaults.empty_room_ttl,
            )?,
            idle_room_ttl: parse_secs_or(
                &lookup,
                IDLE_ROOM_TTL_VAR,
                cleanup_defaults.idle_room_ttl,
            )?,
        };

        Ok(Self {
            bind_addr,
            lobby: LobbySettings::new(min_player_count, max_player_count)
                .with_host_only_reset(host_only_reset),
            cleanup,
        })
    }
}

fn parse_or<F, T, D>(lookup: &F, key: &'static str, default: D) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    D: FnOnce() -> Result<T, ConfigError>,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { key, value: raw }),
        None => default(),
    }
}

fn parse_secs_or<F>(
    lookup: &F,
    key: &'static str,
    default: Duration,
) -> Result<Duration, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let secs: u64 = parse_or(lookup, key, || Ok(default.as_secs()))?;
    if secs == 0 {
        return Err(ConfigError::InvalidValue {
            key,
            value: secs.to_string(),
        });
    }
    Ok(Duration::from_secs(secs))
}
