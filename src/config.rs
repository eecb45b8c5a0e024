use std::time::Duration;

const DEFAULT_HTTP_PORT: u16 = 8080;
const DEFAULT_POLL_DELAY: u64 = 5;
const DEFAULT_REMOTE_TIMEOUT: u64 = 2;
const DEFAULT_LOCAL_TIMEOUT: u64 = 10;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid value for {key}: '{value}' is not a number")]
    InvalidNumber { key: &'static str, value: String },
    #[error("Invalid value for {0}: must be at least one second")]
    Zero(&'static str),
    #[error("Invalid value for REMOTE_FAILURE_POLICY: '{0}' (expected 'reset' or 'keep')")]
    InvalidPolicy(String),
}

/// What to publish for a peer when polling it failed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Replace the entry with an empty resource set.
    #[default]
    Reset,
    /// Keep the last resource set which was fetched successfully.
    Keep,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub bind_addr: String,
    pub poll: PollConfig,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PollConfig {
    /// Namespace of the local cluster to observe, empty for all namespaces.
    pub namespace: String,
    pub local_delay: Duration,
    pub local_timeout: Duration,
    /// Peer endpoints, unique, in configured order.
    pub remotes: Vec<String>,
    pub remote_delay: Duration,
    pub remote_timeout: Duration,
    pub failure_policy: FailurePolicy,
}

impl Config {
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = number(&lookup, "HTTP_PORT", DEFAULT_HTTP_PORT)?;
        let bind_addr = lookup("BIND_ADDR").unwrap_or_else(|| format!("[::]:{port}"));

        let remotes = lookup("REPETIOUS_REMOTES").unwrap_or_else(|| format!("127.0.0.1:{port}"));

        let failure_policy = match lookup("REMOTE_FAILURE_POLICY").as_deref().map(str::trim) {
            None | Some("") | Some("reset") => FailurePolicy::Reset,
            Some("keep") => FailurePolicy::Keep,
            Some(other) => return Err(Error::InvalidPolicy(other.to_string())),
        };

        Ok(Self {
            bind_addr,
            poll: PollConfig {
                namespace: lookup("NAMESPACE").unwrap_or_default(),
                local_delay: seconds(&lookup, "LOCAL_POLL_DELAY", DEFAULT_POLL_DELAY)?,
                local_timeout: seconds(&lookup, "LOCAL_TIMEOUT", DEFAULT_LOCAL_TIMEOUT)?,
                remotes: parse_remotes(&remotes),
                remote_delay: seconds(&lookup, "REMOTE_POLL_DELAY", DEFAULT_POLL_DELAY)?,
                remote_timeout: seconds(&lookup, "REMOTE_TIMEOUT", DEFAULT_REMOTE_TIMEOUT)?,
                failure_policy,
            },
        })
    }
}

fn number<F, N>(lookup: &F, key: &'static str, default: N) -> Result<N, Error>
where
    F: Fn(&str) -> Option<String>,
    N: std::str::FromStr,
{
    match lookup(key) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| Error::InvalidNumber { key, value }),
        None => Ok(default),
    }
}

fn seconds<F>(lookup: &F, key: &'static str, default: u64) -> Result<Duration, Error>
where
    F: Fn(&str) -> Option<String>,
{
    match number(lookup, key, default)? {
        0 => Err(Error::Zero(key)),
        seconds => Ok(Duration::from_secs(seconds)),
    }
}

fn parse_remotes(value: &str) -> Vec<String> {
    let mut remotes: Vec<String> = Vec::new();
    for remote in value.split(',').map(str::trim).filter(|r| !r.is_empty()) {
        if !remotes.iter().any(|r| r == remote) {
            remotes.push(remote.to_string());
        }
    }
    remotes
}
