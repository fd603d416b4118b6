use std::ffi::OsString;
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use clap::{CommandFactory, Parser};

use crate::error::ConfigError;

/// Command-line flags. Everything here is resolved once at startup.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "impala-exporter",
    about = "Prometheus exporter for Impala coordinators",
    after_help = "Long flags also accept a single dash, e.g. -impala_servers=host:25000 -port=9100"
)]
pub struct Config {
    /// Comma-separated list of Impala server addresses
    /// (e.g. 10.11.18.16:25000,10.11.18.17:25000)
    #[arg(long = "impala_servers", value_delimiter = ',', required = true)]
    pub impala_servers: Vec<String>,

    /// The port to expose metrics on
    #[arg(long, default_value_t = 8080)]
    pub port: u16,

    /// Address to bind the metrics listener to
    #[arg(long, default_value_t = IpAddr::V4(Ipv4Addr::UNSPECIFIED))]
    pub listen_address: IpAddr,

    /// Timeout for each request to an Impala server, in seconds
    #[arg(long, default_value_t = 10)]
    pub timeout_secs: u64,

    /// Deadline for polling every coordinator during one /metrics request, in seconds
    #[arg(long, default_value_t = 30, value_parser = clap::value_parser!(u64).range(1..))]
    pub scrape_timeout_secs: u64,

    /// How many coordinators are polled at the same time during one scrape
    #[arg(long, default_value_t = 4, value_parser = clap::value_parser!(u64).range(1..))]
    pub max_concurrent_targets: u64,
}

impl Config {
    /// Parse the process arguments, accepting `-name` as well as `--name`
    /// for every long flag.
    pub fn load() -> Self {
        Self::parse_from(double_dash_long_flags(std::env::args_os()))
    }

    /// Validated target list, in the order given on the command line.
    pub fn targets(&self) -> Result<Vec<Target>, ConfigError> {
        let targets = self
            .impala_servers
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(Target::from_str)
            .collect::<Result<Vec<_>, _>>()?;

        if targets.is_empty() {
            return Err(ConfigError::NoTargets);
        }
        Ok(targets)
    }

    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::new(self.listen_address, self.port)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn scrape_timeout(&self) -> Duration {
        Duration::from_secs(self.scrape_timeout_secs)
    }

    pub fn max_concurrent_targets(&self) -> usize {
        usize::try_from(self.max_concurrent_targets).unwrap_or(usize::MAX)
    }
}

/// Rewrites `-impala_servers=x` style arguments into `--impala_servers=x`.
/// Short flags, `--` arguments, values and non-UTF-8 arguments pass through.
fn double_dash_long_flags(args: impl IntoIterator<Item = OsString>) -> Vec<OsString> {
    let command = Config::command();
    let longs: Vec<&str> = command.get_arguments().filter_map(|a| a.get_long()).collect();

    args.into_iter()
        .map(|arg| {
            let Some(flag) = arg.to_str().and_then(|s| s.strip_prefix('-')) else {
                return arg;
            };
            if flag.starts_with('-') {
                return arg;
            }
            let name = flag.split_once('=').map_or(flag, |(name, _)| name);
            if longs.contains(&name) {
                OsString::from(format!("-{}", arg.to_string_lossy()))
            } else {
                arg
            }
        })
        .collect()
}

/// One Impala coordinator, as `host:port`.
///
/// Also used verbatim as the `impala_server` label value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Target(String);

impl Target {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Target {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = s.is_empty()
            || s.contains("://")
            || s.contains('/')
            || s.chars().any(char::is_whitespace);
        if invalid {
            return Err(ConfigError::InvalidTarget(s.to_string()));
        }
        Ok(Self(s.to_string()))
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
