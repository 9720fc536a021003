use anyhow::bail;
use clap::{Parser, ValueEnum};
use core::ops::RangeInclusive;
use core::time::Duration;

/// How the client chooses its next seat.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    /// Prompt for each seat on stdin.
    Manual,
    /// Pick random seats, pausing a short think time between attempts.
    #[value(alias = "auto")]
    Automatic,
}

/// Runtime configuration for the `aisle-client` binary.
///
/// All values are parsed from CLI arguments or environment variables, with
/// defaults that point at a local server.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "aisle-client",
    version,
    about = "Reserve seats against an aisle server, by hand or at random"
)]
pub struct CliArgs {
    /// Seat selection mode.
    #[arg(value_enum)]
    pub mode: Mode,

    /// Server address to connect to.
    ///
    /// Environment variable: `SERVER_ADDR`
    #[arg(long, env = "SERVER_ADDR", default_value_t = String::from("127.0.0.1:5432"))]
    pub addr: String,

    /// Seconds to keep retrying the initial connection, one attempt per
    /// second.
    ///
    /// Environment variable: `CONNECT_TIMEOUT_SECS`
    #[arg(long, env = "CONNECT_TIMEOUT_SECS", default_value_t = 10)]
    pub connect_timeout_secs: u64,

    /// Shortest think time between automatic attempts, in milliseconds.
    ///
    /// Environment variable: `MIN_THINK_MS`
    #[arg(long, env = "MIN_THINK_MS", default_value_t = 200)]
    pub min_think_ms: u64,

    /// Longest think time between automatic attempts, in milliseconds.
    ///
    /// Environment variable: `MAX_THINK_MS`
    #[arg(long, env = "MAX_THINK_MS", default_value_t = 800)]
    pub max_think_ms: u64,
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub mode: Mode,
    pub addr: String,
    pub connect_timeout: Duration,
    pub think_ms: RangeInclusive<u64>,
}

impl TryFrom<CliArgs> for ClientConfig {
    type Error = anyhow::Error;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        if args.addr.is_empty() {
            bail!("SERVER_ADDR must not be empty");
        }

        if args.connect_timeout_secs == 0 {
            bail!("CONNECT_TIMEOUT_SECS must be greater than 0");
        }

        if args.min_think_ms > args.max_think_ms {
            bail!(
                "MIN_THINK_MS ({}) exceeds MAX_THINK_MS ({})",
                args.min_think_ms,
                args.max_think_ms
            );
        }

        Ok(Self {
            mode: args.mode,
            addr: args.addr,
            connect_timeout: Duration::from_secs(args.connect_timeout_secs),
            think_ms: args.min_think_ms..=args.max_think_ms,
        })
    }
}
