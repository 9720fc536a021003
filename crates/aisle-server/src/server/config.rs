use aisle::Dimensions;
use anyhow::anyhow;
use clap::Parser;
use core::time::Duration;
use std::net::SocketAddr;

/// Runtime configuration for the `aisle-server` binary.
///
/// All values are parsed from CLI arguments or environment variables, with
/// defaults matching a small interactive deployment. Validation happens in
/// [`ServerConfig::try_from`]; nothing shared is constructed until the
/// configuration is known-good, so a rejected value exits before any
/// partial startup state exists.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "aisle-server",
    version,
    about = "A TCP service for reserving seats in a shared grid"
)]
pub struct CliArgs {
    /// Number of seat rows in the grid.
    ///
    /// Environment variable: `ROWS`
    #[arg(long, env = "ROWS", default_value_t = 10)]
    pub rows: u32,

    /// Number of seat columns in the grid.
    ///
    /// Environment variable: `COLS`
    #[arg(long, env = "COLS", default_value_t = 10)]
    pub cols: u32,

    /// Address to listen on.
    ///
    /// Environment variable: `SERVER_ADDR`
    #[arg(long, env = "SERVER_ADDR", default_value_t = String::from("0.0.0.0:5432"))]
    pub addr: String,

    /// Disable the console seat map.
    #[arg(long, default_value_t = false)]
    pub no_view: bool,

    /// Seconds to wait for in-flight connections to finish once the grid
    /// sells out or shutdown is requested.
    ///
    /// Environment variable: `DRAIN_TIMEOUT_SECS`
    #[arg(long, env = "DRAIN_TIMEOUT_SECS", default_value_t = 3)]
    pub drain_timeout_secs: u64,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub dims: Dimensions,
    pub listen_addr: SocketAddr,
    pub view: bool,
    pub drain_timeout: Duration,
}

impl TryFrom<CliArgs> for ServerConfig {
    type Error = anyhow::Error;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        let dims = Dimensions::new(args.rows, args.cols)
            .map_err(|e| anyhow!("ROWS/COLS rejected: {e}"))?;

        let listen_addr = args
            .addr
            .parse()
            .map_err(|e| anyhow!("SERVER_ADDR {:?} is not a socket address: {e}", args.addr))?;

        Ok(Self {
            dims,
            listen_addr,
            view: !args.no_view,
            drain_timeout: Duration::from_secs(args.drain_timeout_secs),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(rows: u32, cols: u32, addr: &str) -> CliArgs {
        CliArgs {
            rows,
            cols,
            addr: addr.to_string(),
            no_view: true,
            drain_timeout_secs: 3,
        }
    }

    #[test]
    fn valid_args_build_a_config() {
        let config = ServerConfig::try_from(args(2, 3, "127.0.0.1:5432")).unwrap();
        assert_eq!(config.dims.rows(), 2);
        assert_eq!(config.dims.cols(), 3);
        assert!(!config.view);
        assert_eq!(config.drain_timeout, Duration::from_secs(3));
    }

    #[test]
    fn zero_sided_grids_are_rejected() {
        assert!(ServerConfig::try_from(args(0, 10, "127.0.0.1:5432")).is_err());
        assert!(ServerConfig::try_from(args(10, 0, "127.0.0.1:5432")).is_err());
    }

    #[test]
    fn unparseable_addresses_are_rejected() {
        assert!(ServerConfig::try_from(args(2, 2, "not-an-address")).is_err());
    }
}
