//! Command-line and environment configuration.
//!
//! Every flag can also be set through its environment variable; an explicit flag wins.

use crate::accrual::AccrualClientConfig;
use crate::lifecycle::LogFormat;
use crate::model::UserId;
use clap::Parser;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone, Parser)]
#[command(
    name = "loyalty-ledger",
    about = "Reconciles uploaded orders against the accrual service and keeps loyalty balances"
)]
pub struct Config {
    /// Root URL of the accrual service.
    #[arg(short = 'r', long, env = "ACCRUAL_SYSTEM_ADDRESS")]
    pub accrual_address: String,

    /// Seconds between reconciliation ticks.
    #[arg(
        long,
        env = "POLL_INTERVAL_SECS",
        default_value_t = 10,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub poll_interval_secs: u64,

    /// Per-request timeout for the accrual service, in seconds.
    #[arg(
        long,
        env = "ACCRUAL_TIMEOUT_SECS",
        default_value_t = 10,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub accrual_timeout_secs: u64,

    /// Back-off used when a 429 carries no usable Retry-After, in seconds.
    #[arg(long, env = "ACCRUAL_RETRY_AFTER_SECS", default_value_t = 60)]
    pub retry_after_secs: u64,

    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,

    /// Order to upload at startup, as USER:NUMBER. Repeatable.
    #[arg(long = "upload", value_name = "USER:NUMBER")]
    pub uploads: Vec<SeedOrder>,
}

impl Config {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn accrual_client(&self) -> AccrualClientConfig {
        AccrualClientConfig::new(self.accrual_address.clone())
            .with_timeout(Duration::from_secs(self.accrual_timeout_secs))
            .with_default_retry_after(Duration::from_secs(self.retry_after_secs))
    }
}

/// An order uploaded on behalf of a user when the binary starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedOrder {
    pub user_id: UserId,
    pub number: String,
}

impl FromStr for SeedOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (user, number) = s
            .split_once(':')
            .ok_or_else(|| format!("expected USER:NUMBER, got {s:?}"))?;
        let user = user
            .trim()
            .parse::<u64>()
            .map_err(|e| format!("invalid user id {user:?}: {e}"))?;
        Ok(Self {
            user_id: UserId(user),
            number: number.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config =
            Config::try_parse_from(["loyalty-ledger", "-r", "http://localhost:8081"]).unwrap();
        assert_eq!(config.accrual_address, "http://localhost:8081");
        assert_eq!(config.poll_interval(), Duration::from_secs(10));

        let accrual = config.accrual_client();
        assert_eq!(accrual.timeout, Duration::from_secs(10));
        assert_eq!(accrual.default_retry_after, Duration::from_secs(60));
        assert!(config.uploads.is_empty());
    }

    #[test]
    fn test_flags_and_seed_orders() {
        let config = Config::try_parse_from([
            "loyalty-ledger",
            "--accrual-address",
            "http://accrual:8080",
            "--poll-interval-secs",
            "2",
            "--retry-after-secs",
            "5",
            "--log-format",
            "json",
            "--upload",
            "1:12345678903",
            "--upload",
            "2:9278923470",
        ])
        .unwrap();

        assert_eq!(config.poll_interval(), Duration::from_secs(2));
        assert_eq!(config.accrual_client().default_retry_after, Duration::from_secs(5));
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(
            config.uploads,
            vec![
                SeedOrder {
                    user_id: UserId(1),
                    number: "12345678903".to_string()
                },
                SeedOrder {
                    user_id: UserId(2),
                    number: "9278923470".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_zero_poll_interval_is_rejected() {
        for flag in ["--poll-interval-secs", "--accrual-timeout-secs"] {
            let result = Config::try_parse_from([
                "loyalty-ledger",
                "-r",
                "http://localhost:8081",
                flag,
                "0",
            ]);
            assert!(result.is_err(), "{flag} 0 was accepted");
        }

        let config = Config::try_parse_from([
            "loyalty-ledger",
            "-r",
            "http://localhost:8081",
            "--poll-interval-secs",
            "1",
        ])
        .unwrap();
        assert_eq!(config.poll_interval(), Duration::from_secs(1));
    }

    #[test]
    fn test_bad_seed_order_is_rejected() {
        assert!("12345678903".parse::<SeedOrder>().is_err());
        assert!("alice:12345678903".parse::<SeedOrder>().is_err());
        assert!(Config::try_parse_from([
            "loyalty-ledger",
            "-r",
            "http://localhost:8081",
            "--upload",
            "nope"
        ])
        .is_err());
    }
}
