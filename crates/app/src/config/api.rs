//! API Config

use std::time::Duration;

use clap::Args;

/// Backend API settings.
#[derive(Debug, Clone, Args)]
pub struct ApiConfig {
    /// Base URL of the storefront backend
    #[arg(long, env = "BAKEHOUSE_API_URL", default_value = "http://localhost:5000")]
    pub api_url: String,

    /// Per-request timeout in seconds
    #[arg(
        long,
        env = "BAKEHOUSE_TIMEOUT_SECONDS",
        default_value_t = 30_u64,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub timeout_seconds: u64,
}

impl ApiConfig {
    /// Timeout applied to each network step.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use testresult::TestResult;

    use super::*;

    #[derive(Debug, Parser)]
    struct Cli {
        #[command(flatten)]
        api: ApiConfig,
    }

    #[test]
    fn timeout_defaults_to_thirty_seconds() -> TestResult {
        let cli = Cli::try_parse_from(["bakehouse", "--api-url", "http://localhost:5000"])?;

        assert_eq!(cli.api.timeout(), Duration::from_secs(30));

        Ok(())
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let result = Cli::try_parse_from(["bakehouse", "--timeout-seconds", "0"]);

        assert!(result.is_err(), "expected a parse error, got {result:?}");
    }

    #[test]
    fn positive_timeout_is_accepted() -> TestResult {
        let cli = Cli::try_parse_from(["bakehouse", "--timeout-seconds", "5"])?;

        assert_eq!(cli.api.timeout(), Duration::from_secs(5));

        Ok(())
    }
}
