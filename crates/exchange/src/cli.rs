use std::path::PathBuf;

#[derive(Debug, clap::Parser)]
#[clap(about = "Runs a bid request through recorded bidder responses and validates the bids")]
pub struct Args {
    /// Log filter directives, see
    /// https://docs.rs/tracing-subscriber/latest/tracing_subscriber/filter/struct.EnvFilter.html
    #[clap(long, env, default_value = "warn,exchange=debug")]
    pub log: String,

    /// At which log level logs should be printed to stderr instead of stdout.
    #[clap(long, env)]
    pub stderr_threshold: Option<tracing::Level>,

    /// Emit logs as JSON lines.
    #[clap(long, env)]
    pub use_json_logs: bool,

    /// Path to the bidders configuration file (TOML).
    #[clap(long, env)]
    pub config: PathBuf,

    /// Path to the OpenRTB bid request (JSON) that is sent to every bidder.
    #[clap(long, env)]
    pub request: PathBuf,

    /// Print the collected prometheus metrics to stderr after the auction.
    #[clap(long, env)]
    pub print_metrics: bool,
}

#[cfg(test)]
mod tests {
    use {super::*, clap::Parser};

    #[test]
    fn parses_arguments() {
        let args = Args::try_parse_from([
            "exchange",
            "--config",
            "exchange.toml",
            "--request",
            "request.json",
            "--use-json-logs",
            "--stderr-threshold",
            "warn",
        ])
        .unwrap();
        assert_eq!(args.config, PathBuf::from("exchange.toml"));
        assert_eq!(args.request, PathBuf::from("request.json"));
        assert!(args.use_json_logs);
        assert_eq!(args.stderr_threshold, Some(tracing::Level::WARN));
        assert!(!args.print_metrics);
        assert_eq!(args.log, "warn,exchange=debug");
    }

    #[test]
    fn requires_config_and_request() {
        assert!(Args::try_parse_from(["exchange", "--config", "exchange.toml"]).is_err());
    }

    #[test]
    fn rejects_unknown_log_levels() {
        assert!(
            Args::try_parse_from([
                "exchange",
                "--config",
                "exchange.toml",
                "--request",
                "request.json",
                "--stderr-threshold",
                "loud",
            ])
            .is_err()
        );
    }
}
