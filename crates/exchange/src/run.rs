use {
    crate::{
        auction::{self, BidderResponse, Participant},
        bidder::{BidType, BidderName},
        cli,
        config::{self, Config},
        instrumented::InstrumentedBidder,
        replay::ReplayBidder,
        validation::ensure_valid_bids,
    },
    anyhow::{Context, Result},
    clap::Parser,
    serde::Serialize,
    std::{io::Write, path::Path, sync::Arc},
};

pub async fn main() {
    if let Err(err) = run(std::env::args()).await {
        tracing::error!(?err, "exchange failed");
        std::process::exit(1);
    }
}

/// Runs one auction over the configured recorded bidders and prints a
/// report per bidder to stdout.
pub async fn run(args: impl Iterator<Item = String>) -> Result<()> {
    let args = cli::Args::parse_from(args);
    observe::tracing::initialize(&observe_config(&args));
    observe::metrics::setup_registry(Some("exchange".to_owned()), None);
    tracing::info!(?args, "starting");

    let config = config::load(&args.config).await?;
    let request = load_request(&args.request).await?;
    let reports = run_auction(request, &config).await;

    let mut stdout = std::io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, &reports).context("failed to write report")?;
    writeln!(stdout)?;

    if args.print_metrics {
        let metrics = observe::metrics::encode(observe::metrics::get_registry());
        std::io::stderr().write_all(metrics.as_bytes())?;
    }
    Ok(())
}

fn observe_config(args: &cli::Args) -> observe::Config {
    let mut config = observe::Config::default().with_env_filter(&args.log);
    if let Some(threshold) = args.stderr_threshold {
        config = config.with_stderr_threshold(threshold);
    }
    if args.use_json_logs {
        config = config.with_json_format();
    }
    config
}

async fn load_request(path: &Path) -> Result<openrtb::BidRequest> {
    let data = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("I/O error while reading {path:?}"))?;
    serde_json::from_str(&data).with_context(|| format!("malformed bid request in {path:?}"))
}

/// Sends `request` to every configured bidder, each one validated and
/// instrumented.
pub async fn run_auction(request: openrtb::BidRequest, config: &Config) -> Vec<Report> {
    let participants: Vec<_> = config
        .bidders
        .iter()
        .map(|bidder| Participant {
            name: bidder.name.clone(),
            bid_adjustment: bidder.bid_adjustment,
            bidder: Arc::new(InstrumentedBidder::new(ensure_valid_bids(
                ReplayBidder::new(&bidder.response),
            ))),
        })
        .collect();
    tracing::info!(request = %request.id, bidders = participants.len(), "running auction");

    auction::request_bids(
        Arc::new(request),
        &participants,
        Arc::new(config.conversions.clone()),
    )
    .await
    .into_iter()
    .map(Report::from)
    .collect()
}

/// The outcome of one bidder as printed by the CLI.
#[derive(Debug, Serialize)]
pub struct Report {
    pub bidder: BidderName,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub currency: String,
    pub bids: Vec<ReportedBid>,
    pub errors: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ReportedBid {
    #[serde(rename = "type")]
    pub bid_type: BidType,
    #[serde(flatten)]
    pub bid: openrtb::Bid,
}

impl From<BidderResponse> for Report {
    fn from(response: BidderResponse) -> Self {
        let (currency, bids) = response
            .seat_bid
            .map(|seat_bid| (seat_bid.currency, seat_bid.bids))
            .unwrap_or_default();
        Self {
            bidder: response.bidder,
            currency,
            bids: bids
                .into_iter()
                .filter_map(|bid| {
                    Some(ReportedBid {
                        bid_type: bid.bid_type,
                        bid: bid.bid?,
                    })
                })
                .collect(),
            errors: response.errors.iter().map(ToString::to_string).collect(),
        }
    }
}
