//! Bidder configuration read from a TOML file.
//!
//! ```toml
//! [[bidder]]
//! name = "appnexus"
//! response = "recordings/appnexus.json"
//! bid-adjustment = 0.95
//!
//! [conversions.USD]
//! EUR = 0.92
//! ```

use {
    crate::bidder::BidderName,
    anyhow::{Context, Result, ensure},
    currencies::RateTable,
    serde::Deserialize,
    std::{
        collections::HashSet,
        path::{Path, PathBuf},
    },
};

#[derive(Debug)]
pub struct Config {
    pub bidders: Vec<Bidder>,
    pub conversions: RateTable,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Bidder {
    pub name: BidderName,
    /// Recorded OpenRTB bid response the bidder replays.
    pub response: PathBuf,
    /// Factor every price of this bidder is multiplied with.
    pub bid_adjustment: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct File {
    #[serde(rename = "bidder", default)]
    bidders: Vec<BidderFile>,

    /// Conversion rates, `[conversions.FROM] TO = rate`.
    #[serde(default)]
    conversions: RateTable,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct BidderFile {
    name: String,
    response: PathBuf,
    #[serde(default = "default_bid_adjustment")]
    bid_adjustment: f64,
}

fn default_bid_adjustment() -> f64 {
    1.0
}

/// Loads the configuration at `path`. Relative recording paths are resolved
/// against the directory of the configuration file.
pub async fn load(path: &Path) -> Result<Config> {
    let data = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("I/O error while reading {path:?}"))?;
    let base = path.parent().unwrap_or_else(|| Path::new(""));
    parse(&data, base).with_context(|| format!("invalid configuration in {path:?}"))
}

fn parse(data: &str, base: &Path) -> Result<Config> {
    let file: File = toml::from_str(data)?;
    ensure!(!file.bidders.is_empty(), "no bidders configured");

    let mut names = HashSet::new();
    let bidders = file
        .bidders
        .into_iter()
        .map(|bidder| {
            ensure!(
                names.insert(bidder.name.clone()),
                "bidder {:?} is configured more than once",
                bidder.name
            );
            ensure!(
                bidder.bid_adjustment.is_finite() && bidder.bid_adjustment > 0.0,
                "bid adjustment of bidder {:?} must be positive, got {}",
                bidder.name,
                bidder.bid_adjustment
            );
            Ok(Bidder {
                name: bidder.name.into(),
                response: base.join(bidder.response),
                bid_adjustment: bidder.bid_adjustment,
            })
        })
        .collect::<Result<_>>()?;

    Ok(Config {
        bidders,
        conversions: file.conversions,
    })
}
