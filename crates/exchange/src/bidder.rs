use {
    crate::validation,
    currencies::Conversions,
    derive_more::{Display, From},
    serde::Serialize,
    std::sync::Arc,
};

/// Name under which a bidder is configured, e.g. `appnexus`.
#[derive(Clone, Debug, Display, From, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct BidderName(pub String);

impl BidderName {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for BidderName {
    fn from(name: &str) -> Self {
        Self(name.to_owned())
    }
}

/// The kind of creative a bid delivers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BidType {
    #[default]
    Banner,
    Video,
    Audio,
    Native,
}

impl BidType {
    /// Maps the OpenRTB `mtype` markup type. Unknown or missing types are
    /// treated as banners.
    pub fn from_mtype(mtype: Option<u8>) -> Self {
        match mtype {
            Some(2) => Self::Video,
            Some(3) => Self::Audio,
            Some(4) => Self::Native,
            _ => Self::Banner,
        }
    }
}

/// A bid as returned by a bidder adapter. The OpenRTB payload can be missing
/// when an adapter produced an entry without an actual bid.
#[derive(Clone, Debug, PartialEq)]
pub struct TypedBid {
    pub bid: Option<openrtb::Bid>,
    pub bid_type: BidType,
}

/// All bids one bidder returned for one request.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SeatBid {
    pub bids: Vec<TypedBid>,
    /// Currency of every bid price in `bids`. Empty means the default
    /// currency.
    pub currency: String,
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The bidder call itself failed or returned garbage.
    #[error(transparent)]
    Bidder(#[from] anyhow::Error),
    #[error(transparent)]
    Validation(#[from] validation::Error),
}

impl Error {
    /// Short label for metrics.
    pub fn reason(&self) -> &'static str {
        match self {
            Self::Bidder(_) => "bidder",
            Self::Validation(err) => err.reason(),
        }
    }
}

/// Requests bids from one demand partner.
///
/// Implementations either talk to the partner or decorate another
/// implementation. Dropping the returned future cancels the request.
#[cfg_attr(any(test, feature = "test-util"), mockall::automock)]
#[async_trait::async_trait]
pub trait AdaptedBidder: Send + Sync {
    /// Returns the bids of this bidder together with every error that
    /// occurred while getting them. Errors don't imply that there are no
    /// bids: partial failures return both.
    async fn request_bid(
        &self,
        request: &openrtb::BidRequest,
        name: &BidderName,
        bid_adjustment: f64,
        conversions: Arc<dyn Conversions>,
    ) -> (Option<SeatBid>, Vec<Error>);
}
