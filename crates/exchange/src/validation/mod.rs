//! Validation of bidder responses.
//!
//! Bidders are third parties, so nothing they return is trusted until it
//! went through [`remove_invalid_bids`]. Invalid bids are dropped and turned
//! into [`Error`]s so the auction only ever sees bids with a positive price,
//! an accepted currency and identifiable creative and impression.

mod bid;
mod currency;

pub use {bid::validate_bid, currency::validate_currency};
use {
    crate::bidder::{self, AdaptedBidder, BidderName, SeatBid},
    currencies::{Conversions, Currency, CurrencyParsing, Iso4217, ParseError},
    std::sync::Arc,
};

#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    UnrecognizedCurrency(#[from] ParseError),
    #[error("Bid currency is not allowed. Was '{actual}', wants: ['{}']", .allowed.join("', '"))]
    CurrencyNotAllowed {
        actual: Currency,
        allowed: Vec<String>,
    },
    #[error("Empty bid object submitted.")]
    EmptyBid,
    #[error("Bid missing required field 'id'")]
    MissingId,
    #[error("Bid \"{0}\" missing required field 'impid'")]
    MissingImpId(String),
    #[error("Bid \"{0}\" does not contain a positive 'price'")]
    NonPositivePrice(String),
    #[error("Bid \"{0}\" missing creative ID")]
    MissingCreativeId(String),
}

impl Error {
    /// The id of the offending bid, if the bid had one.
    pub fn bid_id(&self) -> Option<&str> {
        match self {
            Self::MissingImpId(id) | Self::NonPositivePrice(id) | Self::MissingCreativeId(id) => {
                Some(id.as_str())
            }
            _ => None,
        }
    }

    /// Whether the error discarded a whole seat bid rather than one bid.
    pub fn is_currency_error(&self) -> bool {
        matches!(
            self,
            Self::UnrecognizedCurrency(_) | Self::CurrencyNotAllowed { .. }
        )
    }

    pub fn reason(&self) -> &'static str {
        match self {
            Self::UnrecognizedCurrency(_) => "unrecognized_currency",
            Self::CurrencyNotAllowed { .. } => "currency_not_allowed",
            Self::EmptyBid => "empty_bid",
            Self::MissingId => "missing_id",
            Self::MissingImpId(_) => "missing_impid",
            Self::NonPositivePrice(_) => "non_positive_price",
            Self::MissingCreativeId(_) => "missing_creative_id",
        }
    }
}

/// Removes every invalid bid from `seat_bid` and returns why each one was
/// removed.
///
/// The currency gates the whole seat bid: if it isn't accepted all bids are
/// dropped and that is the only error, no matter how the bids themselves
/// look. Otherwise bids are checked one by one and the valid ones are kept
/// in their original order. A missing or empty seat bid is left alone.
pub fn remove_invalid_bids(
    request: &openrtb::BidRequest,
    seat_bid: Option<&mut SeatBid>,
    currencies: &dyn CurrencyParsing,
) -> Vec<Error> {
    let Some(seat_bid) = seat_bid.filter(|seat_bid| !seat_bid.bids.is_empty()) else {
        return Vec::new();
    };

    if let Err(err) = validate_currency(&request.cur, &seat_bid.currency, currencies) {
        seat_bid.bids = Vec::new();
        return vec![err];
    }

    let mut errors = Vec::new();
    seat_bid.bids = std::mem::take(&mut seat_bid.bids)
        .into_iter()
        .filter(|bid| match validate_bid(bid) {
            Ok(()) => true,
            Err(err) => {
                errors.push(err);
                false
            }
        })
        .collect();
    errors
}

/// Wraps a bidder so that callers only ever see validated bids.
///
/// Errors of the wrapped bidder are passed through first, followed by one
/// error per discarded bid.
pub struct ValidatedBidder<T> {
    inner: T,
    currencies: Arc<dyn CurrencyParsing>,
}

/// Returns a bidder that removes invalid bids from the responses of
/// `bidder`, parsing currencies against the ISO 4217 list.
pub fn ensure_valid_bids<T: AdaptedBidder>(bidder: T) -> ValidatedBidder<T> {
    ValidatedBidder {
        inner: bidder,
        currencies: Arc::new(Iso4217),
    }
}

impl<T> ValidatedBidder<T> {
    pub fn with_currency_parsing(mut self, currencies: Arc<dyn CurrencyParsing>) -> Self {
        self.currencies = currencies;
        self
    }
}

#[async_trait::async_trait]
impl<T: AdaptedBidder> AdaptedBidder for ValidatedBidder<T> {
    async fn request_bid(
        &self,
        request: &openrtb::BidRequest,
        name: &BidderName,
        bid_adjustment: f64,
        conversions: Arc<dyn Conversions>,
    ) -> (Option<SeatBid>, Vec<bidder::Error>) {
        let (mut seat_bid, mut errors) = self
            .inner
            .request_bid(request, name, bid_adjustment, conversions)
            .await;
        errors.extend(
            remove_invalid_bids(request, seat_bid.as_mut(), self.currencies.as_ref())
                .into_iter()
                .map(bidder::Error::Validation),
        );
        (seat_bid, errors)
    }
}
