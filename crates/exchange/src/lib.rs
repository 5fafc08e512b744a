//! Bidder side of the exchange: requesting bids from demand partners and
//! making sure nothing but valid bids reach the auction.

pub mod auction;
pub mod bidder;
pub mod cli;
pub mod config;
pub mod instrumented;
pub mod replay;
pub mod run;
pub mod validation;

pub use {
    bidder::{AdaptedBidder, BidType, BidderName, Error, SeatBid, TypedBid},
    instrumented::InstrumentedBidder,
    replay::ReplayBidder,
    validation::{ValidatedBidder, ensure_valid_bids},
};

#[cfg(any(test, feature = "test-util"))]
pub use bidder::MockAdaptedBidder;
