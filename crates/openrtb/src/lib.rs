//! Wire model of the OpenRTB 2.x objects the exchange reads and writes.
//!
//! Only the fields the exchange actually looks at are typed. Optional fields
//! default when absent so that incomplete bidder responses still deserialize
//! and can be rejected by bid validation with a proper reason.

mod request;
mod response;

pub use {
    request::{Banner, BidRequest, Imp, Native, Video},
    response::{Bid, BidResponse, SeatBid},
};
