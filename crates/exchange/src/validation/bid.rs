use {super::Error, crate::bidder::TypedBid};

/// Checks that a bid carries the fields the auction relies on.
///
/// Rules are checked in a fixed order and the first violation is reported.
/// Nothing besides these fields is looked at; in particular the `impid` is
/// not matched against the impressions of the request.
pub fn validate_bid(bid: &TypedBid) -> Result<(), Error> {
    let Some(bid) = &bid.bid else {
        return Err(Error::EmptyBid);
    };
    if bid.id.is_empty() {
        return Err(Error::MissingId);
    }
    if bid.impid.is_empty() {
        return Err(Error::MissingImpId(bid.id.clone()));
    }
    // NaN never compares as positive
    if bid.price.is_nan() || bid.price <= 0.0 {
        return Err(Error::NonPositivePrice(bid.id.clone()));
    }
    if bid.crid.is_empty() {
        return Err(Error::MissingCreativeId(bid.id.clone()));
    }
    Ok(())
}
