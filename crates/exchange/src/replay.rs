use {
    crate::bidder::{AdaptedBidder, BidType, BidderName, Error, SeatBid, TypedBid},
    anyhow::Context,
    currencies::Conversions,
    std::{path::PathBuf, sync::Arc},
};

/// A bidder answering every request with a recorded OpenRTB bid response.
///
/// The recording is read on every request so failures to read or parse it
/// surface the same way a failing network call to a real bidder would.
#[derive(Clone, Debug)]
pub struct ReplayBidder {
    recording: PathBuf,
}

impl ReplayBidder {
    pub fn new(recording: impl Into<PathBuf>) -> Self {
        Self {
            recording: recording.into(),
        }
    }

    async fn load(&self) -> anyhow::Result<openrtb::BidResponse> {
        let data = tokio::fs::read_to_string(&self.recording)
            .await
            .with_context(|| format!("failed to read recording {:?}", self.recording))?;
        serde_json::from_str(&data)
            .with_context(|| format!("malformed bid response in {:?}", self.recording))
    }
}

/// Flattens all seats of a bid response into one seat bid, scaling every
/// price by `bid_adjustment`.
pub fn seat_bid(response: openrtb::BidResponse, bid_adjustment: f64) -> Option<SeatBid> {
    if response.seatbid.is_empty() {
        return None;
    }
    let bids = response
        .seatbid
        .into_iter()
        .flat_map(|seat| seat.bid)
        .map(|mut bid| {
            bid.price *= bid_adjustment;
            TypedBid {
                bid_type: BidType::from_mtype(bid.mtype),
                bid: Some(bid),
            }
        })
        .collect();
    Some(SeatBid {
        bids,
        currency: response.cur,
    })
}

#[async_trait::async_trait]
impl AdaptedBidder for ReplayBidder {
    async fn request_bid(
        &self,
        request: &openrtb::BidRequest,
        name: &BidderName,
        bid_adjustment: f64,
        _conversions: Arc<dyn Conversions>,
    ) -> (Option<SeatBid>, Vec<Error>) {
        match self.load().await {
            Ok(response) => {
                if !response.id.is_empty() && response.id != request.id {
                    tracing::debug!(
                        %name,
                        recorded = %response.id,
                        requested = %request.id,
                        "replaying response recorded for another request"
                    );
                }
                (seat_bid(response, bid_adjustment), Vec::new())
            }
            Err(err) => (None, vec![Error::Bidder(err)]),
        }
    }
}
