use {
    crate::bidder::{AdaptedBidder, BidderName, Error, SeatBid},
    anyhow::anyhow,
    currencies::Conversions,
    futures::future::join_all,
    std::{sync::Arc, time::Duration},
};

/// A bidder taking part in auctions, with its settings.
#[derive(Clone)]
pub struct Participant {
    pub name: BidderName,
    pub bid_adjustment: f64,
    pub bidder: Arc<dyn AdaptedBidder>,
}

/// What one bidder answered.
#[derive(Debug)]
pub struct BidderResponse {
    pub bidder: BidderName,
    pub seat_bid: Option<SeatBid>,
    pub errors: Vec<Error>,
}

/// Asks every participant for bids at the same time, each on its own task.
///
/// Responses are returned in the order of `participants`. A bidder that
/// doesn't answer within the request's `tmax` or whose task panics gets a
/// single bidder error instead of a seat bid; the others are not affected.
pub async fn request_bids(
    request: Arc<openrtb::BidRequest>,
    participants: &[Participant],
    conversions: Arc<dyn Conversions>,
) -> Vec<BidderResponse> {
    let timeout = request
        .tmax
        .filter(|tmax| *tmax > 0)
        .map(Duration::from_millis);

    let tasks = participants.iter().map(|participant| {
        let request = request.clone();
        let conversions = conversions.clone();
        let participant = participant.clone();
        tokio::spawn(async move {
            let call = participant.bidder.request_bid(
                &request,
                &participant.name,
                participant.bid_adjustment,
                conversions,
            );
            match timeout {
                Some(timeout) => tokio::time::timeout(timeout, call)
                    .await
                    .unwrap_or_else(|_| {
                        let err = anyhow!("bidder did not respond within {}ms", timeout.as_millis());
                        (None, vec![Error::Bidder(err)])
                    }),
                None => call.await,
            }
        })
    });

    join_all(tasks)
        .await
        .into_iter()
        .zip(participants)
        .map(|(result, participant)| {
            let (seat_bid, errors) = result.unwrap_or_else(|err| {
                tracing::error!(bidder = %participant.name, ?err, "bidder task failed");
                (None, vec![Error::Bidder(anyhow!("bidder task failed: {err}"))])
            });
            BidderResponse {
                bidder: participant.name.clone(),
                seat_bid,
                errors,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::{
            bidder::{BidType, MockAdaptedBidder, TypedBid},
            validation::ensure_valid_bids,
        },
        currencies::MockConversions,
    };

    fn seat_bid(price: f64) -> SeatBid {
        SeatBid {
            bids: vec![TypedBid {
                bid: Some(openrtb::Bid {
                    id: "b1".to_owned(),
                    impid: "imp1".to_owned(),
                    price,
                    crid: "c1".to_owned(),
                    ..Default::default()
                }),
                bid_type: BidType::Banner,
            }],
            currency: String::new(),
        }
    }

    fn participant(name: &str, bid_adjustment: f64, bidder: impl AdaptedBidder + 'static) -> Participant {
        Participant {
            name: name.into(),
            bid_adjustment,
            bidder: Arc::new(bidder),
        }
    }

    #[tokio::test]
    async fn collects_responses_in_participant_order() {
        let mut adjusted = MockAdaptedBidder::new();
        adjusted
            .expect_request_bid()
            .withf(|_, name, bid_adjustment, _| {
                name.as_str() == "adjusted" && *bid_adjustment == 2.0
            })
            .returning(|_, _, _, _| (Some(seat_bid(1.0)), Vec::new()));
        let mut broken = MockAdaptedBidder::new();
        broken
            .expect_request_bid()
            .returning(|_, _, _, _| (Some(seat_bid(0.0)), Vec::new()));

        let participants = [
            participant("adjusted", 2.0, adjusted),
            participant("broken", 1.0, ensure_valid_bids(broken)),
        ];
        let responses = request_bids(
            Arc::new(openrtb::BidRequest::default()),
            &participants,
            Arc::new(MockConversions::new()),
        )
        .await;

        assert_eq!(responses.len(), 2);
        assert_eq!(responses[0].bidder.as_str(), "adjusted");
        assert_eq!(responses[0].seat_bid, Some(seat_bid(1.0)));
        assert!(responses[0].errors.is_empty());
        assert_eq!(responses[1].bidder.as_str(), "broken");
        assert!(responses[1].seat_bid.as_ref().unwrap().bids.is_empty());
        assert_eq!(
            responses[1].errors[0].to_string(),
            "Bid \"b1\" does not contain a positive 'price'"
        );
    }

    struct Hanging;

    #[async_trait::async_trait]
    impl AdaptedBidder for Hanging {
        async fn request_bid(
            &self,
            _request: &openrtb::BidRequest,
            _name: &BidderName,
            _bid_adjustment: f64,
            _conversions: Arc<dyn Conversions>,
        ) -> (Option<SeatBid>, Vec<Error>) {
            futures::future::pending().await
        }
    }

    #[tokio::test(start_paused = true)]
    async fn bidders_exceeding_tmax_time_out() {
        let mut fast = MockAdaptedBidder::new();
        fast.expect_request_bid()
            .returning(|_, _, _, _| (Some(seat_bid(1.0)), Vec::new()));
        let request = openrtb::BidRequest {
            tmax: Some(200),
            ..Default::default()
        };

        let responses = request_bids(
            Arc::new(request),
            &[participant("hanging", 1.0, Hanging), participant("fast", 1.0, fast)],
            Arc::new(MockConversions::new()),
        )
        .await;

        assert!(responses[0].seat_bid.is_none());
        assert_eq!(
            responses[0].errors[0].to_string(),
            "bidder did not respond within 200ms"
        );
        assert_eq!(responses[1].seat_bid, Some(seat_bid(1.0)));
    }

    struct Panicking;

    #[async_trait::async_trait]
    impl AdaptedBidder for Panicking {
        async fn request_bid(
            &self,
            _request: &openrtb::BidRequest,
            _name: &BidderName,
            _bid_adjustment: f64,
            _conversions: Arc<dyn Conversions>,
        ) -> (Option<SeatBid>, Vec<Error>) {
            panic!("adapter bug")
        }
    }

    #[tokio::test]
    async fn panicking_bidder_only_fails_itself() {
        let mut healthy = MockAdaptedBidder::new();
        healthy
            .expect_request_bid()
            .returning(|_, _, _, _| (Some(seat_bid(3.0)), Vec::new()));

        let responses = request_bids(
            Arc::new(openrtb::BidRequest::default()),
            &[
                participant("panicking", 1.0, Panicking),
                participant("healthy", 1.0, healthy),
            ],
            Arc::new(MockConversions::new()),
        )
        .await;

        assert!(responses[0].seat_bid.is_none());
        assert_eq!(responses[0].errors[0].reason(), "bidder");
        assert!(
            responses[0].errors[0]
                .to_string()
                .starts_with("bidder task failed")
        );
        assert_eq!(responses[1].seat_bid, Some(seat_bid(3.0)));
    }
}
