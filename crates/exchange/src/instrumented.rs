use {
    crate::bidder::{AdaptedBidder, BidderName, Error, SeatBid},
    currencies::Conversions,
    prometheus::{HistogramVec, IntCounterVec},
    std::{sync::Arc, time::Instant},
    tracing::Instrument,
};

/// A bidder that logs and measures every request of the bidder it wraps.
///
/// Put it outermost so that it also sees the errors of validation.
pub struct InstrumentedBidder<T> {
    inner: T,
    metrics: &'static Metrics,
}

impl<T> InstrumentedBidder<T> {
    pub fn new(inner: T) -> Self {
        Self {
            inner,
            metrics: Metrics::get(),
        }
    }

    fn observe(&self, name: &BidderName, seat_bid: Option<&SeatBid>, errors: &[Error]) {
        let bids = seat_bid.map_or(0, |seat_bid| seat_bid.bids.len());
        self.metrics
            .bidder_bids
            .with_label_values(&[name.as_str()])
            .inc_by(bids as u64);

        for err in errors {
            self.metrics
                .bidder_errors
                .with_label_values(&[name.as_str(), err.reason()])
                .inc();
            match err {
                Error::Bidder(err) => tracing::warn!(?err, "bidder request failed"),
                Error::Validation(err) if err.is_currency_error() => {
                    tracing::debug!(%err, "discarded seat bid")
                }
                Error::Validation(err) => {
                    tracing::debug!(bid = ?err.bid_id(), %err, "discarded bid")
                }
            }
        }
        tracing::debug!(bids, errors = errors.len(), "bidder responded");
    }
}

#[async_trait::async_trait]
impl<T: AdaptedBidder> AdaptedBidder for InstrumentedBidder<T> {
    async fn request_bid(
        &self,
        request: &openrtb::BidRequest,
        name: &BidderName,
        bid_adjustment: f64,
        conversions: Arc<dyn Conversions>,
    ) -> (Option<SeatBid>, Vec<Error>) {
        async {
            let start = Instant::now();
            let (seat_bid, errors) = self
                .inner
                .request_bid(request, name, bid_adjustment, conversions)
                .await;
            self.metrics
                .bidder_request_times
                .with_label_values(&[name.as_str()])
                .observe(start.elapsed().as_secs_f64());
            self.observe(name, seat_bid.as_ref(), &errors);
            (seat_bid, errors)
        }
        .instrument(tracing::info_span!("bidder", name = %name, request = %request.id))
        .await
    }
}

#[derive(prometheus_metric_storage::MetricStorage)]
struct Metrics {
    /// Time spent waiting for bidder responses.
    #[metric(labels("bidder"))]
    bidder_request_times: HistogramVec,

    /// Bids handed on to the auction.
    #[metric(labels("bidder"))]
    bidder_bids: IntCounterVec,

    /// Errors returned with bidder responses.
    #[metric(labels("bidder", "reason"))]
    bidder_errors: IntCounterVec,
}

impl Metrics {
    fn get() -> &'static Self {
        Self::instance(observe::metrics::get_storage_registry())
            .expect("unexpected error getting metrics instance")
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::{
            bidder::{BidType, MockAdaptedBidder, TypedBid},
            validation::{self, ensure_valid_bids},
        },
        currencies::MockConversions,
    };

    fn bid(id: &str, price: f64) -> TypedBid {
        TypedBid {
            bid: Some(openrtb::Bid {
                id: id.to_owned(),
                impid: "imp1".to_owned(),
                price,
                crid: "c1".to_owned(),
                ..Default::default()
            }),
            bid_type: BidType::Banner,
        }
    }

    fn init() {
        observe::tracing::initialize_reentrant(
            &observe::Config::default().with_env_filter("exchange=debug"),
        );
        observe::metrics::setup_registry_reentrant(Some("exchange".to_owned()), None);
    }

    #[tokio::test]
    async fn records_metrics_for_each_response() {
        init();
        let mut inner = MockAdaptedBidder::new();
        inner.expect_request_bid().times(2).returning(|_, _, _, _| {
            (
                Some(SeatBid {
                    bids: vec![bid("b1", 1.0), bid("b2", 0.0), bid("b3", -1.0)],
                    currency: String::new(),
                }),
                vec![anyhow::anyhow!("timeout on one imp").into()],
            )
        });
        let bidder = InstrumentedBidder::new(ensure_valid_bids(inner));
        // Metrics are global, a bidder name unique to this test keeps the
        // counts isolated.
        let name = BidderName::from("instrumented-test");
        let request = openrtb::BidRequest::default();

        for _ in 0..2 {
            let (seat_bid, errors) = bidder
                .request_bid(&request, &name, 1.0, Arc::new(MockConversions::new()))
                .await;
            assert_eq!(seat_bid.unwrap().bids.len(), 1);
            assert_eq!(errors.len(), 3);
        }

        let metrics = bidder.metrics;
        assert_eq!(
            metrics
                .bidder_bids
                .with_label_values(&["instrumented-test"])
                .get(),
            2
        );
        let error_count = |reason: &str| {
            metrics
                .bidder_errors
                .with_label_values(&["instrumented-test", reason])
                .get()
        };
        assert_eq!(error_count("bidder"), 2);
        assert_eq!(
            error_count(validation::Error::NonPositivePrice(String::new()).reason()),
            4
        );
        assert_eq!(error_count("currency_not_allowed"), 0);
        assert_eq!(
            metrics
                .bidder_request_times
                .with_label_values(&["instrumented-test"])
                .get_sample_count(),
            2
        );
    }

    #[tokio::test]
    async fn counts_no_bids_for_missing_seat_bid() {
        init();
        let mut inner = MockAdaptedBidder::new();
        inner
            .expect_request_bid()
            .returning(|_, _, _, _| (None, Vec::new()));
        let bidder = InstrumentedBidder::new(inner);

        let (seat_bid, errors) = bidder
            .request_bid(
                &openrtb::BidRequest::default(),
                &"instrumented-no-bid".into(),
                1.0,
                Arc::new(MockConversions::new()),
            )
            .await;

        assert!(seat_bid.is_none());
        assert!(errors.is_empty());
        assert_eq!(
            bidder
                .metrics
                .bidder_bids
                .with_label_values(&["instrumented-no-bid"])
                .get(),
            0
        );
    }
}
