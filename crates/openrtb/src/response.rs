use {
    serde::{Deserialize, Serialize},
    serde_with::skip_serializing_none,
};

/// A bidder's answer to a [`crate::BidRequest`].
#[skip_serializing_none]
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BidResponse {
    pub id: String,
    #[serde(default)]
    pub seatbid: Vec<SeatBid>,
    /// Currency of all bid prices in the response. Empty means the default
    /// currency.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub cur: String,
    /// No-bid reason code.
    pub nbr: Option<u32>,
}

#[skip_serializing_none]
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SeatBid {
    #[serde(default)]
    pub bid: Vec<Bid>,
    pub seat: Option<String>,
}

/// A single priced offer for one impression.
///
/// The required fields default to empty values instead of failing
/// deserialization, bid validation reports them as missing.
#[skip_serializing_none]
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Bid {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub impid: String,
    #[serde(default)]
    pub price: f64,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub crid: String,
    pub adm: Option<String>,
    pub nurl: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub adomain: Vec<String>,
    pub dealid: Option<String>,
    pub w: Option<u64>,
    pub h: Option<u64>,
    /// Markup type: 1 banner, 2 video, 3 audio, 4 native.
    pub mtype: Option<u8>,
    pub ext: Option<serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn incomplete_bids_still_parse() {
        let response: BidResponse = serde_json::from_str(
            r#"{
                "id": "auction-1",
                "cur": "EUR",
                "seatbid": [{
                    "seat": "seat-a",
                    "bid": [
                        {"id": "b1", "impid": "imp1", "price": 1.25, "crid": "c1", "mtype": 2},
                        {"impid": "imp2"}
                    ]
                }]
            }"#,
        )
        .unwrap();

        assert_eq!(response.cur, "EUR");
        let bids = &response.seatbid[0].bid;
        assert_eq!(bids[0].mtype, Some(2));
        assert_eq!(bids[0].price, 1.25);
        assert_eq!(bids[1].id, "");
        assert_eq!(bids[1].price, 0.0);
        assert_eq!(bids[1].crid, "");
    }

    #[test]
    fn no_bid_response() {
        let response: BidResponse = serde_json::from_str(r#"{"id": "a", "nbr": 2}"#).unwrap();
        assert!(response.seatbid.is_empty());
        assert!(response.cur.is_empty());
        assert_eq!(response.nbr, Some(2));
    }
}
