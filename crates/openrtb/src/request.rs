use {
    serde::{Deserialize, Serialize},
    serde_with::skip_serializing_none,
};

/// The top-level bid request object sent to every bidder of an auction.
#[skip_serializing_none]
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BidRequest {
    pub id: String,
    #[serde(default)]
    pub imp: Vec<Imp>,
    /// Currencies the publisher accepts bids in, as ISO 4217 codes. An
    /// empty list means only the exchange's default currency is accepted.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cur: Vec<String>,
    /// Maximum time in milliseconds the exchange waits for bids.
    pub tmax: Option<u64>,
    /// Test mode flag; `1` means the auction is not billable.
    #[serde(default)]
    pub test: u8,
    pub ext: Option<serde_json::Value>,
}

/// One ad placement opportunity within a bid request.
#[skip_serializing_none]
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Imp {
    pub id: String,
    pub banner: Option<Banner>,
    pub video: Option<Video>,
    pub native: Option<Native>,
    #[serde(default)]
    pub bidfloor: f64,
    pub bidfloorcur: Option<String>,
    pub ext: Option<serde_json::Value>,
}

#[skip_serializing_none]
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Banner {
    pub w: Option<u64>,
    pub h: Option<u64>,
}

#[skip_serializing_none]
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Video {
    #[serde(default)]
    pub mimes: Vec<String>,
    pub w: Option<u64>,
    pub h: Option<u64>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Native {
    #[serde(default)]
    pub request: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_request() {
        let request: BidRequest = serde_json::from_str(
            r#"{
                "id": "auction-1",
                "imp": [
                    {"id": "imp1", "banner": {"w": 300, "h": 250}, "bidfloor": 0.5},
                    {"id": "imp2", "video": {"mimes": ["video/mp4"]}}
                ],
                "cur": ["USD", "eur"],
                "tmax": 300
            }"#,
        )
        .unwrap();

        assert_eq!(request.id, "auction-1");
        assert_eq!(request.cur, ["USD", "eur"]);
        assert_eq!(request.tmax, Some(300));
        assert_eq!(request.imp.len(), 2);
        assert_eq!(request.imp[0].bidfloor, 0.5);
        assert!(request.imp[1].banner.is_none());
        assert_eq!(request.imp[1].video.as_ref().unwrap().mimes, ["video/mp4"]);
    }

    #[test]
    fn missing_currency_list_is_empty() {
        let request: BidRequest = serde_json::from_str(r#"{"id": "a"}"#).unwrap();
        assert!(request.cur.is_empty());
        assert!(request.imp.is_empty());

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json, serde_json::json!({"id": "a", "imp": [], "test": 0}));
    }
}
