use {
    crate::Currency,
    serde::Deserialize,
    std::collections::HashMap,
};

#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ConversionError {
    #[error("currency conversion rate not found: from '{from}' to '{to}'")]
    RateNotFound { from: Currency, to: Currency },
}

/// Currency conversion capability handed to bidders so they can express
/// their prices in a currency the request accepts.
#[cfg_attr(any(test, feature = "test-util"), mockall::automock)]
pub trait Conversions: Send + Sync {
    /// Returns how many units of `to` one unit of `from` is worth.
    fn rate(&self, from: Currency, to: Currency) -> Result<f64, ConversionError>;

    fn convert(&self, amount: f64, from: Currency, to: Currency) -> Result<f64, ConversionError> {
        Ok(amount * self.rate(from, to)?)
    }
}

/// A fixed table of conversion rates.
///
/// Rates are looked up directly, then through the inverse of the opposite
/// rate. Converting a currency to itself always yields `1.0`.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(transparent)]
pub struct RateTable {
    rates: HashMap<Currency, HashMap<Currency, f64>>,
}

impl RateTable {
    pub fn new(rates: HashMap<Currency, HashMap<Currency, f64>>) -> Self {
        Self { rates }
    }

    fn direct(&self, from: Currency, to: Currency) -> Option<f64> {
        self.rates
            .get(&from)
            .and_then(|rates| rates.get(&to))
            .copied()
            .filter(|rate| rate.is_finite() && *rate > 0.0)
    }
}

impl Conversions for RateTable {
    fn rate(&self, from: Currency, to: Currency) -> Result<f64, ConversionError> {
        if from == to {
            return Ok(1.0);
        }
        self.direct(from, to)
            .or_else(|| self.direct(to, from).map(|rate| 1.0 / rate))
            .ok_or(ConversionError::RateNotFound { from, to })
    }
}
