//! ISO 4217 currency codes and the two currency capabilities the exchange
//! hands around: parsing a code and converting between currencies.

pub mod conversions;
pub mod currency;

pub use {
    conversions::{ConversionError, Conversions, RateTable},
    currency::{Currency, CurrencyParsing, DEFAULT_CURRENCY, Iso4217, ParseError},
};

#[cfg(any(test, feature = "test-util"))]
pub use {conversions::MockConversions, currency::MockCurrencyParsing};
