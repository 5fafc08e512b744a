use {
    super::Error,
    currencies::{CurrencyParsing, DEFAULT_CURRENCY},
};

/// Checks that the currency a seat bid is priced in is one the request
/// accepts.
///
/// An empty `bid_currency` means the default currency, and so does an empty
/// `allowed` list. Allowed codes are compared upper-cased against the
/// canonical form of the parsed bid currency.
pub fn validate_currency(
    allowed: &[String],
    bid_currency: &str,
    currencies: &dyn CurrencyParsing,
) -> Result<(), Error> {
    let bid_currency = match bid_currency {
        "" => DEFAULT_CURRENCY.as_str(),
        code => code,
    };
    let currency = currencies.parse(bid_currency)?;

    let default_allowed;
    let allowed = if allowed.is_empty() {
        default_allowed = [DEFAULT_CURRENCY.to_string()];
        &default_allowed[..]
    } else {
        allowed
    };

    if allowed
        .iter()
        .any(|code| code.to_uppercase() == currency.as_str())
    {
        return Ok(());
    }
    Err(Error::CurrencyNotAllowed {
        actual: currency,
        allowed: allowed.to_vec(),
    })
}
