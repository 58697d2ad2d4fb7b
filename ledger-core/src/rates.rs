//! Static exchange-rate table
//!
//! Conversion factors between the supported currency codes. The table is
//! built once at startup and is immutable for the process lifetime; there is
//! no write path. The matrix must be complete (every currency present maps
//! to every other currency present) and carry a self-rate of exactly 1, but
//! it is not required to be symmetric: `rate(a, b) * rate(b, a)` may differ
//! from 1.

use std::collections::HashMap;

use common::decimal::{dec, precision, Amount, Rate};
use common::error::{Error, Result};
use common::model::currency::Currency;
use rust_decimal::Decimal;

/// Immutable lookup of conversion factors between currency codes
#[derive(Debug, Clone)]
pub struct ExchangeRateTable {
    rates: HashMap<Currency, HashMap<Currency, Rate>>,
}

impl ExchangeRateTable {
    /// Build a table from a rate matrix, validating its shape
    ///
    /// Every currency present must have a self-rate of exactly 1 and an
    /// entry for every other currency in the matrix.
    pub fn new(rates: HashMap<Currency, HashMap<Currency, Rate>>) -> Result<Self> {
        for (&from, row) in &rates {
            match row.get(&from) {
                Some(&rate) if rate == Decimal::ONE => {}
                Some(_) => {
                    return Err(Error::ConfigurationError(format!(
                        "Self-rate for {} must be exactly 1",
                        from
                    )));
                }
                None => {
                    return Err(Error::ConfigurationError(format!(
                        "Missing self-rate for {}",
                        from
                    )));
                }
            }
            for &to in rates.keys() {
                if !row.contains_key(&to) {
                    return Err(Error::ConfigurationError(format!(
                        "Missing rate {} -> {}",
                        from, to
                    )));
                }
            }
        }
        Ok(Self { rates })
    }

    /// Whether the table carries the given currency
    pub fn supports(&self, currency: Currency) -> bool {
        self.rates.contains_key(&currency)
    }

    /// The currencies carried by this table
    pub fn currencies(&self) -> Vec<Currency> {
        let mut currencies: Vec<Currency> = self.rates.keys().copied().collect();
        currencies.sort();
        currencies
    }

    /// Conversion factor from one currency to another
    ///
    /// `rate(x, x)` is 1 for every supported `x`.
    pub fn rate(&self, from: Currency, to: Currency) -> Result<Rate> {
        let row = self
            .rates
            .get(&from)
            .ok_or_else(|| Error::UnsupportedCurrency(from.to_string()))?;
        row.get(&to)
            .copied()
            .ok_or_else(|| Error::UnsupportedCurrency(to.to_string()))
    }

    /// Convert an amount between currencies
    ///
    /// The result is rounded to the standard amount precision.
    pub fn convert(&self, amount: Amount, from: Currency, to: Currency) -> Result<Amount> {
        let rate = self.rate(from, to)?;
        amount
            .checked_mul(rate)
            .map(precision::round_amount)
            .ok_or_else(|| {
                Error::InvalidAmount(format!("Conversion overflow: {} {} -> {}", amount, from, to))
            })
    }
}

impl Default for ExchangeRateTable {
    /// The built-in USD/EUR/GBP matrix
    fn default() -> Self {
        let rates = HashMap::from([
            (
                Currency::USD,
                HashMap::from([
                    (Currency::USD, dec!(1)),
                    (Currency::EUR, dec!(0.85)),
                    (Currency::GBP, dec!(0.75)),
                ]),
            ),
            (
                Currency::EUR,
                HashMap::from([
                    (Currency::EUR, dec!(1)),
                    (Currency::USD, dec!(1.18)),
                    (Currency::GBP, dec!(0.88)),
                ]),
            ),
            (
                Currency::GBP,
                HashMap::from([
                    (Currency::GBP, dec!(1)),
                    (Currency::USD, dec!(1.33)),
                    (Currency::EUR, dec!(1.14)),
                ]),
            ),
        ]);

        // The built-in matrix always passes validation
        Self { rates }
    }
}
