//! Option quote and cleaned sample types.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Call or put.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionType {
    /// Call option.
    Call,
    /// Put option.
    Put,
}

impl std::fmt::Display for OptionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OptionType::Call => write!(f, "call"),
            OptionType::Put => write!(f, "put"),
        }
    }
}

/// One row of an option chain, tagged with its type and expiration.
///
/// Market fields a provider may omit are optional; a missing field never
/// passes a positivity filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionQuote {
    /// Strike price.
    pub strike: f64,
    /// Best bid.
    pub bid: Option<f64>,
    /// Best ask.
    pub ask: Option<f64>,
    /// Last traded price.
    pub last_price: Option<f64>,
    /// Time of the last trade, timezone discarded.
    pub last_trade_date: Option<NaiveDateTime>,
    /// Contracts traded today.
    pub volume: Option<u64>,
    /// Open contracts.
    pub open_interest: Option<u64>,
    /// Provider implied volatility as a decimal.
    pub implied_volatility: Option<f64>,
    /// Call or put.
    pub option_type: OptionType,
    /// Expiration date.
    pub expiration_date: NaiveDate,
}

impl OptionQuote {
    /// Creates a quote with only the strike, type and expiration set.
    #[must_use]
    pub fn new(strike: f64, option_type: OptionType, expiration_date: NaiveDate) -> Self {
        Self {
            strike,
            bid: None,
            ask: None,
            last_price: None,
            last_trade_date: None,
            volume: None,
            open_interest: None,
            implied_volatility: None,
            option_type,
            expiration_date,
        }
    }

    /// Sets bid, ask and last price.
    #[must_use]
    pub fn with_prices(mut self, bid: f64, ask: f64, last_price: f64) -> Self {
        self.bid = Some(bid);
        self.ask = Some(ask);
        self.last_price = Some(last_price);
        self
    }

    /// Sets volume and open interest.
    #[must_use]
    pub fn with_activity(mut self, volume: Option<u64>, open_interest: Option<u64>) -> Self {
        self.volume = volume;
        self.open_interest = open_interest;
        self
    }

    /// Sets the implied volatility.
    #[must_use]
    pub fn with_implied_volatility(mut self, iv: f64) -> Self {
        self.implied_volatility = Some(iv);
        self
    }

    /// Sets the last trade time.
    #[must_use]
    pub fn with_last_trade(mut self, at: NaiveDateTime) -> Self {
        self.last_trade_date = Some(at);
        self
    }
}

/// A cleaned sample of the surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CleanedPoint {
    /// Strike over spot.
    pub moneyness: f64,
    /// Years to expiry.
    pub time_to_expiry: f64,
    /// Implied volatility as a decimal.
    pub implied_volatility: f64,
}

impl CleanedPoint {
    /// Creates a cleaned point.
    #[must_use]
    pub fn new(moneyness: f64, time_to_expiry: f64, implied_volatility: f64) -> Self {
        Self {
            moneyness,
            time_to_expiry,
            implied_volatility,
        }
    }
}
