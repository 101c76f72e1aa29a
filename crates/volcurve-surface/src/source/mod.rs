//! Market data sources for option chains.
//!
//! A source answers three questions about a symbol: its spot price, its
//! listed expirations and the call and put rows for one expiration.
//! [`fetch_snapshot`] walks every expiration and gathers all rows.

mod file;
mod yahoo;

pub use file::CsvChainSource;
pub use yahoo::YahooSource;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{SurfaceError, SurfaceResult};
use crate::quote::OptionQuote;

/// Calls and puts for one expiration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OptionChain {
    /// Call rows.
    pub calls: Vec<OptionQuote>,
    /// Put rows.
    pub puts: Vec<OptionQuote>,
}

impl OptionChain {
    /// Total rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.calls.len() + self.puts.len()
    }

    /// Returns true if the chain has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.calls.is_empty() && self.puts.is_empty()
    }

    /// Calls followed by puts.
    #[must_use]
    pub fn into_quotes(self) -> Vec<OptionQuote> {
        let mut quotes = self.calls;
        quotes.extend(self.puts);
        quotes
    }
}

/// Provider of spot prices and option chains.
pub trait OptionChainSource {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Latest spot price of the underlying.
    fn spot_price(&self, symbol: &str) -> SurfaceResult<f64>;

    /// Listed expiration dates, ascending.
    fn expirations(&self, symbol: &str) -> SurfaceResult<Vec<NaiveDate>>;

    /// Call and put rows for one expiration, each tagged with its type and
    /// expiration date.
    fn option_chain(&self, symbol: &str, expiration: NaiveDate) -> SurfaceResult<OptionChain>;
}

/// Spot price and every option row for a symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketSnapshot {
    /// Underlying symbol.
    pub symbol: String,
    /// Spot price.
    pub spot: f64,
    /// Rows across all expirations.
    pub quotes: Vec<OptionQuote>,
}

/// Fetches the spot price and the chain for every expiration.
///
/// # Errors
///
/// Returns `DataRetrieval` if the source fails at any step or lists no
/// expirations. A failed expiration aborts the whole fetch.
pub fn fetch_snapshot<S>(source: &S, symbol: &str) -> SurfaceResult<MarketSnapshot>
where
    S: OptionChainSource + ?Sized,
{
    let spot = source.spot_price(symbol)?;
    let expirations = source.expirations(symbol)?;
    if expirations.is_empty() {
        return Err(SurfaceError::retrieval(format!(
            "{} lists no option expirations for {symbol}",
            source.name()
        )));
    }
    tracing::info!(
        source = source.name(),
        symbol,
        spot,
        expirations = expirations.len(),
        "fetching option chains"
    );

    let mut quotes = Vec::new();
    for expiration in expirations {
        let chain = source.option_chain(symbol, expiration)?;
        tracing::debug!(
            %expiration,
            calls = chain.calls.len(),
            puts = chain.puts.len(),
            "fetched chain"
        );
        quotes.extend(chain.into_quotes());
    }

    Ok(MarketSnapshot {
        symbol: symbol.to_string(),
        spot,
        quotes,
    })
}
