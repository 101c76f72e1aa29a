//! Option chains from a CSV file.
//!
//! One row per quote with the header
//!
//! ```text
//! expiration_date,option_type,strike,bid,ask,last_price,last_trade_date,volume,open_interest,implied_volatility
//! ```
//!
//! Dates are ISO 8601 (`2024-06-14`, `2024-06-07T16:00:00`) and
//! `option_type` is `call` or `put`. Empty cells are treated as missing.
//! A CSV file carries no spot price, so one is supplied on construction.

use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;

use super::{OptionChain, OptionChainSource};
use crate::error::{SurfaceError, SurfaceResult};
use crate::quote::{OptionQuote, OptionType};

/// Offline source backed by quotes loaded from CSV.
#[derive(Debug, Clone)]
pub struct CsvChainSource {
    spot: f64,
    quotes: Vec<OptionQuote>,
}

impl CsvChainSource {
    /// Loads every quote in the file.
    ///
    /// # Errors
    ///
    /// Returns `DataRetrieval` if the file cannot be read or a row fails to
    /// parse.
    pub fn new(path: impl AsRef<Path>, spot: f64) -> SurfaceResult<Self> {
        let path = path.as_ref();
        let reader = csv::Reader::from_path(path)
            .map_err(|e| SurfaceError::retrieval(format!("{}: {e}", path.display())))?;
        let source = Self::load(reader, spot)?;
        tracing::info!(path = %path.display(), rows = source.quotes.len(), "loaded option quotes");
        Ok(source)
    }

    /// Loads quotes from any reader of CSV text.
    pub fn from_reader<R: Read>(reader: R, spot: f64) -> SurfaceResult<Self> {
        Self::load(csv::Reader::from_reader(reader), spot)
    }

    fn load<R: Read>(mut reader: csv::Reader<R>, spot: f64) -> SurfaceResult<Self> {
        let quotes = reader
            .deserialize()
            .collect::<Result<Vec<OptionQuote>, csv::Error>>()?;
        Ok(Self { spot, quotes })
    }

    /// All loaded quotes.
    pub fn quotes(&self) -> &[OptionQuote] {
        &self.quotes
    }
}

impl OptionChainSource for CsvChainSource {
    fn name(&self) -> &str {
        "csv"
    }

    fn spot_price(&self, _symbol: &str) -> SurfaceResult<f64> {
        Ok(self.spot)
    }

    fn expirations(&self, _symbol: &str) -> SurfaceResult<Vec<NaiveDate>> {
        let mut dates: Vec<NaiveDate> = self.quotes.iter().map(|q| q.expiration_date).collect();
        dates.sort_unstable();
        dates.dedup();
        Ok(dates)
    }

    fn option_chain(&self, _symbol: &str, expiration: NaiveDate) -> SurfaceResult<OptionChain> {
        let (calls, puts): (Vec<OptionQuote>, Vec<OptionQuote>) = self
            .quotes
            .iter()
            .filter(|q| q.expiration_date == expiration)
            .cloned()
            .partition(|q| q.option_type == OptionType::Call);
        Ok(OptionChain { calls, puts })
    }
}
