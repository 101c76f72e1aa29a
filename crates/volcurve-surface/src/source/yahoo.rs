//! Yahoo Finance option chains over blocking HTTP.
//!
//! Uses the unofficial `v7/finance` endpoints. Data is delayed and meant
//! for research use.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use serde::Deserialize;

use super::{OptionChain, OptionChainSource};
use crate::error::{SurfaceError, SurfaceResult};
use crate::quote::{OptionQuote, OptionType};

const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com/v7/finance";
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Yahoo Finance client.
#[derive(Debug, Clone)]
pub struct YahooSource {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl YahooSource {
    /// Creates a client against the public endpoint.
    ///
    /// # Errors
    ///
    /// Returns `DataRetrieval` if the HTTP client cannot be built.
    pub fn new() -> SurfaceResult<Self> {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Creates a client against another base URL.
    pub fn with_base_url(base_url: impl Into<String>) -> SurfaceResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    fn get<T: serde::de::DeserializeOwned>(&self, url: &str) -> SurfaceResult<T> {
        tracing::debug!(url, "requesting");
        let response = self.client.get(url).send()?.error_for_status()?;
        response
            .json()
            .map_err(|e| SurfaceError::retrieval(format!("malformed response from {url}: {e}")))
    }

    fn options(&self, symbol: &str, date: Option<i64>) -> SurfaceResult<OptionChainData> {
        let url = match date {
            Some(ts) => format!("{}/options/{symbol}?date={ts}", self.base_url),
            None => format!("{}/options/{symbol}", self.base_url),
        };
        let response: OptionsResponse = self.get(&url)?;
        response
            .option_chain
            .result
            .into_iter()
            .next()
            .ok_or_else(|| SurfaceError::retrieval(format!("no option data returned for {symbol}")))
    }
}

impl OptionChainSource for YahooSource {
    fn name(&self) -> &str {
        "yahoo"
    }

    fn spot_price(&self, symbol: &str) -> SurfaceResult<f64> {
        let url = format!("{}/quote?symbols={symbol}", self.base_url);
        let response: QuoteResponse = self.get(&url)?;
        spot_from_response(response, symbol)
    }

    fn expirations(&self, symbol: &str) -> SurfaceResult<Vec<NaiveDate>> {
        Ok(expirations_from_data(&self.options(symbol, None)?))
    }

    fn option_chain(&self, symbol: &str, expiration: NaiveDate) -> SurfaceResult<OptionChain> {
        let ts = expiration.and_time(NaiveTime::MIN).and_utc().timestamp();
        let data = self.options(symbol, Some(ts))?;
        Ok(chain_from_data(data, expiration))
    }
}

fn spot_from_response(response: QuoteResponse, symbol: &str) -> SurfaceResult<f64> {
    response
        .quote_response
        .result
        .into_iter()
        .next()
        .and_then(|q| q.regular_market_price)
        .ok_or_else(|| SurfaceError::retrieval(format!("no spot price returned for {symbol}")))
}

fn expirations_from_data(data: &OptionChainData) -> Vec<NaiveDate> {
    let mut dates: Vec<NaiveDate> = data
        .expiration_dates
        .iter()
        .filter_map(|&ts| DateTime::from_timestamp(ts, 0).map(|dt| dt.date_naive()))
        .collect();
    dates.sort_unstable();
    dates.dedup();
    dates
}

fn chain_from_data(data: OptionChainData, expiration: NaiveDate) -> OptionChain {
    let Some(options) = data.options.into_iter().next() else {
        return OptionChain::default();
    };
    let convert = |rows: Vec<OptionRow>, option_type| -> Vec<OptionQuote> {
        let total = rows.len();
        let quotes: Vec<OptionQuote> = rows
            .into_iter()
            .filter_map(|row| row.into_quote(option_type, expiration))
            .collect();
        if quotes.len() < total {
            tracing::warn!(
                %expiration,
                %option_type,
                skipped = total - quotes.len(),
                "skipped rows without a strike"
            );
        }
        quotes
    };
    OptionChain {
        calls: convert(options.calls, OptionType::Call),
        puts: convert(options.puts, OptionType::Put),
    }
}

// Yahoo Finance response structures

#[derive(Debug, Deserialize)]
struct QuoteResponse {
    #[serde(rename = "quoteResponse")]
    quote_response: QuoteResult,
}

#[derive(Debug, Deserialize)]
struct QuoteResult {
    result: Vec<QuoteData>,
}

#[derive(Debug, Deserialize)]
struct QuoteData {
    #[serde(rename = "regularMarketPrice")]
    regular_market_price: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OptionsResponse {
    #[serde(rename = "optionChain")]
    option_chain: OptionChainResult,
}

#[derive(Debug, Deserialize)]
struct OptionChainResult {
    result: Vec<OptionChainData>,
}

#[derive(Debug, Deserialize)]
struct OptionChainData {
    #[serde(rename = "expirationDates", default)]
    expiration_dates: Vec<i64>,
    #[serde(default)]
    options: Vec<OptionsBlock>,
}

#[derive(Debug, Deserialize)]
struct OptionsBlock {
    #[serde(default)]
    calls: Vec<OptionRow>,
    #[serde(default)]
    puts: Vec<OptionRow>,
}

#[derive(Debug, Deserialize)]
struct OptionRow {
    strike: Option<f64>,
    bid: Option<f64>,
    ask: Option<f64>,
    #[serde(rename = "lastPrice")]
    last_price: Option<f64>,
    #[serde(rename = "lastTradeDate")]
    last_trade_date: Option<i64>,
    volume: Option<i64>,
    #[serde(rename = "openInterest")]
    open_interest: Option<i64>,
    #[serde(rename = "impliedVolatility")]
    implied_volatility: Option<f64>,
}

impl OptionRow {
    fn into_quote(self, option_type: OptionType, expiration: NaiveDate) -> Option<OptionQuote> {
        let mut quote = OptionQuote::new(self.strike?, option_type, expiration);
        quote.bid = self.bid;
        quote.ask = self.ask;
        quote.last_price = self.last_price;
        quote.last_trade_date = self.last_trade_date.and_then(unix_to_naive);
        quote.volume = self.volume.and_then(|v| u64::try_from(v).ok());
        quote.open_interest = self.open_interest.and_then(|v| u64::try_from(v).ok());
        quote.implied_volatility = self.implied_volatility;
        Some(quote)
    }
}

fn unix_to_naive(ts: i64) -> Option<NaiveDateTime> {
    DateTime::from_timestamp(ts, 0).map(|dt| dt.naive_utc())
}
