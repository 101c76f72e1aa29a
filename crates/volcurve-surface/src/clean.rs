//! Quote cleaning.
//!
//! Raw chain rows go through a fixed sequence of keep-filters. Each filter
//! is written as the condition a row must satisfy, so a missing or NaN
//! field never survives. The stages run in this order:
//!
//! 1. positive time to expiry and positive implied volatility
//! 2. positive bid and positive ask
//! 3. positive volume or positive open interest
//! 4. positive last price and `(ask - bid) / last_price <= max_spread_pct`
//! 5. `moneyness_min <= strike / spot <= moneyness_max`
//! 6. `bid <= ask`

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use volcurve_config::SurfaceConfig;

use crate::error::{SurfaceError, SurfaceResult};
use crate::quote::{CleanedPoint, OptionQuote};

const SECONDS_PER_DAY: i64 = 86_400;

/// Years between a trade and expiry, counting whole days only.
///
/// The expiration is taken at midnight. Partial days are floored, so a
/// trade later than the expiration midnight gives a negative day count.
#[must_use]
pub fn time_to_expiry(expiration: NaiveDate, last_trade: NaiveDateTime, basis: f64) -> f64 {
    let elapsed = expiration.and_time(NaiveTime::MIN) - last_trade;
    let days = elapsed.num_seconds().div_euclid(SECONDS_PER_DAY);
    days as f64 / basis
}

/// Number of rows removed at each cleaning stage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleaningReport {
    /// Rows received.
    pub input: usize,
    /// Expired, untraded or without a positive implied volatility.
    pub expired_or_no_iv: usize,
    /// Missing or non-positive bid or ask.
    pub no_market: usize,
    /// Neither volume nor open interest.
    pub inactive: usize,
    /// Non-positive last price or spread too wide.
    pub wide_spread: usize,
    /// Moneyness outside the band.
    pub out_of_band: usize,
    /// Bid above ask.
    pub crossed: usize,
    /// Rows kept.
    pub kept: usize,
}

impl CleaningReport {
    /// Total rows removed.
    #[must_use]
    pub fn dropped(&self) -> usize {
        self.input - self.kept
    }
}

/// Cleaned samples together with the per-stage counts.
#[derive(Debug, Clone, PartialEq)]
pub struct CleanedQuotes {
    /// Surviving samples, in input order.
    pub points: Vec<CleanedPoint>,
    /// Per-stage counts.
    pub report: CleaningReport,
}

struct Candidate<'a> {
    quote: &'a OptionQuote,
    time_to_expiry: Option<f64>,
}

fn positive(value: Option<f64>) -> bool {
    value.is_some_and(|v| v > 0.0)
}

fn positive_count(value: Option<u64>) -> bool {
    value.is_some_and(|v| v > 0)
}

/// Applies `keep` and returns how many rows it removed.
fn retain_counting<T>(rows: &mut Vec<T>, keep: impl FnMut(&T) -> bool) -> usize {
    let before = rows.len();
    rows.retain(keep);
    before - rows.len()
}

/// Filters raw quotes into surface samples.
///
/// # Errors
///
/// Returns `InvalidInput` if `spot` is not a positive finite number and
/// `DataInsufficient` if no row survives.
pub fn clean_quotes(
    quotes: &[OptionQuote],
    spot: f64,
    config: &SurfaceConfig,
) -> SurfaceResult<CleanedQuotes> {
    if !(spot.is_finite() && spot > 0.0) {
        return Err(SurfaceError::invalid_input(format!(
            "spot price must be positive, got {spot}"
        )));
    }

    let mut rows: Vec<Candidate<'_>> = quotes
        .iter()
        .map(|quote| Candidate {
            quote,
            time_to_expiry: quote.last_trade_date.map(|traded| {
                time_to_expiry(quote.expiration_date, traded, config.day_count_basis)
            }),
        })
        .collect();

    let mut report = CleaningReport {
        input: rows.len(),
        ..CleaningReport::default()
    };

    report.expired_or_no_iv = retain_counting(&mut rows, |c| {
        positive(c.time_to_expiry) && positive(c.quote.implied_volatility)
    });

    report.no_market =
        retain_counting(&mut rows, |c| positive(c.quote.bid) && positive(c.quote.ask));

    report.inactive = retain_counting(&mut rows, |c| {
        positive_count(c.quote.volume) || positive_count(c.quote.open_interest)
    });

    report.wide_spread = retain_counting(&mut rows, |c| {
        match (c.quote.bid, c.quote.ask, c.quote.last_price) {
            (Some(bid), Some(ask), Some(last)) if last > 0.0 => {
                (ask - bid) / last <= config.max_spread_pct
            }
            _ => false,
        }
    });

    report.out_of_band = retain_counting(&mut rows, |c| {
        let moneyness = c.quote.strike / spot;
        moneyness >= config.moneyness_min && moneyness <= config.moneyness_max
    });

    report.crossed = retain_counting(&mut rows, |c| match (c.quote.bid, c.quote.ask) {
        (Some(bid), Some(ask)) => bid <= ask,
        _ => false,
    });

    let points: Vec<CleanedPoint> = rows
        .iter()
        .filter_map(|c| {
            Some(CleanedPoint::new(
                c.quote.strike / spot,
                c.time_to_expiry?,
                c.quote.implied_volatility?,
            ))
        })
        .collect();
    report.kept = points.len();

    tracing::debug!(
        input = report.input,
        expired_or_no_iv = report.expired_or_no_iv,
        no_market = report.no_market,
        inactive = report.inactive,
        wide_spread = report.wide_spread,
        out_of_band = report.out_of_band,
        crossed = report.crossed,
        kept = report.kept,
        "cleaned option quotes"
    );

    if points.is_empty() {
        return Err(SurfaceError::insufficient(format!(
            "no usable quotes after cleaning {} rows",
            report.input
        )));
    }

    Ok(CleanedQuotes { points, report })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quote::OptionType;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    const SPOT: f64 = 100.0;

    fn expiry() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
    }

    fn traded() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 10)
            .unwrap()
            .and_hms_opt(15, 30, 0)
            .unwrap()
    }

    fn liquid(strike: f64) -> OptionQuote {
        OptionQuote::new(strike, OptionType::Call, expiry())
            .with_prices(2.0, 2.2, 2.1)
            .with_activity(Some(10), Some(100))
            .with_implied_volatility(0.2)
            .with_last_trade(traded())
    }

    fn clean(quotes: &[OptionQuote]) -> SurfaceResult<CleanedQuotes> {
        clean_quotes(quotes, SPOT, &SurfaceConfig::default())
    }

    // =========================================================================
    // Time to expiry
    // =========================================================================

    #[test]
    fn test_time_to_expiry_whole_days() {
        // 64 days and 8.5 hours between the trade and expiry midnight
        let t = time_to_expiry(expiry(), traded(), 365.25);
        assert_relative_eq!(t, 64.0 / 365.25, epsilon = 1e-15);
    }

    #[test]
    fn test_time_to_expiry_floors_negative() {
        let after = expiry().and_hms_opt(10, 0, 0).unwrap();
        assert_relative_eq!(time_to_expiry(expiry(), after, 365.25), -1.0 / 365.25);
    }

    #[test]
    fn test_same_day_trade_is_dropped() {
        let q = liquid(100.0).with_last_trade(expiry().and_hms_opt(9, 30, 0).unwrap());
        assert!(matches!(
            clean(&[q]),
            Err(SurfaceError::DataInsufficient { .. })
        ));
    }

    // =========================================================================
    // Filters
    // =========================================================================

    #[test]
    fn test_liquid_quote_survives() {
        let cleaned = clean(&[liquid(105.0)]).unwrap();
        assert_eq!(cleaned.points.len(), 1);
        let p = cleaned.points[0];
        assert_relative_eq!(p.moneyness, 1.05);
        assert_relative_eq!(p.implied_volatility, 0.2);
        assert_eq!(cleaned.report.kept, 1);
        assert_eq!(cleaned.report.dropped(), 0);
    }

    #[test]
    fn test_zero_bid_and_ask_dropped() {
        let dead = liquid(100.0).with_prices(0.0, 0.0, 1.0);
        let cleaned = clean(&[dead, liquid(101.0)]).unwrap();
        assert_eq!(cleaned.points.len(), 1);
        assert_eq!(cleaned.report.no_market, 1);
    }

    #[test]
    fn test_moneyness_band_is_inclusive() {
        let quotes = [liquid(70.0), liquid(130.0), liquid(131.0), liquid(69.0)];
        let cleaned = clean(&quotes).unwrap();
        let kept: Vec<f64> = cleaned.points.iter().map(|p| p.moneyness).collect();
        assert_eq!(kept, vec![0.7, 1.3]);
        assert_eq!(cleaned.report.out_of_band, 2);
    }

    #[test]
    fn test_missing_activity_counts_as_inactive() {
        let none = liquid(100.0).with_activity(None, None);
        let zero = liquid(100.0).with_activity(Some(0), Some(0));
        let oi_only = liquid(100.0).with_activity(None, Some(5));
        let cleaned = clean(&[none, zero, oi_only]).unwrap();
        assert_eq!(cleaned.points.len(), 1);
        assert_eq!(cleaned.report.inactive, 2);
    }

    #[test]
    fn test_nan_fields_dropped() {
        let nan_iv = liquid(100.0).with_implied_volatility(f64::NAN);
        let nan_bid = liquid(100.0).with_prices(f64::NAN, 2.0, 2.0);
        let nan_last = liquid(100.0).with_prices(1.0, 2.0, f64::NAN);
        let cleaned = clean(&[nan_iv, nan_bid, nan_last, liquid(100.0)]).unwrap();
        assert_eq!(cleaned.points.len(), 1);
        assert_eq!(cleaned.report.expired_or_no_iv, 1);
        assert_eq!(cleaned.report.no_market, 1);
        assert_eq!(cleaned.report.wide_spread, 1);
    }

    #[test]
    fn test_spread_threshold() {
        // spread 1.0 over last 1.0 is exactly at the limit
        let at_limit = liquid(100.0).with_prices(1.0, 2.0, 1.0);
        let too_wide = liquid(100.0).with_prices(1.0, 2.5, 1.0);
        let cleaned = clean(&[at_limit, too_wide]).unwrap();
        assert_eq!(cleaned.points.len(), 1);
        assert_eq!(cleaned.report.wide_spread, 1);
    }

    #[test]
    fn test_crossed_market_dropped() {
        let crossed = liquid(100.0).with_prices(2.2, 2.0, 2.1);
        let cleaned = clean(&[crossed, liquid(100.0)]).unwrap();
        assert_eq!(cleaned.points.len(), 1);
        assert_eq!(cleaned.report.crossed, 1);
    }

    #[test]
    fn test_order_preserved() {
        let quotes = [liquid(110.0), liquid(90.0), liquid(100.0)];
        let cleaned = clean(&quotes).unwrap();
        let m: Vec<f64> = cleaned.points.iter().map(|p| p.moneyness).collect();
        assert_eq!(m, vec![1.1, 0.9, 1.0]);
    }

    // =========================================================================
    // Errors
    // =========================================================================

    #[test]
    fn test_everything_dropped_is_insufficient() {
        let err = clean(&[liquid(200.0)]).unwrap_err();
        assert!(matches!(err, SurfaceError::DataInsufficient { .. }));
        assert!(matches!(
            clean(&[]),
            Err(SurfaceError::DataInsufficient { .. })
        ));
    }

    #[test]
    fn test_bad_spot_rejected() {
        let config = SurfaceConfig::default();
        for spot in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let err = clean_quotes(&[liquid(100.0)], spot, &config).unwrap_err();
            assert!(matches!(err, SurfaceError::InvalidInput { .. }));
        }
    }
}
