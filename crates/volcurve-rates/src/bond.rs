//! Annual fixed-coupon bond pricing.

use serde::{Deserialize, Serialize};

use crate::error::{RatesError, RatesResult};

/// Default annual coupon rate.
pub const DEFAULT_COUPON: f64 = 0.05;

/// Default face value.
pub const DEFAULT_FACE: f64 = 100.0;

/// A bullet bond paying an annual coupon for a whole number of years.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FixedCouponBond {
    /// Years to maturity; one coupon per year.
    pub maturity_years: u32,
    /// Annual coupon rate as a decimal.
    #[serde(default = "default_coupon")]
    pub coupon_rate: f64,
    /// Face value, repaid at maturity.
    #[serde(default = "default_face")]
    pub face: f64,
}

fn default_coupon() -> f64 {
    DEFAULT_COUPON
}

fn default_face() -> f64 {
    DEFAULT_FACE
}

impl FixedCouponBond {
    /// Creates a bond with the default 5% coupon and face of 100.
    #[must_use]
    pub fn new(maturity_years: u32) -> Self {
        Self {
            maturity_years,
            coupon_rate: DEFAULT_COUPON,
            face: DEFAULT_FACE,
        }
    }

    /// Sets the coupon rate.
    #[must_use]
    pub fn with_coupon(mut self, coupon_rate: f64) -> Self {
        self.coupon_rate = coupon_rate;
        self
    }

    /// Sets the face value.
    #[must_use]
    pub fn with_face(mut self, face: f64) -> Self {
        self.face = face;
        self
    }

    /// Maturity in years as a curve lookup point.
    pub fn maturity(&self) -> f64 {
        f64::from(self.maturity_years)
    }

    /// Cash flows at years 1..=M; the last one includes the face.
    pub fn cash_flows(&self) -> Vec<(u32, f64)> {
        let coupon = self.coupon_rate * self.face;
        (1..=self.maturity_years)
            .map(|k| {
                let redemption = if k == self.maturity_years { self.face } else { 0.0 };
                (k, coupon + redemption)
            })
            .collect()
    }

    /// Price discounting every cash flow at the annually compounded yield `y`.
    ///
    /// ```text
    /// P(y) = sum_{k=1..M} CF_k / (1 + y)^k
    /// ```
    ///
    /// # Errors
    ///
    /// Returns `NumericDegenerate` for a zero maturity, which has no cash
    /// flows to discount, for a yield at or below -100%, and whenever the
    /// discounted sum is not finite.
    pub fn price(&self, y: f64) -> RatesResult<f64> {
        if self.maturity_years == 0 {
            return Err(RatesError::degenerate(
                "bond maturity is zero; no cash flows to price",
            ));
        }
        let growth = 1.0 + y;
        if growth.is_nan() || growth <= 0.0 {
            return Err(RatesError::degenerate(format!(
                "discount factor base 1 + y = {growth} is not positive"
            )));
        }
        let price: f64 = self
            .cash_flows()
            .into_iter()
            .map(|(k, cf)| cf / growth.powf(f64::from(k)))
            .sum();
        if !price.is_finite() {
            return Err(RatesError::degenerate(format!(
                "price at yield {y} is not finite"
            )));
        }
        Ok(price)
    }
}
