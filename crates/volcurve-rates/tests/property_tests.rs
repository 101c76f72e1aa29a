//! Property-based tests for curve scenarios and portfolio valuation.

use proptest::prelude::*;
use volcurve_rates::prelude::*;

fn tenor_grid() -> impl Strategy<Value = Tenors> {
    prop::collection::vec(0.1_f64..5.0, 3..10).prop_map(|steps| {
        let mut acc = 0.0;
        let tenors = steps
            .into_iter()
            .map(|s| {
                acc += s;
                acc
            })
            .collect();
        Tenors::new(tenors).unwrap()
    })
}

// =============================================================================
// CURVE INVARIANTS
// =============================================================================

proptest! {
    /// The base curve stays above the floor across the usual maturity range.
    #[test]
    fn base_rate_respects_floor(t in 0.0_f64..100.0) {
        prop_assert!(base_rate(t) >= 0.001);
    }

    /// Where the quadratic is negative the floor replaces it.
    #[test]
    fn base_rate_floor_replaces_negatives(t in 108.0_f64..500.0) {
        prop_assert_eq!(base_rate(t), 0.001);
    }

    /// Two parallel shifts compose into one.
    #[test]
    fn parallel_shifts_are_additive(
        tenors in tenor_grid(),
        a in -300.0_f64..300.0,
        b in -300.0_f64..300.0,
    ) {
        let base = base_yield_curve(&tenors);
        let twice = CurveShift::parallel(b)
            .apply(&CurveShift::parallel(a).apply(&base).unwrap())
            .unwrap();
        let once = CurveShift::parallel(a + b).apply(&base).unwrap();

        for (x, y) in twice.yields().iter().zip(once.yields()) {
            prop_assert!((x - y).abs() < 1e-14);
        }
    }

    /// Shaped shifts hit their boundary parameters exactly.
    #[test]
    fn shaped_shifts_hit_boundaries(
        tenors in tenor_grid(),
        short in -100.0_f64..100.0,
        mid in -100.0_f64..100.0,
        long in -100.0_f64..100.0,
    ) {
        let n = tenors.len() - 1;
        for (shift, first, last) in [
            (CurveShift::steepener(short, long), short, long),
            (CurveShift::flattener(short, long), short, long),
            (CurveShift::twist(short, mid, long), short, long),
            (CurveShift::butterfly(short, mid), short, short),
        ] {
            let s = shift.shifts(&tenors).unwrap();
            prop_assert_eq!(s[0], first / 10_000.0);
            prop_assert_eq!(s[n], last / 10_000.0);
        }
    }

    /// A zero butterfly leaves the curve unchanged.
    #[test]
    fn zero_butterfly_is_identity(tenors in tenor_grid()) {
        let base = base_yield_curve(&tenors);
        prop_assert_eq!(CurveShift::butterfly(0.0, 0.0).apply(&base).unwrap(), base);
    }
}

// =============================================================================
// PRICING INVARIANTS
// =============================================================================

proptest! {
    /// At zero yield the price is the undiscounted sum of cash flows.
    #[test]
    fn price_at_zero_yield(m in 1_u32..40, coupon in 0.0_f64..0.12) {
        let bond = FixedCouponBond::new(m).with_coupon(coupon);
        let expected = coupon * 100.0 * f64::from(m) + 100.0;
        prop_assert!((bond.price(0.0).unwrap() - expected).abs() < 1e-9);
    }

    /// Portfolio value is linear in the weights.
    #[test]
    fn value_is_linear_in_weights(
        w1 in prop::collection::vec(-2.0_f64..2.0, 3),
        w2 in prop::collection::vec(-2.0_f64..2.0, 3),
        k in -3.0_f64..3.0,
    ) {
        let curve = base_yield_curve(&Tenors::standard());
        let maturities = [2, 5, 10];
        let build = |w: &[f64]| {
            Portfolio::new(
                maturities
                    .iter()
                    .zip(w)
                    .map(|(&m, &w)| Holding::new(FixedCouponBond::new(m), w))
                    .collect(),
            )
        };
        let combined: Vec<f64> = w1.iter().zip(&w2).map(|(a, b)| a + k * b).collect();

        let lhs = build(&combined).value(&curve).unwrap();
        let rhs = build(&w1).value(&curve).unwrap() + k * build(&w2).value(&curve).unwrap();
        prop_assert!((lhs - rhs).abs() < 1e-9);
    }
}
