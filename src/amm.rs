//! Swap Output Formulas
//!
//! Flat-rate, constant-product and concentrated-liquidity output math, plus
//! the `SwapQuoter` seam the router uses to turn a chosen path into an
//! output amount.

use crate::error::AmmError;
use crate::graph::{Direction, Pool};

/// Basis-point denominator (10_000 bps = 100%)
pub const BPS_SCALE: u32 = 10_000;

/// Prices one hop of a route
pub trait SwapQuoter {
    /// Amount of the output asset received for `amount_in` of the input asset
    fn quote_swap(&self, pool: &Pool, direction: Direction, amount_in: f64) -> f64;
}

/// Multiplies by the pool's quoted rate; no slippage
#[derive(Debug, Clone, Copy, Default)]
pub struct FlatRate;

impl SwapQuoter for FlatRate {
    fn quote_swap(&self, pool: &Pool, direction: Direction, amount_in: f64) -> f64 {
        amount_in * pool.rate_towards(direction)
    }
}

/// x * y = k pricing for pools that carry reserves; flat rate otherwise
#[derive(Debug, Clone, Copy, Default)]
pub struct ConstantProduct;

impl SwapQuoter for ConstantProduct {
    fn quote_swap(&self, pool: &Pool, direction: Direction, amount_in: f64) -> f64 {
        let Some(reserves) = pool.reserves else {
            return FlatRate.quote_swap(pool, direction, amount_in);
        };

        let (reserve_in, reserve_out) = match direction {
            Direction::Forward => (reserves.reserve_a, reserves.reserve_b),
            Direction::Reverse => (reserves.reserve_b, reserves.reserve_a),
        };
        cpmm_amount_out(amount_in, reserve_in, reserve_out, reserves.fee_bps)
    }
}

/// Input left after the swap fee is taken
pub fn effective_input(amount_in: f64, fee_bps: u32) -> f64 {
    let kept = BPS_SCALE.saturating_sub(fee_bps) as f64;
    amount_in * kept / BPS_SCALE as f64
}

/// Constant-product output: dy = dx_eff * y / (x + dx_eff)
pub fn cpmm_amount_out(amount_in: f64, reserve_in: f64, reserve_out: f64, fee_bps: u32) -> f64 {
    if amount_in <= 0.0 || reserve_in <= 0.0 || reserve_out <= 0.0 {
        return 0.0;
    }

    let dx = effective_input(amount_in, fee_bps);
    if dx <= 0.0 {
        return 0.0;
    }

    dx * reserve_out / (reserve_in + dx)
}

/// Output of a concentrated-liquidity swap that stays within one tick.
///
/// - zero_for_one: dy = L * (sqrtStart - sqrtEnd)
/// - one_for_zero: dx = L * (1/sqrtEnd - 1/sqrtStart)
pub fn clmm_amount_out(
    liquidity: f64,
    sqrt_price_start: f64,
    sqrt_price_end: f64,
    zero_for_one: bool,
) -> f64 {
    let out = if zero_for_one {
        liquidity * (sqrt_price_start - sqrt_price_end)
    } else {
        liquidity * (1.0 / sqrt_price_end - 1.0 / sqrt_price_start)
    };
    out.abs()
}

/// Result of swapping toward a tick boundary
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickStep {
    pub amount_out: f64,
    pub new_sqrt_price: f64,
    /// Input not consumed because the boundary was reached
    pub amount_remaining: f64,
}

/// Swap `amount_in` inside the current tick, stopping at the next boundary.
///
/// zero_for_one moves the price down, so the next tick must be below the
/// current price; one_for_zero moves it up.
pub fn cross_tick(
    liquidity: f64,
    sqrt_price_current: f64,
    sqrt_price_next_tick: f64,
    zero_for_one: bool,
    amount_in: f64,
) -> Result<TickStep, AmmError> {
    if !(liquidity > 0.0 && liquidity.is_finite()) {
        return Err(AmmError::InvalidLiquidity(liquidity));
    }

    if !(amount_in > 0.0 && amount_in.is_finite()) {
        return Err(AmmError::InvalidAmount(amount_in));
    }

    let wrong_side = if zero_for_one {
        sqrt_price_current <= sqrt_price_next_tick
    } else {
        sqrt_price_current >= sqrt_price_next_tick
    };
    if wrong_side {
        return Err(AmmError::WrongTickSide {
            current: sqrt_price_current,
            next: sqrt_price_next_tick,
        });
    }


    let step = if zero_for_one {
        let to_boundary = liquidity * (sqrt_price_current - sqrt_price_next_tick)
            / (sqrt_price_current * sqrt_price_next_tick);
        if amount_in <= to_boundary {
            let new_sqrt_price = 1.0 / (1.0 / sqrt_price_current + amount_in / liquidity);
            TickStep {
                amount_out: liquidity * (sqrt_price_current - new_sqrt_price),
                new_sqrt_price,
                amount_remaining: 0.0,
            }
        } else {
            TickStep {
                amount_out: liquidity * (sqrt_price_current - sqrt_price_next_tick),
                new_sqrt_price: sqrt_price_next_tick,
                amount_remaining: amount_in - to_boundary,
            }
        }
    } else {
        let to_boundary = liquidity * (sqrt_price_next_tick - sqrt_price_current);
        if amount_in <= to_boundary {
            let new_sqrt_price = sqrt_price_current + amount_in / liquidity;
            TickStep {
                amount_out: liquidity * (1.0 / sqrt_price_current - 1.0 / new_sqrt_price),
                new_sqrt_price,
                amount_remaining: 0.0,
            }
        } else {
            TickStep {
                amount_out: liquidity * (1.0 / sqrt_price_current - 1.0 / sqrt_price_next_tick),
                new_sqrt_price: sqrt_price_next_tick,
                amount_remaining: amount_in - to_boundary,
            }
        }
    };

    Ok(step)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Reserves;

    #[test]
    fn test_cpmm_without_fee() {
        assert_eq!(cpmm_amount_out(10.0, 10_000.0, 5_000.0, 0).round(), 5.0);
        assert_eq!(cpmm_amount_out(1_000.0, 10_000.0, 5_000.0, 0).round(), 455.0);
    }

    #[test]
    fn test_cpmm_fee_reduces_output() {
        let no_fee = cpmm_amount_out(1_000.0, 10_000.0, 5_000.0, 0);
        let with_fee = cpmm_amount_out(1_000.0, 10_000.0, 5_000.0, 30);
        assert!(with_fee < no_fee);
        assert!(with_fee > 0.0);
    }

    #[test]
    fn test_cpmm_degenerate_inputs() {
        assert_eq!(cpmm_amount_out(0.0, 1_000.0, 1_000.0, 30), 0.0);
        assert_eq!(cpmm_amount_out(1_000.0, 10_000.0, 10_000.0, BPS_SCALE), 0.0);
        assert_eq!(cpmm_amount_out(1_000.0, 0.0, 10_000.0, 0), 0.0);
    }

    #[test]
    fn test_cpmm_monotonic_in_input() {
        let small = cpmm_amount_out(1_000.0, 1_000_000.0, 1_000_000.0, 30);
        let large = cpmm_amount_out(2_000.0, 1_000_000.0, 1_000_000.0, 30);
        assert!(large > small);
        assert!(large < 2_000.0);
    }

    #[test]
    fn test_clmm_within_tick() {
        let out = clmm_amount_out(1000.0, 1.0_f64.sqrt(), 1.1_f64.sqrt(), true);
        assert_eq!(out.round(), 49.0);

        let out = clmm_amount_out(500.0, 1.2_f64.sqrt(), 1.3_f64.sqrt(), false);
        assert_eq!(out.round(), 18.0);
    }

    #[test]
    fn test_cross_tick_stops_short_of_boundary() {
        let step = cross_tick(1000.0, 1.0, 0.95_f64.sqrt(), true, 10.0).unwrap();
        assert!((step.new_sqrt_price - 1.0 / 1.01).abs() < 1e-12);
        assert_eq!(step.amount_out.round(), 10.0);
        assert_eq!(step.amount_remaining, 0.0);

        let step = cross_tick(1000.0, 1.0, 1.05_f64.sqrt(), false, 10.0).unwrap();
        assert!((step.new_sqrt_price - 1.01).abs() < 1e-12);
        assert!((step.amount_out - 1000.0 * (1.0 - 1.0 / 1.01)).abs() < 1e-9);
    }

    #[test]
    fn test_cross_tick_reaches_boundary() {
        let next = 0.95_f64.sqrt();
        let required = 1000.0 * (1.0 / next - 1.0);
        let step = cross_tick(1000.0, 1.0, next, true, required).unwrap();
        assert_eq!(step.amount_out.round(), (1000.0 * (1.0 - next)).round());
        assert!((step.new_sqrt_price - next).abs() < 1e-4);

        let (current, next) = (1.1_f64.sqrt(), 1.15_f64.sqrt());
        let required = 500.0 * (next - current);
        let step = cross_tick(500.0, current, next, false, required).unwrap();
        assert_eq!(step.amount_out.round(), (500.0 * (1.0 / current - 1.0 / next)).round());
        assert!((step.new_sqrt_price - next).abs() < 1e-4);
    }

    #[test]
    fn test_cross_tick_clamps_at_boundary() {
        let next = 0.95_f64.sqrt();
        let step = cross_tick(1000.0, 1.0, next, true, 100.0).unwrap();
        assert_eq!(step.new_sqrt_price, next);
        assert!((step.amount_out - 1000.0 * (1.0 - next)).abs() < 1e-9);
        let to_boundary = 1000.0 * (1.0 - next) / next;
        assert!((step.amount_remaining - (100.0 - to_boundary)).abs() < 1e-9);
    }

    #[test]
    fn test_cross_tick_rejects_wrong_direction() {
        assert_eq!(
            cross_tick(1000.0, 1.0, 1.1, true, 10.0),
            Err(AmmError::WrongTickSide { current: 1.0, next: 1.1 })
        );
        assert!(cross_tick(1000.0, 1.0, 0.9, false, 10.0).is_err());
        assert!(matches!(
            cross_tick(0.0, 1.0, 0.9, true, 10.0),
            Err(AmmError::InvalidLiquidity(_))
        ));
    }

    #[test]
    fn test_cross_tick_rejects_non_positive_input() {
        assert_eq!(cross_tick(1000.0, 1.0, 0.9, true, 0.0), Err(AmmError::InvalidAmount(0.0)));
        assert_eq!(
            cross_tick(1000.0, 1.0, 1.1, false, -5.0),
            Err(AmmError::InvalidAmount(-5.0))
        );
        assert!(matches!(
            cross_tick(1000.0, 1.0, 0.9, true, f64::NAN),
            Err(AmmError::InvalidAmount(_))
        ));
        assert!(cross_tick(1000.0, 1.0, 0.9, true, f64::INFINITY).is_err());
    }

    #[test]
    fn test_quoters() {
        let plain = Pool::new("ETH", "USDC", 2000.0);
        assert_eq!(FlatRate.quote_swap(&plain, Direction::Forward, 2.0), 4000.0);
        assert_eq!(FlatRate.quote_swap(&plain, Direction::Reverse, 4000.0), 4000.0 * (1.0 / 2000.0));
        // No reserves: constant product falls back to the flat rate
        assert_eq!(ConstantProduct.quote_swap(&plain, Direction::Forward, 2.0), 4000.0);

        let deep = plain.with_reserves(Reserves {
            reserve_a: 100.0,
            reserve_b: 200_000.0,
            fee_bps: 30,
        });
        let sell_eth = ConstantProduct.quote_swap(&deep, Direction::Forward, 1.0);
        assert_eq!(sell_eth, cpmm_amount_out(1.0, 100.0, 200_000.0, 30));
        assert!(sell_eth < 2000.0);
        let buy_eth = ConstantProduct.quote_swap(&deep, Direction::Reverse, 2000.0);
        assert_eq!(buy_eth, cpmm_amount_out(2000.0, 200_000.0, 100.0, 30));
    }
}
