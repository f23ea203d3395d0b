//! Quote selection by slippage-adjusted output

use serde::{Deserialize, Serialize};

/// A venue's quoted output for the same trade
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub venue: String,
    pub amount_out: f64,
    /// Worst-case slippage in percent (0.5 = 0.5%)
    pub slippage_pct: f64,
}

impl Quote {
    pub fn new(venue: impl Into<String>, amount_out: f64, slippage_pct: f64) -> Self {
        Self {
            venue: venue.into(),
            amount_out,
            slippage_pct,
        }
    }

    /// Guaranteed output after worst-case slippage
    pub fn min_amount_out(&self) -> f64 {
        self.amount_out * (1.0 - self.slippage_pct / 100.0)
    }

    fn is_usable(&self) -> bool {
        self.amount_out > 0.0 && self.amount_out.is_finite() && self.slippage_pct.is_finite()
    }
}

/// Quote with the highest guaranteed output.
///
/// Ties go to the lower slippage; quotes with no positive output are ignored.
pub fn best_safe_quote(quotes: &[Quote]) -> Option<&Quote> {
    quotes
        .iter()
        .filter(|q| q.is_usable())
        .fold(None, |best: Option<&Quote>, quote| match best {
            None => Some(quote),
            Some(current) => {
                let (candidate, incumbent) = (quote.min_amount_out(), current.min_amount_out());
                if candidate > incumbent
                    || (candidate == incumbent && quote.slippage_pct < current.slippage_pct)
                {
                    Some(quote)
                } else {
                    Some(current)
                }
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_best_min_output_wins() {
        let quotes = vec![
            Quote::new("Uniswap", 1050.0, 2.0),  // 1029
            Quote::new("SushiSwap", 1040.0, 0.5), // 1034.8
            Quote::new("Curve", 1020.0, 0.1),    // 1018.98
        ];
        assert_eq!(best_safe_quote(&quotes).unwrap().venue, "SushiSwap");
    }

    #[test]
    fn test_lower_slippage_breaks_ties() {
        let quotes = vec![
            Quote::new("DEXA", 1000.0, 1.0), // 990
            Quote::new("DEXB", 1010.0, 2.0), // 989.8
            Quote::new("DEXC", 990.0, 0.0),  // 990
        ];
        assert_eq!(best_safe_quote(&quotes).unwrap().venue, "DEXC");

        let quotes = vec![Quote::new("A", 1000.0, 1.0), Quote::new("B", 1000.0, 0.5)];
        assert_eq!(best_safe_quote(&quotes).unwrap().venue, "B");
    }

    #[test]
    fn test_empty_and_single() {
        assert!(best_safe_quote(&[]).is_none());

        let quotes = vec![Quote::new("Uniswap", 1000.0, 1.0)];
        let best = best_safe_quote(&quotes).unwrap();
        assert_eq!(best.venue, "Uniswap");
        assert_eq!(best.amount_out, 1000.0);
    }

    #[test]
    fn test_unusable_quotes_ignored() {
        let quotes = vec![
            Quote::new("BadDEX", 0.0, 1.0),
            Quote::new("NegDEX", -5.0, 0.0),
            Quote::new("GoodDEX", 1000.0, 1.0),
        ];
        assert_eq!(best_safe_quote(&quotes).unwrap().venue, "GoodDEX");

        assert!(best_safe_quote(&[Quote::new("BadDEX", 0.0, 1.0)]).is_none());
    }

    #[test]
    fn test_full_slippage_loses() {
        let quotes = vec![
            Quote::new("SketchyDEX", 2000.0, 100.0),
            Quote::new("SolidDEX", 1900.0, 1.0),
        ];
        assert_eq!(best_safe_quote(&quotes).unwrap().venue, "SolidDEX");
    }
}
