// SPDX-FileCopyrightText: 2026 Escrowd Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Escrow fee schedule.
//!
//! Pure tier-based fee computation. Callers are responsible for rejecting
//! negative or non-numeric amounts before calling in; any finite
//! non-negative amount is accepted here.

/// Return the escrow fee for a given transaction amount.
///
/// Tiers:
/// - below 190: flat 10.00
/// - 190 to 599 inclusive: flat 20.00
/// - 600 to 2000 inclusive: 3.5% of the amount
/// - above 2000: 3.0% of the amount
///
/// Percentage tiers are rounded to 2 decimal places.
pub fn calculate(amount: f64) -> f64 {
    if amount < 190.0 {
        10.0
    } else if amount <= 599.0 {
        20.0
    } else if amount <= 2000.0 {
        round2(amount * 0.035)
    } else {
        round2(amount * 0.030)
    }
}

/// Round to 2 decimal places, half away from zero.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_tier_below_190() {
        assert_eq!(calculate(0.0), 10.0);
        assert_eq!(calculate(1.0), 10.0);
        assert_eq!(calculate(189.99), 10.0);
    }

    #[test]
    fn flat_tier_190_to_599() {
        assert_eq!(calculate(190.0), 20.0);
        assert_eq!(calculate(500.0), 20.0);
        assert_eq!(calculate(599.0), 20.0);
    }

    #[test]
    fn percent_tier_600_to_2000() {
        assert_eq!(calculate(600.0), 21.0);
        assert_eq!(calculate(1000.0), 35.0);
        assert_eq!(calculate(2000.0), 70.0);
    }

    #[test]
    fn percent_tier_above_2000() {
        // Anything above the 3.5% band drops to 3.0%.
        assert_eq!(calculate(2000.01), 60.0);
        assert_eq!(calculate(2500.0), 75.0);
        assert_eq!(calculate(3000.0), 90.0);
        assert_eq!(calculate(3000.01), 90.0);
        assert_eq!(calculate(10_000.0), 300.0);
    }

    #[test]
    fn percentage_fees_are_rounded_to_two_decimals() {
        // 612.34 * 0.035 = 21.4319
        assert_eq!(calculate(612.34), 21.43);
        // 2345.67 * 0.030 = 70.3701
        assert_eq!(calculate(2345.67), 70.37);
    }

    #[test]
    fn round2_truncates_to_cents() {
        assert_eq!(round2(21.4319), 21.43);
        assert_eq!(round2(519.999), 520.0);
        assert_eq!(round2(0.004), 0.0);
    }
}
