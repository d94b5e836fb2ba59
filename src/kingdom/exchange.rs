//! Gem exchange previews: gems to gold and gems to BNB.
//!
//! BNB amounts are kept in wei so the preview is exact.

/// Wei in one BNB.
pub const WEI_PER_BNB: u128 = 1_000_000_000_000_000_000;

/// Gold received for `gems` at `rate` gold per gem.
#[must_use]
pub fn gems_to_gold(gems: u64, rate: u32) -> u64 {
    gems.saturating_mul(u64::from(rate))
}

/// Wei received for selling `gems` when `gems_per_bnb` gems buy one BNB.
///
/// Returns 0 for a zero rate.
#[must_use]
pub fn gems_to_wei(gems: u64, gems_per_bnb: u64) -> u128 {
    (u128::from(gems) * WEI_PER_BNB)
        .checked_div(u128::from(gems_per_bnb))
        .unwrap_or(0)
}

/// Render wei as a decimal BNB amount without trailing zeros.
#[must_use]
pub fn format_bnb(wei: u128) -> String {
    let whole = wei / WEI_PER_BNB;
    let fraction = wei % WEI_PER_BNB;
    if fraction == 0 {
        return whole.to_string();
    }
    let digits = format!("{fraction:018}");
    format!("{whole}.{}", digits.trim_end_matches('0'))
}

/// Approximate USD value of `wei` at an externally supplied BNB price.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn wei_to_usd(wei: u128, bnb_usd: f64) -> f64 {
    wei as f64 / WEI_PER_BNB as f64 * bnb_usd
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gems_to_gold() {
        assert_eq!(gems_to_gold(150, 2), 300);
        assert_eq!(gems_to_gold(u64::MAX, 2), u64::MAX);
    }

    #[test]
    fn test_million_gems_is_one_bnb() {
        assert_eq!(gems_to_wei(1_000_000, 1_000_000), WEI_PER_BNB);
        assert_eq!(gems_to_wei(1, 1_000_000), 1_000_000_000_000);
        assert_eq!(gems_to_wei(5, 0), 0);
    }

    #[test]
    fn test_format_bnb() {
        assert_eq!(format_bnb(WEI_PER_BNB * 3), "3");
        assert_eq!(format_bnb(gems_to_wei(1_500_000, 1_000_000)), "1.5");
        assert_eq!(format_bnb(gems_to_wei(123, 1_000_000)), "0.000123");
        assert_eq!(format_bnb(0), "0");
    }

    #[test]
    fn test_usd_estimate() {
        let usd = wei_to_usd(gems_to_wei(500_000, 1_000_000), 600.0);
        assert!((usd - 300.0).abs() < 1e-9);
    }
}
