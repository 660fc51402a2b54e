use crate::types::{Error, Pricing};
use sale_math::{apply_bps, price_band};

/// Multiplier bps for the band the cumulative total falls in.
pub fn band_bps(pricing: &Pricing, total_collected: i128) -> u32 {
    match price_band(
        total_collected,
        pricing.tier1_limit,
        pricing.tier2_limit,
        pricing.tier3_limit,
    ) {
        0 => pricing.band0_bps,
        1 => pricing.band1_bps,
        2 => pricing.band2_bps,
        _ => pricing.band3_bps,
    }
}

/// Base token amount for an accepted contribution: value * rate, scaled by
/// the discount band multiplier. Every step is overflow-checked.
pub fn tokens_for(accepted: i128, rate: i128, bps: u32) -> Result<i128, Error> {
    let raw = accepted.checked_mul(rate).ok_or(Error::Overflow)?;
    apply_bps(raw, bps).ok_or(Error::Overflow)
}

#[cfg(test)]
mod test {
    use super::*;

    fn pricing() -> Pricing {
        Pricing {
            tier1_limit: 1_000,
            tier2_limit: 2_000,
            tier3_limit: 3_000,
            band0_bps: 13_000, // 30% discount band
            band1_bps: 12_000,
            band2_bps: 11_000,
            band3_bps: 10_000, // minimum-discount band
        }
    }

    #[test]
    fn multiplier_follows_cumulative_total() {
        let p = pricing();
        assert_eq!(band_bps(&p, 0), 13_000);
        assert_eq!(band_bps(&p, 999), 13_000);
        assert_eq!(band_bps(&p, 1_000), 12_000);
        assert_eq!(band_bps(&p, 2_500), 11_000);
        assert_eq!(band_bps(&p, 3_000), 10_000);
    }

    #[test]
    fn token_amount_is_rate_times_band() {
        assert_eq!(tokens_for(100, 2, 13_000).unwrap(), 260);
        assert_eq!(tokens_for(100, 2, 10_000).unwrap(), 200);
        assert_eq!(tokens_for(i128::MAX, 2, 10_000), Err(Error::Overflow));
    }
}
