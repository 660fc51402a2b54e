#![no_std]

//! Fixed-point helpers shared by the sale contracts.
//!
//! All amounts are token base units (i128); percentages are basis points.

pub const BPS_DENOMINATOR: i128 = 10_000;

/// Remaining value a funding tier can absorb.
///
/// Each unit of collected value consumes `slope` units of tier capacity, so
/// headroom decays linearly as `consumed` approaches `cap`. `slope` must be
/// positive; callers validate it at reveal time.
pub fn tier_headroom(cap: i128, consumed: i128, slope: i128) -> i128 {
    let remaining = cap.saturating_sub(consumed);
    if remaining <= 0 {
        return 0;
    }
    remaining / slope
}

/// Amount vested at `now` under a cliff-then-linear schedule.
///
/// Zero before `start + cliff`; once the cliff has passed the linear fraction
/// is measured from `start` (not from the cliff boundary) and clamps at
/// `total` after `duration`. Returns `None` on arithmetic overflow.
pub fn vested_amount(total: i128, now: u64, start: u64, cliff: u64, duration: u64) -> Option<i128> {
    if now < start.checked_add(cliff)? {
        return Some(0);
    }
    let elapsed = now.saturating_sub(start);
    if elapsed >= duration {
        return Some(total);
    }
    total
        .checked_mul(elapsed as i128)?
        .checked_div(duration as i128)
}

/// Discount band index (0..=3) for a sale-to-date cumulative total.
///
/// Band 0 covers totals below `l1`, band 3 totals at or above `l3`. The
/// thresholds are validated as ascending by the sale contract.
pub fn price_band(total_collected: i128, l1: i128, l2: i128, l3: i128) -> u32 {
    if total_collected < l1 {
        0
    } else if total_collected < l2 {
        1
    } else if total_collected < l3 {
        2
    } else {
        3
    }
}

/// Checked `amount * bps / 10_000`.
pub fn apply_bps(amount: i128, bps: u32) -> Option<i128> {
    amount
        .checked_mul(bps as i128)?
        .checked_div(BPS_DENOMINATOR)
}
