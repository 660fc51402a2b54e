use crate::storage::*;
use crate::types::{Error, Tier, CEILING_SLOTS};
use sale_math::tier_headroom;
use soroban_sdk::{
    contract, contractimpl, contractmeta, symbol_short, Address, Bytes, BytesN, Env, Vec,
};

contractmeta!(
    key = "Description",
    val = "Commit-reveal funding ceiling schedule"
);

#[contract]
pub struct CeilingScheduleContract;

#[contractimpl]
impl CeilingScheduleContract {
    /// Bind the schedule to its operator and to the sale contract that is
    /// allowed to collect against it.
    pub fn initialize(env: Env, owner: Address, sale: Address) -> Result<(), Error> {
        if has_owner(&env) {
            return Err(Error::AlreadyInitialized);
        }
        owner.require_auth();

        set_owner(&env, &owner);
        set_sale(&env, &sale);
        set_revealed_count(&env, 0);
        set_current_index(&env, 0);
        set_current_base(&env, 0);
        set_total_collected(&env, 0);

        env.events().publish((symbol_short!("init"),), (owner, sale));
        Ok(())
    }

    /// Store the padded commitment array. One-shot: committing twice without
    /// a full reinitialization fails.
    pub fn commit(env: Env, caller: Address, hashes: Vec<BytesN<32>>) -> Result<(), Error> {
        require_owner(&env, &caller)?;

        if has_commitments(&env) {
            return Err(Error::AlreadyCommitted);
        }
        if hashes.len() != CEILING_SLOTS {
            return Err(Error::WrongCommitmentCount);
        }

        set_commitments(&env, &hashes);
        env.events()
            .publish((symbol_short!("commit"),), hashes.len());
        Ok(())
    }

    /// Reveal the next tier in sequence against its commitment.
    pub fn reveal(
        env: Env,
        caller: Address,
        cap: i128,
        slope: i128,
        precision: i128,
        is_last: bool,
        salt: BytesN<32>,
    ) -> Result<(), Error> {
        require_owner(&env, &caller)?;

        reveal_one(&env, cap, slope, precision, is_last, &salt)
    }

    /// Reveal several consecutive tiers atomically. Any per-element failure
    /// rolls the whole call back.
    pub fn reveal_batch(
        env: Env,
        caller: Address,
        caps: Vec<i128>,
        slopes: Vec<i128>,
        precisions: Vec<i128>,
        is_last_flags: Vec<bool>,
        salts: Vec<BytesN<32>>,
    ) -> Result<(), Error> {
        require_owner(&env, &caller)?;

        let n = caps.len();
        if slopes.len() != n
            || precisions.len() != n
            || is_last_flags.len() != n
            || salts.len() != n
        {
            return Err(Error::LengthMismatch);
        }

        for i in 0..n {
            reveal_one(
                &env,
                caps.get_unchecked(i),
                slopes.get_unchecked(i),
                precisions.get_unchecked(i),
                is_last_flags.get_unchecked(i),
                &salts.get_unchecked(i),
            )?;
        }
        Ok(())
    }

    /// How much more value the revealed tiers can absorb, given the sale's
    /// cumulative collected total. Read-only: never advances the index.
    pub fn available_to_collect(env: Env, total: i128) -> i128 {
        let (available, _, _) = walk(&env, get_current_index(&env), get_current_base(&env), total);
        available
    }

    /// Record `amount` of collected value and advance past exhausted tiers.
    /// Only the bound sale contract may call this.
    pub fn collect(env: Env, caller: Address, amount: i128) -> Result<(), Error> {
        if !has_owner(&env) {
            return Err(Error::NotInitialized);
        }
        caller.require_auth();
        if caller != get_sale(&env) {
            return Err(Error::Unauthorized);
        }

        if amount <= 0 {
            return Err(Error::InvalidAmount);
        }

        let total = get_total_collected(&env);
        // Settle onto the first tier with real headroom before accounting.
        let (available, mut index, mut base) =
            walk(&env, get_current_index(&env), get_current_base(&env), total);
        if available == 0 {
            return Err(Error::NoHeadroom);
        }
        if amount > available {
            return Err(Error::ExceedsHeadroom);
        }

        let new_total = total.checked_add(amount).ok_or(Error::Overflow)?;

        // The collection may have pushed the active tier below its dust
        // threshold; advance until a live tier (or the reveal frontier).
        let revealed = get_revealed_count(&env);
        while index < revealed {
            let tier = get_tier(&env, index).ok_or(Error::InvalidTier)?;
            let consumed = new_total.saturating_sub(base);
            if tier_headroom(tier.cap, consumed, tier.slope) >= tier.precision {
                break;
            }
            index += 1;
            base = new_total;
        }

        set_total_collected(&env, new_total);
        set_current_index(&env, index);
        set_current_base(&env, base);

        env.events()
            .publish((symbol_short!("collect"),), (amount, index));
        Ok(())
    }

    // View functions
    pub fn current_index(env: Env) -> u32 {
        get_current_index(&env)
    }

    pub fn revealed_count(env: Env) -> u32 {
        get_revealed_count(&env)
    }

    pub fn all_revealed(env: Env) -> bool {
        get_all_revealed(&env)
    }

    pub fn total_collected(env: Env) -> i128 {
        get_total_collected(&env)
    }

    pub fn get_tier(env: Env, index: u32) -> Option<Tier> {
        get_tier(&env, index)
    }
}

fn require_owner(env: &Env, caller: &Address) -> Result<(), Error> {
    if !has_owner(env) {
        return Err(Error::NotInitialized);
    }
    caller.require_auth();
    if *caller != get_owner(env) {
        return Err(Error::Unauthorized);
    }
    Ok(())
}

/// Headroom walk shared by the read-only query and `collect`: starting at
/// `index` (entered at cumulative total `base`), skip every tier whose
/// headroom sits below its dust threshold and report the first live tier.
/// Returns `(headroom, index, base)`; headroom 0 means no revealed capacity.
fn walk(env: &Env, index: u32, base: i128, total: i128) -> (i128, u32, i128) {
    let revealed = get_revealed_count(env);
    let mut index = index;
    let mut base = base;
    while index < revealed {
        let tier = match get_tier(env, index) {
            Some(t) => t,
            None => return (0, index, base),
        };
        let consumed = total.saturating_sub(base);
        let headroom = tier_headroom(tier.cap, consumed, tier.slope);
        if headroom >= tier.precision {
            return (headroom, index, base);
        }
        // Sub-precision remainder is abandoned; the next revealed tier
        // starts untouched at the current total.
        index += 1;
        base = total;
    }
    (0, index, base)
}

fn reveal_one(
    env: &Env,
    cap: i128,
    slope: i128,
    precision: i128,
    is_last: bool,
    salt: &BytesN<32>,
) -> Result<(), Error> {
    let commitments = get_commitments(env).ok_or(Error::NothingCommitted)?;

    if get_all_revealed(env) {
        return Err(Error::SequenceClosed);
    }
    let index = get_revealed_count(env);
    if index >= CEILING_SLOTS {
        return Err(Error::SequenceClosed);
    }
    if cap <= 0 || slope <= 0 || precision <= 0 {
        return Err(Error::InvalidTier);
    }

    let digest = commitment_hash(env, cap, slope, precision, is_last, salt);
    if digest != commitments.get_unchecked(index) {
        return Err(Error::HashMismatch);
    }

    set_tier(
        env,
        index,
        &Tier {
            cap,
            slope,
            precision,
            is_last,
        },
    );
    set_revealed_count(env, index + 1);
    if is_last {
        set_all_revealed(env, true);
    }

    env.events()
        .publish((symbol_short!("reveal"),), (index, cap, is_last));
    Ok(())
}

/// Digest binding one tier to its commitment slot:
/// sha256(cap_be ‖ slope_be ‖ precision_be ‖ is_last_byte ‖ salt).
pub fn commitment_hash(
    env: &Env,
    cap: i128,
    slope: i128,
    precision: i128,
    is_last: bool,
    salt: &BytesN<32>,
) -> BytesN<32> {
    let mut payload = Bytes::new(env);
    payload.append(&Bytes::from_slice(env, &cap.to_be_bytes()));
    payload.append(&Bytes::from_slice(env, &slope.to_be_bytes()));
    payload.append(&Bytes::from_slice(env, &precision.to_be_bytes()));
    payload.append(&Bytes::from_slice(env, &[is_last as u8]));
    payload.append(&Bytes::from_slice(env, &salt.to_array()));
    env.crypto().sha256(&payload).into()
}
