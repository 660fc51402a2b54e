#![no_std]

use sale_math::apply_bps;
use soroban_sdk::{
    contract, contracterror, contractimpl, contractmeta, contracttype, symbol_short, Address, Env,
};

contractmeta!(
    key = "Description",
    val = "Tiered affiliate bonus registry for the token sale"
);

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    AlreadyInitialized = 1,
    NotInitialized = 2,
    Unauthorized = 3,
    AlreadyRegistered = 4,
    SelfReferral = 5,
    InvalidThresholds = 6,
    Overflow = 7,
}

/// Ascending contribution-value thresholds with a bonus rate per tier and a
/// flat investor kicker applied whenever any tier matches.
#[derive(Clone, Debug, Eq, PartialEq)]
#[contracttype]
pub struct TierTable {
    pub tier1_min: i128,
    pub tier2_min: i128,
    pub tier3_min: i128,
    pub tier1_bps: u32,
    pub tier2_bps: u32,
    pub tier3_bps: u32,
    pub investor_share_bps: u32,
}

#[derive(Clone)]
#[contracttype]
pub enum DataKey {
    Owner,
    Tiers,
    Affiliate(Address),
}

#[contract]
pub struct AffiliateBonusContract;

#[contractimpl]
impl AffiliateBonusContract {
    pub fn initialize(env: Env, owner: Address, tiers: TierTable) -> Result<(), Error> {
        if env.storage().instance().has(&DataKey::Owner) {
            return Err(Error::AlreadyInitialized);
        }
        owner.require_auth();
        validate_tiers(&tiers)?;

        env.storage().instance().set(&DataKey::Owner, &owner);
        env.storage().instance().set(&DataKey::Tiers, &tiers);
        Ok(())
    }

    /// Replace the tier thresholds and rates.
    pub fn set_tiers(env: Env, caller: Address, tiers: TierTable) -> Result<(), Error> {
        require_owner(&env, &caller)?;
        validate_tiers(&tiers)?;
        env.storage().instance().set(&DataKey::Tiers, &tiers);
        env.events().publish((symbol_short!("tiers"),), ());
        Ok(())
    }

    /// Bind an investor to the affiliate who referred them. Set once: the
    /// mapping is never overwritten.
    pub fn register_affiliate(
        env: Env,
        caller: Address,
        investor: Address,
        affiliate: Address,
    ) -> Result<(), Error> {
        require_owner(&env, &caller)?;
        if investor == affiliate {
            return Err(Error::SelfReferral);
        }
        let key = DataKey::Affiliate(investor.clone());
        if env.storage().persistent().has(&key) {
            return Err(Error::AlreadyRegistered);
        }
        env.storage().persistent().set(&key, &affiliate);
        env.events()
            .publish((symbol_short!("linked"),), (investor, affiliate));
        Ok(())
    }

    pub fn affiliate_of(env: Env, investor: Address) -> Option<Address> {
        env.storage()
            .persistent()
            .get(&DataKey::Affiliate(investor))
    }

    /// Bonus split for a contribution: `(affiliate_bonus, investor_share)`
    /// in token units, both zero when the investor has no registered
    /// affiliate or the contribution sits below tier 1.
    pub fn apply_bonus(
        env: Env,
        investor: Address,
        base_tokens: i128,
        contributed_value: i128,
    ) -> Result<(i128, i128), Error> {
        if !env
            .storage()
            .persistent()
            .has(&DataKey::Affiliate(investor))
        {
            return Ok((0, 0));
        }
        let tiers: TierTable = env
            .storage()
            .instance()
            .get(&DataKey::Tiers)
            .ok_or(Error::NotInitialized)?;

        let bps = if contributed_value >= tiers.tier3_min {
            tiers.tier3_bps
        } else if contributed_value >= tiers.tier2_min {
            tiers.tier2_bps
        } else if contributed_value >= tiers.tier1_min {
            tiers.tier1_bps
        } else {
            return Ok((0, 0));
        };

        let bonus = apply_bps(base_tokens, bps).ok_or(Error::Overflow)?;
        let share = apply_bps(base_tokens, tiers.investor_share_bps).ok_or(Error::Overflow)?;
        Ok((bonus, share))
    }

    pub fn get_tiers(env: Env) -> Option<TierTable> {
        env.storage().instance().get(&DataKey::Tiers)
    }
}

fn require_owner(env: &Env, caller: &Address) -> Result<(), Error> {
    let owner: Address = env
        .storage()
        .instance()
        .get(&DataKey::Owner)
        .ok_or(Error::NotInitialized)?;
    caller.require_auth();
    if *caller != owner {
        return Err(Error::Unauthorized);
    }
    Ok(())
}

fn validate_tiers(tiers: &TierTable) -> Result<(), Error> {
    if tiers.tier1_min <= 0
        || tiers.tier1_min >= tiers.tier2_min
        || tiers.tier2_min >= tiers.tier3_min
    {
        return Err(Error::InvalidThresholds);
    }
    Ok(())
}
