#![no_std]

use sale_math::vested_amount;
use soroban_sdk::{
    contract, contracterror, contractimpl, contractmeta, contracttype, symbol_short, token,
    Address, Env,
};

contractmeta!(
    key = "Description",
    val = "Cliff and linear vesting trustee for the reserved allocation"
);

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    AlreadyInitialized = 1,
    NotInitialized = 2,
    Unauthorized = 3,
    InvalidSchedule = 4,
    GrantsAlreadyCreated = 5,
    GrantsNotCreated = 6,
    InvalidAmount = 7,
    NoGrant = 8,
    Overflow = 9,
}

/// One beneficiary's lump-sum allocation. `released_amount` only grows and
/// never exceeds `total_amount`.
#[derive(Clone, Debug, Eq, PartialEq)]
#[contracttype]
pub struct Grant {
    pub beneficiary: Address,
    pub total_amount: i128,
    pub released_amount: i128,
}

#[derive(Clone)]
#[contracttype]
pub struct TrusteeConfig {
    pub owner: Address,
    pub token: Address,
    pub reserve_wallet: Address,
    pub founders_wallet: Address,
    pub start_time: u64,
    pub cliff_duration: u64,
    pub vesting_duration: u64,
}

#[derive(Clone)]
#[contracttype]
pub enum DataKey {
    Config,
    GrantsCreated,
    Grant(Address),
}

#[contract]
pub struct VestingTrusteeContract;

#[contractimpl]
impl VestingTrusteeContract {
    /// Bind the trustee to its token, beneficiaries and schedule. The cliff
    /// and total duration are deployment parameters, not constants.
    pub fn initialize(
        env: Env,
        owner: Address,
        token: Address,
        reserve_wallet: Address,
        founders_wallet: Address,
        start_time: u64,
        cliff_duration: u64,
        vesting_duration: u64,
    ) -> Result<(), Error> {
        if env.storage().instance().has(&DataKey::Config) {
            return Err(Error::AlreadyInitialized);
        }
        owner.require_auth();

        if vesting_duration == 0 || cliff_duration > vesting_duration {
            return Err(Error::InvalidSchedule);
        }

        let config = TrusteeConfig {
            owner,
            token,
            reserve_wallet,
            founders_wallet,
            start_time,
            cliff_duration,
            vesting_duration,
        };
        env.storage().instance().set(&DataKey::Config, &config);
        env.storage().instance().set(&DataKey::GrantsCreated, &false);
        Ok(())
    }

    /// Split the held lump sum between the two beneficiaries with the final
    /// counts from the closed sale. Exactly once.
    pub fn create_grants(
        env: Env,
        caller: Address,
        reserve_total: i128,
        founder_total: i128,
    ) -> Result<(), Error> {
        let config = get_config(&env)?;
        caller.require_auth();
        if caller != config.owner {
            return Err(Error::Unauthorized);
        }
        if grants_created(&env) {
            return Err(Error::GrantsAlreadyCreated);
        }
        if reserve_total <= 0 || founder_total <= 0 {
            return Err(Error::InvalidAmount);
        }

        set_grant(
            &env,
            &Grant {
                beneficiary: config.reserve_wallet.clone(),
                total_amount: reserve_total,
                released_amount: 0,
            },
        );
        set_grant(
            &env,
            &Grant {
                beneficiary: config.founders_wallet.clone(),
                total_amount: founder_total,
                released_amount: 0,
            },
        );
        env.storage().instance().set(&DataKey::GrantsCreated, &true);

        env.events().publish(
            (symbol_short!("granted"),),
            (config.reserve_wallet, reserve_total),
        );
        env.events().publish(
            (symbol_short!("granted"),),
            (config.founders_wallet, founder_total),
        );
        Ok(())
    }

    /// Pull whatever has unlocked since the last call. A zero-unlockable
    /// release is a successful no-op. Returns the transferred amount.
    pub fn release(env: Env, caller: Address) -> Result<i128, Error> {
        let config = get_config(&env)?;
        caller.require_auth();
        if !grants_created(&env) {
            return Err(Error::GrantsNotCreated);
        }

        let mut grant = get_grant(&env, &caller).ok_or(Error::NoGrant)?;

        let now = env.ledger().timestamp();
        let vested = vested_amount(
            grant.total_amount,
            now,
            config.start_time,
            config.cliff_duration,
            config.vesting_duration,
        )
        .ok_or(Error::Overflow)?;
        let unlockable = vested
            .checked_sub(grant.released_amount)
            .ok_or(Error::Overflow)?;
        if unlockable <= 0 {
            return Ok(0);
        }

        // Bookkeeping before the transfer.
        grant.released_amount = grant
            .released_amount
            .checked_add(unlockable)
            .ok_or(Error::Overflow)?;
        set_grant(&env, &grant);

        let token_client = token::Client::new(&env, &config.token);
        token_client.transfer(&env.current_contract_address(), &caller, &unlockable);

        env.events()
            .publish((symbol_short!("released"),), (caller, unlockable));
        Ok(unlockable)
    }

    pub fn grants_created(env: Env) -> bool {
        grants_created(&env)
    }

    /// What a beneficiary could pull right now.
    pub fn releasable(env: Env, beneficiary: Address) -> i128 {
        let config = match get_config(&env) {
            Ok(c) => c,
            Err(_) => return 0,
        };
        let grant = match get_grant(&env, &beneficiary) {
            Some(g) => g,
            None => return 0,
        };
        let vested = vested_amount(
            grant.total_amount,
            env.ledger().timestamp(),
            config.start_time,
            config.cliff_duration,
            config.vesting_duration,
        )
        .unwrap_or(0);
        (vested - grant.released_amount).max(0)
    }

    pub fn get_grant(env: Env, beneficiary: Address) -> Option<Grant> {
        get_grant(&env, &beneficiary)
    }
}

fn get_config(env: &Env) -> Result<TrusteeConfig, Error> {
    env.storage()
        .instance()
        .get(&DataKey::Config)
        .ok_or(Error::NotInitialized)
}

fn grants_created(env: &Env) -> bool {
    env.storage()
        .instance()
        .get(&DataKey::GrantsCreated)
        .unwrap_or(false)
}

fn get_grant(env: &Env, beneficiary: &Address) -> Option<Grant> {
    env.storage()
        .persistent()
        .get(&DataKey::Grant(beneficiary.clone()))
}

fn set_grant(env: &Env, grant: &Grant) {
    env.storage()
        .persistent()
        .set(&DataKey::Grant(grant.beneficiary.clone()), grant);
}

#[cfg(test)]
mod test;
