use crate::pricing;
use crate::storage::*;
use crate::types::*;
use sale_math::apply_bps;
use soroban_sdk::{
    contract, contractimpl, contractmeta, symbol_short, token, Address, Env, IntoVal, Symbol, Vec,
};

contractmeta!(
    key = "Description",
    val = "Two-phase capped token sale with hidden ceilings"
);

#[contract]
pub struct CrowdsaleContract;

#[contractimpl]
impl CrowdsaleContract {
    /// Set up the sale. `kind` selects the phase variant: the presale
    /// enforces `min_tx..=max_tx` per transaction and honours whitelist
    /// allowances until `whitelist_deadline`; the general sale requires a
    /// `ceiling_schedule`. Starts in `Created`.
    #[allow(clippy::too_many_arguments)]
    pub fn initialize(
        env: Env,
        owner: Address,
        api_signer: Address,
        kind: SaleKind,
        unit_token: Address,
        payment_token: Address,
        escrow_wallet: Address,
        bounty_wallet: Address,
        cap: i128,
        min_tx: i128,
        max_tx: i128,
        exchange_rate: i128,
        whitelist_deadline: u64,
        ceiling_schedule: Option<Address>,
        affiliate_registry: Option<Address>,
    ) -> Result<(), Error> {
        if has_config(&env) {
            return Err(Error::AlreadyInitialized);
        }
        owner.require_auth();

        if cap <= 0 || exchange_rate <= 0 || min_tx < 0 || max_tx < min_tx {
            return Err(Error::InvalidConfig);
        }
        if kind == SaleKind::GeneralSale && ceiling_schedule.is_none() {
            return Err(Error::InvalidConfig);
        }

        let config = SaleConfig {
            owner: owner.clone(),
            api_signer,
            kind,
            unit_token,
            payment_token,
            escrow_wallet,
            bounty_wallet,
            cap,
            min_tx,
            max_tx,
            exchange_rate,
            whitelist_deadline,
            allow_transfer: false,
            ceiling_schedule,
            affiliate_registry,
        };
        set_config(&env, &config);
        set_phase(&env, SalePhase::Created);
        set_total_collected(&env, 0);
        // Flat pricing and empty distribution until the owner configures them.
        set_pricing(
            &env,
            &Pricing {
                tier1_limit: 0,
                tier2_limit: 0,
                tier3_limit: 0,
                band0_bps: 10_000,
                band1_bps: 10_000,
                band2_bps: 10_000,
                band3_bps: 10_000,
            },
        );
        set_distribution(
            &env,
            &Distribution {
                reserve_bps: 0,
                founders_bps: 0,
                bounty_bps: 0,
            },
        );

        env.events().publish((symbol_short!("init"),), (owner, cap));
        Ok(())
    }

    /// Accept a contribution of `value` payment-token units, with an
    /// optional affiliate payload. Returns the token amount minted to the
    /// contributor.
    pub fn contribute(
        env: Env,
        contributor: Address,
        value: i128,
        affiliate: Option<Address>,
    ) -> Result<i128, Error> {
        contributor.require_auth();
        let config = require_config(&env)?;

        match get_phase(&env) {
            SalePhase::Active => {}
            SalePhase::Created => return Err(Error::SaleNotOpen),
            SalePhase::Paused => return Err(Error::SalePaused),
            SalePhase::Closed => return Err(Error::SaleClosed),
        }
        if value <= 0 {
            return Err(Error::ZeroContribution);
        }
        if !is_approved(&env, &contributor) {
            return Err(Error::NotApproved);
        }
        if config.kind == SaleKind::Presale {
            if value < config.min_tx {
                return Err(Error::BelowMinimum);
            }
            if value > config.max_tx {
                return Err(Error::AboveMaximum);
            }
        }

        let total = get_total_collected(&env);
        let remaining_cap = config.cap - total;
        if remaining_cap <= 0 {
            return Err(Error::SaleClosed);
        }

        let mut accepted = value;

        // Honour-whitelist clipping: an unexpired planned allowance bounds
        // the contribution; a fully consumed or expired entry folds into the
        // shared cap instead.
        let now = env.ledger().timestamp();
        let mut allowance_used = false;
        if config.kind == SaleKind::Presale && now <= config.whitelist_deadline {
            if let Some(remaining) = get_whitelist_allowance(&env, &contributor) {
                if remaining > 0 {
                    accepted = accepted.min(remaining);
                    allowance_used = true;
                }
            }
        }

        if config.kind == SaleKind::GeneralSale {
            let schedule = config.ceiling_schedule.clone().ok_or(Error::InvalidConfig)?;
            let available: i128 = env.invoke_contract(
                &schedule,
                &Symbol::new(&env, "available_to_collect"),
                Vec::from_array(&env, [total.into_val(&env)]),
            );
            if available == 0 {
                return Err(Error::NoHeadroom);
            }
            accepted = accepted.min(available);
        }

        accepted = accepted.min(remaining_cap);
        let refund = value - accepted;

        // Pricing band keyed on the pre-contribution cumulative total.
        let bps = pricing::band_bps(&get_pricing(&env), total);
        let base_tokens = pricing::tokens_for(accepted, config.exchange_rate, bps)?;

        let (bonus_tokens, investor_share, affiliate_addr) =
            affiliate_cut(&env, &config, &contributor, base_tokens, accepted, affiliate)?;
        let minted = base_tokens
            .checked_add(investor_share)
            .ok_or(Error::Overflow)?;

        // Effects: every piece of internal bookkeeping lands before any
        // token movement (checks-effects-interactions).
        if allowance_used {
            let remaining = get_whitelist_allowance(&env, &contributor).unwrap_or(0);
            set_whitelist_allowance(&env, &contributor, remaining - accepted);
        }

        let new_total = total.checked_add(accepted).ok_or(Error::Overflow)?;
        set_total_collected(&env, new_total);
        accumulate_shares(&env, base_tokens)?;

        if config.kind == SaleKind::GeneralSale {
            let schedule = config.ceiling_schedule.clone().ok_or(Error::InvalidConfig)?;
            env.invoke_contract::<()>(
                &schedule,
                &Symbol::new(&env, "collect"),
                Vec::from_array(
                    &env,
                    [
                        env.current_contract_address().into_val(&env),
                        accepted.into_val(&env),
                    ],
                ),
            );
        }

        let closed = new_total >= config.cap;
        if closed {
            set_phase(&env, SalePhase::Closed);
        }

        // Interactions: pull the full value, forward the accepted part to
        // escrow, push any excess straight back to the sender.
        let payment = token::Client::new(&env, &config.payment_token);
        payment.transfer(&contributor, &env.current_contract_address(), &value);
        payment.transfer(
            &env.current_contract_address(),
            &config.escrow_wallet,
            &accepted,
        );
        if refund > 0 {
            payment.transfer(&env.current_contract_address(), &contributor, &refund);
            env.events()
                .publish((symbol_short!("refund"),), (contributor.clone(), refund));
        }

        let minter = token::StellarAssetClient::new(&env, &config.unit_token);
        minter.mint(&contributor, &minted);
        if bonus_tokens > 0 {
            if let Some(aff) = affiliate_addr {
                minter.mint(&aff, &bonus_tokens);
            }
        }

        env.events().publish(
            (symbol_short!("contrib"),),
            (contributor, accepted, minted),
        );
        if closed {
            env.events()
                .publish((symbol_short!("closed"),), new_total);
        }

        Ok(minted)
    }

    /// Open the sale for contributions.
    pub fn activate(env: Env, caller: Address) -> Result<(), Error> {
        require_owner(&env, &caller)?;
        transition(&env, SalePhase::Created, SalePhase::Active)?;
        env.events().publish((symbol_short!("activated"),), ());
        Ok(())
    }

    pub fn pause(env: Env, caller: Address) -> Result<(), Error> {
        require_owner(&env, &caller)?;
        transition(&env, SalePhase::Active, SalePhase::Paused)?;
        env.events().publish((symbol_short!("paused"),), ());
        Ok(())
    }

    pub fn resume(env: Env, caller: Address) -> Result<(), Error> {
        require_owner(&env, &caller)?;
        transition(&env, SalePhase::Paused, SalePhase::Active)?;
        env.events().publish((symbol_short!("resumed"),), ());
        Ok(())
    }

    /// Close the sale for good. One-way.
    pub fn close(env: Env, caller: Address) -> Result<(), Error> {
        require_owner(&env, &caller)?;
        match get_phase(&env) {
            SalePhase::Active | SalePhase::Paused => {}
            SalePhase::Created | SalePhase::Closed => return Err(Error::InvalidTransition),
        }
        set_phase(&env, SalePhase::Closed);
        env.events()
            .publish((symbol_short!("closed"),), get_total_collected(&env));
        Ok(())
    }

    /// KYC gate, set by the designated API-signer role.
    pub fn approve_address(env: Env, caller: Address, addr: Address) -> Result<(), Error> {
        let config = require_config(&env)?;
        caller.require_auth();
        if caller != config.api_signer {
            return Err(Error::Unauthorized);
        }
        set_approved(&env, &addr, true);
        env.events().publish((symbol_short!("approved"),), addr);
        Ok(())
    }

    /// Register a planned allowance, honoured until the whitelist deadline.
    /// One entry per address, never overwritten.
    pub fn add_to_whitelist(
        env: Env,
        caller: Address,
        addr: Address,
        planned_value: i128,
    ) -> Result<(), Error> {
        require_owner(&env, &caller)?;
        if planned_value <= 0 {
            return Err(Error::InvalidAllowance);
        }
        if has_whitelist_entry(&env, &addr) {
            return Err(Error::AlreadyWhitelisted);
        }
        set_whitelist_allowance(&env, &addr, planned_value);
        env.events()
            .publish((symbol_short!("listed"),), (addr, planned_value));
        Ok(())
    }

    /// Reconfigure the discount bands. Only while nothing has been
    /// collected: pricing is frozen the moment value enters the sale.
    #[allow(clippy::too_many_arguments)]
    pub fn set_pricing(
        env: Env,
        caller: Address,
        tier1_limit: i128,
        tier2_limit: i128,
        tier3_limit: i128,
        band0_bps: u32,
        band1_bps: u32,
        band2_bps: u32,
        band3_bps: u32,
    ) -> Result<(), Error> {
        require_owner(&env, &caller)?;
        require_clean(&env)?;
        if tier1_limit <= 0 || tier1_limit > tier2_limit || tier2_limit > tier3_limit {
            return Err(Error::InvalidConfig);
        }
        set_pricing(
            &env,
            &Pricing {
                tier1_limit,
                tier2_limit,
                tier3_limit,
                band0_bps,
                band1_bps,
                band2_bps,
                band3_bps,
            },
        );
        Ok(())
    }

    /// Adjust the per-transaction bounds. Clean state only.
    pub fn set_contribution_range(
        env: Env,
        caller: Address,
        min_tx: i128,
        max_tx: i128,
    ) -> Result<(), Error> {
        require_owner(&env, &caller)?;
        require_clean(&env)?;
        if min_tx < 0 || max_tx < min_tx {
            return Err(Error::InvalidConfig);
        }
        let mut config = get_config(&env);
        config.min_tx = min_tx;
        config.max_tx = max_tx;
        set_config(&env, &config);
        Ok(())
    }

    /// Adjust the reserve/founders/bounty counter shares. Clean state only.
    pub fn set_distribution(
        env: Env,
        caller: Address,
        reserve_bps: u32,
        founders_bps: u32,
        bounty_bps: u32,
    ) -> Result<(), Error> {
        require_owner(&env, &caller)?;
        require_clean(&env)?;
        if reserve_bps > 10_000 || founders_bps > 10_000 || bounty_bps > 10_000 {
            return Err(Error::InvalidConfig);
        }
        set_distribution(
            &env,
            &Distribution {
                reserve_bps,
                founders_bps,
                bounty_bps,
            },
        );
        Ok(())
    }

    pub fn set_exchange_rate(env: Env, caller: Address, rate: i128) -> Result<(), Error> {
        require_owner(&env, &caller)?;
        if get_phase(&env) == SalePhase::Closed {
            return Err(Error::SaleClosed);
        }
        if rate <= 0 {
            return Err(Error::InvalidConfig);
        }
        let mut config = get_config(&env);
        config.exchange_rate = rate;
        set_config(&env, &config);
        env.events().publish((symbol_short!("rate"),), rate);
        Ok(())
    }

    /// Record whether minted units may be transferred; surfaced for the
    /// token controller, which enforces it.
    pub fn set_allow_transfer(env: Env, caller: Address, allow: bool) -> Result<(), Error> {
        require_owner(&env, &caller)?;
        let mut config = get_config(&env);
        config.allow_transfer = allow;
        set_config(&env, &config);
        env.events().publish((symbol_short!("xferflag"),), allow);
        Ok(())
    }

    /// Hand the sale over once it is closed. The new owner must be supplied
    /// twice; a mismatch rejects the call (carried confirmation pattern).
    pub fn transfer_ownership(
        env: Env,
        caller: Address,
        new_owner: Address,
        confirm_new_owner: Address,
    ) -> Result<(), Error> {
        require_owner(&env, &caller)?;
        if get_phase(&env) != SalePhase::Closed {
            return Err(Error::SaleNotClosed);
        }
        if new_owner != confirm_new_owner {
            return Err(Error::OwnerMismatch);
        }
        let mut config = get_config(&env);
        config.owner = new_owner.clone();
        set_config(&env, &config);
        env.events().publish((symbol_short!("owner"),), new_owner);
        Ok(())
    }

    // View functions
    pub fn get_config(env: Env) -> SaleConfig {
        get_config(&env)
    }

    pub fn phase(env: Env) -> SalePhase {
        get_phase(&env)
    }

    pub fn total_value_collected(env: Env) -> i128 {
        get_total_collected(&env)
    }

    pub fn get_pricing(env: Env) -> Pricing {
        get_pricing(&env)
    }

    pub fn get_distribution(env: Env) -> Distribution {
        get_distribution(&env)
    }

    pub fn reserve_tokens(env: Env) -> i128 {
        get_reserve_tokens(&env)
    }

    pub fn founder_tokens(env: Env) -> i128 {
        get_founder_tokens(&env)
    }

    pub fn bounty_tokens(env: Env) -> i128 {
        get_bounty_tokens(&env)
    }

    pub fn whitelist_allowance(env: Env, addr: Address) -> Option<i128> {
        get_whitelist_allowance(&env, &addr)
    }

    pub fn is_approved(env: Env, addr: Address) -> bool {
        is_approved(&env, &addr)
    }
}

fn require_config(env: &Env) -> Result<SaleConfig, Error> {
    if !has_config(env) {
        return Err(Error::NotInitialized);
    }
    Ok(get_config(env))
}

fn require_owner(env: &Env, caller: &Address) -> Result<SaleConfig, Error> {
    let config = require_config(env)?;
    caller.require_auth();
    if *caller != config.owner {
        return Err(Error::Unauthorized);
    }
    Ok(config)
}

fn require_clean(env: &Env) -> Result<(), Error> {
    if get_phase(env) == SalePhase::Closed {
        return Err(Error::SaleClosed);
    }
    if get_total_collected(env) > 0 {
        return Err(Error::StateNotClean);
    }
    Ok(())
}

fn transition(env: &Env, from: SalePhase, to: SalePhase) -> Result<(), Error> {
    if get_phase(env) != from {
        return Err(Error::InvalidTransition);
    }
    set_phase(env, to);
    Ok(())
}

/// Query the affiliate registry for the contribution's bonus split. Returns
/// zeros when no payload was supplied, no registry is configured, or the
/// investor has no registered affiliate.
fn affiliate_cut(
    env: &Env,
    config: &SaleConfig,
    contributor: &Address,
    base_tokens: i128,
    accepted: i128,
    affiliate: Option<Address>,
) -> Result<(i128, i128, Option<Address>), Error> {
    if affiliate.is_none() {
        return Ok((0, 0, None));
    }
    let registry = match &config.affiliate_registry {
        Some(r) => r.clone(),
        None => return Ok((0, 0, None)),
    };

    let registered: Option<Address> = env.invoke_contract(
        &registry,
        &Symbol::new(env, "affiliate_of"),
        Vec::from_array(env, [contributor.into_val(env)]),
    );
    let aff = match registered {
        Some(a) => a,
        None => return Ok((0, 0, None)),
    };

    let (bonus, share): (i128, i128) = env.invoke_contract(
        &registry,
        &Symbol::new(env, "apply_bonus"),
        Vec::from_array(
            env,
            [
                contributor.into_val(env),
                base_tokens.into_val(env),
                accepted.into_val(env),
            ],
        ),
    );
    Ok((bonus, share, Some(aff)))
}

/// Accumulate the proportional reserve/founder/bounty counters that seed the
/// vesting trustee after finalization. Counted here, minted later.
fn accumulate_shares(env: &Env, base_tokens: i128) -> Result<(), Error> {
    let distribution = get_distribution(env);
    let reserve = apply_bps(base_tokens, distribution.reserve_bps).ok_or(Error::Overflow)?;
    let founders = apply_bps(base_tokens, distribution.founders_bps).ok_or(Error::Overflow)?;
    let bounty = apply_bps(base_tokens, distribution.bounty_bps).ok_or(Error::Overflow)?;

    set_reserve_tokens(
        env,
        get_reserve_tokens(env)
            .checked_add(reserve)
            .ok_or(Error::Overflow)?,
    );
    set_founder_tokens(
        env,
        get_founder_tokens(env)
            .checked_add(founders)
            .ok_or(Error::Overflow)?,
    );
    set_bounty_tokens(
        env,
        get_bounty_tokens(env)
            .checked_add(bounty)
            .ok_or(Error::Overflow)?,
    );
    Ok(())
}
