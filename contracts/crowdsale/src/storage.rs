use crate::types::*;
use soroban_sdk::{Address, Env};

pub fn has_config(env: &Env) -> bool {
    env.storage().instance().has(&DataKey::Config)
}

pub fn get_config(env: &Env) -> SaleConfig {
    env.storage().instance().get(&DataKey::Config).unwrap()
}

pub fn set_config(env: &Env, config: &SaleConfig) {
    env.storage().instance().set(&DataKey::Config, config);
}

pub fn get_pricing(env: &Env) -> Pricing {
    env.storage().instance().get(&DataKey::Pricing).unwrap()
}

pub fn set_pricing(env: &Env, pricing: &Pricing) {
    env.storage().instance().set(&DataKey::Pricing, pricing);
}

pub fn get_distribution(env: &Env) -> Distribution {
    env.storage().instance().get(&DataKey::Distribution).unwrap()
}

pub fn set_distribution(env: &Env, distribution: &Distribution) {
    env.storage()
        .instance()
        .set(&DataKey::Distribution, distribution);
}

pub fn get_phase(env: &Env) -> SalePhase {
    env.storage()
        .instance()
        .get(&DataKey::Phase)
        .unwrap_or(SalePhase::Created)
}

pub fn set_phase(env: &Env, phase: SalePhase) {
    env.storage().instance().set(&DataKey::Phase, &phase);
}

pub fn get_total_collected(env: &Env) -> i128 {
    env.storage()
        .instance()
        .get(&DataKey::TotalCollected)
        .unwrap_or(0)
}

pub fn set_total_collected(env: &Env, total: i128) {
    env.storage().instance().set(&DataKey::TotalCollected, &total);
}

pub fn get_reserve_tokens(env: &Env) -> i128 {
    env.storage()
        .instance()
        .get(&DataKey::ReserveTokens)
        .unwrap_or(0)
}

pub fn set_reserve_tokens(env: &Env, amount: i128) {
    env.storage().instance().set(&DataKey::ReserveTokens, &amount);
}

pub fn get_founder_tokens(env: &Env) -> i128 {
    env.storage()
        .instance()
        .get(&DataKey::FounderTokens)
        .unwrap_or(0)
}

pub fn set_founder_tokens(env: &Env, amount: i128) {
    env.storage().instance().set(&DataKey::FounderTokens, &amount);
}

pub fn get_bounty_tokens(env: &Env) -> i128 {
    env.storage()
        .instance()
        .get(&DataKey::BountyTokens)
        .unwrap_or(0)
}

pub fn set_bounty_tokens(env: &Env, amount: i128) {
    env.storage().instance().set(&DataKey::BountyTokens, &amount);
}

pub fn has_whitelist_entry(env: &Env, addr: &Address) -> bool {
    env.storage()
        .persistent()
        .has(&DataKey::Whitelist(addr.clone()))
}

pub fn get_whitelist_allowance(env: &Env, addr: &Address) -> Option<i128> {
    env.storage()
        .persistent()
        .get(&DataKey::Whitelist(addr.clone()))
}

pub fn set_whitelist_allowance(env: &Env, addr: &Address, remaining: i128) {
    env.storage()
        .persistent()
        .set(&DataKey::Whitelist(addr.clone()), &remaining);
}

pub fn is_approved(env: &Env, addr: &Address) -> bool {
    env.storage()
        .persistent()
        .get(&DataKey::Approved(addr.clone()))
        .unwrap_or(false)
}

pub fn set_approved(env: &Env, addr: &Address, approved: bool) {
    env.storage()
        .persistent()
        .set(&DataKey::Approved(addr.clone()), &approved);
}
