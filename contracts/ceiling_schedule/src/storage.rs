use crate::types::{DataKey, Tier};
use soroban_sdk::{Address, BytesN, Env, Vec};

pub fn has_owner(env: &Env) -> bool {
    env.storage().instance().has(&DataKey::Owner)
}

pub fn get_owner(env: &Env) -> Address {
    env.storage().instance().get(&DataKey::Owner).unwrap()
}

pub fn set_owner(env: &Env, owner: &Address) {
    env.storage().instance().set(&DataKey::Owner, owner);
}

pub fn get_sale(env: &Env) -> Address {
    env.storage().instance().get(&DataKey::Sale).unwrap()
}

pub fn set_sale(env: &Env, sale: &Address) {
    env.storage().instance().set(&DataKey::Sale, sale);
}

pub fn has_commitments(env: &Env) -> bool {
    env.storage().instance().has(&DataKey::Commitments)
}

pub fn get_commitments(env: &Env) -> Option<Vec<BytesN<32>>> {
    env.storage().instance().get(&DataKey::Commitments)
}

pub fn set_commitments(env: &Env, hashes: &Vec<BytesN<32>>) {
    env.storage().instance().set(&DataKey::Commitments, hashes);
}

pub fn get_revealed_count(env: &Env) -> u32 {
    env.storage()
        .instance()
        .get(&DataKey::RevealedCount)
        .unwrap_or(0)
}

pub fn set_revealed_count(env: &Env, count: u32) {
    env.storage().instance().set(&DataKey::RevealedCount, &count);
}

pub fn get_all_revealed(env: &Env) -> bool {
    env.storage()
        .instance()
        .get(&DataKey::AllRevealed)
        .unwrap_or(false)
}

pub fn set_all_revealed(env: &Env, done: bool) {
    env.storage().instance().set(&DataKey::AllRevealed, &done);
}

pub fn get_current_index(env: &Env) -> u32 {
    env.storage()
        .instance()
        .get(&DataKey::CurrentIndex)
        .unwrap_or(0)
}

pub fn set_current_index(env: &Env, index: u32) {
    env.storage().instance().set(&DataKey::CurrentIndex, &index);
}

pub fn get_current_base(env: &Env) -> i128 {
    env.storage()
        .instance()
        .get(&DataKey::CurrentBase)
        .unwrap_or(0)
}

pub fn set_current_base(env: &Env, base: i128) {
    env.storage().instance().set(&DataKey::CurrentBase, &base);
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

pub fn get_tier(env: &Env, index: u32) -> Option<Tier> {
    env.storage().persistent().get(&DataKey::Tier(index))
}

pub fn set_tier(env: &Env, index: u32, tier: &Tier) {
    env.storage().persistent().set(&DataKey::Tier(index), tier);
}
