#![allow(clippy::unwrap_used)]

use crate::{Error, VestingTrusteeContract, VestingTrusteeContractClient};
use soroban_sdk::{
    testutils::{Address as _, Ledger},
    token, Address, Env,
};

const UNIT: i128 = 10_000_000;

const START: u64 = 10_000;
const MONTH: u64 = 30 * 24 * 3_600;
// Fixture schedule: cliff clears in month 7, fully vested by month 25.
const CLIFF: u64 = 7 * MONTH;
const DURATION: u64 = 25 * MONTH;

const RESERVE_TOTAL: i128 = 2_900 * UNIT;
const FOUNDER_TOTAL: i128 = 1_300 * UNIT;

struct Fixture<'a> {
    env: Env,
    trustee: VestingTrusteeContractClient<'a>,
    owner: Address,
    reserve: Address,
    founders: Address,
    token: token::Client<'a>,
}

fn setup() -> Fixture<'static> {
    let env = Env::default();
    env.mock_all_auths();
    env.ledger().with_mut(|l| l.timestamp = START);

    let owner = Address::generate(&env);
    let reserve = Address::generate(&env);
    let founders = Address::generate(&env);
    let issuer = Address::generate(&env);

    let token_id = env.register_stellar_asset_contract_v2(issuer).address();
    let token_client = token::Client::new(&env, &token_id);

    let trustee_id = env.register_contract(None, VestingTrusteeContract);
    let trustee = VestingTrusteeContractClient::new(&env, &trustee_id);

    trustee.initialize(
        &owner, &token_id, &reserve, &founders, &START, &CLIFF, &DURATION,
    );

    // The finalized sale seeds the trustee's backing balance.
    token::StellarAssetClient::new(&env, &token_id)
        .mint(&trustee_id, &(RESERVE_TOTAL + FOUNDER_TOTAL));

    Fixture {
        env,
        trustee,
        owner,
        reserve,
        founders,
        token: token_client,
    }
}

fn at(env: &Env, t: u64) {
    env.ledger().with_mut(|l| l.timestamp = t);
}

#[test]
fn test_grants_are_created_exactly_once() {
    let f = setup();

    assert!(!f.trustee.grants_created());
    f.trustee
        .create_grants(&f.owner, &RESERVE_TOTAL, &FOUNDER_TOTAL);
    assert!(f.trustee.grants_created());

    assert_eq!(
        f.trustee
            .try_create_grants(&f.owner, &RESERVE_TOTAL, &FOUNDER_TOTAL),
        Err(Ok(Error::GrantsAlreadyCreated))
    );

    let grant = f.trustee.get_grant(&f.reserve).unwrap();
    assert_eq!(grant.total_amount, RESERVE_TOTAL);
    assert_eq!(grant.released_amount, 0);
}

#[test]
fn test_create_grants_requires_owner() {
    let f = setup();
    assert_eq!(
        f.trustee
            .try_create_grants(&f.reserve, &RESERVE_TOTAL, &FOUNDER_TOTAL),
        Err(Ok(Error::Unauthorized))
    );
    assert_eq!(
        f.trustee.try_create_grants(&f.owner, &0, &FOUNDER_TOTAL),
        Err(Ok(Error::InvalidAmount))
    );
}

#[test]
fn test_nothing_unlocks_before_cliff() {
    let f = setup();
    f.trustee
        .create_grants(&f.owner, &RESERVE_TOTAL, &FOUNDER_TOTAL);

    at(&f.env, START + CLIFF - 1);
    assert_eq!(f.trustee.releasable(&f.reserve), 0);
    assert_eq!(f.trustee.release(&f.reserve), 0);
    assert_eq!(f.token.balance(&f.reserve), 0);
}

#[test]
fn test_linear_fraction_measured_from_start() {
    let f = setup();
    f.trustee
        .create_grants(&f.owner, &RESERVE_TOTAL, &FOUNDER_TOTAL);

    // At the cliff boundary, 7/25 of the grant is already vested.
    at(&f.env, START + CLIFF);
    let expected = RESERVE_TOTAL * 7 / 25;
    assert_eq!(f.trustee.releasable(&f.reserve), expected);
    assert_eq!(f.trustee.release(&f.reserve), expected);
    assert_eq!(f.token.balance(&f.reserve), expected);

    // Immediately repeating releases nothing new.
    assert_eq!(f.trustee.release(&f.reserve), 0);
}

#[test]
fn test_full_vesting_round_trip() {
    let f = setup();
    f.trustee
        .create_grants(&f.owner, &RESERVE_TOTAL, &FOUNDER_TOTAL);

    // Partial pulls along the way...
    at(&f.env, START + 10 * MONTH);
    f.trustee.release(&f.reserve);
    at(&f.env, START + 20 * MONTH);
    f.trustee.release(&f.reserve);

    // ...and a final pull after the end brings the cumulative release to
    // exactly the grant total.
    at(&f.env, START + DURATION);
    f.trustee.release(&f.reserve);
    assert_eq!(f.token.balance(&f.reserve), RESERVE_TOTAL);
    assert_eq!(
        f.trustee.get_grant(&f.reserve).unwrap().released_amount,
        RESERVE_TOTAL
    );

    // Beyond the end there is nothing left.
    at(&f.env, START + DURATION + MONTH);
    assert_eq!(f.trustee.release(&f.reserve), 0);
}

#[test]
fn test_beneficiaries_are_independent() {
    let f = setup();
    f.trustee
        .create_grants(&f.owner, &RESERVE_TOTAL, &FOUNDER_TOTAL);

    at(&f.env, START + DURATION);
    assert_eq!(f.trustee.release(&f.founders), FOUNDER_TOTAL);
    assert_eq!(f.token.balance(&f.founders), FOUNDER_TOTAL);
    // The reserve grant is untouched by the founders' pull.
    assert_eq!(f.trustee.releasable(&f.reserve), RESERVE_TOTAL);
}

#[test]
fn test_only_beneficiaries_can_release() {
    let f = setup();
    f.trustee
        .create_grants(&f.owner, &RESERVE_TOTAL, &FOUNDER_TOTAL);

    at(&f.env, START + DURATION);
    let stranger = Address::generate(&f.env);
    assert_eq!(f.trustee.try_release(&stranger), Err(Ok(Error::NoGrant)));
    assert_eq!(f.trustee.try_release(&f.owner), Err(Ok(Error::NoGrant)));
}

#[test]
fn test_release_requires_grants() {
    let f = setup();
    assert_eq!(
        f.trustee.try_release(&f.reserve),
        Err(Ok(Error::GrantsNotCreated))
    );
}

#[test]
fn test_schedule_validation() {
    let env = Env::default();
    env.mock_all_auths();
    let owner = Address::generate(&env);
    let token = Address::generate(&env);
    let a = Address::generate(&env);
    let b = Address::generate(&env);

    let trustee_id = env.register_contract(None, VestingTrusteeContract);
    let trustee = VestingTrusteeContractClient::new(&env, &trustee_id);

    assert_eq!(
        trustee.try_initialize(&owner, &token, &a, &b, &0, &10, &0),
        Err(Ok(Error::InvalidSchedule))
    );
    assert_eq!(
        trustee.try_initialize(&owner, &token, &a, &b, &0, &100, &50),
        Err(Ok(Error::InvalidSchedule))
    );
}
