use soroban_sdk::{contracterror, contracttype, Address};

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    AlreadyInitialized = 1,
    NotInitialized = 2,
    Unauthorized = 3,
    InvalidConfig = 4,
    SaleNotOpen = 5,
    SalePaused = 6,
    SaleClosed = 7,
    SaleNotClosed = 8,
    InvalidTransition = 9,
    ZeroContribution = 10,
    BelowMinimum = 11,
    AboveMaximum = 12,
    NotApproved = 13,
    AlreadyWhitelisted = 14,
    InvalidAllowance = 15,
    StateNotClean = 16,
    NoHeadroom = 17,
    OwnerMismatch = 18,
    Overflow = 19,
}

/// Sale lifecycle. `Closed` is terminal; the only legal edges are
/// Created→Active, Active⇄Paused and Active|Paused→Closed.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[contracttype]
pub enum SalePhase {
    Created = 0,
    Paused = 1,
    Active = 2,
    Closed = 3,
}

/// The two phase variants sharing this contract shape: the allow-listed
/// presale enforces per-transaction bounds and honours planned allowances,
/// the general sale is gated by the hidden ceiling schedule instead.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[contracttype]
pub enum SaleKind {
    Presale = 0,
    GeneralSale = 1,
}

#[derive(Clone)]
#[contracttype]
pub struct SaleConfig {
    pub owner: Address,
    pub api_signer: Address,
    pub kind: SaleKind,
    pub unit_token: Address,    // SAC this sale mints (sale is asset admin)
    pub payment_token: Address, // token contributions are denominated in
    pub escrow_wallet: Address,
    pub bounty_wallet: Address, // destination recorded for the bounty counter payout
    pub cap: i128,
    pub min_tx: i128,
    pub max_tx: i128,
    pub exchange_rate: i128, // base units minted per payment unit
    pub whitelist_deadline: u64,
    pub allow_transfer: bool,
    pub ceiling_schedule: Option<Address>,
    pub affiliate_registry: Option<Address>,
}

/// Volume discount bands keyed by sale-to-date cumulative collected value.
/// Band 0 (below `tier1_limit`) carries the richest multiplier, band 3 the
/// minimum-discount one.
#[derive(Clone, Debug, Eq, PartialEq)]
#[contracttype]
pub struct Pricing {
    pub tier1_limit: i128,
    pub tier2_limit: i128,
    pub tier3_limit: i128,
    pub band0_bps: u32,
    pub band1_bps: u32,
    pub band2_bps: u32,
    pub band3_bps: u32,
}

/// Proportional shares of each contribution's base token amount accumulated
/// into internal counters for the post-sale trustee seeding.
#[derive(Clone, Debug, Eq, PartialEq)]
#[contracttype]
pub struct Distribution {
    pub reserve_bps: u32,
    pub founders_bps: u32,
    pub bounty_bps: u32,
}

#[derive(Clone)]
#[contracttype]
pub enum DataKey {
    Config,
    Pricing,
    Distribution,
    Phase,
    TotalCollected,
    ReserveTokens,
    FounderTokens,
    BountyTokens,
    Whitelist(Address),
    Approved(Address),
}
