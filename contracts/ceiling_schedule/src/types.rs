use soroban_sdk::{contracterror, contracttype};

/// Number of commitment slots. The operator pads the committed array with
/// decoy hashes so the true tier count stays hidden until the last reveal.
pub const CEILING_SLOTS: u32 = 10;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    AlreadyInitialized = 1,
    NotInitialized = 2,
    Unauthorized = 3,
    AlreadyCommitted = 4,
    NothingCommitted = 5,
    WrongCommitmentCount = 6,
    HashMismatch = 7,
    SequenceClosed = 8,
    InvalidTier = 9,
    LengthMismatch = 10,
    NoHeadroom = 11,
    ExceedsHeadroom = 12,
    InvalidAmount = 13,
    Overflow = 14,
}

/// A revealed funding tier. `cap` is the value capacity of the segment,
/// `slope` the decay divisor applied to remaining capacity, `precision` the
/// dust threshold below which the tier counts as exhausted.
#[derive(Clone, Debug, Eq, PartialEq)]
#[contracttype]
pub struct Tier {
    pub cap: i128,
    pub slope: i128,
    pub precision: i128,
    pub is_last: bool,
}

#[derive(Clone)]
#[contracttype]
pub enum DataKey {
    Owner,
    Sale,
    Commitments,
    RevealedCount,
    AllRevealed,
    CurrentIndex,
    CurrentBase,
    TotalCollected,
    Tier(u32),
}
