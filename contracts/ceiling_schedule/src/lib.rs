#![no_std]

mod contract;
mod storage;
mod types;


pub use contract::{commitment_hash, CeilingScheduleContract, CeilingScheduleContractClient};
pub use types::{Error, Tier, CEILING_SLOTS};
