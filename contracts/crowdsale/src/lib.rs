#![no_std]

mod contract;
mod pricing;
mod storage;
mod types;


pub use contract::{CrowdsaleContract, CrowdsaleContractClient};
pub use types::{Distribution, Error, Pricing, SaleConfig, SaleKind, SalePhase};
