//! Scripts for deploying and initializing the River smart contracts.

#![deny(missing_docs)]
#![deny(clippy::missing_docs_in_private_items)]

pub mod cli;
mod commands;
pub mod constants;
pub mod errors;
pub mod proxy;
mod solidity;
pub mod types;
pub mod utils;
pub mod withdrawal_credentials;
