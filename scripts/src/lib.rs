//! Scripts for deploying, cutting, and initializing the diamond proxy and its facets.

#![deny(missing_docs)]
#![deny(clippy::missing_docs_in_private_items)]

pub mod artifacts;
pub mod cli;
pub mod client;
mod commands;
pub mod config;
pub mod constants;
pub mod cut;
pub mod deployer;
pub mod errors;
pub mod init;
pub mod ledger;
pub mod selectors;
#[allow(missing_docs, clippy::missing_docs_in_private_items)]
pub mod solidity;
pub mod types;
pub mod verify;

pub use commands::{deploy_diamond, DeployContext, DiamondDeployment};
