//! Definitions of errors that can occur while deploying and cutting the diamond

use std::{
    error::Error,
    fmt::{self, Display, Formatter},
};

use alloy_primitives::{Address, FixedBytes, TxHash};

use crate::types::DiamondModule;

/// Errors that can occur during the execution of the deploy scripts
#[derive(Debug)]
pub enum ScriptError {
    /// The network configuration is missing or invalid for the target chain
    Configuration(String),
    /// Error reading or parsing a compiled contract artifact
    ArtifactParsing(String),
    /// Error initializing the RPC client
    ClientInitialization(String),
    /// Error constructing calldata for a contract method or constructor
    CalldataConstruction(String),
    /// Error deploying a contract
    ContractDeployment(String),
    /// Error calling a contract method
    ContractInteraction(String),
    /// The same selector is exposed by two facets in one cut
    SelectorCollision {
        /// The colliding selector
        selector: FixedBytes<4>,
        /// The facet which first claimed the selector
        first: DiamondModule,
        /// The facet which claimed it again
        second: DiamondModule,
    },
    /// A facet in a cut exposes no routable selectors
    EmptyFacet(DiamondModule),
    /// The diamond cut transaction was mined with a failure status
    CutFailed {
        /// The hash of the failed cut transaction
        tx_hash: TxHash,
    },
    /// The proxy routes a selector to a facet other than the one that was cut in
    DispatchMismatch {
        /// The selector that was looked up
        selector: FixedBytes<4>,
        /// The facet the selector was cut to
        expected: Address,
        /// The facet the proxy reports
        actual: Address,
    },
}

impl Display for ScriptError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ScriptError::Configuration(s) => write!(f, "invalid configuration: {}", s),
            ScriptError::ArtifactParsing(s) => write!(f, "error parsing artifact: {}", s),
            ScriptError::ClientInitialization(s) => write!(f, "error initializing client: {}", s),
            ScriptError::CalldataConstruction(s) => write!(f, "error constructing calldata: {}", s),
            ScriptError::ContractDeployment(s) => write!(f, "error deploying contract: {}", s),
            ScriptError::ContractInteraction(s) => {
                write!(f, "error interacting with contract: {}", s)
            }
            ScriptError::SelectorCollision {
                selector,
                first,
                second,
            } => write!(
                f,
                "selector {} is exposed by both {} and {}",
                selector, first, second
            ),
            ScriptError::EmptyFacet(module) => {
                write!(f, "{} exposes no selectors to cut", module)
            }
            ScriptError::CutFailed { tx_hash } => write!(f, "diamond cut failed: {:#x}", tx_hash),
            ScriptError::DispatchMismatch {
                selector,
                expected,
                actual,
            } => write!(
                f,
                "selector {} routes to {} instead of {}",
                selector, actual, expected
            ),
        }
    }
}

impl Error for ScriptError {}
