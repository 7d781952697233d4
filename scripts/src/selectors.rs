//! Derivation of the function selectors a facet exposes through the diamond

use std::collections::BTreeSet;

use alloy::json_abi::JsonAbi;
use alloy_primitives::FixedBytes;

use crate::{constants::RESERVED_SIGNATURES, types::DeployedModule};

/// Every externally callable selector in the interface, excluding the reserved ones
pub fn abi_selectors(abi: &JsonAbi) -> BTreeSet<FixedBytes<4>> {
    abi.functions()
        .filter(|function| !RESERVED_SIGNATURES.contains(&function.signature().as_str()))
        .map(|function| function.selector())
        .collect()
}

/// The selectors a deployed module exposes through the diamond
pub fn selectors_of(module: &DeployedModule) -> BTreeSet<FixedBytes<4>> {
    abi_selectors(&module.abi)
}
