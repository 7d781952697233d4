//! Assembly and execution of the diamond cut

use std::collections::{BTreeSet, HashMap};

use alloy_primitives::{Address, Bytes, FixedBytes};
use alloy_sol_types::SolCall;
use itertools::Itertools;
use tracing::{debug, info};

use crate::{
    artifacts::ModuleRegistry,
    client::{ChainClient, TxOutcome},
    errors::ScriptError,
    selectors::{abi_selectors, selectors_of},
    solidity::{ICut::diamondCutCall, ILoupe::facetAddressCall, FacetCut, FacetCutAction},
    types::{DeployedModule, DiamondModule},
};

/// Tracks which facet claimed each selector of a cut
#[derive(Default)]
pub struct SelectorOwners {
    /// The facet each claimed selector belongs to
    owners: HashMap<FixedBytes<4>, DiamondModule>,
}

impl SelectorOwners {
    /// Claim `selectors` for `module`, failing on the first one another facet holds
    pub fn claim(
        &mut self,
        module: DiamondModule,
        selectors: &BTreeSet<FixedBytes<4>>,
    ) -> Result<(), ScriptError> {
        if selectors.is_empty() {
            return Err(ScriptError::EmptyFacet(module));
        }

        for selector in selectors {
            if let Some(first) = self.owners.insert(*selector, module) {
                return Err(ScriptError::SelectorCollision {
                    selector: *selector,
                    first,
                    second: module,
                });
            }
        }

        Ok(())
    }
}

/// Check that the compiled facets of a cut expose disjoint, non-empty selector sets
pub fn check_selectors_disjoint(
    registry: &ModuleRegistry,
    facets: &[DiamondModule],
) -> Result<(), ScriptError> {
    let mut owners = SelectorOwners::default();
    for module in facets {
        let artifact = registry.artifact(*module)?;
        owners.claim(*module, &abi_selectors(&artifact.abi))?;
    }

    Ok(())
}

/// Build one `Add` record per facet, in input order.
///
/// Fails before anything is submitted if two facets expose the same selector,
/// or if a facet exposes none.
pub fn assemble(facets: &[DeployedModule]) -> Result<Vec<FacetCut>, ScriptError> {
    let mut owners = SelectorOwners::default();

    facets
        .iter()
        .map(|facet| {
            let selectors = selectors_of(facet);
            owners.claim(facet.module, &selectors)?;

            debug!(
                "{} at {:#x}: [{}]",
                facet.module,
                facet.address,
                selectors.iter().join(", ")
            );
            Ok(FacetCut {
                facetAddress: facet.address,
                action: FacetCutAction::Add,
                functionSelectors: selectors.into_iter().collect(),
            })
        })
        .collect()
}

/// Calldata for a cut that installs `cuts` and then calls `init_calldata` on `init`
pub fn diamond_cut_calldata(cuts: &[FacetCut], init: Address, init_calldata: Bytes) -> Bytes {
    diamondCutCall {
        _diamondCut: cuts.to_vec(),
        _init: init,
        _calldata: init_calldata,
    }
    .abi_encode()
    .into()
}

/// Install `cuts` into the proxy and run the initializer, in one transaction.
///
/// A mined transaction with a failure status is fatal: the proxy is left as it
/// was and the cut is not retried.
pub async fn execute_cut<C: ChainClient>(
    client: &C,
    proxy: Address,
    cuts: &[FacetCut],
    init: Address,
    init_calldata: Bytes,
) -> Result<TxOutcome, ScriptError> {
    let calldata = diamond_cut_calldata(cuts, init, init_calldata);

    info!("--- Diamond cutting {} facets into {:#x}", cuts.len(), proxy);
    let outcome = client.transact(proxy, calldata).await?;
    if !outcome.success {
        return Err(ScriptError::CutFailed {
            tx_hash: outcome.tx_hash,
        });
    }
    info!("--- Cut completed: {:#x}", proxy);

    Ok(outcome)
}

/// Check through the proxy's loupe that every cut selector routes to its facet
pub async fn verify_dispatch_table<C: ChainClient>(
    client: &C,
    proxy: Address,
    cuts: &[FacetCut],
) -> Result<(), ScriptError> {
    for cut in cuts {
        for selector in &cut.functionSelectors {
            let input = facetAddressCall {
                _functionSelector: *selector,
            }
            .abi_encode();
            let output = client.call(proxy, input.into()).await?;
            let actual = facetAddressCall::abi_decode_returns(&output, true)
                .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?
                .facetAddress_;

            if actual != cut.facetAddress {
                return Err(ScriptError::DispatchMismatch {
                    selector: *selector,
                    expected: cut.facetAddress,
                    actual,
                });
            }
        }
    }

    debug!(
        "Dispatch table holds all {} cut selectors",
        cuts.iter().map(|c| c.functionSelectors.len()).sum::<usize>()
    );
    Ok(())
}
