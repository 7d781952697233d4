//! Definitions of Solidity functions called during deployment

use alloy_sol_types::sol;

sol! {
    #![sol(all_derives)]

    /// The diamond cut interface, per EIP-2535
    interface ICut {
        enum FacetCutAction {
            Add,
            Replace,
            Remove
        }

        struct FacetCut {
            address facetAddress;
            FacetCutAction action;
            bytes4[] functionSelectors;
        }

        function diamondCut(FacetCut[] calldata _diamondCut, address _init, bytes calldata _calldata) external;
    }

    /// The loupe lookup used to check the dispatch table
    interface ILoupe {
        function facetAddress(bytes4 _functionSelector) external view returns (address facetAddress_);
    }

    /// The initializer's entry point
    function init(
        address automationAgent,
        uint96 minimumDepositAmount,
        uint96 minimumFlowAmount,
        uint96 maxFlowDurationPerUnitFlowAmount,
        uint256 minimumContractReserveBalance,
        uint256 emergencyBufferDurationSeconds,
        address[] trackedAssets
    ) external;
}

pub use ICut::{FacetCut, FacetCutAction};
