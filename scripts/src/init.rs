//! Parameters of the diamond's one-shot initializer

use alloy_primitives::{aliases::U96, utils::parse_ether, Address, Bytes, U256};
use alloy_sol_types::SolCall;
use tracing::warn;

use crate::{
    config::NetworkConfig,
    constants::{
        PROD_EMERGENCY_BUFFER_DURATION_SECONDS, PROD_MAX_FLOW_DURATION_PER_UNIT_FLOW_AMOUNT,
        PROD_MINIMUM_CONTRACT_RESERVE_ETHER, PROD_MINIMUM_DEPOSIT_ETHER, PROD_MINIMUM_FLOW_ETHER,
        TEST_EMERGENCY_BUFFER_DURATION_SECONDS, TEST_MAX_FLOW_DURATION_PER_UNIT_FLOW_AMOUNT,
        TEST_MINIMUM_CONTRACT_RESERVE_ETHER, TEST_MINIMUM_DEPOSIT_ETHER, TEST_MINIMUM_FLOW_ETHER,
    },
    errors::ScriptError,
    solidity::initCall,
};

/// Which set of values the initializer is called with
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Regime {
    /// Values for a live deployment
    Production,
    /// Values for test deployments, which are not recorded in the ledger
    Test,
}

impl Regime {
    /// The regime selected by the `--test` flag
    pub fn from_test_flag(is_test: bool) -> Self {
        if is_test {
            Regime::Test
        } else {
            Regime::Production
        }
    }

    /// Whether this is the test regime
    pub fn is_test(&self) -> bool {
        matches!(self, Regime::Test)
    }
}

/// The arguments of the initializer's `init` entry point
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InitParameters {
    /// The automation agent allowed to trigger scheduled work
    pub automation_agent: Address,
    /// The minimum deposit a user may make
    pub minimum_deposit_amount: U96,
    /// The minimum amount flowable per unit of flow duration
    pub minimum_flow_amount: U96,
    /// The maximum flow duration per unit flow amount, in seconds
    pub max_flow_duration_per_unit_flow_amount: U96,
    /// The minimum balance the contract keeps with the automation network
    pub minimum_contract_reserve_balance: U256,
    /// How long the contract may run on its emergency buffer, in seconds
    pub emergency_buffer_duration_seconds: U256,
    /// The assets the diamond tracks
    pub tracked_assets: Vec<Address>,
}

/// Parse an ether amount that must fit in a `uint96`
fn ether_u96(amount: &str) -> Result<U96, ScriptError> {
    let wei = parse_ether(amount).map_err(|e| ScriptError::CalldataConstruction(e.to_string()))?;
    u128::try_from(wei)
        .ok()
        .and_then(|wei| U96::try_from(wei).ok())
        .ok_or_else(|| {
            ScriptError::CalldataConstruction(format!("{amount} ether overflows uint96"))
        })
}

/// Parse an ether amount as a `uint256`
fn ether_u256(amount: &str) -> Result<U256, ScriptError> {
    parse_ether(amount).map_err(|e| ScriptError::CalldataConstruction(e.to_string()))
}

impl InitParameters {
    /// The parameters for the given regime on the given network
    pub fn for_regime(regime: Regime, network: &NetworkConfig) -> Result<Self, ScriptError> {
        match regime {
            Regime::Production => Self::production(network),
            Regime::Test => Self::test(network),
        }
    }

    /// The parameters of a live deployment
    pub fn production(network: &NetworkConfig) -> Result<Self, ScriptError> {
        Ok(InitParameters {
            automation_agent: network.automation_agent,
            minimum_deposit_amount: ether_u96(PROD_MINIMUM_DEPOSIT_ETHER)?,
            minimum_flow_amount: ether_u96(PROD_MINIMUM_FLOW_ETHER)?,
            max_flow_duration_per_unit_flow_amount: U96::from(
                PROD_MAX_FLOW_DURATION_PER_UNIT_FLOW_AMOUNT,
            ),
            minimum_contract_reserve_balance: ether_u256(PROD_MINIMUM_CONTRACT_RESERVE_ETHER)?,
            emergency_buffer_duration_seconds: U256::from(PROD_EMERGENCY_BUFFER_DURATION_SECONDS),
            tracked_assets: network.tracked_assets.clone(),
        })
    }

    /// The parameters of a test deployment
    pub fn test(network: &NetworkConfig) -> Result<Self, ScriptError> {
        warn!("|| THIS DEPLOYMENT IS USING TEST PARAMETERS TO INITIALIZE THE DIAMOND ||");

        Ok(InitParameters {
            automation_agent: network.automation_agent,
            minimum_deposit_amount: ether_u96(TEST_MINIMUM_DEPOSIT_ETHER)?,
            minimum_flow_amount: ether_u96(TEST_MINIMUM_FLOW_ETHER)?,
            max_flow_duration_per_unit_flow_amount: U96::from(
                TEST_MAX_FLOW_DURATION_PER_UNIT_FLOW_AMOUNT,
            ),
            minimum_contract_reserve_balance: ether_u256(TEST_MINIMUM_CONTRACT_RESERVE_ETHER)?,
            emergency_buffer_duration_seconds: U256::from(TEST_EMERGENCY_BUFFER_DURATION_SECONDS),
            tracked_assets: network.tracked_assets.clone(),
        })
    }

    /// The `init` call carrying these parameters
    pub fn to_call(&self) -> initCall {
        initCall {
            automationAgent: self.automation_agent,
            minimumDepositAmount: self.minimum_deposit_amount,
            minimumFlowAmount: self.minimum_flow_amount,
            maxFlowDurationPerUnitFlowAmount: self.max_flow_duration_per_unit_flow_amount,
            minimumContractReserveBalance: self.minimum_contract_reserve_balance,
            emergencyBufferDurationSeconds: self.emergency_buffer_duration_seconds,
            trackedAssets: self.tracked_assets.clone(),
        }
    }

    /// Prepare calldata for the initializer's `init` method
    pub fn calldata(&self) -> Bytes {
        self.to_call().abi_encode().into()
    }
}
