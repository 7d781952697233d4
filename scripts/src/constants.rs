//! Constants used in the deploy scripts

/// The number of confirmations to wait for on each deployment and cut transaction
pub const NUM_DEPLOY_CONFIRMATIONS: u64 = 1;

/// The default directory containing compiled contract artifacts
pub const DEFAULT_ARTIFACTS_DIR: &str = "artifacts";

/// The directory under the artifacts dir holding Hardhat build info, never a contract artifact
pub const BUILD_INFO_DIR: &str = "build-info";

/// The suffix of Hardhat debug artifacts, which carry no ABI
pub const DEBUG_ARTIFACT_SUFFIX: &str = ".dbg.json";

/// The optimizer runs solc assumes when a build enables the optimizer without setting them
pub const DEFAULT_OPTIMIZER_RUNS: u64 = 200;

/// The extension of a compiled contract artifact
pub const ARTIFACT_EXTENSION: &str = "json";

/// The default path of the network configuration file
pub const DEFAULT_NETWORKS_PATH: &str = "networks.json";

/// The default directory the address ledger is written to
pub const DEFAULT_ADDRESSES_DIR: &str = "addresses";

/// The extension of an address ledger file
pub const LEDGER_EXTENSION: &str = "txt";

/// The chain whose network entry backs the test regime when the
/// target chain has none (Polygon Mumbai)
pub const FALLBACK_TEST_CHAIN_ID: u64 = 80001;

/// Function signatures which are never routed through the diamond.
///
/// `supportsInterface` is served by the loupe's storage-backed lookup and
/// `init` belongs to initializer contracts.
pub const RESERVED_SIGNATURES: [&str; 2] = ["supportsInterface(bytes4)", "init(bytes)"];

// --- Production init parameters --- //

/// Minimum deposit amount, in ether
pub const PROD_MINIMUM_DEPOSIT_ETHER: &str = "1";

/// Minimum amount flowable per unit of flow duration, in ether
pub const PROD_MINIMUM_FLOW_ETHER: &str = "1";

/// Maximum flow duration per unit flow amount, in seconds (30 days)
pub const PROD_MAX_FLOW_DURATION_PER_UNIT_FLOW_AMOUNT: u64 = 2_592_000;

/// Minimum balance the contract keeps with the automation network, in ether
pub const PROD_MINIMUM_CONTRACT_RESERVE_ETHER: &str = "1";

/// How long the contract may run on its emergency buffer, in seconds
pub const PROD_EMERGENCY_BUFFER_DURATION_SECONDS: u64 = 60;

// --- Test init parameters --- //

/// Minimum deposit amount used by the test regime, in ether
pub const TEST_MINIMUM_DEPOSIT_ETHER: &str = "1";

/// Minimum flow amount used by the test regime, in ether
pub const TEST_MINIMUM_FLOW_ETHER: &str = "2";

/// Maximum flow duration per unit flow amount used by the test regime, in seconds
pub const TEST_MAX_FLOW_DURATION_PER_UNIT_FLOW_AMOUNT: u64 = 4_092_000;

/// Minimum contract reserve balance used by the test regime, in ether
pub const TEST_MINIMUM_CONTRACT_RESERVE_ETHER: &str = "0.5";

/// Emergency buffer duration used by the test regime, in seconds
pub const TEST_EMERGENCY_BUFFER_DURATION_SECONDS: u64 = 3600;

// --- Verification --- //

/// The name of the Foundry command
pub const FORGE_COMMAND: &str = "forge";

/// The name of the verification subcommand
pub const VERIFY_CONTRACT_COMMAND: &str = "verify-contract";

/// The environment variable holding the block explorer API key
pub const ETHERSCAN_API_KEY_ENV_VAR: &str = "ETHERSCAN_API_KEY";
