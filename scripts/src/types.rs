//! Type definitions used throughout the scripts

use std::{
    fmt::{self, Display},
    sync::Arc,
};

use alloy::{
    dyn_abi::{DynSolType, DynSolValue},
    json_abi::JsonAbi,
};
use alloy_primitives::{Address, Bytes};
use clap::ValueEnum;

/// The possible modules to deploy
#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DiamondModule {
    /// The loupe facet, introspecting the dispatch table
    Loupe,
    /// The cut facet, mutating the dispatch table
    Cut,
    /// The access control facet
    AccessControl,
    /// The utility facet
    Utility,
    /// The automation facet
    Automate,
    /// The flow setup facet
    FlowSetup,
    /// The flow facet
    Flow,
    /// The diamond proxy
    Diamond,
    /// The diamond initializer
    DiamondInit,
}

/// The order in which the modules of a diamond are deployed
pub const DEPLOY_ORDER: [DiamondModule; 9] = [
    DiamondModule::Loupe,
    DiamondModule::Cut,
    DiamondModule::AccessControl,
    DiamondModule::Utility,
    DiamondModule::Automate,
    DiamondModule::FlowSetup,
    DiamondModule::Flow,
    DiamondModule::Diamond,
    DiamondModule::DiamondInit,
];

/// The facets installed by the diamond cut, in cut order.
///
/// `Cut` is absent: the proxy registers it in its constructor.
pub const CUT_FACETS: [DiamondModule; 6] = [
    DiamondModule::Loupe,
    DiamondModule::AccessControl,
    DiamondModule::Utility,
    DiamondModule::Automate,
    DiamondModule::FlowSetup,
    DiamondModule::Flow,
];

impl DiamondModule {
    /// The contract name, as it appears in compiled artifacts and in the ledger
    pub fn contract_name(&self) -> &'static str {
        match self {
            DiamondModule::Loupe => "Loupe",
            DiamondModule::Cut => "Cut",
            DiamondModule::AccessControl => "AccessControl",
            DiamondModule::Utility => "Utility",
            DiamondModule::Automate => "Automate",
            DiamondModule::FlowSetup => "FlowSetup",
            DiamondModule::Flow => "Flow",
            DiamondModule::Diamond => "Diamond",
            DiamondModule::DiamondInit => "DiamondInit",
        }
    }

    /// The types of the module's constructor arguments
    pub fn constructor_shape(&self) -> Vec<DynSolType> {
        match self {
            // (address contractOwner, address diamondCutFacet)
            DiamondModule::Diamond => vec![DynSolType::Address, DynSolType::Address],
            _ => vec![],
        }
    }
}

impl Display for DiamondModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.contract_name())
    }
}

/// A module to deploy, with the arguments to construct it with
#[derive(Clone, Debug)]
pub struct ModuleDescriptor {
    /// Which module to deploy
    pub module: DiamondModule,
    /// The constructor arguments, in declaration order
    pub constructor_args: Vec<DynSolValue>,
}

impl ModuleDescriptor {
    /// A module whose constructor takes no arguments
    pub fn new(module: DiamondModule) -> Self {
        ModuleDescriptor {
            module,
            constructor_args: vec![],
        }
    }

    /// A module constructed with the given arguments
    pub fn with_args(module: DiamondModule, constructor_args: Vec<DynSolValue>) -> Self {
        ModuleDescriptor {
            module,
            constructor_args,
        }
    }
}

/// A module that has been deployed and whose code is confirmed on-chain
#[derive(Clone, Debug)]
pub struct DeployedModule {
    /// Which module this is
    pub module: DiamondModule,
    /// The address the module was deployed to
    pub address: Address,
    /// The block in which the deployment was confirmed
    pub confirmed_at_block: u64,
    /// The module's interface
    pub abi: Arc<JsonAbi>,
    /// The ABI-encoded constructor arguments the module was deployed with
    pub constructor_args: Bytes,
}

/// The outcome of a side effect whose failure must not abort the run
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BestEffort {
    /// The side effect completed
    Recorded,
    /// The side effect was skipped on purpose
    Skipped,
    /// The side effect failed, with the reason
    Failed(String),
}

impl BestEffort {
    /// Whether the side effect failed
    pub fn is_failed(&self) -> bool {
        matches!(self, BestEffort::Failed(_))
    }
}
