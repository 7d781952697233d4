//! Implementations of the various deploy scripts

use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use alloy::dyn_abi::DynSolValue;
use alloy_primitives::{hex, Address, TxHash};
use tracing::info;

use crate::{
    artifacts::ModuleRegistry,
    cli::{DeployDiamondArgs, VerifyArgs},
    client::{setup_client, ChainClient},
    config::NetworkConfigs,
    constants::FALLBACK_TEST_CHAIN_ID,
    cut::{assemble, check_selectors_disjoint, execute_cut, verify_dispatch_table},
    deployer::ContractDeployer,
    errors::ScriptError,
    init::{InitParameters, Regime},
    ledger::{run_timestamp, AddressLedger},
    solidity::FacetCut,
    types::{DeployedModule, DiamondModule, ModuleDescriptor, CUT_FACETS, DEPLOY_ORDER},
    verify::{verify_contract, VerificationRequest},
};

/// Everything a single run needs besides the chain client
pub struct DeployContext<'a> {
    /// The compiled modules
    pub registry: &'a ModuleRegistry,
    /// The constants of every supported network
    pub networks: &'a NetworkConfigs,
    /// The directory ledger files are written to
    pub addresses_dir: &'a Path,
    /// The run's timestamp, keying its ledger file
    pub run_timestamp: u128,
}

/// A deployed, cut, and initialized diamond
#[derive(Clone, Debug)]
pub struct DiamondDeployment {
    /// The proxy, now routing to every cut facet
    pub proxy: DeployedModule,
    /// Every module deployed in the run, in deployment order
    pub modules: Vec<DeployedModule>,
    /// The records installed by the cut, in cut order
    pub cuts: Vec<FacetCut>,
    /// The hash of the cut transaction
    pub cut_tx: TxHash,
    /// The ledger file of the run, absent for test deployments
    pub ledger_path: Option<PathBuf>,
}

impl DiamondDeployment {
    /// The deployment of the given module
    pub fn module(&self, module: DiamondModule) -> Option<&DeployedModule> {
        self.modules.iter().find(|deployed| deployed.module == module)
    }
}

/// The descriptor for `module`, filling constructor arguments from earlier deployments
fn descriptor_for(
    module: DiamondModule,
    owner: Address,
    deployed: &BTreeMap<DiamondModule, DeployedModule>,
) -> Result<ModuleDescriptor, ScriptError> {
    match module {
        DiamondModule::Diamond => {
            let cut = deployed.get(&DiamondModule::Cut).ok_or_else(|| {
                ScriptError::ContractDeployment("the cut facet must precede the diamond".into())
            })?;
            Ok(ModuleDescriptor::with_args(
                module,
                vec![DynSolValue::Address(owner), DynSolValue::Address(cut.address)],
            ))
        }
        _ => Ok(ModuleDescriptor::new(module)),
    }
}

/// Deploy every module, cut the facets into the proxy, and run the initializer.
///
/// Deployments are sequential and each is confirmed before the next is sent.
/// Configuration and selector checks run before the first transaction.
pub async fn deploy_diamond<C: ChainClient>(
    client: &C,
    ctx: &DeployContext<'_>,
    regime: Regime,
) -> Result<DiamondDeployment, ScriptError> {
    let chain_id = client.chain_id();
    info!("On chain {}", chain_id);

    let network = match regime {
        Regime::Production => ctx.networks.resolve(chain_id)?,
        Regime::Test => ctx.networks.resolve_or(chain_id, FALLBACK_TEST_CHAIN_ID)?,
    };
    let init_params = InitParameters::for_regime(regime, &network)?;
    check_selectors_disjoint(ctx.registry, &CUT_FACETS)?;

    let ledger = (!regime.is_test())
        .then(|| AddressLedger::new(ctx.addresses_dir, &network.name, ctx.run_timestamp));
    let deployer = ContractDeployer::new(client, ctx.registry, ledger);

    // --- Deploy modules --- //

    let mut deployed = BTreeMap::new();
    let mut modules = Vec::with_capacity(DEPLOY_ORDER.len());
    for module in DEPLOY_ORDER {
        let descriptor = descriptor_for(module, client.deployer(), &deployed)?;
        let deployed_module = deployer.deploy(&descriptor).await?;
        deployed.insert(module, deployed_module.clone());
        modules.push(deployed_module);
    }

    let take = |module: DiamondModule| {
        deployed.get(&module).cloned().ok_or_else(|| {
            ScriptError::ContractDeployment(format!("{module} was not deployed"))
        })
    };

    // --- Prepare facet cuts --- //

    let facets = CUT_FACETS
        .iter()
        .map(|module| take(*module))
        .collect::<Result<Vec<_>, _>>()?;
    let cuts = assemble(&facets)?;

    // --- Cut diamond --- //

    let proxy = take(DiamondModule::Diamond)?;
    let initializer = take(DiamondModule::DiamondInit)?;
    let outcome = execute_cut(
        client,
        proxy.address,
        &cuts,
        initializer.address,
        init_params.calldata(),
    )
    .await?;
    verify_dispatch_table(client, proxy.address, &cuts).await?;

    Ok(DiamondDeployment {
        proxy,
        modules,
        cuts,
        cut_tx: outcome.tx_hash,
        ledger_path: deployer.ledger().map(|ledger| ledger.path().to_path_buf()),
    })
}

/// Run the deploy script against the configured RPC endpoint
pub async fn deploy(
    args: DeployDiamondArgs,
    priv_key: &str,
    rpc_url: &str,
    artifacts_dir: &Path,
    networks_path: &Path,
    addresses_dir: &Path,
) -> Result<(), ScriptError> {
    // Captured before anything else so a run keeps one ledger file
    let run_timestamp = run_timestamp();

    let networks = NetworkConfigs::from_file(networks_path)?;
    let registry = ModuleRegistry::load(artifacts_dir)?;
    let client = setup_client(priv_key, rpc_url).await?;

    let ctx = DeployContext {
        registry: &registry,
        networks: &networks,
        addresses_dir,
        run_timestamp,
    };
    let deployment = deploy_diamond(&client, &ctx, Regime::from_test_flag(args.test)).await?;

    info!("Diamond deployed at {:#x}", deployment.proxy.address);
    if let Some(path) = &deployment.ledger_path {
        info!("Addresses recorded in {}", path.display());
    }

    if args.verify {
        for deployed in &deployment.modules {
            if let Some(request) = VerificationRequest::for_deployed(
                client.chain_id(),
                deployed,
                &registry,
                args.etherscan_api_key.clone(),
            ) {
                verify_contract(&request);
            }
        }
    }

    Ok(())
}

/// Verify the source of a single deployed module
pub fn verify(args: VerifyArgs, artifacts_dir: &Path) -> Result<(), ScriptError> {
    let registry = ModuleRegistry::load(artifacts_dir)?;
    let artifact = registry.artifact(args.module)?;

    let constructor_args = match &args.constructor_args {
        Some(args) => {
            hex::decode(args).map_err(|e| ScriptError::CalldataConstruction(e.to_string()))?
        }
        None => vec![],
    };

    let request = VerificationRequest {
        chain_id: args.chain_id,
        address: args.address,
        contract_path: artifact.verification_path(),
        constructor_args,
        api_key: args.etherscan_api_key,
        compiler: artifact.compiler.clone(),
        root: registry.project_root().map(Path::to_path_buf),
    };
    verify_contract(&request);

    Ok(())
}
