//! Deployment of a single module

use tracing::{debug, info};

use crate::{
    artifacts::ModuleRegistry,
    client::ChainClient,
    errors::ScriptError,
    ledger::AddressLedger,
    types::{BestEffort, DeployedModule, ModuleDescriptor},
};

/// Deploys modules from the registry, one confirmed transaction at a time
pub struct ContractDeployer<'a, C: ChainClient> {
    /// The client transactions are sent through
    client: &'a C,
    /// The compiled modules
    registry: &'a ModuleRegistry,
    /// The ledger deployments are recorded in, absent for test deployments
    ledger: Option<AddressLedger>,
}

impl<'a, C: ChainClient> ContractDeployer<'a, C> {
    /// Create a deployer, recording into `ledger` if one is given
    pub fn new(
        client: &'a C,
        registry: &'a ModuleRegistry,
        ledger: Option<AddressLedger>,
    ) -> Self {
        ContractDeployer {
            client,
            registry,
            ledger,
        }
    }

    /// The ledger deployments are recorded in
    pub fn ledger(&self) -> Option<&AddressLedger> {
        self.ledger.as_ref()
    }

    /// Deploy a module and wait until its code is installed on-chain
    pub async fn deploy(
        &self,
        descriptor: &ModuleDescriptor,
    ) -> Result<DeployedModule, ScriptError> {
        let module = descriptor.module;
        let artifact = self.registry.artifact(module)?;
        let constructor_args = artifact.encode_constructor_args(&descriptor.constructor_args)?;

        info!("Deploying {}", module);
        let outcome = self
            .client
            .deploy(artifact.init_code(&constructor_args))
            .await?;

        if !outcome.success {
            return Err(ScriptError::ContractDeployment(format!(
                "{} deployment reverted in {:#x}",
                module, outcome.tx_hash
            )));
        }
        let address = outcome.contract_address.ok_or_else(|| {
            ScriptError::ContractDeployment(format!(
                "{} deployment {:#x} created no contract",
                module, outcome.tx_hash
            ))
        })?;
        let confirmed_at_block = outcome.block_number.ok_or_else(|| {
            ScriptError::ContractDeployment(format!(
                "{} deployment {:#x} is not in a block",
                module, outcome.tx_hash
            ))
        })?;

        // A receipt alone does not prove the runtime code was installed
        let code = self.client.code_at(address).await?;
        if code.is_empty() {
            return Err(ScriptError::ContractDeployment(format!(
                "no code at {:#x} after deploying {}",
                address, module
            )));
        }

        info!("{} deployed at {:#x}", module, address);

        let recorded = match &self.ledger {
            Some(ledger) => ledger.record(address, module.contract_name()),
            None => BestEffort::Skipped,
        };
        debug!("Ledger entry for {}: {:?}", module, recorded);

        Ok(DeployedModule {
            module,
            address,
            confirmed_at_block,
            abi: artifact.abi.clone(),
            constructor_args: constructor_args.into(),
        })
    }
}
