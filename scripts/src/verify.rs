//! Best-effort source verification of deployed modules on a block explorer

use std::{
    path::PathBuf,
    process::{Command, Stdio},
};

use alloy_primitives::Address;
use tracing::{info, warn};

use crate::{
    artifacts::{CompilerSettings, ModuleRegistry},
    constants::{FORGE_COMMAND, VERIFY_CONTRACT_COMMAND},
    types::{BestEffort, DeployedModule},
};

/// What a block explorer needs to match a deployment against its source
#[derive(Clone, Debug)]
pub struct VerificationRequest {
    /// The chain the contract lives on
    pub chain_id: u64,
    /// The deployed address
    pub address: Address,
    /// The contract identifier, `<path>:<name>` or just `<name>`
    pub contract_path: String,
    /// The ABI-encoded constructor arguments
    pub constructor_args: Vec<u8>,
    /// The explorer API key, if not taken from the environment
    pub api_key: Option<String>,
    /// The compiler configuration of the original build
    pub compiler: Option<CompilerSettings>,
    /// The root of the project the contract was compiled in
    pub root: Option<PathBuf>,
}

impl VerificationRequest {
    /// The request for a module deployed in this run
    pub fn for_deployed(
        chain_id: u64,
        deployed: &DeployedModule,
        registry: &ModuleRegistry,
        api_key: Option<String>,
    ) -> Option<Self> {
        let artifact = registry.artifact(deployed.module).ok()?;
        Some(VerificationRequest {
            chain_id,
            address: deployed.address,
            contract_path: artifact.verification_path(),
            constructor_args: deployed.constructor_args.to_vec(),
            api_key,
            compiler: artifact.compiler.clone(),
            root: registry.project_root().map(|root| root.to_path_buf()),
        })
    }

    /// The `forge verify-contract` invocation for this request
    pub fn command(&self) -> Command {
        let mut cmd = Command::new(FORGE_COMMAND);
        cmd.stdout(Stdio::inherit()).stderr(Stdio::inherit());
        cmd.arg(VERIFY_CONTRACT_COMMAND);
        cmd.arg("--chain");
        cmd.arg(self.chain_id.to_string());
        if !self.constructor_args.is_empty() {
            cmd.arg("--constructor-args");
            cmd.arg(format!("0x{}", hex::encode(&self.constructor_args)));
        }
        if let Some(compiler) = &self.compiler {
            cmd.arg("--compiler-version");
            cmd.arg(&compiler.version);
            if let Some(runs) = compiler.optimizer_runs {
                cmd.arg("--num-of-optimizations");
                cmd.arg(runs.to_string());
            }
        }
        if let Some(root) = &self.root {
            cmd.arg("--root");
            cmd.arg(root);
        }
        if let Some(api_key) = &self.api_key {
            cmd.arg("--etherscan-api-key");
            cmd.arg(api_key);
        }
        cmd.arg(format!("{:#x}", self.address));
        cmd.arg(&self.contract_path);

        cmd
    }
}

/// Submit a verification request, logging rather than returning any failure
pub fn verify_contract(request: &VerificationRequest) -> BestEffort {
    info!(
        "Verifying {} at {:#x}",
        request.contract_path, request.address
    );

    let outcome = match request.command().status() {
        Ok(status) if status.success() => BestEffort::Recorded,
        Ok(status) => BestEffort::Failed(format!("{FORGE_COMMAND} exited with {status}")),
        Err(e) => BestEffort::Failed(e.to_string()),
    };

    if let BestEffort::Failed(reason) = &outcome {
        warn!(
            "Verification of {} at {:#x} failed: {}",
            request.contract_path, request.address, reason
        );
    }
    outcome
}
