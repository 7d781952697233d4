//! Loading and validation of compiled contract artifacts.
//!
//! Every module the deploy scripts know about is resolved to its artifact once,
//! before any transaction is sent, so that a missing or mismatched artifact
//! fails the run up front rather than halfway through a deployment.

use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

use alloy::{
    dyn_abi::{DynSolType, DynSolValue, Specifier},
    json_abi::JsonAbi,
};
use alloy_primitives::{hex, Bytes};
use itertools::Itertools;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::{
    constants::{
        ARTIFACT_EXTENSION, BUILD_INFO_DIR, DEBUG_ARTIFACT_SUFFIX, DEFAULT_OPTIMIZER_RUNS,
    },
    errors::ScriptError,
    types::{DiamondModule, DEPLOY_ORDER},
};

/// The bytecode field of an artifact, which Hardhat stores as a string and
/// Foundry as an object
#[derive(Deserialize)]
#[serde(untagged)]
enum RawBytecode {
    /// Hardhat layout
    Hex(String),
    /// Foundry layout
    Object {
        /// The hex-encoded creation code
        object: String,
    },
}

/// An artifact as it is laid out on disk
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawArtifact {
    /// The path of the source file, present in Hardhat artifacts
    #[serde(default)]
    source_name: Option<String>,
    /// The contract ABI
    abi: JsonAbi,
    /// The contract creation code
    bytecode: RawBytecode,
}

/// A Hardhat debug artifact, pointing at the build that produced its sibling
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDebugArtifact {
    /// Path of the build-info file, relative to the debug artifact
    build_info: String,
}

/// The fields of a Hardhat build-info file needed to reproduce the build
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawBuildInfo {
    /// The full compiler version, e.g. `0.8.19+commit.7dd6d404`
    solc_long_version: String,
    /// The standard JSON input given to the compiler
    input: RawCompilerInput,
}

/// The standard JSON compiler input
#[derive(Deserialize)]
struct RawCompilerInput {
    /// The compiler settings
    settings: RawCompilerSettings,
}

/// The compiler settings of a standard JSON input
#[derive(Deserialize)]
struct RawCompilerSettings {
    /// The optimizer configuration, absent when left at its defaults
    #[serde(default)]
    optimizer: RawOptimizer,
}

/// The optimizer configuration of a build
#[derive(Default, Deserialize)]
struct RawOptimizer {
    /// Whether the optimizer ran
    #[serde(default)]
    enabled: bool,
    /// The number of optimizer runs
    runs: Option<u64>,
}

/// The compiler configuration a module was built with, as a block explorer
/// needs it to reproduce the bytecode
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompilerSettings {
    /// The full compiler version
    pub version: String,
    /// The optimizer runs, if the optimizer was enabled
    pub optimizer_runs: Option<u64>,
}

/// A compiled module, ready to be deployed
#[derive(Clone, Debug)]
pub struct ContractArtifact {
    /// The module this artifact compiles
    pub module: DiamondModule,
    /// The module's interface
    pub abi: Arc<JsonAbi>,
    /// The module's creation code, without constructor arguments
    pub bytecode: Bytes,
    /// The path of the module's source file, if the artifact records it
    pub source_name: Option<String>,
    /// The compiler configuration, when a build-info file is found for the artifact
    pub compiler: Option<CompilerSettings>,
}

impl ContractArtifact {
    /// Parse and validate the artifact for `module` from its JSON contents
    pub fn from_json(module: DiamondModule, json: &str) -> Result<Self, ScriptError> {
        let raw: RawArtifact = serde_json::from_str(json)
            .map_err(|e| ScriptError::ArtifactParsing(format!("{module}: {e}")))?;

        let bytecode_hex = match raw.bytecode {
            RawBytecode::Hex(s) => s,
            RawBytecode::Object { object } => object,
        };
        let bytecode = hex::decode(bytecode_hex.trim())
            .map_err(|e| ScriptError::ArtifactParsing(format!("{module} bytecode: {e}")))?;
        if bytecode.is_empty() {
            return Err(ScriptError::ArtifactParsing(format!(
                "{module} has no creation code, is it abstract?"
            )));
        }

        let artifact = ContractArtifact {
            module,
            abi: Arc::new(raw.abi),
            bytecode: bytecode.into(),
            source_name: raw.source_name,
            compiler: None,
        };
        artifact.check_constructor_shape()?;

        Ok(artifact)
    }

    /// The types of the constructor arguments declared in the ABI
    fn abi_constructor_types(&self) -> Result<Vec<DynSolType>, ScriptError> {
        let Some(constructor) = &self.abi.constructor else {
            return Ok(vec![]);
        };

        constructor
            .inputs
            .iter()
            .map(|param| {
                param
                    .resolve()
                    .map_err(|e| ScriptError::ArtifactParsing(format!("{}: {e}", self.module)))
            })
            .collect()
    }

    /// Ensure the ABI's constructor matches the shape the registry declares
    fn check_constructor_shape(&self) -> Result<(), ScriptError> {
        let declared = self.module.constructor_shape();
        let actual = self.abi_constructor_types()?;
        if declared != actual {
            return Err(ScriptError::ArtifactParsing(format!(
                "{} constructor takes ({}), expected ({})",
                self.module,
                actual.iter().map(DynSolType::sol_type_name).join(", "),
                declared.iter().map(DynSolType::sol_type_name).join(", "),
            )));
        }

        Ok(())
    }

    /// ABI-encode constructor arguments after type-checking them against the
    /// module's constructor shape
    pub fn encode_constructor_args(&self, args: &[DynSolValue]) -> Result<Vec<u8>, ScriptError> {
        let shape = self.module.constructor_shape();
        if shape.len() != args.len() {
            return Err(ScriptError::CalldataConstruction(format!(
                "{} takes {} constructor arguments, got {}",
                self.module,
                shape.len(),
                args.len()
            )));
        }
        if let Some((i, (ty, _))) = shape
            .iter()
            .zip(args)
            .enumerate()
            .find(|(_, (ty, value))| !ty.matches(value))
        {
            return Err(ScriptError::CalldataConstruction(format!(
                "{} constructor argument {i} is not a {}",
                self.module,
                ty.sol_type_name()
            )));
        }

        if args.is_empty() {
            return Ok(vec![]);
        }
        Ok(DynSolValue::Tuple(args.to_vec()).abi_encode_params())
    }

    /// The creation code with already-encoded constructor arguments appended
    pub fn init_code(&self, encoded_args: &[u8]) -> Bytes {
        [self.bytecode.as_ref(), encoded_args].concat().into()
    }

    /// The contract identifier block explorers expect, `<path>:<name>` when the
    /// source path is known
    pub fn verification_path(&self) -> String {
        match &self.source_name {
            Some(source) => format!("{}:{}", source, self.module.contract_name()),
            None => self.module.contract_name().to_string(),
        }
    }
}

/// Recursively collect every artifact file named `<contract_name>.json` under `dir`
fn find_artifact_files(
    dir: &Path,
    contract_name: &str,
    found: &mut Vec<PathBuf>,
) -> Result<(), ScriptError> {
    let entries = fs::read_dir(dir)
        .map_err(|e| ScriptError::ArtifactParsing(format!("reading {}: {}", dir.display(), e)))?;

    for entry in entries {
        let path = entry
            .map_err(|e| ScriptError::ArtifactParsing(e.to_string()))?
            .path();

        if path.is_dir() {
            if path.file_name().is_some_and(|name| name == BUILD_INFO_DIR) {
                continue;
            }
            find_artifact_files(&path, contract_name, found)?;
            continue;
        }

        let is_debug = path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.ends_with(DEBUG_ARTIFACT_SUFFIX));
        let is_match = path.file_stem().is_some_and(|stem| stem == contract_name)
            && path.extension().is_some_and(|ext| ext == ARTIFACT_EXTENSION);
        if is_match && !is_debug {
            found.push(path);
        }
    }

    Ok(())
}

/// Read the compiler settings of the build that produced the artifact at
/// `artifact_path`, through its sibling debug artifact
fn read_compiler_settings(
    artifact_path: &Path,
    contract_name: &str,
) -> Result<Option<CompilerSettings>, ScriptError> {
    let debug_path =
        artifact_path.with_file_name(format!("{contract_name}{DEBUG_ARTIFACT_SUFFIX}"));
    if !debug_path.is_file() {
        return Ok(None);
    }

    let read = |path: &Path| {
        fs::read_to_string(path).map_err(|e| {
            ScriptError::ArtifactParsing(format!("reading {}: {}", path.display(), e))
        })
    };

    let debug: RawDebugArtifact = serde_json::from_str(&read(&debug_path)?)
        .map_err(|e| ScriptError::ArtifactParsing(format!("{}: {e}", debug_path.display())))?;
    let build_info_path = debug_path
        .parent()
        .unwrap_or_else(|| Path::new(""))
        .join(debug.build_info);
    let build_info: RawBuildInfo =
        serde_json::from_str(&read(&build_info_path)?).map_err(|e| {
            ScriptError::ArtifactParsing(format!("{}: {e}", build_info_path.display()))
        })?;

    let optimizer = build_info.input.settings.optimizer;
    Ok(Some(CompilerSettings {
        version: build_info.solc_long_version,
        optimizer_runs: optimizer
            .enabled
            .then_some(optimizer.runs.unwrap_or(DEFAULT_OPTIMIZER_RUNS)),
    }))
}

/// Locate the unique artifact for `module` under `dir`
fn locate_artifact(dir: &Path, module: DiamondModule) -> Result<PathBuf, ScriptError> {
    let mut found = Vec::new();
    find_artifact_files(dir, module.contract_name(), &mut found)?;

    match found.len() {
        0 => Err(ScriptError::ArtifactParsing(format!(
            "no artifact for {} under {}",
            module,
            dir.display()
        ))),
        1 => Ok(found.remove(0)),
        _ => Err(ScriptError::ArtifactParsing(format!(
            "ambiguous artifacts for {}: {}",
            module,
            found.iter().map(|p| p.display()).join(", ")
        ))),
    }
}

/// The compiled artifact of every deployable module
#[derive(Clone, Debug)]
pub struct ModuleRegistry {
    /// Artifacts keyed by module
    artifacts: BTreeMap<DiamondModule, ContractArtifact>,
    /// The project the artifacts were compiled from, the artifact directory's parent
    project_root: Option<PathBuf>,
}

impl ModuleRegistry {
    /// Load and validate the artifact of every module from `dir`
    pub fn load(dir: &Path) -> Result<Self, ScriptError> {
        let mut artifacts = BTreeMap::new();
        for module in DEPLOY_ORDER {
            let path = locate_artifact(dir, module)?;
            debug!("Loading {} from {}", module, path.display());

            let json = fs::read_to_string(&path).map_err(|e| {
                ScriptError::ArtifactParsing(format!("reading {}: {}", path.display(), e))
            })?;
            let mut artifact = ContractArtifact::from_json(module, &json)?;

            // A broken build-info only drops the compiler flags from verification
            artifact.compiler = read_compiler_settings(&path, module.contract_name())
                .unwrap_or_else(|e| {
                    warn!("No compiler settings for {}: {}", module, e);
                    None
                });
            artifacts.insert(module, artifact);
        }

        let project_root = dir
            .parent()
            .filter(|root| !root.as_os_str().is_empty())
            .map(Path::to_path_buf);
        Ok(ModuleRegistry {
            artifacts,
            project_root,
        })
    }

    /// The root of the project the artifacts were compiled from, if known
    pub fn project_root(&self) -> Option<&Path> {
        self.project_root.as_deref()
    }

    /// The artifact for the given module
    pub fn artifact(&self, module: DiamondModule) -> Result<&ContractArtifact, ScriptError> {
        self.artifacts.get(&module).ok_or_else(|| {
            ScriptError::ArtifactParsing(format!("{module} is not in the registry"))
        })
    }
}

#[cfg(test)]
mod tests {
    use alloy_primitives::Address;

    use super::*;

    const FACET_ARTIFACT: &str = r#"{
        "contractName": "Utility",
        "sourceName": "contracts/bounty_diamond/facets/core/Utility.sol",
        "abi": [
            { "type": "function", "name": "ping", "inputs": [], "outputs": [], "stateMutability": "view" }
        ],
        "bytecode": "0x6080604052"
    }"#;

    const DIAMOND_ARTIFACT: &str = r#"{
        "abi": [
            {
                "type": "constructor",
                "inputs": [
                    { "name": "_contractOwner", "type": "address", "internalType": "address" },
                    { "name": "_diamondCutFacet", "type": "address", "internalType": "address" }
                ],
                "stateMutability": "payable"
            }
        ],
        "bytecode": { "object": "0x6080604052" }
    }"#;

    #[test]
    fn test_parse_hardhat_artifact() {
        let artifact = ContractArtifact::from_json(DiamondModule::Utility, FACET_ARTIFACT).unwrap();

        assert_eq!(artifact.bytecode.len(), 5);
        assert_eq!(
            artifact.verification_path(),
            "contracts/bounty_diamond/facets/core/Utility.sol:Utility"
        );
    }

    #[test]
    fn test_parse_foundry_artifact() {
        let artifact =
            ContractArtifact::from_json(DiamondModule::Diamond, DIAMOND_ARTIFACT).unwrap();
        assert_eq!(artifact.verification_path(), "Diamond");
    }

    #[test]
    fn test_constructor_shape_mismatch() {
        // A facet artifact does not fit the proxy's (address, address) constructor
        let res = ContractArtifact::from_json(DiamondModule::Diamond, FACET_ARTIFACT);
        assert!(matches!(res, Err(ScriptError::ArtifactParsing(_))));
    }

    #[test]
    fn test_empty_bytecode_rejected() {
        let json = r#"{ "abi": [], "bytecode": "0x" }"#;
        let res = ContractArtifact::from_json(DiamondModule::Flow, json);
        assert!(matches!(res, Err(ScriptError::ArtifactParsing(_))));
    }

    #[test]
    fn test_init_code_appends_constructor_args() {
        let artifact =
            ContractArtifact::from_json(DiamondModule::Diamond, DIAMOND_ARTIFACT).unwrap();
        let owner = Address::repeat_byte(0x11);
        let cut = Address::repeat_byte(0x22);

        let args = artifact
            .encode_constructor_args(&[DynSolValue::Address(owner), DynSolValue::Address(cut)])
            .unwrap();
        let init_code = artifact.init_code(&args);

        assert_eq!(init_code.len(), 5 + 64);
        assert_eq!(&init_code[..5], artifact.bytecode.as_ref());
        assert_eq!(&init_code[5 + 12..5 + 32], owner.as_slice());
        assert_eq!(&init_code[5 + 44..], cut.as_slice());
    }

    #[test]
    fn test_constructor_args_are_type_checked() {
        let artifact =
            ContractArtifact::from_json(DiamondModule::Diamond, DIAMOND_ARTIFACT).unwrap();

        let too_few = artifact.encode_constructor_args(&[DynSolValue::Address(Address::ZERO)]);
        assert!(matches!(too_few, Err(ScriptError::CalldataConstruction(_))));

        let wrong_type = artifact.encode_constructor_args(&[
            DynSolValue::Address(Address::ZERO),
            DynSolValue::Bool(true),
        ]);
        assert!(matches!(wrong_type, Err(ScriptError::CalldataConstruction(_))));
    }

    #[test]
    fn test_compiler_settings_from_build_info() {
        let dir = tempfile::tempdir().unwrap();
        let artifact_dir = dir.path().join("contracts").join("Flow.sol");
        let build_info_dir = dir.path().join(BUILD_INFO_DIR);
        fs::create_dir_all(&artifact_dir).unwrap();
        fs::create_dir_all(&build_info_dir).unwrap();

        let artifact_path = artifact_dir.join("Flow.json");
        fs::write(&artifact_path, FACET_ARTIFACT).unwrap();
        fs::write(
            artifact_dir.join("Flow.dbg.json"),
            r#"{ "_format": "hh-sol-dbg-1", "buildInfo": "../../build-info/abc123.json" }"#,
        )
        .unwrap();
        fs::write(
            build_info_dir.join("abc123.json"),
            r#"{
                "solcVersion": "0.8.19",
                "solcLongVersion": "0.8.19+commit.7dd6d404",
                "input": { "language": "Solidity", "sources": {},
                           "settings": { "optimizer": { "enabled": true, "runs": 1000 } } }
            }"#,
        )
        .unwrap();

        let settings = read_compiler_settings(&artifact_path, "Flow").unwrap();
        assert_eq!(
            settings,
            Some(CompilerSettings {
                version: "0.8.19+commit.7dd6d404".to_string(),
                optimizer_runs: Some(1000),
            })
        );
    }

    #[test]
    fn test_compiler_settings_without_optimizer() {
        let dir = tempfile::tempdir().unwrap();
        let artifact_path = dir.path().join("Loupe.json");
        fs::write(
            dir.path().join("Loupe.dbg.json"),
            r#"{ "buildInfo": "build.json" }"#,
        )
        .unwrap();
        fs::write(
            dir.path().join("build.json"),
            r#"{ "solcLongVersion": "0.8.17+commit.8df45f5f", "input": { "settings": {} } }"#,
        )
        .unwrap();

        let settings = read_compiler_settings(&artifact_path, "Loupe").unwrap().unwrap();
        assert_eq!(settings.optimizer_runs, None);

        // No debug artifact means no known settings
        assert_eq!(read_compiler_settings(&artifact_path, "Cut").unwrap(), None);
    }

    #[test]
    fn test_locate_skips_debug_and_build_info() {
        let dir = tempfile::tempdir().unwrap();
        let source_dir = dir.path().join("contracts").join("Utility.sol");
        fs::create_dir_all(&source_dir).unwrap();
        fs::create_dir_all(dir.path().join(BUILD_INFO_DIR)).unwrap();

        fs::write(source_dir.join("Utility.json"), FACET_ARTIFACT).unwrap();
        fs::write(source_dir.join("Utility.dbg.json"), "{}").unwrap();
        fs::write(dir.path().join(BUILD_INFO_DIR).join("Utility.json"), "{}").unwrap();

        let path = locate_artifact(dir.path(), DiamondModule::Utility).unwrap();
        assert_eq!(path, source_dir.join("Utility.json"));

        assert!(locate_artifact(dir.path(), DiamondModule::Flow).is_err());
    }
}
