use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::error::GenError;
use crate::generator::ContractRenderer;
use crate::synthesizer::ast::{ContractKind, ContractModel};
use crate::synthesizer::synthesize_structs;
use crate::verify::verify_contract;

pub const PROJECT_DEPLOY_SCRIPT: &str = "Deploy.s.sol";

#[derive(Debug, Clone)]
pub struct GeneratedContract {
    pub name: String,
    pub kind: ContractKind,
    pub source: String,
    pub deploy_script: String,
}

/// Parsed contract model in, rendered sources out.
pub struct Pipeline {
    renderer: ContractRenderer,
    verify: bool,
}

impl Pipeline {
    pub fn new(verify: bool) -> Result<Self, GenError> {
        Ok(Self {
            renderer: ContractRenderer::new()?,
            verify,
        })
    }

    pub fn generate(&self, model: &ContractModel) -> Result<GeneratedContract, GenError> {
        let structs = synthesize_structs(&model.events)?;
        let source = self.renderer.render_contract(model, &structs)?;
        if self.verify {
            verify_contract(&source, model, &structs)?;
        }
        let deploy_script = self.renderer.render_deploy_script(&model.name)?;

        debug!(
            contract = %model.name,
            events = model.events.len(),
            structs = structs.len(),
            "Generated contract"
        );
        Ok(GeneratedContract {
            name: model.name.clone(),
            kind: model.kind.clone(),
            source,
            deploy_script,
        })
    }

    /// Deploys every data source at once. Templates have no fixed address
    /// and are left to their own scripts.
    pub fn project_deploy_script(
        &self,
        contracts: &[GeneratedContract],
    ) -> Result<String, GenError> {
        let names: Vec<&str> = contracts
            .iter()
            .filter(|c| matches!(c.kind, ContractKind::DataSource { .. }))
            .map(|c| c.name.as_str())
            .collect();
        self.renderer.render_project_deploy_script(&names)
    }
}

/// Writes `src/<Name>.sol` and `script/Deploy<Name>.s.sol` for every
/// contract, plus the project-wide script, under `<out_root>/<project>`.
pub fn write_project(
    out_root: &Path,
    project: &str,
    contracts: &[GeneratedContract],
    project_script: Option<&str>,
) -> Result<Vec<PathBuf>> {
    let project_dir = out_root.join(project);
    let src_dir = project_dir.join("src");
    let script_dir = project_dir.join("script");
    for dir in [&src_dir, &script_dir] {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
    }

    let mut written = Vec::new();
    for contract in contracts {
        let source_path = src_dir.join(format!("{}.sol", contract.name));
        write_file(&source_path, &contract.source)?;
        written.push(source_path);

        let script_path = script_dir.join(format!("Deploy{}.s.sol", contract.name));
        write_file(&script_path, &contract.deploy_script)?;
        written.push(script_path);
    }

    if let Some(script) = project_script {
        let path = script_dir.join(PROJECT_DEPLOY_SCRIPT);
        write_file(&path, script)?;
        written.push(path);
    }

    info!(project, files = written.len(), "Wrote project {}", project_dir.display());
    Ok(written)
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    fs::write(path, content)
        .with_context(|| format!("Failed to write output file: {}", path.display()))
}
