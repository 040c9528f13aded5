use handlebars::Handlebars;
use serde_json::json;

use crate::error::GenError;
use crate::synthesizer::ast::{ContractModel, EventModel, StructDeclaration};
use crate::synthesizer::resolve_parameter_types;

const CONTRACT_TEMPLATE: &str = "contract";
const DEPLOY_TEMPLATE: &str = "deploy";
const PROJECT_DEPLOY_TEMPLATE: &str = "project_deploy";

/// Renders mock contracts and their Foundry deploy scripts.
pub struct ContractRenderer {
    handlebars: Handlebars<'static>,
}

impl ContractRenderer {
    pub fn new() -> Result<Self, GenError> {
        let mut handlebars = Handlebars::new();
        handlebars.set_strict_mode(true);
        handlebars.register_escape_fn(handlebars::no_escape);

        for (name, source) in [
            (CONTRACT_TEMPLATE, include_str!("templates/contract.sol.hbs")),
            (DEPLOY_TEMPLATE, include_str!("templates/deploy.s.sol.hbs")),
            (PROJECT_DEPLOY_TEMPLATE, include_str!("templates/project_deploy.s.sol.hbs")),
        ] {
            handlebars
                .register_template_string(name, source)
                .map_err(|e| GenError::template(name, e))?;
        }

        Ok(Self { handlebars })
    }

    /// Renders one contract exposing an `emit<Event>` function per event.
    /// `structs` must come from the synthesizer run over `model.events`.
    pub fn render_contract(
        &self,
        model: &ContractModel,
        structs: &[StructDeclaration],
    ) -> Result<String, GenError> {
        let mut events = Vec::with_capacity(model.events.len());
        let mut functions = Vec::with_capacity(model.events.len());

        for (index, event) in model.events.iter().enumerate() {
            let types = resolve_parameter_types(index, event, structs)?;
            events.push(generate_event(event, &types));
            functions.push(generate_emitter(event, &types));
        }

        let struct_blocks: Vec<String> = structs.iter().map(generate_struct).collect();
        let data = json!({
            "name": model.name,
            "kind": model.kind.label(),
            "structs": struct_blocks,
            "events": events,
            "functions": functions,
        });
        self.render(CONTRACT_TEMPLATE, &data)
    }

    pub fn render_deploy_script(&self, contract_name: &str) -> Result<String, GenError> {
        let data = json!({
            "name": contract_name,
            "instance": instance_name(contract_name),
        });
        self.render(DEPLOY_TEMPLATE, &data)
    }

    /// Single script deploying every contract in `contract_names`.
    pub fn render_project_deploy_script(
        &self,
        contract_names: &[&str],
    ) -> Result<String, GenError> {
        let contracts: Vec<_> = contract_names
            .iter()
            .map(|name| json!({ "name": name, "instance": instance_name(name) }))
            .collect();
        self.render(PROJECT_DEPLOY_TEMPLATE, &json!({ "contracts": contracts }))
    }

    /// Strict mode turns a missing variable into `TemplateRender`.
    pub(crate) fn render(
        &self,
        template: &str,
        data: &serde_json::Value,
    ) -> Result<String, GenError> {
        self.handlebars
            .render(template, data)
            .map_err(|e| GenError::template(template, e))
    }
}

pub fn render_contract(
    model: &ContractModel,
    structs: &[StructDeclaration],
) -> Result<String, GenError> {
    ContractRenderer::new()?.render_contract(model, structs)
}

pub fn render_deploy_script(contract_name: &str) -> Result<String, GenError> {
    ContractRenderer::new()?.render_deploy_script(contract_name)
}

fn instance_name(contract_name: &str) -> String {
    format!("inst{}", contract_name)
}

fn generate_struct(declaration: &StructDeclaration) -> String {
    let mut output = format!("    struct {} {{\n", declaration.name);
    for field in &declaration.fields {
        output.push_str(&format!("        {} {};\n", field.type_name, field.name));
    }
    output.push_str("    }");
    output
}

/// `indexed` only ever appears here, never on the emitter's parameters.
fn generate_event(event: &EventModel, types: &[String]) -> String {
    let params: Vec<String> = event
        .parameters
        .iter()
        .zip(types)
        .map(|(param, ty)| {
            if param.indexed {
                format!("{} indexed {}", ty, param.name)
            } else {
                format!("{} {}", ty, param.name)
            }
        })
        .collect();
    format!("    event {}({});", event.name, params.join(", "))
}

fn generate_emitter(event: &EventModel, types: &[String]) -> String {
    let params: Vec<String> = event
        .parameters
        .iter()
        .zip(types)
        .map(|(param, ty)| {
            if param.is_reference() {
                format!("{} calldata {}", ty, param.name)
            } else {
                format!("{} {}", ty, param.name)
            }
        })
        .collect();
    let args: Vec<&str> = event.parameters.iter().map(|p| p.name.as_str()).collect();

    let mut output = format!(
        "    function {}({}) external {{\n",
        event.emitter_name(),
        params.join(", ")
    );
    output.push_str(&format!("        emit {}({});\n", event.name, args.join(", ")));
    output.push_str("    }");
    output
}
