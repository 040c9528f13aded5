//! Re-parses a rendered contract and checks it against the model it was
//! rendered from.

use std::collections::HashSet;

use tracing::debug;

use crate::error::GenError;
use crate::parser::source::{parse_contract_source, ParsedParam};
use crate::synthesizer::ast::{ContractModel, EventModel, StructDeclaration};
use crate::synthesizer::resolve_parameter_types;

pub fn verify_contract(
    source: &str,
    model: &ContractModel,
    structs: &[StructDeclaration],
) -> Result<(), GenError> {
    let fail = |reason: String| GenError::round_trip(&model.name, reason);

    let parsed = parse_contract_source(source).map_err(|e| fail(e.to_string()))?;
    if parsed.contract_name != model.name {
        return Err(fail(format!("contract is named `{}`", parsed.contract_name)));
    }

    if parsed.structs.len() != structs.len() {
        return Err(fail(format!(
            "expected {} struct declarations, found {}",
            structs.len(),
            parsed.structs.len()
        )));
    }
    let mut declared = HashSet::new();
    for (expected, found) in structs.iter().zip(&parsed.structs) {
        let fields: Vec<(String, String)> = expected
            .fields
            .iter()
            .map(|f| (f.type_name.clone(), f.name.clone()))
            .collect();
        if found.name != expected.name || found.fields != fields {
            return Err(fail(format!("struct `{}` does not match its declaration", found.name)));
        }
        for (field_type, _) in &found.fields {
            let base = base_type(field_type);
            let is_struct = structs.iter().any(|s| s.name == base);
            if is_struct && !declared.contains(base) {
                return Err(fail(format!(
                    "struct `{}` references `{}` before it is declared",
                    found.name, base
                )));
            }
        }
        declared.insert(found.name.as_str());
    }

    if parsed.events.len() != model.events.len() || parsed.functions.len() != model.events.len() {
        return Err(fail(format!(
            "expected {} events and emitters, found {} and {}",
            model.events.len(),
            parsed.events.len(),
            parsed.functions.len()
        )));
    }

    for (index, event) in model.events.iter().enumerate() {
        let types = resolve_parameter_types(index, event, structs)?;

        let rendered = &parsed.events[index];
        if rendered.name != event.name {
            return Err(fail(format!(
                "event #{} is named `{}`, expected `{}`",
                index, rendered.name, event.name
            )));
        }
        check_params(event, &types, &rendered.params, false)
            .map_err(|r| fail(format!("event `{}`: {}", event.name, r)))?;

        let function = &parsed.functions[index];
        let emitter = event.emitter_name();
        if function.name != emitter {
            return Err(fail(format!("function `{}` should be `{}`", function.name, emitter)));
        }
        check_params(event, &types, &function.params, true)
            .map_err(|r| fail(format!("function `{}`: {}", emitter, r)))?;

        let expected_args: Vec<&str> = event.parameters.iter().map(|p| p.name.as_str()).collect();
        if function.emitted_event != event.name || function.emit_args != expected_args {
            return Err(fail(format!(
                "`{}` emits {}({}), expected {}({})",
                emitter,
                function.emitted_event,
                function.emit_args.join(", "),
                event.name,
                expected_args.join(", ")
            )));
        }
    }

    debug!(contract = %model.name, "Round-trip verification passed");
    Ok(())
}

fn check_params(
    event: &EventModel,
    types: &[String],
    found: &[ParsedParam],
    emitter: bool,
) -> Result<(), String> {
    if found.len() != event.parameters.len() {
        return Err(format!(
            "expected {} parameters, found {}",
            event.parameters.len(),
            found.len()
        ));
    }

    for ((param, ty), rendered) in event.parameters.iter().zip(types).zip(found) {
        if rendered.param_type != *ty || rendered.name != param.name {
            return Err(format!(
                "parameter `{} {}` rendered as `{} {}`",
                ty, param.name, rendered.param_type, rendered.name
            ));
        }
        if emitter {
            if rendered.indexed {
                return Err(format!("parameter `{}` is marked indexed", param.name));
            }
            if rendered.location.is_some() != param.is_reference() {
                return Err(format!("parameter `{}` has the wrong data location", param.name));
            }
        } else if rendered.indexed != param.indexed || rendered.location.is_some() {
            return Err(format!("parameter `{}` has the wrong modifiers", param.name));
        }
    }
    Ok(())
}

/// `Foo[2][]` -> `Foo`
fn base_type(type_name: &str) -> &str {
    type_name.split('[').next().unwrap_or(type_name)
}
