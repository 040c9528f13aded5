use std::collections::{HashMap, HashSet};

use tracing::debug;

use super::ast::*;
use crate::error::GenError;

/// Declares a named struct for every anonymous tuple in `events`.
///
/// Nested tuples are declared before the struct that contains them, so the
/// result can be rendered in order without forward references.
pub fn synthesize_structs(events: &[EventModel]) -> Result<Vec<StructDeclaration>, GenError> {
    let mut declarations = Vec::new();
    let mut overloads: HashMap<&str, usize> = HashMap::new();

    for (event_index, event) in events.iter().enumerate() {
        let seen = overloads.entry(event.name.as_str()).or_insert(0);
        let overload = *seen;
        *seen += 1;

        let mut walker = Walker {
            event_name: &event.name,
            overload,
            event_index,
            path: Vec::new(),
            out: &mut declarations,
        };
        for (position, param) in event.parameters.iter().enumerate() {
            walker.path.push(position);
            walker.visit(param);
            walker.path.pop();
        }
    }

    // Structs share the contract's namespace with events and emitters.
    let reserved: HashSet<String> = events
        .iter()
        .flat_map(|e| [e.name.clone(), e.emitter_name()])
        .collect();
    let mut names = HashSet::new();
    for declaration in &declarations {
        if reserved.contains(&declaration.name) || !names.insert(declaration.name.as_str()) {
            return Err(GenError::StructNamingConflict(declaration.name.clone()));
        }
    }

    Ok(declarations)
}

/// Synthetic name for the tuple found at `path` inside an event.
///
/// The first event with a given name yields `<Event>Struct<p0>_<p1>`; its
/// k-th repeat yields `<Event>Struct<k>__<p0>_<p1>`. Only digits and
/// underscores follow the final `Struct`, and a path never contains `__`, so
/// two different `(event, overload, path)` triples never share a name.
pub fn struct_name(event_name: &str, overload: usize, path: &[usize]) -> String {
    let ordinals: Vec<String> = path.iter().map(|p| p.to_string()).collect();
    if overload == 0 {
        format!("{}Struct{}", event_name, ordinals.join("_"))
    } else {
        format!("{}Struct{}__{}", event_name, overload, ordinals.join("_"))
    }
}

/// Effective Solidity types of an event's top-level parameters, with every
/// tuple replaced by its synthesized struct (suffix kept verbatim).
pub fn resolve_parameter_types(
    event_index: usize,
    event: &EventModel,
    structs: &[StructDeclaration],
) -> Result<Vec<String>, GenError> {
    event
        .parameters
        .iter()
        .enumerate()
        .map(|(position, param)| match &param.kind {
            ParamKind::Scalar => Ok(param.raw_type.clone()),
            ParamKind::Tuple { suffix, .. } => structs
                .iter()
                .find(|s| s.event_index == event_index && s.path == [position])
                .map(|s| format!("{}{}", s.name, suffix))
                .ok_or_else(|| GenError::UnresolvedStruct {
                    event: event.name.clone(),
                    parameter: param.name.clone(),
                }),
        })
        .collect()
}

struct Walker<'a> {
    event_name: &'a str,
    overload: usize,
    event_index: usize,
    path: Vec<usize>,
    out: &'a mut Vec<StructDeclaration>,
}

impl Walker<'_> {
    /// Returns the type reference for `param` if it is a tuple.
    fn visit(&mut self, param: &EventParameter) -> Option<String> {
        let ParamKind::Tuple { fields, suffix } = &param.kind else {
            return None;
        };

        let mut struct_fields = Vec::with_capacity(fields.len());
        for (position, field) in fields.iter().enumerate() {
            self.path.push(position);
            let type_name = self.visit(field).unwrap_or_else(|| field.raw_type.clone());
            self.path.pop();
            struct_fields.push(StructField {
                name: field.name.clone(),
                type_name,
            });
        }

        let name = struct_name(self.event_name, self.overload, &self.path);
        debug!(name = %name, fields = struct_fields.len(), "Declared struct");
        self.out.push(StructDeclaration {
            name: name.clone(),
            fields: struct_fields,
            event_index: self.event_index,
            path: self.path.clone(),
        });

        Some(format!("{}{}", name, suffix))
    }
}
