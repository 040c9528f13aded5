use std::collections::HashSet;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::GenError;
use crate::parser;
use crate::synthesizer::ast::{ContractKind, ContractModel};

pub const SUBGRAPH_YAML_FILENAME: &str = "subgraph.yaml";

/// The parts of a `subgraph.yaml` that describe contract events.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    #[serde(default)]
    pub spec_version: Option<String>,
    #[serde(default)]
    pub data_sources: Vec<DataSource>,
    #[serde(default)]
    pub templates: Vec<DataSource>,
}

#[derive(Debug, Deserialize)]
pub struct DataSource {
    pub name: String,
    #[serde(default)]
    pub source: Source,
    #[serde(default)]
    pub mapping: Mapping,
}

#[derive(Debug, Default, Deserialize)]
pub struct Source {
    #[serde(default)]
    pub address: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mapping {
    #[serde(default)]
    pub event_handlers: Vec<EventHandler>,
}

#[derive(Debug, Deserialize)]
pub struct EventHandler {
    pub event: String,
    #[serde(default)]
    pub handler: Option<String>,
}

impl Manifest {
    /// Loads a manifest file, or `subgraph.yaml` inside a directory.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let path = if path.is_dir() {
            path.join(SUBGRAPH_YAML_FILENAME)
        } else {
            path.to_path_buf()
        };

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read manifest: {}", path.display()))?;
        Self::from_yaml(&content)
            .with_context(|| format!("Failed to parse manifest: {}", path.display()))
    }

    pub fn from_yaml(content: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(content)
    }

    /// `(event signature, data source name)` pairs in manifest order.
    pub fn handlers(&self) -> Vec<(&str, &str)> {
        self.sources()
            .flat_map(|(source, _)| {
                source
                    .mapping
                    .event_handlers
                    .iter()
                    .map(move |h| (h.event.as_str(), source.name.as_str()))
            })
            .collect()
    }

    /// Builds one contract model per data source or template with events.
    ///
    /// In lenient mode malformed signatures are skipped with a warning; in
    /// strict mode the first one is returned as an error.
    pub fn contract_models(&self, strict: bool) -> Result<Vec<ContractModel>, GenError> {
        let mut contracts = Vec::new();

        for (source, is_template) in self.sources() {
            if source.mapping.event_handlers.is_empty() {
                debug!(source = %source.name, "No event handlers, skipping");
                continue;
            }

            let mut events = Vec::new();
            let mut signatures = HashSet::new();
            for handler in &source.mapping.event_handlers {
                let event = match parser::parse_event_signature(&handler.event) {
                    Ok(event) => event,
                    Err(e) if !strict => {
                        warn!(source = %source.name, "Skipping event handler: {}", e);
                        continue;
                    }
                    Err(e) => return Err(e),
                };
                if !signatures.insert(event.canonical_signature()) {
                    debug!(
                        source = %source.name,
                        event = %handler.event,
                        handler = ?handler.handler,
                        "Duplicate event, declared once"
                    );
                    continue;
                }
                events.push(event);
            }

            if events.is_empty() {
                warn!(source = %source.name, "No usable event handlers, contract skipped");
                continue;
            }

            let kind = if is_template {
                ContractKind::Template
            } else {
                ContractKind::DataSource {
                    address: source.source.address.clone(),
                }
            };
            contracts.push(ContractModel {
                name: source.name.clone(),
                kind,
                events,
            });
        }

        Ok(contracts)
    }

    fn sources(&self) -> impl Iterator<Item = (&DataSource, bool)> {
        self.data_sources
            .iter()
            .map(|s| (s, false))
            .chain(self.templates.iter().map(|s| (s, true)))
    }
}
