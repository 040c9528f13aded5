use anyhow::{anyhow, Context, Result};
use clap::{App, Arg};
use std::path::Path;
use tracing::{debug, info, warn};

mod error;
mod generator;
mod manifest;
mod parser;
mod pipeline;
mod synthesizer;
mod verify;


use manifest::Manifest;
use pipeline::Pipeline;

const DEFAULT_OUTPUT_ROOT: &str = "foundry";
const DEFAULT_PROJECT_NAME: &str = "default";

fn main() -> Result<()> {
    let matches = App::new("subgraph-mockgen")
        .version("0.1.0")
        .about("Generates mock contracts that emit the events of a subgraph manifest")
        .arg(
            Arg::with_name("INPUT")
                .help("Subgraph manifest, or a directory containing subgraph.yaml")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::with_name("output")
                .short("o")
                .long("output")
                .value_name("DIR")
                .help("Output root for generated Foundry projects")
                .takes_value(true)
                .default_value(DEFAULT_OUTPUT_ROOT),
        )
        .arg(
            Arg::with_name("project")
                .short("p")
                .long("project")
                .value_name("NAME")
                .help("Project directory name under the output root")
                .takes_value(true)
                .default_value(DEFAULT_PROJECT_NAME),
        )
        .arg(
            Arg::with_name("strict")
                .long("strict")
                .help("Abort on the first malformed signature or failing contract"),
        )
        .arg(
            Arg::with_name("no-verify")
                .long("no-verify")
                .help("Skip re-parsing the generated contracts"),
        )
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .long("verbose")
                .help("Enable debug logging"),
        )
        .get_matches();

    let log_level = if matches.is_present("verbose") {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .init();

    let input = matches.value_of("INPUT").unwrap_or_default();
    let output_root = matches.value_of("output").unwrap_or(DEFAULT_OUTPUT_ROOT);
    let project = matches.value_of("project").unwrap_or(DEFAULT_PROJECT_NAME);
    let strict = matches.is_present("strict");

    let manifest = Manifest::load(input)?;
    debug!(spec_version = ?manifest.spec_version, "Loaded manifest {}", input);
    let models = manifest
        .contract_models(strict)
        .with_context(|| format!("Failed to read event handlers from {}", input))?;
    info!(
        "Found {} event handlers across {} contracts",
        manifest.handlers().len(),
        models.len()
    );

    let pipeline = Pipeline::new(!matches.is_present("no-verify"))?;
    let mut generated = Vec::new();
    for model in &models {
        match pipeline.generate(model) {
            Ok(contract) => generated.push(contract),
            Err(e) if !strict => warn!("Skipping {} {}: {}", model.kind.label(), model.name, e),
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("Failed to generate contract {}", model.name));
            }
        }
    }

    if generated.is_empty() {
        return Err(anyhow!("No contracts could be generated from {}", input));
    }

    let project_script = pipeline.project_deploy_script(&generated)?;
    let written = pipeline::write_project(
        Path::new(output_root),
        project,
        &generated,
        Some(&project_script),
    )?;

    for path in written {
        println!("Generated {}", path.display());
    }

    Ok(())
}
