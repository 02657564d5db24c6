use anyhow::{Context, bail};
use std::path::Path;
use tracing::info;
use wayfind_common::protocol::{DomSnapshot, RawElement, RecordedTrace};
use wayfind_common::workflow::WorkflowDefinition;
use wayfind_core::synthesis::{generate_strategies_with_threshold, summarize};
use wayfind_core::{ElementResolver, RecordingSession, WayfindConfig, apply_markers};

const DEFAULT_WORKFLOW_NAME: &str = "Recorded workflow";

fn is_yaml(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("yaml") || e.eq_ignore_ascii_case("yml"))
}

async fn read(path: &Path) -> anyhow::Result<String> {
    tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))
}

pub async fn convert(
    config: &WayfindConfig,
    trace_path: &Path,
    name: Option<String>,
    description: Option<String>,
    output: Option<&Path>,
) -> anyhow::Result<()> {
    let content = read(trace_path).await?;
    let trace = RecordedTrace::from_json(&content)
        .with_context(|| format!("Invalid trace {}", trace_path.display()))?;

    let name = name
        .or_else(|| trace.name.clone())
        .or_else(|| {
            trace_path
                .file_stem()
                .and_then(|s| s.to_str())
                .map(str::to_string)
        })
        .unwrap_or_else(|| DEFAULT_WORKFLOW_NAME.to_string());
    let description = description
        .or_else(|| trace.description.clone())
        .unwrap_or_default();

    let actions = trace.actions.len();
    let session = RecordingSession::from_trace(trace, config);
    let mut workflow = session.finish(name, description);
    let variables = apply_markers(&mut workflow);

    info!(
        actions,
        steps = workflow.steps.len(),
        variables = variables.len(),
        "Converted trace"
    );

    let rendered = match output {
        Some(path) if is_yaml(path) => serde_yaml::to_string(&workflow)?,
        _ => serde_json::to_string_pretty(&workflow)?,
    };

    match output {
        Some(path) => {
            tokio::fs::write(path, rendered)
                .await
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!("Wrote workflow to {}", path.display());
        }
        None => println!("{}", rendered),
    }
    Ok(())
}

async fn load_workflow(path: &Path) -> anyhow::Result<WorkflowDefinition> {
    let content = read(path).await?;
    let workflow = if is_yaml(path) {
        serde_yaml::from_str(&content)?
    } else {
        WorkflowDefinition::from_json(&content)?
    };
    Ok(workflow)
}

/// Returns whether the element was found.
pub async fn resolve(
    config: &WayfindConfig,
    workflow_path: &Path,
    step: usize,
    snapshot_path: &Path,
) -> anyhow::Result<bool> {
    let workflow = load_workflow(workflow_path)
        .await
        .with_context(|| format!("Invalid workflow {}", workflow_path.display()))?;
    let snapshot = DomSnapshot::from_json(&read(snapshot_path).await?)
        .with_context(|| format!("Invalid snapshot {}", snapshot_path.display()))?;

    let resolver = ElementResolver::from_config(&config.resolution);
    let resolution = resolver.resolve_step(&workflow, step, Some(&snapshot))?;

    println!("{}", resolution);
    Ok(resolution.is_found())
}

pub async fn strategies(config: &WayfindConfig, element_path: &Path) -> anyhow::Result<()> {
    let raw: RawElement = serde_json::from_str(&read(element_path).await?)
        .with_context(|| format!("Invalid element {}", element_path.display()))?;
    let Some(element) = raw.normalize() else {
        bail!("Element {} carries no tag, text or attributes", element_path.display());
    };

    let strategies = generate_strategies_with_threshold(&element, config.synthesis.fuzzy_threshold);
    println!("{}", summarize(&strategies));
    Ok(())
}
