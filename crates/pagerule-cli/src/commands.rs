//! Command implementations.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use pagerule_core::sdk::local::LocalSdk;
use pagerule_core::{
    ApplyContext, Definitions, Extension, ExtensionError, ExtensionRegistry, ExtensionToggles,
    Location, Logger, PluginSdk, Rule,
};
use pagerule_engine::{MatchReport, RuleEnginePlugin};

/// Name of the built-in extension used by `preview`.
pub const PREVIEW_EXTENSION: &str = "preview";

fn load(path: &Path) -> Result<Definitions> {
    Definitions::from_path(path)
        .with_context(|| format!("Failed to load definitions from {}", path.display()))
}

pub fn validate(path: &Path) -> Result<()> {
    let definitions = load(path)?;
    definitions
        .validate()
        .with_context(|| format!("Invalid definitions in {}", path.display()))?;

    let patterns = definitions.pages.len();
    let groups: usize = definitions.pages.iter().map(|(_, groups)| groups.len()).sum();
    let rules: usize = definitions
        .pages
        .iter()
        .flat_map(|(_, groups)| groups.iter())
        .map(|group| group.len())
        .sum();
    let enabled: Vec<&str> = definitions.enabled_extensions().collect();

    println!("✓ {}", path.display());
    println!("  Patterns:   {patterns}");
    println!("  Groups:     {groups}");
    println!("  Rules:      {rules}");
    if enabled.is_empty() {
        println!("  Extensions: (none enabled)");
    } else {
        println!("  Extensions: {}", enabled.join(", "));
    }
    Ok(())
}

pub async fn preview(path: &Path, location: &str, json: bool) -> Result<()> {
    let definitions = load(path)?;
    let location = Location::from_input(location)?;
    let report = run_preview(definitions, location).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("Location: {}", report.location);
    if report.matched_patterns.is_empty() {
        println!("No page pattern matches.");
        return Ok(());
    }

    println!("Matched patterns:");
    for pattern in &report.matched_patterns {
        println!("  {pattern}");
    }

    println!("Applied rules:");
    if report.is_empty() {
        println!("  (none)");
    }
    for applied in &report.applied {
        println!(
            "  {} [group {}] {}",
            applied.pattern, applied.group, applied.rule.name
        );
    }
    Ok(())
}

/// Run the engine against `location` with only the preview extension
/// enabled, so the first rule of every matching group is reported.
pub async fn run_preview(definitions: Definitions, location: Location) -> Result<MatchReport> {
    let registry = Arc::new(ExtensionRegistry::new());
    registry.register(PREVIEW_EXTENSION, |context| {
        Arc::new(PreviewExtension {
            logger: context.sdk.logger(&[]),
        })
    });

    let skipped: Vec<&str> = definitions.enabled_extensions().collect();
    if !skipped.is_empty() {
        tracing::debug!(extensions = ?skipped, "Preview ignores configured extensions");
    }

    let definitions = Definitions::new(
        ExtensionToggles::new().with(PREVIEW_EXTENSION, true),
        definitions.pages,
    );
    let sdk: Arc<dyn PluginSdk> = Arc::new(LocalSdk::new(location));
    let engine = RuleEnginePlugin::with_registry(definitions, sdk, registry)?;

    engine.enable().await?;
    engine.disable().await;

    engine
        .last_report()
        .context("Preview sweep produced no report")
}

/// Accepts every rule and logs what it would apply.
struct PreviewExtension {
    logger: Arc<dyn Logger>,
}

#[async_trait::async_trait]
impl Extension for PreviewExtension {
    async fn apply(&self, rule: &Rule, context: &ApplyContext) -> Result<(), ExtensionError> {
        self.logger.info(&format!(
            "Would apply rule \"{}\" (pattern \"{}\", group {})",
            rule.name, context.pattern, context.group
        ));
        Ok(())
    }
}
