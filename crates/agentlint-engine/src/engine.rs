use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use agentlint_core::{ErrorCatalog, codes};
use agentlint_report::{ErrorFormatter, ErrorReport};
use agentlint_rules::{Fix, Phase, RegistryError, ValidatorManifest, ValidatorRegistry};
use agentlint_score::{
    ProgressiveScorer, ValidationContext, ValidationHistoryEntry, ValidationPattern,
    ValidationScore,
};
use agentlint_validate::{SchemaValidator, SemanticLinter, ValidateError};
use serde_json::Value;
use thiserror::Error;

/// Structural schema compiled when the builder is given none.
pub const DEFAULT_MANIFEST_SCHEMA: &str = include_str!("../assets/manifest.schema.json");

/// Engine construction errors. Validation itself never errors; bad input
/// surfaces as report entries.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Validate(#[from] ValidateError),
    #[error(transparent)]
    Registry(#[from] RegistryError),
    #[error("embedded manifest schema is not valid JSON: {0}")]
    Asset(#[source] serde_json::Error),
}

/// Configures and builds a [`ValidationEngine`].
#[derive(Debug, Default)]
pub struct EngineBuilder {
    schema: Option<Value>,
    validator_dirs: Vec<PathBuf>,
    registry: ValidatorRegistry,
}

impl EngineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a custom structural schema instead of the embedded one.
    pub fn schema(mut self, schema: Value) -> Self {
        self.schema = Some(schema);
        self
    }

    /// Discover validator descriptors from a directory at build time.
    pub fn validator_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.validator_dirs.push(dir.into());
        self
    }

    /// Register a validator descriptor directly.
    pub fn validator(mut self, validator: ValidatorManifest) -> Result<Self, EngineError> {
        self.registry.register(validator)?;
        Ok(self)
    }

    pub fn build(self) -> Result<ValidationEngine, EngineError> {
        let schema = match self.schema {
            Some(schema) => schema,
            None => serde_json::from_str(DEFAULT_MANIFEST_SCHEMA).map_err(EngineError::Asset)?,
        };
        let schema = SchemaValidator::new(&schema)?;

        let mut registry = self.registry;
        for dir in &self.validator_dirs {
            let discovered = registry.load_dir(dir)?;
            tracing::info!(
                event = "engine_validators_loaded",
                dir = %dir.display(),
                loaded = discovered.loaded,
                skipped = discovered.skipped,
            );
        }

        let catalog = Arc::new(ErrorCatalog::new());
        Ok(ValidationEngine {
            formatter: ErrorFormatter::new(Arc::clone(&catalog)),
            catalog,
            schema,
            linter: SemanticLinter::new(),
            registry,
            scorer: ProgressiveScorer::new(),
            context: ValidationContext::new(),
        })
    }
}

/// One self-contained validation engine.
///
/// Holds the compiled schema, the linter, the validator registry, the
/// formatter, the scorer, and this instance's validation history. No
/// state is shared between instances.
pub struct ValidationEngine {
    catalog: Arc<ErrorCatalog>,
    schema: SchemaValidator,
    linter: SemanticLinter,
    registry: ValidatorRegistry,
    formatter: ErrorFormatter,
    scorer: ProgressiveScorer,
    context: ValidationContext,
}

impl ValidationEngine {
    pub fn builder() -> EngineBuilder {
        EngineBuilder::new()
    }

    /// Engine with the embedded schema and no dynamic validators.
    pub fn with_defaults() -> Result<Self, EngineError> {
        EngineBuilder::new().build()
    }

    pub fn catalog(&self) -> &ErrorCatalog {
        &self.catalog
    }

    pub fn registry(&self) -> &ValidatorRegistry {
        &self.registry
    }

    /// Full validation pass: structural, advisory, semantic, and dynamic
    /// rule findings merged into one report. `phase` narrows which dynamic
    /// validators run; `None` runs them all.
    pub fn validate(&self, manifest: &Value, phase: Option<Phase>) -> ErrorReport {
        let outcome = self.schema.validate(manifest);
        let mut findings = self.schema.advise(manifest);
        findings.extend(self.linter.lint(manifest));
        let rules = self.registry.validate(manifest, phase);

        let report = self
            .formatter
            .build_report(&outcome.violations, &findings, &rules.findings);
        let summary = report.summary();
        tracing::info!(
            event = "manifest_validated",
            valid = report.valid(),
            errors = summary.errors,
            warnings = summary.warnings,
        );
        report
    }

    /// Validate a manifest file. Unreadable or unparsable input becomes a
    /// single-entry error report rather than an `Err`.
    pub fn validate_file(&self, path: &Path, phase: Option<Phase>) -> ErrorReport {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) => {
                return ErrorReport::new(vec![self.formatter.synthetic_input_error(
                    codes::INPUT_UNREADABLE,
                    &format!("{}: {err}", path.display()),
                )]);
            }
        };
        let manifest: Value = match serde_json::from_str(&text) {
            Ok(manifest) => manifest,
            Err(err) => {
                return ErrorReport::new(vec![self.formatter.synthetic_input_error(
                    codes::INPUT_UNPARSABLE,
                    &format!("{}: {err}", path.display()),
                )]);
            }
        };
        self.validate(&manifest, phase)
    }

    pub fn score(&self, manifest: &Value) -> ValidationScore {
        self.scorer.score(manifest)
    }

    /// Record a scoring pass into this engine's history.
    pub fn record(&mut self, manifest: &Value, score: &ValidationScore, fixes_applied: &[Fix]) {
        self.context.record_validation(manifest, score, fixes_applied);
    }

    pub fn history(&self, manifest: &Value) -> &[ValidationHistoryEntry] {
        self.context.history(manifest)
    }

    pub fn pattern(&self, manifest: &Value) -> Option<&ValidationPattern> {
        self.context.pattern(manifest)
    }

    /// Fixes that previously preceded score increases for manifests with
    /// the same fingerprint.
    pub fn suggestions(&self, manifest: &Value) -> Vec<Fix> {
        self.context.suggestions_from_history(manifest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn embedded_schema_parses_and_compiles() {
        let engine = ValidationEngine::with_defaults().expect("default engine builds");
        assert!(!engine.catalog().is_empty());
    }

    #[test]
    fn conforming_manifest_passes_the_default_schema() {
        let engine = ValidationEngine::with_defaults().expect("default engine builds");
        let manifest = json!({
            "apiVersion": "agents/v1",
            "kind": "Agent",
            "metadata": {"name": "triage-bot", "description": "Routes tickets"},
            "spec": {
                "type": "worker",
                "role": "triage",
                "llm": {"temperature": 0.2},
                "tools": []
            }
        });
        let report = engine.validate(&manifest, None);
        assert!(report.valid(), "unexpected errors: {:?}", report);
    }

    #[test]
    fn missing_required_sections_fail_validation() {
        let engine = ValidationEngine::with_defaults().expect("default engine builds");
        let report = engine.validate(&json!({"kind": "Agent"}), None);
        assert!(!report.valid());
        assert!(report.summary().errors >= 2);
    }
}
