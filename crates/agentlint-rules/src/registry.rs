use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use agentlint_core::classify;
use serde_json::Value;
use thiserror::Error;

use crate::eval::execute_rule;
use crate::model::{Phase, RuleOutcome, ValidatorManifest};

/// Registry construction and discovery errors.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("validator '{0}' is already registered")]
    Duplicate(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Summary of one discovery pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiscoveryReport {
    pub loaded: usize,
    pub skipped: usize,
}

/// Append-only, name-keyed collection of validator descriptors.
///
/// Read-only after discovery and safely shareable without locking.
#[derive(Debug, Default)]
pub struct ValidatorRegistry {
    validators: BTreeMap<String, ValidatorManifest>,
}

impl ValidatorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a descriptor. Names are unique; re-registration is refused
    /// rather than replacing the existing entry.
    pub fn register(&mut self, validator: ValidatorManifest) -> Result<(), RegistryError> {
        if self.validators.contains_key(&validator.name) {
            return Err(RegistryError::Duplicate(validator.name));
        }
        self.validators.insert(validator.name.clone(), validator);
        Ok(())
    }

    /// Discover descriptors from `*.json` files in a directory.
    ///
    /// A malformed descriptor is logged and skipped; discovery of the rest
    /// continues. Only an unreadable directory is an error.
    pub fn load_dir(&mut self, dir: &Path) -> Result<DiscoveryReport, RegistryError> {
        let mut report = DiscoveryReport::default();

        let mut paths: Vec<_> = fs::read_dir(dir)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
            .collect();
        paths.sort();

        for path in paths {
            match load_descriptor(&path) {
                Ok(validator) => match self.register(validator) {
                    Ok(()) => report.loaded += 1,
                    Err(err) => {
                        tracing::warn!(file = %path.display(), error = %err, "descriptor skipped");
                        report.skipped += 1;
                    }
                },
                Err(reason) => {
                    tracing::warn!(file = %path.display(), error = %reason, "descriptor skipped");
                    report.skipped += 1;
                }
            }
        }

        tracing::info!(
            event = "validators_discovered",
            loaded = report.loaded,
            skipped = report.skipped
        );
        Ok(report)
    }

    pub fn get(&self, name: &str) -> Option<&ValidatorManifest> {
        self.validators.get(name)
    }

    pub fn len(&self) -> usize {
        self.validators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }

    /// Validators matching the manifest's declared type and the phase.
    ///
    /// Target-type match is exact or the `all` wildcard; an empty
    /// target-type list behaves like the wildcard. A validator with no
    /// phases participates in every phase.
    pub fn applicable(&self, manifest: &Value, phase: Option<Phase>) -> Vec<&ValidatorManifest> {
        let declared_type = classify(manifest, "type").and_then(Value::as_str);

        self.validators
            .values()
            .filter(|validator| {
                let type_match = validator.target_types.is_empty()
                    || validator.target_types.iter().any(|target| {
                        target == "all" || Some(target.as_str()) == declared_type
                    });
                let phase_match = match phase {
                    None => true,
                    Some(phase) => {
                        validator.phases.is_empty() || validator.phases.contains(&phase)
                    }
                };
                type_match && phase_match
            })
            .collect()
    }

    /// Union every firing rule from every applicable validator.
    ///
    /// Strictly additive: findings are concatenated in validator order and
    /// no validator can suppress another's finding.
    pub fn validate(&self, manifest: &Value, phase: Option<Phase>) -> RuleOutcome {
        let mut outcome = RuleOutcome::default();

        for validator in self.applicable(manifest, phase) {
            for rule in &validator.rules {
                if let Some(finding) = execute_rule(&validator.name, rule, manifest) {
                    outcome.findings.push(finding);
                }
            }
        }

        outcome
    }
}

fn load_descriptor(path: &Path) -> Result<ValidatorManifest, String> {
    let contents = fs::read_to_string(path).map_err(|err| err.to_string())?;
    serde_json::from_str(&contents).map_err(|err| err.to_string())
}
