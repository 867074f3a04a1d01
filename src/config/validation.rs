//! Validation engine for summarizer specs.
//!
//! The engine runs every registered [`ValidationRule`] against a
//! [`SummarizerSpec`] and collects all diagnostics into a
//! [`ValidationReport`]. It never stops at the first error, so a caller sees
//! every problem at once.
//!
//! ```rust,ignore
//! use rapid_summarize::config::validation::ValidationEngine;
//!
//! let report = ValidationEngine::with_defaults().validate(&spec);
//! for err in report.errors() {
//!     eprintln!("{err}");
//! }
//! ```

use std::collections::HashMap;

use serde::Serialize;

use super::errors::{ConfigError, ErrorCode};
use super::{SummarizeVariant, SummarizerSpec, SPEC_VERSION};

// ─── Severity ───────────────────────────────────────────────────────────────

/// Whether a diagnostic is a hard error or a soft warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Error,
    Warning,
}

// ─── Diagnostic ─────────────────────────────────────────────────────────────

/// A [`ConfigError`] tagged with its severity
#[derive(Debug, Clone, Serialize)]
pub struct ValidationDiagnostic {
    pub severity: Severity,
    #[serde(flatten)]
    pub error: ConfigError,
}

impl ValidationDiagnostic {
    pub fn error(err: ConfigError) -> Self {
        Self {
            severity: Severity::Error,
            error: err,
        }
    }

    pub fn warning(err: ConfigError) -> Self {
        Self {
            severity: Severity::Warning,
            error: err,
        }
    }
}

// ─── Report ─────────────────────────────────────────────────────────────────

/// Collected diagnostics from one validation run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationReport {
    pub diagnostics: Vec<ValidationDiagnostic>,
}

impl ValidationReport {
    pub fn errors(&self) -> impl Iterator<Item = &ConfigError> {
        self.with_severity(Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &ConfigError> {
        self.with_severity(Severity::Warning)
    }

    fn with_severity(&self, severity: Severity) -> impl Iterator<Item = &ConfigError> {
        self.diagnostics
            .iter()
            .filter(move |d| d.severity == severity)
            .map(|d| &d.error)
    }

    pub fn has_errors(&self) -> bool {
        self.errors().next().is_some()
    }

    /// No errors; warnings are acceptable.
    pub fn is_valid(&self) -> bool {
        !self.has_errors()
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

// ─── Rule trait ─────────────────────────────────────────────────────────────

/// One check over a [`SummarizerSpec`], producing zero or more diagnostics.
pub trait ValidationRule: Send + Sync {
    /// Short, stable identifier (e.g. `"threshold_ranges"`).
    fn name(&self) -> &str;

    fn validate(&self, spec: &SummarizerSpec) -> Vec<ValidationDiagnostic>;
}

// ─── Engine ─────────────────────────────────────────────────────────────────

/// Runs a set of [`ValidationRule`]s and merges their findings.
pub struct ValidationEngine {
    rules: Vec<Box<dyn ValidationRule>>,
}

impl ValidationEngine {
    /// An engine with no rules.
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// An engine with the built-in rule set.
    pub fn with_defaults() -> Self {
        let mut engine = Self::new();
        engine.add_rule(Box::new(VersionRule));
        engine.add_rule(Box::new(ThresholdRangesRule));
        engine.add_rule(Box::new(EmbeddingLimitsRule));
        engine.add_rule(Box::new(EmbeddingFileRule));
        engine.add_rule(Box::new(UnknownFieldsRule));
        engine
    }

    pub fn add_rule(&mut self, rule: Box<dyn ValidationRule>) {
        self.rules.push(rule);
    }

    pub fn rule_names(&self) -> Vec<&str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    pub fn validate(&self, spec: &SummarizerSpec) -> ValidationReport {
        let mut report = ValidationReport::default();
        for rule in &self.rules {
            report.diagnostics.extend(rule.validate(spec));
        }
        report
    }
}

impl Default for ValidationEngine {
    fn default() -> Self {
        Self::with_defaults()
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  Concrete rules
// ═══════════════════════════════════════════════════════════════════════════

// ─── 1. Supported spec version ──────────────────────────────────────────────

struct VersionRule;

impl ValidationRule for VersionRule {
    fn name(&self) -> &str {
        "version"
    }

    fn validate(&self, spec: &SummarizerSpec) -> Vec<ValidationDiagnostic> {
        if spec.v == SPEC_VERSION {
            return vec![];
        }
        vec![ValidationDiagnostic::error(
            ConfigError::new(
                ErrorCode::UnsupportedVersion,
                "/v",
                format!("spec version {} is not supported", spec.v),
            )
            .with_hint(format!("Set \"v\" to {SPEC_VERSION}")),
        )]
    }
}

// ─── 2. Thresholds are similarities in [0, 1] ───────────────────────────────

struct ThresholdRangesRule;

impl ValidationRule for ThresholdRangesRule {
    fn name(&self) -> &str {
        "threshold_ranges"
    }

    fn validate(&self, spec: &SummarizerSpec) -> Vec<ValidationDiagnostic> {
        let SummarizeVariant::EmbeddingCluster(cfg) = &spec.variant else {
            return vec![];
        };

        let checks: &[(&str, f64)] = &[
            ("threshold", cfg.threshold),
            ("similarity_threshold", cfg.similarity_threshold),
        ];

        checks
            .iter()
            .filter(|(_, value)| !(0.0..=1.0).contains(value))
            .map(|&(field, value)| {
                ValidationDiagnostic::error(
                    ConfigError::new(
                        ErrorCode::InvalidValue,
                        format!("/variant/{field}"),
                        format!("{field} must be between 0 and 1, got {value}"),
                    )
                    .with_hint(format!("Remove {field} to use the default")),
                )
            })
            .collect()
    }
}

// ─── 3. Embedding dimensions and capacity must be positive ──────────────────

struct EmbeddingLimitsRule;

impl ValidationRule for EmbeddingLimitsRule {
    fn name(&self) -> &str {
        "embedding_limits"
    }

    fn validate(&self, spec: &SummarizerSpec) -> Vec<ValidationDiagnostic> {
        let SummarizeVariant::EmbeddingCluster(cfg) = &spec.variant else {
            return vec![];
        };

        let checks: &[(&str, usize)] = &[
            ("dimensions", cfg.embeddings.dimensions),
            ("capacity", cfg.embeddings.capacity),
        ];

        let mut out = Vec::new();
        for &(field, value) in checks {
            if value == 0 {
                out.push(ValidationDiagnostic::error(
                    ConfigError::new(
                        ErrorCode::LimitExceeded,
                        format!("/variant/embeddings/{field}"),
                        format!("{field} must be greater than 0"),
                    )
                    .with_hint(format!("Remove {field} to use the default, or set it to a positive value")),
                ));
            }
        }
        out
    }
}

// ─── 4. Embedding file must exist ───────────────────────────────────────────

struct EmbeddingFileRule;

impl ValidationRule for EmbeddingFileRule {
    fn name(&self) -> &str {
        "embedding_file"
    }

    fn validate(&self, spec: &SummarizerSpec) -> Vec<ValidationDiagnostic> {
        let SummarizeVariant::EmbeddingCluster(cfg) = &spec.variant else {
            return vec![];
        };
        let path = &cfg.embeddings.path;
        if path.is_file() {
            return vec![];
        }
        vec![ValidationDiagnostic::error(
            ConfigError::new(
                ErrorCode::MissingFile,
                "/variant/embeddings/path",
                format!("embedding file {} does not exist", path.display()),
            )
            .with_hint("Point path at a plain-text vector file such as glove.6B.50d.txt"),
        )]
    }
}

// ─── 5. Unknown fields (strict → error, non-strict → warning) ──────────────

struct UnknownFieldsRule;

impl UnknownFieldsRule {
    fn check_unknowns(
        path: &str,
        unknowns: &HashMap<String, serde_json::Value>,
        strict: bool,
    ) -> Vec<ValidationDiagnostic> {
        let mut keys: Vec<&String> = unknowns.keys().collect();
        keys.sort();
        keys.into_iter()
            .map(|key| {
                let diag_fn = if strict {
                    ValidationDiagnostic::error
                } else {
                    ValidationDiagnostic::warning
                };
                diag_fn(
                    ConfigError::new(
                        ErrorCode::UnknownField,
                        format!("{path}/{key}"),
                        format!("unrecognized field \"{key}\""),
                    )
                    .with_hint("Check spelling or remove this field"),
                )
            })
            .collect()
    }
}

impl ValidationRule for UnknownFieldsRule {
    fn name(&self) -> &str {
        "unknown_fields"
    }

    fn validate(&self, spec: &SummarizerSpec) -> Vec<ValidationDiagnostic> {
        let mut out = Self::check_unknowns("", &spec.unknown_fields, spec.strict);
        match &spec.variant {
            SummarizeVariant::TfIdf(cfg) => {
                out.extend(Self::check_unknowns("/variant", &cfg.unknown_fields, spec.strict));
            }
            SummarizeVariant::EmbeddingCluster(cfg) => {
                out.extend(Self::check_unknowns("/variant", &cfg.unknown_fields, spec.strict));
                out.extend(Self::check_unknowns(
                    "/variant/embeddings",
                    &cfg.embeddings.unknown_fields,
                    spec.strict,
                ));
            }
        }
        out
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  Tests
// ═══════════════════════════════════════════════════════════════════════════
