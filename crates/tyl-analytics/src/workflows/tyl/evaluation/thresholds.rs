use serde::{Deserialize, Serialize};

use super::super::classifier::{self, CodeShape};
use super::super::domain::{Category, CoreVariant, SubjectCode};
use super::config::TylRules;

/// Where a resolved threshold came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThresholdSource {
    Rule,
    /// No rule matched; the configured fallback applied. Usually a mistyped code.
    Fallback,
}

impl ThresholdSource {
    pub fn is_fallback(self) -> bool {
        self == ThresholdSource::Fallback
    }
}

/// Minimum combined internal-assessment score needed to pass a subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedThreshold {
    pub value: u16,
    pub source: ThresholdSource,
}

impl ResolvedThreshold {
    pub fn is_fallback(&self) -> bool {
        self.source.is_fallback()
    }
}

/// Resolve a raw code, tolerating case, whitespace and unknown suffixes.
pub(crate) fn resolve_raw(
    rules: &TylRules,
    code: &str,
    variant: Option<CoreVariant>,
) -> ResolvedThreshold {
    match classifier::shape(code) {
        Some(shape) => resolve_shape(rules, shape, variant),
        None => fallback(rules),
    }
}

pub(crate) fn resolve(rules: &TylRules, code: &SubjectCode) -> ResolvedThreshold {
    resolve_shape(
        rules,
        CodeShape {
            base: code.base(),
            variant: code.variant,
        },
        None,
    )
}

/// Core variants are tried first, then the suffix-independent level table, then the fallback.
///
/// A suffix carried by the code wins over the explicit `variant` argument, which only fills in
/// for core codes written without `-odd`/`-full`.
fn resolve_shape(
    rules: &TylRules,
    shape: CodeShape,
    variant: Option<CoreVariant>,
) -> ResolvedThreshold {
    let base = shape.base;

    if base.category == Category::Core {
        let effective = shape
            .variant
            .and_then(|tag| tag.core_variant())
            .or(variant);

        let exact = effective.and_then(|wanted| {
            rules
                .core
                .iter()
                .find(|entry| entry.level == base.level && entry.variant == Some(wanted))
        });
        let any_suffix = || {
            rules
                .core
                .iter()
                .find(|entry| entry.level == base.level && entry.variant.is_none())
        };

        if let Some(entry) = exact.or_else(any_suffix) {
            return rule(entry.threshold);
        }
    }

    rules
        .levels
        .iter()
        .find(|entry| entry.category == base.category && entry.level == base.level)
        .map(|entry| rule(entry.threshold))
        .unwrap_or_else(|| fallback(rules))
}

fn rule(value: u16) -> ResolvedThreshold {
    ResolvedThreshold {
        value,
        source: ThresholdSource::Rule,
    }
}

fn fallback(rules: &TylRules) -> ResolvedThreshold {
    ResolvedThreshold {
        value: rules.fallback_threshold,
        source: ThresholdSource::Fallback,
    }
}
