//! Allow-listed workflow options.
//!
//! [`WorkflowConfig`] is the only shape the `config` section of a state file
//! and the `answers` of a batch session can take once loaded: recognized keys
//! become typed fields, everything else is dropped.

use std::collections::BTreeMap;
use std::str::FromStr;

use log::debug;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::Route;

/// How the workflow is driven.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum WorkflowMode {
    /// Each step is triggered by hand
    Manual,
    /// All steps run back to back
    CruiseControl,
}

/// What to do with clarification markers in generated specifications.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ClarificationsStrategy {
    Defer,
    Prompt,
    Skip,
}

/// Which priority tiers get implemented.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ImplementationScope {
    /// Specifications only, nothing implemented
    #[serde(rename = "none")]
    SpecsOnly,
    #[serde(rename = "p0")]
    P0,
    #[serde(rename = "p0-p1")]
    P0P1,
    #[serde(rename = "all")]
    All,
}

macro_rules! impl_from_str_via_serde {
    ($($ty:ty => $label:literal),* $(,)?) => {
        $(
            impl FromStr for $ty {
                type Err = String;

                fn from_str(s: &str) -> Result<Self, Self::Err> {
                    serde_json::from_value(Value::String(s.trim().to_lowercase()))
                        .map_err(|_| format!("Invalid {}: {s}", $label))
                }
            }
        )*
    };
}

impl_from_str_via_serde! {
    WorkflowMode => "mode",
    ClarificationsStrategy => "clarifications strategy",
    ImplementationScope => "implementation scope",
}

impl WorkflowMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkflowMode::Manual => "manual",
            WorkflowMode::CruiseControl => "cruise-control",
        }
    }
}

impl ClarificationsStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClarificationsStrategy::Defer => "defer",
            ClarificationsStrategy::Prompt => "prompt",
            ClarificationsStrategy::Skip => "skip",
        }
    }
}

impl ImplementationScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImplementationScope::SpecsOnly => "none",
            ImplementationScope::P0 => "p0",
            ImplementationScope::P0P1 => "p0-p1",
            ImplementationScope::All => "all",
        }
    }
}

/// Recognized workflow options. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route: Option<Route>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<WorkflowMode>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clarifications_strategy: Option<ClarificationsStrategy>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub implementation_scope: Option<ImplementationScope>,

    /// Target stack for a greenfield rebuild (free text)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_stack: Option<String>,

    /// Where a greenfield rebuild is written
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build_location: Option<String>,

    /// Where generated specifications are written
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spec_output_location: Option<String>,
}

impl WorkflowConfig {
    /// Recognized keys, in their on-disk spelling.
    pub const KEYS: [&'static str; 7] = [
        "route",
        "mode",
        "clarificationsStrategy",
        "implementationScope",
        "targetStack",
        "buildLocation",
        "specOutputLocation",
    ];

    /// Build a config from a loosely typed answers map.
    ///
    /// Keys are accepted in camelCase or snake_case. Unknown keys and values
    /// that do not parse for their key are skipped.
    pub fn from_answers(answers: &BTreeMap<String, Value>) -> Self {
        let mut config = Self::default();
        for (key, value) in answers {
            let applied = match canonical_key(key) {
                Some("route") => parse_into(value, &mut config.route),
                Some("mode") => parse_into(value, &mut config.mode),
                Some("clarificationsStrategy") => {
                    parse_into(value, &mut config.clarifications_strategy)
                }
                Some("implementationScope") => parse_into(value, &mut config.implementation_scope),
                Some("targetStack") => parse_into(value, &mut config.target_stack),
                Some("buildLocation") => parse_into(value, &mut config.build_location),
                Some("specOutputLocation") => parse_into(value, &mut config.spec_output_location),
                _ => false,
            };
            if !applied {
                debug!("ignoring answer {key:?}");
            }
        }
        config
    }

    /// Overlay every field set in `patch`.
    pub fn merge(&mut self, patch: WorkflowConfig) {
        macro_rules! overlay {
            ($($field:ident),*) => {
                $(
                    if patch.$field.is_some() {
                        self.$field = patch.$field;
                    }
                )*
            };
        }
        overlay!(
            route,
            mode,
            clarifications_strategy,
            implementation_scope,
            target_stack,
            build_location,
            spec_output_location
        );
    }

    /// True when no option is set.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Map a camelCase or snake_case answer key onto its on-disk spelling.
pub fn canonical_key(key: &str) -> Option<&'static str> {
    let folded: String = key.chars().filter(|c| *c != '_').collect::<String>().to_lowercase();
    WorkflowConfig::KEYS
        .into_iter()
        .find(|known| known.to_lowercase() == folded)
}

fn parse_into<T: DeserializeOwned>(value: &Value, slot: &mut Option<T>) -> bool {
    match serde_json::from_value(value.clone()) {
        Ok(parsed) => {
            *slot = Some(parsed);
            true
        }
        Err(_) => false,
    }
}
