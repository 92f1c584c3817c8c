use std::hash::BuildHasherDefault;

use anyhow::Context as _;
use camino::Utf8Path;
use classy_parse::Rule;
use rustc_hash::FxHasher;
use serde::Deserialize;

use crate::CssGenerator;

pub(crate) type FxIndexMap<K, V> = indexmap::IndexMap<K, V, BuildHasherDefault<FxHasher>>;
pub(crate) type FxIndexSet<T> = indexmap::IndexSet<T, BuildHasherDefault<FxHasher>>;

const BUILTIN: &str = include_str!("vocabulary.json");

/// The utilities, variants and screens an editor knows about.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Vocabulary {
    /// Breakpoint name to min-width, in document order.
    pub screens: FxIndexMap<String, String>,
    /// Variant names without their trailing colon: `hover`, `after:`.
    pub variants: Vec<String>,
    pub utilities: Vec<Utility>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "UtilityDef")]
pub struct Utility {
    pub value: String,
    pub interpolation: Option<Interpolation>,
    /// Declarations shown on hover.
    pub css: Option<String>,
}

/// How the part of a utility name after its `value` is checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Interpolation {
    /// Anything non-empty: `text-` accepts `text-red-500`.
    String,
    /// A number, zero included.
    Number,
    /// A number greater than zero.
    Nonzero,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum UtilityDef {
    Name(String),
    Full {
        value: String,
        #[serde(default)]
        interpolation: Option<Interpolation>,
        #[serde(default)]
        css: Option<String>,
    },
}

impl From<UtilityDef> for Utility {
    fn from(def: UtilityDef) -> Self {
        match def {
            UtilityDef::Name(value) => Self { value, interpolation: None, css: None },
            UtilityDef::Full { value, interpolation, css } => Self { value, interpolation, css },
        }
    }
}

impl Vocabulary {
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        let value: serde_json::Value = serde_json::from_str(json).context("invalid vocabulary")?;
        if !value.is_object() {
            anyhow::bail!("vocabulary must be a JSON object");
        }
        let vocabulary: Self = serde_json::from_value(value).context("invalid vocabulary")?;
        tracing::debug!(
            screens = vocabulary.screens.len(),
            variants = vocabulary.variants.len(),
            utilities = vocabulary.utilities.len(),
            "loaded vocabulary"
        );
        Ok(vocabulary)
    }

    pub fn load(path: &Utf8Path) -> anyhow::Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read vocabulary `{path}`"))?;
        Self::from_json(&json).with_context(|| format!("failed to load vocabulary `{path}`"))
    }

    /// The vocabulary shipped with the crate.
    pub fn builtin() -> Self {
        Self::from_json(BUILTIN).expect("built-in vocabulary is valid")
    }

    pub fn is_known_utility(&self, name: &str) -> bool {
        // Template substitutions and bare variants.
        if name.contains("${") || name.is_empty() {
            return true;
        }

        if let Some((head, _)) = name.split_once('[').filter(|(_, rest)| rest.ends_with(']')) {
            return self
                .utilities
                .iter()
                .any(|utility| utility.interpolation.is_some() && utility.value == head);
        }

        self.utilities.iter().any(|utility| utility.matches(name))
    }

    pub fn is_known_variant(&self, name: &str) -> bool {
        self.variants.iter().any(|variant| variant == name)
            || self.screens.contains_key(name)
            || (name.starts_with('[') && name.ends_with(']'))
    }
}

impl Utility {
    fn matches(&self, name: &str) -> bool {
        let Some(interpolation) = self.interpolation else {
            return self.value == name;
        };

        let Some(rest) = name.strip_prefix(self.value.as_str()) else {
            return false;
        };

        match interpolation {
            Interpolation::String => !rest.is_empty(),
            Interpolation::Number => number(rest).is_some_and(|number| number >= 0.0),
            Interpolation::Nonzero => number(rest).is_some_and(|number| number > 0.0),
        }
    }
}

fn number(text: &str) -> Option<f64> {
    if text.is_empty() || !text.bytes().all(|byte| byte.is_ascii_digit() || byte == b'.') {
        return None;
    }
    text.parse().ok()
}

impl CssGenerator for Vocabulary {
    fn css(&self, rule: &Rule) -> Option<String> {
        self.utilities.iter().find(|utility| utility.value == rule.name)?.css.clone()
    }
}
