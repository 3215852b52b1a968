// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Replacer configuration.

use serde::{Deserialize, Deserializer, Serialize};
use standin_scene::Selector;

use crate::error::{Error, Result};

/// Settings for one substitution run.
///
/// Every field has a default, so a JSON document only needs the keys it
/// changes:
///
/// ```
/// use standin_substitution::ReplacerConfig;
///
/// let config = ReplacerConfig::from_json(r#"{
///     "replace_ratio": 0.5,
///     "copy_properties": 0,
///     "objects_to_be_replaced": { "tag": "chair" },
///     "objects_to_replace_with": { "name_prefix": "Stool" }
/// }"#).unwrap();
///
/// assert_eq!(config.replace_ratio, 0.5);
/// assert!(!config.copy_properties);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplacerConfig {
    /// Fraction of sources to attempt, in `[0, 1]`.
    pub replace_ratio: f64,
    /// Copy the source's custom properties onto accepted replacements.
    /// Numbers are accepted too and count as true when nonzero.
    #[serde(deserialize_with = "bool_or_number")]
    pub copy_properties: bool,
    pub objects_to_be_replaced: Selector,
    pub objects_to_replace_with: Selector,
    /// Put a rejected replacement back where it was before alignment.
    pub restore_on_reject: bool,
    /// Reject pairs whose bounding-box ratio is not finite on some axis
    /// instead of skipping scaling on that axis.
    pub strict_scaling: bool,
    /// Fixed RNG seed; entropy-seeded when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for ReplacerConfig {
    fn default() -> Self {
        Self {
            replace_ratio: 1.0,
            copy_properties: true,
            objects_to_be_replaced: Selector::default(),
            objects_to_replace_with: Selector::default(),
            restore_on_reject: false,
            strict_scaling: false,
            seed: None,
        }
    }
}

impl ReplacerConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| Error::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| Error::InvalidConfig(e.to_string()))
    }

    /// Checks values that no run could use.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.replace_ratio) {
            return Err(Error::InvalidConfig(format!(
                "replace_ratio must be within [0, 1], got {}",
                self.replace_ratio
            )));
        }
        Ok(())
    }
}

fn bool_or_number<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Int(i64),
        Float(f64),
    }

    Ok(match Flag::deserialize(deserializer)? {
        Flag::Bool(b) => b,
        Flag::Int(n) => n != 0,
        Flag::Float(x) => x != 0.0,
    })
}
