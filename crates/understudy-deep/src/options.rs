//! Construction options for deep mocks.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use understudy_fn::{CallError, Implementation, implementation};

use crate::error::Result;

/// Options fixed when a deep mock root is built.
///
/// Every router created anywhere in the tree inherits the fallback.
#[derive(Clone)]
pub struct DeepMockOptions {
    pub(crate) func_prop_support: bool,
    pub(crate) deep:              bool,
    pub(crate) name:              String,
    pub(crate) fallback:          Option<Implementation>,
}

impl Default for DeepMockOptions {
    fn default() -> Self { Self::new() }
}

impl DeepMockOptions {
    pub fn new() -> Self {
        Self {
            func_prop_support: false,
            deep:              true,
            name:              String::from("mock"),
            fallback:          None,
        }
    }

    /// Let function members carry nested properties too.
    pub fn func_prop_support(mut self, enabled: bool) -> Self {
        self.func_prop_support = enabled;
        self
    }

    /// Only allow function members on the root.
    pub fn shallow(mut self) -> Self {
        self.deep = false;
        self
    }

    /// Root segment of every diagnostic path.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Implementation used by every router in the tree when no binding matches.
    pub fn fallback(mut self, fallback: Implementation) -> Self {
        self.fallback = Some(fallback);
        self
    }

    pub fn is_func_prop_support(&self) -> bool { self.func_prop_support }

    pub fn is_deep(&self) -> bool { self.deep }

    pub fn name_str(&self) -> &str { &self.name }

    pub fn fallback_impl(&self) -> Option<&Implementation> { self.fallback.as_ref() }

    pub fn from_config(config: DeepMockConfig) -> Self {
        let options = Self::new().func_prop_support(config.func_prop_support).name(config.name);
        let options = if config.deep { options } else { options.shallow() };
        match config.unmatched {
            UnmatchedPolicy::Undefined => options,
            UnmatchedPolicy::Throw => options.fallback(strict_fallback()),
        }
    }
}

impl fmt::Debug for DeepMockOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeepMockOptions")
            .field("func_prop_support", &self.func_prop_support)
            .field("deep", &self.deep)
            .field("name", &self.name)
            .field("fallback", &self.fallback.is_some())
            .finish()
    }
}

fn strict_fallback() -> Implementation {
    implementation(|args| {
        Err(CallError::thrown(format!(
            "no behavior configured for arguments {}",
            Value::Array(args.to_vec())
        )))
    })
}

/// What an unmatched call does when options come from configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnmatchedPolicy {
    /// Return `null`.
    #[default]
    Undefined,
    /// Fail with a [`CallError`] naming the arguments.
    Throw,
}

/// Serializable form of [`DeepMockOptions`].
///
/// ```toml
/// func_prop_support = true
/// name = "client"
/// unmatched = "throw"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeepMockConfig {
    pub func_prop_support: bool,
    pub deep:              bool,
    pub name:              String,
    pub unmatched:         UnmatchedPolicy,
}

impl Default for DeepMockConfig {
    fn default() -> Self {
        Self {
            func_prop_support: false,
            deep:              true,
            name:              String::from("mock"),
            unmatched:         UnmatchedPolicy::Undefined,
        }
    }
}

impl DeepMockConfig {
    pub fn from_toml_str(s: &str) -> Result<Self> { Ok(toml::from_str(s)?) }

    pub fn into_options(self) -> DeepMockOptions { DeepMockOptions::from_config(self) }
}
