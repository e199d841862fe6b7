use serde::Deserialize;

use netfence_core::error::{NetFenceError, Result};
use netfence_core::NetPrefix;

use crate::policy::{Action, PrefixGate};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FenceConfig {
    pub version: u32,

    #[serde(default)]
    pub fence: FenceSection,
}

impl FenceConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(NetFenceError::UnsupportedVersion);
        }
        for entry in &self.fence.rules {
            entry.parse_prefix()?;
        }
        Ok(())
    }

    /// Compile into a runtime gate through the normal insertion path, so
    /// duplicate prefixes in a file collapse and the later entry wins.
    /// Rule order in the file is insertion order in the gate.
    pub fn compile(&self) -> Result<PrefixGate> {
        let gate = PrefixGate::new();
        gate.set_default_action(self.fence.default);
        for entry in &self.fence.rules {
            let prefix = entry.parse_prefix()?;
            match entry.action {
                Action::Allow => gate.add_allow(prefix),
                Action::Deny => gate.add_deny(prefix),
            }
        }
        Ok(gate)
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct FenceSection {
    /// Action applied when no rule matches. Defaults to `allow`.
    #[serde(default)]
    pub default: Action,

    /// Ordered rule list. Order is load-bearing: the last matching rule in
    /// this list decides the outcome.
    #[serde(default)]
    pub rules: Vec<RuleEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuleEntry {
    pub action: Action,
    pub prefix: String,
}

impl RuleEntry {
    fn parse_prefix(&self) -> Result<NetPrefix> {
        self.prefix.parse().map_err(|_| {
            NetFenceError::BadConfig(format!("fence.rules: invalid prefix: {}", self.prefix))
        })
    }
}
