//! The prefix gate: an ordered allow/deny table with last-match-wins
//! evaluation.
//!
//! Matching rules:
//! - Rules are scanned in insertion order and the last matching rule wins,
//!   even when an earlier, more specific prefix also matched. Callers that
//!   want more-specific-wins must insert the broad rule first and the
//!   narrow one last.
//! - Inserting a prefix that is already present overwrites that rule's
//!   action in place; the rule keeps its position in the scan order.
//! - Removing a prefix strips every rule carrying it, whatever the action.
//! - An address with no extractable host IP resolves to the default
//!   action, never to an unconditional pass.

use std::net::IpAddr;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use netfence_core::{EndpointAddr, NetPrefix};

use super::rules::{Action, PrefixRule};

/// Address-policy gate consulted at the dial/accept decision point.
///
/// Any number of readers may evaluate concurrently; mutations are
/// serialized and atomic with respect to readers. Construct once, then
/// share via `Arc`.
pub struct PrefixGate {
    state: RwLock<GateState>,
}

/// Default action and rule list form one logical unit: evaluation must see
/// a consistent pair, so both live under the same lock.
struct GateState {
    default_action: Action,
    rules: Vec<PrefixRule>,
}

impl Default for PrefixGate {
    fn default() -> Self {
        Self::new()
    }
}

impl PrefixGate {
    /// Empty gate that blocks nothing: no rules, default `Allow`.
    pub fn new() -> Self {
        Self {
            state: RwLock::new(GateState {
                default_action: Action::Allow,
                rules: Vec::new(),
            }),
        }
    }

    /// Build a gate from an ordered rule sequence, appended verbatim.
    ///
    /// No duplicate collapsing is applied, so this accepts rule sets built
    /// under older append-only semantics; `remove` still clears every
    /// entry for a prefix.
    pub fn from_rules(
        default_action: Action,
        rules: impl IntoIterator<Item = PrefixRule>,
    ) -> Self {
        Self {
            state: RwLock::new(GateState {
                default_action,
                rules: rules.into_iter().collect(),
            }),
        }
    }

    // The gate never panics while holding the lock, so a poisoned lock
    // still holds consistent data; recover it instead of propagating the
    // panic to an innocent caller.
    fn read(&self) -> RwLockReadGuard<'_, GateState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, GateState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Insert or overwrite a deny rule for `prefix`.
    pub fn add_deny(&self, prefix: NetPrefix) {
        self.upsert(prefix, Action::Deny);
    }

    /// Insert or overwrite an allow rule for `prefix`.
    pub fn add_allow(&self, prefix: NetPrefix) {
        self.upsert(prefix, Action::Allow);
    }

    fn upsert(&self, prefix: NetPrefix, action: Action) {
        let mut st = self.write();
        match st.rules.iter_mut().find(|r| r.prefix == prefix) {
            Some(rule) => {
                rule.action = action;
                tracing::debug!(prefix = %prefix, action = ?action, "rule overwritten");
            }
            None => {
                st.rules.push(PrefixRule { prefix, action });
                tracing::debug!(prefix = %prefix, action = ?action, "rule added");
            }
        }
    }

    /// Remove every rule for `prefix`, whatever its action. Removing a
    /// prefix with no rule is a no-op.
    pub fn remove(&self, prefix: &NetPrefix) {
        let mut st = self.write();
        let before = st.rules.len();
        st.rules.retain(|r| r.prefix != *prefix);
        let removed = before - st.rules.len();
        if removed > 0 {
            tracing::debug!(prefix = %prefix, removed, "rules removed");
        }
    }

    /// Decide whether dialing or accepting `addr` is blocked.
    ///
    /// An address whose host cannot be extracted (empty, non-IP leading
    /// layer, unparseable literal) resolves to the default action.
    pub fn addr_blocked(&self, addr: &EndpointAddr) -> bool {
        match addr.host_ip() {
            Some(ip) => self.ip_blocked(ip),
            None => {
                let blocked = self.read().default_action.is_deny();
                tracing::trace!(addr = %addr, blocked, "no host ip, default applied");
                blocked
            }
        }
    }

    /// Decide whether a bare IP is blocked. For callers that already hold
    /// a resolved address.
    pub fn ip_blocked(&self, ip: IpAddr) -> bool {
        let st = self.read();
        let mut decision = st.default_action;
        for rule in &st.rules {
            if rule.prefix.contains(&ip) {
                decision = rule.action;
            }
        }
        tracing::trace!(%ip, blocked = decision.is_deny(), "address evaluated");
        decision.is_deny()
    }

    /// Snapshot of the prefixes currently denied, in insertion order.
    pub fn deny_prefixes(&self) -> Vec<NetPrefix> {
        self.prefixes_with(Action::Deny)
    }

    /// Snapshot of the prefixes currently allowed, in insertion order.
    pub fn allow_prefixes(&self) -> Vec<NetPrefix> {
        self.prefixes_with(Action::Allow)
    }

    fn prefixes_with(&self, action: Action) -> Vec<NetPrefix> {
        self.read()
            .rules
            .iter()
            .filter(|r| r.action == action)
            .map(|r| r.prefix)
            .collect()
    }

    /// Snapshot of the whole table in insertion order.
    pub fn rules(&self) -> Vec<PrefixRule> {
        self.read().rules.clone()
    }

    /// Action applied when no rule matches or the host is unextractable.
    pub fn default_action(&self) -> Action {
        self.read().default_action
    }

    pub fn set_default_action(&self, action: Action) {
        let mut st = self.write();
        st.default_action = action;
        tracing::debug!(action = ?action, "default action changed");
    }

    /// True when unmatched addresses are rejected.
    pub fn reject_by_default(&self) -> bool {
        self.default_action().is_deny()
    }

    pub fn set_reject_by_default(&self, reject: bool) {
        self.set_default_action(if reject { Action::Deny } else { Action::Allow });
    }
}
