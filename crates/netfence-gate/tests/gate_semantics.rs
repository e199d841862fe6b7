//! Gate decision semantics: default policy, last-match-wins, removal.
//!
//! Address/prefix vectors follow the shapes real dialers hand the gate,
//! including the IPv6 ranges a ULA-heavy mesh produces.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::net::IpAddr;

use netfence_core::{EndpointAddr, NetPrefix};
use netfence_gate::{Action, PrefixGate, PrefixRule};

fn prefix(s: &str) -> NetPrefix {
    s.parse().unwrap()
}

fn addr(s: &str) -> EndpointAddr {
    s.parse().unwrap()
}

fn ip(s: &str) -> IpAddr {
    s.parse().unwrap()
}

#[test]
fn fresh_gate_blocks_nothing() {
    let gate = PrefixGate::new();
    assert_eq!(gate.default_action(), Action::Allow);
    assert!(!gate.reject_by_default());
    assert!(!gate.addr_blocked(&addr("/ip4/1.2.3.4/tcp/123")));
    assert!(!gate.ip_blocked(ip("255.255.255.255")));
    assert!(gate.rules().is_empty());
}

#[test]
fn simple_deny() {
    let gate = PrefixGate::new();
    gate.add_deny(prefix("1.2.3.0/24"));

    assert!(gate.ip_blocked(ip("1.2.3.4")));
    assert!(gate.ip_blocked(ip("1.2.3.255")));
    assert!(!gate.ip_blocked(ip("1.2.4.1")));
}

#[test]
fn deny_vectors_v4_and_v6() {
    let gate = PrefixGate::new();
    for cidr in ["1.2.3.0/24", "4.3.2.1/32", "fd00::/8", "fc00::1/128"] {
        gate.add_deny(prefix(cidr));
    }

    for blocked in [
        "/ip4/1.2.3.4/tcp/123",
        "/ip4/4.3.2.1/udp/123",
        "/ip6/fd00::2/tcp/321",
        "/ip6/fc00::1/udp/321",
    ] {
        assert!(gate.addr_blocked(&addr(blocked)), "expected {blocked} blocked");
    }

    for open in [
        "/ip4/1.2.4.1/tcp/123",
        "/ip4/4.3.2.2/udp/123",
        "/ip6/fe00::1/tcp/321",
        "/ip6/fc00::2/udp/321",
    ] {
        assert!(!gate.addr_blocked(&addr(open)), "expected {open} open");
    }
}

#[test]
fn same_prefix_insert_collapses_and_last_action_wins() {
    let gate = PrefixGate::new();
    gate.add_deny(prefix("1.2.3.0/24"));
    gate.add_allow(prefix("1.2.3.0/24"));

    // One rule, action overwritten in place.
    assert_eq!(gate.rules().len(), 1);
    assert_eq!(gate.rules()[0].action, Action::Allow);
    assert!(!gate.ip_blocked(ip("1.2.3.4")));

    // Canonical equality: the sloppy spelling hits the same rule.
    gate.add_deny(prefix("1.2.3.9/24"));
    assert_eq!(gate.rules().len(), 1);
    assert!(gate.ip_blocked(ip("1.2.3.4")));
}

#[test]
fn later_overlapping_rule_wins_over_more_specific_earlier_one() {
    let gate = PrefixGate::new();
    gate.add_deny(prefix("1.2.3.0/24"));
    gate.add_allow(prefix("1.2.3.128/25"));

    // Only the /24 matches.
    assert!(gate.ip_blocked(ip("1.2.3.1")));
    // Both match; the later allow wins because it was inserted later.
    assert!(!gate.ip_blocked(ip("1.2.3.200")));

    // Same two prefixes, opposite insertion order: the broad deny now
    // wins everywhere because it came last.
    let flipped = PrefixGate::new();
    flipped.add_allow(prefix("1.2.3.128/25"));
    flipped.add_deny(prefix("1.2.3.0/24"));
    assert!(flipped.ip_blocked(ip("1.2.3.200")));
}

#[test]
fn default_deny_with_allowlist() {
    let gate = PrefixGate::new();
    gate.set_default_action(Action::Deny);
    gate.add_allow(prefix("1.2.3.0/24"));

    assert!(!gate.addr_blocked(&addr("/ip4/1.2.3.1/tcp/123")));
    assert!(!gate.addr_blocked(&addr("/ip4/1.2.3.254/tcp/123")));
    assert!(gate.addr_blocked(&addr("/ip4/1.2.4.1/tcp/123")));
    assert!(gate.addr_blocked(&addr("/ip6/fe00::1/tcp/321")));
}

#[test]
fn remove_clears_every_rule_for_the_prefix() {
    let p = prefix("1.2.3.0/24");
    // Duplicate state can only come from direct construction now; build it.
    let gate = PrefixGate::from_rules(
        Action::Deny,
        [
            PrefixRule { prefix: p, action: Action::Allow },
            PrefixRule { prefix: p, action: Action::Deny },
            PrefixRule { prefix: prefix("9.9.9.0/24"), action: Action::Allow },
        ],
    );
    assert_eq!(gate.rules().len(), 3);

    gate.remove(&p);
    assert_eq!(gate.rules().len(), 1);
    assert!(gate.deny_prefixes().is_empty());

    // Nothing left for the prefix: evaluation falls back to the default.
    assert!(gate.ip_blocked(ip("1.2.3.1")));
    assert!(!gate.ip_blocked(ip("9.9.9.1")));
}

#[test]
fn remove_is_idempotent_and_unknown_prefix_is_a_noop() {
    let gate = PrefixGate::new();
    gate.add_deny(prefix("1.2.3.0/24"));

    gate.remove(&prefix("7.7.7.0/24"));
    gate.remove(&prefix("7.7.7.0/24"));

    assert_eq!(gate.rules().len(), 1);
    assert!(gate.ip_blocked(ip("1.2.3.4")));
    assert!(!gate.ip_blocked(ip("7.7.7.7")));
}

#[test]
fn unextractable_host_applies_the_default() {
    let gate = PrefixGate::new();
    let no_host = addr("/dns4/example.com/tcp/443");

    assert!(!gate.addr_blocked(&no_host));
    assert!(!gate.addr_blocked(&EndpointAddr::empty()));

    gate.set_reject_by_default(true);
    assert!(gate.addr_blocked(&no_host));
    assert!(gate.addr_blocked(&EndpointAddr::empty()));

    // Rules are irrelevant to the no-host path, even allow rules.
    gate.add_allow(prefix("0.0.0.0/0"));
    assert!(gate.addr_blocked(&no_host));
}

#[test]
fn listings_are_ordered_snapshots() {
    let gate = PrefixGate::new();
    gate.add_deny(prefix("1.2.3.0/24"));
    gate.add_allow(prefix("4.3.2.0/24"));
    gate.add_deny(prefix("fd00::/8"));

    assert_eq!(gate.deny_prefixes(), vec![prefix("1.2.3.0/24"), prefix("fd00::/8")]);
    assert_eq!(gate.allow_prefixes(), vec![prefix("4.3.2.0/24")]);

    // Snapshots, not live views.
    let snapshot = gate.deny_prefixes();
    gate.remove(&prefix("1.2.3.0/24"));
    assert_eq!(snapshot.len(), 2);
    assert_eq!(gate.deny_prefixes(), vec![prefix("fd00::/8")]);
}

#[test]
fn reject_by_default_aliases_default_action() {
    let gate = PrefixGate::new();
    gate.set_reject_by_default(true);
    assert_eq!(gate.default_action(), Action::Deny);

    gate.set_default_action(Action::Allow);
    assert!(!gate.reject_by_default());
}
