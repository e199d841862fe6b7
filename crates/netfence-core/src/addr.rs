//! Composite dial address (`/proto/value/...`).
//!
//! A dial address stacks transport layers, e.g. `/ip4/1.2.3.4/tcp/123`.
//! The gate only ever interprets the leading segment (the host layer);
//! everything after it rides along untouched, so segment parsing here is
//! deliberately thin: components are chunked pairwise into
//! `(protocol, value)` and a trailing protocol without a value is kept
//! valueless.

use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::str::FromStr;

use crate::error::NetFenceError;

/// One `/proto/value` layer of a composite address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    /// Protocol name (e.g. `"ip4"`, `"tcp"`).
    pub proto: String,
    /// Protocol value, if the layer carries one (e.g. `"1.2.3.4"`, `"80"`).
    pub value: Option<String>,
}

/// A multi-segment dial address such as `/ip4/1.2.3.4/tcp/123`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EndpointAddr {
    segments: Vec<Segment>,
}

impl EndpointAddr {
    /// Address with no segments. Carries no host, so the gate resolves it
    /// to the default action.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Extract the host IP from the leading segment.
    ///
    /// Returns `None` when the address is empty, the leading layer is not
    /// `ip4`/`ip6`, or its value is not a parseable IP literal of that
    /// family. Callers treat all of these the same way: the address has no
    /// usable host.
    pub fn host_ip(&self) -> Option<IpAddr> {
        let seg = self.segments.first()?;
        let value = seg.value.as_deref()?;
        match seg.proto.as_str() {
            "ip4" => value.parse::<Ipv4Addr>().ok().map(IpAddr::V4),
            "ip6" => value.parse::<Ipv6Addr>().ok().map(IpAddr::V6),
            _ => None,
        }
    }
}

impl FromStr for EndpointAddr {
    type Err = NetFenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rest = s.strip_prefix('/').ok_or_else(|| {
            NetFenceError::InvalidAddr(format!("{s} (expected leading '/')"))
        })?;

        let mut segments = Vec::new();
        let mut parts = rest.split('/');
        while let Some(proto) = parts.next() {
            if proto.is_empty() {
                return Err(NetFenceError::InvalidAddr(format!(
                    "{s} (empty component)"
                )));
            }
            let value = parts.next();
            if value == Some("") {
                return Err(NetFenceError::InvalidAddr(format!(
                    "{s} (empty component)"
                )));
            }
            segments.push(Segment {
                proto: proto.to_string(),
                value: value.map(str::to_string),
            });
        }

        Ok(Self { segments })
    }
}

impl fmt::Display for EndpointAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for seg in &self.segments {
            write!(f, "/{}", seg.proto)?;
            if let Some(v) = &seg.value {
                write!(f, "/{v}")?;
            }
        }
        Ok(())
    }
}
