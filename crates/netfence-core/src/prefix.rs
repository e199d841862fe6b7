//! Canonical network prefix (CIDR range).
//!
//! `NetPrefix` wraps `ipnet::IpNet` and truncates host bits on every
//! construction path, so `1.2.3.4/24` and `1.2.3.0/24` compare equal.
//! Canonical equality is what the gate matches on for update-in-place
//! insertion and removal.

use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;

use ipnet::IpNet;

use crate::error::NetFenceError;

/// A contiguous range of network addresses: base address + prefix length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NetPrefix(IpNet);

impl NetPrefix {
    /// Wrap a parsed network, truncating any host bits in the base address.
    pub fn new(net: IpNet) -> Self {
        Self(net.trunc())
    }

    /// Base address (canonical, host bits zeroed).
    pub fn addr(&self) -> IpAddr {
        self.0.addr()
    }

    /// Prefix (mask) length in bits.
    pub fn prefix_len(&self) -> u8 {
        self.0.prefix_len()
    }

    /// True if `ip` falls inside this range. An IPv4 prefix never contains
    /// an IPv6 address and vice versa.
    pub fn contains(&self, ip: &IpAddr) -> bool {
        self.0.contains(ip)
    }
}

impl From<IpNet> for NetPrefix {
    fn from(net: IpNet) -> Self {
        Self::new(net)
    }
}

impl FromStr for NetPrefix {
    type Err = NetFenceError;

    /// Parse CIDR notation (`"1.2.3.0/24"`, `"fd00::/8"`). A bare IP
    /// literal is accepted as a full-length host prefix.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(net) = s.parse::<IpNet>() {
            return Ok(Self::new(net));
        }
        s.parse::<IpAddr>()
            .map(|ip| Self(IpNet::from(ip)))
            .map_err(|_| NetFenceError::InvalidPrefix(s.to_string()))
    }
}

impl fmt::Display for NetPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
