//! Top-level facade crate for netfence.
//!
//! Re-exports core types and the gate library so users can depend on a single crate.

pub mod core {
    pub use netfence_core::*;
}

pub mod gate {
    pub use netfence_gate::*;
}
