//! Policy layer (rule table, actions).
//!
//! Holds the ordered allow/deny prefix table and the decision logic the
//! dialing layer consults at runtime.

pub mod gate;
pub mod rules;

pub use gate::PrefixGate;
pub use rules::{Action, PrefixRule};
