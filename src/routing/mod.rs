//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Routing key (extracted from the request body)
//!     → router.rs (normalize, exact condition match)
//!     → Return: origin URL (default origin for unknown keys)
//!
//! Router construction (at startup):
//!     OriginConfig
//!     → Freeze as immutable ConditionRouter
//!     → Shared via Arc with every request task
//! ```
//!
//! # Design Decisions
//! - Router built at startup, immutable at runtime
//! - Exact match only, no prefix or pattern matching
//! - Deterministic: same key always resolves to the same origin
//! - No no-match outcome: unknown keys take the default origin

pub mod router;

pub use router::{Condition, ConditionRouter};
