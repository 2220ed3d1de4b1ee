//! ## Crate layout
//! - `core`: query nodes, capability traits, expressions, literal
//!   conversion, and term generation.
//!
//! The `prelude` module is the chain-building surface most callers need:
//!
//! ```ignore
//! use docql::prelude::*;
//!
//! let query = table("users")
//!     .get_all_by_index(42, "age_index")
//!     .filter(|u| u.get("active").eq(true))
//!     .order_by(|u| u.get("name"), OrderDirection::Desc)
//!     .limit(10);
//!
//! let term = query.generate_term(&DefaultConverterFactory::default())?;
//! ```

pub use docql_core as core;

//
// Consts
//

/// Workspace version re-export for downstream tooling/tests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use docql_core::TermError as Error;

///
/// Prelude
/// using _ brings traits into scope and avoids name conflicts
///

pub mod prelude {
    pub use crate::core::prelude::*;
}
