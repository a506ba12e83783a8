//! Types library for the match engine
//!
//! Shared definitions for the records exchanged between the match engine and
//! the collaborator services that own needs and offers.
//!
//! # Modules
//! - `ids`: Identifiers (MatchId, NeedId, Sku, PairKey)
//! - `numeric`: Fixed-point score and price helpers
//! - `need`: Demand records and their constraint elements
//! - `offer`: Supply records
//! - `matching`: Match records and single-pair proposals
//! - `collaborator`: Request/response shapes for fulfill and deliver calls
//! - `errors`: Error taxonomy

// Public modules
pub mod ids;
pub mod numeric;
pub mod need;
pub mod offer;
pub mod matching;
pub mod collaborator;
pub mod errors;

// Library version constant
pub const LIB_VERSION: &str = "1.0.0";

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::ids::*;
    pub use crate::numeric::*;
    pub use crate::need::*;
    pub use crate::offer::*;
    pub use crate::matching::*;
    pub use crate::collaborator::*;
    pub use crate::errors::*;
}
