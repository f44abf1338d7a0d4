//! Content records shared by every provider.
//!
//! Addons, TMDB and the fallback dataset all produce these shapes so the
//! response layer never has to care where an item came from.

mod types;

pub use types::*;
