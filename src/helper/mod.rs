//! Statically initialized lookup tables: geometry, magic bitboards, and
//! Zobrist keys.
//!
//! Call [`init`] once before constructing any `Position` (the crate-level
//! `Board`/`Position` constructors do this for you). Every lookup function
//! in the submodules panics if called before its table has been built.

pub(crate) mod boards;
pub(crate) mod magic;
pub(crate) mod zobrist;

use crate::error::MagicError;

/// Builds every static table, in dependency order: geometry tables first
/// (pseudo-attacks are generated with a self-contained sliding walk, not a
/// magic-table lookup, so they have no dependency on magic), then magic
/// bitboards, then Zobrist keys. Safe to call more than once; only the
/// first call does any work, and later calls are a cheap no-op check.
#[cold]
pub fn init() -> Result<(), MagicError> {
    tracing::debug!("initializing move-generation substrate tables");
    boards::init();
    magic::init()?;
    zobrist::init();
    tracing::debug!("move-generation substrate tables ready");
    Ok(())
}
