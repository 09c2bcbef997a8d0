// ── Engine state stores ──
//
// Thread-safe, in-memory, bounded. Nothing here touches disk.

mod alerts;
mod bounded;
mod watchlist;

pub use alerts::AlertLog;
pub(crate) use bounded::BoundedLog;
pub use watchlist::Watchlist;
