// ── Automation policy ──
//
// Policy-driven side effects that run after an alert is recorded:
// auto-watch (watchlist mutation) and alert-save (evidence persistence).

pub mod rules;
pub(crate) mod save;
pub(crate) mod watch;

pub use rules::{AutoWatchRules, AutoWatchRulesUpdate, AutomationConfig, AutomationUpdate};
pub use save::SaveRecord;
