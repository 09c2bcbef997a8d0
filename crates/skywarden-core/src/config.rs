// ── Engine configuration ──
//
// Construction-time tuning. Built by the outer layer (config crate, API
// server) and handed in — the engine never reads config files itself.
// Automation settings are deliberately NOT here: they are hot-mutable
// process state owned by the engine.

use std::path::PathBuf;

/// Configuration for one [`Engine`](crate::Engine) instance.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Directory for alert-save evidence files and batch exports.
    /// Created on demand at first write.
    pub save_dir: PathBuf,

    /// How many trailing upstream alert records a mirror poll ingests.
    pub mirror_limit: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            save_dir: PathBuf::from("./skywarden_saves"),
            mirror_limit: 20,
        }
    }
}
