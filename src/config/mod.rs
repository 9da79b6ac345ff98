//! Configuration merge system
//!
//! Three layers, last wins:
//! 1. Built-in defaults
//! 2. Config file (`--config`, else ./receipt-verify.toml when present)
//! 3. CLI flags

mod defaults;
mod effective;
mod merge;
mod settings;

pub use defaults::BuiltinDefaults;
pub use effective::{ConfigError, ConfigOrigin, ConfigSource, EffectiveConfig, DEFAULT_CONFIG_FILE};
pub use merge::{deep_merge, merge_layers};
pub use settings::{HashSettings, SchemaSettings, SignatureSettings, VerdictSettings, VerifierSettings};
