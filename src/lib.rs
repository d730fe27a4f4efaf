#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

pub mod assets;
pub mod config;
pub mod dist;
pub mod error;
pub mod manifest;
pub mod models;
pub mod plugin;
pub mod rules;

pub use assets::{AssetCollection, BuildAsset, RawAsset};
pub use config::{PrecacheConfig, RulePolicy};
pub use error::ConfigError;
pub use manifest::{ManifestMode, PreloadStrategy};
pub use plugin::{EmitOutcome, PushRulesPlugin, generate};
pub use rules::GeneratedRules;
