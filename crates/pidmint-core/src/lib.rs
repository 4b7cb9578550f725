//! pidmint-core: domain types for persistent-identifier registration
//!
//! This crate holds the pure building blocks of a registration run:
//! - Content field extraction through a template resolver
//! - Record assembly and the internal XML field-set document
//! - Identifier minting and lifecycle states
//! - The configuration surface
//!
//! Networking and the registration lifecycle live in `pidmint-registry`.

pub mod config;
pub mod document;
pub mod extract;
pub mod field;
pub mod identifier;
pub mod record;

// Re-export main types for convenience
pub use config::{ConfigError, MintConfig, PidmintConfig, ServiceConfig, TransformConfig};
pub use document::{DocumentInfo, PersistError, PidStore};
pub use extract::{extract_fields, ResolutionError, TemplateResolver};
pub use field::{ContentField, FieldSpec};
pub use identifier::{Pid, PidState};
pub use record::{Record, RecordError, ANCHOR_DOCTYPE_FIELD, DOCTYPE_FIELD, IDENTIFIER_FIELD};
