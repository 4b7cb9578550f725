//! pidmint-registry: registration engine for persistent identifiers
//!
//! This crate drives the identifier lifecycle against a DataCite-style MDS
//! registry:
//! - Retry-capable HTTP transport with basic auth and linear backoff
//! - The draft/findable state machine deciding create vs. update paths
//! - The schema-transformer seam with optional debug snapshots
//!
//! The pure building blocks (fields, records, minting, config) live in
//! `pidmint-core`.

pub mod error;
pub mod lifecycle;
pub mod retry;
pub mod shutdown;
pub mod transform;
pub mod transport;

// Re-export main types for convenience
pub use error::{RegistryError, Result, TransformError, TransportError};
pub use lifecycle::{
    classify, needs_promotion, plan_create, plan_update, LifecycleState, Registrar, Registration,
    RegistrationAction, RegistryCall,
};
pub use retry::{retry_with_backoff, RetryError, RetryPolicy};
pub use shutdown::{pair as shutdown_pair, ShutdownHandle, ShutdownSignal};
pub use transform::{SchemaTransformer, SNAPSHOT_IN, SNAPSHOT_OUT};
pub use transport::{HttpTransport, RegistryClient, RegistryResponse, RequestBody};
