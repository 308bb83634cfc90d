//! Core module - the routing & SLA workflow engine

pub mod assistant;
pub mod blob;
pub mod category;
pub mod config;
pub mod portal;
pub mod request;
pub mod routing;
pub mod sla;
pub mod store;
pub mod workflow;

pub use assistant::{Assistant, AssistantError, GroqAssistant};
pub use blob::{allowed_file, BlobError, BlobStore, FsBlobStore};
pub use category::{Category, CategoryInfo, CategoryRegistry, UnknownCategory};
pub use config::Config;
pub use portal::{Portal, PortalError};
pub use request::{
    Attachment, AuditAction, AuditEntry, Request, RequestDraft, RequestId, Status,
};
pub use routing::{Router, Routing};
pub use sla::{sweep, OverdueReport};
pub use store::{RequestFilter, RequestStore, StoreError};
pub use workflow::{WorkflowEngine, WorkflowError};
