//! Graphforge provisioning workflows
//!
//! Two flows, both owned by the [`Orchestrator`]:
//!
//! - **Golden image**: create a throwaway builder VM, bootstrap the graph
//!   database stack over SSH, run the service once so it initializes its
//!   state, stop it, power the VM off, capture a snapshot, delete the VM.
//! - **Client provisioning**: create a VM from the snapshot, bind a fresh
//!   DNS name and TLS certificate to it, cold-start the service, hand the
//!   connection descriptor back. The VM is the product and is never
//!   deleted.
//!
//! Stages run strictly sequentially; each either succeeds or aborts the
//! flow, except server creation which falls through an ordered region
//! candidate list on capacity rejections.

pub mod cert;
pub mod error;
pub mod orchestrator;
pub mod outcome;
pub mod scripts;
pub mod service;
pub mod stage;

pub use error::{Result, WorkflowError};
pub use orchestrator::{Orchestrator, WorkflowConfig};
pub use outcome::ProvisionedInstance;
pub use stage::Stage;
