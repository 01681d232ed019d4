//! pcc-policy - Prisma Cloud Compute compliance host policy as a declarative resource
//!
//! A library for mapping the console's compliance host policy onto a typed
//! resource schema with create/read/update/delete handlers.

pub mod config;
pub mod output;
pub mod poll;
pub mod prisma;
pub mod resource;
pub mod schema;
pub mod terraform;

mod error;

pub use config::{ProviderConfig, ProviderSettings};
pub use error::PccError;
pub use poll::{PollConfig, PollOutcome, poll_until_success};
pub use prisma::{Policy, PolicyApi, PrismaClient, PrismaError, Rule};
pub use resource::{ComplianceHostResource, ResourceError};
pub use terraform::{ResourceData, StateFile};
