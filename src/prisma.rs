mod client;
mod error;
mod types;

pub use client::PrismaClient;
pub use error::PrismaError;
pub use types::{
    Collection, Condition, CveRule, Expiration, License, Policy, Rule, TagRule, Threshold,
    Vulnerability,
};

use async_trait::async_trait;

pub const COMPLIANCE_HOST_ENDPOINT: &str = "policies/compliance/host";

/// Remote operations on the compliance host policy.
///
/// The console keeps a single policy object per deployment, so `get` takes
/// no key beyond the client session.
#[async_trait]
pub trait PolicyApi: Send + Sync {
    async fn create(&self, policy: &Policy) -> Result<(), PrismaError>;
    async fn get(&self) -> Result<Policy, PrismaError>;
    async fn update(&self, policy: &Policy) -> Result<(), PrismaError>;
}

#[async_trait]
impl PolicyApi for PrismaClient {
    // NOTE: The console upserts on PUT; create and update share the call.
    async fn create(&self, policy: &Policy) -> Result<(), PrismaError> {
        self.put_json(COMPLIANCE_HOST_ENDPOINT, policy).await
    }

    async fn get(&self) -> Result<Policy, PrismaError> {
        self.get_json(COMPLIANCE_HOST_ENDPOINT).await
    }

    async fn update(&self, policy: &Policy) -> Result<(), PrismaError> {
        self.put_json(COMPLIANCE_HOST_ENDPOINT, policy).await
    }
}
