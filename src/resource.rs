//! The `prismacloudcompute_policies_compliance_host` resource.
//!
//! Handlers take the typed API client explicitly and operate on a
//! [`ResourceData`] bag. Create, update and delete run under the timeouts
//! declared in the resource schema.

mod expand;
mod flatten;
mod schema;

pub use expand::{parse_policy, parse_rules};
pub use flatten::{flatten_rules, save_policy};
pub use schema::{DEFAULT_POLICY_TYPE, RESOURCE_TYPE, compliance_host_schema};

use std::future::Future;
use std::time::Duration;

use thiserror::Error;

use crate::poll::{PollConfig, poll_until_success};
use crate::prisma::{PolicyApi, PrismaError};
use crate::schema::{Importer, ResourceTimeouts};
use crate::terraform::ResourceData;

#[derive(Debug, Error)]
pub enum ResourceError {
    #[error(transparent)]
    Api(#[from] PrismaError),

    #[error("{operation} timed out after {}s", .timeout.as_secs())]
    Timeout {
        operation: &'static str,
        timeout: Duration,
    },

    #[error("resource '{type_name}' does not support import")]
    NotImportable { type_name: &'static str },
}

pub struct ComplianceHostResource<A> {
    api: A,
    poll: PollConfig,
    timeouts: ResourceTimeouts,
}

impl<A: PolicyApi> ComplianceHostResource<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            poll: PollConfig::default(),
            timeouts: compliance_host_schema().timeouts,
        }
    }

    pub fn with_poll(mut self, poll: PollConfig) -> Self {
        self.poll = poll;
        self
    }

    pub fn with_timeouts(mut self, timeouts: ResourceTimeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// A fresh attribute bag bound to this resource's schema.
    pub fn new_data() -> ResourceData {
        ResourceData::new(&compliance_host_schema().block)
    }

    pub async fn create(&self, d: &mut ResourceData) -> Result<(), ResourceError> {
        with_timeout("create", self.timeouts.create, self.create_inner(d)).await
    }

    async fn create_inner(&self, d: &mut ResourceData) -> Result<(), ResourceError> {
        let policy = parse_policy(d, "");
        tracing::info!(rules = policy.rules.len(), "creating compliance host policy");

        self.api.create(&policy).await?;

        let outcome = poll_until_success(&self.poll, || self.api.get()).await;
        if !outcome.succeeded {
            tracing::warn!(
                attempts = outcome.attempts,
                "policy not visible after polling, fetching anyway"
            );
        }

        let canonical = self.api.get().await?;
        d.set_id(canonical.policy_id);
        tracing::info!(id = %d.id(), "compliance host policy created");

        self.read(d).await
    }

    /// A policy that no longer exists remotely clears the id instead of failing.
    pub async fn read(&self, d: &mut ResourceData) -> Result<(), ResourceError> {
        let policy = match self.api.get().await {
            Ok(policy) => policy,
            Err(e) if e.is_not_found() => {
                tracing::info!(id = %d.id(), "compliance host policy gone, removing from state");
                d.set_id("");
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        };

        save_policy(d, &policy);
        Ok(())
    }

    pub async fn update(&self, d: &mut ResourceData) -> Result<(), ResourceError> {
        with_timeout("update", self.timeouts.update, self.update_inner(d)).await
    }

    async fn update_inner(&self, d: &mut ResourceData) -> Result<(), ResourceError> {
        let id = d.id().to_string();
        let policy = parse_policy(d, &id);
        tracing::info!(id = %id, rules = policy.rules.len(), "updating compliance host policy");

        self.api.update(&policy).await?;
        self.read(d).await
    }

    // NOTE: The console has no delete for this policy; only local state is dropped.
    pub async fn delete(&self, d: &mut ResourceData) -> Result<(), ResourceError> {
        with_timeout("delete", self.timeouts.delete, async {
            tracing::info!(id = %d.id(), "removing compliance host policy from state, remote policy left in place");
            d.set_id("");
            Ok::<(), ResourceError>(())
        })
        .await
    }

    /// Imports through the importer declared on the schema, then reads.
    pub async fn import(&self, id: &str) -> Result<ResourceData, ResourceError> {
        let schema = compliance_host_schema();
        let mut d = Self::new_data();
        match schema.importer {
            Some(Importer::Passthrough) => d.set_id(id),
            None => {
                return Err(ResourceError::NotImportable {
                    type_name: schema.type_name,
                });
            }
        }
        self.read(&mut d).await?;
        Ok(d)
    }
}

async fn with_timeout<F>(
    operation: &'static str,
    timeout: Duration,
    fut: F,
) -> Result<(), ResourceError>
where
    F: Future<Output = Result<(), ResourceError>>,
{
    tokio::time::timeout(timeout, fut)
        .await
        .map_err(|_| ResourceError::Timeout { operation, timeout })?
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_error_display() {
        let err = ResourceError::Timeout {
            operation: "create",
            timeout: Duration::from_secs(600),
        };
        assert_eq!(err.to_string(), "create timed out after 600s");
    }

    #[test]
    fn test_not_importable_display() {
        let err = ResourceError::NotImportable {
            type_name: RESOURCE_TYPE,
        };
        assert_eq!(
            err.to_string(),
            "resource 'prismacloudcompute_policies_compliance_host' does not support import"
        );
    }

    #[test]
    fn test_api_error_is_transparent() {
        let err: ResourceError = PrismaError::Api {
            status: 500,
            message: "internal".to_string(),
        }
        .into();
        assert_eq!(err.to_string(), "API error (500): internal");
    }

    #[test]
    fn test_new_data_is_bound_to_schema() {
        let d = ComplianceHostResource::<crate::prisma::PrismaClient>::new_data();
        assert_eq!(d.id(), "");
        assert_eq!(
            d.get("policytype"),
            Some(&serde_json::json!(DEFAULT_POLICY_TYPE))
        );
    }
}
