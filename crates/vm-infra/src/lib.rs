pub mod ec2;
pub mod types;

use async_trait::async_trait;

use types::{InstanceId, LaunchSpec, Reservation, StateChange, Tag, TagFilter};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("ec2 api error: {0}")]
    Api(String),

    #[error("no AWS credentials configured (set AWS_ACCESS_KEY_ID/AWS_SECRET_ACCESS_KEY or a shared profile)")]
    NoCredentials,

    #[error("launch returned no instances")]
    EmptyLaunch,
}

pub type Result<T> = std::result::Result<T, Error>;

/// Backend-agnostic interface over the remote instance operations.
///
/// The real implementation ([`ec2::Ec2Provider`]) talks to the EC2 API; tests
/// supply a recording substitute. No operation retries internally: each call
/// either completes or fails once, and the caller decides what happens next.
#[async_trait]
pub trait InstanceOps: Send + Sync {
    /// Launch instances per `spec`, returning their IDs in provider order.
    async fn launch(&self, spec: &LaunchSpec) -> Result<Vec<InstanceId>>;

    /// Attach every tag in `tags` to every resource in `resources`.
    async fn tag(&self, resources: &[InstanceId], tags: &[Tag]) -> Result<()>;

    /// List instances matching `filter`, preserving the provider's grouping.
    async fn describe(&self, filter: &TagFilter) -> Result<Vec<Reservation>>;

    /// Terminate `ids`. `dry_run` is handed to the provider verbatim.
    async fn terminate(&self, ids: &[InstanceId], dry_run: bool) -> Result<Vec<StateChange>>;
}
