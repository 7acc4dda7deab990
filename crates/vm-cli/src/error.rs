use vm_infra::Error as InfraError;
use vm_infra::types::InstanceId;

use crate::config::ConfigError;

/// Why a flag set was rejected. Detected before the EC2 client is built, so
/// a usage error never reaches the remote API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum UsageError {
    #[error("you must supply a tag key and value (-n KEY -v VALUE)")]
    MissingTag,

    #[error(
        "you must supply instance IDs (-i ID[,ID...]) or a tag filter (-n KEY -v VALUE[,VALUE...])"
    )]
    MissingDeleteSelector,
}

/// A command that started executing and failed. One variant per failing
/// step, each carrying the underlying cause; the first failure ends the run.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("failed to configure EC2 client: {0}")]
    Bootstrap(InfraError),

    #[error("launch configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("instance creation failed: {0}")]
    Launch(InfraError),

    // The instance is live and untagged at this point; it is not rolled
    // back, so the message names it for a follow-up `-c delete -i`.
    #[error("tagging failed, instance {instance} is running untagged: {source}")]
    Tagging {
        instance: InstanceId,
        source: InfraError,
    },

    #[error("lookup failed: {0}")]
    Lookup(InfraError),

    #[error("termination failed: {0}")]
    Terminate(InfraError),
}
