use tracing::info;
use vm_infra::types::{InstanceId, LaunchSpec, Tag};
use vm_infra::{Error as InfraError, InstanceOps};

use crate::config::LaunchConfig;
use crate::error::CommandError;

/// Launch one instance and tag it with the supplied key/value pair.
///
/// Tagging is part of the creation contract: if it fails the whole command
/// fails, even though the instance itself is already running (it is not
/// rolled back).
pub async fn run(
    ops: &dyn InstanceOps,
    config: &LaunchConfig,
    tag_key: &str,
    tag_value: &str,
) -> Result<InstanceId, CommandError> {
    let spec = LaunchSpec::single(&config.image_id, &config.instance_type);
    info!(image_id = %spec.image_id, instance_type = %spec.instance_type, "launching instance");

    let ids = ops.launch(&spec).await.map_err(CommandError::Launch)?;
    let id = ids
        .into_iter()
        .next()
        .ok_or(CommandError::Launch(InfraError::EmptyLaunch))?;

    let tag = Tag {
        key: tag_key.to_string(),
        value: tag_value.to_string(),
    };
    ops.tag(std::slice::from_ref(&id), std::slice::from_ref(&tag))
        .await
        .map_err(|source| CommandError::Tagging {
            instance: id.clone(),
            source,
        })?;

    println!("Created tagged instance with ID {id}");
    Ok(id)
}

#[cfg(test)]
mod tests {
    use vm_infra::types::{InstanceId, Tag};

    use super::*;
    use crate::commands::testing::{Op, RecordingOps};

    fn config() -> LaunchConfig {
        LaunchConfig {
            instance_type: "t2.micro".into(),
            image_id: "ami-0d0ca2066b861631c".into(),
        }
    }

    #[tokio::test]
    async fn tags_the_launched_instance_exactly_once() {
        let ops = RecordingOps::new().with_launch_ids(&["i-0aaa"]);

        let id = run(&ops, &config(), "env", "dev").await.unwrap();
        assert_eq!(id, InstanceId("i-0aaa".into()));

        let rec = ops.take_recorded();
        assert_eq!(rec.launches.len(), 1);
        assert_eq!(rec.launches[0].count, 1);
        assert_eq!(rec.launches[0].image_id, "ami-0d0ca2066b861631c");
        assert_eq!(rec.launches[0].instance_type, "t2.micro");

        assert_eq!(rec.tag_calls.len(), 1);
        let (resources, tags) = &rec.tag_calls[0];
        assert_eq!(resources.as_slice(), [InstanceId("i-0aaa".into())]);
        assert_eq!(
            tags.as_slice(),
            [Tag {
                key: "env".into(),
                value: "dev".into(),
            }]
        );
    }

    #[tokio::test]
    async fn launch_failure_skips_tagging() {
        let ops = RecordingOps::new().failing(Op::Launch);

        let err = run(&ops, &config(), "env", "dev").await.unwrap_err();
        assert!(matches!(err, CommandError::Launch(_)));
        assert!(err.to_string().starts_with("instance creation failed"));

        assert!(ops.take_recorded().tag_calls.is_empty());
    }

    #[tokio::test]
    async fn tag_failure_is_an_error_without_rollback() {
        let ops = RecordingOps::new()
            .with_launch_ids(&["i-0bbb"])
            .failing(Op::Tag);

        let err = run(&ops, &config(), "env", "dev").await.unwrap_err();
        assert!(matches!(
            err,
            CommandError::Tagging { ref instance, .. } if instance.0 == "i-0bbb"
        ));

        // The live instance is reported, not terminated.
        assert!(ops.take_recorded().terminates.is_empty());
    }

    #[tokio::test]
    async fn empty_launch_response_is_a_creation_error() {
        let ops = RecordingOps::new().with_launch_ids(&[]);

        let err = run(&ops, &config(), "env", "dev").await.unwrap_err();
        assert!(matches!(err, CommandError::Launch(InfraError::EmptyLaunch)));

        assert!(ops.take_recorded().tag_calls.is_empty());
    }
}
