use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_ec2::Client;
use aws_sdk_ec2::error::DisplayErrorContext;
use aws_sdk_ec2::types::{Filter, InstanceStateName, InstanceType, Tag as Ec2Tag};
use tracing::info;

use crate::types::{
    DescribedInstance, InstanceId, InstanceState, LaunchSpec, Reservation, StateChange, Tag,
    TagFilter,
};
use crate::{Error, InstanceOps, Result};

/// EC2-backed implementation of [`InstanceOps`].
///
/// Holds one authenticated SDK client built from ambient credential and
/// region configuration. The handle is read-only after construction.
pub struct Ec2Provider {
    client: Client,
    region: String,
}

impl Ec2Provider {
    /// Build from ambient AWS configuration (env vars, shared config files,
    /// instance profile). Fails if no credentials provider resolves.
    pub async fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let config = aws_config::defaults(BehaviorVersion::latest()).load().await;
        if config.credentials_provider().is_none() {
            return Err(Error::NoCredentials);
        }

        let region = config
            .region()
            .map(|r| r.as_ref().to_string())
            .unwrap_or_else(|| "us-east-1".into());

        info!(%region, "ec2: client configured");

        Ok(Self {
            client: Client::new(&config),
            region,
        })
    }

    fn parse_state(state: Option<&InstanceStateName>) -> InstanceState {
        match state {
            Some(InstanceStateName::Pending) => InstanceState::Pending,
            Some(InstanceStateName::Running) => InstanceState::Running,
            Some(InstanceStateName::ShuttingDown) => InstanceState::ShuttingDown,
            Some(InstanceStateName::Stopping) | Some(InstanceStateName::Stopped) => {
                InstanceState::Stopped
            }
            Some(InstanceStateName::Terminated) => InstanceState::Terminated,
            _ => InstanceState::Unknown,
        }
    }
}

#[async_trait]
impl InstanceOps for Ec2Provider {
    async fn launch(&self, spec: &LaunchSpec) -> Result<Vec<InstanceId>> {
        let resp = self
            .client
            .run_instances()
            .image_id(&spec.image_id)
            .instance_type(InstanceType::from(spec.instance_type.as_str()))
            .min_count(spec.count)
            .max_count(spec.count)
            .send()
            .await
            .map_err(|e| Error::Api(format!("run instances: {}", DisplayErrorContext(e))))?;

        let ids: Vec<InstanceId> = resp
            .instances()
            .iter()
            .filter_map(|i| i.instance_id().map(|id| InstanceId(id.to_string())))
            .collect();

        info!(count = ids.len(), region = %self.region, "ec2: instances launched");

        Ok(ids)
    }

    async fn tag(&self, resources: &[InstanceId], tags: &[Tag]) -> Result<()> {
        let mut req = self.client.create_tags();
        for r in resources {
            req = req.resources(&r.0);
        }
        for t in tags {
            req = req.tags(Ec2Tag::builder().key(&t.key).value(&t.value).build());
        }

        req.send()
            .await
            .map_err(|e| Error::Api(format!("create tags: {}", DisplayErrorContext(e))))?;

        info!(resources = resources.len(), "ec2: tags created");
        Ok(())
    }

    async fn describe(&self, filter: &TagFilter) -> Result<Vec<Reservation>> {
        let resp = self
            .client
            .describe_instances()
            .filters(
                Filter::builder()
                    .name(&filter.name)
                    .set_values(Some(filter.values.clone()))
                    .build(),
            )
            .send()
            .await
            .map_err(|e| Error::Api(format!("describe instances: {}", DisplayErrorContext(e))))?;

        let reservations = resp
            .reservations()
            .iter()
            .map(|r| Reservation {
                instances: r
                    .instances()
                    .iter()
                    .filter_map(|i| {
                        i.instance_id().map(|id| DescribedInstance {
                            id: InstanceId(id.to_string()),
                            tags: i
                                .tags()
                                .iter()
                                .filter_map(|t| match (t.key(), t.value()) {
                                    (Some(k), Some(v)) => Some(Tag {
                                        key: k.to_string(),
                                        value: v.to_string(),
                                    }),
                                    _ => None,
                                })
                                .collect(),
                        })
                    })
                    .collect(),
            })
            .collect();

        Ok(reservations)
    }

    async fn terminate(&self, ids: &[InstanceId], dry_run: bool) -> Result<Vec<StateChange>> {
        let mut req = self.client.terminate_instances().dry_run(dry_run);
        for id in ids {
            req = req.instance_ids(&id.0);
        }

        let resp = req
            .send()
            .await
            .map_err(|e| Error::Api(format!("terminate instances: {}", DisplayErrorContext(e))))?;

        let changes: Vec<StateChange> = resp
            .terminating_instances()
            .iter()
            .filter_map(|t| {
                t.instance_id().map(|id| StateChange {
                    id: InstanceId(id.to_string()),
                    previous: Self::parse_state(t.previous_state().and_then(|s| s.name())),
                    current: Self::parse_state(t.current_state().and_then(|s| s.name())),
                })
            })
            .collect();

        info!(count = changes.len(), "ec2: instances terminating");

        Ok(changes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_provider_states() {
        assert_eq!(
            Ec2Provider::parse_state(Some(&InstanceStateName::Running)),
            InstanceState::Running
        );
        assert_eq!(
            Ec2Provider::parse_state(Some(&InstanceStateName::ShuttingDown)),
            InstanceState::ShuttingDown
        );
        assert_eq!(
            Ec2Provider::parse_state(Some(&InstanceStateName::Stopping)),
            InstanceState::Stopped
        );
        assert_eq!(Ec2Provider::parse_state(None), InstanceState::Unknown);
    }
}
