//! Recording substitute for [`InstanceOps`], used by the orchestrator tests
//! in place of the EC2-backed provider.

use std::sync::Mutex;

use async_trait::async_trait;
use vm_infra::types::{
    DescribedInstance, InstanceId, InstanceState, LaunchSpec, Reservation, StateChange, Tag,
    TagFilter,
};
use vm_infra::{Error, InstanceOps, Result};

/// Which operation an injected failure targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Launch,
    Tag,
    Describe,
    Terminate,
}

/// Everything the orchestrators asked of the provider, in call order.
#[derive(Debug, Default)]
pub struct Recorded {
    pub launches: Vec<LaunchSpec>,
    pub tag_calls: Vec<(Vec<InstanceId>, Vec<Tag>)>,
    pub describes: Vec<TagFilter>,
    pub terminates: Vec<(Vec<InstanceId>, bool)>,
}

pub struct RecordingOps {
    recorded: Mutex<Recorded>,
    launch_ids: Vec<InstanceId>,
    reservations: Vec<Reservation>,
    fail: Option<Op>,
}

impl RecordingOps {
    pub fn new() -> Self {
        Self {
            recorded: Mutex::default(),
            launch_ids: vec![InstanceId("i-0123456789abcdef0".into())],
            reservations: Vec::new(),
            fail: None,
        }
    }

    /// IDs the next launch call returns, in order.
    pub fn with_launch_ids(mut self, ids: &[&str]) -> Self {
        self.launch_ids = ids.iter().map(|id| InstanceId((*id).into())).collect();
        self
    }

    /// Reservation groups the next describe call returns; each inner slice
    /// is one group of instance IDs (tags left empty).
    pub fn with_reservations(mut self, groups: &[&[&str]]) -> Self {
        self.reservations = groups
            .iter()
            .map(|ids| Reservation {
                instances: ids
                    .iter()
                    .map(|id| DescribedInstance {
                        id: InstanceId((*id).into()),
                        tags: Vec::new(),
                    })
                    .collect(),
            })
            .collect();
        self
    }

    /// Make `op` fail with an injected API error.
    pub fn failing(mut self, op: Op) -> Self {
        self.fail = Some(op);
        self
    }

    pub fn take_recorded(&self) -> Recorded {
        std::mem::take(&mut self.recorded.lock().unwrap())
    }

    fn check(&self, op: Op) -> Result<()> {
        if self.fail == Some(op) {
            return Err(Error::Api(format!("injected {op:?} failure")));
        }
        Ok(())
    }
}

#[async_trait]
impl InstanceOps for RecordingOps {
    async fn launch(&self, spec: &LaunchSpec) -> Result<Vec<InstanceId>> {
        self.recorded.lock().unwrap().launches.push(spec.clone());
        self.check(Op::Launch)?;
        Ok(self.launch_ids.clone())
    }

    async fn tag(&self, resources: &[InstanceId], tags: &[Tag]) -> Result<()> {
        self.recorded
            .lock()
            .unwrap()
            .tag_calls
            .push((resources.to_vec(), tags.to_vec()));
        self.check(Op::Tag)
    }

    async fn describe(&self, filter: &TagFilter) -> Result<Vec<Reservation>> {
        self.recorded.lock().unwrap().describes.push(filter.clone());
        self.check(Op::Describe)?;
        Ok(self.reservations.clone())
    }

    async fn terminate(&self, ids: &[InstanceId], dry_run: bool) -> Result<Vec<StateChange>> {
        self.recorded
            .lock()
            .unwrap()
            .terminates
            .push((ids.to_vec(), dry_run));
        self.check(Op::Terminate)?;
        Ok(ids
            .iter()
            .map(|id| StateChange {
                id: id.clone(),
                previous: InstanceState::Running,
                current: InstanceState::ShuttingDown,
            })
            .collect())
    }
}
