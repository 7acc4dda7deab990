use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque provider-side instance identifier (e.g. `i-0abc123def456`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InstanceId(pub String);

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A key/value label attached to one or more instances. Not unique: several
/// instances may carry the same tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub key: String,
    pub value: String,
}

/// Specification for launching instances.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchSpec {
    pub image_id: String,
    pub instance_type: String,
    pub count: i32,
}

impl LaunchSpec {
    /// Spec requesting exactly one instance.
    pub fn single(image_id: impl Into<String>, instance_type: impl Into<String>) -> Self {
        Self {
            image_id: image_id.into(),
            instance_type: instance_type.into(),
            count: 1,
        }
    }
}

/// Filter selecting instances whose tag matches any of the listed values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagFilter {
    pub name: String,
    pub values: Vec<String>,
}

impl TagFilter {
    /// Filter on `tag:<key>` matching any of `values`.
    pub fn tag(key: &str, values: Vec<String>) -> Self {
        Self {
            name: format!("tag:{key}"),
            values,
        }
    }
}

/// One provider-side grouping of described instances (an EC2 reservation).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reservation {
    pub instances: Vec<DescribedInstance>,
}

/// An instance returned by a describe call, with its tags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescribedInstance {
    pub id: InstanceId,
    pub tags: Vec<Tag>,
}

/// Provider-reported instance state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstanceState {
    Pending,
    Running,
    ShuttingDown,
    Stopped,
    Terminated,
    Unknown,
}

impl InstanceState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Running => "running",
            Self::ShuttingDown => "shutting-down",
            Self::Stopped => "stopped",
            Self::Terminated => "terminated",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for InstanceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// State transition reported by the provider for one terminated instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateChange {
    pub id: InstanceId,
    pub previous: InstanceState,
    pub current: InstanceState,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_spec_requests_one_instance() {
        let spec = LaunchSpec::single("ami-0d0ca2066b861631c", "t2.micro");
        assert_eq!(spec.count, 1);
        assert_eq!(spec.image_id, "ami-0d0ca2066b861631c");
        assert_eq!(spec.instance_type, "t2.micro");
    }

    #[test]
    fn tag_filter_prefixes_key() {
        let filter = TagFilter::tag("env", vec!["dev".into(), "staging".into()]);
        assert_eq!(filter.name, "tag:env");
        assert_eq!(filter.values, vec!["dev", "staging"]);
    }

    #[test]
    fn state_display() {
        assert_eq!(InstanceState::ShuttingDown.to_string(), "shutting-down");
        assert_eq!(InstanceState::Unknown.to_string(), "unknown");
    }
}
