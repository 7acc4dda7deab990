use tracing::info;
use vm_infra::InstanceOps;
use vm_infra::types::{InstanceId, StateChange, TagFilter};

use crate::error::CommandError;

/// Terminate the given comma-separated instance IDs directly.
pub async fn by_ids(ops: &dyn InstanceOps, raw_ids: &str) -> Result<Vec<StateChange>, CommandError> {
    let ids = split_ids(raw_ids);
    println!("Deleting instances {}", join_ids(&ids));

    let changes = ops
        .terminate(&ids, false)
        .await
        .map_err(CommandError::Terminate)?;

    report(&changes);
    Ok(changes)
}

/// Terminate every instance whose `tag_key` tag matches any of the
/// comma-separated `tag_values`.
pub async fn by_tag(
    ops: &dyn InstanceOps,
    tag_key: &str,
    tag_values: &str,
) -> Result<Vec<StateChange>, CommandError> {
    println!("Deleting instances with {tag_key}={tag_values}");

    let filter = TagFilter::tag(tag_key, split_values(tag_values));
    let reservations = ops.describe(&filter).await.map_err(CommandError::Lookup)?;

    // Union across all reservations. An empty match set is still handed to
    // the provider rather than short-circuited locally.
    let ids: Vec<InstanceId> = reservations
        .into_iter()
        .flat_map(|r| r.instances)
        .map(|i| i.id)
        .collect();

    info!(matched = ids.len(), filter = %filter.name, "tag lookup complete");
    println!("Matched instance IDs: {}", join_ids(&ids));

    let changes = ops
        .terminate(&ids, false)
        .await
        .map_err(CommandError::Terminate)?;

    report(&changes);
    Ok(changes)
}

fn report(changes: &[StateChange]) {
    if let Some(first) = changes.first() {
        println!(
            "Terminated instance {} ({} -> {})",
            first.id, first.previous, first.current
        );
    }
}

/// Split a comma-separated ID list, preserving order and dropping empty
/// segments.
fn split_ids(raw: &str) -> Vec<InstanceId> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| InstanceId(s.to_string()))
        .collect()
}

fn split_values(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn join_ids(ids: &[InstanceId]) -> String {
    ids.iter()
        .map(|id| id.0.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
