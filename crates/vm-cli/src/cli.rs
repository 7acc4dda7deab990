use clap::{Parser, ValueEnum};

use crate::error::UsageError;

/// Flag surface. `-c` picks the operation; the remaining flags are checked
/// per operation by [`Cli::into_request`].
#[derive(Debug, Parser)]
#[command(
    name = "vmctl",
    version,
    about = "Provision and de-provision tagged EC2 instances"
)]
pub struct Cli {
    /// Operation to perform
    #[arg(short = 'c', value_enum)]
    pub command: Mode,

    /// Tag key to attach (create) or to filter on (delete)
    #[arg(short = 'n', value_name = "KEY")]
    pub tag_key: Option<String>,

    /// Tag value to attach (create) or comma-separated values to match (delete)
    #[arg(short = 'v', value_name = "VALUE")]
    pub tag_value: Option<String>,

    /// Comma-separated instance IDs to terminate (delete)
    #[arg(short = 'i', value_name = "IDS")]
    pub instance_ids: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    Create,
    Delete,
}

/// A validated command, ready to execute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    Create {
        tag_key: String,
        tag_value: String,
    },
    DeleteByIds {
        ids: String,
    },
    DeleteByTag {
        tag_key: String,
        tag_values: String,
    },
}

impl Cli {
    /// Check that the flags required by the chosen operation are present.
    ///
    /// `delete` has two shapes: `-i` selects deletion by explicit IDs and
    /// takes precedence; otherwise `-n`/`-v` select deletion by tag match.
    pub fn into_request(self) -> Result<Request, UsageError> {
        match self.command {
            Mode::Create => {
                let tag_key = non_empty(self.tag_key).ok_or(UsageError::MissingTag)?;
                let tag_value = non_empty(self.tag_value).ok_or(UsageError::MissingTag)?;
                Ok(Request::Create { tag_key, tag_value })
            }
            Mode::Delete => {
                if let Some(ids) = non_empty(self.instance_ids) {
                    return Ok(Request::DeleteByIds { ids });
                }
                match (non_empty(self.tag_key), non_empty(self.tag_value)) {
                    (Some(tag_key), Some(tag_values)) => Ok(Request::DeleteByTag {
                        tag_key,
                        tag_values,
                    }),
                    _ => Err(UsageError::MissingDeleteSelector),
                }
            }
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}
