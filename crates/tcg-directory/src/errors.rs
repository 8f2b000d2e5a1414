//! Player directory error types.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DirectoryError {
    #[error("this node is not the cluster leader")]
    NotLeader,
}
