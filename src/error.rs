use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::volume_loader::VolumeLoaderError;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("input file not found: {}", .path.display())]
    InputNotFound { path: PathBuf },

    #[error("invalid value {value} for `{name}`: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: String,
        reason: &'static str,
    },

    #[error("volume is empty")]
    EmptyInput,

    #[error("mask shape {mask:?} does not match volume shape {volume:?}")]
    ShapeMismatch {
        volume: (usize, usize, usize),
        mask: (usize, usize, usize),
    },

    #[error("failed to write animation to {}: {reason}", .path.display())]
    Encoding { path: PathBuf, reason: String },

    #[error(transparent)]
    Load(#[from] VolumeLoaderError),
}

impl Error {
    pub(crate) fn encoding(path: &Path, reason: impl ToString) -> Self {
        Self::Encoding {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn invalid(name: &'static str, value: impl ToString, reason: &'static str) -> Self {
        Self::InvalidParameter {
            name,
            value: value.to_string(),
            reason,
        }
    }
}
