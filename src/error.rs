// Error types shared by the pinning client and the pipeline.
// Transport and decode failures are carried as-is so callers see the
// underlying reqwest / serde_json error unchanged.

use thiserror::Error;

/// Which of the two pinning requests produced an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Image,
    Metadata,
}

#[derive(Error, Debug)]
pub enum UploadError {
    #[error("{} failed with status: {status}", stage_label(*stage))]
    Status { stage: Stage, status: u16 },

    #[error("Fetching source image failed with status: {status}")]
    Fetch { status: u16 },

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error("Pinata token is not a valid header value")]
    InvalidToken,

    #[error("{0} must not be empty")]
    EmptyField(&'static str),
}

impl UploadError {
    /// HTTP status code behind the error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            UploadError::Status { status, .. } | UploadError::Fetch { status } => Some(*status),
            UploadError::Http(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

fn stage_label(stage: Stage) -> &'static str {
    match stage {
        Stage::Image => "Upload",
        Stage::Metadata => "Metadata upload",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_message_carries_code() {
        let err = UploadError::Status {
            stage: Stage::Image,
            status: 500,
        };
        assert_eq!(err.to_string(), "Upload failed with status: 500");

        let err = UploadError::Status {
            stage: Stage::Metadata,
            status: 400,
        };
        assert_eq!(err.to_string(), "Metadata upload failed with status: 400");
        assert_eq!(err.status(), Some(400));
    }

    #[test]
    fn empty_field_names_the_field() {
        let err = UploadError::EmptyField("name");
        assert_eq!(err.to_string(), "name must not be empty");
        assert_eq!(err.status(), None);
    }
}
