use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoreErrorCode {
    Io,
    Parse,
    DanglingReference,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoreError {
    #[error("failed to read {}: {message}", path.display())]
    Io { path: PathBuf, message: String },
    #[error("{message}")]
    Parse { message: String },
    #[error(
        "activity {activity} references item {item_hash} in drop list {drop_list}, but the catalog has no such item"
    )]
    DanglingItem {
        activity: String,
        drop_list: String,
        item_hash: u32,
    },
}

impl CoreError {
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }

    pub fn code(&self) -> CoreErrorCode {
        match self {
            Self::Io { .. } => CoreErrorCode::Io,
            Self::Parse { .. } => CoreErrorCode::Parse,
            Self::DanglingItem { .. } => CoreErrorCode::DanglingReference,
        }
    }
}
