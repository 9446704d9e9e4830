use derive_more::Display;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Display, Clone, PartialEq)]
pub enum SError {
    #[display("Parse error: {_0}")]
    ParseError(String),
    #[display("IO error: {_0}")]
    IOError(String),
    #[display("Mod not found: {_0}")]
    ModNotFound(String),
    #[display("Profile not found: {_0}")]
    ProfileNotFound(String),
    #[display("Group not found: {_0}")]
    GroupNotFound(String),
    #[display("Group already exists: {_0}")]
    DuplicateGroup(String),
    #[display("Archive error: {_0}")]
    ArchiveError(String),
    #[display("Async runtime error: {_0}")]
    AsyncRuntimeError(String),
    #[display("Task context was not provided")]
    ContextUnprovided,
    #[display("Failed to update task status: {_0}")]
    UpdateStatusError(String),
}

impl std::error::Error for SError {}

impl From<std::io::Error> for SError {
    fn from(e: std::io::Error) -> Self {
        SError::IOError(e.to_string())
    }
}

impl From<serde_json::Error> for SError {
    fn from(e: serde_json::Error) -> Self {
        SError::ParseError(e.to_string())
    }
}

impl From<zip::result::ZipError> for SError {
    fn from(e: zip::result::ZipError) -> Self {
        SError::ArchiveError(e.to_string())
    }
}

impl From<ini::Error> for SError {
    fn from(e: ini::Error) -> Self {
        match e {
            ini::Error::Io(io) => SError::IOError(io.to_string()),
            ini::Error::Parse(p) => SError::ParseError(p.to_string()),
        }
    }
}

impl From<std::path::StripPrefixError> for SError {
    fn from(e: std::path::StripPrefixError) -> Self {
        SError::ParseError(e.to_string())
    }
}
