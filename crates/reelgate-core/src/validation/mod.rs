//! Validation modules

pub mod media;
pub mod request;

use serde::Serialize;

pub use media::{content_type_for, MediaKind, DEFAULT_CONTENT_TYPE};
pub use request::validate_upload_request;

/// A field the upload form must fill before it can be submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum RequiredField {
    LogLine,
    ProductionYear,
    Star1,
    PrimaryFile,
    AuxiliaryFiles,
}

impl RequiredField {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequiredField::LogLine => "logLine",
            RequiredField::ProductionYear => "productionYear",
            RequiredField::Star1 => "star1",
            RequiredField::PrimaryFile => "primaryFile",
            RequiredField::AuxiliaryFiles => "auxiliaryFiles",
        }
    }

    pub(crate) fn join(fields: &[RequiredField]) -> String {
        fields
            .iter()
            .map(RequiredField::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl std::fmt::Display for RequiredField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
