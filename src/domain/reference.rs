// src/domain/reference.rs
use crate::constants::{
    MAX_FILE_SIZE_MB, MAX_FILE_SIZE_PDF_MB, MAX_TOTAL_REFERENCES_MB, MAX_PRIORITY, MIN_PRIORITY,
};
use crate::domain::{creation_id, DomainError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

const BYTES_PER_MB: u64 = 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReferenceType {
    #[default]
    Link,
    Pdf,
    Image,
    Ppt,
    Syllabus,
    Other,
}

impl ReferenceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Link => "link",
            Self::Pdf => "pdf",
            Self::Image => "image",
            Self::Ppt => "ppt",
            Self::Syllabus => "syllabus",
            Self::Other => "other",
        }
    }

    /// Every type except `link` is backed by an uploaded file
    pub fn requires_file(&self) -> bool {
        !matches!(self, Self::Link)
    }
}

impl fmt::Display for ReferenceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReferenceType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "link" => Ok(Self::Link),
            "pdf" => Ok(Self::Pdf),
            "image" => Ok(Self::Image),
            "ppt" => Ok(Self::Ppt),
            "syllabus" => Ok(Self::Syllabus),
            "other" => Ok(Self::Other),
            other => Err(DomainError::invalid("reference type", other)),
        }
    }
}

/// Study material metadata. The attached file is never read, only measured.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reference {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: ReferenceType,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
    pub priority: u8,
    pub date_added: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_size: Option<u64>,
}

impl Reference {
    /// Description with empty strings treated as absent
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref().filter(|d| !d.trim().is_empty())
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref().filter(|u| !u.trim().is_empty())
    }
}

/// User input for a new reference, before validation
#[derive(Debug, Clone, Default)]
pub struct ReferenceDraft {
    pub kind: ReferenceType,
    pub name: String,
    pub description: Option<String>,
    pub url: Option<String>,
    pub file: Option<PathBuf>,
    pub file_size: Option<u64>,
    pub priority: u8,
}

impl ReferenceDraft {
    fn is_pdf(&self) -> bool {
        self.kind == ReferenceType::Pdf
            || self
                .file
                .as_deref()
                .and_then(Path::extension)
                .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
    }
}

/// In-memory reference collection with the upload limits enforced on add
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReferenceLibrary {
    #[serde(default, rename = "reference")]
    references: Vec<Reference>,
}

impl ReferenceLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn references(&self) -> &[Reference] {
        &self.references
    }

    pub fn is_empty(&self) -> bool {
        self.references.is_empty()
    }

    pub fn len(&self) -> usize {
        self.references.len()
    }

    pub fn get(&self, id: i64) -> Result<&Reference, DomainError> {
        self.references
            .iter()
            .find(|r| r.id == id)
            .ok_or(DomainError::ReferenceNotFound(id))
    }

    pub fn total_size(&self) -> u64 {
        self.references.iter().filter_map(|r| r.file_size).sum()
    }

    /// Validate and append a reference; the library is unchanged on error
    pub fn add(&mut self, draft: ReferenceDraft) -> Result<&Reference, DomainError> {
        if draft.name.trim().is_empty() {
            return Err(DomainError::MissingField("name"));
        }
        if draft.kind == ReferenceType::Link
            && draft.url.as_deref().map_or(true, |u| u.trim().is_empty())
        {
            return Err(DomainError::MissingField("url"));
        }
        if draft.kind.requires_file() && draft.file.is_none() {
            return Err(DomainError::MissingField("file"));
        }
        if !(MIN_PRIORITY..=MAX_PRIORITY).contains(&draft.priority) {
            return Err(DomainError::InvalidPriority(draft.priority));
        }

        if let Some(size) = draft.file_size {
            let limit_mb = if draft.is_pdf() {
                MAX_FILE_SIZE_PDF_MB
            } else {
                MAX_FILE_SIZE_MB
            };
            if size > limit_mb * BYTES_PER_MB {
                return Err(DomainError::FileTooLarge {
                    name: draft.name,
                    size,
                    limit_mb,
                });
            }
            if self.total_size() + size > MAX_TOTAL_REFERENCES_MB * BYTES_PER_MB {
                return Err(DomainError::TotalSizeExceeded {
                    limit_mb: MAX_TOTAL_REFERENCES_MB,
                });
            }
        }

        // ids are creation-time derived; bump past the newest on collision
        let mut id = creation_id();
        if let Some(max) = self.references.iter().map(|r| r.id).max() {
            id = id.max(max + 1);
        }

        self.references.push(Reference {
            id,
            kind: draft.kind,
            name: draft.name.trim().to_string(),
            description: draft.description.filter(|d| !d.trim().is_empty()),
            url: draft.url.filter(|u| !u.trim().is_empty()),
            file: draft.file,
            priority: draft.priority,
            date_added: Utc::now(),
            file_size: draft.file_size,
        });
        Ok(&self.references[self.references.len() - 1])
    }

    pub fn remove(&mut self, id: i64) -> Result<Reference, DomainError> {
        let index = self
            .references
            .iter()
            .position(|r| r.id == id)
            .ok_or(DomainError::ReferenceNotFound(id))?;
        Ok(self.references.remove(index))
    }

    /// Highest priority first; ties keep insertion order
    pub fn by_priority(&self) -> Vec<&Reference> {
        let mut sorted: Vec<&Reference> = self.references.iter().collect();
        sorted.sort_by(|a, b| b.priority.cmp(&a.priority));
        sorted
    }

    /// e.g. `1.5 MB / 25MB (6.0%)`
    pub fn usage_summary(&self) -> String {
        let total = self.total_size();
        let percentage = total as f64 / (MAX_TOTAL_REFERENCES_MB * BYTES_PER_MB) as f64 * 100.0;
        format!(
            "{} / {}MB ({:.1}%)",
            format_file_size(total),
            MAX_TOTAL_REFERENCES_MB,
            percentage
        )
    }
}

pub fn format_file_size(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} bytes", bytes)
    } else if bytes < BYTES_PER_MB {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / BYTES_PER_MB as f64)
    }
}
