//! Campaign Draft (form state store)
//!
//! Field values accumulated across the wizard steps. Writes are plain
//! upserts with no validation; values are checked only when the draft is
//! turned into a [`CampaignSubmission`] (or, in strict mode, per step).
//!
//! Text inputs keep exactly what the user typed. Asset fields may hold a
//! typed [`AssetRef`] or a text path, which is how the terminal UI fills
//! them in.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::core::campaign::Category;

use super::navigator::WizardStep;

// ============================================================================
// Fields
// ============================================================================

/// Names of the fields a draft can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DraftField {
    Name,
    Category,
    Description,
    Target,
    Duration,
    Image,
    Video,
    Documents,
    Details,
}

impl DraftField {
    pub const ALL: [DraftField; 9] = [
        DraftField::Name,
        DraftField::Category,
        DraftField::Description,
        DraftField::Target,
        DraftField::Duration,
        DraftField::Image,
        DraftField::Video,
        DraftField::Documents,
        DraftField::Details,
    ];

    /// Form field name, also used as the multipart part name.
    pub fn as_str(&self) -> &'static str {
        match self {
            DraftField::Name => "name",
            DraftField::Category => "category",
            DraftField::Description => "description",
            DraftField::Target => "target",
            DraftField::Duration => "duration",
            DraftField::Image => "image",
            DraftField::Video => "video",
            DraftField::Documents => "documents",
            DraftField::Details => "details",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DraftField::Name => "Campaign Name",
            DraftField::Category => "Category",
            DraftField::Description => "Description",
            DraftField::Target => "Target Amount",
            DraftField::Duration => "Duration (days)",
            DraftField::Image => "Cover Image",
            DraftField::Video => "Video (URL or file)",
            DraftField::Documents => "Documents",
            DraftField::Details => "Additional Details",
        }
    }

    pub fn is_required(&self) -> bool {
        matches!(
            self,
            DraftField::Name
                | DraftField::Category
                | DraftField::Description
                | DraftField::Target
                | DraftField::Duration
        )
    }

    /// The wizard step that renders this field.
    pub fn step(&self) -> WizardStep {
        match self {
            DraftField::Name | DraftField::Category | DraftField::Description => WizardStep::Info,
            DraftField::Target | DraftField::Duration | DraftField::Image | DraftField::Video => {
                WizardStep::FundingMedia
            }
            DraftField::Documents | DraftField::Details => WizardStep::DocumentsDetails,
        }
    }
}

impl fmt::Display for DraftField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DraftField {
    type Err = DraftValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DraftField::ALL
            .into_iter()
            .find(|f| f.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| DraftValidationError::UnknownField(s.to_string()))
    }
}

// ============================================================================
// Values
// ============================================================================

/// Reference to a binary asset attached to the draft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetRef {
    /// A file on local disk, read at submission time.
    File(PathBuf),
    /// Asset bytes already held in memory.
    Bytes {
        file_name: String,
        content_type: String,
        data: Vec<u8>,
    },
}

impl AssetRef {
    pub fn file(path: impl Into<PathBuf>) -> Self {
        AssetRef::File(path.into())
    }

    /// File name reported to the API.
    pub fn file_name(&self) -> String {
        match self {
            AssetRef::File(path) => path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string()),
            AssetRef::Bytes { file_name, .. } => file_name.clone(),
        }
    }
}

/// A campaign video is either an external link or an uploaded file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VideoSource {
    Url(String),
    Asset(AssetRef),
}

impl VideoSource {
    /// Interpret free text as a link when it looks like one, otherwise as a file path.
    pub fn from_text(text: &str) -> Self {
        let text = text.trim();
        if text.starts_with("http://") || text.starts_with("https://") {
            VideoSource::Url(text.to_string())
        } else {
            VideoSource::Asset(AssetRef::file(text))
        }
    }
}

/// A single stored field value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Asset(AssetRef),
    Assets(Vec<AssetRef>),
    Video(VideoSource),
}

impl FieldValue {
    pub fn text(text: impl Into<String>) -> Self {
        FieldValue::Text(text.into())
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Blank text and empty asset lists count as "not filled in".
    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Text(text) => text.trim().is_empty(),
            FieldValue::Assets(assets) => assets.is_empty(),
            FieldValue::Asset(_) | FieldValue::Video(_) => false,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            FieldValue::Text(_) => "text",
            FieldValue::Asset(_) => "asset",
            FieldValue::Assets(_) => "asset list",
            FieldValue::Video(_) => "video",
        }
    }
}

// ============================================================================
// Errors
// ============================================================================

/// Problems found when checking a draft.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DraftValidationError {
    #[error("Missing required field: {0}")]
    MissingField(DraftField),

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: DraftField, reason: String },

    #[error("Field {field} cannot hold a {found} value")]
    WrongKind { field: DraftField, found: &'static str },

    #[error("Unknown field: {0}")]
    UnknownField(String),
}

impl DraftValidationError {
    /// The field the error is about, if any.
    pub fn field(&self) -> Option<DraftField> {
        match self {
            DraftValidationError::MissingField(field)
            | DraftValidationError::InvalidValue { field, .. }
            | DraftValidationError::WrongKind { field, .. } => Some(*field),
            DraftValidationError::UnknownField(_) => None,
        }
    }
}

// ============================================================================
// CampaignDraft
// ============================================================================

/// In-progress campaign data, keyed by field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CampaignDraft {
    values: BTreeMap<DraftField, FieldValue>,
}

/// A draft that passed validation, with every value in its final type.
#[derive(Debug, Clone, PartialEq)]
pub struct CampaignSubmission {
    pub name: String,
    pub category: Category,
    pub description: String,
    pub target: f64,
    pub duration_days: u32,
    pub image: Option<AssetRef>,
    pub video: Option<VideoSource>,
    pub documents: Vec<AssetRef>,
    pub details: Option<String>,
}

impl CampaignDraft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Upsert a field value. Returns the value it replaced.
    pub fn set_field(&mut self, field: DraftField, value: FieldValue) -> Option<FieldValue> {
        self.values.insert(field, value)
    }

    pub fn set_text(&mut self, field: DraftField, text: impl Into<String>) -> Option<FieldValue> {
        self.set_field(field, FieldValue::Text(text.into()))
    }

    pub fn get_field(&self, field: DraftField) -> Option<&FieldValue> {
        self.values.get(&field)
    }

    /// Text content of a field, if it holds text.
    pub fn text(&self, field: DraftField) -> Option<&str> {
        self.get_field(field).and_then(FieldValue::as_text)
    }

    pub fn clear_field(&mut self, field: DraftField) -> Option<FieldValue> {
        self.values.remove(&field)
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.values.values().all(FieldValue::is_empty)
    }

    pub fn is_present(&self, field: DraftField) -> bool {
        self.get_field(field).is_some_and(|v| !v.is_empty())
    }

    /// Required fields that are absent or blank, in field order.
    pub fn missing_required(&self) -> Vec<DraftField> {
        DraftField::ALL
            .into_iter()
            .filter(|f| f.is_required() && !self.is_present(*f))
            .collect()
    }

    /// Check only the fields rendered on `step`.
    pub fn validate_step(&self, step: WizardStep) -> Result<(), DraftValidationError> {
        for field in step.fields() {
            if field.is_required() && !self.is_present(*field) {
                return Err(DraftValidationError::MissingField(*field));
            }
        }
        if step.fields().contains(&DraftField::Category) {
            self.category()?;
        }
        if step.fields().contains(&DraftField::Target) {
            self.target()?;
        }
        if step.fields().contains(&DraftField::Duration) {
            self.duration_days()?;
        }
        Ok(())
    }

    /// Check the whole draft and produce the typed submission.
    pub fn validate(&self) -> Result<CampaignSubmission, DraftValidationError> {
        if let Some(field) = self.missing_required().into_iter().next() {
            return Err(DraftValidationError::MissingField(field));
        }

        Ok(CampaignSubmission {
            name: self.required_text(DraftField::Name)?,
            category: self.category()?,
            description: self.required_text(DraftField::Description)?,
            target: self.target()?,
            duration_days: self.duration_days()?,
            image: self.image()?,
            video: self.video()?,
            documents: self.documents()?,
            details: self.optional_text(DraftField::Details)?,
        })
    }

    // ------------------------------------------------------------------------
    // Typed accessors
    // ------------------------------------------------------------------------

    fn required_text(&self, field: DraftField) -> Result<String, DraftValidationError> {
        self.optional_text(field)?
            .ok_or(DraftValidationError::MissingField(field))
    }

    fn optional_text(&self, field: DraftField) -> Result<Option<String>, DraftValidationError> {
        match self.get_field(field) {
            None => Ok(None),
            Some(FieldValue::Text(text)) if text.trim().is_empty() => Ok(None),
            Some(FieldValue::Text(text)) => Ok(Some(text.trim().to_string())),
            Some(other) => Err(DraftValidationError::WrongKind { field, found: other.kind() }),
        }
    }

    fn category(&self) -> Result<Category, DraftValidationError> {
        let text = self.required_text(DraftField::Category)?;
        text.parse().map_err(|_| DraftValidationError::InvalidValue {
            field: DraftField::Category,
            reason: format!("'{text}' is not one of Health, Education, Disaster Relief"),
        })
    }

    fn target(&self) -> Result<f64, DraftValidationError> {
        let text = self.required_text(DraftField::Target)?;
        match text.parse::<f64>() {
            Ok(value) if value.is_finite() && value > 0.0 => Ok(value),
            _ => Err(DraftValidationError::InvalidValue {
                field: DraftField::Target,
                reason: format!("'{text}' is not a positive amount"),
            }),
        }
    }

    fn duration_days(&self) -> Result<u32, DraftValidationError> {
        let text = self.required_text(DraftField::Duration)?;
        match text.parse::<u32>() {
            Ok(days) if days > 0 => Ok(days),
            _ => Err(DraftValidationError::InvalidValue {
                field: DraftField::Duration,
                reason: format!("'{text}' is not a positive number of days"),
            }),
        }
    }

    fn image(&self) -> Result<Option<AssetRef>, DraftValidationError> {
        match self.get_field(DraftField::Image) {
            None => Ok(None),
            Some(value) if value.is_empty() => Ok(None),
            Some(FieldValue::Asset(asset)) => Ok(Some(asset.clone())),
            Some(FieldValue::Text(path)) => Ok(Some(AssetRef::file(path.trim()))),
            Some(other) => Err(DraftValidationError::WrongKind {
                field: DraftField::Image,
                found: other.kind(),
            }),
        }
    }

    fn video(&self) -> Result<Option<VideoSource>, DraftValidationError> {
        match self.get_field(DraftField::Video) {
            None => Ok(None),
            Some(value) if value.is_empty() => Ok(None),
            Some(FieldValue::Video(video)) => Ok(Some(video.clone())),
            Some(FieldValue::Asset(asset)) => Ok(Some(VideoSource::Asset(asset.clone()))),
            Some(FieldValue::Text(text)) => Ok(Some(VideoSource::from_text(text))),
            Some(other) => Err(DraftValidationError::WrongKind {
                field: DraftField::Video,
                found: other.kind(),
            }),
        }
    }

    fn documents(&self) -> Result<Vec<AssetRef>, DraftValidationError> {
        match self.get_field(DraftField::Documents) {
            None => Ok(Vec::new()),
            Some(FieldValue::Assets(assets)) => Ok(assets.clone()),
            Some(FieldValue::Asset(asset)) => Ok(vec![asset.clone()]),
            // One path per line or comma-separated
            Some(FieldValue::Text(text)) => Ok(text
                .split([',', '\n'])
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(|p| AssetRef::File(Path::new(p).to_path_buf()))
                .collect()),
            Some(other) => Err(DraftValidationError::WrongKind {
                field: DraftField::Documents,
                found: other.kind(),
            }),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
