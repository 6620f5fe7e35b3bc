//! Request and response bodies for the campaign API.

use std::path::Path;

use serde::Deserialize;

use crate::core::campaign::{CampaignId, CampaignStatus, Category};

/// A binary part of the creation request, already read into memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetPart {
    pub file_name: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

impl AssetPart {
    pub fn new(file_name: impl Into<String>, data: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let content_type = content_type_for(Path::new(&file_name)).to_string();
        Self {
            file_name,
            content_type,
            data,
        }
    }
}

/// Body of `POST /campaigns`, sent as `multipart/form-data`.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCampaignRequest {
    pub name: String,
    pub category: Category,
    pub description: String,
    pub target: f64,
    pub duration_days: u32,
    pub details: Option<String>,
    /// External video link; mutually exclusive with `video`.
    pub video_url: Option<String>,
    pub image: Option<AssetPart>,
    pub video: Option<AssetPart>,
    pub documents: Vec<AssetPart>,
}

impl NewCampaignRequest {
    /// Plain text form fields in a stable order.
    pub fn text_fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = vec![
            ("name", self.name.clone()),
            ("category", self.category.label().to_string()),
            ("description", self.description.clone()),
            ("target", self.target.to_string()),
            ("duration", self.duration_days.to_string()),
        ];
        if let Some(details) = &self.details {
            fields.push(("details", details.clone()));
        }
        if let Some(url) = &self.video_url {
            fields.push(("video", url.clone()));
        }
        fields
    }

    /// Binary parts keyed by form field name. Documents repeat the same key.
    pub fn file_parts(&self) -> Vec<(&'static str, &AssetPart)> {
        let mut parts = Vec::new();
        if let Some(image) = &self.image {
            parts.push(("image", image));
        }
        if let Some(video) = &self.video {
            parts.push(("video", video));
        }
        parts.extend(self.documents.iter().map(|d| ("documents", d)));
        parts
    }
}

/// Body of `PATCH /campaigns/{id}`.
#[derive(Debug, Clone, serde::Serialize)]
pub struct StatusUpdate {
    pub status: CampaignStatus,
}

/// Response of `POST /campaigns`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatedCampaign {
    #[serde(alias = "_id")]
    pub id: CampaignId,
}

/// Best-effort MIME type from a file extension.
pub fn content_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "mp4" => "video/mp4",
        "webm" => "video/webm",
        "mov" => "video/quicktime",
        "pdf" => "application/pdf",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "txt" => "text/plain",
        _ => "application/octet-stream",
    }
}
