//! Submission Gateway
//!
//! Turns a finished wizard draft into a single multipart creation request.
//! There is no retry: a failed submission is re-invoked by the user, and the
//! draft is only borrowed so nothing the user typed is lost on failure.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use thiserror::Error;

use crate::core::api::{ApiError, AssetPart, CampaignApi, ErrorKind, NewCampaignRequest};
use crate::core::campaign::wizard::{AssetRef, CampaignDraft, CampaignSubmission, DraftValidationError, VideoSource};
use crate::core::campaign::CampaignId;

/// Why a submission did not produce a campaign.
#[derive(Debug, Error)]
pub enum SubmissionError {
    /// The draft is missing a required field or holds an unusable value.
    #[error(transparent)]
    Validation(#[from] DraftValidationError),

    /// A referenced file could not be read.
    #[error("Could not read asset {path}: {source}")]
    Asset {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The API call failed.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Another submission from this gateway has not finished yet.
    #[error("A submission is already in progress")]
    InFlight,
}

impl SubmissionError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SubmissionError::Validation(_) | SubmissionError::Asset { .. } => ErrorKind::Validation,
            SubmissionError::Api(err) => err.kind(),
            SubmissionError::InFlight => ErrorKind::Other,
        }
    }

    /// Validation-class errors: the draft (or the API's view of it) is wrong.
    pub fn is_validation(&self) -> bool {
        self.kind() == ErrorKind::Validation
    }
}

/// Sends campaign drafts to the remote API.
pub struct SubmissionGateway {
    api: Arc<dyn CampaignApi>,
    in_flight: AtomicBool,
}

/// Clears the in-flight flag however `submit` exits.
struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl SubmissionGateway {
    pub fn new(api: Arc<dyn CampaignApi>) -> Self {
        Self {
            api,
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn is_submitting(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Validate, package and send `draft`, returning the created campaign's id.
    pub async fn submit(&self, draft: &CampaignDraft) -> Result<CampaignId, SubmissionError> {
        let submission = draft.validate().map_err(|e| {
            log::info!("Submission blocked by draft validation: {e}");
            e
        })?;

        if self.in_flight.swap(true, Ordering::SeqCst) {
            log::warn!("Ignoring duplicate submission while one is in flight");
            return Err(SubmissionError::InFlight);
        }
        let _guard = InFlightGuard(&self.in_flight);

        let request = prepare_request(submission).await?;
        log::info!(
            "Submitting campaign '{}' ({}, {} document(s))",
            request.name,
            request.category,
            request.documents.len()
        );

        match self.api.create_campaign(request).await {
            Ok(id) => {
                log::info!("Campaign submitted: id={id}");
                Ok(id)
            }
            Err(e) => {
                log::warn!("Campaign submission failed: {e}");
                Err(e.into())
            }
        }
    }
}

/// Load every referenced asset and build the creation request.
pub async fn prepare_request(submission: CampaignSubmission) -> Result<NewCampaignRequest, SubmissionError> {
    let image = match submission.image {
        Some(asset) => Some(load_asset(asset).await?),
        None => None,
    };

    let (video_url, video) = match submission.video {
        Some(VideoSource::Url(url)) => (Some(url), None),
        Some(VideoSource::Asset(asset)) => (None, Some(load_asset(asset).await?)),
        None => (None, None),
    };

    let mut documents = Vec::with_capacity(submission.documents.len());
    for asset in submission.documents {
        documents.push(load_asset(asset).await?);
    }

    Ok(NewCampaignRequest {
        name: submission.name,
        category: submission.category,
        description: submission.description,
        target: submission.target,
        duration_days: submission.duration_days,
        details: submission.details,
        video_url,
        image,
        video,
        documents,
    })
}

async fn load_asset(asset: AssetRef) -> Result<AssetPart, SubmissionError> {
    let file_name = asset.file_name();
    match asset {
        AssetRef::File(path) => {
            let data = tokio::fs::read(&path)
                .await
                .map_err(|source| SubmissionError::Asset { path: path.clone(), source })?;
            log::debug!("Loaded asset {} ({} bytes)", path.display(), data.len());
            Ok(AssetPart::new(file_name, data))
        }
        AssetRef::Bytes {
            content_type, data, ..
        } => Ok(AssetPart {
            file_name,
            content_type,
            data,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::api::MockCampaignApi;
    use crate::core::campaign::wizard::{DraftField, FieldValue};
    use crate::core::campaign::Category;
    use std::io::Write;

    fn complete_draft() -> CampaignDraft {
        let mut draft = CampaignDraft::new();
        draft.set_text(DraftField::Name, "Flood Relief");
        draft.set_text(DraftField::Category, "Disaster Relief");
        draft.set_text(DraftField::Description, "Rebuild homes after the flood");
        draft.set_text(DraftField::Target, "10000");
        draft.set_text(DraftField::Duration, "60");
        draft
    }

    #[tokio::test]
    async fn test_submit_success_returns_id() {
        let mut api = MockCampaignApi::new();
        api.expect_create_campaign()
            .withf(|req| req.name == "Flood Relief" && req.category == Category::DisasterRelief && req.duration_days == 60)
            .times(1)
            .returning(|_| Ok(CampaignId::new("new-1")));

        let gateway = SubmissionGateway::new(Arc::new(api));
        let id = gateway.submit(&complete_draft()).await.unwrap();
        assert_eq!(id.as_str(), "new-1");
        assert!(!gateway.is_submitting());
    }

    #[tokio::test]
    async fn test_missing_required_field_never_reaches_api() {
        let mut api = MockCampaignApi::new();
        api.expect_create_campaign().times(0);

        let gateway = SubmissionGateway::new(Arc::new(api));
        let mut draft = complete_draft();
        draft.clear_field(DraftField::Description);
        let before = draft.clone();

        let err = gateway.submit(&draft).await.unwrap_err();
        assert!(err.is_validation());
        assert!(matches!(
            err,
            SubmissionError::Validation(DraftValidationError::MissingField(DraftField::Description))
        ));
        assert_eq!(draft, before);
    }

    #[tokio::test]
    async fn test_api_rejection_is_validation_class() {
        let mut api = MockCampaignApi::new();
        api.expect_create_campaign()
            .returning(|_| Err(ApiError::Validation("title already taken".into())));

        let gateway = SubmissionGateway::new(Arc::new(api));
        let err = gateway.submit(&complete_draft()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(err.to_string().contains("title already taken"));
    }

    #[tokio::test]
    async fn test_network_failure_is_distinct() {
        let mut api = MockCampaignApi::new();
        api.expect_create_campaign()
            .returning(|_| Err(ApiError::Network("connection refused".into())));

        let gateway = SubmissionGateway::new(Arc::new(api));
        let err = gateway.submit(&complete_draft()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Network);
        // Flag released so the user can retry
        assert!(!gateway.is_submitting());
    }

    #[tokio::test]
    async fn test_assets_are_loaded_into_parts() {
        let mut image = tempfile::Builder::new().suffix(".png").tempfile().unwrap();
        image.write_all(b"\x89PNG").unwrap();

        let mut draft = complete_draft();
        draft.set_field(DraftField::Image, FieldValue::Asset(AssetRef::file(image.path())));
        draft.set_text(DraftField::Video, "https://video.example/watch/1");
        draft.set_field(
            DraftField::Documents,
            FieldValue::Assets(vec![AssetRef::Bytes {
                file_name: "budget.pdf".into(),
                content_type: "application/pdf".into(),
                data: vec![1, 2, 3],
            }]),
        );

        let request = prepare_request(draft.validate().unwrap()).await.unwrap();
        let image = request.image.as_ref().unwrap();
        assert_eq!(image.data, b"\x89PNG");
        assert_eq!(image.content_type, "image/png");
        assert_eq!(request.video_url.as_deref(), Some("https://video.example/watch/1"));
        assert!(request.video.is_none());
        assert_eq!(request.documents[0].file_name, "budget.pdf");
    }

    #[tokio::test]
    async fn test_unreadable_asset_is_reported() {
        let mut api = MockCampaignApi::new();
        api.expect_create_campaign().times(0);

        let mut draft = complete_draft();
        draft.set_text(DraftField::Image, "/definitely/not/here.png");

        let gateway = SubmissionGateway::new(Arc::new(api));
        let err = gateway.submit(&draft).await.unwrap_err();
        assert!(matches!(err, SubmissionError::Asset { .. }));
        assert!(!gateway.is_submitting());
    }
}
