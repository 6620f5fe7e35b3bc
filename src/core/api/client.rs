//! Campaign API client.
//!
//! [`CampaignApi`] is the seam every component talks through; the HTTP
//! implementation speaks the platform's REST/JSON surface:
//!
//! | Operation         | Request                               |
//! |-------------------|---------------------------------------|
//! | search            | `GET /campaigns/search?q={term}`      |
//! | list by status    | `GET /campaigns?status={status}`      |
//! | update status     | `PATCH /campaigns/{id}`               |
//! | delete            | `DELETE /campaigns/{id}`              |
//! | create            | `POST /campaigns` (multipart)         |

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{multipart, Client, RequestBuilder, Response};
use tracing::{debug, instrument, warn};
use url::Url;

use crate::config::ApiConfig;
use crate::core::campaign::{Campaign, CampaignId, CampaignStatus, CampaignSummary};

use super::auth::{mask_token, AuthContext};
use super::error::{ApiError, Result};
use super::models::{CreatedCampaign, NewCampaignRequest, StatusUpdate};

/// Operations the client needs from the remote campaign API.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CampaignApi: Send + Sync {
    /// Look up campaigns matching a free-text term.
    async fn search(&self, term: &str) -> Result<Vec<CampaignSummary>>;

    /// List campaigns with the given moderation status.
    async fn list_campaigns(&self, status: CampaignStatus) -> Result<Vec<Campaign>>;

    /// Set a campaign's status and return the updated record.
    async fn update_status(&self, id: &CampaignId, status: CampaignStatus) -> Result<Campaign>;

    /// Delete a campaign.
    async fn delete_campaign(&self, id: &CampaignId) -> Result<()>;

    /// Create a campaign and return its new identifier.
    async fn create_campaign(&self, request: NewCampaignRequest) -> Result<CampaignId>;
}

/// Whether an endpoint requires a signed-in user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Access {
    Public,
    Protected,
}

/// [`CampaignApi`] over HTTPS with reqwest.
pub struct HttpCampaignApi {
    client: Client,
    base_url: Url,
    auth: Arc<dyn AuthContext>,
}

impl std::fmt::Debug for HttpCampaignApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpCampaignApi")
            .field("base_url", &self.base_url.as_str())
            .finish()
    }
}

impl HttpCampaignApi {
    pub fn new(config: &ApiConfig, auth: Arc<dyn AuthContext>) -> Result<Self> {
        let base_url = Url::parse(&config.base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::Request(format!("not a base URL: {}", config.base_url)));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url,
            auth,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Base URL with `segments` appended as path segments.
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::Request(format!("not a base URL: {}", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Attach the bearer credential, refusing protected calls when signed out.
    fn authorize(&self, request: RequestBuilder, access: Access) -> Result<RequestBuilder> {
        match (self.auth.current_user(), access) {
            (Some(identity), _) => {
                debug!(user = %identity.user_id, token = %mask_token(&identity.token), "Authorizing request");
                Ok(request.bearer_auth(identity.token))
            }
            (None, Access::Public) => Ok(request),
            (None, Access::Protected) => {
                warn!("Protected request attempted without a signed-in user");
                Err(ApiError::signed_out())
            }
        }
    }

    /// Send and map any non-2xx status to an [`ApiError`].
    async fn send(&self, request: RequestBuilder, access: Access) -> Result<Response> {
        let response = self.authorize(request, access)?.send().await?;
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        warn!(status = %status, body = %body, "Campaign API returned an error");
        Err(ApiError::from_status(status, &body))
    }

    fn build_form(request: NewCampaignRequest) -> Result<multipart::Form> {
        let mut form = multipart::Form::new();
        for (name, value) in request.text_fields() {
            form = form.text(name, value);
        }
        for (name, asset) in request.file_parts() {
            let part = multipart::Part::bytes(asset.data.clone())
                .file_name(asset.file_name.clone())
                .mime_str(&asset.content_type)
                .map_err(|e| ApiError::Request(e.to_string()))?;
            form = form.part(name, part);
        }
        Ok(form)
    }
}

#[async_trait]
impl CampaignApi for HttpCampaignApi {
    #[instrument(skip(self))]
    async fn search(&self, term: &str) -> Result<Vec<CampaignSummary>> {
        let url = self.endpoint(&["campaigns", "search"])?;
        let request = self.client.get(url).query(&[("q", term)]);
        let results: Vec<CampaignSummary> = self.send(request, Access::Public).await?.json().await?;
        debug!(count = results.len(), "Search results received");
        Ok(results)
    }

    #[instrument(skip(self))]
    async fn list_campaigns(&self, status: CampaignStatus) -> Result<Vec<Campaign>> {
        let url = self.endpoint(&["campaigns"])?;
        let request = self.client.get(url).query(&[("status", status.as_str())]);
        let campaigns: Vec<Campaign> = self.send(request, Access::Public).await?.json().await?;
        debug!(count = campaigns.len(), "Campaign list received");
        Ok(campaigns)
    }

    #[instrument(skip(self, id), fields(id = %id))]
    async fn update_status(&self, id: &CampaignId, status: CampaignStatus) -> Result<Campaign> {
        let url = self.endpoint(&["campaigns", id.as_str()])?;
        let request = self.client.patch(url).json(&StatusUpdate { status });
        Ok(self.send(request, Access::Protected).await?.json().await?)
    }

    #[instrument(skip(self, id), fields(id = %id))]
    async fn delete_campaign(&self, id: &CampaignId) -> Result<()> {
        let url = self.endpoint(&["campaigns", id.as_str()])?;
        self.send(self.client.delete(url), Access::Protected).await?;
        Ok(())
    }

    #[instrument(skip(self, request), fields(name = %request.name, files = request.file_parts().len()))]
    async fn create_campaign(&self, request: NewCampaignRequest) -> Result<CampaignId> {
        let url = self.endpoint(&["campaigns"])?;
        let form = Self::build_form(request)?;
        let created: CreatedCampaign = self
            .send(self.client.post(url).multipart(form), Access::Protected)
            .await?
            .json()
            .await?;
        debug!(id = %created.id, "Campaign created");
        Ok(created.id)
    }
}
