//! Outage API repository.

use async_trait::async_trait;
use outagesync_core::{Outage, SiteInfo, SiteOutage};
use outagesync_fetch::{ApiClient, QueryParams};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, instrument, warn};

use crate::error::ApiError;

// ============================================================================
// Endpoints
// ============================================================================

/// Outage list endpoint.
const OUTAGES_ENDPOINT: &str = "outages";

/// Site info endpoint prefix.
const SITE_INFO_ENDPOINT: &str = "site-info";

/// Site outages endpoint prefix.
const SITE_OUTAGES_ENDPOINT: &str = "site-outages";

// ============================================================================
// Trait
// ============================================================================

/// Operations the sync job needs from the outage API.
#[async_trait]
pub trait OutageApi: Send + Sync {
    /// Retrieves all outages.
    async fn list_outages(&self) -> Result<Vec<Outage>, ApiError>;

    /// Retrieves a site and its devices.
    async fn get_site_info(&self, site_id: &str) -> Result<SiteInfo, ApiError>;

    /// Posts the outages of a site.
    async fn post_outages(&self, site_id: &str, outages: &[SiteOutage]) -> Result<(), ApiError>;
}

// ============================================================================
// Repository
// ============================================================================

/// [`OutageApi`] backed by the HTTP API.
#[derive(Debug, Clone)]
pub struct OutageRepository {
    client: ApiClient,
}

impl OutageRepository {
    /// Creates a repository over `client`.
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Returns the underlying client.
    pub fn client(&self) -> &ApiClient {
        &self.client
    }
}

fn site_path(prefix: &str, site_id: &str) -> Result<String, ApiError> {
    if site_id.trim().is_empty() || site_id == "." || site_id == ".." {
        return Err(ApiError::InvalidSiteId(site_id.to_string()));
    }
    Ok(format!("{}/{}", prefix, urlencoding::encode(site_id)))
}

fn decode<T: DeserializeOwned>(what: &'static str, value: Value) -> Result<T, ApiError> {
    serde_json::from_value(value).map_err(|source| {
        warn!(what, error = %source, "Rejected malformed payload");
        ApiError::Decode { what, source }
    })
}

#[async_trait]
impl OutageApi for OutageRepository {
    #[instrument(skip(self))]
    async fn list_outages(&self) -> Result<Vec<Outage>, ApiError> {
        let value = self.client.get(OUTAGES_ENDPOINT, &QueryParams::new()).await?;
        let outages: Vec<Outage> = decode("outage list", value)?;
        debug!(count = outages.len(), "Decoded outages");
        Ok(outages)
    }

    #[instrument(skip(self))]
    async fn get_site_info(&self, site_id: &str) -> Result<SiteInfo, ApiError> {
        let path = site_path(SITE_INFO_ENDPOINT, site_id)?;
        let value = self.client.get(&path, &QueryParams::new()).await?;
        let site: SiteInfo = decode("site info", value)?;

        if site.id != site_id {
            warn!(requested = site_id, returned = %site.id, "Site info id differs from request");
        }
        Ok(site)
    }

    #[instrument(skip(self, outages), fields(count = outages.len()))]
    async fn post_outages(&self, site_id: &str, outages: &[SiteOutage]) -> Result<(), ApiError> {
        let path = site_path(SITE_OUTAGES_ENDPOINT, site_id)?;
        self.client.post(&path, outages, &QueryParams::new()).await?;
        Ok(())
    }
}
