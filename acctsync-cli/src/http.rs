//! Blocking HTTP adapter for the vSphere cloud-account endpoints.
//!
//! Status mapping:
//! - 404 → [`ApiError::NotFound`]
//! - other non-2xx → [`ApiError::Status`] with the response body as message
//! - connection / TLS / timeout → [`ApiError::Transport`]
//! - body that is not a cloud account → [`ApiError::Decode`]

use std::time::Instant;

use acctsync_core::CloudAccountId;
use acctsync_reconciler::{
    ApiError, CallOptions, CloudAccountApi, CreateSpec, RemoteAccount, UpdateSpec,
};

use crate::settings::Settings;

const COLLECTION_PATH: &str = "/iaas/api/cloud-accounts-vsphere";

pub struct HttpCloudAccountApi {
    agent: ureq::Agent,
    base_url: String,
    token: Option<String>,
    api_version: String,
}

impl HttpCloudAccountApi {
    pub fn new(settings: &Settings) -> Self {
        Self {
            agent: ureq::AgentBuilder::new().build(),
            base_url: settings.endpoint.trim_end_matches('/').to_string(),
            token: settings.token.clone(),
            api_version: settings.api_version.clone(),
        }
    }

    fn request(&self, method: &str, path: &str, opts: &CallOptions) -> Result<ureq::Request, ApiError> {
        let timeout = opts
            .effective_timeout(Instant::now())
            .ok_or(ApiError::DeadlineExceeded)?;
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!("{method} {url} (timeout {}s)", timeout.as_secs());

        let mut req = self
            .agent
            .request(method, &url)
            .timeout(timeout)
            .query("apiVersion", &self.api_version)
            .set("Accept", "application/json");
        if let Some(token) = &self.token {
            req = req.set("Authorization", &format!("Bearer {token}"));
        }
        Ok(req)
    }
}

fn item_path(id: &CloudAccountId) -> String {
    format!("{COLLECTION_PATH}/{}", id.0)
}

fn map_error(err: ureq::Error, id: &str) -> ApiError {
    match err {
        ureq::Error::Status(404, _) => ApiError::NotFound { id: id.to_string() },
        ureq::Error::Status(status, response) => ApiError::Status {
            status,
            message: response.into_string().unwrap_or_default(),
        },
        ureq::Error::Transport(transport) => ApiError::Transport(transport.to_string()),
    }
}

fn decode(response: ureq::Response) -> Result<RemoteAccount, ApiError> {
    response
        .into_json::<RemoteAccount>()
        .map_err(|e| ApiError::Decode(e.to_string()))
}

impl CloudAccountApi for HttpCloudAccountApi {
    fn create(&self, spec: &CreateSpec, opts: &CallOptions) -> Result<RemoteAccount, ApiError> {
        let response = self
            .request("POST", COLLECTION_PATH, opts)?
            .send_json(spec)
            .map_err(|e| map_error(e, &spec.name))?;
        decode(response)
    }

    fn get_by_id(&self, id: &CloudAccountId, opts: &CallOptions) -> Result<RemoteAccount, ApiError> {
        let response = self
            .request("GET", &item_path(id), opts)?
            .call()
            .map_err(|e| map_error(e, &id.0))?;
        decode(response)
    }

    fn update(
        &self,
        id: &CloudAccountId,
        spec: &UpdateSpec,
        opts: &CallOptions,
    ) -> Result<RemoteAccount, ApiError> {
        let response = self
            .request("PATCH", &item_path(id), opts)?
            .send_json(spec)
            .map_err(|e| map_error(e, &id.0))?;
        decode(response)
    }

    fn delete_by_id(&self, id: &CloudAccountId, opts: &CallOptions) -> Result<(), ApiError> {
        self.request("DELETE", &item_path(id), opts)?
            .call()
            .map_err(|e| map_error(e, &id.0))?;
        Ok(())
    }
}
