use crate::config::Config;
use crate::error::CredwatchError;
use crate::types::Credential;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde_json::json;
use std::time::Duration;
use tracing::info;
use url::Url;

/// Name of the watched table on the backend.
pub const CREDENTIALS_TABLE: &str = "credentials";

const PREFER_REPRESENTATION: &str = "return=representation";

/// An authenticated handle to the backend collaborator, valid for the life
/// of one command or the listener process.
///
/// Two HTTP clients: `http` bounds every CRUD round trip with a total
/// request timeout, while `stream_http` carries no total timeout so an open
/// change stream is never cut off by the client itself.
#[derive(Clone, Debug)]
pub struct Session {
    http: reqwest::Client,
    stream_http: reqwest::Client,
    base: Url,
}

impl Session {
    /// Connect to the backend: build the HTTP client and perform one
    /// authenticated handshake round trip. Both the missing-config case and
    /// the handshake failure surface as typed errors before any table
    /// operation runs.
    pub async fn connect(cfg: &Config) -> Result<Self, CredwatchError> {
        let mut headers = HeaderMap::new();
        let mut key = HeaderValue::from_str(&cfg.service_key)
            .map_err(|_| CredwatchError::InvalidServiceKey)?;
        key.set_sensitive(true);
        headers.insert("apikey", key);
        let mut bearer = HeaderValue::from_str(&format!("Bearer {}", cfg.service_key))
            .map_err(|_| CredwatchError::InvalidServiceKey)?;
        bearer.set_sensitive(true);
        headers.insert(AUTHORIZATION, bearer);

        let http = reqwest::Client::builder()
            .user_agent("credwatch/0.1")
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(15))
            .default_headers(headers.clone())
            .build()
            .map_err(CredwatchError::Connection)?;

        // The change stream stays open for the process lifetime; only the
        // connect phase is bounded here.
        let stream_http = reqwest::Client::builder()
            .user_agent("credwatch/0.1")
            .connect_timeout(Duration::from_secs(5))
            .default_headers(headers)
            .build()
            .map_err(CredwatchError::Connection)?;

        let session = Self {
            http,
            stream_http,
            base: cfg.service_url.clone(),
        };
        session.handshake().await?;
        info!(url = %session.base, "backend session initialized");
        Ok(session)
    }

    async fn handshake(&self) -> Result<(), CredwatchError> {
        let url = self.endpoint("auth/v1/health")?;
        self.http
            .get(url)
            .send()
            .await
            .and_then(|resp| resp.error_for_status())
            .map_err(CredwatchError::Connection)?;
        Ok(())
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }

    pub(crate) fn stream_http(&self) -> &reqwest::Client {
        &self.stream_http
    }

    pub(crate) fn endpoint(&self, path: &str) -> Result<Url, CredwatchError> {
        Ok(self.base.join(path)?)
    }

    fn table_url(&self) -> Result<Url, CredwatchError> {
        self.endpoint(&format!("rest/v1/{CREDENTIALS_TABLE}"))
    }

    /// Fetch every row of the credentials table. Unbounded: no pagination.
    pub async fn list(&self) -> Result<Vec<Credential>, CredwatchError> {
        let mut url = self.table_url()?;
        url.query_pairs_mut().append_pair("select", "*");

        let rows = self
            .http
            .get(url)
            .send()
            .await
            .and_then(|resp| resp.error_for_status())
            .map_err(CredwatchError::request("list"))?
            .json::<Vec<Credential>>()
            .await
            .map_err(CredwatchError::request("list"))?;
        Ok(rows)
    }

    /// Insert one row, returning the representation echoed by the backend.
    pub async fn create(&self, cred: &Credential) -> Result<Vec<Credential>, CredwatchError> {
        let rows = self
            .http
            .post(self.table_url()?)
            .header("Prefer", PREFER_REPRESENTATION)
            .json(cred)
            .send()
            .await
            .and_then(|resp| resp.error_for_status())
            .map_err(CredwatchError::request("create"))?
            .json::<Vec<Credential>>()
            .await
            .map_err(CredwatchError::request("create"))?;
        Ok(rows)
    }

    /// Set a new password on the row(s) matching `email`.
    pub async fn update_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Vec<Credential>, CredwatchError> {
        let mut url = self.table_url()?;
        url.query_pairs_mut()
            .append_pair("email", &format!("eq.{email}"));

        let rows = self
            .http
            .patch(url)
            .header("Prefer", PREFER_REPRESENTATION)
            .json(&json!({ "password": password }))
            .send()
            .await
            .and_then(|resp| resp.error_for_status())
            .map_err(CredwatchError::request("update"))?
            .json::<Vec<Credential>>()
            .await
            .map_err(CredwatchError::request("update"))?;
        Ok(rows)
    }

    /// Remove the row(s) matching `email`, returning what was deleted.
    pub async fn delete(&self, email: &str) -> Result<Vec<Credential>, CredwatchError> {
        let mut url = self.table_url()?;
        url.query_pairs_mut()
            .append_pair("email", &format!("eq.{email}"));

        let rows = self
            .http
            .delete(url)
            .header("Prefer", PREFER_REPRESENTATION)
            .send()
            .await
            .and_then(|resp| resp.error_for_status())
            .map_err(CredwatchError::request("delete"))?
            .json::<Vec<Credential>>()
            .await
            .map_err(CredwatchError::request("delete"))?;
        Ok(rows)
    }
}
