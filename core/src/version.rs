//! Service versions and their lifecycle triggers.
//!
//! # Design
//! Version state (draft, active, locked, cloned into a new draft) is owned by
//! the server. `activate`, `deactivate`, `clone` and `lock` are stateless
//! triggers: they send a bodiless `PUT` to the action sub-path and decode the
//! version the server hands back. Nothing is checked locally first, so a
//! missing version surfaces as the server's 404.

use crate::client::{check_status, decode, ApiResponse, Client};
use crate::error::Result;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::sort::stable_sort_by_key;
use crate::types::Version;

/// Server-side state transition on a version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionAction {
    Activate,
    Deactivate,
    Clone,
    Lock,
}

impl VersionAction {
    pub fn as_str(self) -> &'static str {
        match self {
            VersionAction::Activate => "activate",
            VersionAction::Deactivate => "deactivate",
            VersionAction::Clone => "clone",
            VersionAction::Lock => "lock",
        }
    }
}

/// Operations on the versions of a service. Obtained from `Client::versions`.
pub struct VersionClient<'a> {
    client: &'a Client,
}

impl<'a> VersionClient<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    pub fn build_list(&self, service_id: &str) -> HttpRequest {
        self.client
            .request(HttpMethod::Get, &format!("/service/{service_id}/version"))
    }

    pub fn build_get(&self, service_id: &str, number: u32) -> HttpRequest {
        self.client.request(
            HttpMethod::Get,
            &format!("/service/{service_id}/version/{number}"),
        )
    }

    /// A new version is an empty `POST`; the server assigns the number.
    pub fn build_create(&self, service_id: &str) -> HttpRequest {
        self.client
            .request(HttpMethod::Post, &format!("/service/{service_id}/version"))
    }

    pub fn build_update(
        &self,
        service_id: &str,
        number: u32,
        version: &Version,
    ) -> Result<HttpRequest> {
        self.client.json_request(
            HttpMethod::Put,
            &format!("/service/{service_id}/version/{number}"),
            version,
        )
    }

    pub fn build_validate(&self, service_id: &str, number: u32) -> HttpRequest {
        self.client.request(
            HttpMethod::Get,
            &format!("/service/{service_id}/version/{number}/validate"),
        )
    }

    pub fn build_action(&self, service_id: &str, number: u32, action: VersionAction) -> HttpRequest {
        self.client.request(
            HttpMethod::Put,
            &format!("/service/{service_id}/version/{number}/{}", action.as_str()),
        )
    }

    /// Decode a version list and order it by version number.
    pub fn parse_list(&self, response: HttpResponse) -> Result<ApiResponse<Vec<Version>>> {
        let mut list: ApiResponse<Vec<Version>> = decode(check_status(response)?)?;
        stable_sort_by_key(&mut list.data, |v| &v.number);
        Ok(list)
    }

    pub fn parse_version(&self, response: HttpResponse) -> Result<ApiResponse<Version>> {
        decode(check_status(response)?)
    }

    pub fn parse_validate(&self, response: HttpResponse) -> Result<HttpResponse> {
        check_status(response)
    }

    pub fn list(&self, service_id: &str) -> Result<ApiResponse<Vec<Version>>> {
        let response = self.client.execute(self.build_list(service_id))?;
        self.parse_list(response)
    }

    pub fn get(&self, service_id: &str, number: u32) -> Result<ApiResponse<Version>> {
        let response = self.client.execute(self.build_get(service_id, number))?;
        self.parse_version(response)
    }

    pub fn create(&self, service_id: &str) -> Result<ApiResponse<Version>> {
        let response = self.client.execute(self.build_create(service_id))?;
        self.parse_version(response)
    }

    pub fn update(
        &self,
        service_id: &str,
        number: u32,
        version: &Version,
    ) -> Result<ApiResponse<Version>> {
        let request = self.build_update(service_id, number, version)?;
        self.parse_version(self.client.execute(request)?)
    }

    /// Ask the server to validate a version. Only the status matters.
    pub fn validate(&self, service_id: &str, number: u32) -> Result<HttpResponse> {
        let response = self.client.execute(self.build_validate(service_id, number))?;
        self.parse_validate(response)
    }

    pub fn activate(&self, service_id: &str, number: u32) -> Result<ApiResponse<Version>> {
        self.transition(service_id, number, VersionAction::Activate)
    }

    pub fn deactivate(&self, service_id: &str, number: u32) -> Result<ApiResponse<Version>> {
        self.transition(service_id, number, VersionAction::Deactivate)
    }

    /// Copy a version into a new draft; the result is the new version.
    pub fn clone(&self, service_id: &str, number: u32) -> Result<ApiResponse<Version>> {
        self.transition(service_id, number, VersionAction::Clone)
    }

    pub fn lock(&self, service_id: &str, number: u32) -> Result<ApiResponse<Version>> {
        self.transition(service_id, number, VersionAction::Lock)
    }

    fn transition(
        &self,
        service_id: &str,
        number: u32,
        action: VersionAction,
    ) -> Result<ApiResponse<Version>> {
        let response = self
            .client
            .execute(self.build_action(service_id, number, action))?;
        self.parse_version(response)
    }
}
