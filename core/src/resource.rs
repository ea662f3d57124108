//! Generic client for resources that live under a service version.
//!
//! # Design
//! Every version-scoped resource type follows the same template: a collection
//! path under `/service/{id}/version/{v}/`, items addressed by name, and list
//! results ordered by a natural key. `VersionedResource` captures the only
//! parts that differ between types, so one `ResourceClient` serves them all.
//! As with the rest of the crate, each operation splits into a pure
//! `build_*`/`parse_*` pair plus a convenience method that runs both around
//! the transport.

use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::client::{check_status, decode, ApiResponse, Client};
use crate::error::Result;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::sort::stable_sort_by_key;

/// A record addressed by `(service_id, version, name)`.
pub trait VersionedResource: Serialize + DeserializeOwned {
    /// Path segment(s) after `/service/{id}/version/{v}/`.
    const COLLECTION: &'static str;

    /// Key that list results are ordered by.
    fn natural_key(&self) -> &str;
}

/// Operations on one resource type. Obtained from `Client::resource` or one
/// of the typed accessors such as `Client::bigquery`.
pub struct ResourceClient<'a, R> {
    client: &'a Client,
    _resource: PhantomData<fn() -> R>,
}

impl<'a, R: VersionedResource> ResourceClient<'a, R> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self {
            client,
            _resource: PhantomData,
        }
    }

    fn collection_path(service_id: &str, version: u32) -> String {
        format!("/service/{service_id}/version/{version}/{}", R::COLLECTION)
    }

    fn item_path(service_id: &str, version: u32, name: &str) -> String {
        format!("{}/{name}", Self::collection_path(service_id, version))
    }

    pub fn build_list(&self, service_id: &str, version: u32) -> HttpRequest {
        self.client
            .request(HttpMethod::Get, &Self::collection_path(service_id, version))
    }

    pub fn build_get(&self, service_id: &str, version: u32, name: &str) -> HttpRequest {
        self.client
            .request(HttpMethod::Get, &Self::item_path(service_id, version, name))
    }

    pub fn build_create(&self, service_id: &str, version: u32, resource: &R) -> Result<HttpRequest> {
        self.client.json_request(
            HttpMethod::Post,
            &Self::collection_path(service_id, version),
            resource,
        )
    }

    pub fn build_update(
        &self,
        service_id: &str,
        version: u32,
        name: &str,
        resource: &R,
    ) -> Result<HttpRequest> {
        self.client.json_request(
            HttpMethod::Put,
            &Self::item_path(service_id, version, name),
            resource,
        )
    }

    pub fn build_delete(&self, service_id: &str, version: u32, name: &str) -> HttpRequest {
        self.client
            .request(HttpMethod::Delete, &Self::item_path(service_id, version, name))
    }

    /// Decode a list response and order it by natural key.
    pub fn parse_list(&self, response: HttpResponse) -> Result<ApiResponse<Vec<R>>> {
        let mut list: ApiResponse<Vec<R>> = decode(check_status(response)?)?;
        stable_sort_by_key(&mut list.data, R::natural_key);
        Ok(list)
    }

    pub fn parse_item(&self, response: HttpResponse) -> Result<ApiResponse<R>> {
        decode(check_status(response)?)
    }

    pub fn parse_delete(&self, response: HttpResponse) -> Result<HttpResponse> {
        check_status(response)
    }

    pub fn list(&self, service_id: &str, version: u32) -> Result<ApiResponse<Vec<R>>> {
        let response = self.client.execute(self.build_list(service_id, version))?;
        self.parse_list(response)
    }

    pub fn get(&self, service_id: &str, version: u32, name: &str) -> Result<ApiResponse<R>> {
        let response = self
            .client
            .execute(self.build_get(service_id, version, name))?;
        self.parse_item(response)
    }

    /// Create a resource and return the server's canonical copy, which may
    /// include server-assigned defaults.
    pub fn create(&self, service_id: &str, version: u32, resource: &R) -> Result<ApiResponse<R>> {
        let request = self.build_create(service_id, version, resource)?;
        self.parse_item(self.client.execute(request)?)
    }

    /// Replace the named resource with `resource`. Fields left at their
    /// defaults are reset server-side; nothing is merged.
    pub fn update(
        &self,
        service_id: &str,
        version: u32,
        name: &str,
        resource: &R,
    ) -> Result<ApiResponse<R>> {
        let request = self.build_update(service_id, version, name, resource)?;
        self.parse_item(self.client.execute(request)?)
    }

    pub fn delete(&self, service_id: &str, version: u32, name: &str) -> Result<HttpResponse> {
        let response = self
            .client
            .execute(self.build_delete(service_id, version, name))?;
        self.parse_delete(response)
    }
}
