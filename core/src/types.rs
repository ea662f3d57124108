//! Resource schemas for the configuration API.
//!
//! # Design
//! These types are plain records. Each field carries its serialization rule:
//! omit-if-empty fields use `skip_serializing_if`, server-assigned timestamps
//! are decode-only, and the version number on logging sinks travels as a JSON
//! string. Fields without an omit rule are always sent, which is what makes
//! `update` a full replacement.
//!
//! The mock-server crate defines its own view of the same payloads; the
//! integration tests catch drift between the two.

use serde::{Deserialize, Serialize};

use crate::resource::VersionedResource;
use crate::serde_util::{is_default, lenient_number, null_as_default, string_number};

/// A numbered configuration version of a service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Version {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub service_id: String,
    #[serde(default, skip_serializing_if = "is_default")]
    pub number: u32,
    #[serde(default, skip_serializing_if = "is_default")]
    pub active: bool,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "String::is_empty"
    )]
    pub comment: String,
    #[serde(default, skip_serializing_if = "is_default")]
    pub deployed: bool,
    #[serde(default, skip_serializing_if = "is_default")]
    pub locked: bool,
    #[serde(default, skip_serializing_if = "is_default")]
    pub staging: bool,
    #[serde(default, skip_serializing_if = "is_default")]
    pub testing: bool,
    #[serde(default, skip_serializing)]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing)]
    pub updated_at: Option<String>,
}

/// A BigQuery logging endpoint attached to a service version.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BigQuery {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub service_id: String,
    #[serde(default, with = "string_number", skip_serializing_if = "is_default")]
    pub version: u32,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub format: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub user: String,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "String::is_empty"
    )]
    pub secret_key: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub project_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub dataset: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub table: String,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "String::is_empty"
    )]
    pub template_suffix: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub response_condition: String,
}

impl VersionedResource for BigQuery {
    const COLLECTION: &'static str = "logging/bigquery";

    fn natural_key(&self) -> &str {
        &self.name
    }
}

/// An Amazon S3 logging endpoint attached to a service version.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct S3 {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub service_id: String,
    #[serde(default, with = "string_number", skip_serializing_if = "is_default")]
    pub version: u32,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub bucket_name: String,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "String::is_empty"
    )]
    pub domain: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub access_key: String,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "String::is_empty"
    )]
    pub secret_key: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub path: String,
    #[serde(
        default,
        deserialize_with = "lenient_number",
        skip_serializing_if = "is_default"
    )]
    pub period: u32,
    #[serde(
        default,
        deserialize_with = "lenient_number",
        skip_serializing_if = "is_default"
    )]
    pub gzip_level: u8,
    #[serde(default, deserialize_with = "null_as_default")]
    pub format: String,
    #[serde(
        default,
        deserialize_with = "lenient_number",
        skip_serializing_if = "is_default"
    )]
    pub format_version: u8,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "String::is_empty"
    )]
    pub message_type: String,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "String::is_empty"
    )]
    pub redundancy: String,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "String::is_empty"
    )]
    pub timestamp_format: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub response_condition: String,
}

impl VersionedResource for S3 {
    const COLLECTION: &'static str = "logging/s3";

    fn natural_key(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn version_omits_empty_fields() {
        let json = serde_json::to_value(Version {
            comment: "canary".to_string(),
            ..Version::default()
        })
        .unwrap();
        assert_eq!(json, json!({"comment": "canary"}));
    }

    #[test]
    fn version_timestamps_are_read_only() {
        let version: Version = serde_json::from_value(json!({
            "service_id": "SU1Z0isxPaozGVKXdv0eY",
            "number": 3,
            "active": true,
            "locked": true,
            "comment": null,
            "created_at": "2016-05-08T09:53:19+00:00",
            "updated_at": "2016-05-08T10:01:02+00:00"
        }))
        .unwrap();
        assert_eq!(version.number, 3);
        assert!(version.active && version.locked);
        assert_eq!(version.comment, "");
        assert_eq!(version.created_at.as_deref(), Some("2016-05-08T09:53:19+00:00"));

        let json = serde_json::to_value(&version).unwrap();
        assert!(json.get("created_at").is_none());
        assert!(json.get("updated_at").is_none());
    }

    #[test]
    fn bigquery_always_sends_required_fields() {
        let json = serde_json::to_value(BigQuery {
            name: "bq".to_string(),
            ..BigQuery::default()
        })
        .unwrap();
        assert_eq!(
            json,
            json!({
                "name": "bq",
                "format": "",
                "user": "",
                "project_id": "",
                "dataset": "",
                "table": "",
                "response_condition": ""
            })
        );
    }

    #[test]
    fn bigquery_decodes_server_representation() {
        let bq: BigQuery = serde_json::from_value(json!({
            "service_id": "svc",
            "version": "2",
            "name": "events",
            "format": "{}",
            "user": "logger@example.iam.gserviceaccount.com",
            "project_id": "example-project",
            "dataset": "logs",
            "table": "edge",
            "template_suffix": null,
            "response_condition": "",
            "created_at": "2017-01-01T00:00:00+00:00"
        }))
        .unwrap();
        assert_eq!(bq.version, 2);
        assert_eq!(bq.name, "events");
        assert_eq!(bq.template_suffix, "");
        assert_eq!(bq.natural_key(), "events");
    }

    #[test]
    fn s3_numeric_fields_are_omitted_when_zero() {
        let json = serde_json::to_value(S3 {
            name: "archive".to_string(),
            bucket_name: "logs-bucket".to_string(),
            gzip_level: 9,
            ..S3::default()
        })
        .unwrap();
        assert_eq!(json["gzip_level"], 9);
        assert!(json.get("period").is_none());
        assert!(json.get("format_version").is_none());
        assert_eq!(json["bucket_name"], "logs-bucket");
    }

    #[test]
    fn s3_numeric_fields_accept_quoted_numbers() {
        let s3: S3 = serde_json::from_str(
            r#"{"name":"archive","period":"3600","gzip_level":"9","format_version":2}"#,
        )
        .unwrap();
        assert_eq!(s3.period, 3600);
        assert_eq!(s3.gzip_level, 9);
        assert_eq!(s3.format_version, 2);

        let json = serde_json::to_value(&s3).unwrap();
        assert_eq!(json["period"], 3600);
        assert_eq!(json["gzip_level"], 9);
    }
}
