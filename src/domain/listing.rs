use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{RegistryError, Result};

/// A registered server as held by the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listing {
    pub region: String,
    pub player_count: u32,
    pub updated_at: DateTime<Utc>,
}

/// Public projection of a [`Listing`], as served on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingView {
    #[serde(rename = "jobid")]
    pub id: String,
    pub region: String,
    #[serde(rename = "playerCount")]
    pub player_count: u32,
}

/// Body of an `/update` request.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateRequest {
    #[serde(rename = "jobid")]
    pub id: String,
    pub region: String,
    #[serde(rename = "playerCount")]
    pub player_count: u32,
}

/// Body of a `/close` request.
#[derive(Debug, Clone, Deserialize)]
pub struct CloseRequest {
    #[serde(rename = "jobid")]
    pub id: String,
}

impl UpdateRequest {
    pub fn from_slice(body: &[u8]) -> Result<Self> {
        let req: Self = serde_json::from_slice(body).map_err(RegistryError::MalformedBody)?;
        validate_id(&req.id)?;
        validate_region(&req.region)?;
        Ok(req)
    }
}

impl CloseRequest {
    pub fn from_slice(body: &[u8]) -> Result<Self> {
        let req: Self = serde_json::from_slice(body).map_err(RegistryError::MalformedBody)?;
        validate_id(&req.id)?;
        Ok(req)
    }
}

pub fn validate_id(id: &str) -> Result<()> {
    if id.trim().is_empty() {
        return Err(RegistryError::InvalidListing {
            reason: "jobid must not be empty".into(),
        });
    }
    Ok(())
}

pub fn validate_region(region: &str) -> Result<()> {
    if region.trim().is_empty() {
        return Err(RegistryError::InvalidListing {
            reason: "region must not be empty".into(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_request_parses_wire_names() {
        let req =
            UpdateRequest::from_slice(br#"{"jobid":"job1","region":"us-east","playerCount":10}"#)
                .unwrap();
        assert_eq!(req.id, "job1");
        assert_eq!(req.region, "us-east");
        assert_eq!(req.player_count, 10);
    }

    #[test]
    fn update_request_ignores_unknown_fields() {
        let req = UpdateRequest::from_slice(
            br#"{"jobid":"job1","region":"eu","playerCount":0,"placeId":42}"#,
        )
        .unwrap();
        assert_eq!(req.player_count, 0);
    }

    #[test]
    fn update_request_missing_field_is_malformed() {
        let err = UpdateRequest::from_slice(br#"{"jobid":"job1","region":"eu"}"#).unwrap_err();
        assert!(matches!(err, RegistryError::MalformedBody(_)));
        assert!(err.to_string().contains("playerCount"));
    }

    #[test]
    fn update_request_negative_player_count_is_malformed() {
        let err =
            UpdateRequest::from_slice(br#"{"jobid":"job1","region":"eu","playerCount":-1}"#)
                .unwrap_err();
        assert!(matches!(err, RegistryError::MalformedBody(_)));
    }

    #[test]
    fn update_request_wrong_type_is_malformed() {
        let err =
            UpdateRequest::from_slice(br#"{"jobid":7,"region":"eu","playerCount":1}"#).unwrap_err();
        assert!(matches!(err, RegistryError::MalformedBody(_)));
    }

    #[test]
    fn update_request_empty_region_is_invalid() {
        let err = UpdateRequest::from_slice(br#"{"jobid":"job1","region":" ","playerCount":1}"#)
            .unwrap_err();
        assert!(matches!(err, RegistryError::InvalidListing { .. }));
    }

    #[test]
    fn close_request_requires_jobid() {
        assert!(CloseRequest::from_slice(b"{}").is_err());
        assert!(CloseRequest::from_slice(br#"{"jobid":""}"#).is_err());
        assert_eq!(
            CloseRequest::from_slice(br#"{"jobid":"job1"}"#).unwrap().id,
            "job1"
        );
    }

    #[test]
    fn close_request_rejects_non_json() {
        let err = CloseRequest::from_slice(b"not json").unwrap_err();
        assert!(matches!(err, RegistryError::MalformedBody(_)));
    }

    #[test]
    fn listing_view_serializes_wire_names() {
        let view = ListingView {
            id: "job1".into(),
            region: "us-east".into(),
            player_count: 10,
        };
        let json = serde_json::to_string(&view).unwrap();
        assert_eq!(json, r#"{"jobid":"job1","region":"us-east","playerCount":10}"#);
    }
}
