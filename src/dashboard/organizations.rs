//! Organization licensing operations
//!
//! Endpoint wrappers and wire models for the Dashboard organization and
//! co-term licensing endpoints.

use crate::dashboard::DashboardClient;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Device type whose seat count the claiming workflow reports on
/// (Systems Manager).
pub const SM_DEVICE_TYPE: &str = "SM";

#[derive(Debug, Clone, Deserialize)]
pub struct Organization {
    pub id: String,
    pub name: String,
}

/// A per-device license record.
///
/// The listing endpoint behind this model rejects co-term organizations,
/// which is exactly what the workflow relies on when probing the
/// licensing mode.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct License {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub license_key: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
}

/// Co-term license overview: one shared expiration date plus device
/// counts grouped by device type.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LicenseOverview {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub expiration_date: Option<String>,
    #[serde(default)]
    pub licensed_device_counts: HashMap<String, u64>,
}

impl LicenseOverview {
    /// Seat count for a device type. Types absent from the counts map
    /// count as zero.
    pub fn seat_count(&self, device_type: &str) -> u64 {
        self.licensed_device_counts
            .get(device_type)
            .copied()
            .unwrap_or(0)
    }

    pub fn expiration_label(&self) -> &str {
        self.expiration_date.as_deref().unwrap_or("N/A")
    }
}

/// Claim mode on the wire: `addDevices` grows capacity, `renew` extends
/// the shared term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ClaimMode {
    AddDevices,
    Renew,
}

impl ClaimMode {
    /// `RENEW`, verbatim, selects renewal; any other input adds capacity.
    pub fn from_input(input: &str) -> Self {
        if input == "RENEW" {
            ClaimMode::Renew
        } else {
            ClaimMode::AddDevices
        }
    }
}

impl fmt::Display for ClaimMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClaimMode::AddDevices => write!(f, "ADD"),
            ClaimMode::Renew => write!(f, "RENEW"),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LicenseClaim {
    pub key: String,
    pub mode: ClaimMode,
}

#[derive(Serialize)]
struct ClaimRequest<'a> {
    licenses: &'a [LicenseClaim],
}

/// List every organization the API key can see.
pub async fn list_organizations(client: &DashboardClient) -> Result<Vec<Organization>> {
    client.get("organizations").await
}

/// List per-device licenses for an organization.
///
/// Only valid for per-device-licensed organizations; co-term
/// organizations reject it with an error body naming the unsupported
/// mode. The workflow uses that rejection as its licensing-mode probe.
pub async fn get_licenses(client: &DashboardClient, org_id: &str) -> Result<Vec<License>> {
    client
        .get(&format!("organizations/{}/licenses", org_id))
        .await
}

/// Fetch the co-term license overview for an organization.
pub async fn get_license_overview(
    client: &DashboardClient,
    org_id: &str,
) -> Result<LicenseOverview> {
    client
        .get(&format!("organizations/{}/licenses/overview", org_id))
        .await
}

/// Claim license keys into an organization.
pub async fn claim_licenses(
    client: &DashboardClient,
    org_id: &str,
    licenses: &[LicenseClaim],
) -> Result<serde_json::Value> {
    client
        .post(
            &format!("organizations/{}/claim", org_id),
            &ClaimRequest { licenses },
        )
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_seat_type_counts_as_zero() {
        let overview = LicenseOverview::default();
        assert_eq!(overview.seat_count(SM_DEVICE_TYPE), 0);

        let overview: LicenseOverview = serde_json::from_value(json!({
            "expirationDate": "Mar 16, 2027 UTC",
            "licensedDeviceCounts": {"MX": 5}
        }))
        .unwrap();
        assert_eq!(overview.seat_count(SM_DEVICE_TYPE), 0);
    }

    #[test]
    fn overview_decodes_dashboard_shape() {
        let overview: LicenseOverview = serde_json::from_value(json!({
            "status": "OK",
            "expirationDate": "Mar 16, 2027 UTC",
            "licensedDeviceCounts": {"SM": 100, "MX": 3}
        }))
        .unwrap();

        assert_eq!(overview.seat_count(SM_DEVICE_TYPE), 100);
        assert_eq!(overview.expiration_label(), "Mar 16, 2027 UTC");
    }

    #[test]
    fn absent_expiration_reads_as_na() {
        let overview: LicenseOverview = serde_json::from_value(json!({})).unwrap();
        assert_eq!(overview.expiration_label(), "N/A");
    }

    #[test]
    fn claim_mode_wire_values() {
        assert_eq!(
            serde_json::to_value(ClaimMode::AddDevices).unwrap(),
            json!("addDevices")
        );
        assert_eq!(serde_json::to_value(ClaimMode::Renew).unwrap(), json!("renew"));
    }

    #[test]
    fn claim_request_body_shape() {
        let claims = [LicenseClaim {
            key: "Z2AA-BBBB-CCCC".into(),
            mode: ClaimMode::Renew,
        }];
        let body = serde_json::to_value(ClaimRequest { licenses: &claims }).unwrap();
        assert_eq!(
            body,
            json!({"licenses": [{"key": "Z2AA-BBBB-CCCC", "mode": "renew"}]})
        );
    }

    #[test]
    fn renew_keyword_is_exact() {
        assert_eq!(ClaimMode::from_input("RENEW"), ClaimMode::Renew);
        assert_eq!(ClaimMode::from_input("renew"), ClaimMode::AddDevices);
        assert_eq!(ClaimMode::from_input("Renew"), ClaimMode::AddDevices);
        assert_eq!(ClaimMode::from_input("RENEW "), ClaimMode::AddDevices);
        assert_eq!(ClaimMode::from_input(""), ClaimMode::AddDevices);
        assert_eq!(ClaimMode::from_input("ADD"), ClaimMode::AddDevices);
    }
}
