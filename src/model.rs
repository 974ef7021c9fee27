use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Portal roles, as stored by the accounts resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "cidc-admin")]
    Admin,
    #[serde(rename = "cidc-biofx-user")]
    CidcBiofx,
    #[serde(rename = "cimac-biofx-user")]
    CimacBiofx,
    #[serde(rename = "cimac-user")]
    CimacUser,
    #[serde(rename = "developer")]
    Developer,
    #[serde(rename = "devops")]
    Devops,
    #[serde(rename = "nci-biobank-user")]
    NciBiobank,
}

/// A user account record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    #[serde(rename = "_etag", default)]
    pub etag: String,
    #[serde(rename = "_created", default)]
    pub created: Option<String>,
    #[serde(rename = "_updated", default)]
    pub updated: Option<String>,
    pub id: i64,
    pub email: String,
    #[serde(default)]
    pub first_n: Option<String>,
    #[serde(default)]
    pub last_n: Option<String>,
    #[serde(default)]
    pub approved: bool,
    #[serde(default)]
    pub disabled: bool,
    #[serde(default)]
    pub role: Option<Role>,
    #[serde(default)]
    pub last_access: Option<String>,
    #[serde(default)]
    pub organization: Option<String>,
}

/// Fields accepted when registering a new account.
#[derive(Debug, Clone, Serialize)]
pub struct NewUser {
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_n: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_n: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,
}

/// A clinical trial record. `metadata_json` holds the full assay/shipment
/// metadata blob; this client passes it through without interpreting it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trial {
    #[serde(rename = "_etag", default)]
    pub etag: Option<String>,
    #[serde(default)]
    pub id: Option<i64>,
    pub trial_id: String,
    #[serde(default)]
    pub metadata_json: Value,
}

/// An ingested file available for download.
#[derive(Debug, Clone, Deserialize)]
pub struct DataFile {
    pub id: i64,
    #[serde(default)]
    pub trial_id: Option<String>,
    pub object_url: String,
    #[serde(default)]
    pub upload_type: Option<String>,
    #[serde(default)]
    pub file_size_bytes: Option<i64>,
    #[serde(default)]
    pub uploaded_timestamp: Option<String>,
    #[serde(default)]
    pub data_format: Option<String>,
}

/// A per-user grant of access to one trial/assay combination.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Permission {
    #[serde(rename = "_etag", default)]
    pub etag: Option<String>,
    #[serde(default)]
    pub id: Option<i64>,
    pub to_user: i64,
    pub trial: String,
    pub assay_type: String,
}
