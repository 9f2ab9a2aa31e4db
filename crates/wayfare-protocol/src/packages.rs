//! Travel package records.

use serde::{Deserialize, Serialize};

/// A bookable travel package as listed by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Package {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub destination: String,
    pub price: f64,
    /// Free text such as `5D/4N`.
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// Image URL.
    #[serde(default)]
    pub image: Option<String>,
}

/// `POST /packages` body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewPackage {
    pub title: String,
    pub destination: String,
    pub price: f64,
    pub duration: String,
    pub description: String,
    pub image: String,
}
