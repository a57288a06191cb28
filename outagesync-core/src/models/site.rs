//! Site and device types.

use serde::{Deserialize, Serialize};

/// An addressable unit at a site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    /// Device identifier, matched against [`crate::Outage::id`].
    pub id: String,
    /// Human-readable device name.
    pub name: String,
}

impl Device {
    /// Creates a device.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Site metadata returned by `GET site-info/{site_id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteInfo {
    /// Site identifier.
    pub id: String,
    /// Site display name.
    pub name: String,
    /// Devices installed at the site.
    pub devices: Vec<Device>,
}

/// One entry of the `POST site-outages/{site_id}` body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteOutage {
    /// Device identifier.
    pub id: String,
    /// Device name looked up from the site's device list.
    pub name: String,
    /// Raw begin timestamp, as received.
    pub begin: String,
    /// Raw end timestamp, as received.
    pub end: String,
}
