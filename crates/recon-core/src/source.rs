//! The four known inventory sources and their export schemas
//!
//! Every column string here must match the upstream export headers exactly,
//! including spacing and capitalization.

use crate::error::UnknownSourceKind;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A native export column paired with its canonical output column
pub type FieldMapping = (&'static str, &'static str);

/// One of the inventory systems whose export can be reconciled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// Identity directory (Azure AD / Entra device export)
    Identity,
    /// Helpdesk ticketing asset list (FreshService)
    Ticketing,
    /// Endpoint-protection console (Sophos)
    EndpointProtection,
    /// Device recovery / theft tracking (Absolute)
    RecoveryTracking,
}

const IDENTITY_FIELDS: &[FieldMapping] = &[
    ("displayName", "Identity Device Name"),
    ("operatingSystem", "Identity Operating System"),
    ("joinType (trustType)", "Identity Join Type"),
    ("userNames", "Identity User Names"),
    ("registrationTime", "Identity Registration Time"),
    ("approximateLastSignInDateTime", "Identity Last Sign In"),
];

const TICKETING_FIELDS: &[FieldMapping] = &[
    ("Display Name", "Ticketing Device Name"),
    ("Serial Number", "Ticketing Serial Number"),
    ("Used By", "Ticketing Used By"),
    ("Last login by", "Ticketing Last Login By"),
    ("Acquisition Date", "Ticketing Acquisition Date"),
    ("Warranty Expiry Date", "Ticketing Warranty Expiry Date"),
    ("Asset State", "Ticketing Asset State"),
    ("Last Audit Date", "Ticketing Last Audit Date"),
];

const ENDPOINT_FIELDS: &[FieldMapping] = &[
    ("Name", "Endpoint Device Name"),
    ("Health Status", "Endpoint Health Status"),
    ("IP", "Endpoint IP"),
    ("OS", "Endpoint OS"),
    ("Protection", "Endpoint Protection"),
    ("Last User", "Endpoint Last User"),
    ("Last Active", "Endpoint Last Active"),
];

const RECOVERY_FIELDS: &[FieldMapping] = &[
    ("Device name", "Recovery Device Name"),
    ("Serial number", "Recovery Serial Number"),
    ("Last connected", "Recovery Last Connected"),
    ("Username", "Recovery Username"),
    ("Make", "Recovery Make"),
    ("Model", "Recovery Model"),
    ("Local IP address", "Recovery Local IP Address"),
    ("Public IP address", "Recovery Public IP Address"),
    ("Encryption status", "Recovery Encryption Status"),
];

impl SourceKind {
    /// All kinds in the fixed detection, merge and output order
    pub const ALL: [SourceKind; 4] = [
        SourceKind::Identity,
        SourceKind::Ticketing,
        SourceKind::EndpointProtection,
        SourceKind::RecoveryTracking,
    ];

    /// Position of this kind within [`SourceKind::ALL`]
    pub fn index(self) -> usize {
        match self {
            SourceKind::Identity => 0,
            SourceKind::Ticketing => 1,
            SourceKind::EndpointProtection => 2,
            SourceKind::RecoveryTracking => 3,
        }
    }

    /// Human-readable name
    pub fn label(self) -> &'static str {
        match self {
            SourceKind::Identity => "Identity",
            SourceKind::Ticketing => "Ticketing",
            SourceKind::EndpointProtection => "Endpoint Protection",
            SourceKind::RecoveryTracking => "Recovery Tracking",
        }
    }

    /// Lowercase identifier used in config values and file names
    pub fn slug(self) -> &'static str {
        match self {
            SourceKind::Identity => "identity",
            SourceKind::Ticketing => "ticketing",
            SourceKind::EndpointProtection => "endpoint_protection",
            SourceKind::RecoveryTracking => "recovery_tracking",
        }
    }

    /// Column expected only in this source's export, used for detection
    pub fn fingerprint_column(self) -> &'static str {
        match self {
            SourceKind::Identity => "joinType (trustType)",
            SourceKind::Ticketing => "Used By",
            SourceKind::EndpointProtection => "Health Status",
            SourceKind::RecoveryTracking => "Encryption status",
        }
    }

    /// Column holding the device name used as the matching key
    pub fn name_column(self) -> &'static str {
        match self {
            SourceKind::Identity => "displayName",
            SourceKind::Ticketing => "Display Name",
            SourceKind::EndpointProtection => "Name",
            SourceKind::RecoveryTracking => "Device name",
        }
    }

    /// Native column to canonical column table, in output order
    pub fn field_map(self) -> &'static [FieldMapping] {
        match self {
            SourceKind::Identity => IDENTITY_FIELDS,
            SourceKind::Ticketing => TICKETING_FIELDS,
            SourceKind::EndpointProtection => ENDPOINT_FIELDS,
            SourceKind::RecoveryTracking => RECOVERY_FIELDS,
        }
    }

    /// Output column carrying this kind's presence flag
    pub fn presence_column(self) -> &'static str {
        match self {
            SourceKind::Identity => "In Identity",
            SourceKind::Ticketing => "In Ticketing",
            SourceKind::EndpointProtection => "In Endpoint Protection",
            SourceKind::RecoveryTracking => "In Recovery Tracking",
        }
    }

    /// The other three kinds, in fixed order
    pub fn others(self) -> impl Iterator<Item = SourceKind> {
        Self::ALL.into_iter().filter(move |k| *k != self)
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SourceKind {
    type Err = UnknownSourceKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .to_ascii_lowercase()
            .chars()
            .filter(|c| !matches!(c, ' ' | '_' | '-'))
            .collect();

        match normalized.as_str() {
            "identity" | "azure" | "entra" => Ok(SourceKind::Identity),
            "ticketing" | "helpdesk" | "freshservice" => Ok(SourceKind::Ticketing),
            "endpointprotection" | "endpoint" | "sophos" => Ok(SourceKind::EndpointProtection),
            "recoverytracking" | "recovery" | "absolute" => Ok(SourceKind::RecoveryTracking),
            _ => Err(UnknownSourceKind(s.to_string())),
        }
    }
}
