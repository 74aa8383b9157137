//! Compute resource models and their wire envelopes.
//!
//! The provider nests every payload under a fixed key, and collections one
//! level deeper under a singular key:
//!
//! ```json
//! {"servers": {"server": [{"uuid": "...", "state": "started"}]}}
//! ```
//!
//! Each envelope type mirrors that nesting exactly; flattening happens
//! explicitly through `into_inner()` and `into_vec()`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use upcloud_core::uuid::{ServerUuid, StorageUuid};
use validator::Validate;

/// A list nested under a single named key, e.g. `{"tag": ["a", "b"]}`.
///
/// A missing key decodes as an empty list.
macro_rules! keyed_list {
    ($(#[$meta:meta])* $name:ident, $key:literal, $item:ty) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
        pub struct $name {
            #[doc = concat!("Entries nested under `", $key, "`.")]
            #[serde(rename = $key, default)]
            pub items: Vec<$item>,
        }

        impl $name {
            /// Returns true when the list has no entries.
            #[must_use]
            pub fn is_empty(&self) -> bool {
                self.items.is_empty()
            }

            /// Number of entries.
            #[must_use]
            pub fn len(&self) -> usize {
                self.items.len()
            }

            /// Iterate over the entries.
            pub fn iter(&self) -> std::slice::Iter<'_, $item> {
                self.items.iter()
            }

            /// Unwrap into the plain list.
            #[must_use]
            pub fn into_vec(self) -> Vec<$item> {
                self.items
            }
        }

        impl From<Vec<$item>> for $name {
            fn from(items: Vec<$item>) -> Self {
                Self { items }
            }
        }

        impl IntoIterator for $name {
            type Item = $item;
            type IntoIter = std::vec::IntoIter<$item>;

            fn into_iter(self) -> Self::IntoIter {
                self.items.into_iter()
            }
        }
    };
}

/// A single value nested under a named top-level key, e.g. `{"account": {...}}`.
macro_rules! envelope {
    ($(#[$meta:meta])* $name:ident, $key:literal, $inner:ty) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
        pub struct $name {
            #[doc = concat!("Payload nested under `", $key, "`.")]
            #[serde(rename = $key)]
            pub inner: $inner,
        }

        impl $name {
            /// Wrap a payload.
            #[must_use]
            pub const fn new(inner: $inner) -> Self {
                Self { inner }
            }

            /// Unwrap the payload.
            #[must_use]
            pub fn into_inner(self) -> $inner {
                self.inner
            }
        }

        impl From<$inner> for $name {
            fn from(inner: $inner) -> Self {
                Self::new(inner)
            }
        }
    };
}

// ---------------------------------------------------------------------------
// Account
// ---------------------------------------------------------------------------

/// The account the credentials belong to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    /// Account username.
    pub username: String,
    /// Remaining credits.
    ///
    /// Accepted as a JSON number or a numeric string; always written as a
    /// number.
    #[serde(deserialize_with = "number_or_string")]
    pub credits: f64,
}

fn number_or_string<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(value) => Ok(value),
        Raw::Text(text) => text.trim().parse().map_err(serde::de::Error::custom),
    }
}

envelope!(
    /// Wire form of [`Account`].
    AccountEnvelope,
    "account",
    Account
);

// ---------------------------------------------------------------------------
// Zones, plans and sizes
// ---------------------------------------------------------------------------

/// A data center zone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Zone {
    /// Human readable location.
    pub description: String,
    /// Zone identifier, e.g. `fi-hel1`.
    pub id: String,
    /// `yes` when the zone is publicly available.
    pub public: String,
}

impl Zone {
    /// Whether the zone is open to all accounts.
    #[must_use]
    pub fn is_public(&self) -> bool {
        self.public == "yes"
    }
}

keyed_list!(
    /// Zones nested under `zone`.
    Zones,
    "zone",
    Zone
);

envelope!(
    /// Wire form of the zone collection.
    ZonesEnvelope,
    "zones",
    Zones
);

/// A preconfigured server plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    /// CPU cores.
    pub core_number: u32,
    /// Memory in MiB.
    pub memory_amount: u32,
    /// Plan name, e.g. `1xCPU-1GB`.
    pub name: String,
    /// Included outbound public traffic in GiB.
    pub public_traffic_out: u32,
    /// Included storage in GiB.
    pub storage_size: u32,
    /// Storage tier of the included storage.
    pub storage_tier: String,
}

keyed_list!(
    /// Plans nested under `plan`.
    Plans,
    "plan",
    Plan
);

envelope!(
    /// Wire form of the plan collection.
    PlansEnvelope,
    "plans",
    Plans
);

/// An allowed CPU/memory combination for custom servers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerSize {
    /// CPU cores.
    pub core_number: String,
    /// Memory in MiB.
    pub memory_amount: String,
}

keyed_list!(
    /// Sizes nested under `server_size`.
    ServerSizes,
    "server_size",
    ServerSize
);

envelope!(
    /// Wire form of the server size collection.
    ServerSizesEnvelope,
    "server_sizes",
    ServerSizes
);

// ---------------------------------------------------------------------------
// Servers
// ---------------------------------------------------------------------------

/// Server power state as reported by the provider.
///
/// The client never enforces transitions; it only reports what it was told.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServerState {
    /// Running.
    Started,
    /// Powered off.
    Stopped,
    /// Undergoing a provider-side operation.
    Maintenance,
    /// Failed state.
    Error,
    /// Any state this client does not know about.
    #[serde(other)]
    Unknown,
}

impl ServerState {
    /// Wire representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Started => "started",
            Self::Stopped => "stopped",
            Self::Maintenance => "maintenance",
            Self::Error => "error",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ServerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

keyed_list!(
    /// Server tags nested under `tag`.
    Tags,
    "tag",
    String
);

/// An IP address attached to a server or interface.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IpAddress {
    /// `public`, `private` or `utility`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access: Option<String>,
    /// The address itself.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// `IPv4` or `IPv6`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family: Option<String>,
}

keyed_list!(
    /// Addresses nested under `ip_address`.
    IpAddresses,
    "ip_address",
    IpAddress
);

/// A network interface.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Interface {
    /// Interface index.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<u32>,
    /// Addresses bound to the interface.
    #[serde(default, skip_serializing_if = "IpAddresses::is_empty")]
    pub ip_addresses: IpAddresses,
    /// MAC address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mac: Option<String>,
    /// Attached network UUID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network: Option<String>,
    /// `public`, `private` or `utility`.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub interface_type: Option<String>,
    /// `yes` when the interface is used for network boot.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bootable: Option<String>,
}

keyed_list!(
    /// Interfaces nested under `interface`.
    Interfaces,
    "interface",
    Interface
);

/// Server networking configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Networking {
    /// Network interfaces.
    #[serde(default)]
    pub interfaces: Interfaces,
}

/// A storage attached to (or to be created for) a server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageDevice {
    /// `create`, `clone` or `attach`; only meaningful when creating a server.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    /// Bus address, e.g. `virtio:0`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// `yes` when included in the plan.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub part_of_plan: Option<String>,
    /// Storage UUID (source for `clone`/`attach`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage: Option<StorageUuid>,
    /// Size in GiB.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_size: Option<u32>,
    /// Title of the attached storage.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_title: Option<String>,
    /// `disk` or `cdrom`.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub device_type: Option<String>,
    /// Title for a storage created along with the server.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// `1` when this is the boot disk.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub boot_disk: Option<String>,
}

keyed_list!(
    /// Storage devices nested under `storage_device`.
    StorageDevices,
    "storage_device",
    StorageDevice
);

/// Server summary as returned by the server listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Server {
    /// CPU cores.
    pub core_number: String,
    /// Hostname.
    pub hostname: String,
    /// License cost.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<u32>,
    /// Memory in MiB.
    pub memory_amount: String,
    /// Plan name or `custom`.
    pub plan: String,
    /// IPv4 traffic used within the plan.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan_ipv4_bytes: Option<String>,
    /// IPv6 traffic used within the plan.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan_ipv6_bytes: Option<String>,
    /// Power state.
    pub state: ServerState,
    /// Tags.
    #[serde(default, skip_serializing_if = "Tags::is_empty")]
    pub tags: Tags,
    /// Title.
    pub title: String,
    /// Server UUID.
    pub uuid: ServerUuid,
    /// Zone identifier.
    pub zone: String,
}

keyed_list!(
    /// Servers nested under `server`.
    Servers,
    "server",
    Server
);

envelope!(
    /// Wire form of the server collection.
    ServersEnvelope,
    "servers",
    Servers
);

/// Full server representation.
///
/// Used both for reading a server and for describing one to create, so every
/// attribute is optional: unset attributes are left out of the request and
/// the provider's defaults apply.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServerDetails {
    /// Boot device order, e.g. `disk,cdrom`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub boot_order: Option<String>,
    /// CPU cores.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub core_number: Option<String>,
    /// `on` or `off`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub firewall: Option<String>,
    /// Host the server runs on.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<i64>,
    /// Hostname.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
    /// Addresses assigned to the server.
    #[serde(default, skip_serializing_if = "IpAddresses::is_empty")]
    pub ip_addresses: IpAddresses,
    /// License cost.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<u32>,
    /// Memory in MiB.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory_amount: Option<String>,
    /// Network interfaces.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub networking: Option<Networking>,
    /// NIC model, e.g. `virtio`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nic_model: Option<String>,
    /// Plan name or `custom`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan: Option<String>,
    /// IPv4 traffic used within the plan.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan_ipv4_bytes: Option<String>,
    /// IPv6 traffic used within the plan.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan_ipv6_bytes: Option<String>,
    /// Backup schedule, e.g. `0400,dailies` or `no`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub simple_backup: Option<String>,
    /// Power state; assigned by the provider.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<ServerState>,
    /// Attached storages.
    #[serde(default, skip_serializing_if = "StorageDevices::is_empty")]
    pub storage_devices: StorageDevices,
    /// Tags.
    #[serde(default, skip_serializing_if = "Tags::is_empty")]
    pub tags: Tags,
    /// Timezone, e.g. `UTC`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    /// Title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Server UUID; assigned by the provider.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uuid: Option<ServerUuid>,
    /// Video model, e.g. `vga`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_model: Option<String>,
    /// `yes` when remote console access is enabled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_access_enabled: Option<String>,
    /// `vnc` or `spice`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_access_type: Option<String>,
    /// Remote console host.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_access_host: Option<String>,
    /// Remote console password.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_access_password: Option<String>,
    /// Remote console port.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_access_port: Option<String>,
    /// Zone identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zone: Option<String>,
}

impl ServerDetails {
    /// Start describing a server to create in `zone`.
    #[must_use]
    pub fn new(
        zone: impl Into<String>,
        title: impl Into<String>,
        hostname: impl Into<String>,
    ) -> Self {
        Self {
            zone: Some(zone.into()),
            title: Some(title.into()),
            hostname: Some(hostname.into()),
            ..Self::default()
        }
    }

    /// Use a preconfigured plan.
    #[must_use]
    pub fn with_plan(mut self, plan: impl Into<String>) -> Self {
        self.plan = Some(plan.into());
        self
    }

    /// Attach a storage device.
    #[must_use]
    pub fn with_storage_device(mut self, device: StorageDevice) -> Self {
        self.storage_devices.items.push(device);
        self
    }

    /// Add a tag.
    #[must_use]
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.items.push(tag.into());
        self
    }
}

envelope!(
    /// Wire form of a single server, used in both directions.
    ServerEnvelope,
    "server",
    ServerDetails
);

// ---------------------------------------------------------------------------
// Server actions
// ---------------------------------------------------------------------------

/// Options for starting a server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartServerRequest {
    /// Start on this specific host.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<i64>,
    /// Start on any host but this one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avoid_host: Option<i64>,
}

envelope!(
    /// Wire form of [`StartServerRequest`].
    StartServerEnvelope,
    "server",
    StartServerRequest
);

/// How a server is stopped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StopType {
    /// ACPI shutdown, forced after the timeout.
    #[default]
    Soft,
    /// Immediate power off.
    Hard,
}

/// Options for stopping a server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct StopServerRequest {
    /// Soft or hard stop.
    pub stop_type: StopType,
    /// Seconds to wait for a soft stop before forcing it (1-600).
    #[validate(range(min = 1, max = 600))]
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "seconds_string"
    )]
    pub timeout: Option<u32>,
}

impl StopServerRequest {
    /// Stop with the given type and the provider's default timeout.
    #[must_use]
    pub const fn new(stop_type: StopType) -> Self {
        Self {
            stop_type,
            timeout: None,
        }
    }

    /// Set the soft-stop timeout in seconds.
    #[must_use]
    pub const fn with_timeout(mut self, seconds: u32) -> Self {
        self.timeout = Some(seconds);
        self
    }
}

envelope!(
    /// Wire form of [`StopServerRequest`].
    StopServerEnvelope,
    "stop_server",
    StopServerRequest
);

/// The provider expects the stop timeout as a string of seconds.
mod seconds_string {
    use serde::{Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(u32),
        Text(String),
    }

    pub fn serialize<S>(value: &Option<u32>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(seconds) => serializer.serialize_str(&seconds.to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<Raw>::deserialize(deserializer)? {
            None => Ok(None),
            Some(Raw::Number(seconds)) => Ok(Some(seconds)),
            Some(Raw::Text(text)) => text.parse().map(Some).map_err(serde::de::Error::custom),
        }
    }
}

// ---------------------------------------------------------------------------
// Storage
// ---------------------------------------------------------------------------

/// Filters accepted by the storage listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageFilter {
    /// Every storage visible to the account.
    All,
    /// Public templates and CD-ROMs.
    Public,
    /// Storages owned by the account.
    Private,
    /// Normal disks.
    Normal,
    /// Backups.
    Backup,
    /// CD-ROM images.
    Cdrom,
    /// Templates.
    Template,
    /// Favorites.
    Favorite,
}

impl StorageFilter {
    /// Path segment for this filter.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Public => "public",
            Self::Private => "private",
            Self::Normal => "normal",
            Self::Backup => "backup",
            Self::Cdrom => "cdrom",
            Self::Template => "template",
            Self::Favorite => "favorite",
        }
    }
}

impl fmt::Display for StorageFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A storage (disk, backup, template or CD-ROM).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Storage {
    /// `public` or `private`.
    pub access: String,
    /// License cost.
    pub license: f64,
    /// Size in GiB.
    pub size: u32,
    /// `online`, `maintenance`, `cloning`, `backuping` or `error`.
    pub state: String,
    /// Storage tier, e.g. `maxiops`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tier: Option<String>,
    /// Title.
    pub title: String,
    /// `normal`, `backup`, `cdrom` or `template`.
    #[serde(rename = "type")]
    pub storage_type: String,
    /// Storage UUID.
    pub uuid: StorageUuid,
    /// Zone identifier.
    pub zone: String,
    /// Creation time (backups).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<DateTime<Utc>>,
    /// Source storage of a backup.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<StorageUuid>,
    /// `yes` when included in a server plan.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub part_of_plan: Option<String>,
}

keyed_list!(
    /// Storages nested under `storage`.
    Storages,
    "storage",
    Storage
);

envelope!(
    /// Wire form of the storage collection.
    StoragesEnvelope,
    "storages",
    Storages
);

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_zones_envelope_nesting() {
        let body = json!({
            "zones": {
                "zone": [
                    {"description": "Helsinki #1", "id": "fi-hel1", "public": "yes"},
                    {"description": "Private zone", "id": "xx-prv1", "public": "no"}
                ]
            }
        });

        let zones = serde_json::from_value::<ZonesEnvelope>(body)
            .unwrap()
            .into_inner()
            .into_vec();
        assert_eq!(zones.len(), 2);
        assert!(zones[0].is_public());
        assert!(!zones[1].is_public());
    }

    #[test]
    fn test_flat_collection_is_rejected() {
        let body = json!({"zones": [{"description": "d", "id": "fi-hel1", "public": "yes"}]});
        assert!(serde_json::from_value::<ZonesEnvelope>(body).is_err());
    }

    #[test]
    fn test_empty_collection() {
        let servers: ServersEnvelope = serde_json::from_value(json!({"servers": {}})).unwrap();
        assert!(servers.into_inner().is_empty());
    }

    #[test]
    fn test_server_state_unknown() {
        let state: ServerState = serde_json::from_value(json!("hibernating")).unwrap();
        assert_eq!(state, ServerState::Unknown);
        let state: ServerState = serde_json::from_value(json!("maintenance")).unwrap();
        assert_eq!(state, ServerState::Maintenance);
        assert_eq!(ServerState::Started.to_string(), "started");
    }

    #[test]
    fn test_account_credits_number_or_string() {
        let number: AccountEnvelope =
            serde_json::from_value(json!({"account": {"username": "a", "credits": 123.4}}))
                .unwrap();
        let text: AccountEnvelope =
            serde_json::from_value(json!({"account": {"username": "a", "credits": "123.4"}}))
                .unwrap();
        assert_eq!(number, text);
        assert!((text.into_inner().credits - 123.4).abs() < f64::EPSILON);

        let bad = json!({"account": {"username": "a", "credits": "plenty"}});
        assert!(serde_json::from_value::<AccountEnvelope>(bad).is_err());
    }

    #[test]
    fn test_create_server_omits_unset_fields() {
        let details = ServerDetails::new("fi-hel1", "web", "web.example.com")
            .with_plan("1xCPU-1GB")
            .with_storage_device(StorageDevice {
                action: Some("clone".into()),
                storage: Some(
                    StorageUuid::parse_str("01000000-0000-4000-8000-000030060200").unwrap(),
                ),
                title: Some("web-disk".into()),
                storage_size: Some(25),
                ..StorageDevice::default()
            });

        let value = serde_json::to_value(ServerEnvelope::new(details)).unwrap();
        assert_eq!(
            value,
            json!({
                "server": {
                    "hostname": "web.example.com",
                    "plan": "1xCPU-1GB",
                    "storage_devices": {
                        "storage_device": [{
                            "action": "clone",
                            "storage": "01000000-0000-4000-8000-000030060200",
                            "storage_size": 25,
                            "title": "web-disk"
                        }]
                    },
                    "title": "web",
                    "zone": "fi-hel1"
                }
            })
        );
    }

    #[test]
    fn test_start_server_envelope() {
        let request = StartServerRequest {
            host: None,
            avoid_host: Some(7653),
        };
        let value = serde_json::to_value(StartServerEnvelope::new(request)).unwrap();
        assert_eq!(value, json!({"server": {"avoid_host": 7653}}));

        let empty = serde_json::to_value(StartServerEnvelope::new(StartServerRequest::default()))
            .unwrap();
        assert_eq!(empty, json!({"server": {}}));
    }

    #[test]
    fn test_stop_server_envelope() {
        let request = StopServerRequest::new(StopType::Soft).with_timeout(60);
        let value = serde_json::to_value(StopServerEnvelope::new(request.clone())).unwrap();
        assert_eq!(
            value,
            json!({"stop_server": {"stop_type": "soft", "timeout": "60"}})
        );

        let back: StopServerEnvelope = serde_json::from_value(value).unwrap();
        assert_eq!(back.into_inner(), request);

        let hard = serde_json::to_value(StopServerEnvelope::new(StopServerRequest::new(
            StopType::Hard,
        )))
        .unwrap();
        assert_eq!(hard, json!({"stop_server": {"stop_type": "hard"}}));
    }

    #[test]
    fn test_stop_timeout_validation() {
        assert!(StopServerRequest::new(StopType::Soft).validate().is_ok());
        assert!(StopServerRequest::new(StopType::Soft)
            .with_timeout(1)
            .validate()
            .is_ok());
        assert!(StopServerRequest::new(StopType::Soft)
            .with_timeout(600)
            .validate()
            .is_ok());
        assert!(StopServerRequest::new(StopType::Soft)
            .with_timeout(0)
            .validate()
            .is_err());
        assert!(StopServerRequest::new(StopType::Soft)
            .with_timeout(601)
            .validate()
            .is_err());
    }

    #[test]
    fn test_stop_timeout_accepts_number() {
        let request: StopServerRequest =
            serde_json::from_value(json!({"stop_type": "hard", "timeout": 30})).unwrap();
        assert_eq!(request.timeout, Some(30));
        assert!(serde_json::from_value::<StopServerRequest>(
            json!({"stop_type": "hard", "timeout": "soon"})
        )
        .is_err());
    }

    #[test]
    fn test_storage_filter_as_str() {
        let all = [
            (StorageFilter::All, "all"),
            (StorageFilter::Public, "public"),
            (StorageFilter::Private, "private"),
            (StorageFilter::Normal, "normal"),
            (StorageFilter::Backup, "backup"),
            (StorageFilter::Cdrom, "cdrom"),
            (StorageFilter::Template, "template"),
            (StorageFilter::Favorite, "favorite"),
        ];
        for (filter, expected) in all {
            assert_eq!(filter.to_string(), expected);
        }
    }

    #[test]
    fn test_storage_type_rename() {
        let storage: Storage = serde_json::from_value(json!({
            "access": "private",
            "license": 0,
            "size": 10,
            "state": "online",
            "tier": "maxiops",
            "title": "db-disk",
            "type": "normal",
            "uuid": "01d4fcd4-e446-433b-8a9c-551a1284952e",
            "zone": "fi-hel1"
        }))
        .unwrap();
        assert_eq!(storage.storage_type, "normal");
        assert!(storage.created.is_none());

        let value = serde_json::to_value(&storage).unwrap();
        assert_eq!(value["type"], "normal");
        assert!(value.get("created").is_none());
    }

    #[test]
    fn test_keyed_list_into_iter() {
        let tags = Tags::from(vec!["web".to_string(), "prod".to_string()]);
        assert_eq!(tags.len(), 2);
        let collected: Vec<String> = tags.into_iter().collect();
        assert_eq!(collected, vec!["web", "prod"]);
    }
}
