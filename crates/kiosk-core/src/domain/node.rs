//! Identity of this workstation as reported to the management server.

/// Immutable node identity, built once at startup from the OS and the
/// `node/*` configuration group.
///
/// All fields are plain strings because they travel verbatim as query items;
/// an unknown value (for example no MAC address on this platform) is sent as
/// an empty string rather than omitted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeIdentity {
    /// Node name (`node/name`, falling back to the OS hostname).
    pub name: String,
    /// Physical location (`node/location`).
    pub location: String,
    /// Node type (`node/type`).
    pub node_type: String,
    /// Minimum user age (`node/age_limit`).
    pub age_limit: String,
    pub ip_address: String,
    pub mac_address: String,
    pub hostname: String,
}
