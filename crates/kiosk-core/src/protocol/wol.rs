//! Wake-on-LAN "magic packet" format.
//!
//! # What is a magic packet? (for beginners)
//!
//! A powered-off machine whose network card supports Wake-on-LAN keeps
//! listening for one specific frame: six `0xFF` bytes followed by the target's
//! own 6-byte MAC address repeated sixteen times, 102 bytes in total.  It does
//! not matter how the frame arrives, so it is normally sent as a UDP broadcast
//! datagram.  This module only builds the bytes; sending them is the client's
//! job.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Length of a MAC address in bytes.
pub const MAC_LEN: usize = 6;

/// Number of times the MAC address is repeated after the sync stream.
pub const MAC_REPETITIONS: usize = 16;

/// Total size of a magic packet: 6 sync bytes + 16 × 6 address bytes.
pub const MAGIC_PACKET_LEN: usize = MAC_LEN + MAC_LEN * MAC_REPETITIONS;

/// Errors produced when parsing a textual MAC address.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MacAddressError {
    #[error("MAC address {0:?} must have 6 colon-separated octets")]
    WrongLength(String),

    #[error("MAC address {input:?} has a non-hex octet {octet:?}")]
    BadOctet { input: String, octet: String },
}

/// A 48-bit hardware address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MacAddress([u8; MAC_LEN]);

impl MacAddress {
    pub fn from_bytes(bytes: [u8; MAC_LEN]) -> Self {
        Self(bytes)
    }

    /// Parses `aa:bb:cc:dd:ee:ff` (case-insensitive, surrounding whitespace
    /// ignored).  `-` is accepted as a separator as well.
    pub fn parse(input: &str) -> Result<Self, MacAddressError> {
        let trimmed = input.trim();
        let octets: Vec<&str> = trimmed.split(|c| c == ':' || c == '-').collect();
        if octets.len() != MAC_LEN {
            return Err(MacAddressError::WrongLength(input.to_string()));
        }

        let mut bytes = [0u8; MAC_LEN];
        for (slot, octet) in bytes.iter_mut().zip(&octets) {
            if octet.is_empty() || octet.len() > 2 {
                return Err(MacAddressError::BadOctet {
                    input: input.to_string(),
                    octet: octet.to_string(),
                });
            }
            *slot = u8::from_str_radix(octet, 16).map_err(|_| MacAddressError::BadOctet {
                input: input.to_string(),
                octet: octet.to_string(),
            })?;
        }
        Ok(Self(bytes))
    }

    pub fn octets(&self) -> [u8; MAC_LEN] {
        self.0
    }
}

impl FromStr for MacAddress {
    type Err = MacAddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(f, "{a:02x}:{b:02x}:{c:02x}:{d:02x}:{e:02x}:{g:02x}")
    }
}

/// The 102-byte wake frame for one MAC address.
#[derive(Clone, PartialEq, Eq)]
pub struct MagicPacket {
    bytes: [u8; MAGIC_PACKET_LEN],
}

impl MagicPacket {
    pub fn new(mac: MacAddress) -> Self {
        let mut bytes = [0xFFu8; MAGIC_PACKET_LEN];
        for chunk in bytes[MAC_LEN..].chunks_exact_mut(MAC_LEN) {
            chunk.copy_from_slice(&mac.0);
        }
        Self { bytes }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl fmt::Debug for MagicPacket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut target = [0u8; MAC_LEN];
        target.copy_from_slice(&self.bytes[MAC_LEN..MAC_LEN * 2]);
        f.debug_struct("MagicPacket")
            .field("target", &MacAddress(target).to_string())
            .finish()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_mac_address_lowercase_and_uppercase() {
        // Arrange / Act
        let lower = MacAddress::parse("aa:bb:cc:dd:ee:0f").unwrap();
        let upper = MacAddress::parse(" AA:BB:CC:DD:EE:0F ").unwrap();

        // Assert
        assert_eq!(lower, upper);
        assert_eq!(lower.octets(), [0xAA, 0xBB, 0xCC, 0xDD, 0xEE, 0x0F]);
    }

    #[test]
    fn test_parse_mac_address_with_dashes() {
        let mac: MacAddress = "01-02-03-04-05-06".parse().unwrap();
        assert_eq!(mac.octets(), [1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_parse_mac_address_wrong_length() {
        let err = MacAddress::parse("aa:bb:cc").unwrap_err();
        assert!(matches!(err, MacAddressError::WrongLength(_)));
    }

    #[test]
    fn test_parse_mac_address_bad_octet() {
        let err = MacAddress::parse("aa:bb:cc:dd:ee:zz").unwrap_err();
        assert_eq!(
            err,
            MacAddressError::BadOctet {
                input: "aa:bb:cc:dd:ee:zz".to_string(),
                octet: "zz".to_string()
            }
        );
    }

    #[test]
    fn test_mac_address_display_round_trips() {
        let mac = MacAddress::from_bytes([0, 0x1b, 0x2c, 0x3d, 0x4e, 0x5f]);
        assert_eq!(mac.to_string(), "00:1b:2c:3d:4e:5f");
    }

    #[test]
    fn test_magic_packet_layout() {
        // Arrange
        let mac = MacAddress::parse("01:23:45:67:89:ab").unwrap();

        // Act
        let packet = MagicPacket::new(mac);
        let bytes = packet.as_bytes();

        // Assert
        assert_eq!(bytes.len(), 102);
        assert!(bytes[..6].iter().all(|&b| b == 0xFF));
        for rep in bytes[6..].chunks(6) {
            assert_eq!(rep, &[0x01, 0x23, 0x45, 0x67, 0x89, 0xab]);
        }
    }
}
