//! Integration tests for the kiosk-core wire model.
//!
//! These tests drive raw reply bodies through the public API: the codec,
//! the typed response documents, the directive extraction, and the
//! wake-on-LAN packet builder together.

use kiosk_core::{
    parse_response,
    protocol::response::{LoginResponse, LogoutResponse, RegisterNodeResponse, UserDataResponse},
    protocol::UserStatus,
    MagicPacket, PowerAction, ProtocolError, RemoteDirectives, BANNER_KEYS,
};

fn directives(body: &str) -> RemoteDirectives {
    let resp: RegisterNodeResponse = parse_response(body.as_bytes()).expect("body must parse");
    RemoteDirectives::from_response(&resp)
}

#[test]
fn test_heartbeat_with_wakeup_builds_one_packet_per_target() {
    // Arrange
    let body = r#"{"wakeup": true, "wol_mac_addresses": ["AA:BB:CC:DD:EE:FF"],
                   "wol_host": "10.0.0.5", "wol_port": 9}"#;

    // Act
    let wake = directives(body).wake.expect("wake request expected");
    let packets: Vec<MagicPacket> = wake.targets.iter().copied().map(MagicPacket::new).collect();

    // Assert
    assert_eq!((wake.host.as_str(), wake.port), ("10.0.0.5", 9));
    assert_eq!(packets.len(), 1);
    let bytes = packets[0].as_bytes();
    assert_eq!(bytes.len(), 102);
    for offset in (6..102).step_by(6) {
        assert_eq!(&bytes[offset..offset + 6], &[0xAA, 0xBB, 0xCC, 0xDD, 0xEE, 0xFF]);
    }
}

#[test]
fn test_heartbeat_power_and_banner_fields() {
    // Arrange
    let body = r#"{
        "registered": "1", "shutdown": 0, "restart": "1",
        "LogoURL": "http://srv/logo.png", "BannerTopURL": null,
        "BannerTopWidth": 640, "reserved_for": "carol", "status": "online"
    }"#;

    // Act
    let d = directives(body);

    // Assert
    assert!(d.registered);
    assert_eq!(d.power, vec![PowerAction::Restart]);
    assert_eq!(d.setting("LogoURL"), Some("http://srv/logo.png"));
    assert_eq!(d.setting("BannerTopURL"), Some(""));
    assert_eq!(d.setting("BannerBottomURL"), None);
    assert_eq!(d.setting("BannerTopWidth"), Some("640"));
    assert_eq!(d.reserved_for, "carol");
    assert!(BANNER_KEYS.contains(&"BannerBottomURL"));
}

#[test]
fn test_malformed_heartbeat_is_a_protocol_error() {
    assert!(matches!(
        parse_response::<RegisterNodeResponse>(b"{\"registered\": tru"),
        Err(ProtocolError::MalformedJson(_))
    ));
    assert!(matches!(
        parse_response::<RegisterNodeResponse>(b"\"ok\""),
        Err(ProtocolError::NotAnObject(_))
    ));
}

#[test]
fn test_login_replies() {
    let ok: LoginResponse =
        parse_response(br#"{"authenticated": true, "units": 45, "hold_items_count": 2}"#).unwrap();
    assert!(ok.authenticated);
    assert_eq!((ok.units, ok.hold_items_count), (45, 2));

    let rejected: LoginResponse =
        parse_response(br#"{"authenticated": false, "error": "CARD_LOST"}"#).unwrap();
    assert!(!rejected.authenticated);
    assert_eq!(rejected.error, "CARD_LOST");
}

#[test]
fn test_logout_reply_missing_flag_reads_false() {
    let resp: LogoutResponse = parse_response(b"{}").unwrap();
    assert!(!resp.logged_out);
}

#[test]
fn test_user_data_zero_units_while_logged_in() {
    let resp: UserDataResponse =
        parse_response(br#"{"status":"Logged in","units":0,"messages":[]}"#).unwrap();
    assert_eq!(resp.user_status(), UserStatus::LoggedIn);
    assert_eq!(resp.units, Some(0));
    assert!(resp.messages.is_empty());
}
