//! Management API wire model: requests, response documents, body codec,
//! and the wake-on-LAN packet format.

pub mod codec;
pub mod request;
pub mod response;
pub mod sequence;
pub mod wol;

pub use codec::{parse_response, ProtocolError};
pub use request::{Action, ApiRequest, API_BASE_PATH, PRINT_UPLOAD_PATH};
pub use response::{
    LoginResponse, LogoutResponse, RegisterNodeResponse, UserDataResponse, UserStatus,
};
pub use sequence::ClaimCounter;
pub use wol::{MacAddress, MacAddressError, MagicPacket};
