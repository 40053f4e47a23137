use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::{Bonus, Tossup};

/// One tournament packet as served by the bank.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Packet {
    #[serde(default)]
    pub number: Option<u32>,
    #[serde(default)]
    pub tossups: Vec<Tossup>,
    #[serde(default)]
    pub bonuses: Vec<Bonus>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoadPacketRequest {
    #[validate(length(min = 1, message = "set name must not be empty"))]
    pub set_name: String,
    pub packet_number: u32,
}

#[derive(Debug, Clone)]
pub struct PacketSession {
    pub set_name: String,
    pub packet_number: u32,
    pub packet: Packet,
}

#[derive(Debug, Serialize)]
pub struct PacketResponse {
    pub set_name: String,
    pub packet_number: u32,
    pub tossups: Vec<Tossup>,
    pub bonuses: Vec<Bonus>,
}

impl PacketResponse {
    pub fn from_session(session: &PacketSession) -> Self {
        Self {
            set_name: session.set_name.clone(),
            packet_number: session.packet_number,
            tossups: session.packet.tossups.clone(),
            bonuses: session.packet.bonuses.clone(),
        }
    }
}
