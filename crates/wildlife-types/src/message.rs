//! Push channel message protocol

use super::Sighting;
use serde::{Deserialize, Serialize};

/// Event name carried by new-sighting broadcasts
pub const NEW_SIGHTING_EVENT: &str = "newSighting";

/// Server -> Client messages
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum ServerMessage {
    Connected {
        #[serde(rename = "connectionId")]
        connection_id: String,
    },
    NewSighting {
        data: Sighting,
        #[serde(rename = "imageCount")]
        image_count: usize,
    },
    Pong,
    Error {
        code: String,
        message: String,
    },
}

/// Client -> Server messages
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum ClientMessage {
    Ping,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_new_sighting_event_name() {
        let msg = ServerMessage::NewSighting {
            data: Sighting {
                id: "id-1".to_string(),
                species_name: "Monitor Lizard".to_string(),
                species_type: "Reptile".to_string(),
                coordinates: "1.35, 103.82".to_string(),
                date: "19/10/2026".to_string(),
                time: "08:00".to_string(),
                images: vec![],
                created_at: Utc::now(),
                updated_at: None,
            },
            image_count: 0,
        };

        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["event"], NEW_SIGHTING_EVENT);
        assert_eq!(json["imageCount"], 0);
        assert_eq!(json["data"]["_id"], "id-1");

        let parsed: ServerMessage = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, msg);
    }

    #[test]
    fn test_ping() {
        let msg: ClientMessage = serde_json::from_str(r#"{"event":"ping"}"#).unwrap();
        assert_eq!(msg, ClientMessage::Ping);
        assert_eq!(
            serde_json::to_string(&ServerMessage::Pong).unwrap(),
            r#"{"event":"pong"}"#
        );
    }
}
