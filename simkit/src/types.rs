use serde::{Deserialize, Serialize};
use std::fmt;

/// Running state of a node's telemetry service. The backend encodes this as
/// the literal strings "start" / "stop"; there is no third value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceState {
    Start,
    Stop,
}

impl ServiceState {
    pub fn is_running(self) -> bool {
        matches!(self, ServiceState::Start)
    }
}

impl fmt::Display for ServiceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceState::Start => write!(f, "start"),
            ServiceState::Stop => write!(f, "stop"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vertical {
    pub id: i64,
    pub name: String,
}

/// Parameter definition as the backend serves it. `min_value`/`max_value`
/// are the client-facing names; the start payload renames them (BoundSpec).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Parameter {
    pub id: i64,
    pub name: String,
    pub min_value: f64,
    pub max_value: f64,
    #[serde(default)]
    pub data_type: String,
    #[serde(default)]
    pub vertical_id: i64,
}

/// Node record from the list endpoints (`services` field).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    pub node_id: String,
    pub platform: String,
    pub protocol: String,
    pub frequency: u64,
    pub services: ServiceState,
    pub vertical_id: i64,
    #[serde(default)]
    pub parameter_id: String,
}

/// Node record from the detail endpoint. The backend names the state field
/// `status` here, `services` on list endpoints; same value space.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeDetail {
    pub node_id: String,
    pub platform: String,
    pub protocol: String,
    pub frequency: u64,
    pub status: ServiceState,
    #[serde(default)]
    pub vertical_name: Option<String>,
    #[serde(default)]
    pub parameters: Vec<Parameter>,
}

/// Parameter bounds as the start endpoint expects them. Renaming
/// `min_value`/`max_value` to `min`/`max` happens here and nowhere else.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BoundSpec {
    pub name: String,
    pub min: f64,
    pub max: f64,
}

impl From<&Parameter> for BoundSpec {
    fn from(p: &Parameter) -> Self {
        BoundSpec {
            name: p.name.clone(),
            min: p.min_value,
            max: p.max_value,
        }
    }
}

/// One element of the `PUT {host}/services/start` batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartCommand {
    pub node_id: String,
    pub frequency: u64,
    pub parameters: Vec<BoundSpec>,
    pub platform: String,
    pub protocol: String,
}

impl StartCommand {
    pub fn from_detail(node: &NodeDetail) -> Self {
        StartCommand {
            node_id: node.node_id.clone(),
            frequency: node.frequency,
            parameters: node.parameters.iter().map(BoundSpec::from).collect(),
            platform: node.platform.clone(),
            protocol: node.protocol.clone(),
        }
    }
}

/// One element of the `PUT {host}/services/stop` batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StopCommand {
    pub node_id: String,
}

// Creation payloads (provisioning forms).

#[derive(Debug, Clone, Serialize)]
pub struct NewVertical {
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewParameter {
    pub name: String,
    pub min_value: f64,
    pub max_value: f64,
    pub vertical_id: i64,
    pub data_type: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewNode {
    pub node_id: String,
    pub platform: String,
    pub protocol: String,
    pub frequency: u64,
    /// JSON-encoded array of parameter ids, e.g. `"[3,7]"`. The backend
    /// stores and re-parses the string form.
    pub parameter_id: String,
    pub services: ServiceState,
    pub vertical_id: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_detail() -> NodeDetail {
        NodeDetail {
            node_id: "WN01".to_string(),
            platform: "ccsp".to_string(),
            protocol: "https".to_string(),
            frequency: 60,
            status: ServiceState::Stop,
            vertical_name: Some("WATER".to_string()),
            parameters: vec![
                Parameter {
                    id: 1,
                    name: "pm10".to_string(),
                    min_value: 10.0,
                    max_value: 60.0,
                    data_type: "number".to_string(),
                    vertical_id: 5,
                },
                Parameter {
                    id: 2,
                    name: "pm25".to_string(),
                    min_value: 5.0,
                    max_value: 40.0,
                    data_type: "number".to_string(),
                    vertical_id: 5,
                },
            ],
        }
    }

    #[test]
    fn service_state_wire_form() {
        assert_eq!(serde_json::to_string(&ServiceState::Start).unwrap(), "\"start\"");
        assert_eq!(serde_json::to_string(&ServiceState::Stop).unwrap(), "\"stop\"");
        let s: ServiceState = serde_json::from_str("\"stop\"").unwrap();
        assert_eq!(s, ServiceState::Stop);
        assert!(serde_json::from_str::<ServiceState>("\"paused\"").is_err());
    }

    #[test]
    fn start_command_renames_bounds() {
        let cmd = StartCommand::from_detail(&sample_detail());
        let json = serde_json::to_value(&cmd).unwrap();
        let first = &json["parameters"][0];
        assert_eq!(first["name"], "pm10");
        assert_eq!(first["min"], 10.0);
        assert_eq!(first["max"], 60.0);
        // The client-facing names must not leak onto the wire.
        assert!(first.get("min_value").is_none());
        assert!(first.get("max_value").is_none());
    }

    #[test]
    fn start_command_carries_current_bounds() {
        let mut detail = sample_detail();
        detail.parameters[1].max_value = 99.5;
        let cmd = StartCommand::from_detail(&detail);
        assert_eq!(cmd.parameters[1].max, 99.5);
        assert_eq!(cmd.parameters.len(), detail.parameters.len());
    }

    #[test]
    fn node_detail_decodes_status_field() {
        let raw = r#"{
            "node_id": "WN02",
            "platform": "OneM2m",
            "protocol": "http",
            "frequency": 3600,
            "status": "start",
            "vertical_name": null,
            "parameters": []
        }"#;
        let detail: NodeDetail = serde_json::from_str(raw).unwrap();
        assert!(detail.status.is_running());
        assert!(detail.parameters.is_empty());
    }

    #[test]
    fn malformed_node_fails_fast() {
        // Missing node_id must be a decode error, not a silent default.
        let raw = r#"{"platform": "ccsp", "protocol": "https", "frequency": 10,
                      "services": "stop", "vertical_id": 1}"#;
        assert!(serde_json::from_str::<Node>(raw).is_err());
    }
}
