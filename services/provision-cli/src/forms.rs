// services/provision-cli/src/forms.rs
//
// Validated form builders. Validation happens entirely before any request
// is issued; a builder error means nothing went over the wire.

use simkit::errors::PanelError;
use simkit::types::{NewNode, NewParameter, NewVertical, ServiceState};
use simkit::units;

const DATA_TYPES: [&str; 4] = ["string", "number", "boolean", "date"];

/// Vertical names are stored uppercased; uniqueness is enforced server-side.
pub fn vertical_form(name: &str) -> Result<NewVertical, PanelError> {
    let name = name.trim().to_uppercase();
    if name.is_empty() {
        return Err(PanelError::Validation(
            "vertical name must not be empty".to_string(),
        ));
    }
    Ok(NewVertical { name })
}

/// Parameter names are stored lowercased; min/max must be valid numbers or
/// the submission is rejected outright.
pub fn parameter_form(
    name: &str,
    min: &str,
    max: &str,
    vertical_id: i64,
    data_type: &str,
) -> Result<NewParameter, PanelError> {
    let name = name.trim().to_lowercase();
    if name.is_empty() {
        return Err(PanelError::Validation(
            "parameter name must not be empty".to_string(),
        ));
    }
    let min_value = units::parse_bound(min)?;
    let max_value = units::parse_bound(max)?;
    if !DATA_TYPES.contains(&data_type) {
        return Err(PanelError::Validation(format!(
            "data type '{}' is not one of {:?}",
            data_type, DATA_TYPES
        )));
    }
    Ok(NewParameter {
        name,
        min_value,
        max_value,
        vertical_id,
        data_type: data_type.to_string(),
    })
}

/// Node ids are stored uppercased; frequency is entered as H/M/S and sent
/// as seconds; the parameter id list travels JSON-encoded inside a string;
/// a new node always begins stopped.
#[allow(clippy::too_many_arguments)]
pub fn node_form(
    node_id: &str,
    platform: &str,
    protocol: &str,
    hours: u64,
    minutes: u64,
    seconds: u64,
    parameter_ids: &[i64],
    vertical_id: i64,
) -> Result<NewNode, PanelError> {
    let node_id = node_id.trim().to_uppercase();
    if node_id.is_empty() {
        return Err(PanelError::Validation(
            "node id must not be empty".to_string(),
        ));
    }
    if platform.is_empty() {
        return Err(PanelError::Validation("platform must be chosen".to_string()));
    }
    let parameter_id = serde_json::to_string(parameter_ids)
        .map_err(|e| PanelError::Validation(e.to_string()))?;
    Ok(NewNode {
        node_id,
        platform: platform.to_string(),
        protocol: protocol.to_string(),
        frequency: hours * 3600 + minutes * 60 + seconds,
        parameter_id,
        services: ServiceState::Stop,
        vertical_id,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertical_name_is_uppercased() {
        let form = vertical_form("water").unwrap();
        assert_eq!(form.name, "WATER");
        assert!(vertical_form("   ").is_err());
    }

    #[test]
    fn non_numeric_bound_blocks_submission() {
        assert!(parameter_form("pm10", "abc", "60", 5, "number").is_err());
        assert!(parameter_form("pm10", "10", "", 5, "number").is_err());
    }

    #[test]
    fn parameter_payload_shape() {
        let form = parameter_form("PM10", "1", "10", 5, "number").unwrap();
        let json = serde_json::to_value(&form).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "name": "pm10",
                "min_value": 1.0,
                "max_value": 10.0,
                "vertical_id": 5,
                "data_type": "number"
            })
        );
    }

    #[test]
    fn unknown_data_type_is_rejected() {
        assert!(parameter_form("pm10", "1", "10", 5, "integer").is_err());
    }

    #[test]
    fn node_form_combines_frequency_and_encodes_ids() {
        let form = node_form("wn07", "ccsp", "https", 1, 2, 3, &[3, 7], 5).unwrap();
        assert_eq!(form.node_id, "WN07");
        assert_eq!(form.frequency, 3723);
        assert_eq!(form.parameter_id, "[3,7]");
        assert_eq!(form.services, ServiceState::Stop);

        let json = serde_json::to_value(&form).unwrap();
        assert_eq!(json["services"], "stop");
        assert_eq!(json["parameter_id"], "[3,7]");
    }

    #[test]
    fn node_form_rejects_blank_identity() {
        assert!(node_form("", "ccsp", "https", 0, 0, 10, &[], 1).is_err());
        assert!(node_form("WN01", "", "https", 0, 0, 10, &[], 1).is_err());
    }
}
