//! Wire-format checks against backend-shaped fixtures: every field name in
//! these JSON bodies is a compatibility contract with the existing backend.

use simkit::types::{NewNode, Node, NodeDetail, ServiceState, StartCommand, StopCommand, Vertical};

#[test]
fn decodes_vertical_list_response() {
    let raw = r#"[{"id": 1, "name": "WATER"}, {"id": 2, "name": "AIR"}]"#;
    let verticals: Vec<Vertical> = serde_json::from_str(raw).unwrap();
    assert_eq!(verticals.len(), 2);
    assert_eq!(verticals[0].name, "WATER");
}

#[test]
fn decodes_node_list_response() {
    let raw = r#"[{
        "node_id": "WN01",
        "platform": "ccsp",
        "protocol": "https",
        "frequency": 60,
        "services": "stop",
        "vertical_id": 1,
        "parameter_id": "[1, 2]"
    }]"#;
    let nodes: Vec<Node> = serde_json::from_str(raw).unwrap();
    assert_eq!(nodes[0].services, ServiceState::Stop);
    assert_eq!(nodes[0].parameter_id, "[1, 2]");
}

#[test]
fn decodes_node_detail_response() {
    let raw = r#"{
        "node_id": "WN01",
        "platform": "ccsp",
        "protocol": "https",
        "frequency": 3600,
        "status": "start",
        "vertical_name": "WATER",
        "parameters": [
            {"id": 1, "name": "ph", "min_value": 6, "max_value": 9,
             "vertical_id": 1, "data_type": "number"}
        ]
    }"#;
    let detail: NodeDetail = serde_json::from_str(raw).unwrap();
    assert!(detail.status.is_running());
    assert_eq!(detail.parameters[0].min_value, 6.0);
    assert_eq!(detail.vertical_name.as_deref(), Some("WATER"));
}

#[test]
fn start_batch_matches_the_services_contract() {
    let details: Vec<NodeDetail> = (1..=3)
        .map(|i| {
            serde_json::from_value(serde_json::json!({
                "node_id": format!("WN{:02}", i),
                "platform": "ccsp",
                "protocol": "https",
                "frequency": 60 * i,
                "status": "stop",
                "vertical_name": "WATER",
                "parameters": [
                    {"id": i, "name": "ph", "min_value": 6.0, "max_value": 9.0,
                     "vertical_id": 1, "data_type": "number"}
                ]
            }))
            .unwrap()
        })
        .collect();

    let batch: Vec<StartCommand> = details.iter().map(StartCommand::from_detail).collect();
    let json = serde_json::to_value(&batch).unwrap();

    let elements = json.as_array().unwrap();
    assert_eq!(elements.len(), 3);
    assert_eq!(
        elements[0],
        serde_json::json!({
            "node_id": "WN01",
            "frequency": 60,
            "parameters": [{"name": "ph", "min": 6.0, "max": 9.0}],
            "platform": "ccsp",
            "protocol": "https"
        })
    );
}

#[test]
fn stop_batch_matches_the_services_contract() {
    let batch = vec![
        StopCommand {
            node_id: "WN01".to_string(),
        },
        StopCommand {
            node_id: "WN02".to_string(),
        },
    ];
    assert_eq!(
        serde_json::to_value(&batch).unwrap(),
        serde_json::json!([{"node_id": "WN01"}, {"node_id": "WN02"}])
    );
}

#[test]
fn node_creation_body_matches_the_catalog_contract() {
    let body = NewNode {
        node_id: "WN07".to_string(),
        platform: "OneM2m".to_string(),
        protocol: "http".to_string(),
        frequency: 7262,
        parameter_id: "[3,7]".to_string(),
        services: ServiceState::Stop,
        vertical_id: 2,
    };
    assert_eq!(
        serde_json::to_value(&body).unwrap(),
        serde_json::json!({
            "node_id": "WN07",
            "platform": "OneM2m",
            "protocol": "http",
            "frequency": 7262,
            "parameter_id": "[3,7]",
            "services": "stop",
            "vertical_id": 2
        })
    );
}
