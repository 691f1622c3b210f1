// services/panel-dash/src/mock.rs
//
// Demo-mode catalog and event generator (no backend required).

use chrono::Local;
use rand::Rng;

use simkit::types::{Node, NodeDetail, Parameter, ServiceState, Vertical};

use crate::state::PanelState;

pub struct MockBackend {
    tick_count: u64,
}

impl MockBackend {
    pub fn new() -> Self {
        Self { tick_count: 0 }
    }

    /// Seeds the catalog the way a healthy backend would serve it.
    pub fn seed(&self, state: &mut PanelState) {
        state.verticals = vec![
            Vertical {
                id: 1,
                name: "WATER".to_string(),
            },
            Vertical {
                id: 2,
                name: "AIR".to_string(),
            },
            Vertical {
                id: 3,
                name: "ENERGY".to_string(),
            },
        ];
        state.platforms = vec!["OneM2m".to_string(), "ccsp".to_string()];
        state.status_rows = self
            .all_details()
            .iter()
            .map(|d| Node {
                node_id: d.node_id.clone(),
                platform: d.platform.clone(),
                protocol: d.protocol.clone(),
                frequency: d.frequency,
                services: d.status,
                vertical_id: vertical_id_for(&d.node_id),
                parameter_id: String::new(),
            })
            .collect();

        state.add_log("INFO", "Control panel started in DEMO mode");
        state.add_log(
            "INFO",
            &format!(
                "Mock catalog: {} verticals, {} nodes",
                state.verticals.len(),
                state.status_rows.len()
            ),
        );
    }

    pub fn nodes_for_vertical(&self, vertical_id: i64) -> Vec<NodeDetail> {
        self.all_details()
            .into_iter()
            .filter(|d| vertical_id_for(&d.node_id) == vertical_id)
            .collect()
    }

    pub fn nodes_for_platform(&self, platform: &str) -> Vec<NodeDetail> {
        self.all_details()
            .into_iter()
            .filter(|d| d.platform == platform)
            .collect()
    }

    /// Emits telemetry event lines for running nodes, shaped like the
    /// backend's SSE payloads, plus the occasional warning.
    pub fn update(&mut self, state: &mut PanelState) {
        self.tick_count += 1;
        let mut rng = rand::thread_rng();

        if self.tick_count % 10 == 0 {
            let running: Vec<NodeDetail> = state
                .nodes
                .iter()
                .filter(|n| n.status.is_running())
                .cloned()
                .collect();
            for node in running {
                let ts = Local::now().timestamp();
                let mut readings = vec![format!("{}", ts)];
                for p in &node.parameters {
                    let value = rng.gen_range(p.min_value..=p.max_value.max(p.min_value));
                    readings.push(format!("{:.2}", value));
                }
                state.push_event(format!(
                    "{{\"node_id\": \"{}\", \"response\": 201, \"data\": [{}]}}",
                    node.node_id,
                    readings.join(", ")
                ));
            }
        }

        if self.tick_count % 300 == 0 && rng.gen_ratio(1, 3) {
            let warnings = [
                "Platform gateway slow to acknowledge content instance",
                "Retry attempt 1/3 for telemetry post",
                "Certificate for platform gateway expires in 14 days",
            ];
            let msg = warnings[rng.gen_range(0..warnings.len())];
            state.add_log("WARN", msg);
        }
    }

    fn all_details(&self) -> Vec<NodeDetail> {
        let mut details = Vec::new();
        for i in 1..=6u32 {
            details.push(NodeDetail {
                node_id: format!("WN{:02}", i),
                platform: if i % 2 == 0 { "ccsp" } else { "OneM2m" }.to_string(),
                protocol: "https".to_string(),
                frequency: 60 * i as u64,
                status: ServiceState::Stop,
                vertical_name: Some("WATER".to_string()),
                parameters: vec![
                    parameter(1, "ph", 6.0, 9.0, 1),
                    parameter(2, "turbidity", 0.5, 5.0, 1),
                ],
            });
        }
        for i in 1..=4u32 {
            details.push(NodeDetail {
                node_id: format!("AQ{:02}", i),
                platform: "ccsp".to_string(),
                protocol: "https".to_string(),
                frequency: 300,
                status: ServiceState::Stop,
                vertical_name: Some("AIR".to_string()),
                parameters: vec![
                    parameter(3, "pm10", 10.0, 60.0, 2),
                    parameter(4, "pm25", 5.0, 40.0, 2),
                ],
            });
        }
        for i in 1..=2u32 {
            details.push(NodeDetail {
                node_id: format!("EM{:02}", i),
                platform: "OneM2m".to_string(),
                protocol: "http".to_string(),
                frequency: 900,
                status: ServiceState::Stop,
                vertical_name: Some("ENERGY".to_string()),
                parameters: vec![parameter(5, "voltage", 210.0, 250.0, 3)],
            });
        }
        details
    }
}

fn parameter(id: i64, name: &str, min: f64, max: f64, vertical_id: i64) -> Parameter {
    Parameter {
        id,
        name: name.to_string(),
        min_value: min,
        max_value: max,
        data_type: "number".to_string(),
        vertical_id,
    }
}

fn vertical_id_for(node_id: &str) -> i64 {
    match &node_id[..2] {
        "WN" => 1,
        "AQ" => 2,
        _ => 3,
    }
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Scope;
    use simkit::types::ServiceState;

    #[test]
    fn seeded_catalog_is_consistent() {
        let mock = MockBackend::new();
        let mut state = PanelState::new();
        mock.seed(&mut state);
        assert_eq!(state.verticals.len(), 3);
        assert_eq!(state.status_rows.len(), 12);
        // Every seeded node starts stopped, per creation semantics.
        assert!(state
            .status_rows
            .iter()
            .all(|n| n.services == ServiceState::Stop));
    }

    #[test]
    fn scoped_queries_partition_the_catalog() {
        let mock = MockBackend::new();
        assert_eq!(mock.nodes_for_vertical(1).len(), 6);
        assert_eq!(mock.nodes_for_vertical(2).len(), 4);
        let ccsp = mock.nodes_for_platform("ccsp");
        assert!(ccsp.iter().all(|n| n.platform == "ccsp"));
    }

    #[test]
    fn running_nodes_emit_events() {
        let mut mock = MockBackend::new();
        let mut state = PanelState::new();
        mock.seed(&mut state);
        let epoch = state.set_scope(Scope::Vertical(1));
        state.set_nodes(epoch, mock.nodes_for_vertical(1));
        state.select_all();
        let ids = state.selected_nodes.clone();
        state.mark_services(&ids, ServiceState::Start);

        for _ in 0..10 {
            mock.update(&mut state);
        }
        assert!(!state.events.is_empty());
        assert!(state.events[0].contains("\"node_id\""));
    }
}
