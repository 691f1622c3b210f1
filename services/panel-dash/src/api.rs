// services/panel-dash/src/api.rs
//
// Catalog client and service command dispatcher for the control panel.

use std::collections::BTreeSet;
use std::time::Duration;

use simkit::config::BackendConfig;
use simkit::errors::PanelError;
use simkit::types::{Node, NodeDetail, ServiceState, StartCommand, StopCommand, Vertical};

use crate::state::{PanelState, Scope};

pub struct ApiClient {
    client: reqwest::blocking::Client,
    api_url: String,
    services_url: String,
    connected: bool,
    last_error: Option<String>,
}

impl ApiClient {
    pub fn new(cfg: &BackendConfig) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_millis(cfg.request_timeout_ms))
            .build()
            .unwrap_or_default();

        Self {
            client,
            api_url: cfg.api_url.trim_end_matches('/').to_string(),
            services_url: cfg.services_url.trim_end_matches('/').to_string(),
            connected: false,
            last_error: None,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    fn get_json<T: serde::de::DeserializeOwned>(&mut self, path: &str) -> Result<T, PanelError> {
        let url = format!("{}{}", self.api_url, path);
        let result = (|| {
            let response = self.client.get(&url).send()?;
            if response.status() == reqwest::StatusCode::NOT_FOUND {
                return Err(PanelError::NotFound(path.to_string()));
            }
            if !response.status().is_success() {
                return Err(PanelError::Transport(format!(
                    "HTTP {} from {}",
                    response.status(),
                    path
                )));
            }
            Ok(response.json::<T>()?)
        })();
        match &result {
            Ok(_) => {
                self.connected = true;
                self.last_error = None;
            }
            Err(e) => {
                self.connected = false;
                self.last_error = Some(e.to_string());
            }
        }
        result
    }

    // -- Catalog reads ---------------------------------------------------

    pub fn list_verticals(&mut self) -> Result<Vec<Vertical>, PanelError> {
        self.get_json("/verticals/")
    }

    pub fn list_nodes(&mut self) -> Result<Vec<Node>, PanelError> {
        self.get_json("/nodes/")
    }

    pub fn nodes_by_vertical(&mut self, vertical_id: i64) -> Result<Vec<Node>, PanelError> {
        self.get_json(&format!("/nodes/vertical/{}", vertical_id))
    }

    pub fn node_detail(&mut self, node_id: &str) -> Result<NodeDetail, PanelError> {
        self.get_json(&format!("/nodes/all/{}", node_id))
    }

    /// Distinct non-empty platform values across all nodes. The backend has
    /// no platforms endpoint; the list is derived client-side.
    pub fn platforms(&mut self) -> Result<Vec<String>, PanelError> {
        let nodes = self.list_nodes()?;
        let set: BTreeSet<String> = nodes
            .into_iter()
            .map(|n| n.platform)
            .filter(|p| !p.is_empty())
            .collect();
        Ok(set.into_iter().collect())
    }

    /// Attaches each node's parameter set via one detail call per node.
    /// One list call plus N detail calls; fine at small N, and kept that
    /// way for parity with the backend's observed usage.
    fn attach_parameters(&mut self, nodes: Vec<Node>) -> Result<Vec<NodeDetail>, PanelError> {
        let mut details = Vec::with_capacity(nodes.len());
        for node in nodes {
            details.push(self.node_detail(&node.node_id)?);
        }
        Ok(details)
    }

    // -- State-mutating refreshes ---------------------------------------

    /// Loads verticals, platforms and the status table. Failures degrade to
    /// empty lists with a diagnostic; nothing is retried. The platform list
    /// and the status table are separate list fetches, matching the panel
    /// this replaces.
    pub fn refresh_catalog(&mut self, state: &mut PanelState) {
        match self.list_verticals() {
            Ok(verticals) => state.verticals = verticals,
            Err(e) => {
                state.verticals = Vec::new();
                state.add_log("ERROR", &format!("Failed to fetch verticals: {}", e));
            }
        }
        match self.platforms() {
            Ok(platforms) => state.platforms = platforms,
            Err(e) => {
                state.platforms = Vec::new();
                state.add_log("ERROR", &format!("Failed to derive platforms: {}", e));
            }
        }
        match self.list_nodes() {
            Ok(nodes) => state.status_rows = nodes,
            Err(e) => {
                state.status_rows = Vec::new();
                state.add_log("ERROR", &format!("Failed to fetch nodes: {}", e));
            }
        }
    }

    /// Scope to one vertical and load its nodes with parameters attached.
    pub fn load_vertical_nodes(&mut self, state: &mut PanelState, vertical_id: i64) {
        let epoch = state.set_scope(Scope::Vertical(vertical_id));
        let loaded = self
            .nodes_by_vertical(vertical_id)
            .and_then(|nodes| self.attach_parameters(nodes));
        match loaded {
            Ok(details) => {
                let count = details.len();
                if state.set_nodes(epoch, details) {
                    state.add_log("INFO", &format!("Loaded {} node(s) for vertical", count));
                }
            }
            Err(e) => {
                state.add_log("ERROR", &format!("Failed to fetch nodes for vertical: {}", e));
            }
        }
    }

    /// Scope to one platform and load its nodes with parameters attached.
    pub fn load_platform_nodes(&mut self, state: &mut PanelState, platform: &str) {
        let epoch = state.set_scope(Scope::Platform(platform.to_string()));
        let loaded = self.list_nodes().and_then(|nodes| {
            let scoped: Vec<Node> = nodes
                .into_iter()
                .filter(|n| n.platform == platform)
                .collect();
            self.attach_parameters(scoped)
        });
        match loaded {
            Ok(details) => {
                let count = details.len();
                if state.set_nodes(epoch, details) {
                    state.add_log(
                        "INFO",
                        &format!("Loaded {} node(s) for platform {}", count, platform),
                    );
                }
            }
            Err(e) => {
                state.add_log("ERROR", &format!("Failed to fetch platform nodes: {}", e));
            }
        }
    }

    // -- Service command dispatch ---------------------------------------

    /// Starts every selected node in one batch. Fire-and-forget: any HTTP
    /// response counts as dispatched and flips the local state of the whole
    /// batch; per-node server outcomes are not reconciled.
    pub fn start_services(&mut self, state: &mut PanelState) {
        let selected = state.selected_details();
        if selected.is_empty() {
            state.add_log("WARN", "No nodes selected for start");
            return;
        }
        let batch: Vec<StartCommand> = selected.iter().map(StartCommand::from_detail).collect();
        let ids: Vec<String> = selected.iter().map(|n| n.node_id.clone()).collect();
        let url = format!("{}/services/start", self.services_url);

        match self.client.put(&url).json(&batch).send() {
            Ok(response) => {
                self.connected = true;
                state.mark_services(&ids, ServiceState::Start);
                state.add_log(
                    "INFO",
                    &format!(
                        "Start dispatched for {} node(s) (HTTP {})",
                        ids.len(),
                        response.status()
                    ),
                );
            }
            Err(e) => {
                self.connected = false;
                self.last_error = Some(e.to_string());
                state.add_log("ERROR", &format!("Error starting services: {}", e));
            }
        }
    }

    /// Stops every selected node in one batch, same contract as start.
    pub fn stop_services(&mut self, state: &mut PanelState) {
        let ids: Vec<String> = state.selected_nodes.clone();
        if ids.is_empty() {
            state.add_log("WARN", "No nodes selected for stop");
            return;
        }
        let batch: Vec<StopCommand> = ids
            .iter()
            .map(|id| StopCommand {
                node_id: id.clone(),
            })
            .collect();
        let url = format!("{}/services/stop", self.services_url);

        match self.client.put(&url).json(&batch).send() {
            Ok(response) => {
                self.connected = true;
                state.mark_services(&ids, ServiceState::Stop);
                state.add_log(
                    "INFO",
                    &format!(
                        "Stop dispatched for {} node(s) (HTTP {})",
                        ids.len(),
                        response.status()
                    ),
                );
            }
            Err(e) => {
                self.connected = false;
                self.last_error = Some(e.to_string());
                state.add_log("ERROR", &format!("Error stopping services: {}", e));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use simkit::types::Parameter;

    fn detail(id: &str, min: f64, max: f64) -> NodeDetail {
        NodeDetail {
            node_id: id.to_string(),
            platform: "ccsp".to_string(),
            protocol: "https".to_string(),
            frequency: 10,
            status: ServiceState::Stop,
            vertical_name: None,
            parameters: vec![Parameter {
                id: 1,
                name: "pm10".to_string(),
                min_value: min,
                max_value: max,
                data_type: "number".to_string(),
                vertical_id: 1,
            }],
        }
    }

    #[test]
    fn start_batch_serializes_one_element_per_node() {
        let details = vec![
            detail("WN01", 1.0, 2.0),
            detail("WN02", 3.0, 4.0),
            detail("WN03", 5.0, 6.0),
        ];
        let batch: Vec<StartCommand> = details.iter().map(StartCommand::from_detail).collect();
        let json = serde_json::to_value(&batch).unwrap();
        let arr = json.as_array().unwrap();
        assert_eq!(arr.len(), 3);
        for (i, element) in arr.iter().enumerate() {
            let p = &element["parameters"][0];
            assert_eq!(p["min"], (2 * i + 1) as f64);
            assert_eq!(p["max"], (2 * i + 2) as f64);
            assert!(p.get("min_value").is_none());
        }
    }

    #[test]
    fn stop_batch_carries_only_node_ids() {
        let batch = vec![StopCommand {
            node_id: "WN01".to_string(),
        }];
        let json = serde_json::to_value(&batch).unwrap();
        assert_eq!(json[0], serde_json::json!({"node_id": "WN01"}));
    }
}
