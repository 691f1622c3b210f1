// services/provision-cli/src/api.rs
//
// Provisioning client for the catalog API.

use std::collections::BTreeSet;
use std::time::Duration;

use simkit::config::BackendConfig;
use simkit::errors::PanelError;
use simkit::types::{NewNode, NewParameter, NewVertical, Node, Parameter, Vertical};

/// The backend reports name/id collisions as 400 with a detail body; some
/// deployments front it with a proxy that rewrites these to 409.
fn is_conflict(status: reqwest::StatusCode) -> bool {
    status == reqwest::StatusCode::BAD_REQUEST || status == reqwest::StatusCode::CONFLICT
}

pub struct ProvisionClient {
    client: reqwest::blocking::Client,
    api_url: String,
}

impl ProvisionClient {
    pub fn new(cfg: &BackendConfig) -> Result<Self, PanelError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_millis(cfg.request_timeout_ms))
            .build()
            .map_err(PanelError::from)?;
        Ok(Self {
            client,
            api_url: cfg.api_url.trim_end_matches('/').to_string(),
        })
    }

    fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T, PanelError> {
        let url = format!("{}{}", self.api_url, path);
        let response = self.client.get(&url).send()?;
        if !response.status().is_success() {
            return Err(PanelError::Transport(format!(
                "HTTP {} from {}",
                response.status(),
                path
            )));
        }
        Ok(response.json::<T>()?)
    }

    fn post_json<B, T>(&self, path: &str, body: &B, conflict: &str) -> Result<T, PanelError>
    where
        B: serde::Serialize,
        T: serde::de::DeserializeOwned,
    {
        let url = format!("{}{}", self.api_url, path);
        let response = self.client.post(&url).json(body).send()?;
        let status = response.status();
        if is_conflict(status) {
            return Err(PanelError::Conflict(conflict.to_string()));
        }
        if !status.is_success() {
            return Err(PanelError::Transport(format!(
                "HTTP {} from {}",
                status, path
            )));
        }
        Ok(response.json::<T>()?)
    }

    pub fn create_vertical(&self, form: &NewVertical) -> Result<Vertical, PanelError> {
        self.post_json(
            "/verticals/",
            form,
            &format!("vertical '{}' already exists", form.name),
        )
    }

    pub fn create_parameter(&self, form: &NewParameter) -> Result<Parameter, PanelError> {
        self.post_json(
            "/parameters/",
            form,
            &format!("parameter '{}' was rejected by the backend", form.name),
        )
    }

    pub fn create_node(&self, form: &NewNode) -> Result<Node, PanelError> {
        self.post_json(
            "/nodes/",
            form,
            &format!("node id '{}' already exists", form.node_id),
        )
    }

    pub fn list_verticals(&self) -> Result<Vec<Vertical>, PanelError> {
        self.get_json("/verticals/")
    }

    pub fn list_nodes(&self) -> Result<Vec<Node>, PanelError> {
        self.get_json("/nodes/")
    }

    pub fn nodes_by_vertical(&self, vertical_id: i64) -> Result<Vec<Node>, PanelError> {
        self.get_json(&format!("/nodes/vertical/{}", vertical_id))
    }

    pub fn parameters_by_vertical(&self, vertical_id: i64) -> Result<Vec<Parameter>, PanelError> {
        self.get_json(&format!("/parameters/?vertical_id={}", vertical_id))
    }

    /// Distinct non-empty platforms, derived client-side as the panel does.
    pub fn platforms(&self) -> Result<Vec<String>, PanelError> {
        let nodes = self.list_nodes()?;
        let set: BTreeSet<String> = nodes
            .into_iter()
            .map(|n| n.platform)
            .filter(|p| !p.is_empty())
            .collect();
        Ok(set.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_submissions_map_to_conflict() {
        assert!(is_conflict(reqwest::StatusCode::BAD_REQUEST));
        assert!(is_conflict(reqwest::StatusCode::CONFLICT));
        assert!(!is_conflict(reqwest::StatusCode::OK));
        assert!(!is_conflict(reqwest::StatusCode::INTERNAL_SERVER_ERROR));
    }
}
