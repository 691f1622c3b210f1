// services/panel-dash/src/state.rs
//
// Control panel view-model: catalog cells, node selection, parameter
// editing, activity log and live event scrollback.

use std::collections::HashMap;

use chrono::{DateTime, Local};

use simkit::errors::PanelError;
use simkit::types::{Node, NodeDetail, ServiceState, Vertical};
use simkit::units;

// Keep last 100 diagnostics, last 500 event lines.
pub const LOG_CAPACITY: usize = 100;
pub const EVENT_CAPACITY: usize = 500;

#[derive(Debug, Clone)]
pub struct LogEntry {
    pub timestamp: DateTime<Local>,
    pub level: String, // INFO, WARN, ERROR
    pub message: String,
}

/// Which scope the loaded node list was fetched under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    None,
    Vertical(i64),
    Platform(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EditTarget {
    Frequency,
    ParamMin(usize),
    ParamMax(usize),
}

#[derive(Debug, Clone)]
pub struct Edit {
    pub node_idx: usize,
    pub target: EditTarget,
    pub buffer: String,
}

#[derive(Debug)]
pub struct PanelState {
    // Catalog
    pub verticals: Vec<Vertical>,
    pub platforms: Vec<String>,
    /// Nodes loaded for the current scope, in display order.
    pub nodes: Vec<NodeDetail>,
    /// All nodes, for the status side table.
    pub status_rows: Vec<Node>,

    // Scope & selection
    pub scope: Scope,
    pub selected_nodes: Vec<String>,
    pub cursor: usize,
    pub param_cursor: usize,

    // Range entry
    pub range_from: String,
    pub range_to: String,
    pub range_focus_to: bool,

    // Field editing
    pub editing: Option<Edit>,
    pending_edits: HashMap<(String, EditTarget), String>,

    // Logs
    pub activity_log: Vec<LogEntry>,
    pub events: Vec<String>,
    pub event_scroll: usize,

    epoch: u64,
}

impl PanelState {
    pub fn new() -> Self {
        Self {
            verticals: Vec::new(),
            platforms: Vec::new(),
            nodes: Vec::new(),
            status_rows: Vec::new(),
            scope: Scope::None,
            selected_nodes: Vec::new(),
            cursor: 0,
            param_cursor: 0,
            range_from: String::new(),
            range_to: String::new(),
            range_focus_to: false,
            editing: None,
            pending_edits: HashMap::new(),
            activity_log: Vec::new(),
            events: Vec::new(),
            event_scroll: 0,
            epoch: 0,
        }
    }

    pub fn add_log(&mut self, level: &str, message: &str) {
        self.activity_log.push(LogEntry {
            timestamp: Local::now(),
            level: level.to_string(),
            message: message.to_string(),
        });
        if self.activity_log.len() > LOG_CAPACITY {
            self.activity_log.remove(0);
        }
    }

    /// Appends one raw line from the event stream to the scrollback.
    pub fn push_event(&mut self, line: String) {
        self.events.push(line);
        if self.events.len() > EVENT_CAPACITY {
            self.events.remove(0);
        }
    }

    pub fn scroll_events_up(&mut self) {
        if self.event_scroll > 0 {
            self.event_scroll -= 1;
        }
    }

    pub fn scroll_events_down(&mut self) {
        if self.event_scroll < self.events.len().saturating_sub(1) {
            self.event_scroll += 1;
        }
    }

    // -- Scope & stale-response guard ------------------------------------

    /// Switches scope, clears the node list and selection, and returns the
    /// epoch the follow-up fetch must carry.
    pub fn set_scope(&mut self, scope: Scope) -> u64 {
        self.scope = scope;
        self.selected_nodes.clear();
        self.nodes.clear();
        self.cursor = 0;
        self.param_cursor = 0;
        self.editing = None;
        self.epoch += 1;
        self.epoch
    }

    /// Installs a fetched node list. A response tagged with a superseded
    /// epoch is discarded; returns whether it was applied.
    pub fn set_nodes(&mut self, epoch: u64, nodes: Vec<NodeDetail>) -> bool {
        if epoch != self.epoch {
            self.add_log("WARN", "Discarded stale node list for a superseded selection");
            return false;
        }
        self.nodes = nodes;
        self.cursor = 0;
        self.param_cursor = 0;
        true
    }

    // -- Selection model -------------------------------------------------

    pub fn select_all(&mut self) {
        self.selected_nodes = self.nodes.iter().map(|n| n.node_id.clone()).collect();
    }

    pub fn toggle_node(&mut self, node_id: &str) {
        if let Some(pos) = self.selected_nodes.iter().position(|id| id == node_id) {
            self.selected_nodes.remove(pos);
        } else {
            self.selected_nodes.push(node_id.to_string());
        }
    }

    pub fn clear_selection(&mut self) {
        self.selected_nodes.clear();
    }

    pub fn is_selected(&self, node_id: &str) -> bool {
        self.selected_nodes.iter().any(|id| id == node_id)
    }

    /// Applies the 1-based inclusive range typed into the range fields.
    /// Invalid input leaves the current selection untouched.
    pub fn apply_range(&mut self) -> Result<usize, PanelError> {
        let from = units::parse_index(&self.range_from)?;
        let to = units::parse_index(&self.range_to)?;
        if from < 1 || to < from || to > self.nodes.len() {
            return Err(PanelError::Validation(format!(
                "range {}..{} is outside 1..{}",
                from,
                to,
                self.nodes.len()
            )));
        }
        self.selected_nodes = self.nodes[from - 1..to]
            .iter()
            .map(|n| n.node_id.clone())
            .collect();
        Ok(to - from + 1)
    }

    /// Selected nodes in display order, with their current (possibly
    /// locally edited) frequency and bounds.
    pub fn selected_details(&self) -> Vec<NodeDetail> {
        self.nodes
            .iter()
            .filter(|n| self.is_selected(&n.node_id))
            .cloned()
            .collect()
    }

    /// Optimistic state flip after a dispatched batch command.
    pub fn mark_services(&mut self, node_ids: &[String], state: ServiceState) {
        for node in &mut self.nodes {
            if node_ids.iter().any(|id| id == &node.node_id) {
                node.status = state;
            }
        }
        for row in &mut self.status_rows {
            if node_ids.iter().any(|id| id == &row.node_id) {
                row.services = state;
            }
        }
    }

    // -- Cursor ----------------------------------------------------------

    pub fn cursor_up(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            self.param_cursor = 0;
        }
    }

    pub fn cursor_down(&mut self) {
        if self.cursor + 1 < self.nodes.len() {
            self.cursor += 1;
            self.param_cursor = 0;
        }
    }

    pub fn cursor_node(&self) -> Option<&NodeDetail> {
        self.nodes.get(self.cursor)
    }

    pub fn next_param(&mut self) {
        if let Some(node) = self.nodes.get(self.cursor) {
            if !node.parameters.is_empty() {
                self.param_cursor = (self.param_cursor + 1) % node.parameters.len();
            }
        }
    }

    // -- Field editing ---------------------------------------------------

    /// Enters edit mode for one field of the cursor node. A previously
    /// typed value that never parsed is brought back instead of the stored
    /// one, so leaving edit mode never loses operator input.
    pub fn begin_edit(&mut self, target: EditTarget) {
        let Some(node) = self.nodes.get(self.cursor) else {
            return;
        };
        let key = (node.node_id.clone(), target);
        let buffer = match self.pending_edits.get(&key) {
            Some(text) => text.clone(),
            None => match target {
                EditTarget::Frequency => units::seconds_to_hms(node.frequency),
                EditTarget::ParamMin(i) => node
                    .parameters
                    .get(i)
                    .map(|p| format!("{}", p.min_value))
                    .unwrap_or_default(),
                EditTarget::ParamMax(i) => node
                    .parameters
                    .get(i)
                    .map(|p| format!("{}", p.max_value))
                    .unwrap_or_default(),
            },
        };
        self.editing = Some(Edit {
            node_idx: self.cursor,
            target,
            buffer,
        });
    }

    pub fn edit_push(&mut self, c: char) {
        if let Some(edit) = &mut self.editing {
            edit.buffer.push(c);
        }
    }

    pub fn edit_pop(&mut self) {
        if let Some(edit) = &mut self.editing {
            edit.buffer.pop();
        }
    }

    /// Leaves edit mode, committing the typed value. Text that fails to
    /// parse keeps the stored value and is retained for the next edit.
    pub fn commit_edit(&mut self) {
        let Some(edit) = self.editing.take() else {
            return;
        };
        let Some(node) = self.nodes.get_mut(edit.node_idx) else {
            return;
        };
        let key = (node.node_id.clone(), edit.target);
        let outcome = match edit.target {
            EditTarget::Frequency => {
                units::hms_to_seconds(&edit.buffer).map(|secs| node.frequency = secs)
            }
            EditTarget::ParamMin(i) => units::parse_bound(&edit.buffer).map(|v| {
                if let Some(p) = node.parameters.get_mut(i) {
                    p.min_value = v;
                }
            }),
            EditTarget::ParamMax(i) => units::parse_bound(&edit.buffer).map(|v| {
                if let Some(p) = node.parameters.get_mut(i) {
                    p.max_value = v;
                }
            }),
        };
        match outcome {
            Ok(()) => {
                self.pending_edits.remove(&key);
            }
            Err(e) => {
                self.pending_edits.insert(key, edit.buffer);
                self.add_log("WARN", &format!("Edit not applied: {}", e));
            }
        }
    }
}

impl Default for PanelState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use simkit::types::Parameter;

    fn detail(id: &str) -> NodeDetail {
        NodeDetail {
            node_id: id.to_string(),
            platform: "ccsp".to_string(),
            protocol: "https".to_string(),
            frequency: 60,
            status: ServiceState::Stop,
            vertical_name: None,
            parameters: vec![Parameter {
                id: 1,
                name: "pm10".to_string(),
                min_value: 10.0,
                max_value: 60.0,
                data_type: "number".to_string(),
                vertical_id: 1,
            }],
        }
    }

    fn loaded_state(n: usize) -> PanelState {
        let mut state = PanelState::new();
        let epoch = state.set_scope(Scope::Platform("ccsp".to_string()));
        let nodes = (1..=n).map(|i| detail(&format!("WN{:02}", i))).collect();
        assert!(state.set_nodes(epoch, nodes));
        state
    }

    #[test]
    fn select_all_then_toggle_removes_exactly_one() {
        let mut state = loaded_state(5);
        state.select_all();
        assert_eq!(state.selected_nodes.len(), 5);
        state.toggle_node("WN03");
        assert_eq!(state.selected_nodes.len(), 4);
        assert!(!state.is_selected("WN03"));
        state.toggle_node("WN03");
        assert_eq!(state.selected_nodes.len(), 5);
    }

    #[test]
    fn apply_range_selects_inclusive_slice() {
        let mut state = loaded_state(5);
        state.range_from = "2".to_string();
        state.range_to = "4".to_string();
        assert_eq!(state.apply_range().unwrap(), 3);
        assert_eq!(state.selected_nodes, vec!["WN02", "WN03", "WN04"]);
    }

    #[test]
    fn invalid_range_leaves_selection_unchanged() {
        let mut state = loaded_state(5);
        state.toggle_node("WN01");
        let before = state.selected_nodes.clone();

        for (from, to) in [("0", "3"), ("4", "2"), ("1", "6"), ("x", "3"), ("", "2")] {
            state.range_from = from.to_string();
            state.range_to = to.to_string();
            assert!(state.apply_range().is_err(), "{}..{} accepted", from, to);
            assert_eq!(state.selected_nodes, before);
        }
    }

    #[test]
    fn scope_change_resets_selection() {
        let mut state = loaded_state(3);
        state.select_all();
        state.set_scope(Scope::Vertical(7));
        assert!(state.selected_nodes.is_empty());
        assert!(state.nodes.is_empty());
    }

    #[test]
    fn stale_node_list_is_discarded() {
        let mut state = PanelState::new();
        let old = state.set_scope(Scope::Vertical(1));
        let new = state.set_scope(Scope::Vertical(2));
        assert!(!state.set_nodes(old, vec![detail("WN01")]));
        assert!(state.nodes.is_empty());
        assert!(state.set_nodes(new, vec![detail("WN02")]));
        assert_eq!(state.nodes[0].node_id, "WN02");
    }

    #[test]
    fn mark_services_flips_every_listed_node() {
        let mut state = loaded_state(3);
        state.select_all();
        let ids = state.selected_nodes.clone();
        state.mark_services(&ids, ServiceState::Start);
        assert!(state.nodes.iter().all(|n| n.status.is_running()));
    }

    #[test]
    fn commit_edit_applies_parsed_frequency() {
        let mut state = loaded_state(1);
        state.begin_edit(EditTarget::Frequency);
        assert_eq!(state.editing.as_ref().unwrap().buffer, "00:01:00");
        state.editing.as_mut().unwrap().buffer.clear();
        for c in "01:00:30".chars() {
            state.edit_push(c);
        }
        state.commit_edit();
        assert_eq!(state.nodes[0].frequency, 3630);
    }

    #[test]
    fn unparseable_edit_keeps_value_and_typed_text() {
        let mut state = loaded_state(1);
        state.begin_edit(EditTarget::ParamMin(0));
        state.editing.as_mut().unwrap().buffer.clear();
        for c in "abc".chars() {
            state.edit_push(c);
        }
        state.commit_edit();
        // Stored bound untouched, typed text comes back on re-entry.
        assert_eq!(state.nodes[0].parameters[0].min_value, 10.0);
        state.begin_edit(EditTarget::ParamMin(0));
        assert_eq!(state.editing.as_ref().unwrap().buffer, "abc");
    }

    #[test]
    fn event_scrollback_is_bounded() {
        let mut state = PanelState::new();
        for i in 0..(EVENT_CAPACITY + 50) {
            state.push_event(format!("line {}", i));
        }
        assert_eq!(state.events.len(), EVENT_CAPACITY);
        assert_eq!(state.events[0], "line 50");
    }
}
