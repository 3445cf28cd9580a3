use std::collections::HashMap;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

pub type Metadata = Map<String, Value>;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Case {
    pub id: String,
    pub title: String,
    pub status: String,
    pub vendor: Option<String>,
    pub category: Option<String>,
    pub metadata: Option<Metadata>,
    pub created_at: i64,
    pub updated_at: i64,
    #[serde(skip)]
    pub seq: u64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    pub case_id: String,
    pub title: String,
    pub content: String,
    pub node_type: String,
    pub status: String,
    pub metadata: Option<Metadata>,
    pub created_at: i64,
    #[serde(skip)]
    pub seq: u64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Edge {
    pub id: String,
    pub case_id: String,
    pub source_node_id: String,
    pub target_node_id: String,
    pub edge_type: String,
    pub metadata: Option<Metadata>,
    #[serde(skip)]
    pub seq: u64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub node_id: String,
    pub status: String,
    pub created_at: i64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CaseWithGraph {
    #[serde(flatten)]
    pub case: Case,
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CaseList {
    pub total: usize,
    pub page: usize,
    pub page_size: usize,
    pub items: Vec<Case>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CaseFilter {
    pub page: Option<usize>,
    pub page_size: Option<usize>,
    pub status: Option<String>,
    pub vendor: Option<String>,
    pub category: Option<String>,
}

pub const DEFAULT_PAGE_SIZE: usize = 20;

/// In-memory backing state for every route.
#[derive(Debug, Default)]
pub struct Store {
    seq: u64,
    pub cases: HashMap<String, Case>,
    pub nodes: HashMap<String, Node>,
    pub edges: HashMap<String, Edge>,
    pub tasks: HashMap<String, Task>,
    pub feedback: HashMap<String, Value>,
    pub layouts: HashMap<String, Value>,
}

pub fn now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or_default()
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

impl Store {
    fn next_seq(&mut self) -> u64 {
        self.seq += 1;
        self.seq
    }

    pub fn insert_case(
        &mut self,
        title: String,
        vendor: Option<String>,
        category: Option<String>,
        metadata: Option<Metadata>,
    ) -> Case {
        let ts = now();
        let case = Case {
            id: new_id(),
            title,
            status: "OPEN".to_string(),
            vendor,
            category,
            metadata,
            created_at: ts,
            updated_at: ts,
            seq: self.next_seq(),
        };
        self.cases.insert(case.id.clone(), case.clone());
        case
    }

    pub fn insert_node(
        &mut self,
        case_id: &str,
        title: String,
        content: String,
        node_type: String,
        status: String,
        metadata: Option<Metadata>,
    ) -> Node {
        let node = Node {
            id: new_id(),
            case_id: case_id.to_string(),
            title,
            content,
            node_type,
            status,
            metadata,
            created_at: now(),
            seq: self.next_seq(),
        };
        self.nodes.insert(node.id.clone(), node.clone());
        self.touch(case_id);
        node
    }

    pub fn insert_edge(
        &mut self,
        case_id: &str,
        source_node_id: String,
        target_node_id: String,
        edge_type: String,
        metadata: Option<Metadata>,
    ) -> Edge {
        let edge = Edge {
            id: new_id(),
            case_id: case_id.to_string(),
            source_node_id,
            target_node_id,
            edge_type,
            metadata,
            seq: self.next_seq(),
        };
        self.edges.insert(edge.id.clone(), edge.clone());
        self.touch(case_id);
        edge
    }

    pub fn insert_task(&mut self, node_id: &str) -> Task {
        let task = Task {
            id: new_id(),
            node_id: node_id.to_string(),
            status: "RUNNING".to_string(),
            created_at: now(),
        };
        self.tasks.insert(task.id.clone(), task.clone());
        task
    }

    pub fn touch(&mut self, case_id: &str) {
        if let Some(case) = self.cases.get_mut(case_id) {
            case.updated_at = now();
        }
    }

    /// Node lookup scoped to its owning case.
    pub fn node_in_case(&self, case_id: &str, node_id: &str) -> Option<&Node> {
        self.nodes.get(node_id).filter(|n| n.case_id == case_id)
    }

    pub fn case_nodes(&self, case_id: &str) -> Vec<Node> {
        let mut nodes: Vec<Node> = self
            .nodes
            .values()
            .filter(|n| n.case_id == case_id)
            .cloned()
            .collect();
        nodes.sort_by_key(|n| n.seq);
        nodes
    }

    pub fn case_edges(&self, case_id: &str) -> Vec<Edge> {
        let mut edges: Vec<Edge> = self
            .edges
            .values()
            .filter(|e| e.case_id == case_id)
            .cloned()
            .collect();
        edges.sort_by_key(|e| e.seq);
        edges
    }

    pub fn with_graph(&self, case: Case) -> CaseWithGraph {
        let nodes = self.case_nodes(&case.id);
        let edges = self.case_edges(&case.id);
        CaseWithGraph { case, nodes, edges }
    }

    /// Filtered, newest-first page of cases. Pages are 1-based.
    pub fn list_cases(&self, filter: &CaseFilter) -> CaseList {
        let page = filter.page.filter(|p| *p > 0).unwrap_or(1);
        let page_size = filter
            .page_size
            .filter(|s| *s > 0)
            .unwrap_or(DEFAULT_PAGE_SIZE);
        let same = |want: &Option<String>, have: &Option<String>| match want {
            Some(w) => have.as_deref() == Some(w.as_str()),
            None => true,
        };
        let mut all: Vec<&Case> = self
            .cases
            .values()
            .filter(|c| filter.status.as_deref().map_or(true, |s| c.status == s))
            .filter(|c| same(&filter.vendor, &c.vendor))
            .filter(|c| same(&filter.category, &c.category))
            .collect();
        all.sort_by(|a, b| b.seq.cmp(&a.seq));
        let total = all.len();
        let items = all
            .into_iter()
            .skip(page.saturating_sub(1).saturating_mul(page_size))
            .take(page_size)
            .cloned()
            .collect();
        CaseList {
            total,
            page,
            page_size,
            items,
        }
    }

    /// Removes a node and every edge touching it.
    pub fn remove_node(&mut self, node_id: &str) -> Option<Node> {
        let node = self.nodes.remove(node_id)?;
        self.edges
            .retain(|_, e| e.source_node_id != node_id && e.target_node_id != node_id);
        self.tasks.retain(|_, t| t.node_id != node_id);
        self.touch(&node.case_id);
        Some(node)
    }

    /// Removes a case with its graph, feedback, and layout.
    pub fn remove_case(&mut self, case_id: &str) -> Option<Case> {
        let case = self.cases.remove(case_id)?;
        let node_ids: Vec<String> = self
            .nodes
            .values()
            .filter(|n| n.case_id == case_id)
            .map(|n| n.id.clone())
            .collect();
        for id in &node_ids {
            self.nodes.remove(id);
        }
        self.edges.retain(|_, e| e.case_id != case_id);
        self.tasks.retain(|_, t| !node_ids.contains(&t.node_id));
        self.feedback.remove(case_id);
        self.layouts.remove(case_id);
        Some(case)
    }
}
