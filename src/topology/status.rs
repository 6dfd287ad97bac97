//! Boundary status of nodes and the link status derived from it.
//!
//! Node status is the only status a caller ever sets. Link status is a pure
//! function of the two endpoint statuses ([`link_status_from_nodes`]) and is
//! recomputed, together with every filtered id list, each time a node status
//! changes. Readers therefore never observe a stale active-link list.

use static_assertions::assert_eq_size;

use crate::topology::connectivity::Connectivity;
use crate::topology::element::{DirTable, ids_where};

/// Boundary condition carried by a node.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
pub enum NodeStatus {
    /// Interior node whose value is computed.
    Core,
    /// Open boundary with a prescribed value.
    FixedValue,
    /// Open boundary with a prescribed gradient.
    FixedGradient,
    /// Closed boundary; no flux may cross its links.
    Closed,
}

impl NodeStatus {
    /// All statuses in declaration order.
    pub const ALL: [NodeStatus; 4] = [
        NodeStatus::Core,
        NodeStatus::FixedValue,
        NodeStatus::FixedGradient,
        NodeStatus::Closed,
    ];

    /// `true` for any non-core status.
    pub fn is_boundary(self) -> bool {
        self != NodeStatus::Core
    }

    /// `true` for boundaries that let flux through (fixed value or gradient).
    pub fn is_open_boundary(self) -> bool {
        matches!(self, NodeStatus::FixedValue | NodeStatus::FixedGradient)
    }
}

assert_eq_size!(NodeStatus, u8);

/// Flux-carrying capability of a link.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
pub enum LinkStatus {
    /// Flux is computed freely.
    Active,
    /// Flux is prescribed externally.
    Fixed,
    /// No flux.
    Inactive,
}

/// Derive a link's status from the statuses of its tail and head.
///
/// A closed endpoint makes the link inactive; otherwise exactly one
/// fixed-gradient endpoint makes it fixed; everything else is active.
pub fn link_status_from_nodes(tail: NodeStatus, head: NodeStatus) -> LinkStatus {
    if tail == NodeStatus::Closed || head == NodeStatus::Closed {
        LinkStatus::Inactive
    } else if (tail == NodeStatus::FixedGradient) != (head == NodeStatus::FixedGradient) {
        LinkStatus::Fixed
    } else {
        LinkStatus::Active
    }
}

/// Node statuses plus every table derived from them.
#[derive(Clone, Debug)]
pub struct StatusTables {
    status_at_node: Vec<NodeStatus>,
    status_at_link: Vec<LinkStatus>,
    active_links: Vec<usize>,
    fixed_links: Vec<usize>,
    inactive_links: Vec<usize>,
    core_nodes: Vec<usize>,
    boundary_nodes: Vec<usize>,
    open_boundary_nodes: Vec<usize>,
    fixed_value_boundary_nodes: Vec<usize>,
    fixed_gradient_boundary_nodes: Vec<usize>,
    closed_boundary_nodes: Vec<usize>,
    active_link_dirs_at_node: DirTable,
}

impl StatusTables {
    /// Default statuses: perimeter nodes fixed-value, all others core.
    pub fn new(conn: &Connectivity) -> Self {
        let status_at_node = conn
            .node_is_perimeter()
            .iter()
            .map(|&rim| {
                if rim {
                    NodeStatus::FixedValue
                } else {
                    NodeStatus::Core
                }
            })
            .collect();
        Self::with_statuses(conn, status_at_node)
    }

    /// Build from explicit node statuses.
    pub fn with_statuses(conn: &Connectivity, status_at_node: Vec<NodeStatus>) -> Self {
        debug_assert_eq!(status_at_node.len(), conn.number_of_nodes());
        let mut tables = Self {
            status_at_node,
            status_at_link: Vec::new(),
            active_links: Vec::new(),
            fixed_links: Vec::new(),
            inactive_links: Vec::new(),
            core_nodes: Vec::new(),
            boundary_nodes: Vec::new(),
            open_boundary_nodes: Vec::new(),
            fixed_value_boundary_nodes: Vec::new(),
            fixed_gradient_boundary_nodes: Vec::new(),
            closed_boundary_nodes: Vec::new(),
            active_link_dirs_at_node: conn.link_dirs_at_node().clone(),
        };
        tables.recompute(conn);
        tables
    }

    /// Replace the status of `nodes` and recompute everything derived.
    ///
    /// Callers validate the ids and the status against the geometry.
    pub(crate) fn assign(
        &mut self,
        conn: &Connectivity,
        nodes: impl IntoIterator<Item = usize>,
        status: NodeStatus,
    ) -> usize {
        let mut changed = 0;
        for node in nodes {
            if self.status_at_node[node] != status {
                self.status_at_node[node] = status;
                changed += 1;
            }
        }
        if changed > 0 {
            self.recompute(conn);
        }
        changed
    }

    fn recompute(&mut self, conn: &Connectivity) {
        let tails = conn.node_at_link_tail();
        let heads = conn.node_at_link_head();
        self.status_at_link = tails
            .iter()
            .zip(heads)
            .map(|(&t, &h)| link_status_from_nodes(self.status_at_node[t], self.status_at_node[h]))
            .collect();

        let n_links = self.status_at_link.len();
        self.active_links = ids_where(n_links, |l| self.status_at_link[l] == LinkStatus::Active);
        self.fixed_links = ids_where(n_links, |l| self.status_at_link[l] == LinkStatus::Fixed);
        self.inactive_links =
            ids_where(n_links, |l| self.status_at_link[l] == LinkStatus::Inactive);

        let n_nodes = self.status_at_node.len();
        self.core_nodes = ids_where(n_nodes, |n| self.status_at_node[n] == NodeStatus::Core);
        self.boundary_nodes = ids_where(n_nodes, |n| self.status_at_node[n].is_boundary());
        self.open_boundary_nodes =
            ids_where(n_nodes, |n| self.status_at_node[n].is_open_boundary());
        self.fixed_value_boundary_nodes = self.nodes_with_status(NodeStatus::FixedValue);
        self.fixed_gradient_boundary_nodes = self.nodes_with_status(NodeStatus::FixedGradient);
        self.closed_boundary_nodes = self.nodes_with_status(NodeStatus::Closed);

        let links = conn.links_at_node();
        let dirs = conn.link_dirs_at_node();
        let rows: Vec<Vec<i8>> = (0..n_nodes)
            .map(|n| {
                links
                    .row(n)
                    .iter()
                    .zip(dirs.row(n))
                    .map(|(&l, &d)| {
                        if d != 0 && self.status_at_link[l] == LinkStatus::Active {
                            d
                        } else {
                            0
                        }
                    })
                    .collect()
            })
            .collect();
        self.active_link_dirs_at_node = DirTable::from_rows(&rows, links.width(), 0);
    }

    /// Status of every node.
    pub fn status_at_node(&self) -> &[NodeStatus] {
        &self.status_at_node
    }

    /// Status of every link.
    pub fn status_at_link(&self) -> &[LinkStatus] {
        &self.status_at_link
    }

    /// Links allowed to carry computed flux.
    pub fn active_links(&self) -> &[usize] {
        &self.active_links
    }

    /// Links carrying prescribed flux.
    pub fn fixed_links(&self) -> &[usize] {
        &self.fixed_links
    }

    /// Links carrying no flux.
    pub fn inactive_links(&self) -> &[usize] {
        &self.inactive_links
    }

    /// Nodes with status [`NodeStatus::Core`].
    pub fn core_nodes(&self) -> &[usize] {
        &self.core_nodes
    }

    /// Nodes with any non-core status.
    pub fn boundary_nodes(&self) -> &[usize] {
        &self.boundary_nodes
    }

    /// Fixed-value and fixed-gradient nodes.
    pub fn open_boundary_nodes(&self) -> &[usize] {
        &self.open_boundary_nodes
    }

    pub fn fixed_value_boundary_nodes(&self) -> &[usize] {
        &self.fixed_value_boundary_nodes
    }

    pub fn fixed_gradient_boundary_nodes(&self) -> &[usize] {
        &self.fixed_gradient_boundary_nodes
    }

    pub fn closed_boundary_nodes(&self) -> &[usize] {
        &self.closed_boundary_nodes
    }

    /// Nodes with exactly `status`, ascending.
    pub fn nodes_with_status(&self, status: NodeStatus) -> Vec<usize> {
        ids_where(self.status_at_node.len(), |n| {
            self.status_at_node[n] == status
        })
    }

    /// Like `link_dirs_at_node`, with zeros in the slots of non-active links.
    pub fn active_link_dirs_at_node(&self) -> &DirTable {
        &self.active_link_dirs_at_node
    }
}
