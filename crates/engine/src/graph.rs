//! Field-dependency graph.
//!
//! An edge **A → B** means: whenever field A changes, field B must be
//! recomputed. The graph stays acyclic by construction — an edge that would
//! close a cycle (including a self-edge) is rejected at registration time, so
//! traversal never needs cycle defense.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use crate::EngineError;

/// Directed acyclic graph over field names.
///
/// Node and edge registration are idempotent; ordered collections make every
/// query deterministic.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    /// Adjacency map; a key's presence is node registration.
    edges: BTreeMap<String, BTreeSet<String>>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Idempotently ensure `name` exists as a node.
    pub fn register_node(&mut self, name: impl Into<String>) {
        self.edges.entry(name.into()).or_default();
    }

    /// Whether `name` is a registered node.
    pub fn contains(&self, name: &str) -> bool {
        self.edges.contains_key(name)
    }

    /// All registered field names.
    pub fn nodes(&self) -> impl Iterator<Item = &str> {
        self.edges.keys().map(String::as_str)
    }

    pub fn node_count(&self) -> usize {
        self.edges.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.values().map(BTreeSet::len).sum()
    }

    /// Declare that `target` depends on `source` (edge `source → target`).
    ///
    /// Both endpoints are auto-registered as nodes. Re-adding an existing edge
    /// is a no-op.
    ///
    /// # Errors
    /// [`EngineError::CycleDetected`] if the edge would make the graph cyclic;
    /// a self-edge counts as a cycle. Endpoint registration is kept even when
    /// the edge is rejected.
    pub fn register_dependency(
        &mut self,
        source: impl Into<String>,
        target: impl Into<String>,
    ) -> Result<(), EngineError> {
        let source = source.into();
        let target = target.into();

        self.register_node(source.clone());
        self.register_node(target.clone());

        if source == target || self.is_reachable(&target, &source) {
            return Err(EngineError::CycleDetected { from: source, to: target });
        }

        self.edges.entry(source).or_default().insert(target);
        Ok(())
    }

    /// Apply [`register_dependency`](Self::register_dependency) for each pair
    /// in order.
    ///
    /// Stops at the first cycle error; previously added edges stay in place
    /// (no rollback).
    pub fn register_dependencies<S, T>(
        &mut self,
        pairs: impl IntoIterator<Item = (S, T)>,
    ) -> Result<(), EngineError>
    where
        S: Into<String>,
        T: Into<String>,
    {
        for (source, target) in pairs {
            self.register_dependency(source, target)?;
        }
        Ok(())
    }

    /// Every field transitively reachable from `name` by following edges
    /// forward, excluding `name` itself.
    ///
    /// An unknown `name` yields the empty set — a field nothing depends on
    /// affects nothing.
    pub fn descendants(&self, name: &str) -> BTreeSet<String> {
        let mut seen: BTreeSet<String> = BTreeSet::new();
        let mut queue: VecDeque<&str> = VecDeque::new();
        queue.push_back(name);

        while let Some(current) = queue.pop_front() {
            if let Some(targets) = self.edges.get(current) {
                for target in targets {
                    if seen.insert(target.clone()) {
                        queue.push_back(target);
                    }
                }
            }
        }

        seen.remove(name);
        seen
    }

    /// The descendants of `name` in deterministic recomputation order:
    /// topologically sorted over the affected subgraph (Kahn's algorithm),
    /// lexicographic among fields whose upstream work is done.
    ///
    /// Guarantees that when B and C are both affected and C depends on B, B's
    /// processor runs first and C observes B's refreshed value.
    pub fn propagation_order(&self, name: &str) -> Vec<String> {
        let affected = self.descendants(name);

        // In-degree restricted to edges within the affected set; edges from
        // `name` itself contribute nothing (it is not a member).
        let mut in_degree: BTreeMap<&str, usize> =
            affected.iter().map(|f| (f.as_str(), 0)).collect();

        for field in &affected {
            for target in &self.edges[field.as_str()] {
                if let Some(deg) = in_degree.get_mut(target.as_str()) {
                    *deg += 1;
                }
            }
        }

        // Ordered ready-set: ties resolve lexicographically.
        let mut ready: BTreeSet<&str> = in_degree
            .iter()
            .filter(|(_, &deg)| deg == 0)
            .map(|(&f, _)| f)
            .collect();

        let mut order: Vec<String> = Vec::with_capacity(affected.len());

        while let Some(field) = ready.pop_first() {
            order.push(field.to_owned());

            for target in &self.edges[field] {
                if let Some(deg) = in_degree.get_mut(target.as_str()) {
                    *deg -= 1;
                    if *deg == 0 {
                        ready.insert(target);
                    }
                }
            }
        }

        // Construction forbids cycles, so every affected field gets sorted.
        debug_assert_eq!(order.len(), affected.len());
        order
    }

    fn is_reachable(&self, from: &str, to: &str) -> bool {
        from == to || self.descendants(from).contains(to)
    }
}
