use std::str::FromStr;

use derive_more::Display;
use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::cost::Cost;
use crate::problem::Heuristic;
use crate::space::Path;
use crate::space::Space;
use crate::space::State;

const MAX_ELEMENTS_DISPLAYED: usize = 20;

/// A node of a `Graph`.
///
/// Just an index, labels and edges are stored in the Graph.
#[derive(Copy, Clone, Debug, Display, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[display("#{_0}")]
pub struct GraphNode(u32);

impl GraphNode {
    #[inline(always)]
    pub fn as_usize(&self) -> usize {
        self.0 as usize
    }
}

impl State for GraphNode {
    type Key = u32;

    #[inline(always)]
    fn key(&self) -> u32 {
        self.0
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum GraphError {
    #[error("Node '{0}' already exists")]
    DuplicateNode(String),
    #[error("Unknown node {0}")]
    UnknownNode(GraphNode),
    #[error("Edge {from}->{to} has an invalid cost ({cost})")]
    InvalidEdgeCost {
        from: String,
        to: String,
        cost: String,
    },
    #[error("Node '{label}' has an invalid heuristic ({h})")]
    InvalidHeuristic { label: String, h: String },
    #[error("Too many nodes")]
    TooManyNodes,
}

/// An explicit directed graph with costs on its edges.
///
/// Each node carries a precomputed estimate of its distance to the goal the
/// graph was built for.
#[derive(Clone)]
pub struct Graph<C: Cost> {
    labels: Vec<String>,
    heuristics: Vec<C>,
    edges: Vec<Vec<(GraphNode, C)>>,
    index: FxHashMap<String, GraphNode>,
}

impl<C: Cost> Graph<C> {
    pub fn new() -> Self {
        Self {
            labels: vec![],
            heuristics: vec![],
            edges: vec![],
            index: FxHashMap::default(),
        }
    }

    pub fn add_node(&mut self, label: &str, h: C) -> Result<GraphNode, GraphError> {
        if self.index.contains_key(label) {
            return Err(GraphError::DuplicateNode(label.to_string()));
        }
        if !h.well_formed() {
            return Err(GraphError::InvalidHeuristic {
                label: label.to_string(),
                h: h.to_string(),
            });
        }
        let id = u32::try_from(self.labels.len()).map_err(|_| GraphError::TooManyNodes)?;
        let node = GraphNode(id);

        self.labels.push(label.to_string());
        self.heuristics.push(h);
        self.edges.push(vec![]);
        self.index.insert(label.to_string(), node);

        Ok(node)
    }

    /// Adds a directed edge.
    ///
    /// Costs must be finite and non-negative.
    pub fn add_edge(&mut self, from: GraphNode, to: GraphNode, cost: C) -> Result<(), GraphError> {
        self.check(from)?;
        self.check(to)?;
        if !cost.well_formed() || !cost.valid() {
            return Err(GraphError::InvalidEdgeCost {
                from: self.label(from).to_string(),
                to: self.label(to).to_string(),
                cost: cost.to_string(),
            });
        }

        self.edges[from.as_usize()].push((to, cost));
        Ok(())
    }

    fn check(&self, node: GraphNode) -> Result<(), GraphError> {
        if node.as_usize() < self.len() {
            Ok(())
        } else {
            Err(GraphError::UnknownNode(node))
        }
    }

    pub fn node(&self, label: &str) -> Option<GraphNode> {
        self.index.get(label).copied()
    }

    /// The label of a node.
    ///
    /// # Panics
    ///
    /// If `node` wasn't created by this graph. Nodes from a different graph
    /// may also alias an unrelated node here.
    pub fn label(&self, node: GraphNode) -> &str {
        &self.labels[node.as_usize()]
    }

    /// The estimate stored on a node.
    ///
    /// # Panics
    ///
    /// If `node` wasn't created by this graph, like `label`.
    pub fn heuristic(&self, node: GraphNode) -> C {
        self.heuristics[node.as_usize()]
    }

    /// The outgoing edges of a node, in insertion order.
    ///
    /// # Panics
    ///
    /// If `node` wasn't created by this graph, like `label`.
    pub fn edges(&self, node: GraphNode) -> &[(GraphNode, C)] {
        &self.edges[node.as_usize()]
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn nodes(&self) -> impl Iterator<Item = GraphNode> + use<C> {
        (0..self.labels.len() as u32).map(GraphNode)
    }

    /// The labels along a path.
    pub fn labels(&self, path: &Path<GraphNode, C>) -> Vec<&str> {
        path.states.iter().map(|n| self.label(*n)).collect()
    }
}

impl<C: Cost> Default for Graph<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Cost> Space<GraphNode, C> for Graph<C> {
    #[inline(always)]
    fn neighbours(&self, s: &GraphNode) -> Vec<(GraphNode, C)> {
        self.edges[s.as_usize()].clone()
    }

    #[inline(always)]
    fn valid(&self, s: &GraphNode) -> bool {
        s.as_usize() < self.len()
    }

    fn size(&self) -> Option<usize> {
        Some(self.len())
    }
}

impl<C: Cost> std::fmt::Display for Graph<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        writeln!(f, "Graph({} nodes):", self.len())?;
        for node in self.nodes().take(MAX_ELEMENTS_DISPLAYED) {
            write!(f, "  {} (h={}):", self.label(node), self.heuristic(node))?;
            for (to, c) in self.edges(node) {
                write!(f, " {}({c})", self.label(*to))?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}

impl<C: Cost> std::fmt::Debug for Graph<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let edges: usize = self.edges.iter().map(Vec::len).sum();
        write!(f, "Graph{{{} nodes, {} edges}}", self.len(), edges)
    }
}

/// The estimate stored on each node of the Graph.
///
/// Ignores the goal, these estimates were computed for a single goal.
#[derive(Debug)]
pub struct GraphHeuristic;

impl<C: Cost> Heuristic<Graph<C>, GraphNode, C> for GraphHeuristic {
    #[inline(always)]
    fn h(space: &Graph<C>, s: &GraphNode, _goal: &GraphNode) -> C {
        space.heuristic(*s)
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum GraphParseError {
    #[error("Empty input")]
    EmptyInput,
    #[error("Line {line}: Unknown directive '{directive}'")]
    UnknownDirective { line: usize, directive: String },
    #[error("Line {line}: Expected {expected} fields, found {found}")]
    WrongFieldCount {
        line: usize,
        expected: usize,
        found: usize,
    },
    #[error("Line {line}: Invalid number '{value}'")]
    InvalidNumber { line: usize, value: String },
    #[error("Line {line}: Unknown node '{label}'")]
    UnknownLabel { line: usize, label: String },
    #[error("Line {line}: {e}")]
    InvalidGraph { line: usize, e: GraphError },
}

/// Parses the graph text format,
///
/// ```text
/// # Comments and blank lines are ignored
/// node S 6
/// node G 0
/// edge S G 7
/// ```
///
/// Nodes must be declared before the edges using them.
impl<C> std::convert::TryFrom<&str> for Graph<C>
where
    C: Cost + FromStr,
{
    type Error = GraphParseError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        let mut graph = Graph::<C>::new();

        for (i, line) in s.lines().enumerate() {
            let line_number = i + 1;
            let line = line.split('#').next().unwrap_or_default().trim();
            if line.is_empty() {
                continue;
            }
            let fields: Vec<&str> = line.split_whitespace().collect();

            let expect = |expected: usize| {
                if fields.len() == expected {
                    Ok(())
                } else {
                    Err(GraphParseError::WrongFieldCount {
                        line: line_number,
                        expected,
                        found: fields.len(),
                    })
                }
            };
            let number = |value: &str| {
                value
                    .parse::<C>()
                    .map_err(|_| GraphParseError::InvalidNumber {
                        line: line_number,
                        value: value.to_string(),
                    })
            };
            let lookup = |graph: &Graph<C>, label: &str| {
                graph
                    .node(label)
                    .ok_or_else(|| GraphParseError::UnknownLabel {
                        line: line_number,
                        label: label.to_string(),
                    })
            };
            let invalid = |e| GraphParseError::InvalidGraph {
                line: line_number,
                e,
            };

            match fields[0] {
                "node" => {
                    expect(3)?;
                    let h = number(fields[2])?;
                    graph.add_node(fields[1], h).map_err(invalid)?;
                }
                "edge" => {
                    expect(4)?;
                    let from = lookup(&graph, fields[1])?;
                    let to = lookup(&graph, fields[2])?;
                    let cost = number(fields[3])?;
                    graph.add_edge(from, to, cost).map_err(invalid)?;
                }
                directive => {
                    return Err(GraphParseError::UnknownDirective {
                        line: line_number,
                        directive: directive.to_string(),
                    });
                }
            }
        }

        if graph.is_empty() {
            return Err(GraphParseError::EmptyInput);
        }
        Ok(graph)
    }
}
