// coverage metrics over a running simulation

use crate::gs_interface::{GraphData, InformedStateMap};

/// Nodes counted as informed. A node without an entry in `states` falls back
/// to its static flag.
pub fn informed_count(graph: &GraphData, states: &InformedStateMap) -> usize {
    graph
        .nodes
        .iter()
        .filter(|node| states.get(&node.id).copied().unwrap_or(node.informed))
        .count()
}

/// Informed share of the graph in percent, 0 for an empty graph
pub fn informed_percentage(graph: &GraphData, states: &InformedStateMap) -> f64 {
    if graph.nodes.is_empty() {
        return 0.0;
    }
    informed_count(graph, states) as f64 / graph.nodes.len() as f64 * 100.0
}

/// Informed percentage recorded after every step
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropagationSeries {
    samples: Vec<f64>,
}

impl PropagationSeries {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, graph: &GraphData, states: &InformedStateMap) -> f64 {
        let value = informed_percentage(graph, states);
        self.samples.push(value);
        value
    }

    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn last(&self) -> Option<f64> {
        self.samples.last().copied()
    }

    /// Index of the first sample at full coverage
    pub fn rounds_to_full_coverage(&self) -> Option<usize> {
        self.samples.iter().position(|&v| v >= 100.0)
    }

    /// Index of the first sample at or above `percent`
    pub fn rounds_to_reach(&self, percent: f64) -> Option<usize> {
        self.samples.iter().position(|&v| v >= percent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gs_interface::Node;

    fn graph(flags: &[bool]) -> GraphData {
        GraphData {
            nodes: flags
                .iter()
                .enumerate()
                .map(|(i, &informed)| Node { id: format!("n{}", i), informed })
                .collect(),
            links: Vec::new(),
        }
    }

    #[test]
    fn test_static_flags_used_without_states() {
        let g = graph(&[true, false, false, false]);
        let states = InformedStateMap::new();
        assert_eq!(informed_count(&g, &states), 1);
        assert_eq!(informed_percentage(&g, &states), 25.0);
    }

    #[test]
    fn test_states_override_static_flags() {
        let g = graph(&[true, false]);
        let mut states = InformedStateMap::new();
        states.insert("n0".into(), false);
        states.insert("n1".into(), true);
        assert_eq!(informed_count(&g, &states), 1);

        states.insert("n0".into(), true);
        assert_eq!(informed_percentage(&g, &states), 100.0);
    }

    #[test]
    fn test_empty_graph_percentage() {
        assert_eq!(informed_percentage(&GraphData::default(), &InformedStateMap::new()), 0.0);
    }

    #[test]
    fn test_series_coverage_rounds() {
        let g = graph(&[false, false]);
        let mut states = g.initial_states();
        let mut series = PropagationSeries::new();

        series.record(&g, &states);
        states.insert("n0".into(), true);
        series.record(&g, &states);
        assert_eq!(series.rounds_to_full_coverage(), None);
        assert_eq!(series.rounds_to_reach(50.0), Some(1));

        states.insert("n1".into(), true);
        assert_eq!(series.record(&g, &states), 100.0);
        assert_eq!(series.samples(), &[0.0, 50.0, 100.0]);
        assert_eq!(series.rounds_to_full_coverage(), Some(2));
        assert_eq!(series.last(), Some(100.0));
    }
}
