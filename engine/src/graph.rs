use log::{debug, trace};

use crate::{
    components::PlacedComponent,
    geometry::{Point, PortGeometry},
    types::{ComponentId, ComponentKind},
};

/// Directed "feeds" relation between components, indexed by placement order.
#[derive(Debug, Clone, Default)]
pub struct ConnectionGraph {
    ids: Vec<ComponentId>,
    fanout: Vec<Vec<usize>>,
    // inverse of fanout; sources in placement order
    fanin: Vec<Vec<usize>>,
}

impl ConnectionGraph {
    /// Matches every output port against every input port (and, for pairs of
    /// wires, every port against every port) within `tolerance`.
    pub fn build(
        components: &[PlacedComponent],
        geometry: &PortGeometry,
        tolerance: f64,
    ) -> ConnectionGraph {
        let n = components.len();
        let outputs: Vec<Option<Point>> = components
            .iter()
            .map(|c| geometry.output_point(c))
            .collect();
        let inputs: Vec<Vec<Point>> = components
            .iter()
            .map(|c| geometry.input_points(c))
            .collect();

        let mut g = ConnectionGraph {
            ids: components.iter().map(|c| c.id.clone()).collect(),
            fanout: vec![Vec::new(); n],
            fanin: Vec::new(),
        };

        let out_to_in = |a: usize, b: usize| match outputs[a] {
            Some(out) => inputs[b].iter().any(|inp| out.distance(*inp) < tolerance),
            None => false,
        };

        for a in 0..n {
            for b in 0..n {
                if a == b {
                    continue;
                }
                if out_to_in(a, b) {
                    g.add_edge(a, b);
                    continue;
                }
                // a wire chained into another is not a junction
                if components[a].kind != ComponentKind::Wire
                    || components[b].kind != ComponentKind::Wire
                    || out_to_in(b, a)
                {
                    continue;
                }
                let touching = outputs[a].iter().chain(inputs[a].iter()).any(|pa| {
                    outputs[b]
                        .iter()
                        .chain(inputs[b].iter())
                        .any(|pb| pa.distance(*pb) < tolerance)
                });
                if touching {
                    trace!("junction {} <-> {}", g.ids[a], g.ids[b]);
                    g.add_edge(a, b);
                    g.add_edge(b, a);
                }
            }
        }

        g.fanin = vec![Vec::new(); n];
        for src in 0..n {
            for &dst in &g.fanout[src] {
                g.fanin[dst].push(src);
            }
        }
        g
    }

    fn add_edge(&mut self, from: usize, to: usize) {
        if self.fanout[from].contains(&to) {
            return;
        }
        debug!("{} -> {}", self.ids[from], self.ids[to]);
        self.fanout[from].push(to);
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn fanout_at(&self, idx: usize) -> &[usize] {
        &self.fanout[idx]
    }

    pub fn fanin_at(&self, idx: usize) -> &[usize] {
        &self.fanin[idx]
    }

    /// Ids fed by `id`, in the order the edges were found.
    pub fn fanout(&self, id: &ComponentId) -> Vec<&ComponentId> {
        match self.index_of(id) {
            Some(idx) => self.fanout[idx].iter().map(|&i| &self.ids[i]).collect(),
            None => Vec::new(),
        }
    }

    pub fn feeds(&self, from: &ComponentId, to: &ComponentId) -> bool {
        match (self.index_of(from), self.index_of(to)) {
            (Some(a), Some(b)) => self.fanout[a].contains(&b),
            _ => false,
        }
    }

    pub fn edges(&self) -> impl Iterator<Item = (&ComponentId, &ComponentId)> + '_ {
        self.fanout
            .iter()
            .enumerate()
            .flat_map(move |(src, dsts)| dsts.iter().map(move |&d| (&self.ids[src], &self.ids[d])))
    }

    pub fn edge_count(&self) -> usize {
        self.fanout.iter().map(Vec::len).sum()
    }

    fn index_of(&self, id: &ComponentId) -> Option<usize> {
        self.ids.iter().position(|i| i == id)
    }

    #[cfg(test)]
    pub(crate) fn from_fanout(ids: Vec<ComponentId>, fanout: Vec<Vec<usize>>) -> ConnectionGraph {
        let mut fanin = vec![Vec::new(); ids.len()];
        for (src, dsts) in fanout.iter().enumerate() {
            for &dst in dsts {
                fanin[dst].push(src);
            }
        }
        ConnectionGraph { ids, fanout, fanin }
    }
}
