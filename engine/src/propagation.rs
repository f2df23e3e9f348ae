use log::{debug, info, trace};

use crate::{
    components::{reducer, PlacedComponent},
    graph::ConnectionGraph,
    types::{ComponentKind, Signal},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropagationSummary {
    pub passes: usize,
    // false when the pass cap was hit while values were still changing
    pub settled: bool,
}

/// Bounded relaxation over `graph`: reset, seed the constant inputs, then
/// sweep the components in placement order until a sweep changes nothing or
/// `max_passes` sweeps have run. Feedback loops simply run into the cap and
/// may leave values undefined.
///
/// `components` must be the slice the graph was built from.
pub fn propagate(
    components: &mut [PlacedComponent],
    graph: &ConnectionGraph,
    max_passes: usize,
) -> PropagationSummary {
    debug_assert_eq!(components.len(), graph.len());

    for c in components.iter_mut() {
        c.value = c.kind.literal();
    }

    let mut passes = 0;
    let mut changed = true;
    let mut incoming: Vec<Signal> = Vec::new();
    while changed && passes < max_passes {
        changed = false;
        passes += 1;
        for idx in 0..components.len() {
            let kind = components[idx].kind;
            if kind.is_constant() {
                continue;
            }
            incoming.clear();
            incoming.extend(graph.fanin_at(idx).iter().map(|&src| components[src].value));

            let next = match kind {
                // first defined value wins
                ComponentKind::Wire => incoming.iter().find_map(|v| *v),
                _ => evaluate(kind, &incoming),
            };
            if next.is_some() && next != components[idx].value {
                trace!(
                    "pass {}: {} -> {:?}",
                    passes,
                    components[idx].id,
                    next
                );
                components[idx].value = next;
                changed = true;
            }
        }
    }

    if changed {
        info!(
            "propagation stopped at the cap of {} passes without settling",
            max_passes
        );
    } else {
        debug!("propagation settled after {} passes", passes);
    }
    PropagationSummary {
        passes,
        settled: !changed,
    }
}

// gates need every incoming value defined
fn evaluate(kind: ComponentKind, incoming: &[Signal]) -> Signal {
    if incoming.is_empty() {
        return None;
    }
    let vals = incoming.iter().copied().collect::<Option<Vec<bool>>>()?;
    reducer(kind).map(|f| f(&vals))
}
