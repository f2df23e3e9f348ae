use std::fmt::Write;

use gridsim_engine::{
    geometry::PortDirection, table::Table, types::signal_char, ConnectionGraph,
    SimulationReport, Workspace,
};

pub fn values_table(ws: &Workspace, sim: &SimulationReport) -> Table<String> {
    let mut t = Table::with_columns(
        ["id", "kind", "x", "y", "rot", "value"]
            .iter()
            .map(|c| c.to_string())
            .collect(),
    );
    for (comp, (_, value)) in ws.components().iter().zip(&sim.values) {
        t.push_row(vec![
            comp.id.to_string(),
            comp.kind.to_string(),
            comp.x.to_string(),
            comp.y.to_string(),
            comp.rotation.to_string(),
            signal_char(*value).to_string(),
        ]);
    }
    t
}

pub fn ports_listing(ws: &Workspace) -> String {
    let mut out = String::new();
    for comp in ws.components() {
        let _ = writeln!(out, "{}", comp);
        for port in ws.geometry().ports_of(comp) {
            let dir = match port.direction {
                PortDirection::In => "in",
                PortDirection::Out => "out",
            };
            let _ = writeln!(
                out,
                "  {}[{}] ({:.1}, {:.1})",
                dir, port.index, port.world.x, port.world.y
            );
        }
    }
    out
}

pub fn edge_listing(graph: &ConnectionGraph) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} connections", graph.edge_count());
    for (from, to) in graph.edges() {
        let _ = writeln!(out, "  {} -> {}", from, to);
    }
    out
}
