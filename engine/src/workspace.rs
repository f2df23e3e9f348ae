use log::{debug, info, warn};

use crate::{
    components::PlacedComponent,
    config::SimConfig,
    consts::TRUTH_TABLE_MAX_INPUTS,
    error::{LayoutError, WorkspaceError},
    geometry::{Point, PortGeometry},
    graph::ConnectionGraph,
    history::{CommandHistory, Snapshot},
    persistence::{parse_layout, LayoutRecord, LoadReport, SkipReason, SkippedRecord},
    propagation::{propagate, PropagationSummary},
    table::{bitwise_counter, Table},
    types::{signal_char, ComponentId, ComponentKind, Rotation, Signal},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    Moved,
    // snapped onto the cell it already occupied
    Unchanged,
    // dropped back on the palette, which deletes it
    ReturnedToPalette,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SimulationReport {
    // placement order
    pub values: Vec<(ComponentId, Signal)>,
    pub passes: usize,
    pub settled: bool,
}

impl SimulationReport {
    pub fn value(&self, id: &ComponentId) -> Option<Signal> {
        self.values.iter().find(|(i, _)| i == id).map(|(_, v)| *v)
    }
}

/// Everything that is placed on the grid, plus the undo history. All
/// mutation goes through here; the graph builder and the propagation engine
/// only ever see a slice of the components.
pub struct Workspace {
    config: SimConfig,
    geometry: PortGeometry,
    components: Vec<PlacedComponent>,
    history: CommandHistory,
    last_id: u64,
}

impl Default for Workspace {
    fn default() -> Self {
        Workspace::new(SimConfig::default())
    }
}

impl Workspace {
    pub fn new(config: SimConfig) -> Workspace {
        Workspace {
            geometry: config.geometry(),
            history: CommandHistory::new(config.history_capacity),
            config,
            components: Vec::new(),
            last_id: 0,
        }
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn geometry(&self) -> &PortGeometry {
        &self.geometry
    }

    pub fn components(&self) -> &[PlacedComponent] {
        &self.components
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    pub fn get(&self, id: &ComponentId) -> Option<&PlacedComponent> {
        self.components.iter().find(|c| &c.id == id)
    }

    fn index_of(&self, id: &ComponentId) -> Result<usize, WorkspaceError> {
        self.components
            .iter()
            .position(|c| &c.id == id)
            .ok_or_else(|| WorkspaceError::UnknownComponent(id.clone()))
    }

    fn new_id(&mut self, kind: ComponentKind) -> ComponentId {
        self.last_id += 1;
        ComponentId::generate(kind, self.last_id)
    }

    fn commit(&mut self) {
        let before = Snapshot::capture(&self.components);
        self.history.record(before);
    }

    pub fn place(
        &mut self,
        kind: ComponentKind,
        x: i32,
        y: i32,
    ) -> Result<ComponentId, WorkspaceError> {
        self.place_rotated(kind, x, y, Rotation::R0)
    }

    pub fn place_rotated(
        &mut self,
        kind: ComponentKind,
        x: i32,
        y: i32,
        rotation: Rotation,
    ) -> Result<ComponentId, WorkspaceError> {
        let (x, y) = (self.config.snap(x), self.config.snap(y));
        if self.config.in_palette(x) {
            return Err(WorkspaceError::InPalette { x, y });
        }
        if self.is_position_occupied(x, y, None, Some(kind)) {
            return Err(WorkspaceError::Occupied { x, y });
        }
        self.commit();
        let id = self.new_id(kind);
        debug!("placed {} at ({}, {}) rot {}", id, x, y, rotation);
        self.components
            .push(PlacedComponent::new(id.clone(), kind, x, y, rotation));
        Ok(id)
    }

    /// Drops a component at `(x, y)` after snapping. Dropping it onto the
    /// palette strip removes it.
    pub fn move_to(
        &mut self,
        id: &ComponentId,
        x: i32,
        y: i32,
    ) -> Result<MoveOutcome, WorkspaceError> {
        let idx = self.index_of(id)?;
        if self.config.in_palette(x) {
            self.commit();
            self.components.remove(idx);
            debug!("{} dragged back to the palette", id);
            return Ok(MoveOutcome::ReturnedToPalette);
        }
        let (x, y) = (self.config.snap(x), self.config.snap(y));
        let comp = &self.components[idx];
        if comp.x == x && comp.y == y {
            return Ok(MoveOutcome::Unchanged);
        }
        if self.is_position_occupied(x, y, Some(id), Some(comp.kind)) {
            return Err(WorkspaceError::Occupied { x, y });
        }
        self.commit();
        let comp = &mut self.components[idx];
        debug!("moved {} from ({}, {}) to ({}, {})", id, comp.x, comp.y, x, y);
        comp.x = x;
        comp.y = y;
        Ok(MoveOutcome::Moved)
    }

    /// Quarter turn; returns the new rotation.
    pub fn rotate(&mut self, id: &ComponentId) -> Result<Rotation, WorkspaceError> {
        let idx = self.index_of(id)?;
        self.commit();
        let comp = &mut self.components[idx];
        comp.rotation = comp.rotation.next();
        debug!("rotated {} to {}", id, comp.rotation);
        Ok(comp.rotation)
    }

    pub fn remove(&mut self, id: &ComponentId) -> Result<PlacedComponent, WorkspaceError> {
        let idx = self.index_of(id)?;
        self.commit();
        debug!("removed {}", id);
        Ok(self.components.remove(idx))
    }

    /// True when a component of `kind` centred on `(x, y)` would overlap
    /// something already placed. `kind: None` checks with a gate footprint.
    pub fn is_position_occupied(
        &self,
        x: i32,
        y: i32,
        excluding: Option<&ComponentId>,
        kind: Option<ComponentKind>,
    ) -> bool {
        let half = |k: Option<ComponentKind>| match k {
            Some(k) => self.config.footprint(k) as i64 / 2,
            None => self.config.gate_footprint as i64 / 2,
        };
        let own = half(kind);
        self.components.iter().any(|c| {
            if Some(&c.id) == excluding {
                return false;
            }
            // coordinates may span the whole i32 range
            let dx = (c.x as i64 - x as i64).abs();
            let dy = (c.y as i64 - y as i64).abs();
            // wires may meet at a shared port, they only clash on the same cell
            if kind == Some(ComponentKind::Wire) && c.kind == ComponentKind::Wire {
                return dx == 0 && dy == 0;
            }
            let min = own + half(Some(c.kind));
            dx < min && dy < min
        })
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(&self.components)
    }

    fn restore(&mut self, snapshot: &Snapshot) {
        self.components = snapshot.restore();
    }

    /// Returns false when there was nothing to undo.
    pub fn undo(&mut self) -> bool {
        let current = self.snapshot();
        match self.history.undo(current) {
            Some(prev) => {
                self.restore(&prev);
                debug!("undo, {} components", self.components.len());
                true
            }
            None => false,
        }
    }

    pub fn redo(&mut self) -> bool {
        let current = self.snapshot();
        match self.history.redo(current) {
            Some(next) => {
                self.restore(&next);
                debug!("redo, {} components", self.components.len());
                true
            }
            None => false,
        }
    }

    pub fn history(&self) -> &CommandHistory {
        &self.history
    }

    pub fn connections(&self) -> ConnectionGraph {
        ConnectionGraph::build(
            &self.components,
            &self.geometry,
            self.config.connection_tolerance,
        )
    }

    pub fn simulate(&mut self) -> SimulationReport {
        let graph = self.connections();
        debug!(
            "simulating {} components, {} connections",
            self.components.len(),
            graph.edge_count()
        );
        let PropagationSummary { passes, settled } =
            propagate(&mut self.components, &graph, self.config.max_passes);
        SimulationReport {
            values: self
                .components
                .iter()
                .map(|c| (c.id.clone(), c.value))
                .collect(),
            passes,
            settled,
        }
    }

    pub fn clear_values(&mut self) {
        for c in self.components.iter_mut() {
            c.value = None;
        }
    }

    /// Replaces the workspace with `records`, generating fresh ids. The
    /// history restarts from the loaded state.
    pub fn load_records(&mut self, records: &[LayoutRecord]) -> LoadReport {
        let entries = records.iter().cloned().map(Ok).collect();
        self.load_entries(entries)
    }

    pub fn load_json(&mut self, json: &str) -> Result<LoadReport, LayoutError> {
        Ok(self.load_entries(parse_layout(json)?))
    }

    pub fn load_entries(&mut self, entries: Vec<Result<LayoutRecord, SkipReason>>) -> LoadReport {
        self.components.clear();
        self.history.clear();
        let mut report = LoadReport::default();
        for (index, entry) in entries.into_iter().enumerate() {
            match entry.and_then(|rec| self.admit(&rec)) {
                Ok(id) => report.loaded.push(id),
                Err(reason) => {
                    warn!("skipping layout record {}: {}", index, reason);
                    report.skipped.push(SkippedRecord { index, reason });
                }
            }
        }
        info!(
            "loaded {} components, skipped {}",
            report.loaded.len(),
            report.skipped.len()
        );
        report
    }

    fn admit(&mut self, rec: &LayoutRecord) -> Result<ComponentId, SkipReason> {
        let (kind, rotation) = rec.validate()?;
        let (x, y) = (self.config.snap(rec.x), self.config.snap(rec.y));
        if self.config.in_palette(x) {
            return Err(SkipReason::InPalette { x, y });
        }
        if self.is_position_occupied(x, y, None, Some(kind)) {
            return Err(SkipReason::Occupied { x, y });
        }
        let id = self.new_id(kind);
        self.components
            .push(PlacedComponent::new(id.clone(), kind, x, y, rotation));
        Ok(id)
    }

    pub fn layout(&self) -> Vec<LayoutRecord> {
        self.snapshot().entries().iter().map(LayoutRecord::from).collect()
    }

    pub fn to_json(&self) -> Result<String, LayoutError> {
        crate::persistence::layout_to_json(&self.layout())
    }

    /// Grid position near `(x, y)` where a new `kind` would hook onto an
    /// existing port: one of its inputs on a free output, or its output on
    /// a free input. Picks the candidate closest to `(x, y)` within the
    /// connection tolerance.
    pub fn suggest_position(
        &self,
        kind: ComponentKind,
        rotation: Rotation,
        x: i32,
        y: i32,
    ) -> Option<(i32, i32)> {
        let tol = self.config.connection_tolerance;
        let own_out = self.geometry.output_offset(kind, rotation);
        let own_ins = self.geometry.input_offsets(kind, rotation);

        let mut candidates: Vec<Point> = Vec::new();
        for c in &self.components {
            if let Some(out) = self.geometry.output_point(c) {
                candidates.extend(own_ins.iter().map(|off| out - *off));
            }
            if let Some(off) = own_out {
                candidates.extend(self.geometry.input_points(c).into_iter().map(|inp| inp - off));
            }
        }

        let want = Point::new(x as f64, y as f64);
        candidates
            .into_iter()
            .map(|p| (self.config.snap(p.x.round() as i32), self.config.snap(p.y.round() as i32)))
            .filter(|&(cx, cy)| {
                let center = Point::new(cx as f64, cy as f64);
                center.distance(want) < tol
                    && !self.config.in_palette(cx)
                    && !self.is_position_occupied(cx, cy, None, Some(kind))
                    && self.attaches(kind, rotation, cx, cy)
            })
            .min_by(|a, b| {
                let da = Point::new(a.0 as f64, a.1 as f64).distance(want);
                let db = Point::new(b.0 as f64, b.1 as f64).distance(want);
                da.total_cmp(&db)
            })
    }

    // whether a component placed there would get at least one connection
    fn attaches(&self, kind: ComponentKind, rotation: Rotation, x: i32, y: i32) -> bool {
        let probe = PlacedComponent::new(ComponentId::from("_probe"), kind, x, y, rotation);
        let mut trial: Vec<PlacedComponent> = self.components.clone();
        trial.push(probe);
        let g = ConnectionGraph::build(&trial, &self.geometry, self.config.connection_tolerance);
        let idx = trial.len() - 1;
        !g.fanout_at(idx).is_empty() || !g.fanin_at(idx).is_empty()
    }

    /// Simulates every 0/1 assignment of the constant inputs (placement
    /// order) and tabulates the output probes. Cells are `0`, `1` or `x`.
    pub fn truth_table(&self) -> Result<Table<char>, WorkspaceError> {
        let inputs: Vec<usize> = (0..self.components.len())
            .filter(|&i| self.components[i].kind.is_constant())
            .collect();
        let probes: Vec<usize> = (0..self.components.len())
            .filter(|&i| self.components[i].kind == ComponentKind::Output)
            .collect();
        if inputs.len() > TRUTH_TABLE_MAX_INPUTS {
            return Err(WorkspaceError::TooManyInputs {
                count: inputs.len(),
                limit: TRUTH_TABLE_MAX_INPUTS,
            });
        }

        let cols = inputs
            .iter()
            .chain(probes.iter())
            .map(|&i| self.components[i].id.to_string())
            .collect();
        let mut table = Table::<char>::with_columns(cols);

        // constant kinds share their port layout, so one graph serves every row
        let graph = self.connections();
        let mut trial = self.components.clone();
        for assignment in bitwise_counter(inputs.len()) {
            for (&i, &val) in inputs.iter().zip(assignment.iter()) {
                trial[i].kind = ComponentKind::constant(val);
            }
            propagate(&mut trial, &graph, self.config.max_passes);
            let row = table.add_row();
            for &i in inputs.iter().chain(probes.iter()) {
                table.set_val_at(row, trial[i].id.as_str(), signal_char(trial[i].value));
            }
        }
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn place_snaps_to_grid() {
        let mut ws = Workspace::default();
        let id = ws.place(ComponentKind::Not, 367, 101).unwrap();
        let c = ws.get(&id).unwrap();
        assert_eq!((c.x, c.y), (360, 120));
        assert_eq!(c.rotation, Rotation::R0);
        assert_eq!(c.value, None);
    }

    #[test]
    fn ids_are_never_reused() {
        let mut ws = Workspace::default();
        let a = ws.place(ComponentKind::And, 360, 120).unwrap();
        ws.remove(&a).unwrap();
        let b = ws.place(ComponentKind::And, 360, 120).unwrap();
        assert_ne!(a, b);
        assert!(b.as_str().starts_with("and_"));
    }

    #[test]
    fn placing_in_palette_is_rejected() {
        let mut ws = Workspace::default();
        assert_eq!(
            ws.place(ComponentKind::Or, 120, 40),
            Err(WorkspaceError::InPalette { x: 120, y: 40 })
        );
        assert!(ws.is_empty());
        assert!(!ws.history().can_undo());
    }

    #[test]
    fn occupied_place_is_rejected_without_history() {
        let mut ws = Workspace::default();
        ws.place(ComponentKind::And, 360, 120).unwrap();
        assert_eq!(
            ws.place(ComponentKind::Not, 400, 120),
            Err(WorkspaceError::Occupied { x: 400, y: 120 })
        );
        assert_eq!(ws.len(), 1);
        assert_eq!(ws.history().undo_depth(), 1);
    }

    #[test]
    fn occupancy_uses_footprints() {
        let mut ws = Workspace::default();
        ws.place(ComponentKind::And, 360, 120).unwrap();
        // gate vs gate: half footprints 40 + 40
        assert!(ws.is_position_occupied(400, 120, None, Some(ComponentKind::Or)));
        assert!(!ws.is_position_occupied(440, 120, None, Some(ComponentKind::Or)));
        // small vs gate: 20 + 40
        assert!(ws.is_position_occupied(320, 80, None, Some(ComponentKind::Wire)));
        assert!(!ws.is_position_occupied(440, 120, None, Some(ComponentKind::Output)));
        // no kind checks as a gate
        assert!(ws.is_position_occupied(400, 160, None, None));
    }

    #[test]
    fn far_apart_coordinates_do_not_overflow() {
        let mut ws = Workspace::default();
        ws.place(ComponentKind::And, 400, 2_147_483_000).unwrap();
        ws.place(ComponentKind::Or, 400, -2_147_483_000).unwrap();
        assert_eq!(ws.len(), 2);
        assert!(!ws.is_position_occupied(400, 0, None, Some(ComponentKind::Not)));
        assert!(ws.is_position_occupied(400, 2_147_483_000, None, None));
    }

    #[test]
    fn occupancy_excludes_the_moving_component() {
        let mut ws = Workspace::default();
        let id = ws.place(ComponentKind::And, 360, 120).unwrap();
        assert!(ws.is_position_occupied(360, 120, None, Some(ComponentKind::And)));
        assert!(!ws.is_position_occupied(360, 120, Some(&id), Some(ComponentKind::And)));
    }

    #[test]
    fn wires_only_clash_on_the_same_cell() {
        let mut ws = Workspace::default();
        ws.place(ComponentKind::Wire, 280, 80).unwrap();
        assert!(ws.is_position_occupied(280, 80, None, Some(ComponentKind::Wire)));
        assert!(!ws.is_position_occupied(300, 80, None, Some(ComponentKind::Wire)));
        // a constant input is not a wire, the footprint rule applies
        assert!(ws.is_position_occupied(300, 80, None, Some(ComponentKind::Input1)));
    }

    #[test]
    fn move_rejects_occupied_target() {
        let mut ws = Workspace::default();
        let a = ws.place(ComponentKind::And, 360, 120).unwrap();
        ws.place(ComponentKind::And, 520, 120).unwrap();
        assert_eq!(
            ws.move_to(&a, 480, 120),
            Err(WorkspaceError::Occupied { x: 480, y: 120 })
        );
        assert_eq!(ws.get(&a).unwrap().x, 360);
        assert_eq!(ws.move_to(&a, 360, 280), Ok(MoveOutcome::Moved));
        assert_eq!(ws.get(&a).unwrap().y, 280);
    }

    #[test]
    fn unchanged_move_records_nothing() {
        let mut ws = Workspace::default();
        let a = ws.place(ComponentKind::Xor, 360, 120).unwrap();
        assert_eq!(ws.move_to(&a, 365, 118), Ok(MoveOutcome::Unchanged));
        assert_eq!(ws.history().undo_depth(), 1);
    }

    #[test]
    fn drag_back_to_palette_removes() {
        let mut ws = Workspace::default();
        let a = ws.place(ComponentKind::Nor, 360, 120).unwrap();
        assert_eq!(ws.move_to(&a, 80, 120), Ok(MoveOutcome::ReturnedToPalette));
        assert!(ws.get(&a).is_none());
        assert!(ws.undo());
        assert!(ws.get(&a).is_some());
    }

    #[test]
    fn unknown_ids_are_reported() {
        let mut ws = Workspace::default();
        let ghost = ComponentId::from("and_99");
        assert_eq!(
            ws.rotate(&ghost),
            Err(WorkspaceError::UnknownComponent(ghost.clone()))
        );
        assert!(ws.remove(&ghost).is_err());
        assert!(ws.move_to(&ghost, 400, 400).is_err());
        assert!(!ws.history().can_undo());
    }

    #[test]
    fn rotate_cycles_and_undoes() {
        let mut ws = Workspace::default();
        let a = ws.place(ComponentKind::Not, 360, 120).unwrap();
        assert_eq!(ws.rotate(&a), Ok(Rotation::R90));
        assert_eq!(ws.rotate(&a), Ok(Rotation::R180));
        assert!(ws.undo());
        assert_eq!(ws.get(&a).unwrap().rotation, Rotation::R90);
        assert!(ws.redo());
        assert_eq!(ws.get(&a).unwrap().rotation, Rotation::R180);
    }

    #[test]
    fn clear_values_resets_signals() {
        let mut ws = Workspace::default();
        ws.place(ComponentKind::Input1, 240, 120).unwrap();
        ws.place(ComponentKind::Output, 320, 120).unwrap();
        let report = ws.simulate();
        assert!(report.values.iter().all(|(_, v)| *v == Some(true)));
        ws.clear_values();
        assert!(ws.components().iter().all(|c| c.value.is_none()));
    }

    #[test]
    fn suggestion_hooks_onto_free_output() {
        let mut ws = Workspace::default();
        ws.place(ComponentKind::Input1, 240, 120).unwrap();
        // the input's output port is at (280, 120); a not gate needs its
        // centre at (320, 120)
        assert_eq!(
            ws.suggest_position(ComponentKind::Not, Rotation::R0, 330, 110),
            Some((320, 120))
        );
        assert_eq!(
            ws.suggest_position(ComponentKind::Not, Rotation::R0, 800, 800),
            None
        );
    }

    #[test]
    fn suggestion_skips_occupied_spots() {
        let mut ws = Workspace::default();
        ws.place(ComponentKind::Input1, 240, 120).unwrap();
        ws.place(ComponentKind::And, 360, 120).unwrap();
        // (320, 120) would overlap the and gate
        assert_eq!(ws.suggest_position(ComponentKind::Not, Rotation::R0, 320, 120), None);
    }
}
