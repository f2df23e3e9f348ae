pub const GRID_SIZE: i32 = 40;
pub const PORT_DISTANCE: f64 = 40.0;
pub const PORT_SPREAD: f64 = 20.0;
// must exceed PORT_DISTANCE
pub const CONNECTION_TOLERANCE: f64 = 45.0;
pub const MAX_PASSES: usize = 100;
pub const HISTORY_CAPACITY: usize = 20;
pub const PALETTE_WIDTH: i32 = 200;
pub const SMALL_FOOTPRINT: i32 = 40;
pub const GATE_FOOTPRINT: i32 = 80;
pub const TRUTH_TABLE_MAX_INPUTS: usize = 12;
