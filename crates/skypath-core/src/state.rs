//! Per-cell search buffers, reused across searches.

/// Parent marker for cells with no predecessor.
pub const NO_PARENT: i32 = -1;

/// Cost, parent and membership buffers sized to the grid.
///
/// `reset` must run before every search; the engine does this itself.
#[derive(Debug, Clone)]
pub struct SearchState {
    g_cost: Vec<f32>,
    h_cost: Vec<f32>,
    fly_cost: Vec<f32>,
    parent: Vec<i32>,
    in_open: Vec<bool>,
    in_closed: Vec<bool>,
}

impl SearchState {
    pub fn new(cells: usize) -> Self {
        Self {
            g_cost: vec![f32::INFINITY; cells],
            h_cost: vec![0.0; cells],
            fly_cost: vec![0.0; cells],
            parent: vec![NO_PARENT; cells],
            in_open: vec![false; cells],
            in_closed: vec![false; cells],
        }
    }

    pub fn len(&self) -> usize {
        self.g_cost.len()
    }

    pub fn is_empty(&self) -> bool {
        self.g_cost.is_empty()
    }

    /// Restore every cell to its initial state, in place.
    pub fn reset(&mut self) {
        self.g_cost.fill(f32::INFINITY);
        self.h_cost.fill(0.0);
        self.fly_cost.fill(0.0);
        self.parent.fill(NO_PARENT);
        self.in_open.fill(false);
        self.in_closed.fill(false);
    }

    pub fn g_cost(&self, index: usize) -> f32 {
        self.g_cost[index]
    }

    pub fn h_cost(&self, index: usize) -> f32 {
        self.h_cost[index]
    }

    pub fn fly_cost(&self, index: usize) -> f32 {
        self.fly_cost[index]
    }

    /// Frontier priority: `g + h + fly`.
    pub fn f_cost(&self, index: usize) -> f32 {
        self.g_cost[index] + self.h_cost[index] + self.fly_cost[index]
    }

    pub fn parent(&self, index: usize) -> Option<usize> {
        let parent = self.parent[index];
        (parent >= 0).then_some(parent as usize)
    }

    pub fn in_open(&self, index: usize) -> bool {
        self.in_open[index]
    }

    pub fn is_visited(&self, index: usize) -> bool {
        self.in_closed[index]
    }

    pub(crate) fn open_start(&mut self, index: usize, h_cost: f32) {
        self.g_cost[index] = 0.0;
        self.h_cost[index] = h_cost;
        self.fly_cost[index] = 0.0;
        self.parent[index] = NO_PARENT;
    }

    pub(crate) fn relax(&mut self, index: usize, g_cost: f32, h_cost: f32, fly_cost: f32, parent: usize) {
        self.g_cost[index] = g_cost;
        self.h_cost[index] = h_cost;
        self.fly_cost[index] = fly_cost;
        self.parent[index] = parent as i32;
    }

    pub(crate) fn set_open(&mut self, index: usize, open: bool) {
        self.in_open[index] = open;
    }

    pub(crate) fn mark_visited(&mut self, index: usize) {
        self.in_open[index] = false;
        self.in_closed[index] = true;
    }

    #[cfg(test)]
    pub(crate) fn set_parent(&mut self, index: usize, parent: i32) {
        self.parent[index] = parent;
    }
}
