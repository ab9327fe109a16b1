use glam::Mat4;
use serde::{Deserialize, Serialize};

use super::constants::SORT_DIRTY_THRESHOLD;

/// Depth-sort algorithm selector, serialized verbatim into the worker
/// request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortAlgorithm {
    #[serde(rename = "count sort")]
    CountSort,
    #[serde(rename = "quick sort")]
    QuickSort,
}

impl Default for SortAlgorithm {
    fn default() -> Self {
        SortAlgorithm::CountSort
    }
}

/// Request posted to the sort worker. Field names are part of the message
/// contract.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SortRequest {
    pub view_matrix: [f32; 16],
    pub max_gaussians: u32,
    pub sorting_algorithm: SortAlgorithm,
}

/// Dirty-flag + in-flight-flag protocol deciding when a re-sort of the
/// splats is dispatched to the worker.
///
/// `needs_update` is set whenever the view direction has rotated enough
/// since the last dispatched sort; it is cleared only when a dispatch
/// actually occurs. `in_flight` guards the worker: at most one request is
/// outstanding, and dirtying events during a sort coalesce into exactly one
/// follow-up dispatch.
#[derive(Clone, Debug)]
pub struct SortCoordinator {
    needs_update: bool,
    in_flight: bool,
    last_view_proj: Mat4,
}

impl SortCoordinator {
    pub fn new() -> Self {
        Self {
            // A fresh camera always needs an initial sort
            needs_update: true,
            in_flight: false,
            last_view_proj: Mat4::IDENTITY,
        }
    }

    /// Compare the view-direction row (translation-independent) of the
    /// current view-projection matrix against the snapshot taken at the
    /// last dirtying event.
    pub fn observe(&mut self, view_proj: &Mat4) {
        let last = self.last_view_proj.to_cols_array();
        let cur = view_proj.to_cols_array();
        let dot = last[2] * cur[2] + last[6] * cur[6] + last[10] * cur[10];
        if (dot - 1.0).abs() > SORT_DIRTY_THRESHOLD {
            self.needs_update = true;
            self.last_view_proj = *view_proj;
        }
    }

    /// True exactly once per due sort: flips the flags so the caller can
    /// post the request. The worker's completion callback must call
    /// [`SortCoordinator::complete`].
    ///
    /// `cloud_ready` is false until the worker has finished loading the
    /// scene. The worker drops sort requests that arrive mid-load, so a
    /// premature dispatch would set `in_flight` with no completion ever
    /// coming back. Refusing leaves `needs_update` set, and the first
    /// frame after the load dispatches normally.
    pub fn should_dispatch(&mut self, cloud_ready: bool) -> bool {
        if cloud_ready && self.needs_update && !self.in_flight {
            self.needs_update = false;
            self.in_flight = true;
            true
        } else {
            false
        }
    }

    pub fn complete(&mut self) {
        self.in_flight = false;
    }

    #[inline]
    pub fn needs_update(&self) -> bool {
        self.needs_update
    }

    #[inline]
    pub fn in_flight(&self) -> bool {
        self.in_flight
    }
}

impl Default for SortCoordinator {
    fn default() -> Self {
        Self::new()
    }
}
