//! Working buffers for one animated instance of a skeleton.

use std::sync::Arc;

use crate::hierarchy::Hierarchy;
use crate::hierarchy_pose::{HierarchyPose, HierarchyPoseMut};
use crate::spatial::SpatialPose;

const SAMPLE: usize = 0;
const LOCAL: usize = 1;
const OBJECT: usize = 2;
const BUFFER_COUNT: usize = 3;

/// Sample, local-space and object-space hierarchy poses sharing one allocation.
///
/// The sample pose receives blend results, the local-space pose holds the committed
/// per-node pose relative to its parent, and the object-space pose holds the result of
/// accumulating local poses down the hierarchy.
#[derive(Clone, Debug)]
pub struct HierarchyState {
    hierarchy: Arc<Hierarchy>,
    storage: Vec<SpatialPose>,
}

/// Simultaneous mutable access to all three state buffers.
#[derive(Debug)]
pub struct StateBuffersMut<'a> {
    pub sample: HierarchyPoseMut<'a>,
    pub local: HierarchyPoseMut<'a>,
    pub object: HierarchyPoseMut<'a>,
}

impl HierarchyState {
    pub fn new(hierarchy: Arc<Hierarchy>) -> Self {
        let len = BUFFER_COUNT * hierarchy.node_count();
        Self {
            storage: vec![SpatialPose::identity(); len],
            hierarchy,
        }
    }

    #[inline]
    pub fn hierarchy(&self) -> &Arc<Hierarchy> {
        &self.hierarchy
    }

    #[inline]
    pub fn node_count(&self) -> usize {
        self.hierarchy.node_count()
    }

    fn buffer(&self, slot: usize) -> HierarchyPose<'_> {
        let n = self.node_count();
        HierarchyPose::new(&self.storage[slot * n..(slot + 1) * n])
    }

    fn buffer_mut(&mut self, slot: usize) -> HierarchyPoseMut<'_> {
        let n = self.node_count();
        HierarchyPoseMut::new(&mut self.storage[slot * n..(slot + 1) * n])
    }

    pub fn sample_pose(&self) -> HierarchyPose<'_> {
        self.buffer(SAMPLE)
    }

    pub fn local_space_pose(&self) -> HierarchyPose<'_> {
        self.buffer(LOCAL)
    }

    pub fn object_space_pose(&self) -> HierarchyPose<'_> {
        self.buffer(OBJECT)
    }

    pub fn sample_pose_mut(&mut self) -> HierarchyPoseMut<'_> {
        self.buffer_mut(SAMPLE)
    }

    pub fn local_space_pose_mut(&mut self) -> HierarchyPoseMut<'_> {
        self.buffer_mut(LOCAL)
    }

    pub fn object_space_pose_mut(&mut self) -> HierarchyPoseMut<'_> {
        self.buffer_mut(OBJECT)
    }

    pub fn split_mut(&mut self) -> StateBuffersMut<'_> {
        let n = self.node_count();
        let (sample, rest) = self.storage.split_at_mut(n);
        let (local, object) = rest.split_at_mut(n);
        StateBuffersMut {
            sample: HierarchyPoseMut::new(sample),
            local: HierarchyPoseMut::new(local),
            object: HierarchyPoseMut::new(object),
        }
    }

    /// Copy the sample pose into the local-space pose.
    pub fn commit_sample(&mut self) {
        let buffers = self.split_mut();
        let mut local = buffers.local;
        local.copy_from(buffers.sample.as_pose());
    }

    /// Rebuild the object-space pose by concatenating local poses from each root down.
    pub fn update_object_space(&mut self) {
        let hierarchy = Arc::clone(&self.hierarchy);
        let StateBuffersMut { local, mut object, .. } = self.split_mut();
        for (i, node) in hierarchy.nodes().iter().enumerate() {
            let pose = match node.parent {
                Some(p) => object[p].concat(&local[i]),
                None => local[i],
            };
            if let Some(slot) = object.get_mut(i) {
                *slot = pose;
            }
        }
    }
}
