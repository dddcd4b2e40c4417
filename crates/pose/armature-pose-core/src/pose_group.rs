//! Pooled storage for many hierarchy poses of one skeleton.

use std::ops::Range;
use std::sync::Arc;

use crate::channel::{EulerOrder, PoseChannels};
use crate::error::PoseError;
use crate::hierarchy::Hierarchy;
use crate::hierarchy_pose::{HierarchyPose, HierarchyPoseMut};
use crate::spatial::SpatialPose;

/// A set of `pose_count` hierarchy poses backed by a single allocation of
/// `pose_count * node_count` spatial poses.
///
/// Pose `i` always occupies `[i * node_count, (i + 1) * node_count)` of the pool.
/// Views borrow the group, so none can outlive it.
#[derive(Clone, Debug)]
pub struct PoseGroup {
    hierarchy: Arc<Hierarchy>,
    pose_count: usize,
    pool: Vec<SpatialPose>,
    channels: Vec<PoseChannels>,
    euler_orders: Vec<EulerOrder>,
}

impl PoseGroup {
    /// Allocate `pose_count` identity poses for `hierarchy`.
    pub fn new(hierarchy: Arc<Hierarchy>, pose_count: usize) -> Result<Self, PoseError> {
        if pose_count == 0 {
            return Err(PoseError::EmptyPoseGroup);
        }
        let node_count = hierarchy.node_count();
        Ok(Self {
            pool: vec![SpatialPose::identity(); pose_count * node_count],
            channels: vec![PoseChannels::default(); node_count],
            euler_orders: vec![EulerOrder::default(); node_count],
            pose_count,
            hierarchy,
        })
    }

    #[inline]
    pub fn hierarchy(&self) -> &Arc<Hierarchy> {
        &self.hierarchy
    }

    #[inline]
    pub fn node_count(&self) -> usize {
        self.hierarchy.node_count()
    }

    #[inline]
    pub fn pose_count(&self) -> usize {
        self.pose_count
    }

    /// The whole backing pool, pose-major.
    #[inline]
    pub fn pool(&self) -> &[SpatialPose] {
        &self.pool
    }

    /// Pool range addressed by pose `index`.
    #[inline]
    pub fn pose_range(&self, index: usize) -> Range<usize> {
        let n = self.node_count();
        index * n..(index + 1) * n
    }

    fn check_pose(&self, index: usize) -> Result<(), PoseError> {
        if index < self.pose_count {
            Ok(())
        } else {
            Err(PoseError::PoseOutOfRange {
                index,
                count: self.pose_count,
            })
        }
    }

    pub fn pose(&self, index: usize) -> Result<HierarchyPose<'_>, PoseError> {
        self.check_pose(index)?;
        Ok(HierarchyPose::new(&self.pool[self.pose_range(index)]))
    }

    pub fn pose_mut(&mut self, index: usize) -> Result<HierarchyPoseMut<'_>, PoseError> {
        self.check_pose(index)?;
        let range = self.pose_range(index);
        Ok(HierarchyPoseMut::new(&mut self.pool[range]))
    }

    pub fn poses(&self) -> impl Iterator<Item = HierarchyPose<'_>> + '_ {
        self.pool
            .chunks_exact(self.node_count())
            .map(HierarchyPose::new)
    }

    /// Disjoint mutable views over every pose.
    pub fn poses_mut(&mut self) -> impl Iterator<Item = HierarchyPoseMut<'_>> + '_ {
        let n = self.node_count();
        self.pool.chunks_exact_mut(n).map(HierarchyPoseMut::new)
    }

    /// Mutable view of pose `out` together with read-only views of every other pose,
    /// so one pose can be written from others in the same group. The entry for `out`
    /// in the returned list is `None`.
    pub fn split_pose_mut(
        &mut self,
        out: usize,
    ) -> Result<(HierarchyPoseMut<'_>, Vec<Option<HierarchyPose<'_>>>), PoseError> {
        self.check_pose(out)?;
        let n = self.node_count();
        let mut target = None;
        let mut others = Vec::with_capacity(self.pose_count);
        for (i, chunk) in self.pool.chunks_exact_mut(n).enumerate() {
            if i == out {
                target = Some(HierarchyPoseMut::new(chunk));
                others.push(None);
            } else {
                others.push(Some(HierarchyPose::new(chunk)));
            }
        }
        let target = target.ok_or(PoseError::PoseOutOfRange {
            index: out,
            count: self.pose_count,
        })?;
        Ok((target, others))
    }

    pub fn channels(&self, node: usize) -> Result<PoseChannels, PoseError> {
        self.channels
            .get(node)
            .copied()
            .ok_or(PoseError::NodeOutOfRange {
                index: node,
                count: self.channels.len(),
            })
    }

    pub fn set_channels(&mut self, node: usize, channels: PoseChannels) -> Result<(), PoseError> {
        let count = self.channels.len();
        let slot = self
            .channels
            .get_mut(node)
            .ok_or(PoseError::NodeOutOfRange { index: node, count })?;
        *slot = channels;
        Ok(())
    }

    pub fn euler_order(&self, node: usize) -> Result<EulerOrder, PoseError> {
        self.euler_orders
            .get(node)
            .copied()
            .ok_or(PoseError::NodeOutOfRange {
                index: node,
                count: self.euler_orders.len(),
            })
    }

    pub fn set_euler_order(&mut self, node: usize, order: EulerOrder) -> Result<(), PoseError> {
        let count = self.euler_orders.len();
        let slot = self
            .euler_orders
            .get_mut(node)
            .ok_or(PoseError::NodeOutOfRange { index: node, count })?;
        *slot = order;
        Ok(())
    }

    #[inline]
    pub fn euler_orders(&self) -> &[EulerOrder] {
        &self.euler_orders
    }
}
