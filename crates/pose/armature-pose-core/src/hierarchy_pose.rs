//! Hierarchy-wide pose views and broadcast operators.
//!
//! A hierarchy pose is a window of `node_count` spatial poses inside storage owned by a
//! [`PoseGroup`](crate::PoseGroup) or [`HierarchyState`](crate::HierarchyState). Read-only
//! views are `Copy`; mutable views write operator results node by node.
//!
//! Every operator applies the matching [`SpatialPose`] operator independently to each
//! node index. All arguments must have the output's node count; a mismatch panics.

use std::ops::Index;

use crate::channel::EulerOrder;
use crate::spatial::{SpatialPose, Vec3};

/// Read-only view of one pose per skeleton node.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HierarchyPose<'a> {
    poses: &'a [SpatialPose],
}

impl<'a> HierarchyPose<'a> {
    #[inline]
    pub fn new(poses: &'a [SpatialPose]) -> Self {
        Self { poses }
    }

    #[inline]
    pub fn node_count(&self) -> usize {
        self.poses.len()
    }

    #[inline]
    pub fn get(&self, node: usize) -> Option<&'a SpatialPose> {
        self.poses.get(node)
    }

    #[inline]
    pub fn as_slice(&self) -> &'a [SpatialPose] {
        self.poses
    }

    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'a, SpatialPose> {
        self.poses.iter()
    }
}

impl Index<usize> for HierarchyPose<'_> {
    type Output = SpatialPose;

    fn index(&self, node: usize) -> &SpatialPose {
        &self.poses[node]
    }
}

/// Mutable view used as the output of hierarchy operators.
#[derive(Debug)]
pub struct HierarchyPoseMut<'a> {
    poses: &'a mut [SpatialPose],
}

impl<'a> HierarchyPoseMut<'a> {
    #[inline]
    pub fn new(poses: &'a mut [SpatialPose]) -> Self {
        Self { poses }
    }

    #[inline]
    pub fn node_count(&self) -> usize {
        self.poses.len()
    }

    /// Reborrow as a read-only view.
    #[inline]
    pub fn as_pose(&self) -> HierarchyPose<'_> {
        HierarchyPose::new(self.poses)
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [SpatialPose] {
        &mut *self.poses
    }

    #[inline]
    pub fn get_mut(&mut self, node: usize) -> Option<&mut SpatialPose> {
        self.poses.get_mut(node)
    }

    fn check(&self, input: &HierarchyPose<'_>, op: &str) {
        assert_eq!(
            self.poses.len(),
            input.node_count(),
            "{op}: output has {} nodes but an input has {}",
            self.poses.len(),
            input.node_count()
        );
    }

    fn apply_in_place(&mut self, f: impl Fn(&SpatialPose) -> SpatialPose) -> &mut Self {
        for pose in self.poses.iter_mut() {
            *pose = f(pose);
        }
        self
    }

    fn apply1(
        &mut self,
        op: &str,
        a: HierarchyPose<'_>,
        f: impl Fn(&SpatialPose) -> SpatialPose,
    ) -> &mut Self {
        self.check(&a, op);
        for (out, a) in self.poses.iter_mut().zip(a.iter()) {
            *out = f(a);
        }
        self
    }

    fn apply2(
        &mut self,
        op: &str,
        a: HierarchyPose<'_>,
        b: HierarchyPose<'_>,
        f: impl Fn(&SpatialPose, &SpatialPose) -> SpatialPose,
    ) -> &mut Self {
        self.check(&a, op);
        self.check(&b, op);
        for (i, out) in self.poses.iter_mut().enumerate() {
            *out = f(&a[i], &b[i]);
        }
        self
    }

    fn apply_n<const N: usize>(
        &mut self,
        op: &str,
        inputs: [HierarchyPose<'_>; N],
        f: impl Fn([&SpatialPose; N]) -> SpatialPose,
    ) -> &mut Self {
        for input in &inputs {
            self.check(input, op);
        }
        for (i, out) in self.poses.iter_mut().enumerate() {
            *out = f(std::array::from_fn(|k| &inputs[k].poses[i]));
        }
        self
    }

    pub fn identity(&mut self) -> &mut Self {
        self.poses.fill(SpatialPose::identity());
        self
    }

    /// Every node receives the same constructed pose.
    pub fn construct(&mut self, rotation: Vec3, scale: Vec3, translation: Vec3) -> &mut Self {
        self.poses
            .fill(SpatialPose::construct(rotation, scale, translation));
        self
    }

    pub fn copy_from(&mut self, src: HierarchyPose<'_>) -> &mut Self {
        self.check(&src, "copy_from");
        self.poses.copy_from_slice(src.as_slice());
        self
    }

    pub fn invert(&mut self) -> &mut Self {
        self.apply_in_place(SpatialPose::invert)
    }

    pub fn invert_from(&mut self, src: HierarchyPose<'_>) -> &mut Self {
        self.apply1("invert_from", src, SpatialPose::invert)
    }

    pub fn concat(&mut self, lhs: HierarchyPose<'_>, rhs: HierarchyPose<'_>) -> &mut Self {
        self.apply2("concat", lhs, rhs, SpatialPose::concat)
    }

    /// `self = self concat rhs`.
    pub fn concat_assign(&mut self, rhs: HierarchyPose<'_>) -> &mut Self {
        self.check(&rhs, "concat_assign");
        for (out, r) in self.poses.iter_mut().zip(rhs.iter()) {
            *out = out.concat(r);
        }
        self
    }

    pub fn deconcat(&mut self, lhs: HierarchyPose<'_>, rhs: HierarchyPose<'_>) -> &mut Self {
        self.apply2("deconcat", lhs, rhs, SpatialPose::deconcat)
    }

    pub fn scale_by(&mut self, u: f32) -> &mut Self {
        self.apply_in_place(|p| p.scale_by(u))
    }

    pub fn descale(&mut self, u: f32) -> &mut Self {
        self.apply_in_place(|p| p.descale(u))
    }

    pub fn nearest(
        &mut self,
        pose0: HierarchyPose<'_>,
        pose1: HierarchyPose<'_>,
        u: f32,
    ) -> &mut Self {
        self.apply2("nearest", pose0, pose1, |a, b| SpatialPose::nearest(a, b, u))
    }

    pub fn lerp(
        &mut self,
        pose0: HierarchyPose<'_>,
        pose1: HierarchyPose<'_>,
        u: f32,
    ) -> &mut Self {
        self.apply2("lerp", pose0, pose1, |a, b| SpatialPose::lerp(a, b, u))
    }

    pub fn smoothstep(
        &mut self,
        pose0: HierarchyPose<'_>,
        pose1: HierarchyPose<'_>,
        u: f32,
    ) -> &mut Self {
        self.apply2("smoothstep", pose0, pose1, |a, b| {
            SpatialPose::smoothstep(a, b, u)
        })
    }

    pub fn cubic(
        &mut self,
        pose_n1: HierarchyPose<'_>,
        pose0: HierarchyPose<'_>,
        pose1: HierarchyPose<'_>,
        pose2: HierarchyPose<'_>,
        u: f32,
    ) -> &mut Self {
        self.apply_n("cubic", [pose_n1, pose0, pose1, pose2], |[pn1, p0, p1, p2]| {
            SpatialPose::cubic(pn1, p0, p1, p2, u)
        })
    }

    pub fn triangular(
        &mut self,
        pose0: HierarchyPose<'_>,
        pose1: HierarchyPose<'_>,
        pose2: HierarchyPose<'_>,
        u1: f32,
        u2: f32,
    ) -> &mut Self {
        self.apply_n("triangular", [pose0, pose1, pose2], |[p0, p1, p2]| {
            SpatialPose::triangular(p0, p1, p2, u1, u2)
        })
    }

    #[allow(clippy::too_many_arguments)]
    pub fn bi_nearest(
        &mut self,
        pose00: HierarchyPose<'_>,
        pose01: HierarchyPose<'_>,
        pose10: HierarchyPose<'_>,
        pose11: HierarchyPose<'_>,
        u0: f32,
        u1: f32,
        u: f32,
    ) -> &mut Self {
        self.apply_n(
            "bi_nearest",
            [pose00, pose01, pose10, pose11],
            |[p00, p01, p10, p11]| SpatialPose::bi_nearest(p00, p01, p10, p11, u0, u1, u),
        )
    }

    #[allow(clippy::too_many_arguments)]
    pub fn bi_linear(
        &mut self,
        pose00: HierarchyPose<'_>,
        pose01: HierarchyPose<'_>,
        pose10: HierarchyPose<'_>,
        pose11: HierarchyPose<'_>,
        u0: f32,
        u1: f32,
        u: f32,
    ) -> &mut Self {
        self.apply_n(
            "bi_linear",
            [pose00, pose01, pose10, pose11],
            |[p00, p01, p10, p11]| SpatialPose::bi_linear(p00, p01, p10, p11, u0, u1, u),
        )
    }

    /// Grid rows are ordered -1, 0, 1, 2; `row_params[r]` blends row `r`.
    pub fn bi_cubic(
        &mut self,
        grid: &[[HierarchyPose<'_>; 4]; 4],
        row_params: [f32; 4],
        u: f32,
    ) -> &mut Self {
        for input in grid.iter().flatten() {
            self.check(input, "bi_cubic");
        }
        for (i, out) in self.poses.iter_mut().enumerate() {
            let node_grid: [[SpatialPose; 4]; 4] =
                std::array::from_fn(|r| std::array::from_fn(|c| grid[r][c][i]));
            *out = SpatialPose::bi_cubic(&node_grid, row_params, u);
        }
        self
    }

    /// Refresh each node's cached matrix using that node's Euler order.
    pub fn refresh_transforms(&mut self, orders: &[EulerOrder]) -> &mut Self {
        assert_eq!(
            self.poses.len(),
            orders.len(),
            "refresh_transforms: {} nodes but {} euler orders",
            self.poses.len(),
            orders.len()
        );
        for (pose, order) in self.poses.iter_mut().zip(orders) {
            pose.refresh_transform(*order);
        }
        self
    }
}

impl Index<usize> for HierarchyPoseMut<'_> {
    type Output = SpatialPose;

    fn index(&self, node: usize) -> &SpatialPose {
        &self.poses[node]
    }
}
