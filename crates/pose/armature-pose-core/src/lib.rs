//! armature-pose-core: decomposed spatial poses and hierarchy-wide pose buffers.
//!
//! A [`SpatialPose`] stores one joint's local transform as Euler angles (degrees),
//! per-axis scale and translation. Poses compose with `concat` (angles and translation
//! add, scale multiplies) and blend with the operator family in [`spatial`].
//!
//! A [`Hierarchy`] is the finalized skeleton. [`PoseGroup`] owns one contiguous pool of
//! `pose_count * node_count` spatial poses and hands out [`HierarchyPose`] views into it;
//! [`HierarchyState`] owns the sample, local-space and object-space working buffers of a
//! single skeleton instance. Hierarchy-level operators broadcast the spatial operators
//! node by node into a [`HierarchyPoseMut`].

pub mod channel;
pub mod error;
pub mod hierarchy;
pub mod hierarchy_pose;
pub mod interp;
pub mod pose_group;
pub mod spatial;
pub mod state;

pub use channel::{EulerOrder, PoseChannels};
pub use error::PoseError;
pub use hierarchy::{Hierarchy, HierarchyNode};
pub use hierarchy_pose::{HierarchyPose, HierarchyPoseMut};
pub use pose_group::PoseGroup;
pub use spatial::{Mat4, SpatialPose, Vec3};
pub use state::{HierarchyState, StateBuffersMut};
