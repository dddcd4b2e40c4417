//! Identifiers and a simple allocator for library-owned pools.

use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct KeyframePoolId(pub u32);

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct ClipPoolId(pub u32);

/// Monotonic allocator for KeyframePoolId and ClipPoolId.
/// Ids are dense indices into the owning library's pool lists.
#[derive(Default, Debug, Clone)]
pub struct IdAllocator {
    next_keyframe_pool: u32,
    next_clip_pool: u32,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn alloc_keyframe_pool(&mut self) -> KeyframePoolId {
        let id = KeyframePoolId(self.next_keyframe_pool);
        self.next_keyframe_pool = self.next_keyframe_pool.wrapping_add(1);
        id
    }

    #[inline]
    pub fn alloc_clip_pool(&mut self) -> ClipPoolId {
        let id = ClipPoolId(self.next_clip_pool);
        self.next_clip_pool = self.next_clip_pool.wrapping_add(1);
        id
    }
}
