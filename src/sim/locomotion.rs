//! Segment chains and the shared locomotion model
//!
//! Both the player and the bots move the same way: the head's target is pushed
//! forward along the heading every tick, and every segment eases toward its
//! target. Body segments retarget to a point `SEGMENT_SPACING` behind their
//! predecessor whenever they fall further behind than that.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{SEGMENT_SPACING, SMOOTHING};
use crate::{heading_toward, polar_offset};

/// One link of a chain
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    /// Interpolated (rendered) position
    pub pos: Vec2,
    /// Most recently commanded destination
    pub target: Vec2,
    /// Facing direction (radians)
    pub angle: f32,
}

impl Segment {
    /// A segment at rest at `pos`
    pub fn at(pos: Vec2, angle: f32) -> Self {
        Self {
            pos,
            target: pos,
            angle,
        }
    }

    #[inline]
    fn ease(&mut self) {
        self.pos += (self.target - self.pos) * SMOOTHING;
    }
}

/// Ordered segments, head first. Never empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SegmentChain {
    segments: Vec<Segment>,
}

impl SegmentChain {
    /// Lay out `length` segments in a straight line behind `head`, opposite to `heading`
    pub fn straight(head: Vec2, heading: f32, length: usize) -> Self {
        let length = length.max(1);
        let back = polar_offset(SEGMENT_SPACING, heading);
        let segments = (0..length)
            .map(|i| Segment::at(head - back * i as f32, heading))
            .collect();
        Self { segments }
    }

    pub fn head(&self) -> &Segment {
        &self.segments[0]
    }

    pub fn tail(&self) -> &Segment {
        &self.segments[self.segments.len() - 1]
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Always false; a chain keeps at least its head
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Append `count` segments cloned from the current tail.
    /// They unfold as the tail moves away on later ticks.
    pub fn grow(&mut self, count: usize) {
        let tail = *self.tail();
        let tail = Segment::at(tail.pos, tail.angle);
        self.segments.extend(std::iter::repeat_n(tail, count));
    }

    /// Advance the chain one tick with the head facing `heading`.
    ///
    /// The head always advances `speed` units of target displacement, even when
    /// the heading did not change.
    pub fn advance(&mut self, heading: f32, speed: f32) {
        let head = &mut self.segments[0];
        head.target += polar_offset(speed, heading);
        head.angle = heading;
        head.ease();

        for i in 1..self.segments.len() {
            let leader = self.segments[i - 1].pos;
            let follower = &mut self.segments[i];
            if follower.pos.distance(leader) > SEGMENT_SPACING {
                if let Some(angle) = heading_toward(follower.pos, leader) {
                    follower.target = leader - polar_offset(SEGMENT_SPACING, angle);
                    follower.angle = angle;
                }
            }
            follower.ease();
        }
    }

    #[cfg(test)]
    pub(crate) fn segments_mut(&mut self) -> &mut Vec<Segment> {
        &mut self.segments
    }
}

/// Upper bound on the distance between adjacent segments of a chain moving at `speed`.
///
/// Each link's excess over the spacing shrinks by `1 - SMOOTHING` per tick while its
/// leader moves at most `speed`, so the excess settles below `speed * (1 - s) / s`.
pub fn max_link_length(speed: f32) -> f32 {
    SEGMENT_SPACING + speed * (1.0 - SMOOTHING) / SMOOTHING
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn straight_chain_spacing() {
        let chain = SegmentChain::straight(Vec2::new(1000.0, 1000.0), 0.0, 10);
        assert_eq!(chain.len(), 10);
        assert_eq!(chain.head().pos, Vec2::new(1000.0, 1000.0));
        assert!((chain.tail().pos.x - 955.0).abs() < 1e-4);
        for pair in chain.segments().windows(2) {
            assert!((pair[0].pos.distance(pair[1].pos) - SEGMENT_SPACING).abs() < 1e-4);
        }
    }

    #[test]
    fn zero_length_request_keeps_head() {
        let chain = SegmentChain::straight(Vec2::ZERO, 0.0, 0);
        assert_eq!(chain.len(), 1);
        assert!(!chain.is_empty());
    }

    #[test]
    fn head_advances_without_new_input() {
        let mut chain = SegmentChain::straight(Vec2::new(500.0, 500.0), 0.0, 3);
        chain.advance(0.0, 3.0);
        // Target moves the full speed, position eases 20% of the way
        assert!((chain.head().target.x - 503.0).abs() < 1e-4);
        assert!((chain.head().pos.x - 500.6).abs() < 1e-4);
        assert!((chain.head().pos.y - 500.0).abs() < 1e-4);
    }

    #[test]
    fn follower_retargets_behind_leader() {
        let mut chain = SegmentChain::straight(Vec2::ZERO, 0.0, 2);
        chain.segments_mut()[1] = Segment::at(Vec2::new(-20.0, 0.0), 0.0);
        chain.advance(0.0, 0.0);
        let follower = chain.segments()[1];
        assert!((follower.target.x + 5.0).abs() < 1e-4);
        assert!((follower.pos.x - (-20.0 + 15.0 * 0.2)).abs() < 1e-4);
        assert!(follower.angle.abs() < 1e-6);
    }

    #[test]
    fn grow_clones_tail() {
        let mut chain = SegmentChain::straight(Vec2::new(100.0, 100.0), 0.0, 10);
        let tail = *chain.tail();
        chain.grow(5);
        assert_eq!(chain.len(), 15);
        for seg in &chain.segments()[10..] {
            assert_eq!(seg.pos, tail.pos);
            assert_eq!(seg.target, tail.pos);
            assert_eq!(seg.angle, tail.angle);
        }
    }

    proptest! {
        #[test]
        fn links_stay_bounded(
            headings in prop::collection::vec(-10.0f32..10.0, 1..300),
            speed in 0.5f32..4.0,
            growth_at in 0usize..300,
        ) {
            let mut chain = SegmentChain::straight(Vec2::new(1000.0, 1000.0), 0.0, 10);
            for (i, heading) in headings.iter().enumerate() {
                if i == growth_at {
                    chain.grow(5);
                }
                chain.advance(*heading, speed);
                for pair in chain.segments().windows(2) {
                    prop_assert!(pair[0].pos.distance(pair[1].pos) <= max_link_length(speed) + 1e-2);
                }
            }
        }
    }
}
