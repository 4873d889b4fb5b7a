//! Speed target smoothing.
//!
//! A large jump in the desired speed (for example sprint -> crouch) starts a
//! linear interpolation of the applied speed at one unit per second. Small
//! jumps snap. Each interpolation carries the generation it was started in;
//! bumping the generation invalidates whatever is in flight, so there is
//! never more than one interpolation driving `current`.

#[derive(Debug, Clone, Copy, PartialEq)]
struct SpeedLerp {
    generation: u64,
    start: f32,
    target: f32,
    duration: f32,
    elapsed: f32,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SpeedTarget {
    desired: f32,
    previous_desired: f32,
    current: f32,
    generation: u64,
    lerp: Option<SpeedLerp>,
}

impl SpeedTarget {
    /// The state-dependent target speed.
    #[must_use]
    pub fn desired(&self) -> f32 {
        self.desired
    }

    /// The smoothed speed actually applied to the body.
    #[must_use]
    pub fn current(&self) -> f32 {
        self.current
    }

    /// Generation of the most recently started (or cancelled) interpolation.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub fn is_interpolating(&self) -> bool {
        self.lerp.is_some_and(|l| l.generation == self.generation)
    }

    /// Feed this frame's desired speed.
    ///
    /// If it differs from last frame's by more than `threshold` and the body
    /// is already moving, a fresh interpolation replaces any in-flight one.
    /// Otherwise an in-flight interpolation toward the same target keeps
    /// ownership of `current`; anything else snaps `current` to `desired`.
    pub fn retarget(&mut self, desired: f32, threshold: f32) {
        self.desired = desired;

        if (desired - self.previous_desired).abs() > threshold && self.current != 0.0 {
            self.start_lerp();
        } else if let Some(lerp) = self.lerp
            && lerp.generation == self.generation
            && lerp.target == desired
        {
            // still converging toward the same target
        } else {
            self.lerp = None;
            self.current = desired;
        }

        self.previous_desired = desired;
    }

    /// Advance the in-flight interpolation by `dt` seconds.
    pub fn tick(&mut self, dt: f32) {
        let Some(mut lerp) = self.lerp else { return };

        if lerp.generation != self.generation {
            self.lerp = None;
            return;
        }

        lerp.elapsed += dt;
        if lerp.elapsed >= lerp.duration {
            self.current = lerp.target;
            self.lerp = None;
        } else {
            let t = lerp.elapsed / lerp.duration;
            self.current = lerp.start + (lerp.target - lerp.start) * t;
            self.lerp = Some(lerp);
        }
    }

    /// Invalidate any in-flight interpolation, leaving `current` where it is.
    pub fn cancel(&mut self) {
        self.generation = self.generation.wrapping_add(1);
    }

    fn start_lerp(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        let duration = (self.desired - self.current).abs();
        if duration <= f32::EPSILON {
            self.current = self.desired;
            self.lerp = None;
            return;
        }
        self.lerp = Some(SpeedLerp {
            generation: self.generation,
            start: self.current,
            target: self.desired,
            duration,
            elapsed: 0.0,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const THRESHOLD: f32 = 4.0;
    const DT: f32 = 1.0 / 60.0;

    fn settled_at(speed: f32) -> SpeedTarget {
        let mut s = SpeedTarget::default();
        s.retarget(speed, THRESHOLD);
        s
    }

    #[test]
    fn first_target_snaps_from_rest() {
        let s = settled_at(7.0);
        assert_eq!(s.current(), 7.0);
        assert!(!s.is_interpolating());
    }

    #[test]
    fn small_jump_snaps() {
        let mut s = settled_at(7.0);
        s.retarget(10.0, THRESHOLD);
        assert_eq!(s.current(), 10.0);
        assert!(!s.is_interpolating());
    }

    #[test]
    fn large_jump_interpolates_monotonically_and_lands_exactly() {
        let mut s = settled_at(3.5);
        s.retarget(10.0, THRESHOLD);
        assert!(s.is_interpolating());
        assert_eq!(s.current(), 3.5);

        let mut last = s.current();
        let mut elapsed = 0.0;
        while s.is_interpolating() {
            s.tick(DT);
            s.retarget(10.0, THRESHOLD);
            elapsed += DT;
            assert!(s.current() >= last, "speed went backwards");
            assert!(s.current() <= 10.0, "speed overshot");
            last = s.current();
        }
        assert_eq!(s.current(), 10.0);
        assert!(elapsed <= 6.5 + 2.0 * DT);
    }

    #[test]
    fn restart_mid_interpolation_does_not_overshoot_new_target() {
        let mut s = settled_at(3.5);
        s.retarget(10.0, THRESHOLD);
        for _ in 0..120 {
            s.tick(DT);
            s.retarget(10.0, THRESHOLD);
        }
        let mid = s.current();
        assert!(mid > 3.5 && mid < 10.0);
        let first_generation = s.generation();

        s.retarget(3.5, THRESHOLD);
        assert!(s.generation() > first_generation);
        assert_eq!(s.current(), mid);

        let mut last = s.current();
        while s.is_interpolating() {
            s.tick(DT);
            s.retarget(3.5, THRESHOLD);
            assert!(s.current() <= last);
            assert!(s.current() >= 3.5);
            last = s.current();
        }
        assert_eq!(s.current(), 3.5);
    }

    #[test]
    fn cancel_freezes_current() {
        let mut s = settled_at(3.5);
        s.retarget(10.0, THRESHOLD);
        s.tick(1.0);
        let frozen = s.current();
        s.cancel();
        s.tick(1.0);
        assert_eq!(s.current(), frozen);
        assert!(!s.is_interpolating());
    }

    #[test]
    fn small_retarget_during_interpolation_snaps() {
        let mut s = settled_at(3.5);
        s.retarget(10.0, THRESHOLD);
        s.tick(1.0);
        s.retarget(7.0, THRESHOLD);
        assert_eq!(s.current(), 7.0);
        assert!(!s.is_interpolating());
    }
}
