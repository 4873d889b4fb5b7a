//! Jump gating: rising-edge trigger, grounded requirement and cooldown.
use bevy::prelude::*;

/// Tracks whether a jump may fire and when the cooldown ends.
///
/// `exiting_slope` is raised together with a jump and cleared by the same
/// cooldown; while it is set the slope-adhesion forces are suppressed so the
/// jump is not pulled back onto the slope.
#[derive(Debug, Clone)]
pub struct JumpGate {
    ready: bool,
    exiting_slope: bool,
    jump_was_held: bool,
    cooldown: Timer,
}

impl JumpGate {
    #[must_use]
    pub fn new(cooldown_secs: f32) -> Self {
        let mut cooldown = Timer::from_seconds(cooldown_secs, TimerMode::Once);
        // start finished so nothing is pending until the first jump
        cooldown.tick(cooldown.duration());
        Self {
            ready: true,
            exiting_slope: false,
            jump_was_held: false,
            cooldown,
        }
    }

    #[must_use]
    pub fn ready(&self) -> bool {
        self.ready
    }

    #[must_use]
    pub fn exiting_slope(&self) -> bool {
        self.exiting_slope
    }

    pub fn set_cooldown(&mut self, secs: f32) {
        self.cooldown.set_duration(std::time::Duration::from_secs_f32(secs));
    }

    /// Advance the cooldown. Restores `ready` and clears `exiting_slope`
    /// once it has run out.
    pub fn tick(&mut self, dt: f32) {
        if self.ready {
            return;
        }
        self.cooldown.tick(std::time::Duration::from_secs_f32(dt));
        if self.cooldown.finished() {
            self.ready = true;
            self.exiting_slope = false;
        }
    }

    /// Returns `true` when a jump should fire this frame: `jump_held` went
    /// from released to held, the gate is ready and the body is grounded.
    /// Firing arms the cooldown.
    pub fn try_jump(&mut self, jump_held: bool, grounded: bool) -> bool {
        let rising = jump_held && !self.jump_was_held;
        self.jump_was_held = jump_held;

        if !(rising && self.ready && grounded) {
            return false;
        }

        self.ready = false;
        self.exiting_slope = true;
        self.cooldown.reset();
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    #[test]
    fn fires_on_press_while_grounded() {
        let mut gate = JumpGate::new(0.25);
        assert!(gate.try_jump(true, true));
        assert!(!gate.ready());
        assert!(gate.exiting_slope());
    }

    #[test]
    fn needs_ground() {
        let mut gate = JumpGate::new(0.25);
        assert!(!gate.try_jump(true, false));
        assert!(gate.ready());
    }

    #[test]
    fn holding_does_not_repeat() {
        let mut gate = JumpGate::new(0.25);
        assert!(gate.try_jump(true, true));
        for _ in 0..120 {
            gate.tick(DT);
            assert!(!gate.try_jump(true, true));
        }
    }

    #[test]
    fn repeated_presses_fire_at_most_once_per_cooldown() {
        let cooldown = 0.25;
        let mut gate = JumpGate::new(cooldown);
        let mut fired_at = Vec::new();
        let mut t = 0.0f32;
        // toggle the button every frame: an edge every other frame
        for frame in 0..240 {
            gate.tick(DT);
            if gate.try_jump(frame % 2 == 0, true) {
                fired_at.push(t);
            }
            t += DT;
        }
        assert!(fired_at.len() > 1);
        for pair in fired_at.windows(2) {
            assert!(pair[1] - pair[0] >= cooldown - 1e-4);
        }
    }

    #[test]
    fn cooldown_clears_exiting_slope() {
        let mut gate = JumpGate::new(0.25);
        gate.try_jump(true, true);
        for _ in 0..20 {
            gate.tick(DT);
        }
        assert!(gate.ready());
        assert!(!gate.exiting_slope());
    }
}
