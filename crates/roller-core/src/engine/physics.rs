//! Per-frame integrator.
//!
//! Drag, momentum and elastic bounce all move `target`; a single easing pass
//! moves the displayed `position` toward it and detects arrival.

use std::sync::Arc;

use tracing::{trace, warn};

use super::Roller;
use crate::config::RollerConfig;
use crate::events::RollerEvent;

impl Roller {
    /// Advance the simulation by one frame. No-op while disabled.
    pub fn tick(&mut self) {
        if !self.motion.enabled {
            return;
        }

        let config = Arc::clone(&self.config);
        self.motion.previous_position = self.motion.position;

        if !self.motion.dragging {
            self.integrate_momentum(&config);
            self.apply_bounds(&config);
        }

        if self.ease_position(&config) {
            trace!(
                position = self.motion.position,
                target = self.motion.target,
                momentum = self.motion.momentum,
                "Roller moved"
            );
            self.emit(RollerEvent::Update {
                position: self.motion.position,
            });
        }
    }

    fn integrate_momentum(&mut self, config: &RollerConfig) {
        let motion = &mut self.motion;
        motion.target += motion.momentum;
        motion.momentum *= config.friction;
        if motion.momentum.abs() < config.epsilon {
            motion.momentum = 0.0;
        }
    }

    /// Elastic bounce: ease the target back toward the violated bound
    fn apply_bounds(&mut self, config: &RollerConfig) {
        let bounds = self.bounds();
        let motion = &mut self.motion;

        if bounds.is_inverted() {
            warn!(
                upper = bounds.upper,
                lower = bounds.lower,
                "Lower bound is greater than upper bound, skipping bounds"
            );
        } else if motion.target > bounds.upper {
            motion.momentum *= config.page_snap_friction;
            if motion.target - bounds.upper < config.epsilon {
                motion.target = bounds.upper;
            } else {
                motion.target += (bounds.upper - motion.target) / config.page_bounce_ease;
            }
        } else if motion.target < bounds.lower {
            motion.momentum *= config.page_snap_friction;
            if bounds.lower - motion.target < config.epsilon {
                motion.target = bounds.lower;
            } else {
                motion.target += (bounds.lower - motion.target) / config.page_bounce_ease;
            }
        }
    }

    /// Move the displayed position toward the target.
    ///
    /// Returns false when nothing changed. Fires the pending completion on
    /// arrival; the slot is emptied before the call so the callback may
    /// navigate again.
    fn ease_position(&mut self, config: &RollerConfig) -> bool {
        let delta = self.motion.target - self.motion.position;

        if delta == 0.0 {
            // already at the snap point, nothing moved
            self.arrive();
            return false;
        }

        if delta.abs() < config.epsilon {
            self.motion.position = self.motion.target;
            self.arrive();
        } else {
            let ease = if self.motion.dragging {
                config.drag_ease
            } else {
                config.page_snap_ease
            };
            self.motion.position += delta / ease;
        }

        true
    }

    fn arrive(&mut self) {
        if let Some(callback) = self.pending.take() {
            trace!(position = self.motion.position, "Roller arrived");
            callback(self);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::*;
    use crate::config::RollerConfig;
    use crate::events::RollerEvent;

    #[test]
    fn test_tick_is_noop_while_disabled() {
        let (mut roller, _frames) = roller(wide_bounds());
        roller.motion.target = 10.0;
        let events = record(&mut roller);

        roller.tick();

        assert_eq!(roller.position(), 0.0);
        assert!(events.borrow().is_empty());
    }

    #[test]
    fn test_no_update_when_at_target() {
        let (mut roller, _frames) = roller(wide_bounds());
        roller.enable();
        let events = record(&mut roller);

        roller.tick();
        roller.tick();

        assert!(events.borrow().is_empty());
        assert!(roller.is_settled());
    }

    #[test]
    fn test_eases_with_snap_divisor_when_released() {
        let (mut roller, _frames) = roller(wide_bounds());
        roller.enable();
        roller.motion.target = 100.0;
        let events = record(&mut roller);

        roller.tick();

        assert!((roller.position() - 20.0).abs() < 1e-9);
        assert_eq!(roller.motion().previous_position, 0.0);
        assert_eq!(*events.borrow(), vec![RollerEvent::Update { position: roller.position() }]);
    }

    #[test]
    fn test_snaps_within_epsilon() {
        let (mut roller, _frames) = roller(wide_bounds());
        roller.enable();
        roller.motion.target = 0.05;
        let events = record(&mut roller);

        roller.tick();

        assert_eq!(roller.position(), 0.05);
        assert_eq!(events.borrow().len(), 1);
    }

    #[test]
    fn test_momentum_decays_to_zero() {
        let (mut roller, _frames) = roller(wide_bounds());
        roller.enable();
        roller.motion.momentum = 50.0;

        let mut ticks = 0;
        while roller.momentum() != 0.0 {
            let before = roller.momentum().abs();
            roller.tick();
            assert!(roller.momentum().abs() < before, "momentum grew at tick {ticks}");
            ticks += 1;
            assert!(ticks < 200, "momentum never settled");
        }

        assert_eq!(roller.momentum(), 0.0);
        // 50 * 0.95^n drops under epsilon after 122 ticks
        assert_eq!(ticks, 122);
        assert!(roller.target() > 900.0);
    }

    #[test]
    fn test_negative_momentum_decays_too() {
        let (mut roller, _frames) = roller(wide_bounds());
        roller.enable();
        roller.motion.momentum = -3.0;

        for _ in 0..200 {
            roller.tick();
        }

        assert_eq!(roller.momentum(), 0.0);
        assert!(roller.target() < 0.0);
    }

    #[test]
    fn test_bounces_back_to_upper_bound_without_overshoot() {
        let (mut roller, _frames) = roller(RollerConfig {
            upper_bound: 100.0,
            lower_bound: 0.0,
            ..Default::default()
        });
        roller.enable();

        roller.drag_start();
        roller.drag_move(0.0, 200.0);
        roller.tick();
        roller.tick();
        roller.drag_end();
        assert!(roller.target() > 100.0);
        assert_eq!(roller.momentum(), 0.0);

        let mut last = roller.target();
        for _ in 0..300 {
            roller.tick();
            let target = roller.target();
            assert!(target <= last, "target moved away from the bound");
            assert!(target >= 100.0, "target overshot the bound");
            last = target;
        }

        assert_eq!(roller.target(), 100.0);
        assert_eq!(roller.position(), 100.0);
    }

    #[test]
    fn test_bounces_back_to_lower_bound() {
        let (mut roller, _frames) = roller(RollerConfig {
            upper_bound: 0.0,
            lower_bound: -300.0,
            ..Default::default()
        });
        roller.enable();
        roller.motion.target = -350.0;
        roller.motion.momentum = -10.0;

        roller.tick();
        // momentum integrated, decayed by friction then by snap friction
        assert!((roller.momentum() - (-10.0 * 0.95 * 0.9)).abs() < 1e-9);
        assert!(roller.target() > -360.0);

        for _ in 0..300 {
            roller.tick();
            assert!(roller.target() <= -300.0);
        }
        assert_eq!(roller.target(), -300.0);
    }

    #[test]
    fn test_inverted_bounds_skip_bounce() {
        let (mut roller, _frames) = roller(RollerConfig {
            upper_bound: -10.0,
            lower_bound: 10.0,
            ..Default::default()
        });
        roller.enable();
        roller.motion.target = 50.0;

        for _ in 0..100 {
            roller.tick();
        }

        assert_eq!(roller.target(), 50.0);
        assert_eq!(roller.position(), 50.0);
    }

    #[test]
    fn test_bounds_ignored_while_dragging() {
        let (mut roller, _frames) = roller(RollerConfig {
            upper_bound: 100.0,
            lower_bound: 0.0,
            ..Default::default()
        });
        roller.enable();
        roller.drag_start();
        roller.drag_move(0.0, 300.0);
        let target = roller.target();

        for _ in 0..10 {
            roller.tick();
        }

        assert_eq!(roller.target(), target);
        assert_eq!(roller.position(), target);
    }
}
