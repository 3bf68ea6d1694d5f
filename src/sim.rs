use crate::model::{Character, PetState, STAT_MAX, STAT_MIN};

// Below this much health the pet is gone.
pub(crate) const DEATH_BELOW: f32 = 1.0;

// Trigger/release bands for the sticky conditions. Release sits well above
// trigger so a meter hovering at the boundary cannot flap the state.
const SLEEP_ENTER_BELOW: f32 = 1.0;
const SLEEP_EXIT_ABOVE: f32 = 97.5;
const ANGER_ENTER_BELOW: f32 = 1.0;
const ANGER_EXIT_ABOVE: f32 = 45.0;
const HUNGER_ENTER_BELOW: f32 = 1.0;
const HUNGER_EXIT_ABOVE: f32 = 30.0;

const SLEEP_COLLAPSE_HEALTH_HIT: f32 = 10.0;
const SLEEP_COLLAPSE_SCORE_HIT: u32 = 100;
const ANGER_SCORE_HIT: u32 = 50;
const HUNGER_SCORE_HIT: u32 = 50;

// Sleep refills at this multiple of its decay rate while the pet is out.
const SLEEP_RECOVERY_FACTOR: f32 = 5.0;

impl Character {
    /// One fixed-step decay pass. Happiness and fullness drain at the
    /// archetype's rates; sleep drains while awake and refills while
    /// sleeping; health only drains while the pet is starving, twice as fast
    /// if it is starving and furious at once. Stress always ends up as the
    /// average of the other four meters, whatever the flat drain did to it
    /// in between.
    pub fn tick_stats(&mut self, dt: f32) {
        let decay = &self.archetype.profile().decay;
        let s = &mut self.stats;

        s.happiness = (s.happiness - decay.happiness * dt).clamp(STAT_MIN, STAT_MAX);
        s.fullness = (s.fullness - decay.fullness * dt).clamp(STAT_MIN, STAT_MAX);
        s.stress = (s.stress - dt).clamp(STAT_MIN, STAT_MAX);

        if self.flags.sleep_locked {
            s.sleep =
                (s.sleep + SLEEP_RECOVERY_FACTOR * decay.sleep * dt).clamp(STAT_MIN, STAT_MAX);
        } else {
            s.sleep = (s.sleep - decay.sleep * dt).clamp(STAT_MIN, STAT_MAX);
        }

        if self.flags.hunger_locked {
            let rate = if self.flags.anger_locked {
                decay.health * 2.0
            } else {
                decay.health
            };
            s.health = (s.health - rate * dt).clamp(STAT_MIN, STAT_MAX);
        }

        s.refresh_stress();
    }

    /// Re-derive the behavioral state. Death is checked first and is
    /// terminal: all meters drop to zero and the condition flags clear, so
    /// every later evaluation lands back on Dead. Otherwise each sticky
    /// condition is tested independently against its trigger/release band,
    /// applying the one-shot penalties on trigger.
    pub fn evaluate(&mut self) -> PetState {
        if self.stats.health < DEATH_BELOW {
            self.stats.health = 0.0;
            self.stats.sleep = 0.0;
            self.stats.happiness = 0.0;
            self.stats.fullness = 0.0;
            self.flags.sleep_locked = false;
            self.flags.anger_locked = false;
            self.flags.hunger_locked = false;
            self.stats.refresh_stress();
            return PetState::Dead;
        }

        if self.flags.sleep_locked {
            if self.stats.sleep > SLEEP_EXIT_ABOVE {
                self.flags.sleep_locked = false;
            }
        } else if self.stats.sleep < SLEEP_ENTER_BELOW {
            self.flags.sleep_locked = true;
            self.stats.health =
                (self.stats.health - SLEEP_COLLAPSE_HEALTH_HIT).clamp(STAT_MIN, STAT_MAX);
            self.score = self.score.saturating_sub(SLEEP_COLLAPSE_SCORE_HIT);
        }

        if self.flags.anger_locked {
            if self.stats.happiness > ANGER_EXIT_ABOVE {
                self.flags.anger_locked = false;
            }
        } else if self.stats.happiness < ANGER_ENTER_BELOW {
            self.flags.anger_locked = true;
            self.score = self.score.saturating_sub(ANGER_SCORE_HIT);
        }

        if self.flags.hunger_locked {
            if self.stats.fullness > HUNGER_EXIT_ABOVE {
                self.flags.hunger_locked = false;
            }
        } else if self.stats.fullness < HUNGER_ENTER_BELOW {
            self.flags.hunger_locked = true;
            self.score = self.score.saturating_sub(HUNGER_SCORE_HIT);
        }

        self.stats.refresh_stress();
        self.state()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Archetype;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn relaxed_unit_tick_matches_hand_computation() {
        let mut c = Character::new("Mochi", Archetype::Relaxed, 0);
        c.tick_stats(1.0);
        assert!(close(c.stats.happiness, 79.0));
        assert!(close(c.stats.fullness, 79.0));
        assert!(close(c.stats.sleep, 79.0));
        assert!(close(c.stats.health, 80.0));
        assert!(close(c.stats.stress, 79.25));
    }

    #[test]
    fn health_only_drains_while_starving() {
        let mut c = Character::new("Mochi", Archetype::Relaxed, 0);
        c.flags.hunger_locked = true;
        c.tick_stats(1.0);
        assert!(close(c.stats.health, 79.0));
    }

    #[test]
    fn hangry_double_drain_needs_both_flags_set_before_the_tick() {
        // Starving and furious at once: double rate.
        let mut c = Character::new("Mochi", Archetype::Relaxed, 0);
        c.flags.hunger_locked = true;
        c.flags.anger_locked = true;
        c.tick_stats(1.0);
        assert!(close(c.stats.health, 78.0));

        // The tick that merely pushes happiness to the trigger point drains
        // at the single rate; the flag only exists after evaluation.
        let mut c = Character::new("Rex", Archetype::Brave, 0);
        c.flags.hunger_locked = true;
        c.stats.fullness = 10.0;
        c.stats.happiness = 0.5;
        c.tick_stats(1.0);
        assert!(close(c.stats.health, 8.0));
        c.evaluate();
        assert!(c.flags.anger_locked);
        c.tick_stats(1.0);
        assert!(close(c.stats.health, 4.0));
    }

    #[test]
    fn sleep_refills_while_sleeping() {
        let mut c = Character::new("Mochi", Archetype::Relaxed, 0);
        c.stats.sleep = 50.0;
        c.flags.sleep_locked = true;
        c.tick_stats(2.0);
        assert!(close(c.stats.sleep, 60.0));
    }

    #[test]
    fn stress_tracks_average_after_every_evaluation() {
        let mut c = Character::new("Mochi", Archetype::Relaxed, 0);
        for _ in 0..50 {
            c.tick_stats(1.0);
            c.evaluate();
            assert!(close(c.stats.stress, c.stats.average()));
        }
    }

    #[test]
    fn stats_stay_bounded_under_heavy_decay() {
        let mut c = Character::new("Rex", Archetype::Brave, 0);
        c.flags.hunger_locked = true;
        c.flags.anger_locked = true;
        for _ in 0..500 {
            c.tick_stats(1.0);
            for v in [
                c.stats.health,
                c.stats.sleep,
                c.stats.happiness,
                c.stats.fullness,
                c.stats.stress,
            ] {
                assert!((0.0..=100.0).contains(&v));
            }
        }
    }

    #[test]
    fn sleep_collapse_applies_penalties_once() {
        let mut c = Character::new("Mochi", Archetype::Relaxed, 0);
        c.score = 300;
        c.stats.sleep = 0.0;
        assert_eq!(c.evaluate(), PetState::Sleeping);
        assert!(close(c.stats.health, 70.0));
        assert_eq!(c.score, 200);

        // Still locked on the next evaluation, but no second penalty.
        c.evaluate();
        assert!(close(c.stats.health, 70.0));
        assert_eq!(c.score, 200);
    }

    #[test]
    fn hysteresis_release_thresholds() {
        let mut c = Character::new("Mochi", Archetype::Relaxed, 0);
        c.stats.sleep = 0.0;
        c.evaluate();
        assert!(c.flags.sleep_locked);
        c.stats.sleep = 50.0;
        c.evaluate();
        assert!(c.flags.sleep_locked, "sleep must hold until above 97.5");
        c.stats.sleep = 98.0;
        c.evaluate();
        assert!(!c.flags.sleep_locked);

        c.stats.happiness = 0.0;
        c.evaluate();
        assert!(c.flags.anger_locked);
        c.stats.happiness = 45.0;
        c.evaluate();
        assert!(c.flags.anger_locked, "anger must hold until above 45");
        c.stats.happiness = 45.5;
        c.evaluate();
        assert!(!c.flags.anger_locked);

        c.stats.fullness = 0.0;
        c.evaluate();
        assert!(c.flags.hunger_locked);
        c.stats.fullness = 30.0;
        c.evaluate();
        assert!(c.flags.hunger_locked, "hunger must hold until above 30");
        c.stats.fullness = 30.5;
        c.evaluate();
        assert!(!c.flags.hunger_locked);
    }

    #[test]
    fn anger_and_hunger_entry_cost_fifty_each() {
        let mut c = Character::new("Mochi", Archetype::Relaxed, 0);
        c.score = 60;
        c.stats.happiness = 0.0;
        c.evaluate();
        assert_eq!(c.score, 10);
        c.stats.fullness = 0.0;
        c.evaluate();
        // Floored at zero, never negative.
        assert_eq!(c.score, 0);
    }

    #[test]
    fn death_zeroes_everything_and_sticks() {
        let mut c = Character::new("Mochi", Archetype::Relaxed, 0);
        c.flags.sleep_locked = true;
        c.stats.health = 0.5;
        assert_eq!(c.evaluate(), PetState::Dead);
        assert_eq!(c.stats.health, 0.0);
        assert_eq!(c.stats.sleep, 0.0);
        assert_eq!(c.stats.happiness, 0.0);
        assert_eq!(c.stats.fullness, 0.0);
        assert_eq!(c.stats.stress, 0.0);
        assert_eq!(c.flags, crate::model::Flags::default());

        // Ticking a dead pet changes nothing and it stays dead.
        c.tick_stats(10.0);
        assert_eq!(c.evaluate(), PetState::Dead);
        assert_eq!(c.stats.health, 0.0);
    }

    #[test]
    fn sleeping_wins_over_anger_and_hunger() {
        let mut c = Character::new("Mochi", Archetype::Relaxed, 0);
        c.stats.sleep = 0.0;
        c.stats.happiness = 0.0;
        c.stats.fullness = 0.0;
        assert_eq!(c.evaluate(), PetState::Sleeping);
        assert!(c.flags.anger_locked && c.flags.hunger_locked);
    }
}
