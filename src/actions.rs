use crate::item::ItemKind;
use crate::model::{AnimKind, PetState, STAT_MAX, STAT_MIN};
use crate::session::GameSession;
use crate::sim::DEATH_BELOW;

pub(crate) const AUTOSAVE_EVERY: f32 = 30.0;
const DOCTOR_COOLDOWN: f32 = 30.0;
const PLAY_COOLDOWN: f32 = 30.0;

const FEED_LOCK: f32 = 5.0;
const PLAY_LOCK: f32 = 5.0;
const EXERCISE_LOCK: f32 = 5.5;
const DOCTOR_LOCK: f32 = 8.0;
const GIFT_LOCK: f32 = 5.5;

const PLAY_HAPPINESS: f32 = 20.0;
const DOCTOR_HEAL: f32 = 20.0;
const EXERCISE_FULLNESS_COST: f32 = 10.0;
const EXERCISE_SLEEP_COST: f32 = 20.0;
const EXERCISE_SLEEP_COST_STARVING: f32 = 30.0;
const EXERCISE_HEAL: f32 = 5.0;

// A pet with this name can be carried to the doctor even after it died.
const REVIVER_NAME: &str = "Lazarus";

/// Per-action cooldowns plus the global action lock and the autosave clock.
/// The autosave clock counts up and starts fully elapsed, so the first tick
/// after creation writes a save right away.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Cooldowns {
    pub(crate) doctor: f32,
    pub(crate) play: f32,
    pub(crate) action_lock: f32,
    pub(crate) autosave: f32,
}

impl Cooldowns {
    pub(crate) fn new() -> Self {
        Self {
            doctor: 0.0,
            play: 0.0,
            action_lock: 0.0,
            autosave: AUTOSAVE_EVERY,
        }
    }

    pub(crate) fn locked(&self) -> bool {
        self.action_lock > 0.0
    }

    /// No stacking: a running lock is never extended or replaced.
    pub(crate) fn lock(&mut self, duration: f32) {
        if !self.locked() {
            self.action_lock = duration;
        }
    }

    /// Returns true when the autosave period elapsed on this tick.
    pub(crate) fn tick(&mut self, dt: f32) -> bool {
        self.doctor = (self.doctor - dt).max(0.0);
        self.play = (self.play - dt).max(0.0);
        self.action_lock = (self.action_lock - dt).max(0.0);
        self.autosave += dt;
        if self.autosave >= AUTOSAVE_EVERY {
            self.autosave = 0.0;
            return true;
        }
        false
    }
}

/// The player actions. Every one of them checks the global action lock
/// first, then its own preconditions; a refused call reports false and
/// leaves no trace, never a partial effect.
impl GameSession {
    /// Spend one food item to restore fullness by its stat value.
    pub fn feed(&mut self, item: ItemKind) -> bool {
        if self.cooldowns.locked() || self.character.flags.anger_locked {
            return false;
        }
        if !item.is_food() {
            return false;
        }
        if !self.character.inventory.consume(item) {
            return false;
        }
        let s = &mut self.character.stats;
        s.fullness = (s.fullness + item.stat_value()).clamp(STAT_MIN, STAT_MAX);
        s.refresh_stress();
        self.begin_action(AnimKind::Eating, FEED_LOCK);
        true
    }

    /// A round of play. Success also tells the caller it may launch its
    /// reward flow; the score from that comes back through
    /// [`GameSession::award_score`].
    pub fn play(&mut self) -> bool {
        if self.cooldowns.locked() || self.cooldowns.play > 0.0 {
            return false;
        }
        let s = &mut self.character.stats;
        s.happiness = (s.happiness + PLAY_HAPPINESS).clamp(STAT_MIN, STAT_MAX);
        s.refresh_stress();
        self.cooldowns.play = PLAY_COOLDOWN;
        self.begin_action(AnimKind::Playing, PLAY_LOCK);
        true
    }

    /// A workout: costs fullness and sleep (more sleep while starving),
    /// always restores a little health. Re-deriving the state afterwards can
    /// push an exhausted pet over the edge, in which case the workout kills
    /// it instead of locking in.
    pub fn exercise(&mut self) -> bool {
        if self.cooldowns.locked() {
            return false;
        }
        if self.character.flags.anger_locked
            || self.character.flags.sleep_locked
            || self.character.state() == PetState::Dead
        {
            return false;
        }

        let sleep_cost = if self.character.flags.hunger_locked {
            EXERCISE_SLEEP_COST_STARVING
        } else {
            EXERCISE_SLEEP_COST
        };
        let s = &mut self.character.stats;
        s.fullness = (s.fullness - EXERCISE_FULLNESS_COST).clamp(STAT_MIN, STAT_MAX);
        s.sleep = (s.sleep - sleep_cost).clamp(STAT_MIN, STAT_MAX);
        s.health = (s.health + EXERCISE_HEAL).clamp(STAT_MIN, STAT_MAX);

        self.character.evaluate();
        if self.character.stats.health < DEATH_BELOW {
            // The collapse penalty just took the last of its health.
            self.character.evaluate();
            self.on_death();
            return true;
        }
        if self.character.stats.health > DEATH_BELOW {
            self.begin_action(AnimKind::Workout, EXERCISE_LOCK);
        }
        true
    }

    /// A checkup restores health. A dead pet stays on the table, unless it
    /// happens to carry the one name the doctor makes an exception for.
    pub fn take_to_doctor(&mut self) -> bool {
        if self.cooldowns.locked() || self.character.flags.anger_locked {
            return false;
        }
        if self.cooldowns.doctor > 0.0 {
            return false;
        }
        if self.character.state() == PetState::Dead && self.character.name != REVIVER_NAME {
            return false;
        }
        let s = &mut self.character.stats;
        s.health = (s.health + DOCTOR_HEAL).clamp(STAT_MIN, STAT_MAX);
        s.refresh_stress();
        self.cooldowns.doctor = DOCTOR_COOLDOWN;
        self.begin_action(AnimKind::Checkup, DOCTOR_LOCK);
        true
    }

    /// Spend one gift item to restore happiness by its stat value. The item
    /// picks which gift animation plays; beyond that all gifts behave alike.
    pub fn give_gift(&mut self, item: ItemKind) -> bool {
        if self.cooldowns.locked() || self.character.state() == PetState::Dead {
            return false;
        }
        if !item.is_gift() {
            return false;
        }
        if !self.character.inventory.consume(item) {
            return false;
        }
        let s = &mut self.character.stats;
        s.happiness = (s.happiness + item.stat_value()).clamp(STAT_MIN, STAT_MAX);
        s.refresh_stress();
        self.begin_action(AnimKind::for_gift(item), GIFT_LOCK);
        true
    }

    /// Put the pet to bed on purpose. This sets the sleep condition directly
    /// without the collapse penalties and without an action lock; the pet
    /// wakes once sleep crosses the release threshold.
    pub fn sleep(&mut self) -> bool {
        if self.cooldowns.locked() {
            return false;
        }
        if self.character.flags.anger_locked || self.character.state() == PetState::Dead {
            return false;
        }
        self.character.flags.sleep_locked = true;
        true
    }
}
