use crate::actions::Cooldowns;
use crate::error::PetError;
use crate::gate;
use crate::item::ItemKind;
use crate::model::{
    derive_display_key, ActionAnim, AnimKind, Character, DisplayKey, PetState, Stats,
};
use crate::sched::{Handle, Scheduler};
use crate::storage::SaveStore;
use chrono::{DateTime, Local, Utc};

// Idle sprites (sleeping, hungry, happy/blink) alternate on this period.
const IDLE_FRAME_SECS: f32 = 1.5;
// Action sprites alternate faster while the lock runs down.
const ANIM_FRAME_SECS: f32 = 0.5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum TimerEvent {
    IdleFlip,
    AnimFlip,
    AnimDone,
}

/// One live play session. Owns the character exclusively together with its
/// cooldowns, the timer arena, and the save document. The host calls
/// [`GameSession::tick`] once per frame on the same thread it issues action
/// calls from; nothing here is concurrent.
pub struct GameSession {
    pub(crate) character: Character,
    pub(crate) cooldowns: Cooldowns,
    pub(crate) scheduler: Scheduler<TimerEvent>,
    pub(crate) store: SaveStore,
    pub(crate) anim: Option<ActionAnim>,
    anim_flip: Option<Handle>,
    anim_done: Option<Handle>,
    idle_frame: bool,
    started_at: DateTime<Utc>,
}

impl GameSession {
    /// Start a session for `character`. Bumps the session counter and writes
    /// the document immediately so an interrupted session still counts.
    pub fn begin(mut store: SaveStore, character: Character) -> Result<Self, PetError> {
        store.controls_mut().total_sessions_played += 1;
        store.save()?;
        tracing::debug!(slot = character.slot, "session started");

        let mut scheduler = Scheduler::new();
        scheduler.schedule_repeating(IDLE_FRAME_SECS, TimerEvent::IdleFlip);

        Ok(Self {
            character,
            cooldowns: Cooldowns::new(),
            scheduler,
            store,
            anim: None,
            anim_flip: None,
            anim_done: None,
            idle_frame: false,
            started_at: Utc::now(),
        })
    }

    /// Start a session from the character saved in `slot`.
    pub fn resume(store: SaveStore, slot: u8) -> Result<Self, PetError> {
        let character = store.load_character(slot)?;
        Self::begin(store, character)
    }

    /// One simulated frame: meter decay, state evaluation, cooldown timers
    /// (with the periodic autosave), then due timer events. A failed
    /// autosave write propagates; there is nothing to recover there.
    pub fn tick(&mut self, dt: f32) -> Result<(), PetError> {
        let was = self.character.state();
        self.character.tick_stats(dt);
        self.character.evaluate();
        if was != PetState::Dead && self.character.state() == PetState::Dead {
            self.on_death();
        }

        if self.cooldowns.tick(dt) {
            self.store.save_character(&self.character)?;
        }

        self.scheduler.advance(dt);
        while let Some(ev) = self.scheduler.pop_due() {
            self.apply_timer(ev);
        }
        Ok(())
    }

    fn apply_timer(&mut self, ev: TimerEvent) {
        match ev {
            TimerEvent::IdleFlip => self.idle_frame = !self.idle_frame,
            TimerEvent::AnimFlip => {
                if let Some(a) = &mut self.anim {
                    a.frame = !a.frame;
                }
            }
            TimerEvent::AnimDone => {
                if let Some(h) = self.anim_flip.take() {
                    self.scheduler.cancel(h);
                }
                self.anim_done = None;
                self.anim = None;
            }
        }
    }

    /// Arm the global action lock and the two-frame animation that runs with
    /// it. Any previous animation timers are cancelled first.
    pub(crate) fn begin_action(&mut self, kind: AnimKind, lock_secs: f32) {
        self.cooldowns.lock(lock_secs);
        self.clear_anim();
        self.anim = Some(ActionAnim { kind, frame: false });
        self.anim_flip = Some(
            self.scheduler
                .schedule_repeating(ANIM_FRAME_SECS, TimerEvent::AnimFlip),
        );
        self.anim_done = Some(self.scheduler.schedule(lock_secs, TimerEvent::AnimDone));
    }

    fn clear_anim(&mut self) {
        if let Some(h) = self.anim_flip.take() {
            self.scheduler.cancel(h);
        }
        if let Some(h) = self.anim_done.take() {
            self.scheduler.cancel(h);
        }
        self.anim = None;
    }

    /// Death interrupts whatever animation was mid-flight.
    pub(crate) fn on_death(&mut self) {
        self.clear_anim();
        tracing::debug!(name = %self.character.name, "pet died");
    }

    /// Symbolic sprite name for the presentation layer to resolve.
    pub fn display_key(&self) -> DisplayKey {
        derive_display_key(self.character.state(), self.anim, self.idle_frame)
    }

    pub fn state(&self) -> PetState {
        self.character.state()
    }

    pub fn stats(&self) -> Stats {
        self.character.stats
    }

    pub fn score(&self) -> u32 {
        self.character.score
    }

    pub fn inventory_counts(&self) -> [u32; 6] {
        self.character.inventory.counts()
    }

    pub fn character(&self) -> &Character {
        &self.character
    }

    pub fn action_locked(&self) -> bool {
        self.cooldowns.locked()
    }

    pub fn doctor_ready(&self) -> bool {
        self.cooldowns.doctor <= 0.0
    }

    pub fn play_ready(&self) -> bool {
        self.cooldowns.play <= 0.0
    }

    /// Reward hook for the host's minigame flow after a successful
    /// [`GameSession::play`].
    pub fn award_score(&mut self, points: u32) {
        self.character.score = self.character.score.saturating_add(points);
    }

    /// Stock the pantry or the gift shelf.
    pub fn add_item(&mut self, item: ItemKind, n: u32) {
        self.character.inventory.add(item, n);
    }

    /// True while an enabled parental block window covers the current local
    /// time.
    pub fn blocked_now(&self) -> bool {
        gate::is_blocked(self.store.controls(), Local::now().naive_local())
    }

    pub fn store(&self) -> &SaveStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut SaveStore {
        &mut self.store
    }

    /// Save on demand, outside the autosave cadence.
    pub fn save_now(&mut self) -> Result<(), PetError> {
        self.store.save_character(&self.character)
    }

    /// End the session: fold elapsed wall-clock seconds into the playtime
    /// counters, recompute the per-session average, and write everything in
    /// one final save.
    pub fn end(mut self) -> Result<(), PetError> {
        let elapsed = (Utc::now() - self.started_at).num_seconds().max(0) as u64;
        let pc = self.store.controls_mut();
        pc.total_seconds_played += elapsed;
        let sessions = pc.total_sessions_played.max(1);
        pc.average_playtime_per_session = pc.total_seconds_played / sessions;
        tracing::debug!(elapsed, "session ended");
        self.store.save_character(&self.character)
    }
}
