#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Lane Defence.
//!
//! The [`World`] is the single mutable aggregate of a battle. Systems receive
//! it by exclusive reference every tick; no entity is ever held across ticks
//! except by identifier.

use std::{collections::BTreeMap, time::Duration};

use lane_defence_core::{
    AttackerDefinition, AttackerId, AttackerKind, CellCoord, Command, CommandError,
    DefenderDefinition, DefenderId, DefenderKind, EffectKind, Event, IntentError, LevelConfig,
    Outcome, Progress, ProjectileId, RemovalCause, SceneError, SceneMode, SceneTrigger, Settings,
    SunTokenId, Tuning, READY_STATUS,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

mod entities;
mod factories;
mod grid;

pub use entities::{
    Attacker, BoundaryGuard, Defender, DefenderBehavior, Projectile, SunToken, VisualEffect,
    WaveState, FALLBACK_ACTION_INTERVAL,
};
pub use factories::{Factory, SunTokenParams};

use factories::IdAllocator;
use grid::OccupancyGrid;

const BATTLE_START_STATUS: &str = "Select a card, then click a lawn tile";
const DEATH_EFFECT_TTL: Duration = Duration::from_millis(360);

/// Represents the authoritative Lane Defence world state.
#[derive(Debug)]
pub struct World {
    level: LevelConfig,
    defender_definitions: BTreeMap<DefenderKind, DefenderDefinition>,
    attacker_definitions: BTreeMap<AttackerKind, AttackerDefinition>,
    progress: Progress,
    settings: Settings,
    tuning: Tuning,
    rng: ChaCha8Rng,
    ids: IdAllocator,
    mode: SceneMode,
    clock: Duration,
    sun: u32,
    grid: OccupancyGrid,
    defenders: BTreeMap<DefenderId, Defender>,
    attackers: BTreeMap<AttackerId, Attacker>,
    projectiles: BTreeMap<ProjectileId, Projectile>,
    sun_tokens: BTreeMap<SunTokenId, SunToken>,
    effects: Vec<VisualEffect>,
    guards: Vec<BoundaryGuard>,
    waves: WaveState,
    ambient_countdown: Duration,
    card_cooldowns: BTreeMap<DefenderKind, Duration>,
    selected_card: Option<DefenderKind>,
    status: String,
    screen_shake: Duration,
    outcome: Option<Outcome>,
    unobserved_outcome: Option<Outcome>,
}

impl World {
    /// Creates a world for `level` in the idle mode using the default tuning.
    #[must_use]
    pub fn new(
        level: LevelConfig,
        defender_definitions: Vec<DefenderDefinition>,
        attacker_definitions: Vec<AttackerDefinition>,
        progress: Progress,
        settings: Settings,
        seed: u64,
    ) -> Self {
        Self::with_tuning(
            level,
            defender_definitions,
            attacker_definitions,
            progress,
            settings,
            seed,
            Tuning::default(),
        )
    }

    /// Creates a world for `level` in the idle mode using explicit tuning.
    #[must_use]
    pub fn with_tuning(
        level: LevelConfig,
        defender_definitions: Vec<DefenderDefinition>,
        attacker_definitions: Vec<AttackerDefinition>,
        progress: Progress,
        settings: Settings,
        seed: u64,
        tuning: Tuning,
    ) -> Self {
        let defender_definitions = defender_definitions
            .into_iter()
            .map(|definition| (definition.id.clone(), definition))
            .collect();
        let attacker_definitions = attacker_definitions
            .into_iter()
            .map(|definition| (definition.id.clone(), definition))
            .collect();

        let mut world = Self {
            grid: OccupancyGrid::new(level.rows, level.columns),
            sun: 0,
            level,
            defender_definitions,
            attacker_definitions,
            progress,
            settings,
            tuning,
            rng: ChaCha8Rng::seed_from_u64(seed),
            ids: IdAllocator::default(),
            mode: SceneMode::Idle,
            clock: Duration::ZERO,
            defenders: BTreeMap::new(),
            attackers: BTreeMap::new(),
            projectiles: BTreeMap::new(),
            sun_tokens: BTreeMap::new(),
            effects: Vec::new(),
            guards: Vec::new(),
            waves: WaveState::default(),
            ambient_countdown: Duration::ZERO,
            card_cooldowns: BTreeMap::new(),
            selected_card: None,
            status: String::new(),
            screen_shake: Duration::ZERO,
            outcome: None,
            unobserved_outcome: None,
        };
        world.reset_battle();
        world
    }

    /// Reinitializes every battle-scoped field in place.
    ///
    /// Level, definitions, progress, settings, tuning and the random stream
    /// are preserved.
    pub fn reset_battle(&mut self) {
        self.clock = Duration::ZERO;
        self.sun = self.level.initial_sun.min(self.tuning.resource_cap);
        self.grid.clear();
        self.defenders.clear();
        self.attackers.clear();
        self.projectiles.clear();
        self.sun_tokens.clear();
        self.effects.clear();
        self.guards = (0..self.level.rows)
            .map(|lane| BoundaryGuard {
                lane,
                x: self.tuning.board.guard_start_x,
                active: true,
                moving: false,
            })
            .collect();
        self.waves = WaveState::default();
        self.ambient_countdown = self.tuning.sun.ambient_interval;
        self.card_cooldowns.clear();
        self.selected_card = None;
        self.status = String::from(READY_STATUS);
        self.screen_shake = Duration::ZERO;
        self.outcome = None;
        self.unobserved_outcome = None;
    }

    /// Static description of the level being played.
    #[must_use]
    pub fn level(&self) -> &LevelConfig {
        &self.level
    }

    /// Tuning constants of the battle.
    #[must_use]
    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    /// Campaign progress carried by the world.
    #[must_use]
    pub fn progress(&self) -> &Progress {
        &self.progress
    }

    /// Player settings carried by the world.
    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Looks up a defender type definition.
    #[must_use]
    pub fn defender_definition(&self, kind: &DefenderKind) -> Option<&DefenderDefinition> {
        self.defender_definitions.get(kind)
    }

    /// Looks up an attacker type definition.
    #[must_use]
    pub fn attacker_definition(&self, kind: &AttackerKind) -> Option<&AttackerDefinition> {
        self.attacker_definitions.get(kind)
    }

    /// Current scene mode.
    #[must_use]
    pub fn scene_mode(&self) -> SceneMode {
        self.mode
    }

    /// Reports whether the battle systems should run.
    #[must_use]
    pub fn is_battle_active(&self) -> bool {
        self.mode.is_active()
    }

    /// Battle clock, measured from battle start.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.clock
    }

    /// Advances the battle clock; ignored unless the battle is active.
    pub fn advance_clock(&mut self, dt: Duration) -> Duration {
        if self.is_battle_active() {
            self.clock = self.clock.saturating_add(dt);
        }
        self.clock
    }

    /// Current resource pool.
    #[must_use]
    pub fn sun(&self) -> u32 {
        self.sun
    }

    /// Adds to the resource pool, clamped to the cap. Returns the new pool.
    pub fn credit_sun(&mut self, amount: u32) -> u32 {
        self.sun = self.sun.saturating_add(amount).min(self.tuning.resource_cap);
        self.sun
    }

    /// Subtracts from the resource pool, clamped at zero. Returns the new pool.
    pub fn debit_sun(&mut self, amount: u32) -> u32 {
        self.sun = self.sun.saturating_sub(amount);
        self.sun
    }

    /// Draws the next value in `[0, 1)` from the seeded random stream.
    pub fn random_unit(&mut self) -> f32 {
        self.rng.gen::<f32>()
    }

    /// Borrows the identifier allocator and random stream for entity construction.
    pub fn factory(&mut self) -> Factory<'_> {
        Factory {
            ids: &mut self.ids,
            rng: &mut self.rng,
            tuning: &self.tuning,
        }
    }

    /// Grid dimensions as `(rows, columns)`.
    #[must_use]
    pub fn grid_dimensions(&self) -> (u32, u32) {
        self.grid.dimensions()
    }

    /// Reports whether `cell` lies inside the grid.
    #[must_use]
    pub fn contains_cell(&self, cell: CellCoord) -> bool {
        self.grid.contains(cell)
    }

    /// Returns the defender occupying `cell`, if any.
    #[must_use]
    pub fn find_defender_at(&self, cell: CellCoord) -> Option<&Defender> {
        self.grid
            .occupant(cell)
            .and_then(|id| self.defenders.get(&id))
    }

    /// Inserts a defender into its cell and the defender container together.
    ///
    /// Returns the defender back when its cell is taken or out of bounds.
    pub fn insert_defender(&mut self, defender: Defender) -> Result<DefenderId, Defender> {
        if !self.grid.occupy(defender.id, defender.cell) {
            return Err(defender);
        }
        let id = defender.id;
        let _ = self.defenders.insert(id, defender);
        Ok(id)
    }

    /// Removes a defender, clearing its grid cell in the same operation.
    pub fn remove_defender_by_id(&mut self, id: DefenderId) -> Option<Defender> {
        let defender = self.defenders.remove(&id)?;
        self.grid.vacate(id, defender.cell);
        debug!(target: "lane_defence::world", defender = id.get(), "defender removed");
        Some(defender)
    }

    /// Removes a defender and reports the removal.
    pub fn remove_defender_with_cause(
        &mut self,
        id: DefenderId,
        cause: RemovalCause,
        out_events: &mut Vec<Event>,
    ) -> Option<Defender> {
        let defender = self.remove_defender_by_id(id)?;
        out_events.push(Event::DefenderRemoved {
            defender: id,
            cell: defender.cell,
            cause,
        });
        Some(defender)
    }

    /// Iterator over defenders in identifier order.
    pub fn defenders(&self) -> impl Iterator<Item = &Defender> {
        self.defenders.values()
    }

    /// Identifiers of every defender, in order.
    #[must_use]
    pub fn defender_ids(&self) -> Vec<DefenderId> {
        self.defenders.keys().copied().collect()
    }

    /// Looks up a defender by identifier.
    #[must_use]
    pub fn defender(&self, id: DefenderId) -> Option<&Defender> {
        self.defenders.get(&id)
    }

    /// Looks up a defender by identifier for mutation.
    pub fn defender_mut(&mut self, id: DefenderId) -> Option<&mut Defender> {
        self.defenders.get_mut(&id)
    }

    /// Iterator over attackers in identifier order.
    pub fn attackers(&self) -> impl Iterator<Item = &Attacker> {
        self.attackers.values()
    }

    /// Identifiers of every attacker, in order.
    #[must_use]
    pub fn attacker_ids(&self) -> Vec<AttackerId> {
        self.attackers.keys().copied().collect()
    }

    /// Looks up an attacker by identifier.
    #[must_use]
    pub fn attacker(&self, id: AttackerId) -> Option<&Attacker> {
        self.attackers.get(&id)
    }

    /// Looks up an attacker by identifier for mutation.
    pub fn attacker_mut(&mut self, id: AttackerId) -> Option<&mut Attacker> {
        self.attackers.get_mut(&id)
    }

    /// Inserts a freshly built attacker.
    pub fn insert_attacker(&mut self, attacker: Attacker) -> AttackerId {
        let id = attacker.id;
        let _ = self.attackers.insert(id, attacker);
        id
    }

    /// Applies damage to a live attacker.
    ///
    /// When the hit points cross zero the reward is credited, a death effect
    /// is spawned and [`Event::AttackerKilled`] is emitted. Returns whether
    /// this call killed the attacker.
    pub fn damage_attacker(
        &mut self,
        id: AttackerId,
        amount: f32,
        out_events: &mut Vec<Event>,
    ) -> bool {
        let Some(attacker) = self.attackers.get_mut(&id) else {
            return false;
        };
        if !attacker.is_alive() {
            return false;
        }
        attacker.hp -= amount;
        if attacker.is_alive() {
            return false;
        }
        let (reward, lane, x) = (attacker.reward, attacker.lane, attacker.x);
        self.finish_kill(id, reward, lane, x, out_events);
        true
    }

    /// Destroys a live attacker outright, optionally crediting its reward.
    ///
    /// Returns whether the attacker was alive before the call.
    pub fn destroy_attacker(
        &mut self,
        id: AttackerId,
        credit_reward: bool,
        out_events: &mut Vec<Event>,
    ) -> bool {
        let Some(attacker) = self.attackers.get_mut(&id) else {
            return false;
        };
        if !attacker.is_alive() {
            return false;
        }
        attacker.hp = 0.0;
        let reward = if credit_reward { attacker.reward } else { 0 };
        let (lane, x) = (attacker.lane, attacker.x);
        self.finish_kill(id, reward, lane, x, out_events);
        true
    }

    fn finish_kill(
        &mut self,
        id: AttackerId,
        reward: u32,
        lane: u32,
        x: f32,
        out_events: &mut Vec<Event>,
    ) {
        if reward > 0 {
            let _ = self.credit_sun(reward);
        }
        let board = &self.tuning.board;
        let y = board.origin_y + lane as f32 * board.cell_height + board.cell_height * 0.5;
        self.spawn_effect(EffectKind::Death, x, y, DEATH_EFFECT_TTL);
        debug!(target: "lane_defence::world", attacker = id.get(), reward, "attacker killed");
        out_events.push(Event::AttackerKilled {
            attacker: id,
            reward,
        });
    }

    /// Discards every attacker without hit points. Returns the number pruned.
    pub fn prune_dead_attackers(&mut self) -> usize {
        let before = self.attackers.len();
        self.attackers.retain(|_, attacker| attacker.is_alive());
        before - self.attackers.len()
    }

    /// Iterator over projectiles in identifier order.
    pub fn projectiles(&self) -> impl Iterator<Item = &Projectile> {
        self.projectiles.values()
    }

    /// Identifiers of every projectile, in order.
    #[must_use]
    pub fn projectile_ids(&self) -> Vec<ProjectileId> {
        self.projectiles.keys().copied().collect()
    }

    /// Looks up a projectile by identifier for mutation.
    pub fn projectile_mut(&mut self, id: ProjectileId) -> Option<&mut Projectile> {
        self.projectiles.get_mut(&id)
    }

    /// Inserts a freshly built projectile.
    pub fn insert_projectile(&mut self, projectile: Projectile) -> ProjectileId {
        let id = projectile.id;
        let _ = self.projectiles.insert(id, projectile);
        id
    }

    /// Removes a projectile.
    pub fn remove_projectile(&mut self, id: ProjectileId) -> Option<Projectile> {
        self.projectiles.remove(&id)
    }

    /// Iterator over sun tokens in identifier order.
    pub fn sun_tokens(&self) -> impl Iterator<Item = &SunToken> {
        self.sun_tokens.values()
    }

    /// Mutable iterator over sun tokens in identifier order.
    pub fn sun_tokens_mut(&mut self) -> impl Iterator<Item = &mut SunToken> {
        self.sun_tokens.values_mut()
    }

    /// Looks up a sun token by identifier.
    #[must_use]
    pub fn sun_token(&self, id: SunTokenId) -> Option<&SunToken> {
        self.sun_tokens.get(&id)
    }

    /// Inserts a freshly built sun token.
    pub fn insert_sun_token(&mut self, token: SunToken) -> SunTokenId {
        let id = token.id;
        let _ = self.sun_tokens.insert(id, token);
        id
    }

    /// Removes a sun token.
    pub fn remove_sun_token(&mut self, id: SunTokenId) -> Option<SunToken> {
        self.sun_tokens.remove(&id)
    }

    /// Decorative effects in creation order.
    #[must_use]
    pub fn effects(&self) -> &[VisualEffect] {
        &self.effects
    }

    /// Starts a decorative effect.
    pub fn spawn_effect(&mut self, kind: EffectKind, x: f32, y: f32, ttl: Duration) {
        self.effects.push(VisualEffect {
            kind,
            x,
            y,
            ttl,
            max_ttl: ttl,
        });
    }

    /// Drains effect lifetimes by `dt` and discards expired effects.
    pub fn decay_effects(&mut self, dt: Duration) {
        for effect in &mut self.effects {
            effect.ttl = effect.ttl.saturating_sub(dt);
        }
        self.effects.retain(|effect| !effect.ttl.is_zero());
    }

    /// Boundary guards ordered by lane.
    #[must_use]
    pub fn guards(&self) -> &[BoundaryGuard] {
        &self.guards
    }

    /// Boundary guards ordered by lane, for mutation.
    pub fn guards_mut(&mut self) -> &mut [BoundaryGuard] {
        &mut self.guards
    }

    /// Wave schedule cursor.
    #[must_use]
    pub fn waves(&self) -> &WaveState {
        &self.waves
    }

    /// Wave schedule cursor, for mutation.
    pub fn waves_mut(&mut self) -> &mut WaveState {
        &mut self.waves
    }

    /// Time left before the next ambient sun token.
    #[must_use]
    pub fn ambient_countdown(&self) -> Duration {
        self.ambient_countdown
    }

    /// Overrides the time left before the next ambient sun token.
    pub fn set_ambient_countdown(&mut self, countdown: Duration) {
        self.ambient_countdown = countdown;
    }

    /// Battle time at which the card of `kind` becomes usable again.
    #[must_use]
    pub fn cooldown_until(&self, kind: &DefenderKind) -> Duration {
        self.card_cooldowns
            .get(kind)
            .copied()
            .unwrap_or(Duration::ZERO)
    }

    /// Records the battle time at which the card of `kind` becomes usable again.
    pub fn set_cooldown_until(&mut self, kind: DefenderKind, until: Duration) {
        let _ = self.card_cooldowns.insert(kind, until);
    }

    /// Card currently selected by the player.
    #[must_use]
    pub fn selected_card(&self) -> Option<&DefenderKind> {
        self.selected_card.as_ref()
    }

    /// Drops the card selection.
    pub fn clear_selection(&mut self) {
        self.selected_card = None;
    }

    /// Human-readable status message.
    #[must_use]
    pub fn status(&self) -> &str {
        &self.status
    }

    /// Replaces the status message.
    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = status.into();
    }

    /// Remaining screen shake.
    #[must_use]
    pub fn screen_shake(&self) -> Duration {
        self.screen_shake
    }

    /// Starts a screen shake, keeping a longer one already running.
    pub fn emit_screen_shake(&mut self, duration: Duration) {
        self.screen_shake = self.screen_shake.max(duration);
    }

    /// Drains the screen shake by `dt`.
    pub fn decay_screen_shake(&mut self, dt: Duration) {
        self.screen_shake = self.screen_shake.saturating_sub(dt);
    }

    /// Terminal outcome, once reached.
    #[must_use]
    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    /// Records the terminal outcome of the battle.
    ///
    /// The first outcome wins; later calls are ignored until the next reset.
    /// Recording updates progress, moves an active battle to
    /// [`SceneMode::Terminal`] and raises the signal read by
    /// [`World::take_new_outcome`]. Returns whether the outcome was recorded.
    pub fn record_outcome(&mut self, outcome: Outcome, out_events: &mut Vec<Event>) -> bool {
        if self.outcome.is_some() {
            return false;
        }
        self.outcome = Some(outcome);
        self.unobserved_outcome = Some(outcome);
        self.progress.record(&self.level.id, outcome);
        self.status = match outcome {
            Outcome::Win => String::from("Level cleared"),
            Outcome::Lose { lane } => format!("Lane {} was breached", lane + 1),
        };
        info!(target: "lane_defence::world", ?outcome, level = %self.level.id, "battle finished");
        out_events.push(Event::OutcomeReached { outcome });
        if let Some(next) = self.mode.next(SceneTrigger::OutcomeReached) {
            self.enter(next, out_events);
        }
        true
    }

    /// Returns a newly recorded outcome exactly once per terminal transition.
    pub fn take_new_outcome(&mut self) -> Option<Outcome> {
        self.unobserved_outcome.take()
    }

    fn enter(&mut self, next: SceneMode, out_events: &mut Vec<Event>) {
        let from = self.mode;
        self.mode = next;
        info!(target: "lane_defence::world", ?from, to = ?next, "scene changed");
        out_events.push(Event::SceneChanged { from, to: next });
    }
}

/// Applies a lifecycle or selection command to the world.
///
/// Grid, resource and tick commands belong to the systems and are ignored
/// here.
pub fn apply(
    world: &mut World,
    command: Command,
    out_events: &mut Vec<Event>,
) -> Result<(), CommandError> {
    let trigger = match command {
        Command::OpenLevelSelect => SceneTrigger::OpenLevelSelect,
        Command::OpenSettings => SceneTrigger::OpenSettings,
        Command::CloseSettings => SceneTrigger::CloseSettings,
        Command::BackToMenu => SceneTrigger::BackToMenu,
        Command::StartBattle => SceneTrigger::StartBattle,
        Command::TogglePause => SceneTrigger::TogglePause,
        Command::Retry => SceneTrigger::Retry,
        Command::SelectCard { kind } => {
            return select_card(world, &kind, out_events).map_err(CommandError::from);
        }
        Command::ClearSelection => {
            if world.selected_card.take().is_some() {
                out_events.push(Event::SelectionCleared);
            }
            return Ok(());
        }
        Command::Tick { .. }
        | Command::PlaceAt { .. }
        | Command::RemoveAt { .. }
        | Command::CollectAt { .. } => return Ok(()),
    };
    let _ = transition(world, trigger, out_events)?;
    Ok(())
}

/// Applies a lifecycle trigger to the scene state machine.
///
/// Starting or retrying a battle performs a full reset, starts the clock and
/// marks the wave schedule as started. [`SceneTrigger::OutcomeReached`] is
/// only accepted through [`World::record_outcome`].
pub fn transition(
    world: &mut World,
    trigger: SceneTrigger,
    out_events: &mut Vec<Event>,
) -> Result<SceneMode, SceneError> {
    let rejected = SceneError {
        from: world.mode,
        trigger,
    };
    if trigger == SceneTrigger::OutcomeReached {
        return Err(rejected);
    }
    let next = world.mode.next(trigger).ok_or(rejected)?;

    if matches!(trigger, SceneTrigger::StartBattle | SceneTrigger::Retry) {
        world.reset_battle();
        world.waves.started = true;
        world.waves.started_at = world.clock;
        world.status = String::from(BATTLE_START_STATUS);
    }
    match next {
        SceneMode::Suspended => world.status = String::from("Paused"),
        SceneMode::Active if trigger == SceneTrigger::TogglePause => {
            world.status = String::from("Resumed");
        }
        _ => {}
    }

    world.enter(next, out_events);
    Ok(next)
}

/// Selects the card used by subsequent placements.
///
/// Selecting the already selected card cancels the selection.
pub fn select_card(
    world: &mut World,
    kind: &DefenderKind,
    out_events: &mut Vec<Event>,
) -> Result<(), IntentError> {
    if !world.mode.in_battle() {
        return Err(IntentError::NotActive);
    }
    let Some(definition) = world.defender_definitions.get(kind) else {
        return Err(IntentError::UnknownType);
    };

    if world.selected_card.as_ref() == Some(kind) {
        world.selected_card = None;
        world.status = String::from("Selection canceled");
        out_events.push(Event::SelectionCleared);
        return Ok(());
    }

    world.status = format!("Selected {}", definition.name);
    world.selected_card = Some(kind.clone());
    out_events.push(Event::CardSelected { kind: kind.clone() });
    Ok(())
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use lane_defence_core::{
        AttackerSnapshot, CellCoord, CooldownSnapshot, DefenderSnapshot, EffectSnapshot,
        GuardSnapshot, Outcome, ProjectileSnapshot, SceneMode, SunTokenSnapshot, WaveProgress,
        WorldSnapshot,
    };

    use super::{DefenderBehavior, World};

    const POINTER_MARGIN: f32 = 0.1;

    /// Captures the complete read-only view handed to presentation.
    #[must_use]
    pub fn snapshot(world: &World) -> WorldSnapshot {
        let now = world.clock;
        WorldSnapshot {
            mode: world.mode,
            now,
            sun: world.sun,
            status: world.status.clone(),
            selected_card: world.selected_card.clone(),
            waves: wave_progress(world),
            outcome: world.outcome,
            screen_shake: world.screen_shake,
            defenders: world
                .defenders
                .values()
                .map(|defender| DefenderSnapshot {
                    id: defender.id,
                    kind: defender.kind.clone(),
                    cell: defender.cell,
                    x: defender.x,
                    y: defender.y,
                    hp_ratio: ratio(defender.hp, defender.max_hp),
                    armed: defender.is_armed(),
                    hurt: !defender.hurt.is_zero(),
                    sway_phase: defender.sway_phase,
                })
                .collect(),
            attackers: world
                .attackers
                .values()
                .map(|attacker| AttackerSnapshot {
                    id: attacker.id,
                    kind: attacker.kind.clone(),
                    lane: attacker.lane,
                    x: attacker.x,
                    hp_ratio: ratio(attacker.hp, attacker.max_hp),
                    biting: attacker.target,
                    hurt: !attacker.hurt.is_zero(),
                    walk_phase: attacker.walk_phase,
                })
                .collect(),
            projectiles: world
                .projectiles
                .values()
                .map(|projectile| ProjectileSnapshot {
                    id: projectile.id,
                    lane: projectile.lane,
                    x: projectile.x,
                    y: projectile.y,
                })
                .collect(),
            sun_tokens: world
                .sun_tokens
                .values()
                .map(|token| SunTokenSnapshot {
                    id: token.id,
                    x: token.x,
                    y: token.y,
                    value: token.value,
                    falling: token.falling,
                })
                .collect(),
            effects: world
                .effects
                .iter()
                .map(|effect| EffectSnapshot {
                    kind: effect.kind,
                    x: effect.x,
                    y: effect.y,
                    progress: effect.progress(),
                })
                .collect(),
            guards: world
                .guards
                .iter()
                .map(|guard| GuardSnapshot {
                    lane: guard.lane,
                    x: guard.x,
                    active: guard.active,
                    moving: guard.moving,
                })
                .collect(),
            cooldowns: world
                .defender_definitions
                .keys()
                .map(|kind| CooldownSnapshot {
                    kind: kind.clone(),
                    remaining: world.cooldown_until(kind).saturating_sub(now),
                })
                .collect(),
        }
    }

    /// Current scene mode.
    #[must_use]
    pub fn scene_mode(world: &World) -> SceneMode {
        world.mode
    }

    /// Terminal outcome, once reached.
    #[must_use]
    pub fn outcome(world: &World) -> Option<Outcome> {
        world.outcome
    }

    /// Current resource pool.
    #[must_use]
    pub fn sun(world: &World) -> u32 {
        world.sun
    }

    /// Progress through the wave schedule.
    #[must_use]
    pub fn wave_progress(world: &World) -> WaveProgress {
        WaveProgress {
            cursor: world.waves.cursor,
            total: world.level.spawn_table.len(),
            advertised: world.level.waves,
        }
    }

    /// Number of producing defenders on the board.
    #[must_use]
    pub fn producer_count(world: &World) -> usize {
        world
            .defenders
            .values()
            .filter(|defender| matches!(defender.behavior, DefenderBehavior::Producer { .. }))
            .count()
    }

    /// Centre of `cell` in world units.
    #[must_use]
    pub fn cell_center(world: &World, cell: CellCoord) -> (f32, f32) {
        let board = &world.tuning.board;
        (board.column_center(cell.column()), board.row_center(cell.row()))
    }

    /// Resolves a board position to a plantable cell.
    ///
    /// Positions within a tenth of a cell from its edges resolve to nothing so
    /// that clicks near tile borders do not land in the neighbouring cell.
    #[must_use]
    pub fn pixel_to_cell(world: &World, x: f32, y: f32) -> Option<CellCoord> {
        let board = &world.tuning.board;
        let (rows, columns) = world.grid.dimensions();
        let local_x = x - board.origin_x;
        let local_y = y - board.origin_y;
        if local_x < 0.0 || local_y < 0.0 {
            return None;
        }
        let column = (local_x / board.cell_width).floor();
        let row = (local_y / board.cell_height).floor();
        if column >= columns as f32 || row >= rows as f32 {
            return None;
        }

        let inner_x = local_x - column * board.cell_width;
        let inner_y = local_y - row * board.cell_height;
        let margin_x = board.cell_width * POINTER_MARGIN;
        let margin_y = board.cell_height * POINTER_MARGIN;
        if inner_x < margin_x
            || inner_x > board.cell_width - margin_x
            || inner_y < margin_y
            || inner_y > board.cell_height - margin_y
        {
            return None;
        }

        Some(CellCoord::new(row as u32, column as u32))
    }

    fn ratio(value: f32, maximum: f32) -> f32 {
        if maximum <= 0.0 {
            return 0.0;
        }
        (value / maximum).clamp(0.0, 1.0)
    }
}
