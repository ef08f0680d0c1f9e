//! Match orchestrator
//!
//! `MatchEngine` owns the ball, the 22 players and the single active
//! [`MatchState`]. Frame time is accumulated and consumed in fixed steps.
//! Every step runs exactly one state's logic; in live play the order is
//! clock, players, player contact, ball, then goal and boundary checks.

use super::ai_context::{AiContext, AiTimers, PerceptionFrame, PlayerSnapshot};
use super::ball::{
    center_spot, classify_out_of_bounds, detect_goal, resolve_goal_frame, Ball, GoalEnd, OutOfPlay,
};
use super::behaviors::goalkeeper_positioning::contain_goalkeeper;
use super::behaviors::AiStateKind;
use super::clock::{ClockReading, MatchClock};
use super::collaborators::{AudioCue, CelebrationRequest, Collaborators, MatchOutcome, SoundRequest};
use super::collision::{nudge_ball, resolve_player_collisions};
use super::config::MatchConfig;
use super::geometry::{distance, vec2, Vec2};
use super::input::{ControlMode, PlayerInput};
use super::match_state::MatchState;
use super::movement::{self, ActionEdges, MoveParams, Touch};
use super::physics_constants::{contact, timestep};
use super::restart::{award_restart, find_taker, taker_position, Restart};
use super::setup::{build_match, kicker_position, kickoff_position, kickoff_taker, player_seed};
use super::telemetry::{BallView, MatchSnapshot, PlayerView, RestartView, Score};
use crate::error::Result;
use crate::models::{ChargeState, Player, PlayerId, Team, TeamSheet, TeamSide};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

/// The human always plays the home team
pub const HUMAN_SIDE: TeamSide = TeamSide::Home;

/// Countdown tail shown as "GO" instead of a number
const COUNTDOWN_GO_SECS: f32 = 0.5;
/// Kick power that maps to full kick volume
const FULL_VOLUME_KICK: f32 = 2400.0;

/// A goal as it appears in the match report
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GoalRecord {
    pub side: TeamSide,
    pub scorer: Option<PlayerId>,
    pub own_goal: bool,
    pub clock: ClockReading,
}

/// Goal scored, celebration not started yet
#[derive(Debug, Clone, Copy)]
struct PendingGoal {
    scoring_side: TeamSide,
    scorer: Option<PlayerId>,
    own_goal: bool,
    delay: f32,
}

pub struct MatchEngine {
    config: MatchConfig,
    control_mode: ControlMode,
    collaborators: Collaborators,

    state: MatchState,
    /// Countdown for the timed states
    state_timer: f32,
    clock: MatchClock,
    /// Monotonic simulated time; kick cooldowns are measured against it
    match_time: f32,
    kickoff_elapsed: f32,
    accumulator: f32,
    ticks: u64,

    ball: Ball,
    players: Vec<Player>,
    teams: [Team; 2],
    score: Score,
    goals: Vec<GoalRecord>,
    controlled: PlayerId,
    previous_action: bool,

    restart: Option<Restart>,
    restart_grace: f32,
    goal_latched: bool,
    pending_goal: Option<PendingGoal>,
    celebration_scorer: Option<PlayerId>,
    kickoff_side: TeamSide,
    /// Match-level decisions such as AI restart plans
    rng: ChaCha8Rng,

    final_whistle_played: bool,
    outcome: Option<MatchOutcome>,
}

impl MatchEngine {
    pub fn new(
        home: &TeamSheet,
        away: &TeamSheet,
        config: MatchConfig,
        control_mode: ControlMode,
        collaborators: Collaborators,
    ) -> Result<Self> {
        config.validate()?;
        let setup = build_match(home, away, config.seed)?;
        let rng = ChaCha8Rng::seed_from_u64(player_seed(config.seed, setup.players.len()));

        let mut engine = Self {
            control_mode,
            collaborators,
            state: MatchState::CameraInit,
            state_timer: config.camera_init_secs,
            clock: MatchClock::new(config.real_seconds_per_match),
            match_time: 0.0,
            kickoff_elapsed: 0.0,
            accumulator: 0.0,
            ticks: 0,
            ball: Ball::at(center_spot()),
            players: setup.players,
            teams: setup.teams,
            score: Score::default(),
            goals: Vec::new(),
            controlled: 0,
            previous_action: false,
            restart: None,
            restart_grace: 0.0,
            goal_latched: false,
            pending_goal: None,
            celebration_scorer: None,
            kickoff_side: TeamSide::Home,
            rng,
            final_whistle_played: false,
            outcome: None,
            config,
        };
        engine.reset_for_kickoff(TeamSide::Home);
        log::info!("match ready: {} vs {}", engine.teams[0].name, engine.teams[1].name);
        Ok(engine)
    }

    // ============================================================
    // Frame driving
    // ============================================================

    /// Advance by a frame's real time, running as many fixed steps as fit.
    /// A large backlog is dropped after `MAX_STEPS_PER_ADVANCE` steps.
    pub fn update(&mut self, real_dt: f32, input: PlayerInput) {
        if !(real_dt.is_finite() && real_dt > 0.0) {
            return;
        }
        self.accumulator += real_dt;

        let mut input = input;
        let mut steps = 0;
        while self.accumulator >= self.config.fixed_dt {
            if steps == timestep::MAX_STEPS_PER_ADVANCE {
                self.accumulator = 0.0;
                break;
            }
            self.accumulator -= self.config.fixed_dt;
            self.tick(input);
            // Discrete command, consumed by the first step
            input.switch_player = false;
            steps += 1;
        }
    }

    /// One fixed simulation step
    pub fn tick(&mut self, input: PlayerInput) {
        let dt = self.config.fixed_dt;
        let input = input.sanitized();
        let edges = ActionEdges::from_held(self.previous_action, input.action_held);
        self.previous_action = input.action_held;
        self.match_time += dt;
        self.ticks += 1;

        match self.state {
            MatchState::CameraInit => {
                self.state_timer -= dt;
                if self.state_timer <= 0.0 {
                    self.enter_countdown();
                }
            }
            MatchState::Countdown => {
                self.state_timer -= dt;
                if self.state_timer <= 0.0 {
                    self.kick_off();
                }
            }
            MatchState::Playing => self.tick_playing(dt, input, edges),
            MatchState::ThrowIn | MatchState::CornerKick | MatchState::GoalKick => {
                self.tick_restart(dt, input, edges)
            }
            MatchState::GoalCelebration => self.tick_celebration(dt, input, edges),
            MatchState::FinalScore => {
                self.state_timer -= dt;
                if self.state_timer <= 0.0 {
                    self.end_match();
                }
            }
            MatchState::Ended => {}
        }
    }

    /// Tick with idle input until the match ends. Returns false if
    /// `max_ticks` ran out first.
    pub fn run_to_end(&mut self, max_ticks: u64) -> bool {
        for _ in 0..max_ticks {
            if self.is_finished() {
                break;
            }
            self.tick(PlayerInput::idle());
        }
        self.is_finished()
    }

    // ============================================================
    // State bodies
    // ============================================================

    fn tick_playing(&mut self, dt: f32, input: PlayerInput, edges: ActionEdges) {
        self.clock.advance(dt);
        self.kickoff_elapsed += dt;
        self.restart_grace = (self.restart_grace - dt).max(0.0);
        let contact_allowed = self.restart_grace <= 0.0;

        if input.switch_player {
            self.switch_control();
        }

        let touches = self.update_players(dt, input, edges, contact_allowed);
        self.resolve_touches(touches);

        let knockdowns = resolve_player_collisions(&mut self.players, self.ball.position());
        if !knockdowns.is_empty() {
            self.play(SoundRequest::cue(AudioCue::Tackle));
        }
        if contact_allowed {
            nudge_ball(&self.players, &mut self.ball);
        }

        self.ball.integrate(dt);
        self.check_ball(dt);

        if self.state == MatchState::Playing && self.pending_goal.is_none() && self.clock.is_full_time() {
            self.enter_final_score();
        }
    }

    fn tick_restart(&mut self, dt: f32, input: PlayerInput, edges: ActionEdges) {
        self.clock.advance(dt);

        let Some(mut restart) = self.restart.take() else {
            self.set_state(MatchState::Playing);
            return;
        };
        restart.timer -= dt;
        let execute = if restart.timer <= 0.0 {
            true
        } else if restart.human {
            let body = restart.taker.map(|id| &mut self.players[id].body);
            restart.step_human(input.movement, edges, dt, body)
        } else {
            restart.ai_ready()
        };
        self.restart = Some(restart);

        // Everyone but the taker keeps repositioning
        self.update_players(dt, input, edges, false);

        if execute {
            self.execute_restart();
        }
    }

    fn tick_celebration(&mut self, dt: f32, input: PlayerInput, edges: ActionEdges) {
        self.collaborators.celebration.update(dt);

        self.update_players(dt, input, edges, false);
        self.ball.integrate(dt);
        resolve_goal_frame(&mut self.ball);

        let celebration = &self.collaborators.celebration;
        let skipped = celebration.elapsed() >= self.config.celebration_min_secs && input.is_active();
        if !celebration.is_active() || skipped {
            self.collaborators.celebration.finish();
            self.celebration_scorer = None;
            // A goal in the last moments goes straight to the final whistle
            if self.clock.is_full_time() {
                self.enter_final_score();
            } else {
                self.reset_for_kickoff(self.kickoff_side);
                self.enter_countdown();
            }
        }
    }

    // ============================================================
    // Players
    // ============================================================

    /// The player moved by input this tick, if any
    fn human_driven(&self) -> Option<PlayerId> {
        (self.control_mode == ControlMode::Human && self.state != MatchState::GoalCelebration)
            .then_some(self.controlled)
    }

    /// Perception, decisions and movement for every player. Kicks and
    /// tackles only happen when `kicks` is set.
    fn update_players(&mut self, dt: f32, input: PlayerInput, edges: ActionEdges, kicks: bool) -> Vec<Touch> {
        let params = MoveParams {
            global_speed: self.config.global_speed,
            difficulty: self.config.difficulty,
            now: self.match_time,
            dt,
        };
        let human = self.human_driven();
        let frozen = self.restart.as_ref().and_then(|r| r.taker);
        let celebrating = self.state == MatchState::GoalCelebration;
        let focus = self.celebration_scorer.map(|id| self.players[id].body.position);
        let timers = AiTimers { match_time: self.match_time, kickoff_elapsed: self.kickoff_elapsed };

        let snapshots: Vec<PlayerSnapshot> = self.players.iter().map(PlayerSnapshot::from).collect();
        let frame = PerceptionFrame::new(&snapshots, &self.ball, timers).with_kicks(kicks);
        let contexts: Vec<Option<AiContext>> = self
            .players
            .iter_mut()
            .map(|player| {
                if player.knocked_down || Some(player.id) == human || Some(player.id) == frozen {
                    return None;
                }
                let mut ctx = frame.build(&snapshots[player.id], player.ai.half_latch_mut(), focus);
                if celebrating {
                    // Nobody goes after the ball while a goal is celebrated
                    ctx.authorized_chaser = false;
                }
                Some(ctx)
            })
            .collect();

        let mut touches = Vec::new();
        for (player, ctx) in self.players.iter_mut().zip(contexts) {
            if player.knocked_down {
                movement::update_knockdown(player, dt);
                movement::integrate_player(player, dt);
                continue;
            }
            // The restart step positions its taker
            if Some(player.id) == frozen {
                continue;
            }

            if Some(player.id) == human {
                if kicks {
                    touches.extend(movement::drive_human(player, &mut self.ball, input.movement, edges, &params));
                } else {
                    player.body.velocity = movement::human_velocity(player, input.movement, params.global_speed);
                }
            } else if let Some(ctx) = ctx {
                let intent = player.ai.update(&ctx, &mut player.body, &mut player.rng, dt);
                movement::scale_ai_velocity(player, &params);
                if kicks {
                    if let Some(intent) = intent {
                        touches.extend(movement::execute_intent(player, &mut self.ball, &intent, &params));
                    }
                    let state = player.ai.current();
                    touches.extend(movement::ai_auto_kick(player, &mut self.ball, state, &params));
                }
            }

            movement::integrate_player(player, dt);
            if player.is_goalkeeper() && Some(player.id) != human {
                contain_goalkeeper(player.side, &mut player.body);
            }
        }
        touches
    }

    fn resolve_touches(&mut self, touches: Vec<Touch>) {
        for touch in touches {
            match touch {
                Touch::Kick { player, power } => {
                    log::trace!("player {} kicked the ball ({:.0})", player, power);
                    self.play(SoundRequest::cue(AudioCue::Kick).with_volume(power / FULL_VOLUME_KICK));
                }
                Touch::TackleAttempt { player } => {
                    if movement::attempt_tackle(&mut self.players[player], &mut self.ball, self.match_time) {
                        log::trace!("player {} won a tackle", player);
                        self.play(SoundRequest::cue(AudioCue::Tackle));
                    }
                }
            }
        }
    }

    fn nearest_to_ball(&self, side: TeamSide, exclude: Option<PlayerId>) -> Option<PlayerId> {
        let ball = self.ball.position();
        self.players
            .iter()
            .filter(|p| p.side == side && !p.knocked_down && Some(p.id) != exclude)
            .min_by(|a, b| distance(a.body.position, ball).total_cmp(&distance(b.body.position, ball)))
            .map(|p| p.id)
    }

    /// Move the controlled flag; the released player's AI restarts in Idle
    fn set_controlled(&mut self, id: PlayerId) {
        let previous = self.controlled;
        if previous != id {
            self.players[previous].ai.force(AiStateKind::Idle);
            self.players[previous].charge = ChargeState::default();
        }
        for player in &mut self.players {
            player.controlled = player.id == id;
        }
        self.controlled = id;
    }

    fn switch_control(&mut self) {
        let current = self.controlled;
        if let Some(next) = self.nearest_to_ball(HUMAN_SIDE, Some(current)) {
            self.set_controlled(next);
            log::debug!("control switched from player {} to {}", current, next);
        }
    }

    // ============================================================
    // Ball events
    // ============================================================

    /// Frame contact, goal and out-of-play checks for the ball's new position
    fn check_ball(&mut self, dt: f32) {
        let hit_frame = resolve_goal_frame(&mut self.ball).is_some();
        if !hit_frame && !self.goal_latched {
            if let Some(end) = detect_goal(&self.ball) {
                self.score_goal(end);
            } else if let Some(out) = classify_out_of_bounds(&self.ball) {
                self.begin_restart(out);
                return;
            }
        }

        if let Some(pending) = self.pending_goal.as_mut() {
            pending.delay -= dt;
            if pending.delay <= 0.0 {
                self.start_celebration();
            }
        }
    }

    fn score_goal(&mut self, end: GoalEnd) {
        let conceding = end.defender();
        let scoring = conceding.opponent();
        let toucher = self.ball.last_toucher();
        let own_goal = toucher.is_some_and(|id| self.players[id].side == conceding);
        let scorer = toucher
            .filter(|&id| self.players[id].side == scoring)
            .or_else(|| self.nearest_to_ball(scoring, None));

        self.score.add(scoring);
        self.goal_latched = true;
        self.pending_goal = Some(PendingGoal {
            scoring_side: scoring,
            scorer,
            own_goal,
            delay: self.config.goal_celebration_delay_secs,
        });
        self.kickoff_side = conceding;
        self.goals.push(GoalRecord { side: scoring, scorer, own_goal, clock: self.clock.reading() });

        self.play(SoundRequest::cue(AudioCue::Goal).once());
        self.play(SoundRequest::cue(AudioCue::CrowdCheer));
        log::info!(
            "goal for {:?}{} ({}-{})",
            scoring,
            if own_goal { " (own goal)" } else { "" },
            self.score.home,
            self.score.away
        );
    }

    fn start_celebration(&mut self) {
        let Some(goal) = self.pending_goal.take() else {
            return;
        };
        self.goal_latched = false;

        let scorer_position =
            goal.scorer.map(|id| self.players[id].body.position).unwrap_or_else(|| self.ball.position());
        let (teammates, opponents): (Vec<&Player>, Vec<&Player>) = self
            .players
            .iter()
            .filter(|p| Some(p.id) != goal.scorer)
            .partition(|p| p.side == goal.scoring_side);
        let request = CelebrationRequest {
            scoring_side: goal.scoring_side,
            scorer: goal.scorer,
            scorer_position,
            teammates: teammates.iter().map(|p| p.id).collect(),
            opponents: opponents.iter().map(|p| p.id).collect(),
            own_goal: goal.own_goal,
        };
        self.collaborators.celebration.start(request);

        for player in &mut self.players {
            let kind = if Some(player.id) == goal.scorer {
                AiStateKind::CelebrationRun
            } else if player.side == goal.scoring_side {
                AiStateKind::CelebrationChase
            } else {
                AiStateKind::Idle
            };
            player.charge = ChargeState::default();
            player.ai.force(kind);
        }
        self.celebration_scorer = goal.scorer;
        self.set_state(MatchState::GoalCelebration);
    }

    fn begin_restart(&mut self, out: OutOfPlay) {
        let toucher_side = self.ball.last_toucher().map(|id| self.players[id].side);
        let award = award_restart(out, toucher_side);
        let taker = find_taker(&self.players, &award);

        if award.side == HUMAN_SIDE {
            if let Some(id) = taker {
                self.set_controlled(id);
            }
        }
        let human = self.control_mode == ControlMode::Human && taker == Some(self.controlled);
        let mut restart = Restart::new(award, taker, human, self.config.restart_timer_secs);
        if !human {
            restart.plan_ai(&self.players, &mut self.rng);
        }

        self.ball.place(award.spot);
        if let Some(id) = taker {
            let position = taker_position(&restart);
            let player = &mut self.players[id];
            player.body.position = position;
            player.body.velocity = Vec2::zeros();
            player.body.facing = restart.direction;
            player.charge = ChargeState::default();
            player.ai.force(AiStateKind::Idle);
        }

        log::info!(
            "{:?} to {:?} at ({:.0}, {:.0}), taker {:?}",
            award.kind,
            award.side,
            award.spot.x,
            award.spot.y,
            taker
        );
        self.play(SoundRequest::cue(AudioCue::Whistle));
        self.restart = Some(restart);
        self.set_state(MatchState::for_restart(award.kind));
    }

    fn execute_restart(&mut self) {
        let Some(restart) = self.restart.take() else {
            return;
        };
        match restart.taker {
            Some(id) => {
                let taker = &mut self.players[id];
                let (velocity, lift) = restart.launch(taker.base_speed());
                taker.last_kick_time = self.match_time;
                self.ball.place(restart.spot);
                self.ball.kick(velocity, lift, Some(id));
                log::debug!("{:?} taken by player {} (charge {:.2})", restart.kind, id, restart.charge);
                self.play(SoundRequest::cue(AudioCue::Kick));
            }
            None => log::debug!("{:?} had no taker, play resumes", restart.kind),
        }
        self.restart_grace = contact::RESTART_GRACE_SECS;
        self.set_state(MatchState::Playing);
    }

    // ============================================================
    // Transitions
    // ============================================================

    fn set_state(&mut self, next: MatchState) {
        if next != self.state {
            log::debug!("match state {:?} -> {:?}", self.state, next);
        }
        self.state = next;
    }

    fn enter_countdown(&mut self) {
        self.state_timer = self.config.countdown_secs;
        self.set_state(MatchState::Countdown);
    }

    fn kick_off(&mut self) {
        self.kickoff_elapsed = 0.0;
        self.set_state(MatchState::Playing);
        self.play(SoundRequest::cue(AudioCue::Whistle));
        log::info!("kickoff: {:?} to play", self.kickoff_side);
    }

    /// Formation reset with `side` taking the kickoff
    fn reset_for_kickoff(&mut self, side: TeamSide) {
        self.ball.place(center_spot());
        self.ball.clear_toucher();
        self.restart = None;
        self.restart_grace = 0.0;
        self.pending_goal = None;
        self.goal_latched = false;
        self.kickoff_side = side;
        self.kickoff_elapsed = 0.0;

        for player in &mut self.players {
            player.body.position = kickoff_position(player.home_position, player.side);
            player.body.velocity = Vec2::zeros();
            player.body.facing = vec2(player.side.attack_sign(), 0.0);
            player.knocked_down = false;
            player.knockdown_timer = 0.0;
            player.charge = ChargeState::default();
            player.ai.force(AiStateKind::Idle);
        }

        let taker = kickoff_taker(&self.players, side);
        if let Some(id) = taker {
            self.players[id].body.position = kicker_position(side);
        }
        let next = match taker {
            Some(id) if side == HUMAN_SIDE => Some(id),
            _ => self.nearest_to_ball(HUMAN_SIDE, None),
        };
        if let Some(id) = next {
            self.set_controlled(id);
        }
    }

    fn enter_final_score(&mut self) {
        self.state_timer = self.config.final_score_secs;
        self.set_state(MatchState::FinalScore);
        for player in &mut self.players {
            player.body.velocity = Vec2::zeros();
            player.charge = ChargeState::default();
        }
        if !self.final_whistle_played {
            self.final_whistle_played = true;
            self.play(SoundRequest::cue(AudioCue::FinalWhistle).once());
        }
        log::info!(
            "full time: {} {}-{} {}",
            self.teams[0].name,
            self.score.home,
            self.score.away,
            self.teams[1].name
        );
    }

    fn end_match(&mut self) {
        self.set_state(MatchState::Ended);
        if self.outcome.is_none() {
            let outcome = MatchOutcome {
                home_team: self.teams[0].name.clone(),
                away_team: self.teams[1].name.clone(),
                home_goals: self.score.home,
                away_goals: self.score.away,
            };
            self.collaborators.recorder.record(&outcome);
            self.outcome = Some(outcome);
        }
    }

    fn play(&mut self, request: SoundRequest) {
        self.collaborators.audio.play(request);
    }

    // ============================================================
    // Queries
    // ============================================================

    pub fn state(&self) -> MatchState {
        self.state
    }

    pub fn score(&self) -> Score {
        self.score
    }

    pub fn goals(&self) -> &[GoalRecord] {
        &self.goals
    }

    pub fn clock(&self) -> ClockReading {
        self.clock.reading()
    }

    pub fn ball(&self) -> &Ball {
        &self.ball
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.get(id)
    }

    pub fn teams(&self) -> &[Team; 2] {
        &self.teams
    }

    pub fn controlled_player(&self) -> &Player {
        &self.players[self.controlled]
    }

    pub fn restart(&self) -> Option<&Restart> {
        self.restart.as_ref()
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    pub fn control_mode(&self) -> ControlMode {
        self.control_mode
    }

    pub fn set_control_mode(&mut self, mode: ControlMode) {
        if mode != self.control_mode {
            self.players[self.controlled].ai.force(AiStateKind::Idle);
            self.control_mode = mode;
        }
    }

    pub fn kickoff_side(&self) -> TeamSide {
        self.kickoff_side
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn is_finished(&self) -> bool {
        self.state == MatchState::Ended
    }

    pub fn outcome(&self) -> Option<&MatchOutcome> {
        self.outcome.as_ref()
    }

    /// 3, 2, 1 during the countdown, then None for the "GO" tail
    pub fn countdown_number(&self) -> Option<u32> {
        if self.state != MatchState::Countdown {
            return None;
        }
        let remaining = self.state_timer - COUNTDOWN_GO_SECS;
        (remaining > 0.0).then(|| remaining.ceil() as u32)
    }

    pub fn snapshot(&self) -> MatchSnapshot {
        let human = self.human_driven();
        MatchSnapshot {
            tick: self.ticks,
            state: self.state,
            clock: self.clock.reading(),
            score: self.score,
            countdown: self.countdown_number(),
            players: self.players.iter().map(|p| PlayerView::of(p, human == Some(p.id))).collect(),
            ball: BallView {
                position: self.ball.position(),
                height: self.ball.height(),
                velocity: self.ball.velocity(),
                last_toucher: self.ball.last_toucher(),
            },
            restart: self.restart.as_ref().map(RestartView::from),
            camera: if self.state == MatchState::GoalCelebration {
                self.collaborators.celebration.camera_override()
            } else {
                None
            },
        }
    }

    #[cfg(test)]
    pub(crate) fn ball_mut(&mut self) -> &mut Ball {
        &mut self.ball
    }

    #[cfg(test)]
    pub(crate) fn players_mut(&mut self) -> &mut [Player] {
        &mut self.players
    }

    /// Skip camera intro and countdown
    #[cfg(test)]
    pub(crate) fn start_play(&mut self) {
        self.kick_off();
    }
}
