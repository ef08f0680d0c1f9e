//! AI perception layer
//!
//! A fresh [`AiContext`] is built for every AI player on every tick from a
//! read-only [`PerceptionFrame`]. Nothing here is cached between ticks except
//! the half-occupancy latch, which needs the previous value for hysteresis.

use super::ball::Ball;
use super::geometry::{distance, point_segment_distance, Vec2};
use super::physics_constants::{ai, field, player as pc};
use crate::models::{Player, PlayerId, PositionRole, Skills, TacticalRole, TeamSide};

/// Per-tick copy of what perception needs from a player
#[derive(Debug, Clone, Copy)]
pub struct PlayerSnapshot {
    pub id: PlayerId,
    pub side: TeamSide,
    pub role: TacticalRole,
    pub skills: Skills,
    pub position: Vec2,
    pub velocity: Vec2,
    pub home_position: Vec2,
    pub base_speed: f32,
    pub knocked_down: bool,
    pub last_kick_time: f32,
}

impl From<&Player> for PlayerSnapshot {
    fn from(p: &Player) -> Self {
        Self {
            id: p.id,
            side: p.side,
            role: p.role,
            skills: p.skills,
            position: p.body.position,
            velocity: p.body.velocity,
            home_position: p.home_position,
            base_speed: p.base_speed(),
            knocked_down: p.knocked_down,
            last_kick_time: p.last_kick_time,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    pub id: PlayerId,
    pub position: Vec2,
    pub distance: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PassTarget {
    pub id: PlayerId,
    pub position: Vec2,
    pub score: f32,
    pub blocked: bool,
    /// Teammate's distance to the opponent goal
    pub distance_to_goal: f32,
}

/// Ball-half occupancy with hysteresis around the center line
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HalfLatch {
    attacking: bool,
}

impl HalfLatch {
    /// Flip only once the ball is clearly past the center line
    pub fn update(&mut self, ball_x: f32, side: TeamSide) -> bool {
        let rel = (ball_x - field::CENTER_X) * side.attack_sign();
        if rel > ai::HALF_HYSTERESIS {
            self.attacking = true;
        } else if rel < -ai::HALF_HYSTERESIS {
            self.attacking = false;
        }
        self.attacking
    }

    pub fn attacking(&self) -> bool {
        self.attacking
    }
}

/// Match clock values perception exposes to AI states
#[derive(Debug, Clone, Copy, Default)]
pub struct AiTimers {
    /// Seconds since match setup
    pub match_time: f32,
    /// Seconds since the last kickoff whistle
    pub kickoff_elapsed: f32,
}

/// One player's view of the world for one tick
#[derive(Debug, Clone)]
pub struct AiContext {
    pub player_id: PlayerId,
    pub side: TeamSide,
    pub role: TacticalRole,
    pub position_role: PositionRole,
    pub skills: Skills,
    pub position: Vec2,
    pub velocity: Vec2,
    pub home_position: Vec2,
    /// Base speed before stamina/difficulty/global multipliers
    pub max_speed: f32,

    pub ball_position: Vec2,
    pub ball_velocity: Vec2,
    pub ball_height: f32,
    pub distance_to_ball: f32,
    pub has_possession: bool,
    /// Off cooldown and kicks are allowed this tick
    pub kick_ready: bool,

    pub nearest_opponent: Option<Neighbor>,
    pub nearest_teammate: Option<Neighbor>,
    /// Closest opponent's distance to the ball
    pub opponent_distance_to_ball: Option<f32>,
    pub best_pass_target: Option<PassTarget>,

    pub ball_in_attacking_half: bool,
    pub ball_in_defending_half: bool,
    /// Only the closest outfield teammate may chase; goalkeepers are exempt
    pub authorized_chaser: bool,

    pub own_goal: Vec2,
    pub opponent_goal: Vec2,
    pub distance_to_opponent_goal: f32,

    pub timers: AiTimers,
    /// Scorer position while a celebration runs
    pub celebration_focus: Option<Vec2>,
}

impl AiContext {
    pub fn attack_sign(&self) -> f32 {
        self.side.attack_sign()
    }

    pub fn is_goalkeeper(&self) -> bool {
        self.position_role == PositionRole::Goalkeeper
    }

    pub fn in_kickoff_window(&self) -> bool {
        self.timers.kickoff_elapsed < ai::KICKOFF_WINDOW_SECS
    }

    /// Nearest-opponent pressure check
    pub fn is_pressured(&self) -> bool {
        self.nearest_opponent.map_or(false, |o| o.distance < ai::PRESSURE_RADIUS)
    }

    /// How much closer to goal the pass target is than this player
    pub fn pass_progress(&self, target: &PassTarget) -> f32 {
        self.distance_to_opponent_goal - target.distance_to_goal
    }
}

/// Shared per-tick perception input
pub struct PerceptionFrame<'a> {
    pub players: &'a [PlayerSnapshot],
    pub ball: &'a Ball,
    pub timers: AiTimers,
    chasers: [Option<PlayerId>; 2],
    kicks_allowed: bool,
}

fn side_index(side: TeamSide) -> usize {
    match side {
        TeamSide::Home => 0,
        TeamSide::Away => 1,
    }
}

impl<'a> PerceptionFrame<'a> {
    pub fn new(players: &'a [PlayerSnapshot], ball: &'a Ball, timers: AiTimers) -> Self {
        let chasers = [
            designated_chaser(players, ball, TeamSide::Home),
            designated_chaser(players, ball, TeamSide::Away),
        ];
        Self { players, ball, timers, chasers, kicks_allowed: true }
    }

    /// Kicks are off during restarts, celebrations and the post-restart grace
    pub fn with_kicks(mut self, allowed: bool) -> Self {
        self.kicks_allowed = allowed;
        self
    }

    pub fn chaser(&self, side: TeamSide) -> Option<PlayerId> {
        self.chasers[side_index(side)]
    }

    /// Build the context for `me`, advancing its half latch
    pub fn build(
        &self,
        me: &PlayerSnapshot,
        latch: &mut HalfLatch,
        celebration_focus: Option<Vec2>,
    ) -> AiContext {
        let ball_position = self.ball.position();
        let distance_to_ball = distance(me.position, ball_position);
        let opponent_goal = me.side.opponent_goal();

        let attacking = latch.update(ball_position.x, me.side);
        let position_role = me.role.group();

        AiContext {
            player_id: me.id,
            side: me.side,
            role: me.role,
            position_role,
            skills: me.skills,
            position: me.position,
            velocity: me.velocity,
            home_position: me.home_position,
            max_speed: me.base_speed,
            ball_position,
            ball_velocity: self.ball.velocity(),
            ball_height: self.ball.height(),
            distance_to_ball,
            has_possession: distance_to_ball < pc::POSSESSION_RADIUS
                && self.ball.height() < pc::KICK_RADIUS / 2.0,
            kick_ready: self.kicks_allowed
                && self.timers.match_time - me.last_kick_time >= pc::KICK_COOLDOWN,
            nearest_opponent: self.nearest(me, false),
            nearest_teammate: self.nearest(me, true),
            opponent_distance_to_ball: self
                .active()
                .filter(|p| p.side != me.side)
                .map(|p| distance(p.position, ball_position))
                .reduce(f32::min),
            best_pass_target: self.best_pass_target(me),
            ball_in_attacking_half: attacking,
            ball_in_defending_half: !attacking,
            authorized_chaser: position_role == PositionRole::Goalkeeper
                || self.chaser(me.side) == Some(me.id),
            own_goal: me.side.own_goal(),
            opponent_goal,
            distance_to_opponent_goal: distance(me.position, opponent_goal),
            timers: self.timers,
            celebration_focus,
        }
    }

    fn active(&self) -> impl Iterator<Item = &PlayerSnapshot> {
        self.players.iter().filter(|p| !p.knocked_down)
    }

    fn nearest(&self, me: &PlayerSnapshot, teammates: bool) -> Option<Neighbor> {
        self.active()
            .filter(|p| p.id != me.id && (p.side == me.side) == teammates)
            .map(|p| Neighbor { id: p.id, position: p.position, distance: distance(p.position, me.position) })
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
    }

    /// Score = 1000 - teammate distance to goal, minus 5000 when an opponent
    /// sits within 60 units of the passing lane.
    fn best_pass_target(&self, me: &PlayerSnapshot) -> Option<PassTarget> {
        let goal = me.side.opponent_goal();
        self.active()
            .filter(|p| p.id != me.id && p.side == me.side)
            .map(|mate| {
                let blocked = self.active().filter(|o| o.side != me.side).any(|o| {
                    point_segment_distance(o.position, me.position, mate.position)
                        < ai::PASS_BLOCK_RADIUS
                });
                let distance_to_goal = distance(mate.position, goal);
                let mut score = ai::PASS_SCORE_BASE - distance_to_goal;
                if blocked {
                    score -= ai::PASS_BLOCKED_PENALTY;
                }
                PassTarget { id: mate.id, position: mate.position, score, blocked, distance_to_goal }
            })
            .max_by(|a, b| a.score.total_cmp(&b.score))
    }
}

/// Closest non-goalkeeper, non-knocked-down player of `side` to the ball
pub fn designated_chaser(players: &[PlayerSnapshot], ball: &Ball, side: TeamSide) -> Option<PlayerId> {
    players
        .iter()
        .filter(|p| p.side == side && !p.knocked_down && p.role != TacticalRole::GK)
        .min_by(|a, b| {
            distance(a.position, ball.position()).total_cmp(&distance(b.position, ball.position()))
        })
        .map(|p| p.id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::geometry::vec2;
    use crate::test_fixtures::snapshot;

    fn frame_with<'a>(players: &'a [PlayerSnapshot], ball: &'a Ball) -> PerceptionFrame<'a> {
        PerceptionFrame::new(players, ball, AiTimers::default())
    }

    #[test]
    fn test_half_latch_hysteresis() {
        let mut latch = HalfLatch::default();
        assert!(!latch.update(field::CENTER_X + 50.0, TeamSide::Home));
        assert!(latch.update(field::CENTER_X + 150.0, TeamSide::Home));
        // Inside the band keeps the previous value
        assert!(latch.update(field::CENTER_X - 50.0, TeamSide::Home));
        assert!(!latch.update(field::CENTER_X - 150.0, TeamSide::Home));
        // Away attacks toward decreasing X
        let mut away = HalfLatch::default();
        assert!(away.update(field::CENTER_X - 150.0, TeamSide::Away));
    }

    #[test]
    fn test_only_closest_outfield_player_chases() {
        let players = vec![
            snapshot(0, TeamSide::Home, TacticalRole::GK, vec2(1000.0, 1000.0)),
            snapshot(1, TeamSide::Home, TacticalRole::CB, vec2(1100.0, 1000.0)),
            snapshot(2, TeamSide::Home, TacticalRole::ST, vec2(1400.0, 1000.0)),
            snapshot(11, TeamSide::Away, TacticalRole::ST, vec2(1300.0, 1000.0)),
        ];
        let ball = Ball::at(vec2(1010.0, 1000.0));
        let frame = frame_with(&players, &ball);
        assert_eq!(frame.chaser(TeamSide::Home), Some(1));
        assert_eq!(frame.chaser(TeamSide::Away), Some(11));

        let mut latch = HalfLatch::default();
        assert!(frame.build(&players[0], &mut latch, None).authorized_chaser); // keeper exempt
        assert!(frame.build(&players[1], &mut latch, None).authorized_chaser);
        assert!(!frame.build(&players[2], &mut latch, None).authorized_chaser);
    }

    #[test]
    fn test_knocked_down_players_are_ignored() {
        let mut players = vec![
            snapshot(1, TeamSide::Home, TacticalRole::CM, vec2(1000.0, 1000.0)),
            snapshot(2, TeamSide::Home, TacticalRole::CM, vec2(1050.0, 1000.0)),
            snapshot(3, TeamSide::Home, TacticalRole::CM, vec2(1300.0, 1000.0)),
            snapshot(12, TeamSide::Away, TacticalRole::CM, vec2(1020.0, 1000.0)),
        ];
        players[1].knocked_down = true;
        players[3].knocked_down = true;
        let ball = Ball::at(vec2(1060.0, 1000.0));
        let frame = frame_with(&players, &ball);
        let ctx = frame.build(&players[0], &mut HalfLatch::default(), None);
        assert_eq!(ctx.nearest_teammate.map(|n| n.id), Some(3));
        assert!(ctx.nearest_opponent.is_none());
        assert_eq!(frame.chaser(TeamSide::Home), Some(1));
    }

    #[test]
    fn test_blocked_lane_penalized() {
        let players = vec![
            snapshot(1, TeamSide::Home, TacticalRole::CB, vec2(800.0, 1000.0)),
            // Far forward but behind an opponent
            snapshot(2, TeamSide::Home, TacticalRole::ST, vec2(2400.0, 1000.0)),
            // Less advanced, open lane
            snapshot(3, TeamSide::Home, TacticalRole::LM, vec2(1400.0, 500.0)),
            snapshot(12, TeamSide::Away, TacticalRole::CB, vec2(1600.0, 1020.0)),
        ];
        let ball = Ball::at(vec2(810.0, 1000.0));
        let frame = frame_with(&players, &ball);
        let ctx = frame.build(&players[0], &mut HalfLatch::default(), None);
        let target = ctx.best_pass_target.unwrap();
        assert_eq!(target.id, 3);
        assert!(!target.blocked);
    }

    #[test]
    fn test_possession_requires_grounded_close_ball() {
        let players = vec![snapshot(5, TeamSide::Away, TacticalRole::CM, vec2(1000.0, 1000.0))];
        let ball = Ball::at(vec2(1030.0, 1000.0));
        let frame = frame_with(&players, &ball);
        let ctx = frame.build(&players[0], &mut HalfLatch::default(), None);
        assert!(ctx.has_possession);
        // Away attacks toward the left goal
        assert!(ctx.ball_in_attacking_half);

        let far = Ball::at(vec2(1100.0, 1000.0));
        let frame = frame_with(&players, &far);
        assert!(!frame.build(&players[0], &mut HalfLatch::default(), None).has_possession);
    }

    #[test]
    fn test_kick_ready_tracks_cooldown_and_kick_window() {
        let mut players = vec![snapshot(4, TeamSide::Home, TacticalRole::CM, vec2(1000.0, 1000.0))];
        let ball = Ball::at(vec2(1030.0, 1000.0));
        let timers = AiTimers { match_time: 20.0, kickoff_elapsed: 5.0 };

        players[0].last_kick_time = 19.9;
        let frame = PerceptionFrame::new(&players, &ball, timers);
        assert!(!frame.build(&players[0], &mut HalfLatch::default(), None).kick_ready);

        players[0].last_kick_time = 19.5;
        let frame = PerceptionFrame::new(&players, &ball, timers);
        assert!(frame.build(&players[0], &mut HalfLatch::default(), None).kick_ready);

        let frame = PerceptionFrame::new(&players, &ball, timers).with_kicks(false);
        assert!(!frame.build(&players[0], &mut HalfLatch::default(), None).kick_ready);
    }
}
