//! Set-piece restarts: throw-ins, corner kicks and goal kicks
//!
//! An out-of-play event becomes a [`RestartAward`] (who restarts, where).
//! The engine then builds a [`Restart`], relocates the taker and steps it
//! every tick until it executes, either from human input, from the AI's
//! scripted plan, or because the restart timer ran out.

use super::ball::{GoalEnd, OutOfPlay};
use super::behaviors::dribbling::sideline_distance;
use super::geometry::{direction_to, distance, normalize_or_zero, rotate, vec2, Vec2};
use super::movement::ActionEdges;
use super::physics_constants::{field, player as pc, restart as rc};
use crate::models::{Body, Player, PlayerId, PositionRole, TeamSide};
use rand::Rng;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RestartKind {
    ThrowIn,
    CornerKick,
    GoalKick,
}

impl RestartKind {
    /// AI takers execute once the restart timer drops below this
    pub fn ai_threshold(self) -> f32 {
        match self {
            RestartKind::ThrowIn => rc::AI_THROW_THRESHOLD,
            RestartKind::CornerKick => rc::AI_CORNER_THRESHOLD,
            RestartKind::GoalKick => rc::AI_GOAL_KICK_THRESHOLD,
        }
    }
}

/// Who restarts play and from where
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RestartAward {
    pub kind: RestartKind,
    pub side: TeamSide,
    pub spot: Vec2,
}

fn corner_spot(end: GoalEnd, y: f32) -> Vec2 {
    let inward = if end == GoalEnd::Left { 1.0 } else { -1.0 };
    let top = y < field::CENTER_Y;
    let sideline_y = if top {
        field::TOP_SIDELINE + rc::PLACEMENT_INSET
    } else {
        field::BOTTOM_SIDELINE - rc::PLACEMENT_INSET
    };
    vec2(end.line_x() + inward * rc::PLACEMENT_INSET, sideline_y)
}

fn goal_kick_spot(end: GoalEnd, y: f32) -> Vec2 {
    let inward = if end == GoalEnd::Left { 1.0 } else { -1.0 };
    let half = field::SIX_YARD_HEIGHT / 2.0;
    vec2(
        end.line_x() + inward * field::SIX_YARD_DEPTH,
        y.clamp(field::CENTER_Y - half, field::CENTER_Y + half),
    )
}

/// Apply the restart rules to an out-of-play event.
///
/// Over the goal line a defender's touch gives a corner, anything else a goal
/// kick. Over a sideline the team that did not touch it last throws in; with
/// no recorded toucher the team defending the nearer goal gets it.
pub fn award_restart(out: OutOfPlay, last_toucher: Option<TeamSide>) -> RestartAward {
    match out {
        OutOfPlay::GoalLine { end, y, .. } => {
            let defender = end.defender();
            if last_toucher == Some(defender) {
                RestartAward { kind: RestartKind::CornerKick, side: defender.opponent(), spot: corner_spot(end, y) }
            } else {
                RestartAward { kind: RestartKind::GoalKick, side: defender, spot: goal_kick_spot(end, y) }
            }
        }
        OutOfPlay::Sideline { top, x } => {
            let side = match last_toucher {
                Some(toucher) => toucher.opponent(),
                None if x < field::CENTER_X => TeamSide::Home,
                None => TeamSide::Away,
            };
            let y = if top { field::TOP_SIDELINE } else { field::BOTTOM_SIDELINE };
            let x = x.clamp(
                field::LEFT_GOAL_LINE + rc::PLACEMENT_INSET,
                field::RIGHT_GOAL_LINE - rc::PLACEMENT_INSET,
            );
            RestartAward { kind: RestartKind::ThrowIn, side, spot: vec2(x, y) }
        }
    }
}

/// Toward the field center, leaning toward the attacking end
pub fn default_direction(side: TeamSide, spot: Vec2) -> Vec2 {
    let center = vec2(field::CENTER_X, field::CENTER_Y);
    let dir = normalize_or_zero(direction_to(spot, center) + vec2(side.attack_sign() * 0.5, 0.0));
    if dir.norm() > f32::EPSILON {
        dir
    } else {
        vec2(side.attack_sign(), 0.0)
    }
}

fn nearest_to<'a>(spot: Vec2, candidates: impl Iterator<Item = &'a Player>) -> Option<PlayerId> {
    candidates
        .min_by(|a, b| distance(a.body.position, spot).total_cmp(&distance(b.body.position, spot)))
        .map(|p| p.id)
}

/// Nearest eligible player of the restarting side. Keepers take goal kicks;
/// otherwise outfield players are preferred, then anyone standing.
pub fn find_taker(players: &[Player], award: &RestartAward) -> Option<PlayerId> {
    let side = award.side;
    let standing = || players.iter().filter(move |p| p.side == side && !p.knocked_down);

    if award.kind == RestartKind::GoalKick {
        if let Some(keeper) = standing().find(|p| p.is_goalkeeper()) {
            return Some(keeper.id);
        }
    }
    nearest_to(award.spot, standing().filter(|p| !p.is_goalkeeper()))
        .or_else(|| nearest_to(award.spot, standing()))
}

/// Where the taker stands while the restart is prepared
pub fn taker_position(restart: &Restart) -> Vec2 {
    match restart.kind {
        RestartKind::ThrowIn => {
            let outward = if restart.spot.y < field::CENTER_Y { -1.0 } else { 1.0 };
            restart.spot + vec2(0.0, outward * rc::TAKER_OFFSET)
        }
        RestartKind::CornerKick if restart.human => restart.spot - restart.direction * rc::CORNER_RUNUP_DISTANCE,
        RestartKind::CornerKick | RestartKind::GoalKick => restart.spot - restart.direction * rc::TAKER_OFFSET,
    }
}

/// Position-type bonus when choosing a throw-in receiver
fn receiver_bonus(role: PositionRole) -> f32 {
    match role {
        PositionRole::Midfielder => 60.0,
        PositionRole::Forward => 40.0,
        PositionRole::Defender => 20.0,
        PositionRole::Goalkeeper => -200.0,
    }
}

/// Weighted throw-in receiver score, `None` beyond throwing range
pub fn throw_receiver_score(candidate: &Player, spot: Vec2, players: &[Player]) -> Option<f32> {
    let dist = distance(candidate.body.position, spot);
    if dist > rc::THROW_MAX_DISTANCE {
        return None;
    }
    let progress = (candidate.body.position.x - spot.x) * candidate.side.attack_sign();
    let crowd = players
        .iter()
        .filter(|o| o.side != candidate.side && !o.knocked_down)
        .filter(|o| distance(o.body.position, candidate.body.position) < rc::THROW_CROWD_RADIUS)
        .count() as f32;

    let mut score = progress * rc::THROW_PROGRESS_WEIGHT - crowd * rc::THROW_CROWD_PENALTY
        + receiver_bonus(candidate.position_role())
        - dist * rc::THROW_DISTANCE_WEIGHT;
    if sideline_distance(candidate.body.position.y) < rc::THROW_SIDELINE_MARGIN {
        score -= rc::THROW_SIDELINE_PENALTY;
    }
    Some(score)
}

pub fn best_throw_receiver(players: &[Player], taker: PlayerId, spot: Vec2) -> Option<&Player> {
    let side = players.iter().find(|p| p.id == taker)?.side;
    players
        .iter()
        .filter(|p| p.side == side && p.id != taker && !p.knocked_down)
        .filter_map(|p| throw_receiver_score(p, spot, players).map(|s| (p, s)))
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(p, _)| p)
}

/// Human restart progress
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum RestartPhase {
    Aiming,
    /// Throw-in release animation gate
    WindUp { remaining: f32 },
    /// Corner taker running onto the ball
    RunUp,
}

/// A restart in progress
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Restart {
    pub kind: RestartKind,
    pub side: TeamSide,
    pub spot: Vec2,
    pub taker: Option<PlayerId>,
    /// Seconds until the restart is taken regardless of input
    pub timer: f32,
    pub direction: Vec2,
    /// 0..1
    pub charge: f32,
    pub phase: RestartPhase,
    /// Taker is the human-controlled player
    pub human: bool,
}

impl Restart {
    pub fn new(award: RestartAward, taker: Option<PlayerId>, human: bool, timer: f32) -> Self {
        Self {
            kind: award.kind,
            side: award.side,
            spot: award.spot,
            taker,
            timer,
            direction: default_direction(award.side, award.spot),
            charge: if award.kind == RestartKind::GoalKick { rc::GOAL_KICK_CHARGE } else { 0.0 },
            phase: RestartPhase::Aiming,
            human,
        }
    }

    /// Scripted aim and power for an AI taker
    pub fn plan_ai(&mut self, players: &[Player], rng: &mut impl Rng) {
        let sign = self.side.attack_sign();
        match self.kind {
            RestartKind::GoalKick => {
                let target = vec2(
                    field::CENTER_X + sign * 500.0,
                    (self.spot.y + field::CENTER_Y) / 2.0 + rng.gen_range(-200.0..200.0),
                );
                self.direction = direction_to(self.spot, target);
            }
            RestartKind::CornerKick => {
                let target = vec2(
                    self.side.opponent_goal_line() - sign * field::SIX_YARD_DEPTH * rng.gen_range(0.3..1.0),
                    field::CENTER_Y + rng.gen_range(-0.5..0.5) * field::SIX_YARD_HEIGHT,
                );
                self.direction = direction_to(self.spot, target);
                self.charge = rng.gen_range(0.8..=1.0);
            }
            RestartKind::ThrowIn => {
                let receiver = self.taker.and_then(|t| best_throw_receiver(players, t, self.spot));
                match receiver {
                    Some(mate) => {
                        let dist = distance(self.spot, mate.body.position);
                        self.direction = direction_to(self.spot, mate.body.position);
                        self.charge = (dist / rc::THROW_MAX_DISTANCE).clamp(0.2, 1.0);
                    }
                    None => self.charge = 0.5,
                }
            }
        }
    }

    /// One tick of human control. Returns true when the restart should execute.
    pub fn step_human(&mut self, stick: Vec2, edges: ActionEdges, dt: f32, taker: Option<&mut Body>) -> bool {
        match self.phase {
            RestartPhase::Aiming => {
                if stick.x.abs() > f32::EPSILON {
                    self.direction = rotate(self.direction, stick.x * rc::AIM_TURN_RATE * dt);
                }
                if self.kind == RestartKind::GoalKick {
                    return edges.pressed;
                }
                if edges.held {
                    self.charge = (self.charge + rc::CHARGE_RATE * dt).min(1.0);
                }
                if edges.released {
                    self.phase = match self.kind {
                        RestartKind::ThrowIn => RestartPhase::WindUp { remaining: rc::THROW_WINDUP_SECS },
                        _ => RestartPhase::RunUp,
                    };
                }
                false
            }
            RestartPhase::WindUp { remaining } => {
                let remaining = remaining - dt;
                self.phase = RestartPhase::WindUp { remaining };
                remaining <= 0.0
            }
            RestartPhase::RunUp => match taker {
                Some(body) => {
                    let to_ball = self.spot - body.position;
                    if to_ball.norm() <= pc::KICK_RADIUS / 2.0 {
                        body.velocity = Vec2::zeros();
                        return true;
                    }
                    body.velocity = normalize_or_zero(to_ball) * rc::CORNER_RUNUP_SPEED;
                    body.position += body.velocity * dt;
                    false
                }
                None => true,
            },
        }
    }

    /// AI takers wait for their type-specific moment
    pub fn ai_ready(&self) -> bool {
        self.timer < self.kind.ai_threshold()
    }

    /// Ball velocity and lift for the taker's base speed
    pub fn launch(&self, taker_base_speed: f32) -> (Vec2, f32) {
        let dir = normalize_or_zero(self.direction);
        let lerp = |lo: f32, hi: f32| lo + (hi - lo) * self.charge;
        match self.kind {
            RestartKind::ThrowIn => {
                (dir * lerp(rc::THROW_MIN_POWER, rc::THROW_MAX_POWER), rc::THROW_LIFT * self.charge)
            }
            RestartKind::CornerKick => {
                (dir * lerp(rc::CORNER_MIN_POWER, rc::CORNER_MAX_POWER), rc::CORNER_LIFT * self.charge)
            }
            RestartKind::GoalKick => (
                dir * rc::GOAL_KICK_SPEED_FACTOR * taker_base_speed,
                rc::GOAL_KICK_LIFT * rc::GOAL_KICK_CHARGE,
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TacticalRole;
    use crate::test_fixtures::make_player;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_throw_in_goes_to_non_toucher() {
        let out = OutOfPlay::Sideline { top: true, x: 1200.0 };
        let award = award_restart(out, Some(TeamSide::Home));
        assert_eq!(award.kind, RestartKind::ThrowIn);
        assert_eq!(award.side, TeamSide::Away);
        assert_eq!(award.spot, vec2(1200.0, field::TOP_SIDELINE));

        let award = award_restart(out, Some(TeamSide::Away));
        assert_eq!(award.side, TeamSide::Home);
    }

    #[test]
    fn test_throw_in_without_toucher_uses_nearer_goal() {
        let award = award_restart(OutOfPlay::Sideline { top: false, x: 2800.0 }, None);
        assert_eq!(award.side, TeamSide::Away);
        assert_eq!(award.spot.y, field::BOTTOM_SIDELINE);
    }

    #[test]
    fn test_defender_touch_gives_corner() {
        let out = OutOfPlay::GoalLine { end: GoalEnd::Left, y: 500.0, over_bar: false };
        let award = award_restart(out, Some(TeamSide::Home));
        assert_eq!(award.kind, RestartKind::CornerKick);
        assert_eq!(award.side, TeamSide::Away);
        assert_eq!(
            award.spot,
            vec2(field::LEFT_GOAL_LINE + rc::PLACEMENT_INSET, field::TOP_SIDELINE + rc::PLACEMENT_INSET)
        );
    }

    #[test]
    fn test_attacker_touch_gives_goal_kick() {
        let out = OutOfPlay::GoalLine { end: GoalEnd::Right, y: field::CENTER_Y, over_bar: true };
        let award = award_restart(out, Some(TeamSide::Home));
        assert_eq!(award.kind, RestartKind::GoalKick);
        assert_eq!(award.side, TeamSide::Away);
        assert_eq!(award.spot.x, field::RIGHT_GOAL_LINE - field::SIX_YARD_DEPTH);
    }

    #[test]
    fn test_default_direction_points_into_field() {
        let dir = default_direction(TeamSide::Home, vec2(1000.0, field::TOP_SIDELINE));
        assert!(dir.y > 0.0);
        assert!(dir.x > 0.0);
        assert!((dir.norm() - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_keeper_takes_goal_kick() {
        let mut keeper = make_player(0, TeamSide::Home, TacticalRole::GK);
        keeper.body.position = vec2(400.0, field::CENTER_Y);
        let mut back = make_player(1, TeamSide::Home, TacticalRole::CB);
        back.body.position = vec2(395.0, field::CENTER_Y);
        let players = vec![keeper, back];
        let award = RestartAward { kind: RestartKind::GoalKick, side: TeamSide::Home, spot: vec2(390.0, field::CENTER_Y) };
        assert_eq!(find_taker(&players, &award), Some(0));

        let award = RestartAward { kind: RestartKind::ThrowIn, ..award };
        assert_eq!(find_taker(&players, &award), Some(1));
    }

    #[test]
    fn test_taker_falls_back_to_keeper() {
        let keeper = make_player(0, TeamSide::Home, TacticalRole::GK);
        let mut back = make_player(1, TeamSide::Home, TacticalRole::CB);
        back.knocked_down = true;
        let players = vec![keeper, back];
        let award = RestartAward { kind: RestartKind::ThrowIn, side: TeamSide::Home, spot: vec2(900.0, 250.0) };
        assert_eq!(find_taker(&players, &award), Some(0));
        let award = RestartAward { side: TeamSide::Away, ..award };
        assert_eq!(find_taker(&players, &award), None);
    }

    #[test]
    fn test_throw_receiver_prefers_open_forward_option() {
        let spot = vec2(1500.0, field::TOP_SIDELINE);
        let mut taker = make_player(5, TeamSide::Home, TacticalRole::LM);
        taker.body.position = spot;
        let mut ahead = make_player(9, TeamSide::Home, TacticalRole::ST);
        ahead.body.position = vec2(1800.0, 600.0);
        let mut behind = make_player(6, TeamSide::Home, TacticalRole::CM);
        behind.body.position = vec2(1300.0, 600.0);
        let mut marker = make_player(14, TeamSide::Away, TacticalRole::CB);
        marker.body.position = vec2(1320.0, 620.0);
        let mut far = make_player(7, TeamSide::Home, TacticalRole::CM);
        far.body.position = vec2(2400.0, 1500.0);
        let players = vec![taker, ahead, behind, marker, far];

        assert!(throw_receiver_score(&players[4], spot, &players).is_none());
        let best = best_throw_receiver(&players, 5, spot).map(|p| p.id);
        assert_eq!(best, Some(9));
    }

    #[test]
    fn test_human_throw_in_winds_up() {
        let award = RestartAward { kind: RestartKind::ThrowIn, side: TeamSide::Home, spot: vec2(1000.0, 250.0) };
        let mut restart = Restart::new(award, Some(3), true, 5.0);
        let dt = 1.0 / 60.0;
        for _ in 0..30 {
            assert!(!restart.step_human(Vec2::zeros(), ActionEdges::from_held(true, true), dt, None));
        }
        assert!((restart.charge - 0.5).abs() < 0.02);
        assert!(!restart.step_human(Vec2::zeros(), ActionEdges::from_held(true, false), dt, None));
        assert!(matches!(restart.phase, RestartPhase::WindUp { .. }));
        let mut fired = false;
        for _ in 0..30 {
            if restart.step_human(Vec2::zeros(), ActionEdges::default(), dt, None) {
                fired = true;
                break;
            }
        }
        assert!(fired);
    }

    #[test]
    fn test_corner_run_up_reaches_ball() {
        let award = RestartAward { kind: RestartKind::CornerKick, side: TeamSide::Home, spot: vec2(3035.0, 265.0) };
        let mut restart = Restart::new(award, Some(9), true, 5.0);
        let mut body = Body::at(taker_position(&restart), restart.direction);
        restart.step_human(Vec2::zeros(), ActionEdges::from_held(false, true), 0.1, Some(&mut body));
        restart.step_human(Vec2::zeros(), ActionEdges::from_held(true, false), 0.1, Some(&mut body));
        assert_eq!(restart.phase, RestartPhase::RunUp);
        let mut fired = false;
        for _ in 0..120 {
            if restart.step_human(Vec2::zeros(), ActionEdges::default(), 1.0 / 60.0, Some(&mut body)) {
                fired = true;
                break;
            }
        }
        assert!(fired);
    }

    #[test]
    fn test_goal_kick_fires_on_press() {
        let award = RestartAward { kind: RestartKind::GoalKick, side: TeamSide::Away, spot: vec2(2910.0, 1150.0) };
        let mut restart = Restart::new(award, Some(11), true, 5.0);
        assert!(!restart.step_human(Vec2::zeros(), ActionEdges::default(), 0.016, None));
        assert!(restart.step_human(Vec2::zeros(), ActionEdges::from_held(false, true), 0.016, None));
        let (velocity, lift) = restart.launch(300.0);
        assert!(velocity.x < 0.0);
        assert!((velocity.norm() - 900.0).abs() < 1.0);
        assert!(lift > 0.0);
    }

    #[test]
    fn test_ai_corner_is_hard_and_aimed_at_box() {
        let award = RestartAward { kind: RestartKind::CornerKick, side: TeamSide::Home, spot: vec2(3035.0, 265.0) };
        let mut restart = Restart::new(award, Some(9), false, 5.0);
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        restart.plan_ai(&[], &mut rng);
        assert!((0.8..=1.0).contains(&restart.charge));
        assert!(restart.direction.y > 0.0);
        let (velocity, _) = restart.launch(300.0);
        assert!(velocity.norm() >= rc::CORNER_MIN_POWER + 0.8 * (rc::CORNER_MAX_POWER - rc::CORNER_MIN_POWER) - 1.0);

        assert!(!restart.ai_ready());
        restart.timer = 1.9;
        assert!(restart.ai_ready());
    }
}
