//! Player movement, kicking and tackling
//!
//! This module contains:
//! - Human velocity from the movement stick, shot charging and tackles
//! - AI velocity scaling and the shared auto-kick rule
//! - Intent execution for AI passes and shots
//! - Knockdown sliding and the field-bound clamp

use super::ball::Ball;
use super::behaviors::{AiStateKind, Intent};
use super::config::Difficulty;
use super::geometry::{direction_to, distance, normalize_or_zero, Vec2};
use super::physics_constants::{contact, field, player as pc};
use crate::models::{ChargeState, Player, PlayerId};

/// Multipliers that apply to every player this tick
#[derive(Debug, Clone, Copy)]
pub struct MoveParams {
    pub global_speed: f32,
    pub difficulty: Difficulty,
    /// Match time used for kick cooldowns
    pub now: f32,
    pub dt: f32,
}

/// Action-button edges derived from consecutive `action_held` values
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActionEdges {
    pub held: bool,
    pub pressed: bool,
    pub released: bool,
}

impl ActionEdges {
    pub fn from_held(previous: bool, held: bool) -> Self {
        Self { held, pressed: held && !previous, released: !held && previous }
    }
}

/// Ball contact produced by a player this tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Touch {
    Kick { player: PlayerId, power: f32 },
    /// A human released the button away from the ball
    TackleAttempt { player: PlayerId },
}

/// Horizontal and vertical bounds a player may occupy
pub fn clamp_to_field(position: Vec2) -> Vec2 {
    let in_goal_mouth = (field::GOAL_TOP..=field::GOAL_BOTTOM).contains(&position.y);
    let x_allowance =
        if in_goal_mouth { field::PLAYER_NET_ALLOWANCE } else { field::PLAYER_OUTSIDE_ALLOWANCE };
    Vec2::new(
        position.x.clamp(field::LEFT_GOAL_LINE - x_allowance, field::RIGHT_GOAL_LINE + x_allowance),
        position.y.clamp(
            field::TOP_SIDELINE - field::PLAYER_OUTSIDE_ALLOWANCE,
            field::BOTTOM_SIDELINE + field::PLAYER_OUTSIDE_ALLOWANCE,
        ),
    )
}

/// Human stick to velocity. Difficulty never scales the human.
pub fn human_velocity(player: &Player, stick: Vec2, global_speed: f32) -> Vec2 {
    stick * player.base_speed() * player.stamina_multiplier() * global_speed
}

/// Scale the velocity an AI state wrote into the body
pub fn scale_ai_velocity(player: &mut Player, params: &MoveParams) {
    player.body.velocity *=
        player.stamina_multiplier() * params.difficulty.speed_multiplier() * params.global_speed;
}

/// Ball lies inside the forward cone of travel, close and on the ground
fn auto_kick_direction(player: &Player, ball: &Ball, now: f32) -> Option<Vec2> {
    if !player.can_kick(now) || !ball.is_grounded() || player.body.speed() <= pc::MOVING_SPEED {
        return None;
    }
    if distance(player.body.position, ball.position()) > pc::KICK_RADIUS {
        return None;
    }
    let travel = normalize_or_zero(player.body.velocity);
    let to_ball = direction_to(player.body.position, ball.position());
    (travel.dot(&to_ball) > pc::KICK_CONE_DOT).then_some(travel)
}

fn strike(player: &mut Player, ball: &mut Ball, velocity: Vec2, lift: f32, now: f32) {
    ball.kick(velocity, lift, Some(player.id));
    player.last_kick_time = now;
    player.spend_stamina(pc::STAMINA_KICK_COST);
}

/// Base AI strike power before any state-specific scaling
pub fn ai_kick_power(player: &Player, difficulty: Difficulty) -> f32 {
    pc::AI_KICK_POWER * (player.skills.shooting / 100.0)
        * player.stamina_multiplier()
        * difficulty.kick_multiplier()
}

/// Auto-kick for an AI player. Passing and Shooting only kick through intents.
pub fn ai_auto_kick(player: &mut Player, ball: &mut Ball, state: AiStateKind, params: &MoveParams) -> Option<Touch> {
    if state.kicks_by_intent() {
        return None;
    }
    let dir = auto_kick_direction(player, ball, params.now)?;
    let mut power = ai_kick_power(player, params.difficulty);
    if state == AiStateKind::Dribbling {
        power *= pc::AI_DRIBBLE_TOUCH;
    }
    strike(player, ball, dir * power, 0.0, params.now);
    Some(Touch::Kick { player: player.id, power })
}

/// Execute a pass or shot the AI asked for. Skipped when the ball is out of
/// reach or the kicker is still on cooldown.
pub fn execute_intent(player: &mut Player, ball: &mut Ball, intent: &Intent, params: &MoveParams) -> Option<Touch> {
    if !player.can_kick(params.now) || distance(player.body.position, ball.position()) > pc::POSSESSION_RADIUS {
        return None;
    }
    let power = intent.power() * player.stamina_multiplier() * params.difficulty.kick_multiplier();
    strike(player, ball, normalize_or_zero(intent.direction()) * power, intent.lift(), params.now);
    Some(Touch::Kick { player: player.id, power })
}

/// One tick of human control: movement, auto-kick touches, shot charging,
/// and the tackle trigger on a release without charge or possession.
pub fn drive_human(
    player: &mut Player,
    ball: &mut Ball,
    stick: Vec2,
    edges: ActionEdges,
    params: &MoveParams,
) -> Option<Touch> {
    player.body.velocity = human_velocity(player, stick, params.global_speed);
    let near_ball = distance(player.body.position, ball.position());

    if edges.pressed && near_ball <= pc::CHARGE_RADIUS {
        player.charge = ChargeState { charging: true, hold_secs: 0.0 };
    }
    if edges.held && player.charge.charging {
        player.charge.hold_secs = (player.charge.hold_secs + params.dt).min(pc::MAX_CHARGE_SECS);
    }

    if edges.released {
        let charge = std::mem::take(&mut player.charge);
        if charge.charging && near_ball <= pc::CHARGE_RADIUS && player.can_kick(params.now) {
            let fraction = charge.fraction();
            let aim = if stick.norm() > f32::EPSILON { normalize_or_zero(stick) } else { player.body.facing };
            let power = pc::HUMAN_SHOT_POWER * (1.0 + 2.0 * fraction);
            strike(player, ball, aim * power, pc::HUMAN_SHOT_LIFT * fraction, params.now);
            return Some(Touch::Kick { player: player.id, power });
        }
        if !charge.charging && near_ball > pc::POSSESSION_RADIUS {
            return Some(Touch::TackleAttempt { player: player.id });
        }
        return None;
    }

    if player.charge.charging {
        return None;
    }
    let dir = auto_kick_direction(player, ball, params.now)?;
    let power = player.body.speed() * pc::HUMAN_TOUCH_FACTOR;
    strike(player, ball, dir * power, 0.0, params.now);
    Some(Touch::Kick { player: player.id, power })
}

/// Poke the ball away if it is within tackling range. Returns true on contact.
pub fn attempt_tackle(player: &mut Player, ball: &mut Ball, now: f32) -> bool {
    player.spend_stamina(pc::STAMINA_TACKLE_COST);
    if !ball.is_grounded() || distance(player.body.position, ball.position()) > pc::TACKLE_RANGE {
        return false;
    }
    let dir = direction_to(player.body.position, ball.position());
    let dir = if dir.norm() > f32::EPSILON { dir } else { player.body.facing };
    ball.kick(dir * pc::TACKLE_POKE_POWER, 0.0, Some(player.id));
    player.last_kick_time = now;
    true
}

/// Knocked-down players slide to a stop and get up when the timer runs out
pub fn update_knockdown(player: &mut Player, dt: f32) {
    player.knockdown_timer -= dt;
    player.body.velocity *= contact::KNOCKDOWN_DAMPING;
    if player.knockdown_timer <= 0.0 {
        player.knocked_down = false;
        player.knockdown_timer = 0.0;
        player.body.velocity = Vec2::zeros();
    }
}

/// Move by velocity, clamp to the field, track facing and stamina
pub fn integrate_player(player: &mut Player, dt: f32) {
    player.body.position = clamp_to_field(player.body.position + player.body.velocity * dt);
    if player.body.speed() > pc::MOVING_SPEED {
        player.body.facing = normalize_or_zero(player.body.velocity);
    }
    player.update_stamina(dt);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::geometry::vec2;
    use crate::engine::physics_constants::timestep::FIXED_DT;
    use crate::models::{TacticalRole, TeamSide};
    use crate::test_fixtures::make_player;
    use proptest::prelude::*;

    fn params(now: f32) -> MoveParams {
        MoveParams { global_speed: 1.0, difficulty: Difficulty::Normal, now, dt: FIXED_DT }
    }

    #[test]
    fn test_action_edges() {
        assert_eq!(ActionEdges::from_held(false, true), ActionEdges { held: true, pressed: true, released: false });
        assert_eq!(ActionEdges::from_held(true, false), ActionEdges { held: false, pressed: false, released: true });
        assert_eq!(ActionEdges::from_held(true, true), ActionEdges { held: true, pressed: false, released: false });
    }

    #[test]
    fn test_human_auto_kick_in_cone() {
        let mut player = make_player(0, TeamSide::Home, TacticalRole::ST);
        player.body.position = vec2(1000.0, 1000.0);
        let mut ball = Ball::at(vec2(1030.0, 1000.0));
        let touch = drive_human(&mut player, &mut ball, vec2(1.0, 0.0), ActionEdges::default(), &params(5.0));
        assert!(matches!(touch, Some(Touch::Kick { player: 0, .. })));
        assert!(ball.velocity().x > 0.0);
        assert_eq!(ball.last_toucher(), Some(0));

        // Cooldown blocks an immediate second touch
        ball.place(vec2(1030.0, 1000.0));
        let touch = drive_human(&mut player, &mut ball, vec2(1.0, 0.0), ActionEdges::default(), &params(5.1));
        assert!(touch.is_none());
    }

    #[test]
    fn test_no_auto_kick_when_ball_behind() {
        let mut player = make_player(0, TeamSide::Home, TacticalRole::ST);
        player.body.position = vec2(1000.0, 1000.0);
        let mut ball = Ball::at(vec2(970.0, 1000.0));
        let touch = drive_human(&mut player, &mut ball, vec2(1.0, 0.0), ActionEdges::default(), &params(5.0));
        assert!(touch.is_none());
        assert_eq!(ball.velocity(), Vec2::zeros());
    }

    #[test]
    fn test_charged_shot_scales_power() {
        let mut player = make_player(0, TeamSide::Home, TacticalRole::ST);
        player.body.position = vec2(1000.0, 1000.0);
        let mut ball = Ball::at(vec2(1030.0, 1000.0));
        let press = ActionEdges::from_held(false, true);
        drive_human(&mut player, &mut ball, Vec2::zeros(), press, &params(5.0));
        assert!(player.charge.charging);
        for i in 0..60 {
            let hold = ActionEdges::from_held(true, true);
            drive_human(&mut player, &mut ball, Vec2::zeros(), hold, &params(5.0 + i as f32 * FIXED_DT));
        }
        assert!((player.charge.fraction() - 1.0).abs() < 1e-3);
        let release = ActionEdges::from_held(true, false);
        let touch = drive_human(&mut player, &mut ball, vec2(1.0, 0.0), release, &params(6.5));
        match touch {
            Some(Touch::Kick { power, .. }) => assert!((power - pc::HUMAN_SHOT_POWER * 3.0).abs() < 1.0),
            other => panic!("expected a charged shot, got {:?}", other),
        }
        assert!(ball.vertical_velocity() > 0.0);
        assert!(!player.charge.charging);
    }

    #[test]
    fn test_release_away_from_ball_tackles() {
        let mut player = make_player(3, TeamSide::Home, TacticalRole::CB);
        player.body.position = vec2(1000.0, 1000.0);
        let mut ball = Ball::at(vec2(1300.0, 1000.0));
        let release = ActionEdges::from_held(true, false);
        let touch = drive_human(&mut player, &mut ball, Vec2::zeros(), release, &params(5.0));
        assert_eq!(touch, Some(Touch::TackleAttempt { player: 3 }));
    }

    #[test]
    fn test_tackle_pokes_ball_in_range() {
        let mut player = make_player(3, TeamSide::Home, TacticalRole::CB);
        player.body.position = vec2(1000.0, 1000.0);
        let mut ball = Ball::at(vec2(1050.0, 1000.0));
        assert!(attempt_tackle(&mut player, &mut ball, 5.0));
        assert!(ball.velocity().x > 0.0);

        let mut far = Ball::at(vec2(1200.0, 1000.0));
        assert!(!attempt_tackle(&mut player, &mut far, 6.0));
    }

    #[test]
    fn test_ai_dribble_touch_is_soft() {
        let mut player = make_player(5, TeamSide::Away, TacticalRole::CM);
        player.body.position = vec2(1000.0, 1000.0);
        player.body.velocity = vec2(-200.0, 0.0);
        let mut ball = Ball::at(vec2(970.0, 1000.0));
        let full = ai_kick_power(&player, Difficulty::Normal);
        match ai_auto_kick(&mut player, &mut ball, AiStateKind::Dribbling, &params(5.0)) {
            Some(Touch::Kick { power, .. }) => assert!((power - full * pc::AI_DRIBBLE_TOUCH).abs() < 1e-3),
            other => panic!("expected a touch, got {:?}", other),
        }
        assert!(ai_auto_kick(&mut player, &mut ball, AiStateKind::Passing, &params(9.0)).is_none());
    }

    #[test]
    fn test_knockdown_slides_then_recovers() {
        let mut player = make_player(1, TeamSide::Home, TacticalRole::LB);
        player.knock_down(0.5, vec2(100.0, 0.0));
        update_knockdown(&mut player, 0.1);
        assert!(player.knocked_down);
        assert!((player.body.velocity.x - 90.0).abs() < 1e-3);
        update_knockdown(&mut player, 0.5);
        assert!(!player.knocked_down);
        assert_eq!(player.body.velocity, Vec2::zeros());
    }

    #[test]
    fn test_goal_mouth_allows_net_entry() {
        let inside = clamp_to_field(vec2(field::LEFT_GOAL_LINE - 130.0, field::CENTER_Y));
        assert_eq!(inside.x, field::LEFT_GOAL_LINE - 130.0);
        let wide = clamp_to_field(vec2(field::LEFT_GOAL_LINE - 130.0, field::TOP_SIDELINE + 50.0));
        assert_eq!(wide.x, field::LEFT_GOAL_LINE - field::PLAYER_OUTSIDE_ALLOWANCE);
    }

    proptest! {
        #[test]
        fn prop_position_stays_in_bounds(x in -5000.0f32..8000.0, y in -5000.0f32..8000.0) {
            let p = clamp_to_field(vec2(x, y));
            prop_assert!(p.x >= field::LEFT_GOAL_LINE - field::PLAYER_NET_ALLOWANCE);
            prop_assert!(p.x <= field::RIGHT_GOAL_LINE + field::PLAYER_NET_ALLOWANCE);
            prop_assert!(p.y >= field::TOP_SIDELINE - field::PLAYER_OUTSIDE_ALLOWANCE);
            prop_assert!(p.y <= field::BOTTOM_SIDELINE + field::PLAYER_OUTSIDE_ALLOWANCE);
            let in_mouth = (field::GOAL_TOP..=field::GOAL_BOTTOM).contains(&p.y);
            if !in_mouth {
                prop_assert!(p.x >= field::LEFT_GOAL_LINE - field::PLAYER_OUTSIDE_ALLOWANCE);
                prop_assert!(p.x <= field::RIGHT_GOAL_LINE + field::PLAYER_OUTSIDE_ALLOWANCE);
            }
        }
    }
}
