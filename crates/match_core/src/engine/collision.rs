//! Player-player and player-ball contact
//!
//! Every overlapping pair is pushed apart. Knockdowns are rolled on top of
//! the separation using the impacting player's own random source.

use super::ball::Ball;
use super::geometry::{clamp_length, distance, vec2, Vec2};
use super::movement::clamp_to_field;
use super::physics_constants::{contact, player as pc};
use crate::models::{Player, PlayerId};
use rand::Rng;

/// A player put on the ground this tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Knockdown {
    pub victim: PlayerId,
    pub by: PlayerId,
}

/// Mutable access to two distinct players
fn pair_mut(players: &mut [Player], i: usize, j: usize) -> (&mut Player, &mut Player) {
    debug_assert!(i < j);
    let (head, tail) = players.split_at_mut(j);
    (&mut head[i], &mut tail[0])
}

/// Higher agility shrugs off part of the impact
fn agility_discount(victim: &Player) -> f32 {
    1.0 - victim.skills.agility / 200.0
}

/// Impact score of `attacker` running into `victim`, before the random roll.
/// Zero when the attacker is below the knockdown speed.
pub fn impact_score(attacker: &Player, victim: &Player, near_ball: bool) -> f32 {
    let speed = attacker.body.speed();
    if speed <= contact::KNOCKDOWN_MIN_SPEED {
        return 0.0;
    }
    let boost = if near_ball { contact::BALL_PROXIMITY_BOOST } else { 1.0 };
    speed * (attacker.skills.defending / 100.0) * agility_discount(victim) * boost
}

fn knock(victim: &mut Player, attacker: &mut Player) -> Knockdown {
    let duration = attacker.rng.gen_range(contact::KNOCKDOWN_MIN_SECS..=contact::KNOCKDOWN_MAX_SECS);
    victim.knock_down(duration, attacker.body.velocity * contact::KNOCKDOWN_VELOCITY_SHARE);
    log::trace!("player {} knocked down by {} for {:.2}s", victim.id, attacker.id, duration);
    Knockdown { victim: victim.id, by: attacker.id }
}

/// Same-team bump: a rare knockdown of the slower player
fn resolve_teammates(a: &mut Player, b: &mut Player) -> Option<Knockdown> {
    let (fast, slow) = if a.body.speed() >= b.body.speed() { (a, b) } else { (b, a) };
    if fast.body.speed() <= contact::KNOCKDOWN_MIN_SPEED {
        return None;
    }
    if fast.rng.gen_bool(contact::SAME_TEAM_KNOCKDOWN_CHANCE) {
        Some(knock(slow, fast))
    } else {
        None
    }
}

/// Opposing contest: each player may floor the other
fn resolve_opponents(a: &mut Player, b: &mut Player, near_ball: bool, out: &mut Vec<Knockdown>) {
    let a_on_b = impact_score(a, b, near_ball);
    let b_on_a = impact_score(b, a, near_ball);

    let a_hits = a_on_b > 0.0 && a_on_b * a.rng.gen::<f32>() > contact::KNOCKDOWN_THRESHOLD;
    let b_hits = b_on_a > 0.0 && b_on_a * b.rng.gen::<f32>() > contact::KNOCKDOWN_THRESHOLD;
    if a_hits {
        out.push(knock(b, a));
    }
    if b_hits {
        out.push(knock(a, b));
    }
}

/// Push both players apart by a share of the overlap
fn separate(a: &mut Player, b: &mut Player) {
    let offset = b.body.position - a.body.position;
    let dist = offset.norm();
    let overlap = contact::COLLISION_DISTANCE - dist;
    if overlap <= 0.0 {
        return;
    }
    let normal = if dist > f32::EPSILON { offset / dist } else { vec2(1.0, 0.0) };
    let push = normal * overlap * contact::SEPARATION_SHARE * 0.5;
    a.body.position = clamp_to_field(a.body.position - push);
    b.body.position = clamp_to_field(b.body.position + push);
}

/// Pairwise contact pass over all players
pub fn resolve_player_collisions(players: &mut [Player], ball_position: Vec2) -> Vec<Knockdown> {
    let mut knockdowns = Vec::new();
    for i in 0..players.len() {
        for j in (i + 1)..players.len() {
            let (a, b) = pair_mut(players, i, j);
            if distance(a.body.position, b.body.position) >= contact::COLLISION_DISTANCE {
                continue;
            }
            if !a.knocked_down && !b.knocked_down {
                if a.side == b.side {
                    knockdowns.extend(resolve_teammates(a, b));
                } else {
                    let near_ball = distance(a.body.position, ball_position) < contact::BALL_PROXIMITY_RADIUS
                        || distance(b.body.position, ball_position) < contact::BALL_PROXIMITY_RADIUS;
                    resolve_opponents(a, b, near_ball, &mut knockdowns);
                }
            }
            separate(a, b);
        }
    }
    knockdowns
}

/// Incidental ball contact from moving players. Returns the last player who
/// nudged the ball, if any.
pub fn nudge_ball(players: &[Player], ball: &mut Ball) -> Option<PlayerId> {
    if !ball.is_grounded() || ball.speed() >= contact::NUDGE_BALL_SPEED_LIMIT {
        return None;
    }
    let mut toucher = None;
    for player in players.iter().filter(|p| !p.knocked_down) {
        if player.body.speed() <= pc::MOVING_SPEED {
            continue;
        }
        if distance(player.body.position, ball.position()) < contact::NUDGE_RADIUS {
            ball.nudge(clamp_length(player.body.velocity, contact::NUDGE_MAX_PUSH), player.id);
            toucher = Some(player.id);
        }
    }
    toucher
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Skills, TacticalRole, TeamSide};
    use crate::test_fixtures::make_player;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn pair(a_pos: Vec2, b_pos: Vec2) -> Vec<Player> {
        let mut a = make_player(0, TeamSide::Home, TacticalRole::CM);
        let mut b = make_player(11, TeamSide::Away, TacticalRole::CM);
        a.body.position = a_pos;
        b.body.position = b_pos;
        vec![a, b]
    }

    #[test]
    fn test_stationary_players_only_separate() {
        // Both at rest: impact requires speed above 50
        let mut players = pair(vec2(1000.0, 1000.0), vec2(1040.0, 1000.0));
        for _ in 0..50 {
            let knockdowns = resolve_player_collisions(&mut players, vec2(1020.0, 1000.0));
            assert!(knockdowns.is_empty());
        }
        assert!(!players[0].knocked_down && !players[1].knocked_down);
        assert!(distance(players[0].body.position, players[1].body.position) > 40.0);
    }

    #[test]
    fn test_separation_proportional_to_overlap() {
        let mut players = pair(vec2(1000.0, 1000.0), vec2(1060.0, 1000.0));
        resolve_player_collisions(&mut players, vec2(0.0, 0.0));
        // 10 overlap, half of it resolved, split between the two
        assert!((players[0].body.position.x - 997.5).abs() < 1e-3);
        assert!((players[1].body.position.x - 1062.5).abs() < 1e-3);
    }

    #[test]
    fn test_hard_charge_knocks_down_eventually() {
        let mut downs = 0;
        for trial in 0..40u64 {
            let mut players = pair(vec2(1000.0, 1000.0), vec2(1040.0, 1000.0));
            players[0].rng = ChaCha8Rng::seed_from_u64(trial);
            players[0].skills = Skills { defending: 100.0, ..Skills::uniform(60.0) };
            players[1].skills = Skills { agility: 0.0, ..Skills::uniform(60.0) };
            players[0].body.velocity = vec2(400.0, 0.0);
            let knockdowns = resolve_player_collisions(&mut players, vec2(1020.0, 1000.0));
            if let Some(k) = knockdowns.first() {
                assert_eq!(*k, Knockdown { victim: 11, by: 0 });
                assert!(players[1].body.velocity.x > 0.0);
                downs += 1;
            }
        }
        // impact 400 × 1.5 = 600, so almost every roll clears 60
        assert!(downs > 30);
    }

    #[test]
    fn test_teammates_rarely_knock_each_other_down() {
        let mut downs = 0;
        for trial in 0..5000u64 {
            let mut runner = make_player(1, TeamSide::Home, TacticalRole::CM);
            let mut walker = make_player(2, TeamSide::Home, TacticalRole::CB);
            runner.body.position = vec2(1000.0, 1000.0);
            walker.body.position = vec2(1040.0, 1000.0);
            runner.body.velocity = vec2(300.0, 0.0);
            walker.body.velocity = vec2(20.0, 0.0);
            runner.rng = ChaCha8Rng::seed_from_u64(trial);
            let mut players = vec![runner, walker];

            let knockdowns = resolve_player_collisions(&mut players, vec2(1020.0, 1000.0));
            assert!(knockdowns.len() <= 1);
            if let Some(k) = knockdowns.first() {
                // Only ever the slower player goes down
                assert_eq!(*k, Knockdown { victim: 2, by: 1 });
                downs += 1;
            }
            // Pushed apart either way
            assert!(distance(players[0].body.position, players[1].body.position) > 40.0);
        }
        // 2% of 5000 trials is 100
        assert!((60..=140).contains(&downs), "teammate knockdowns: {}", downs);
    }

    #[test]
    fn test_slow_teammates_never_fall() {
        for trial in 0..200u64 {
            let mut a = make_player(1, TeamSide::Away, TacticalRole::CM);
            let mut b = make_player(2, TeamSide::Away, TacticalRole::CM);
            a.body.position = vec2(1000.0, 1000.0);
            b.body.position = vec2(1030.0, 1000.0);
            a.body.velocity = vec2(40.0, 0.0);
            a.rng = ChaCha8Rng::seed_from_u64(trial);
            let mut players = vec![a, b];
            assert!(resolve_player_collisions(&mut players, vec2(0.0, 0.0)).is_empty());
        }
    }

    #[test]
    fn test_impact_zero_below_min_speed() {
        let players = pair(vec2(0.0, 0.0), vec2(0.0, 0.0));
        assert_eq!(impact_score(&players[0], &players[1], true), 0.0);
    }

    #[test]
    fn test_nudge_pushes_ball_along_travel() {
        let mut players = pair(vec2(1000.0, 1000.0), vec2(2000.0, 1000.0));
        players[0].body.velocity = vec2(300.0, 0.0);
        let mut ball = Ball::at(vec2(1020.0, 1000.0));
        assert_eq!(nudge_ball(&players, &mut ball), Some(0));
        assert!((ball.velocity().x - contact::NUDGE_MAX_PUSH).abs() < 1e-3);
        assert_eq!(ball.last_toucher(), Some(0));
    }

    #[test]
    fn test_no_nudge_on_fast_ball() {
        let mut players = pair(vec2(1000.0, 1000.0), vec2(2000.0, 1000.0));
        players[0].body.velocity = vec2(300.0, 0.0);
        let mut ball = Ball::at(vec2(1020.0, 1000.0));
        ball.kick(vec2(500.0, 0.0), 0.0, None);
        assert_eq!(nudge_ball(&players, &mut ball), None);
    }
}
