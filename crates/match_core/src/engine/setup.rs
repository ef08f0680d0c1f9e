//! Match setup from roster data
//!
//! Starters are laid out from their tactical roles, given ids in lineup order
//! (home 0-10, away 11-21) and an independent random source each.

use super::ai_controller::AiController;
use super::geometry::{vec2, Vec2};
use super::physics_constants::{field, player as pc};
use crate::error::Result;
use crate::models::{
    formation_positions, Body, ChargeState, Player, PlayerId, Skills, TacticalRole, Team, TeamSheet, TeamSide,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Kickoff distance kept from the center line
const KICKOFF_LINE_GAP: f32 = 30.0;
/// Kicker stands this far behind the center spot
const KICKER_OFFSET: f32 = 25.0;

/// Seed for a player's random source. A configured seed makes runs
/// reproducible; otherwise the wall clock desynchronizes every match.
pub fn player_seed(match_seed: Option<u64>, id: PlayerId) -> u64 {
    let base = match match_seed {
        Some(seed) => seed,
        None => chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default() as u64,
    };
    base ^ (id as u64 + 1).wrapping_mul(0x9E37_79B9_7F4A_7C15)
}

pub fn new_player(
    id: PlayerId,
    name: &str,
    side: TeamSide,
    role: TacticalRole,
    skills: Skills,
    home_position: Vec2,
    seed: u64,
) -> Player {
    Player {
        id,
        name: name.to_string(),
        side,
        role,
        skills,
        body: Body::at(home_position, vec2(side.attack_sign(), 0.0)),
        home_position,
        stamina: pc::STAMINA_MAX,
        starting: true,
        knocked_down: false,
        knockdown_timer: 0.0,
        last_kick_time: -pc::KICK_COOLDOWN,
        controlled: false,
        charge: ChargeState::default(),
        ai: AiController::new(role),
        rng: ChaCha8Rng::seed_from_u64(seed),
    }
}

pub struct MatchSetup {
    pub players: Vec<Player>,
    pub teams: [Team; 2],
}

fn build_side(sheet: &TeamSheet, side: TeamSide, first_id: PlayerId, seed: Option<u64>) -> (Vec<Player>, Team) {
    let starters: Vec<_> = sheet.starters().collect();
    let roles: Vec<TacticalRole> = starters.iter().map(|p| p.role).collect();
    let positions = formation_positions(&roles, side);

    let players: Vec<Player> = starters
        .iter()
        .zip(positions)
        .enumerate()
        .map(|(i, (sheet_player, home))| {
            let id = first_id + i;
            new_player(id, &sheet_player.name, side, sheet_player.role, sheet_player.skills, home, player_seed(seed, id))
        })
        .collect();
    let team = Team { name: sheet.name.clone(), side, roster: players.iter().map(|p| p.id).collect() };
    (players, team)
}

/// Validate both sheets and create the 22 starters
pub fn build_match(home: &TeamSheet, away: &TeamSheet, seed: Option<u64>) -> Result<MatchSetup> {
    home.validate()?;
    away.validate()?;

    let (mut players, home_team) = build_side(home, TeamSide::Home, 0, seed);
    let (away_players, away_team) = build_side(away, TeamSide::Away, players.len(), seed);
    players.extend(away_players);

    log::info!("match set up: {} vs {} ({} players)", home.name, away.name, players.len());
    Ok(MatchSetup { players, teams: [home_team, away_team] })
}

/// Home position pulled back into the player's own half
pub fn kickoff_position(home: Vec2, side: TeamSide) -> Vec2 {
    let x = match side {
        TeamSide::Home => home.x.min(field::CENTER_X - KICKOFF_LINE_GAP),
        TeamSide::Away => home.x.max(field::CENTER_X + KICKOFF_LINE_GAP),
    };
    vec2(x, home.y)
}

/// Where the kicker waits at kickoff
pub fn kicker_position(side: TeamSide) -> Vec2 {
    vec2(field::CENTER_X - side.attack_sign() * KICKER_OFFSET, field::CENTER_Y)
}

/// The kickoff taker: most advanced forward, else any outfield player
pub fn kickoff_taker(players: &[Player], side: TeamSide) -> Option<PlayerId> {
    players
        .iter()
        .filter(|p| p.side == side && !p.is_goalkeeper())
        .max_by(|a, b| {
            let depth = |p: &Player| p.home_position.x * side.attack_sign();
            depth(a).total_cmp(&depth(b))
        })
        .map(|p| p.id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MatchError;
    use crate::test_fixtures::demo_sheet;

    #[test]
    fn test_builds_twenty_two_players() {
        let setup = build_match(&demo_sheet("Home"), &demo_sheet("Away"), Some(1)).unwrap();
        assert_eq!(setup.players.len(), 22);
        assert_eq!(setup.teams[0].roster, (0..11).collect::<Vec<_>>());
        assert_eq!(setup.teams[1].roster, (11..22).collect::<Vec<_>>());
        assert!(setup.players[..11].iter().all(|p| p.side == TeamSide::Home));
        // Home keeper near the left goal, away keeper near the right
        assert!(setup.players[0].home_position.x < field::CENTER_X);
        assert!(setup.players[11].home_position.x > field::CENTER_X);
    }

    #[test]
    fn test_invalid_sheet_is_rejected() {
        let mut short = demo_sheet("Short");
        short.players.pop();
        let err = build_match(&short, &demo_sheet("Away"), None).err();
        assert!(matches!(err, Some(MatchError::InvalidTeamSize { .. })));
    }

    #[test]
    fn test_seeded_sources_differ_per_player() {
        assert_eq!(player_seed(Some(7), 3), player_seed(Some(7), 3));
        assert_ne!(player_seed(Some(7), 3), player_seed(Some(7), 4));
    }

    #[test]
    fn test_kickoff_positions_stay_in_own_half() {
        let p = kickoff_position(vec2(2000.0, 900.0), TeamSide::Home);
        assert!(p.x < field::CENTER_X);
        let p = kickoff_position(vec2(1000.0, 900.0), TeamSide::Away);
        assert!(p.x > field::CENTER_X);
    }

    #[test]
    fn test_kickoff_taker_is_a_forward() {
        let setup = build_match(&demo_sheet("Home"), &demo_sheet("Away"), Some(1)).unwrap();
        let taker = kickoff_taker(&setup.players, TeamSide::Away).unwrap();
        assert_eq!(setup.players[taker].role, TacticalRole::ST);
    }
}
