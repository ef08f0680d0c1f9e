//! Player data model

use crate::engine::ai_controller::AiController;
use crate::engine::geometry::{vec2, Vec2};
use crate::engine::physics_constants::{field, player as pc};
use crate::error::{MatchError, Result};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Index into the engine's player arena (0-10 home, 11-21 away)
pub type PlayerId = usize;

/// Which goal a team defends. Home defends the left goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TeamSide {
    Home,
    Away,
}

impl TeamSide {
    pub fn opponent(self) -> Self {
        match self {
            TeamSide::Home => TeamSide::Away,
            TeamSide::Away => TeamSide::Home,
        }
    }

    /// +1 when attacking toward increasing X
    pub fn attack_sign(self) -> f32 {
        match self {
            TeamSide::Home => 1.0,
            TeamSide::Away => -1.0,
        }
    }

    pub fn own_goal_line(self) -> f32 {
        match self {
            TeamSide::Home => field::LEFT_GOAL_LINE,
            TeamSide::Away => field::RIGHT_GOAL_LINE,
        }
    }

    pub fn opponent_goal_line(self) -> f32 {
        self.opponent().own_goal_line()
    }

    pub fn own_goal(self) -> Vec2 {
        vec2(self.own_goal_line(), field::CENTER_Y)
    }

    pub fn opponent_goal(self) -> Vec2 {
        vec2(self.opponent_goal_line(), field::CENTER_Y)
    }

    /// Map a team-relative point (depth from own goal, lateral from own left)
    /// in 0..1 onto world coordinates.
    pub fn to_world(self, depth: f32, lateral: f32) -> Vec2 {
        let (d, l) = match self {
            TeamSide::Home => (depth, lateral),
            TeamSide::Away => (1.0 - depth, 1.0 - lateral),
        };
        vec2(
            field::STADIUM_MARGIN + d * field::FIELD_WIDTH,
            field::STADIUM_MARGIN + l * field::FIELD_HEIGHT,
        )
    }

    /// Inverse of [`TeamSide::to_world`]
    pub fn to_relative(self, point: Vec2) -> (f32, f32) {
        let d = (point.x - field::STADIUM_MARGIN) / field::FIELD_WIDTH;
        let l = (point.y - field::STADIUM_MARGIN) / field::FIELD_HEIGHT;
        match self {
            TeamSide::Home => (d, l),
            TeamSide::Away => (1.0 - d, 1.0 - l),
        }
    }
}

/// Role groups driving the AI positioning variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PositionRole {
    Goalkeeper,
    Defender,
    Midfielder,
    Forward,
}

/// Which third of the pitch width a role leans toward
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flank {
    Left,
    Center,
    Right,
}

/// Tactical role within the formation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TacticalRole {
    GK,
    LB,
    CB,
    RB,
    LM,
    CM,
    RM,
    LW,
    RW,
    ST,
}

impl TacticalRole {
    pub fn group(self) -> PositionRole {
        use TacticalRole::*;
        match self {
            GK => PositionRole::Goalkeeper,
            LB | CB | RB => PositionRole::Defender,
            LM | CM | RM => PositionRole::Midfielder,
            LW | RW | ST => PositionRole::Forward,
        }
    }

    pub fn flank(self) -> Flank {
        use TacticalRole::*;
        match self {
            LB | LM | LW => Flank::Left,
            RB | RM | RW => Flank::Right,
            GK | CB | CM | ST => Flank::Center,
        }
    }

    /// Formation slot as (depth, lateral) relative to the team's own goal
    pub fn base_slot(self) -> (f32, f32) {
        use TacticalRole::*;
        match self {
            GK => (0.04, 0.5),
            LB => (0.20, 0.15),
            CB => (0.17, 0.5),
            RB => (0.20, 0.85),
            LM => (0.36, 0.15),
            CM => (0.33, 0.5),
            RM => (0.36, 0.85),
            LW => (0.44, 0.2),
            RW => (0.44, 0.8),
            ST => (0.45, 0.5),
        }
    }
}

/// Six skill attributes, each 0-100
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Skills {
    pub speed: f32,
    pub shooting: f32,
    pub passing: f32,
    pub defending: f32,
    pub agility: f32,
    pub technique: f32,
}

impl Default for Skills {
    fn default() -> Self {
        Self::uniform(60.0)
    }
}

impl Skills {
    pub fn uniform(value: f32) -> Self {
        Self {
            speed: value,
            shooting: value,
            passing: value,
            defending: value,
            agility: value,
            technique: value,
        }
    }

    pub fn validate(&self, player: &str) -> Result<()> {
        let fields = [
            ("speed", self.speed),
            ("shooting", self.shooting),
            ("passing", self.passing),
            ("defending", self.defending),
            ("agility", self.agility),
            ("technique", self.technique),
        ];
        for (skill, value) in fields {
            if !(0.0..=100.0).contains(&value) {
                return Err(MatchError::InvalidSkill { player: player.to_string(), skill, value });
            }
        }
        Ok(())
    }
}

/// Kinematic state written by AI states and integrated by the movement step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    pub position: Vec2,
    pub velocity: Vec2,
    /// Last non-zero travel direction
    pub facing: Vec2,
}

impl Body {
    pub fn at(position: Vec2, facing: Vec2) -> Self {
        Self { position, velocity: Vec2::zeros(), facing }
    }

    pub fn speed(&self) -> f32 {
        self.velocity.norm()
    }
}

/// Human shot-charge bookkeeping
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ChargeState {
    pub charging: bool,
    pub hold_secs: f32,
}

impl ChargeState {
    pub fn fraction(&self) -> f32 {
        (self.hold_secs / pc::MAX_CHARGE_SECS).clamp(0.0, 1.0)
    }
}

pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub side: TeamSide,
    pub role: TacticalRole,
    pub skills: Skills,
    pub body: Body,
    pub home_position: Vec2,
    /// 0-100
    pub stamina: f32,
    pub starting: bool,
    pub knocked_down: bool,
    pub knockdown_timer: f32,
    /// Match time of the last kick (seconds since kickoff setup)
    pub last_kick_time: f32,
    pub controlled: bool,
    pub charge: ChargeState,
    pub ai: AiController,
    pub rng: ChaCha8Rng,
}

impl std::fmt::Debug for Player {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Player")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("side", &self.side)
            .field("role", &self.role)
            .field("position", &self.body.position)
            .field("state", &self.ai.current())
            .finish()
    }
}

impl Player {
    pub fn position_role(&self) -> PositionRole {
        self.role.group()
    }

    pub fn is_goalkeeper(&self) -> bool {
        self.role == TacticalRole::GK
    }

    pub fn base_speed(&self) -> f32 {
        pc::BASE_SPEED + pc::SPEED_PER_POINT * self.skills.speed
    }

    /// 0.6 when exhausted, 1.0 when fresh
    pub fn stamina_multiplier(&self) -> f32 {
        0.6 + 0.4 * (self.stamina / pc::STAMINA_MAX).clamp(0.0, 1.0)
    }

    pub fn can_kick(&self, now: f32) -> bool {
        now - self.last_kick_time >= pc::KICK_COOLDOWN
    }

    pub fn spend_stamina(&mut self, amount: f32) {
        self.stamina = (self.stamina - amount).clamp(0.0, pc::STAMINA_MAX);
    }

    /// Drain while moving, recover while still
    pub fn update_stamina(&mut self, dt: f32) {
        let speed_fraction = (self.body.speed() / self.base_speed()).clamp(0.0, 1.5);
        if speed_fraction > 0.05 {
            self.spend_stamina(pc::STAMINA_DECAY_PER_SEC * speed_fraction * dt);
        } else {
            self.stamina = (self.stamina + pc::STAMINA_RECOVERY_PER_SEC * dt).min(pc::STAMINA_MAX);
        }
    }

    pub fn knock_down(&mut self, duration: f32, slide: Vec2) {
        self.knocked_down = true;
        self.knockdown_timer = duration;
        self.body.velocity = slide;
        self.charge = ChargeState::default();
    }
}
