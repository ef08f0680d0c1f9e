use thiserror::Error;

#[derive(Error, Debug)]
pub enum MatchError {
    #[error("Invalid team size for {team}: expected {expected}, found {found}")]
    InvalidTeamSize { team: String, expected: usize, found: usize },

    #[error("Team {team} must field exactly one goalkeeper, found {found}")]
    InvalidGoalkeeperCount { team: String, found: usize },

    #[error("Invalid skill value {value} for {player} ({skill})")]
    InvalidSkill { player: String, skill: &'static str, value: f32 },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Match did not finish within {ticks} ticks")]
    Unfinished { ticks: u64 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, MatchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = MatchError::InvalidTeamSize { team: "Home".into(), expected: 11, found: 9 };
        assert_eq!(err.to_string(), "Invalid team size for Home: expected 11, found 9");

        let err = MatchError::InvalidConfig("global_speed must be positive".into());
        assert!(err.to_string().contains("global_speed"));
    }

    #[test]
    fn test_json_errors_convert() {
        let parse: std::result::Result<serde_json::Value, _> = serde_json::from_str("{");
        let err: MatchError = parse.unwrap_err().into();
        assert!(matches!(err, MatchError::Json(_)));
    }
}
