//! Validation helpers for DTOs.

use validator::ValidationError;

const MAX_TEAM_ID_LEN: usize = 32;

/// Validates that a team ID is 1 to 32 ASCII letters, digits, `-` or `_`.
///
/// # Examples
///
/// ```ignore
/// validate_team_id("rma")     // Ok
/// validate_team_id("MCI-2")   // Ok
/// validate_team_id("")        // Err - empty
/// validate_team_id("real m")  // Err - space
/// ```
pub fn validate_team_id(id: &str) -> Result<(), ValidationError> {
    if id.is_empty() || id.len() > MAX_TEAM_ID_LEN {
        let mut err = ValidationError::new("team_id_length");
        err.message = Some(
            format!(
                "Team ID must be between 1 and {MAX_TEAM_ID_LEN} characters (got {})",
                id.len()
            )
            .into(),
        );
        return Err(err);
    }

    if !id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        let mut err = ValidationError::new("team_id_format");
        err.message = Some("Team ID must contain only letters, digits, '-' or '_'".into());
        return Err(err);
    }

    Ok(())
}

/// Validates a `#RRGGBB` or `#RGB` color.
pub fn validate_hex_color(color: &str) -> Result<(), ValidationError> {
    let Some(digits) = color.strip_prefix('#') else {
        let mut err = ValidationError::new("color_prefix");
        err.message = Some("Color must start with '#'".into());
        return Err(err);
    };

    if !matches!(digits.len(), 3 | 6) || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        let mut err = ValidationError::new("color_format");
        err.message = Some("Color must be 3 or 6 hexadecimal digits".into());
        return Err(err);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_team_id_valid() {
        assert!(validate_team_id("rma").is_ok());
        assert!(validate_team_id("MCI-10").is_ok());
        assert!(validate_team_id("home_team").is_ok());
    }

    #[test]
    fn test_validate_team_id_invalid_length() {
        assert!(validate_team_id("").is_err());
        assert!(validate_team_id(&"a".repeat(33)).is_err());
    }

    #[test]
    fn test_validate_team_id_invalid_format() {
        assert!(validate_team_id("real madrid").is_err());
        assert!(validate_team_id("bar/psg").is_err());
        assert!(validate_team_id("atlético").is_err());
    }

    #[test]
    fn test_validate_hex_color() {
        assert!(validate_hex_color("#FEBE10").is_ok());
        assert!(validate_hex_color("#fff").is_ok());
        assert!(validate_hex_color("FEBE10").is_err());
        assert!(validate_hex_color("#FEBE1").is_err());
        assert!(validate_hex_color("#GGGGGG").is_err());
    }
}
