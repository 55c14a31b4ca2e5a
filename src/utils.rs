use crate::engine::{ConfigurationError, PuzzleConfig, PuzzleState};
use thiserror::Error;

/// Errors raised while turning puzzle text into a `PuzzleState`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Puzzle line is empty")]
    EmptyLine,
    #[error("Invalid fuel token '{0}', expected a vehicle letter followed by an integer such as 'B4'")]
    InvalidFuelToken(String),
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
}

/// Parses a fuel override token of the form `<vehicleId><integerFuel>`, e.g. `B4`.
///
/// # Examples
/// ```
/// use rushhour_solver::utils::parse_fuel_token;
/// assert_eq!(parse_fuel_token("B4"), Ok(('B', 4)));
/// assert_eq!(parse_fuel_token("C100"), Ok(('C', 100)));
/// assert!(parse_fuel_token("B").is_err());
/// assert!(parse_fuel_token("B-1").is_err());
/// ```
pub fn parse_fuel_token(token: &str) -> Result<(char, u32), ParseError> {
    let invalid = || ParseError::InvalidFuelToken(token.to_string());
    let mut chars = token.chars();
    let vehicle = chars.next().ok_or_else(invalid)?;
    let amount = chars.as_str();
    if amount.is_empty() || !amount.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid());
    }
    let amount = amount.parse::<u32>().map_err(|_| invalid())?;
    Ok((vehicle, amount))
}

/// Parses one puzzle line: a 36-character board description followed by zero or
/// more fuel override tokens, separated by whitespace.
///
/// # Arguments
/// * `line`: The puzzle line, e.g. `"..B.....B...AAB..................... B3"`.
///
/// # Returns
/// * `Ok(PuzzleState)` if the line is well formed.
/// * `Err(ParseError)` if the line is empty, a fuel token is malformed, or the
///   board fails construction (see `ConfigurationError`).
pub fn parse_puzzle_line(line: &str) -> Result<PuzzleState, ParseError> {
    let mut tokens = line.split_whitespace();
    let description = tokens.next().ok_or(ParseError::EmptyLine)?;

    let mut config = PuzzleConfig::default();
    for token in tokens {
        let (vehicle, amount) = parse_fuel_token(token)?;
        config = config.with_fuel(vehicle, amount);
    }

    Ok(PuzzleState::new(description, &config)?)
}

/// Parses a whole puzzle file.
///
/// Blank lines and lines starting with `#` are skipped. Every other line yields
/// one entry, so a single bad puzzle does not prevent the rest from being read.
///
/// # Returns
/// A vector of `(line_number, result)` pairs, line numbers starting at 1.
pub fn parse_puzzle_list(content: &str) -> Vec<(usize, Result<PuzzleState, ParseError>)> {
    content
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
        .map(|(number, line)| (number, parse_puzzle_line(line)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{Direction, DEFAULT_FUEL};

    const ONE_BLOCKER: &str = "..B.....B...AAB.....................";

    #[test]
    fn test_parse_puzzle_line_without_fuel() {
        let puzzle = parse_puzzle_line(ONE_BLOCKER).unwrap();
        assert_eq!(puzzle.canonical(), ONE_BLOCKER);
        assert_eq!(puzzle.fuel('A'), Some(DEFAULT_FUEL));
        assert_eq!(puzzle.fuel('B'), Some(DEFAULT_FUEL));
    }

    #[test]
    fn test_parse_puzzle_line_with_fuel() {
        let line = format!("  {}   B2 A7 ", ONE_BLOCKER);
        let puzzle = parse_puzzle_line(&line).unwrap();
        assert_eq!(puzzle.fuel('A'), Some(7));
        assert_eq!(puzzle.fuel('B'), Some(2));
        assert!(puzzle.is_legal('B', Direction::Down, 2));
        assert!(!puzzle.is_legal('B', Direction::Down, 3));
    }

    #[test]
    fn test_parse_puzzle_line_errors() {
        assert_eq!(parse_puzzle_line("   "), Err(ParseError::EmptyLine));
        assert_eq!(
            parse_puzzle_line(&format!("{} Bx", ONE_BLOCKER)),
            Err(ParseError::InvalidFuelToken("Bx".to_string()))
        );
        let off_row = "AA..................................";
        assert!(matches!(
            parse_puzzle_line(off_row),
            Err(ParseError::Configuration(ConfigurationError::TargetOffRow { .. }))
        ));
    }

    #[test]
    fn test_parse_fuel_token_rejects_signs_and_overflow() {
        assert!(parse_fuel_token("B+3").is_err());
        assert!(parse_fuel_token("B99999999999").is_err());
        assert!(parse_fuel_token("").is_err());
    }

    #[test]
    fn test_parse_puzzle_list_skips_comments_and_blanks() {
        let content = format!(
            "# sample puzzles\n\n{}\nAA..................................\n   \n{} B0\n",
            ONE_BLOCKER, ONE_BLOCKER
        );
        let puzzles = parse_puzzle_list(&content);
        let numbers: Vec<usize> = puzzles.iter().map(|(n, _)| *n).collect();
        assert_eq!(numbers, vec![3, 4, 6]);
        assert!(puzzles[0].1.is_ok());
        assert!(puzzles[1].1.is_err());
        assert_eq!(puzzles[2].1.as_ref().unwrap().fuel('B'), Some(0));
    }
}
