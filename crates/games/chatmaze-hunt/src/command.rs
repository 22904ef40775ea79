//! Chat command grammar.
//!
//! ```text
//! character move <up|right|down|left>
//! character move <letters...>      queue each letter as a macro step
//! character customize <integer>   leading digits count, so "3rd" picks 3
//! character jump
//! ```
//!
//! Tokens are whitespace separated and case-sensitive. Anything else parses
//! to `None` and is ignored by the simulation.

use chatmaze_core::player::Direction;

/// A parsed chat command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Move(Direction),
    Customize(SpriteNumber),
    Jump,
    /// Macro letters to run one per animation window.
    Queue(Vec<char>),
}

impl Command {
    /// Map a single macro letter to the command it stands for.
    pub fn from_letter(letter: char) -> Option<Self> {
        match letter {
            'u' => Some(Self::Move(Direction::Up)),
            'r' => Some(Self::Move(Direction::Right)),
            'd' => Some(Self::Move(Direction::Down)),
            'l' => Some(Self::Move(Direction::Left)),
            'j' => Some(Self::Jump),
            _ => None,
        }
    }
}

/// Signed decimal argument of `customize`.
///
/// The digits are kept as text so arbitrarily long numbers still reduce to
/// an exact sprite index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpriteNumber {
    negative: bool,
    /// ASCII digits without leading zeros; `"0"` for zero.
    digits: String,
}

impl SpriteNumber {
    /// Read an optional sign and the run of digits that follows it, ignoring
    /// whatever comes after. `None` when there are no leading digits.
    pub fn parse_prefix(token: &str) -> Option<Self> {
        let (negative, rest) = match token.as_bytes().first() {
            Some(b'-') => (true, &token[1..]),
            Some(b'+') => (false, &token[1..]),
            _ => (false, token),
        };
        let run = rest.len() - rest.trim_start_matches(|c: char| c.is_ascii_digit()).len();
        if run == 0 {
            return None;
        }
        Some(Self::from_digits(negative, &rest[..run]))
    }

    fn from_digits(negative: bool, digits: &str) -> Self {
        let trimmed = digits.trim_start_matches('0');
        if trimmed.is_empty() {
            return Self {
                negative: false,
                digits: "0".to_string(),
            };
        }
        Self {
            negative,
            digits: trimmed.to_string(),
        }
    }

    /// The value modulo `modulus`, always in `[0, modulus)`. A zero modulus
    /// yields 0.
    pub fn rem_euclid(&self, modulus: u8) -> u8 {
        if modulus == 0 {
            return 0;
        }
        let m = u32::from(modulus);
        let rem = self
            .digits
            .bytes()
            .fold(0u32, |acc, digit| (acc * 10 + u32::from(digit - b'0')) % m);
        let rem = if self.negative && rem != 0 { m - rem } else { rem };
        u8::try_from(rem).unwrap_or(0)
    }
}

impl From<i64> for SpriteNumber {
    fn from(value: i64) -> Self {
        Self::from_digits(value < 0, &value.unsigned_abs().to_string())
    }
}

/// Parse command text (sigil already stripped).
pub fn parse(input: &str) -> Option<Command> {
    let mut tokens = input.split_whitespace();
    if tokens.next()? != "character" {
        return None;
    }
    match tokens.next()? {
        "move" => Some(parse_move(tokens.collect())),
        "customize" => SpriteNumber::parse_prefix(tokens.next()?).map(Command::Customize),
        "jump" => Some(Command::Jump),
        _ => None,
    }
}

fn parse_move(args: Vec<&str>) -> Command {
    if let Some(direction) = args.first().and_then(|word| Direction::from_word(word)) {
        return Command::Move(direction);
    }
    Command::Queue(args.iter().flat_map(|token| token.chars()).collect())
}
