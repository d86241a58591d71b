//! Turbo shorthand scanner.
//!
//! Grammar: `[h|a]?<jersey 1-99><action-letter>[<outcome-digit>][(r|>|-)[h|a]?<jersey 1-99>]`,
//! case-insensitive, no whitespace. The parser is re-run on every input
//! mutation and always produces either a valid result or a structured
//! explanation of what remains to be typed.

use serde::Serialize;

use super::codes::ActionKind;
use crate::models::Side;

/// Which grammar pieces were successfully consumed, for incremental UI
/// feedback while the operator is still typing.
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub struct TurboBreakdown {
    pub team: bool,
    pub jersey: bool,
    pub action: bool,
    pub outcome: bool,
    pub recipient: bool,
}

/// Structured parse outcome. Never panics, never throws: an invalid
/// command carries a human-readable reason plus the partial breakdown.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct TurboParseResult {
    pub valid: bool,
    pub team: Option<Side>,
    pub jersey: Option<u8>,
    pub action: Option<ActionKind>,
    pub outcome: Option<String>,
    pub outcome_index: Option<u8>,
    pub recipient_team: Option<Side>,
    pub recipient_jersey: Option<u8>,
    pub needs_recipient: bool,
    pub error: Option<String>,
    pub breakdown: TurboBreakdown,
}

impl TurboParseResult {
    /// Operator-facing hint line: what was understood so far, or what is
    /// still missing.
    pub fn describe(&self) -> String {
        if self.valid {
            let action = self.action.map(ActionKind::label).unwrap_or("?");
            let mut line = format!(
                "{}{} {}",
                prefix_char(self.team),
                self.jersey.unwrap_or(0),
                action
            );
            if let Some(outcome) = &self.outcome {
                line.push_str(&format!(" ({})", outcome));
            }
            if let Some(recipient) = self.recipient_jersey {
                line.push_str(&format!(" -> {}{}", prefix_char(self.recipient_team), recipient));
            }
            line
        } else {
            self.error.clone().unwrap_or_else(|| "incomplete command".to_string())
        }
    }
}

fn prefix_char(side: Option<Side>) -> &'static str {
    match side {
        Some(Side::Home) => "h",
        Some(Side::Away) => "a",
        None => "#",
    }
}

struct Cursor<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(input: &'a str) -> Self {
        Self { bytes: input.as_bytes(), pos: 0 }
    }

    fn peek(&self) -> Option<char> {
        self.bytes.get(self.pos).map(|&b| b as char)
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.bytes.get(self.pos + offset).map(|&b| b as char)
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        Some(c)
    }

    /// Consume a maximal run of ASCII digits.
    fn take_digits(&mut self) -> &'a str {
        let start = self.pos;
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.pos += 1;
        }
        // Input is pre-lowercased ASCII; the slice stays on char bounds.
        std::str::from_utf8(&self.bytes[start..self.pos]).unwrap_or("")
    }

    fn rest(&self) -> &'a str {
        std::str::from_utf8(&self.bytes[self.pos..]).unwrap_or("")
    }

    fn at_end(&self) -> bool {
        self.pos >= self.bytes.len()
    }
}

/// Consume an `h`/`a` team prefix, but only when a digit follows: this is
/// what disambiguates a prefix from an action letter.
fn take_team_prefix(cur: &mut Cursor) -> Option<Side> {
    let side = match cur.peek()? {
        'h' => Side::Home,
        'a' => Side::Away,
        _ => return None,
    };
    if cur.peek_at(1).is_some_and(|c| c.is_ascii_digit()) {
        cur.bump();
        Some(side)
    } else {
        None
    }
}

/// Parse one jersey-digit run already known to be non-empty.
fn parse_jersey(digits: &str) -> Result<u8, String> {
    match digits.parse::<u32>() {
        Ok(n) if (1..=99).contains(&n) => Ok(n as u8),
        _ => Err(format!("jersey number {} out of range (1-99)", digits)),
    }
}

pub fn parse(input: &str) -> TurboParseResult {
    let lowered = input.trim().to_ascii_lowercase();
    let mut cur = Cursor::new(&lowered);
    let mut result = TurboParseResult::default();

    if cur.at_end() {
        result.error = Some("type a jersey number to start".to_string());
        return result;
    }

    // team prefix
    if let Some(side) = take_team_prefix(&mut cur) {
        result.team = Some(side);
        result.breakdown.team = true;
    }

    // jersey
    let digits = cur.take_digits();
    if digits.is_empty() {
        result.error = Some("missing jersey number".to_string());
        return result;
    }
    match parse_jersey(digits) {
        Ok(jersey) => {
            result.jersey = Some(jersey);
            result.breakdown.jersey = true;
        }
        Err(reason) => {
            // The partial team flag is still reported.
            result.error = Some(reason);
            return result;
        }
    }

    // action
    let Some(code) = cur.bump() else {
        result.error = Some("missing action code".to_string());
        return result;
    };
    let Some(action) = ActionKind::from_code(code) else {
        result.error = Some(format!("unknown action '{}'", code));
        return result;
    };
    result.action = Some(action);
    result.breakdown.action = true;
    result.needs_recipient = action.needs_recipient();

    // outcome (optional digits)
    let digits = cur.take_digits();
    if !digits.is_empty() {
        let table = action.outcomes();
        let index = digits.parse::<u32>().unwrap_or(0);
        if index == 0 || index as usize > table.len() {
            result.error = Some(format!("invalid outcome {} for {}", digits, action.label()));
            return result;
        }
        result.outcome_index = Some(index as u8);
        result.outcome = Some(table[index as usize - 1].to_string());
        result.breakdown.outcome = true;
    }

    // recipient
    if matches!(cur.peek(), Some('r') | Some('>') | Some('-')) {
        cur.bump();
        if let Some(side) = take_team_prefix(&mut cur) {
            result.recipient_team = Some(side);
        }
        let digits = cur.take_digits();
        if digits.is_empty() {
            result.error = Some("missing recipient number".to_string());
            return result;
        }
        match parse_jersey(digits) {
            Ok(jersey) => {
                result.recipient_jersey = Some(jersey);
                result.breakdown.recipient = true;
            }
            Err(reason) => {
                result.error = Some(format!("recipient {}", reason));
                return result;
            }
        }
    }

    // Anything left over is a hard failure.
    if !cur.at_end() {
        result.error = Some(format!("unexpected trailing input '{}'", cur.rest()));
        return result;
    }

    // Post-parse validity: parsing succeeded, but the command may still be
    // incomplete. Surfaced as a not-yet-valid state for live feedback.
    let action = result.action.unwrap_or(ActionKind::Pass);
    if !action.outcomes().is_empty() && result.outcome_index.is_none() {
        result.error = Some(format!(
            "{} needs an outcome (1-{})",
            action.label(),
            action.outcomes().len()
        ));
        return result;
    }
    if result.needs_recipient && result.recipient_jersey.is_none() {
        result.error = Some("pass needs a recipient: '>' then a jersey number".to_string());
        return result;
    }

    result.valid = true;
    result
}
