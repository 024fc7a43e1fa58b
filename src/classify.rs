// Copyright (C) 2026 Michael Wilson <mike@mdwn.dev>
//
// This program is free software: you can redistribute it and/or modify it under
// the terms of the GNU General Public License as published by the Free Software
// Foundation, version 3.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with
// this program. If not, see <https://www.gnu.org/licenses/>.
//

//! Classification of input tokens into sound categories.
//!
//! Classification is a total, deterministic function over an ordered rule
//! chain; the first matching rule wins. The voiced-punctuation rule is gated
//! on the special punctuation setting and explicitly defers to the symbolic
//! rule when the setting is off.

/// Characters that play a sustained "vocal" tone rather than a spoken
/// phoneme. The position of a character in this table is its index into the
/// vocals directory of the asset pack.
pub const HARMONIC_CHARS: &str = "0123456789-=";

/// Token emitted by key extraction for the tab key.
pub const TOKEN_TAB: &str = "tab";

/// Token emitted by key extraction for the backspace key.
pub const TOKEN_BACKSPACE: &str = "backspace";

/// A voiced punctuation noise. These are short animalese interjections
/// recorded per voice, unlike the shared sfx used for other punctuation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Noise {
    /// Played for `!`.
    Exclamation,
    /// Played for `?`.
    Question,
    /// Played for newline.
    Acknowledge,
}

impl Noise {
    /// The asset file stem for this noise.
    pub fn asset_name(&self) -> &'static str {
        match self {
            Noise::Exclamation => "exclamation-noise",
            Noise::Question => "question-noise",
            Noise::Acknowledge => "acknowledge-noise",
        }
    }
}

/// The sound category of an input token. Exactly one class applies per token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CharacterClass {
    /// A single ASCII letter, spoken as an animalese phoneme.
    Alphabetical(char),
    /// A harmonic character; the payload is its index in [`HARMONIC_CHARS`].
    Harmonic(usize),
    /// Punctuation with a per-voice recorded line.
    VoicedPunctuation(Noise),
    /// A symbol played from the shared sfx directory; the payload is the
    /// canonical sfx file stem.
    Symbolic(&'static str),
    /// The tab key.
    ControlTab,
    /// The backspace key.
    ControlBackspace,
    /// Anything unrecognized.
    Default,
}

/// Canonical sfx name for a symbol character. Symbols without an entry here
/// still classify as symbolic but resolve to the "default" sfx.
fn symbol_name(c: char) -> Option<&'static str> {
    match c {
        '~' => Some("tilde"),
        '!' => Some("exclamation"),
        '@' => Some("at"),
        '#' => Some("pound"),
        '$' => Some("dollar"),
        '%' => Some("percent"),
        '^' => Some("caret"),
        '&' => Some("ampersand"),
        '*' => Some("asterisk"),
        '(' => Some("parenthesis_open"),
        ')' => Some("parenthesis_closed"),
        '{' => Some("brace_open"),
        '}' => Some("brace_closed"),
        '[' => Some("bracket_open"),
        ']' => Some("bracket_closed"),
        '?' => Some("question"),
        '\n' => Some("enter"),
        '/' => Some("slash_forward"),
        '\\' => Some("slash_back"),
        _ => None,
    }
}

/// Returns true for tokens that receive the non-randomized "melodic" pitch
/// treatment: harmonic characters, plus any numeric-typed input.
pub fn is_melodic(token: &str) -> bool {
    if matches!(classify(token, false), CharacterClass::Harmonic(_)) {
        return true;
    }
    token.parse::<f64>().is_ok()
}

/// Classifies a token into its sound category.
///
/// `special_punctuation` gates the voiced-punctuation rule: when off, those
/// characters fall through to the symbolic rule.
pub fn classify(token: &str, special_punctuation: bool) -> CharacterClass {
    // Multi-character tokens are either control literals or unrecognized.
    let mut chars = token.chars();
    let c = match (chars.next(), chars.next()) {
        (Some(c), None) => c,
        _ => {
            return match token {
                TOKEN_TAB => CharacterClass::ControlTab,
                TOKEN_BACKSPACE => CharacterClass::ControlBackspace,
                _ => CharacterClass::Default,
            }
        }
    };

    if c.is_ascii_alphabetic() {
        return CharacterClass::Alphabetical(c);
    }

    if let Some(index) = HARMONIC_CHARS.find(c) {
        return CharacterClass::Harmonic(index);
    }

    if special_punctuation {
        match c {
            '!' => return CharacterClass::VoicedPunctuation(Noise::Exclamation),
            '?' => return CharacterClass::VoicedPunctuation(Noise::Question),
            '\n' => return CharacterClass::VoicedPunctuation(Noise::Acknowledge),
            _ => {}
        }
    }

    if c.is_ascii_punctuation() || c == '\n' {
        return CharacterClass::Symbolic(symbol_name(c).unwrap_or("default"));
    }

    CharacterClass::Default
}
