use crate::notation::token::{MoveToken, NotationError};

const MOVE_ALPHABET: &str = "RLFBUDMESrlfbudxyz2()'";

/// Canonicalize free-text algorithm notation into space-separated tokens.
///
/// Mirrors the input conventions of popular alg sheets: alternate quote
/// glyphs become primes, square brackets become parentheses, whole-cube
/// rotations are lowercased, everything outside the move alphabet is
/// dropped, and spacing is reinserted deterministically so the result
/// splits cleanly on whitespace. Idempotent.
pub fn normalize(input: &str) -> String {
    let replaced: String = input
        .chars()
        .map(|ch| match ch {
            '"' | '´' | '`' | '‘' | '’' => '\'',
            '[' => '(',
            ']' => ')',
            'X' => 'x',
            'Y' => 'y',
            'Z' => 'z',
            other => other,
        })
        .filter(|ch| MOVE_ALPHABET.contains(*ch))
        .collect();

    // Reinsert separators: space before '(', after ')', after a prime
    // unless ')' follows, after '2' unless a prime or ')' follows, and
    // after any layer letter unless ')', prime or '2' follows.
    let chars: Vec<char> = replaced.chars().collect();
    let mut spaced = String::with_capacity(chars.len() * 2);
    for (i, &ch) in chars.iter().enumerate() {
        let next = chars.get(i + 1).copied();
        if ch == '(' {
            spaced.push(' ');
            spaced.push(ch);
            continue;
        }
        spaced.push(ch);
        let split = match ch {
            ')' => true,
            '\'' => next != Some(')'),
            '2' => !matches!(next, Some('\'') | Some(')')),
            _ => !matches!(next, Some(')') | Some('\'') | Some('2')),
        };
        if split && next.is_some() {
            spaced.push(' ');
        }
    }

    // A '2' always binds to the letter before it, and "'2" renders as "2'".
    let glued = spaced.replace(" 2", "2").replace("'2", "2'");

    glued.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Parse normalized notation into tokens, stripping display-only
/// parentheses. Groups that contain no move (e.g. a stray "()") are
/// dropped entirely.
pub fn parse_alg(normalized: &str) -> Result<Vec<MoveToken>, NotationError> {
    normalized
        .split_whitespace()
        .filter_map(|word| {
            let bare: String = word.chars().filter(|ch| !"()".contains(*ch)).collect();
            if bare.is_empty() {
                None
            } else {
                Some(bare.parse())
            }
        })
        .collect()
}

/// Display tokens paired one-to-one with the parsed moves: the same split
/// as [`parse_alg`] but keeping the parentheses attached for rendering.
pub fn display_tokens(normalized: &str) -> Vec<String> {
    normalized
        .split_whitespace()
        .filter(|word| word.chars().any(|ch| !"()".contains(ch)))
        .map(|word| word.to_string())
        .collect()
}
