//! American Soundex.
//!
//! The four-character archival code: first letter plus three digits, with
//! the H/W transparency rule (consonants with the same digit separated by H
//! or W code once, while vowels break the run).

/// Digit class of a letter, `None` for vowels and for H/W/Y.
fn digit(c: char) -> Option<char> {
    match c {
        'B' | 'F' | 'P' | 'V' => Some('1'),
        'C' | 'G' | 'J' | 'K' | 'Q' | 'S' | 'X' | 'Z' => Some('2'),
        'D' | 'T' => Some('3'),
        'L' => Some('4'),
        'M' | 'N' => Some('5'),
        'R' => Some('6'),
        _ => None,
    }
}

/// Compute the Soundex code of a word.
///
/// Non-ASCII-alphabetic characters are ignored. Returns an empty string for
/// input with no letters; otherwise always exactly four characters.
pub fn soundex(input: &str) -> String {
    let mut letters = input
        .chars()
        .filter(char::is_ascii_alphabetic)
        .map(|c| c.to_ascii_uppercase());

    let Some(first) = letters.next() else {
        return String::new();
    };

    let mut code = String::with_capacity(4);
    code.push(first);
    let mut last_digit = digit(first);

    for c in letters {
        if code.len() == 4 {
            break;
        }
        match digit(c) {
            Some(d) => {
                if last_digit != Some(d) {
                    code.push(d);
                }
                last_digit = Some(d);
            }
            // H and W are transparent; vowels and Y reset the run.
            None if c == 'H' || c == 'W' => {}
            None => last_digit = None,
        }
    }

    while code.len() < 4 {
        code.push('0');
    }
    code
}
