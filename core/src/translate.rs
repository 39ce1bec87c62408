//! Text to Morse and back over the static tables.

use crate::charset::{
    char_for_code, code_for_char, code_for_prosign, compose_dakuten, decompose_dakuten,
    hira_to_kata, prosign_for_code, Charset,
};

/// Fold display notation back to ASCII tokens: the katakana middle dot
/// and long bar are accepted as dit/dah, the minus sign as dah, and the
/// ideographic space as a separator.
pub fn normalize(morse: &str) -> String {
    morse
        .chars()
        .map(|c| match c {
            '・' => '.',
            'ー' | '−' => '-',
            '　' => ' ',
            other => other,
        })
        .collect()
}

/// Render ASCII Morse in katakana notation (`・`/`ー`), the display
/// form `normalize` folds back.
pub fn to_kana_notation(morse: &str) -> String {
    morse
        .chars()
        .map(|c| match c {
            '.' => '・',
            '-' => 'ー',
            other => other,
        })
        .collect()
}

/// Split a word into translation tokens, keeping `[XX]` prosign
/// brackets together as one token.
fn tokenize(text: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut rest = text;
    while !rest.is_empty() {
        if rest.starts_with('[') {
            if let Some(end) = rest[1..].find(']') {
                let (prosign, tail) = rest.split_at(end + 2);
                tokens.push(prosign);
                rest = tail;
                continue;
            }
        }
        let next = rest
            .char_indices()
            .nth(1)
            .map_or(rest.len(), |(i, _)| i);
        tokens.push(&rest[..next]);
        rest = &rest[next..];
    }
    tokens
}

/// Encode text to a Morse string: single spaces between character codes,
/// `" / "` between words. Unknown characters are skipped.
pub fn encode_text(text: &str, charset: Charset) -> String {
    let words: Vec<String> = text
        .split_whitespace()
        .map(|word| encode_word(word, charset))
        .filter(|w| !w.is_empty())
        .collect();
    words.join(" / ")
}

fn encode_word(word: &str, charset: Charset) -> String {
    let mut codes: Vec<&str> = Vec::new();
    match charset {
        Charset::International => {
            for token in tokenize(word) {
                if token.starts_with('[') {
                    if let Some(code) = code_for_prosign(token) {
                        codes.push(code);
                    }
                } else if let Some(c) = token.chars().next() {
                    if let Some(code) =
                        code_for_char(Charset::International, c.to_ascii_uppercase())
                    {
                        codes.push(code);
                    }
                }
            }
        }
        Charset::Wabun => {
            for c in word.chars() {
                let kata = hira_to_kata(c);
                if let Some((base, mark)) = decompose_dakuten(kata) {
                    codes.extend(code_for_char(Charset::Wabun, base));
                    codes.extend(code_for_char(Charset::Wabun, mark));
                } else {
                    codes.extend(code_for_char(Charset::Wabun, kata));
                }
            }
        }
    }
    codes.join(" ")
}

/// Decode a Morse string to text. Words are separated by `/`, character
/// codes by whitespace; an unrecognized code becomes `?` and decoding
/// continues.
pub fn decode_morse(morse: &str, charset: Charset) -> String {
    let normalized = normalize(morse.trim());
    let words: Vec<String> = normalized
        .split('/')
        .map(|word| decode_word(word, charset))
        .filter(|w| !w.is_empty())
        .collect();
    words.join(" ")
}

fn decode_word(word: &str, charset: Charset) -> String {
    match charset {
        Charset::International => word
            .split_whitespace()
            .map(|code| {
                char_for_code(Charset::International, code)
                    .map(String::from)
                    .or_else(|| prosign_for_code(code).map(str::to_string))
                    .unwrap_or_else(|| "?".to_string())
            })
            .collect(),
        Charset::Wabun => {
            let mut out: Vec<char> = Vec::new();
            for code in word.split_whitespace() {
                match char_for_code(Charset::Wabun, code) {
                    Some(mark @ ('゛' | '゜')) => {
                        // A mark voices the kana it follows
                        match out.pop() {
                            Some(base) => match compose_dakuten(base, mark) {
                                Some(voiced) => out.push(voiced),
                                None => {
                                    out.push(base);
                                    out.push(mark);
                                }
                            },
                            None => out.push(mark),
                        }
                    }
                    Some(c) => out.push(c),
                    None => out.push('?'),
                }
            }
            out.into_iter().collect()
        }
    }
}
