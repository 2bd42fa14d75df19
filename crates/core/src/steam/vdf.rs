//! Structural scanner for Valve's text key/value format (`libraryfolders.vdf`,
//! `appmanifest_*.acf`).
//!
//! Grammar accepted:
//!
//! ```text
//! document := item*
//! item     := token ( token | '{' item* '}' )
//! token    := '"' ( '\' any | [^"] )* '"'  |  bare
//! bare     := [^ \t\r\n"{}]+
//! comment  := "//" to end of line
//! ```
//!
//! Only `key value` pairs are reported; section names just raise the depth.
//! Malformed input never errors: an unterminated string ends the scan, a stray
//! `}` is ignored, and a key with no value is dropped.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyValue {
    /// Number of enclosing `{ }` sections.
    pub depth: usize,
    pub key: String,
    pub value: String,
}

#[derive(Debug, PartialEq, Eq)]
enum Token {
    Str(String),
    Open,
    Close,
}

fn tokenize(text: &str) -> Vec<Token> {
    let mut out = Vec::new();
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '{' => out.push(Token::Open),
            '}' => out.push(Token::Close),
            '"' => {
                let mut s = String::new();
                let mut closed = false;
                while let Some(c) = chars.next() {
                    match c {
                        '"' => {
                            closed = true;
                            break;
                        }
                        '\\' => match chars.next() {
                            Some('n') => s.push('\n'),
                            Some('t') => s.push('\t'),
                            Some(other) => s.push(other),
                            None => break,
                        },
                        other => s.push(other),
                    }
                }
                if !closed {
                    break;
                }
                out.push(Token::Str(s));
            }
            '/' if chars.peek() == Some(&'/') => {
                for c in chars.by_ref() {
                    if c == '\n' {
                        break;
                    }
                }
            }
            c if c.is_whitespace() => {}
            c => {
                let mut s = String::from(c);
                while let Some(&n) = chars.peek() {
                    if n.is_whitespace() || matches!(n, '"' | '{' | '}') {
                        break;
                    }
                    s.push(n);
                    chars.next();
                }
                out.push(Token::Str(s));
            }
        }
    }
    out
}

/// All `key value` pairs in document order.
pub fn key_values(text: &str) -> Vec<KeyValue> {
    let mut out = Vec::new();
    let mut depth = 0usize;
    let mut pending: Option<String> = None;

    for tok in tokenize(text) {
        match tok {
            Token::Str(s) => match pending.take() {
                Some(key) => out.push(KeyValue {
                    depth,
                    key,
                    value: s,
                }),
                None => pending = Some(s),
            },
            Token::Open => {
                pending = None;
                depth += 1;
            }
            Token::Close => {
                pending = None;
                depth = depth.saturating_sub(1);
            }
        }
    }
    out
}

/// Every value stored under `key` (exact match), at any depth.
pub fn values_of(text: &str, key: &str) -> Vec<String> {
    key_values(text)
        .into_iter()
        .filter(|kv| kv.key == key)
        .map(|kv| kv.value)
        .collect()
}

/// Value of the shallowest `key` (case-insensitive); ties go to the first one.
pub fn shallowest_value(text: &str, key: &str) -> Option<String> {
    key_values(text)
        .into_iter()
        .filter(|kv| kv.key.eq_ignore_ascii_case(key))
        .min_by_key(|kv| kv.depth)
        .map(|kv| kv.value)
}
