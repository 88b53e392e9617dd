// Softkey Prefix Regex Builder
// Rewrites a transform pattern into one matching every prefix of its matches
//
// Only the regex subset layouts use is understood: literals, escapes,
// classes, `.`, groups, alternation, anchors and the usual quantifiers.
// Capturing groups come out non-capturing so the caller can wrap each rule
// in its own numbered group.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefixError {
    pub pattern: String,
    pub message: String,
}

impl fmt::Display for PrefixError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cannot build prefix of '{}': {}", self.pattern, self.message)
    }
}

impl std::error::Error for PrefixError {}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Node {
    /// Consumes exactly one character: literal, escape, class or `.`
    Atom(String),
    /// Zero-width: anchors, inline flags
    Assertion(String),
    /// `open` is the rendered group opener, always non-capturing
    Group { open: String, alternatives: Vec<Vec<Piece>> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Repeat {
    /// `?`
    Optional,
    /// `*`, `+`, `{n,}`
    Unbounded,
    /// `{n}`, `{n,m}`
    AtMost(u32),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Piece {
    node: Node,
    /// Quantifier as written, including a lazy `?`
    quantifier: String,
    repeat: Option<Repeat>,
}

/// Build a regex matching exactly the prefixes (empty included) of the
/// strings `pattern` matches.
pub fn prefix_pattern(pattern: &str) -> Result<String, PrefixError> {
    let alternatives = Parser::new(pattern).parse()?;
    Ok(render_prefix_alternatives(&alternatives))
}

/// Same pattern with capturing groups made non-capturing
pub fn non_capturing(pattern: &str) -> Result<String, PrefixError> {
    let alternatives = Parser::new(pattern).parse()?;
    Ok(render_alternatives(&alternatives))
}

fn render_alternatives(alternatives: &[Vec<Piece>]) -> String {
    alternatives
        .iter()
        .map(|seq| seq.iter().map(render_piece).collect::<String>())
        .collect::<Vec<_>>()
        .join("|")
}

fn render_node(node: &Node) -> String {
    match node {
        Node::Atom(text) | Node::Assertion(text) => text.clone(),
        Node::Group { open, alternatives } => {
            format!("{}{})", open, render_alternatives(alternatives))
        }
    }
}

fn render_piece(piece: &Piece) -> String {
    format!("{}{}", render_node(&piece.node), piece.quantifier)
}

fn render_prefix_alternatives(alternatives: &[Vec<Piece>]) -> String {
    alternatives
        .iter()
        .map(|seq| render_prefix_sequence(seq))
        .collect::<Vec<_>>()
        .join("|")
}

/// P(x1 x2 .. xn) = x1 P(x2 .. xn) | P(x1)
fn render_prefix_sequence(seq: &[Piece]) -> String {
    match seq {
        [] => String::new(),
        [only] => render_prefix_piece(only),
        [first, rest @ ..] => format!(
            "(?:{}{}|{})",
            render_piece(first),
            render_prefix_sequence(rest),
            render_prefix_piece(first)
        ),
    }
}

fn render_prefix_node(node: &Node) -> String {
    match node {
        Node::Atom(text) => format!("(?:{})?", text),
        Node::Assertion(text) => text.clone(),
        Node::Group { open, alternatives } => {
            format!("{}{})", open, render_prefix_alternatives(alternatives))
        }
    }
}

fn render_prefix_piece(piece: &Piece) -> String {
    let whole = render_node(&piece.node);
    let prefix = render_prefix_node(&piece.node);
    match piece.repeat {
        None | Some(Repeat::Optional) => prefix,
        Some(Repeat::Unbounded) => format!("(?:{})*{}", whole, prefix),
        Some(Repeat::AtMost(0)) => String::new(),
        Some(Repeat::AtMost(max)) => format!("(?:{}){{0,{}}}{}", whole, max - 1, prefix),
    }
}

struct Parser<'a> {
    pattern: &'a str,
    chars: Vec<char>,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(pattern: &'a str) -> Self {
        Self {
            pattern,
            chars: pattern.chars().collect(),
            pos: 0,
        }
    }

    fn error(&self, message: impl Into<String>) -> PrefixError {
        PrefixError {
            pattern: self.pattern.to_string(),
            message: message.into(),
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += 1;
        Some(ch)
    }

    fn parse(mut self) -> Result<Vec<Vec<Piece>>, PrefixError> {
        let alternatives = self.parse_alternatives()?;
        if self.pos < self.chars.len() {
            return Err(self.error(format!("unbalanced ')' at {}", self.pos)));
        }
        Ok(alternatives)
    }

    fn parse_alternatives(&mut self) -> Result<Vec<Vec<Piece>>, PrefixError> {
        let mut alternatives = vec![self.parse_sequence()?];
        while self.peek() == Some('|') {
            self.pos += 1;
            alternatives.push(self.parse_sequence()?);
        }
        Ok(alternatives)
    }

    fn parse_sequence(&mut self) -> Result<Vec<Piece>, PrefixError> {
        let mut pieces = Vec::new();
        while let Some(ch) = self.peek() {
            if ch == '|' || ch == ')' {
                break;
            }
            let node = self.parse_node()?;
            let (quantifier, repeat) = self.parse_quantifier()?;
            if repeat.is_some() && matches!(node, Node::Assertion(_)) {
                return Err(self.error("quantifier on a zero-width item"));
            }
            pieces.push(Piece {
                node,
                quantifier,
                repeat,
            });
        }
        Ok(pieces)
    }

    fn parse_node(&mut self) -> Result<Node, PrefixError> {
        let Some(ch) = self.bump() else {
            return Err(self.error("unexpected end of pattern"));
        };
        match ch {
            '(' => self.parse_group(),
            '[' => self.parse_class(),
            '\\' => self.parse_escape(),
            '^' | '$' => Ok(Node::Assertion(ch.to_string())),
            '.' => Ok(Node::Atom(".".to_string())),
            '*' | '+' | '?' | '{' => Err(self.error(format!("dangling quantifier '{}'", ch))),
            _ => Ok(Node::Atom(escape_literal(ch))),
        }
    }

    fn parse_group(&mut self) -> Result<Node, PrefixError> {
        let mut open = String::from("(?:");
        if self.peek() == Some('?') {
            self.pos += 1;
            match self.peek() {
                Some(':') => {
                    self.pos += 1;
                }
                Some('P') | Some('<') => {
                    // Named capture: drop the name.
                    while let Some(ch) = self.bump() {
                        if ch == '>' {
                            break;
                        }
                    }
                }
                _ => {
                    // Inline flags: `(?i)` or `(?i:...)`
                    let mut flags = String::new();
                    loop {
                        match self.bump() {
                            Some(':') => break,
                            Some(')') => return Ok(Node::Assertion(format!("(?{})", flags))),
                            Some(ch) => flags.push(ch),
                            None => return Err(self.error("unterminated group flags")),
                        }
                    }
                    open = format!("(?{}:", flags);
                }
            }
        }

        let alternatives = self.parse_alternatives()?;
        if self.bump() != Some(')') {
            return Err(self.error("missing ')'"));
        }
        Ok(Node::Group { open, alternatives })
    }

    fn parse_class(&mut self) -> Result<Node, PrefixError> {
        let mut text = String::from("[");
        let mut depth = 1;
        let mut first = true;
        while let Some(ch) = self.bump() {
            text.push(ch);
            match ch {
                '\\' => {
                    if let Some(next) = self.bump() {
                        text.push(next);
                    }
                }
                '^' if first => continue,
                ']' if first => {}
                '[' => depth += 1,
                ']' => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(Node::Atom(text));
                    }
                }
                _ => {}
            }
            first = false;
        }
        Err(self.error("unterminated character class"))
    }

    fn parse_escape(&mut self) -> Result<Node, PrefixError> {
        let Some(ch) = self.bump() else {
            return Err(self.error("trailing backslash"));
        };
        let mut text = format!("\\{}", ch);
        match ch {
            'b' | 'B' | 'A' | 'z' => return Ok(Node::Assertion(text)),
            'x' | 'u' | 'U' | 'p' | 'P' if self.peek() == Some('{') => {
                while let Some(next) = self.bump() {
                    text.push(next);
                    if next == '}' {
                        return Ok(Node::Atom(text));
                    }
                }
                return Err(self.error("unterminated escape braces"));
            }
            'x' | 'u' | 'U' => {
                let digits = match ch {
                    'x' => 2,
                    'u' => 4,
                    _ => 8,
                };
                for _ in 0..digits {
                    match self.bump() {
                        Some(hex) => text.push(hex),
                        None => return Err(self.error("short hex escape")),
                    }
                }
            }
            'p' | 'P' => match self.bump() {
                Some(class) => text.push(class),
                None => return Err(self.error("short unicode class escape")),
            },
            _ => {}
        }
        Ok(Node::Atom(text))
    }

    fn parse_quantifier(&mut self) -> Result<(String, Option<Repeat>), PrefixError> {
        let (mut text, repeat) = match self.peek() {
            Some('?') => {
                self.pos += 1;
                ("?".to_string(), Repeat::Optional)
            }
            Some('*') | Some('+') => {
                let ch = self.bump().unwrap_or('*');
                (ch.to_string(), Repeat::Unbounded)
            }
            Some('{') => match self.parse_counted()? {
                Some(counted) => counted,
                None => return Ok((String::new(), None)),
            },
            _ => return Ok((String::new(), None)),
        };
        if self.peek() == Some('?') {
            self.pos += 1;
            text.push('?');
        }
        Ok((text, Some(repeat)))
    }

    /// `{n}`, `{n,}` or `{n,m}`; a `{` not followed by a count is a literal
    fn parse_counted(&mut self) -> Result<Option<(String, Repeat)>, PrefixError> {
        let start = self.pos;
        let Some(close) = self.chars[start..].iter().position(|&c| c == '}') else {
            return Ok(None);
        };
        let body: String = self.chars[start + 1..start + close].iter().collect();
        let parse = |s: &str| s.trim().parse::<u32>().ok();
        let repeat = match body.split_once(',') {
            None => parse(&body).map(Repeat::AtMost),
            Some((min, "")) => parse(min).map(|_| Repeat::Unbounded),
            Some((min, max)) => match (parse(min), parse(max)) {
                (Some(lo), Some(hi)) if lo <= hi => Some(Repeat::AtMost(hi)),
                (Some(_), Some(_)) => return Err(self.error(format!("bad repeat {{{}}}", body))),
                _ => None,
            },
        };
        let Some(repeat) = repeat else {
            return Ok(None);
        };
        self.pos = start + close + 1;
        Ok(Some((format!("{{{}}}", body), repeat)))
    }
}

fn escape_literal(ch: char) -> String {
    regex::escape(ch.encode_utf8(&mut [0; 4]))
}
