// Softkey Transform Table
// Compiled transform rules and composition boundary prediction

use regex::{Captures, Regex};

use crate::transform::prefix::{non_capturing, prefix_pattern};

/// Appended to a suffix to test for a complete match that cannot extend
const SENTINEL: char = '\u{1D}';

/// One compiled rule
#[derive(Debug, Clone)]
struct TransformRule {
    source: String,
    /// `(?:rule)$` with the rule's own groups, for replacement
    tail: Regex,
    /// `^(?:rule)\x{1D}`
    complete: Regex,
    replacement: String,
}

/// Compiled transform rules of a layout.
///
/// Rules apply at the end of the text; the first rule (in declaration
/// order) matching there wins.
#[derive(Debug, Clone, Default)]
pub struct TransformTable {
    rules: Vec<TransformRule>,
    matcher: Option<Regex>,
    forward: Option<Regex>,
    reverse: Option<Regex>,
}

impl TransformTable {
    /// A table that never composes
    pub fn empty() -> Self {
        Self::default()
    }

    /// Compile `(pattern, replacement)` pairs in declaration order.
    ///
    /// Rules that fail to compile are logged and skipped.
    pub fn new<'a, I>(rules: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut compiled = Vec::new();
        let mut plains = Vec::new();
        let mut prefixes = Vec::new();
        for (pattern, replacement) in rules {
            match compile_rule(pattern, replacement) {
                Ok((rule, plain, prefix)) => {
                    compiled.push(rule);
                    plains.push(plain);
                    prefixes.push(prefix);
                }
                Err(e) => log::warn!("skipping transform '{}': {}", pattern, e),
            }
        }

        if compiled.is_empty() {
            return Self::empty();
        }

        let matcher = build(&format!(
            "(?:{})$",
            plains
                .iter()
                .map(|p| format!("(?:{})", p))
                .collect::<Vec<_>>()
                .join("|")
        ));
        let forward = build(&alternation(prefixes.iter()));
        let reverse = build(&alternation(prefixes.iter().rev()));
        match (matcher, forward, reverse) {
            (Some(matcher), Some(forward), Some(reverse)) => {
                log::debug!("compiled {} transform rules", compiled.len());
                Self {
                    rules: compiled,
                    matcher: Some(matcher),
                    forward: Some(forward),
                    reverse: Some(reverse),
                }
            }
            _ => {
                log::warn!("transform rules do not combine; composition disabled");
                Self::empty()
            }
        }
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Rewrite the end of `text` with the first matching rule
    pub fn apply(&self, text: &str) -> Option<String> {
        if !self.matcher.as_ref()?.is_match(text) {
            return None;
        }
        for rule in &self.rules {
            if let Some(caps) = rule.tail.captures(text) {
                let start = caps.get(0).map_or(text.len(), |m| m.start());
                let mut out = text[..start].to_string();
                caps.expand(&rule.replacement, &mut out);
                log::trace!("transform '{}': '{}' -> '{}'", rule.source, text, out);
                return Some(out);
            }
        }
        None
    }

    /// Earliest char index from which `text` could still grow into a
    /// different transform, or `None` when the whole text is settled.
    ///
    /// A suffix that is a prefix of some rule is ambiguous when the first
    /// and last such rules differ, or when it is not already a complete
    /// match of its rule.
    pub fn predict_transform_boundary(&self, text: &str) -> Option<usize> {
        let (forward, reverse) = (self.forward.as_ref()?, self.reverse.as_ref()?);
        let count = self.rules.len();

        for (index, (start, _)) in text.char_indices().enumerate() {
            let suffix = &text[start..];
            let Some(forward_caps) = forward.captures(suffix) else {
                continue;
            };
            let Some(rule) = longest_capture(&forward_caps, count) else {
                continue;
            };
            let reverse_rule = reverse
                .captures(suffix)
                .and_then(|caps| longest_capture(&caps, count))
                .map(|i| count - 1 - i);
            if reverse_rule != Some(rule) {
                return Some(index);
            }

            let padded = format!("{}{}", suffix, SENTINEL);
            if !self.rules[rule].complete.is_match(&padded) {
                return Some(index);
            }
        }
        None
    }
}

fn compile_rule(
    pattern: &str,
    replacement: &str,
) -> Result<(TransformRule, String, String), Box<dyn std::error::Error>> {
    let plain = non_capturing(pattern)?;
    let prefix = prefix_pattern(pattern)?;
    Regex::new(&format!("^(?:{})$", prefix))?;
    let rule = TransformRule {
        source: pattern.to_string(),
        tail: Regex::new(&format!("(?:{})$", pattern))?,
        complete: Regex::new(&format!("^(?:{})\\x{{1D}}", pattern))?,
        replacement: replacement.to_string(),
    };
    Ok((rule, plain, prefix))
}

fn alternation<'a>(prefixes: impl Iterator<Item = &'a String>) -> String {
    let groups: Vec<String> = prefixes.map(|p| format!("({})", p)).collect();
    format!("^(?:{})$", groups.join("|"))
}

fn build(pattern: &str) -> Option<Regex> {
    match Regex::new(pattern) {
        Ok(re) => Some(re),
        Err(e) => {
            log::warn!("transform matcher failed to compile: {}", e);
            None
        }
    }
}

/// Index of the rule group with the longest non-empty capture
fn longest_capture(caps: &Captures<'_>, count: usize) -> Option<usize> {
    let mut best: Option<(usize, usize)> = None;
    for i in 0..count {
        if let Some(m) = caps.get(i + 1) {
            let len = m.as_str().len();
            if len > 0 && best.map_or(true, |(_, l)| len > l) {
                best = Some((i, len));
            }
        }
    }
    best.map(|(i, _)| i)
}
