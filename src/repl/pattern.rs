/// Pattern-based command parsing
///
/// A [`CommandParser`] holds an ordered list of anchored regular expressions,
/// each paired with a builder that turns the captured groups into a typed
/// command. Every rule is evaluated against the line, in declaration order;
/// all matching rules produce a command.
use regex::Regex;
use std::fmt;

/// Builds a command from the capture groups of a match (group 0 excluded).
pub type Builder<C> = fn(&[&str]) -> C;

struct Rule<C> {
    pattern: Regex,
    build: Builder<C>,
}

pub struct CommandParser<C> {
    rules: Vec<Rule<C>>,
}

impl<C> CommandParser<C> {
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Append a rule. Rules are evaluated in the order they are added.
    pub fn rule(mut self, pattern: &str, build: Builder<C>) -> Result<Self, regex::Error> {
        self.rules.push(Rule {
            pattern: Regex::new(pattern)?,
            build,
        });
        Ok(self)
    }

    /// Commands built by every rule matching `line`, in rule order.
    ///
    /// An empty result means no rule matched.
    pub fn parse(&self, line: &str) -> Vec<C> {
        self.rules
            .iter()
            .filter_map(|rule| {
                let captures = rule.pattern.captures(line)?;
                let args: Vec<&str> = captures
                    .iter()
                    .skip(1)
                    .map(|group| group.map_or("", |m| m.as_str()))
                    .collect();
                Some((rule.build)(&args))
            })
            .collect()
    }

    /// Like [`parse`](Self::parse), handing the raw line to `fallback` when
    /// nothing matched. Returns whether any rule matched.
    pub fn dispatch(
        &self,
        line: &str,
        mut handle: impl FnMut(C),
        fallback: impl FnOnce(&str),
    ) -> bool {
        let commands = self.parse(line);
        if commands.is_empty() {
            fallback(line);
            return false;
        }
        for command in commands {
            handle(command);
        }
        true
    }
}

impl<C> Default for CommandParser<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> fmt::Debug for CommandParser<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.rules.iter().map(|r| r.pattern.as_str()))
            .finish()
    }
}

/// Integer prefix of `s`, the way a console user expects `step 2x` to read
/// as `2`. Returns `None` when `s` has no leading digits.
pub fn parse_leading_int(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (negative, digits) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s.strip_prefix('+').unwrap_or(s)),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    let value = digits[..end].parse::<i64>().unwrap_or(i64::MAX);
    Some(if negative { -value } else { value })
}
