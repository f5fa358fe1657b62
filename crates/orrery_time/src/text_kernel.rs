//! NAIF text kernel parser.
//!
//! Reads the `\begindata` sections of a text kernel (LSK, meta-kernel, ...)
//! into a map of variable name → values. Values are numbers (with Fortran
//! `D` exponents and `@YYYY-MON-DD` date literals) or single-quoted strings.
//!
//! Reference: NAIF Kernel Required Reading (public domain, US Government
//! work product). Implementation is original.

use std::collections::HashMap;

use crate::error::TimeError;
use crate::julian::{calendar_to_j2000_seconds, month_from_abbrev};

/// One value of a kernel pool variable.
#[derive(Debug, Clone, PartialEq)]
pub enum PoolValue {
    Number(f64),
    Text(String),
}

/// Parsed variables of a text kernel.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextKernel {
    variables: HashMap<String, Vec<PoolValue>>,
}

impl TextKernel {
    /// Parse the data sections of a text kernel.
    pub fn parse(content: &str) -> Result<Self, TimeError> {
        let data = extract_data_sections(content)?;
        let tokens = tokenize(&data)?;
        let variables = assign(tokens)?;
        Ok(Self { variables })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.variables.contains_key(name)
    }

    /// Raw values of a variable.
    pub fn get(&self, name: &str) -> Option<&[PoolValue]> {
        self.variables.get(name).map(Vec::as_slice)
    }

    /// Variable names in unspecified order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.variables.keys().map(String::as_str)
    }

    /// All values of a numeric variable.
    pub fn numbers(&self, name: &str) -> Result<Vec<f64>, TimeError> {
        self.required(name)?
            .iter()
            .map(|v| match v {
                PoolValue::Number(n) => Ok(*n),
                PoolValue::Text(_) => Err(TimeError::TextKernel(format!(
                    "{name} holds strings, expected numbers"
                ))),
            })
            .collect()
    }

    /// First value of a numeric variable.
    pub fn scalar(&self, name: &str) -> Result<f64, TimeError> {
        self.numbers(name)?
            .first()
            .copied()
            .ok_or_else(|| TimeError::TextKernel(format!("{name} has no values")))
    }

    /// All values of a string variable.
    pub fn strings(&self, name: &str) -> Result<Vec<String>, TimeError> {
        self.required(name)?
            .iter()
            .map(|v| match v {
                PoolValue::Text(s) => Ok(s.clone()),
                PoolValue::Number(_) => Err(TimeError::TextKernel(format!(
                    "{name} holds numbers, expected strings"
                ))),
            })
            .collect()
    }

    fn required(&self, name: &str) -> Result<&[PoolValue], TimeError> {
        self.get(name)
            .ok_or_else(|| TimeError::TextKernel(format!("missing {name}")))
    }
}

/// Concatenate every `\begindata` … `\begintext` block.
fn extract_data_sections(content: &str) -> Result<String, TimeError> {
    let mut in_data = false;
    let mut seen_data = false;
    let mut lines = Vec::new();

    for line in content.lines() {
        let trimmed = line.trim();
        if trimmed.eq_ignore_ascii_case("\\begindata") {
            in_data = true;
            seen_data = true;
        } else if trimmed.eq_ignore_ascii_case("\\begintext") {
            in_data = false;
        } else if in_data {
            lines.push(line);
        }
    }

    if !seen_data {
        return Err(TimeError::TextKernel("no \\begindata section found".into()));
    }
    Ok(lines.join("\n"))
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Word(String),
    Quoted(String),
    Assign,
    Append,
    Open,
    Close,
}

fn tokenize(text: &str) -> Result<Vec<Token>, TimeError> {
    let mut tokens = Vec::new();
    let mut chars = text.chars().peekable();

    while let Some(&c) = chars.peek() {
        match c {
            c if c.is_whitespace() || c == ',' => {
                chars.next();
            }
            '(' => {
                chars.next();
                tokens.push(Token::Open);
            }
            ')' => {
                chars.next();
                tokens.push(Token::Close);
            }
            '=' => {
                chars.next();
                tokens.push(Token::Assign);
            }
            '\'' => {
                chars.next();
                let mut s = String::new();
                loop {
                    match chars.next() {
                        Some('\'') if chars.peek() == Some(&'\'') => {
                            chars.next();
                            s.push('\'');
                        }
                        Some('\'') => break,
                        Some('\n') | None => {
                            return Err(TimeError::TextKernel(format!(
                                "unterminated string '{s}"
                            )));
                        }
                        Some(other) => s.push(other),
                    }
                }
                tokens.push(Token::Quoted(s));
            }
            _ => {
                let mut word = String::new();
                while let Some(&c) = chars.peek() {
                    if c.is_whitespace() || matches!(c, ',' | '(' | ')' | '=' | '\'') {
                        break;
                    }
                    chars.next();
                    if c == '+' && chars.peek() == Some(&'=') {
                        chars.next();
                        if !word.is_empty() {
                            tokens.push(Token::Word(std::mem::take(&mut word)));
                        }
                        tokens.push(Token::Append);
                        break;
                    }
                    word.push(c);
                }
                if !word.is_empty() {
                    tokens.push(Token::Word(word));
                }
            }
        }
    }

    Ok(tokens)
}

fn assign(tokens: Vec<Token>) -> Result<HashMap<String, Vec<PoolValue>>, TimeError> {
    let mut vars: HashMap<String, Vec<PoolValue>> = HashMap::new();
    let mut iter = tokens.into_iter();

    while let Some(token) = iter.next() {
        let Token::Word(name) = token else {
            return Err(TimeError::TextKernel(format!(
                "expected a variable name, found {token:?}"
            )));
        };
        let append = match iter.next() {
            Some(Token::Assign) => false,
            Some(Token::Append) => true,
            other => {
                return Err(TimeError::TextKernel(format!(
                    "expected '=' or '+=' after {name}, found {other:?}"
                )));
            }
        };

        let mut values = Vec::new();
        match iter.next() {
            Some(Token::Open) => loop {
                match iter.next() {
                    Some(Token::Close) => break,
                    Some(tok) => values.push(value_of(tok, &name)?),
                    None => {
                        return Err(TimeError::TextKernel(format!(
                            "unclosed value list for {name}"
                        )));
                    }
                }
            },
            Some(tok) => values.push(value_of(tok, &name)?),
            None => {
                return Err(TimeError::TextKernel(format!("{name} has no value")));
            }
        }

        if append {
            vars.entry(name).or_default().extend(values);
        } else {
            vars.insert(name, values);
        }
    }

    Ok(vars)
}

fn value_of(token: Token, name: &str) -> Result<PoolValue, TimeError> {
    match token {
        Token::Quoted(s) => Ok(PoolValue::Text(s)),
        Token::Word(w) => parse_number(&w).map(PoolValue::Number),
        other => Err(TimeError::TextKernel(format!(
            "unexpected {other:?} in value of {name}"
        ))),
    }
}

/// Parse a numeric token: plain floats, Fortran `D` exponents, or `@date`.
fn parse_number(token: &str) -> Result<f64, TimeError> {
    if let Some(date) = token.strip_prefix('@') {
        return parse_date_literal(date);
    }
    let normalized = token.replace(['D', 'd'], "E");
    normalized
        .parse()
        .map_err(|e| TimeError::TextKernel(format!("cannot parse '{token}' as a number: {e}")))
}

/// `YYYY-MON-DD` (optionally `-hh:mm:ss`) → seconds past J2000 on the
/// literal's own clock.
fn parse_date_literal(s: &str) -> Result<f64, TimeError> {
    let bad = || TimeError::TextKernel(format!("bad date literal @{s}"));
    let mut parts = s.splitn(4, '-');
    let year: i32 = parts.next().and_then(|p| p.parse().ok()).ok_or_else(bad)?;
    let month = parts.next().and_then(month_from_abbrev).ok_or_else(bad)?;
    let day: u32 = parts.next().and_then(|p| p.parse().ok()).ok_or_else(bad)?;

    let (mut hour, mut minute, mut second) = (0, 0, 0.0);
    if let Some(clock) = parts.next() {
        let mut fields = clock.split(':');
        hour = fields.next().and_then(|f| f.parse().ok()).ok_or_else(bad)?;
        minute = fields.next().map_or(Some(0), |f| f.parse().ok()).ok_or_else(bad)?;
        second = fields.next().map_or(Some(0.0), |f| f.parse().ok()).ok_or_else(bad)?;
    }

    Ok(calendar_to_j2000_seconds(year, month, day, hour, minute, second))
}
