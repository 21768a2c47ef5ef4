//! Shell-style word expansion.
//!
//! A string is expanded the way a shell expands the body of a here-document:
//! quotes are ordinary characters, `\` only escapes `$`, `` ` ``, `\` and
//! newlines, and every `$` form is substituted. There is no field splitting,
//! globbing or tilde expansion; the result is always exactly one string.

mod parser;
mod pattern;
mod subst;

use std::collections::HashMap;
use std::env;
use std::io;

use thiserror::Error;

use self::parser::{Param, ParamOp, Part, Word};
use self::pattern::Pattern;
pub use self::subst::{CommandSubstitution, Shell};

#[derive(Debug, Error)]
pub enum ExpansionError {
    #[error("{message} in `{fragment}`")]
    Syntax { fragment: String, message: &'static str },

    #[error("{construct} is not supported in `{fragment}`")]
    Unsupported { fragment: String, construct: &'static str },

    #[error("{name}: {message}")]
    Required { name: String, message: String },

    #[error("cannot assign to `{name}`")]
    Assign { name: String },

    #[error("command substitution `{command}` failed")]
    Substitution {
        command: String,
        #[source]
        source: io::Error,
    },
}

/// Resolves a variable name to its value. `None` means unset, which is
/// distinct from set-but-empty for the non-colon operators.
pub trait Lookup {
    fn lookup(&self, name: &str) -> Option<String>;
}

impl<F> Lookup for F
where
    F: Fn(&str) -> Option<String>,
{
    fn lookup(&self, name: &str) -> Option<String> {
        self(name)
    }
}

/// Reads the current process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl Lookup for ProcessEnv {
    fn lookup(&self, name: &str) -> Option<String> {
        match name {
            "$" => Some(std::process::id().to_string()),
            _ => env::var_os(name).map(|v| v.to_string_lossy().into_owned()),
        }
    }
}

#[derive(Clone, Copy)]
pub struct Expander<'a> {
    lookup: &'a dyn Lookup,
    substitution: &'a dyn CommandSubstitution,
}

impl Expander<'static> {
    /// Expands against the process environment, running substitutions with `sh`.
    pub fn process() -> Self {
        Expander { lookup: &ProcessEnv, substitution: &Shell }
    }
}

impl<'a> Expander<'a> {
    pub fn new(lookup: &'a dyn Lookup, substitution: &'a dyn CommandSubstitution) -> Self {
        Self { lookup, substitution }
    }

    pub fn lookup(&self) -> &'a dyn Lookup {
        self.lookup
    }

    /// Expands one string. Inputs without `$`, `` ` `` or `\` come back unchanged.
    pub fn expand(&self, input: &str) -> Result<String, ExpansionError> {
        // fast path, and guarantees inputs without expansions come back untouched
        if !input.contains(['$', '`', '\\']) {
            return Ok(input.to_string());
        }
        let word = parser::parse(input)?;
        let mut eval = Eval { expander: self, assigned: HashMap::new() };
        eval.word(&word)
    }
}

struct Eval<'e, 'a> {
    expander: &'e Expander<'a>,
    /// Values set by `${NAME=word}` during this expansion.
    assigned: HashMap<String, String>,
}

impl Eval<'_, '_> {
    fn word(&mut self, word: &Word) -> Result<String, ExpansionError> {
        let mut out = String::new();
        for part in &word.parts {
            match part {
                Part::Literal(s) => out.push_str(s),
                Part::Param(param) => out.push_str(&self.param(param)?),
                Part::Command(script) => out.push_str(&self.command(script)?),
            }
        }
        Ok(out)
    }

    fn value(&self, name: &str) -> Option<String> {
        self.assigned.get(name).cloned().or_else(|| self.expander.lookup.lookup(name))
    }

    fn param(&mut self, param: &Param) -> Result<String, ExpansionError> {
        let value = self.value(&param.name);
        if param.length {
            return Ok(value.unwrap_or_default().chars().count().to_string());
        }

        let missing = |colon: bool| match &value {
            None => true,
            Some(v) => colon && v.is_empty(),
        };

        let Some(op) = &param.op else { return Ok(value.unwrap_or_default()) };
        match op {
            ParamOp::Default { colon, word } => {
                if missing(*colon) {
                    self.word(word)
                } else {
                    Ok(value.unwrap_or_default())
                }
            }
            ParamOp::Assign { colon, word } => {
                if !missing(*colon) {
                    return Ok(value.unwrap_or_default());
                }
                if !is_assignable(&param.name) {
                    return Err(ExpansionError::Assign { name: param.name.clone() });
                }
                let assigned = self.word(word)?;
                self.assigned.insert(param.name.clone(), assigned.clone());
                Ok(assigned)
            }
            ParamOp::Error { colon, word } => {
                if !missing(*colon) {
                    return Ok(value.unwrap_or_default());
                }
                let mut message = self.word(word)?;
                if message.is_empty() {
                    message = match value {
                        None => "parameter not set".to_string(),
                        Some(_) => "parameter null or not set".to_string(),
                    };
                }
                Err(ExpansionError::Required { name: param.name.clone(), message })
            }
            ParamOp::Alternate { colon, word } => {
                if missing(*colon) {
                    Ok(String::new())
                } else {
                    self.word(word)
                }
            }
            ParamOp::TrimPrefix { longest, pattern } => {
                let pattern = Pattern::new(&self.word(pattern)?);
                Ok(pattern.trim_prefix(&value.unwrap_or_default(), *longest))
            }
            ParamOp::TrimSuffix { longest, pattern } => {
                let pattern = Pattern::new(&self.word(pattern)?);
                Ok(pattern.trim_suffix(&value.unwrap_or_default(), *longest))
            }
        }
    }

    fn command(&self, script: &str) -> Result<String, ExpansionError> {
        let mut out = self
            .expander
            .substitution
            .run(script)
            .map_err(|source| ExpansionError::Substitution { command: script.to_string(), source })?;
        let trimmed = out.trim_end_matches('\n').len();
        out.truncate(trimmed);
        Ok(out)
    }
}

fn is_assignable(name: &str) -> bool {
    name.starts_with(|c: char| c == '_' || c.is_ascii_alphabetic())
}
