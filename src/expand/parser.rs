use super::ExpansionError;

/// A parsed word: literal text interleaved with expansions.
#[derive(Debug, Clone, PartialEq, Default)]
pub(crate) struct Word {
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Part {
    Literal(String),
    Param(Param),
    Command(String),
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Param {
    pub name: String,
    /// `${#NAME}`
    pub length: bool,
    pub op: Option<ParamOp>,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum ParamOp {
    /// `${NAME-word}` / `${NAME:-word}`
    Default { colon: bool, word: Word },
    /// `${NAME=word}` / `${NAME:=word}`
    Assign { colon: bool, word: Word },
    /// `${NAME?word}` / `${NAME:?word}`
    Error { colon: bool, word: Word },
    /// `${NAME+word}` / `${NAME:+word}`
    Alternate { colon: bool, word: Word },
    /// `${NAME#pat}` / `${NAME##pat}`
    TrimPrefix { longest: bool, pattern: Word },
    /// `${NAME%pat}` / `${NAME%%pat}`
    TrimSuffix { longest: bool, pattern: Word },
}

const SPECIAL_PARAMS: &[char] = &['@', '*', '#', '?', '-', '$', '!'];

pub(crate) fn parse(input: &str) -> Result<Word, ExpansionError> {
    let mut parser = Parser { input, pos: 0 };
    parser.word(None)
}

struct Parser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn peek_second(&self) -> Option<char> {
        self.input[self.pos..].chars().nth(1)
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.pos += expected.len_utf8();
            true
        } else {
            false
        }
    }

    fn syntax(&self, start: usize, message: &'static str) -> ExpansionError {
        ExpansionError::Syntax { fragment: self.input[start..].to_string(), message }
    }

    /// Parses until end of input, or until `terminator` (left unconsumed).
    fn word(&mut self, terminator: Option<char>) -> Result<Word, ExpansionError> {
        let mut word = Word::default();
        let mut literal = String::new();

        loop {
            let Some(c) = self.peek() else { break };
            if Some(c) == terminator {
                break;
            }
            match c {
                '\\' => {
                    self.bump();
                    match self.peek() {
                        Some(e @ ('$' | '`' | '\\')) => {
                            self.bump();
                            literal.push(e);
                        }
                        Some('\n') => {
                            self.bump();
                        }
                        Some(e) if Some(e) == terminator => {
                            self.bump();
                            literal.push(e);
                        }
                        _ => literal.push('\\'),
                    }
                }
                '$' => {
                    let start = self.pos;
                    self.bump();
                    match self.dollar(start)? {
                        Some(part) => {
                            flush(&mut word, &mut literal);
                            word.parts.push(part);
                        }
                        None => literal.push('$'),
                    }
                }
                '`' => {
                    let start = self.pos;
                    self.bump();
                    let script = self.backquote(start)?;
                    flush(&mut word, &mut literal);
                    word.parts.push(Part::Command(script));
                }
                _ => {
                    self.bump();
                    literal.push(c);
                }
            }
        }

        flush(&mut word, &mut literal);
        Ok(word)
    }

    /// Called after `$`. `None` means the dollar sign is literal.
    fn dollar(&mut self, start: usize) -> Result<Option<Part>, ExpansionError> {
        let Some(c) = self.peek() else { return Ok(None) };
        let part = match c {
            '{' => {
                self.bump();
                Part::Param(self.braced(start)?)
            }
            '(' => {
                if self.peek_second() == Some('(') {
                    return Err(ExpansionError::Unsupported {
                        fragment: self.input[start..].to_string(),
                        construct: "arithmetic expansion",
                    });
                }
                self.bump();
                Part::Command(self.paren_command(start)?)
            }
            c if is_name_start(c) => {
                let name = self.name();
                Part::Param(Param { name, length: false, op: None })
            }
            c if c.is_ascii_digit() || SPECIAL_PARAMS.contains(&c) => {
                self.bump();
                Part::Param(Param { name: c.to_string(), length: false, op: None })
            }
            _ => return Ok(None),
        };
        Ok(Some(part))
    }

    fn name(&mut self) -> String {
        let begin = self.pos;
        while let Some(c) = self.peek() {
            if c == '_' || c.is_ascii_alphanumeric() {
                self.bump();
            } else {
                break;
            }
        }
        self.input[begin..self.pos].to_string()
    }

    fn digits(&mut self) -> String {
        let begin = self.pos;
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.bump();
        }
        self.input[begin..self.pos].to_string()
    }

    /// Reads a parameter name inside braces.
    fn braced_name(&mut self) -> Option<String> {
        match self.peek()? {
            c if is_name_start(c) => Some(self.name()),
            c if c.is_ascii_digit() => Some(self.digits()),
            c if SPECIAL_PARAMS.contains(&c) => {
                self.bump();
                Some(c.to_string())
            }
            _ => None,
        }
    }

    /// Called after `${`.
    fn braced(&mut self, start: usize) -> Result<Param, ExpansionError> {
        // `${#NAME}` is the length of NAME; `${#}` and `${#:-w}` operate on `$#`
        if self.peek() == Some('#') && self.peek_second().is_some_and(|c| is_name_start(c) || c.is_ascii_digit()) {
            self.bump();
            let name = self.braced_name().ok_or_else(|| self.syntax(start, "bad substitution"))?;
            if !self.eat('}') {
                return Err(self.syntax(start, "bad substitution"));
            }
            return Ok(Param { name, length: true, op: None });
        }

        let name = self.braced_name().ok_or_else(|| self.syntax(start, "bad substitution"))?;
        let Some(c) = self.bump() else {
            return Err(self.syntax(start, "unterminated `${`"));
        };

        let op = match c {
            '}' => return Ok(Param { name, length: false, op: None }),
            ':' => match self.bump() {
                Some(op @ ('-' | '=' | '?' | '+')) => self.operator(op, true, start)?,
                _ => return Err(self.syntax(start, "bad substitution")),
            },
            '-' | '=' | '?' | '+' => self.operator(c, false, start)?,
            '#' => {
                let longest = self.eat('#');
                ParamOp::TrimPrefix { longest, pattern: self.operand(start)? }
            }
            '%' => {
                let longest = self.eat('%');
                ParamOp::TrimSuffix { longest, pattern: self.operand(start)? }
            }
            _ => return Err(self.syntax(start, "bad substitution")),
        };

        Ok(Param { name, length: false, op: Some(op) })
    }

    fn operator(&mut self, op: char, colon: bool, start: usize) -> Result<ParamOp, ExpansionError> {
        let word = self.operand(start)?;
        Ok(match op {
            '-' => ParamOp::Default { colon, word },
            '=' => ParamOp::Assign { colon, word },
            '?' => ParamOp::Error { colon, word },
            _ => ParamOp::Alternate { colon, word },
        })
    }

    /// The word after an operator, up to and including the closing brace.
    fn operand(&mut self, start: usize) -> Result<Word, ExpansionError> {
        let word = self.word(Some('}'))?;
        if !self.eat('}') {
            return Err(self.syntax(start, "unterminated `${`"));
        }
        Ok(word)
    }

    /// Called after `$(`; returns the script between the parentheses.
    fn paren_command(&mut self, start: usize) -> Result<String, ExpansionError> {
        let begin = self.pos;
        let mut depth = 0usize;
        loop {
            let Some(c) = self.bump() else {
                return Err(self.syntax(start, "unterminated `$(`"));
            };
            match c {
                '\\' => {
                    self.bump();
                }
                '\'' => {
                    while self.bump().ok_or_else(|| self.syntax(start, "unterminated quote"))?
                        != '\''
                    {}
                }
                '"' => loop {
                    match self.bump().ok_or_else(|| self.syntax(start, "unterminated quote"))? {
                        '\\' => {
                            self.bump();
                        }
                        '"' => break,
                        _ => {}
                    }
                },
                '(' => depth += 1,
                ')' if depth == 0 => return Ok(self.input[begin..self.pos - 1].to_string()),
                ')' => depth -= 1,
                _ => {}
            }
        }
    }

    /// Called after the opening backquote.
    fn backquote(&mut self, start: usize) -> Result<String, ExpansionError> {
        let mut script = String::new();
        loop {
            match self.bump() {
                None => return Err(self.syntax(start, "unterminated backquote")),
                Some('`') => return Ok(script),
                Some('\\') => match self.peek() {
                    Some(e @ ('$' | '`' | '\\')) => {
                        self.bump();
                        script.push(e);
                    }
                    _ => script.push('\\'),
                },
                Some(c) => script.push(c),
            }
        }
    }
}

fn flush(word: &mut Word, literal: &mut String) {
    if !literal.is_empty() {
        word.parts.push(Part::Literal(std::mem::take(literal)));
    }
}

fn is_name_start(c: char) -> bool {
    c == '_' || c.is_ascii_alphabetic()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn lit(s: &str) -> Part {
        Part::Literal(s.to_string())
    }

    fn var(name: &str) -> Part {
        Part::Param(Param { name: name.to_string(), length: false, op: None })
    }

    #[test]
    fn test_parse_plain_and_vars() {
        let word = parse("$HOME/bin:${PATH}x").unwrap();
        assert_eq!(word.parts, vec![var("HOME"), lit("/bin:"), var("PATH"), lit("x")]);

        let word = parse("cost $5 and $").unwrap();
        assert_eq!(word.parts, vec![lit("cost "), var("5"), lit(" and $")]);

        let word = parse("a$/b").unwrap();
        assert_eq!(word.parts, vec![lit("a$/b")]);
    }

    #[test]
    fn test_parse_escapes() {
        let word = parse(r"\$HOME \\ \x").unwrap();
        assert_eq!(word.parts, vec![lit(r"$HOME \ \x")]);

        let word = parse("a\\\nb").unwrap();
        assert_eq!(word.parts, vec![lit("ab")]);
    }

    #[test]
    fn test_parse_operators() {
        let word = parse("${EDITOR:-vi}").unwrap();
        let Part::Param(param) = &word.parts[0] else { panic!("expected param") };
        assert_eq!(param.name, "EDITOR");
        assert_eq!(
            param.op,
            Some(ParamOp::Default { colon: true, word: Word { parts: vec![lit("vi")] } })
        );

        let word = parse("${FILE%%.*}").unwrap();
        let Part::Param(param) = &word.parts[0] else { panic!("expected param") };
        assert_eq!(
            param.op,
            Some(ParamOp::TrimSuffix { longest: true, pattern: Word { parts: vec![lit(".*")] } })
        );

        let word = parse("${#NAME} ${#}").unwrap();
        assert_eq!(
            word.parts,
            vec![
                Part::Param(Param { name: "NAME".into(), length: true, op: None }),
                lit(" "),
                var("#"),
            ]
        );
    }

    #[test]
    fn test_parse_count_with_operator() {
        let word = parse("${#:-x}").unwrap();
        assert_eq!(
            word.parts,
            vec![Part::Param(Param {
                name: "#".into(),
                length: false,
                op: Some(ParamOp::Default { colon: true, word: Word { parts: vec![lit("x")] } }),
            })]
        );

        let word = parse("${#?}").unwrap();
        let Part::Param(param) = &word.parts[0] else { panic!("expected param") };
        assert_eq!(param.name, "#");
        assert!(!param.length);
        assert_eq!(param.op, Some(ParamOp::Error { colon: false, word: Word::default() }));

        let word = parse("${#1}").unwrap();
        assert_eq!(word.parts, vec![Part::Param(Param { name: "1".into(), length: true, op: None })]);
    }

    #[test]
    fn test_parse_nested_default() {
        let word = parse("${A:-${B:-c\\}}}").unwrap();
        let Part::Param(param) = &word.parts[0] else { panic!("expected param") };
        let Some(ParamOp::Default { word: inner, .. }) = &param.op else { panic!("expected default") };
        let Part::Param(b) = &inner.parts[0] else { panic!("expected nested param") };
        assert_eq!(b.name, "B");
        assert_eq!(
            b.op,
            Some(ParamOp::Default { colon: true, word: Word { parts: vec![lit("c}")] } })
        );
    }

    #[test]
    fn test_parse_command_substitution() {
        let word = parse("$(dirname \"$(which vim)\")/x").unwrap();
        assert_eq!(word.parts, vec![Part::Command("dirname \"$(which vim)\"".into()), lit("/x")]);

        let word = parse(r"`echo \`hi\``").unwrap();
        assert_eq!(word.parts, vec![Part::Command("echo `hi`".into())]);
    }

    #[test]
    fn test_parse_errors() {
        for input in ["${HOME", "${", "${}", "${A:x}", "${A!}", "$(echo", "`echo", "${#A"] {
            let err = parse(input).unwrap_err();
            assert!(matches!(err, ExpansionError::Syntax { .. }), "{input}: {err:?}");
        }

        let err = parse("$((1 + 2))").unwrap_err();
        assert!(matches!(err, ExpansionError::Unsupported { .. }), "{err:?}");
    }
}
