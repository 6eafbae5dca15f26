//! Reader for Python literal expressions, producing JSON values.
//!
//! Covers what operators put in a service definition: dicts, lists, tuples,
//! strings, ints, floats, `True`, `False` and `None`. Tuples become arrays,
//! trailing commas are allowed and adjacent string literals are joined.

use serde_json::{Map, Number, Value};

/// Where and why a literal could not be read.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{msg} at offset {offset}")]
pub struct LiteralError {
    pub offset: usize,
    pub msg: String,
}

/// Parse a complete literal; trailing input other than whitespace is an error.
pub fn parse_literal(src: &str) -> Result<Value, LiteralError> {
    let mut reader = Reader { src, pos: 0 };
    let value = reader.value()?;
    reader.skip_ws();
    if reader.pos < src.len() {
        return Err(reader.error("unexpected trailing input"));
    }
    Ok(value)
}

struct Reader<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Reader<'a> {
    fn error(&self, msg: impl Into<String>) -> LiteralError {
        LiteralError {
            offset: self.pos,
            msg: msg.into(),
        }
    }

    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_ws(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                self.bump();
            } else {
                break;
            }
        }
    }

    fn expect(&mut self, want: char) -> Result<(), LiteralError> {
        match self.peek() {
            Some(c) if c == want => {
                self.bump();
                Ok(())
            }
            Some(c) => Err(self.error(format!("expected '{}', found '{}'", want, c))),
            None => Err(self.error(format!("expected '{}', found end of input", want))),
        }
    }

    fn value(&mut self) -> Result<Value, LiteralError> {
        self.skip_ws();
        match self.peek() {
            Some('{') => self.dict(),
            Some('[') => self.sequence('[', ']').map(|(items, _)| Value::Array(items)),
            Some('(') => self.tuple(),
            Some('\'') | Some('"') => self.strings().map(Value::String),
            Some(c) if c.is_ascii_digit() || c == '-' || c == '+' || c == '.' => self.number(),
            Some(c) if c.is_ascii_alphabetic() || c == '_' => self.keyword(),
            Some(c) => Err(self.error(format!("unexpected character '{}'", c))),
            None => Err(self.error("unexpected end of input")),
        }
    }

    fn dict(&mut self) -> Result<Value, LiteralError> {
        self.expect('{')?;
        let mut fields = Map::new();
        loop {
            self.skip_ws();
            if self.peek() == Some('}') {
                self.bump();
                return Ok(Value::Object(fields));
            }

            let key_at = self.pos;
            let key = match self.value()? {
                Value::String(key) => key,
                _ => {
                    return Err(LiteralError {
                        offset: key_at,
                        msg: "dict keys must be strings".to_string(),
                    })
                }
            };
            self.skip_ws();
            self.expect(':')?;
            let value = self.value()?;
            fields.insert(key, value);

            self.skip_ws();
            match self.peek() {
                Some(',') => {
                    self.bump();
                }
                Some('}') => {}
                _ => return Err(self.error("expected ',' or '}' in dict")),
            }
        }
    }

    /// Comma-separated items up to `close`. Also reports whether a comma was seen.
    fn sequence(&mut self, open: char, close: char) -> Result<(Vec<Value>, bool), LiteralError> {
        self.expect(open)?;
        let mut items = Vec::new();
        let mut saw_comma = false;
        loop {
            self.skip_ws();
            if self.peek() == Some(close) {
                self.bump();
                return Ok((items, saw_comma));
            }

            items.push(self.value()?);

            self.skip_ws();
            match self.peek() {
                Some(',') => {
                    self.bump();
                    saw_comma = true;
                }
                Some(c) if c == close => {}
                _ => return Err(self.error(format!("expected ',' or '{}'", close))),
            }
        }
    }

    fn tuple(&mut self) -> Result<Value, LiteralError> {
        let (mut items, saw_comma) = self.sequence('(', ')')?;
        // `(x)` is a parenthesised value, not a tuple
        if items.len() == 1 && !saw_comma {
            return Ok(items.remove(0));
        }
        Ok(Value::Array(items))
    }

    fn strings(&mut self) -> Result<String, LiteralError> {
        let mut joined = self.string()?;
        loop {
            self.skip_ws();
            match self.peek() {
                Some('\'') | Some('"') => joined.push_str(&self.string()?),
                _ => return Ok(joined),
            }
        }
    }

    fn string(&mut self) -> Result<String, LiteralError> {
        let quote = self.bump().ok_or_else(|| self.error("expected string"))?;
        let mut out = String::new();
        loop {
            match self.bump() {
                None => return Err(self.error("unterminated string")),
                Some(c) if c == quote => return Ok(out),
                Some('\n') => return Err(self.error("newline in string")),
                Some('\\') => self.escape(&mut out)?,
                Some(c) => out.push(c),
            }
        }
    }

    fn escape(&mut self, out: &mut String) -> Result<(), LiteralError> {
        let c = self.bump().ok_or_else(|| self.error("unterminated string"))?;
        match c {
            '\\' | '\'' | '"' => out.push(c),
            'n' => out.push('\n'),
            't' => out.push('\t'),
            'r' => out.push('\r'),
            '0' => out.push('\0'),
            'x' => out.push(self.hex_char(2)?),
            'u' => out.push(self.hex_char(4)?),
            '\n' => {}
            other => {
                out.push('\\');
                out.push(other);
            }
        }
        Ok(())
    }

    fn hex_char(&mut self, digits: usize) -> Result<char, LiteralError> {
        let start = self.pos;
        let end = start + digits;
        let hex = self
            .src
            .get(start..end)
            .ok_or_else(|| self.error("truncated escape sequence"))?;
        let code = u32::from_str_radix(hex, 16).map_err(|_| self.error("invalid escape sequence"))?;
        let c = char::from_u32(code).ok_or_else(|| self.error("invalid code point"))?;
        self.pos = end;
        Ok(c)
    }

    fn number(&mut self) -> Result<Value, LiteralError> {
        let start = self.pos;
        let mut text = String::new();
        let mut is_float = false;

        if let Some(sign @ ('-' | '+')) = self.peek() {
            self.bump();
            if sign == '-' {
                text.push('-');
            }
            self.skip_ws();
        }

        while let Some(c) = self.peek() {
            match c {
                '0'..='9' => text.push(c),
                '_' => {}
                '.' => {
                    is_float = true;
                    text.push(c);
                }
                'e' | 'E' => {
                    is_float = true;
                    text.push(c);
                    self.bump();
                    if let Some(sign @ ('-' | '+')) = self.peek() {
                        text.push(sign);
                    } else {
                        continue;
                    }
                }
                _ => break,
            }
            self.bump();
        }

        let invalid = || LiteralError {
            offset: start,
            msg: format!("invalid number '{}'", &self.src[start..self.pos]),
        };

        if is_float {
            let parsed: f64 = text.parse().map_err(|_| invalid())?;
            return Number::from_f64(parsed).map(Value::Number).ok_or_else(invalid);
        }
        if let Ok(n) = text.parse::<i64>() {
            return Ok(Value::Number(n.into()));
        }
        text.parse::<u64>()
            .map(|n| Value::Number(n.into()))
            .map_err(|_| invalid())
    }

    fn keyword(&mut self) -> Result<Value, LiteralError> {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c.is_ascii_alphanumeric() || c == '_' {
                self.bump();
            } else {
                break;
            }
        }
        match &self.src[start..self.pos] {
            "True" | "true" => Ok(Value::Bool(true)),
            "False" | "false" => Ok(Value::Bool(false)),
            "None" | "null" => Ok(Value::Null),
            word => Err(LiteralError {
                offset: start,
                msg: format!("unknown name '{}'", word),
            }),
        }
    }
}
