//! Metadata dictionary parsing.
//!
//! The metadata block is a Python dictionary literal such as
//!
//! ```text
//! {'descr': '|u1', 'fortran_order': False, 'shape': (1832, 16, 16, 4), }
//! ```
//!
//! padded with spaces and terminated by a newline. Only the subset of the
//! literal grammar that array writers actually emit is accepted: quoted
//! string keys, and values that are quoted strings, `True`, `False`,
//! `None`, non-negative integers, or tuples of non-negative integers.
//! Trailing commas are allowed everywhere a writer may put one.

use super::error::FormatError;

/// Element type of the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dtype {
    /// Unsigned 8-bit integer (`|u1`)
    U8,
    /// Little-endian IEEE 754 single precision float (`<f4`)
    F32Le,
}

impl Dtype {
    /// Map a dtype descriptor to a supported element type.
    ///
    /// Byte order is irrelevant for single-byte elements, so every
    /// byte-order prefix is accepted for `u1`. Floats must be explicitly
    /// little-endian.
    pub fn from_descr(descr: &str) -> Result<Self, FormatError> {
        match descr {
            "|u1" | "<u1" | ">u1" | "=u1" | "u1" | "|B" | "B" => Ok(Dtype::U8),
            "<f4" => Ok(Dtype::F32Le),
            other => Err(FormatError::UnsupportedDtype(other.to_string())),
        }
    }

    /// Size of one element in bytes.
    #[inline]
    pub fn item_size(self) -> usize {
        match self {
            Dtype::U8 => 1,
            Dtype::F32Le => 4,
        }
    }

    /// Canonical descriptor string.
    pub fn descr(self) -> &'static str {
        match self {
            Dtype::U8 => "|u1",
            Dtype::F32Le => "<f4",
        }
    }
}

/// Memory layout of a multi-dimensional payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageOrder {
    /// C order, last index varies fastest
    RowMajor,
    /// Fortran order, first index varies fastest
    ColumnMajor,
}

/// Typed contents of the metadata dictionary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArrayMetadata {
    /// Element type
    pub dtype: Dtype,
    /// Storage order flag
    pub order: StorageOrder,
    /// Array dimensions, outermost first
    pub shape: Vec<usize>,
}

impl ArrayMetadata {
    /// Parse and type-check the metadata text.
    ///
    /// `descr`, `fortran_order` and `shape` are required; other keys are
    /// ignored.
    pub fn parse(text: &str) -> Result<Self, FormatError> {
        let entries = Parser::new(text)?.parse_dict()?;

        let lookup = |key: &'static str| {
            entries
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v)
                .ok_or(FormatError::MissingKey(key))
        };

        let dtype = match lookup("descr")? {
            Value::Str(descr) => Dtype::from_descr(descr)?,
            _ => {
                return Err(FormatError::WrongValueType {
                    key: "descr",
                    expected: "a string",
                })
            }
        };

        let order = match lookup("fortran_order")? {
            Value::Bool(false) => StorageOrder::RowMajor,
            Value::Bool(true) => StorageOrder::ColumnMajor,
            _ => {
                return Err(FormatError::WrongValueType {
                    key: "fortran_order",
                    expected: "True or False",
                })
            }
        };

        let shape = match lookup("shape")? {
            Value::Tuple(dims) => dims
                .iter()
                .map(|&d| {
                    usize::try_from(d).map_err(|_| FormatError::WrongValueType {
                        key: "shape",
                        expected: "dimensions that fit in memory",
                    })
                })
                .collect::<Result<Vec<_>, _>>()?,
            _ => {
                return Err(FormatError::WrongValueType {
                    key: "shape",
                    expected: "a tuple of integers",
                })
            }
        };

        Ok(Self {
            dtype,
            order,
            shape,
        })
    }

    /// Total element count, or `None` on overflow.
    pub fn element_count(&self) -> Option<usize> {
        self.shape
            .iter()
            .try_fold(1usize, |acc, &d| acc.checked_mul(d))
    }
}

// ---------------------------------------------------------------------------
// Tokenizer
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
enum Token {
    LBrace,
    RBrace,
    LParen,
    RParen,
    Colon,
    Comma,
    Str(String),
    Int(u64),
    Ident(String),
}

#[derive(Debug, Clone, PartialEq)]
enum Value {
    Str(String),
    Bool(bool),
    None,
    Int(u64),
    Tuple(Vec<u64>),
}

fn invalid(position: usize, reason: impl Into<String>) -> FormatError {
    FormatError::InvalidMetadata {
        position,
        reason: reason.into(),
    }
}

fn tokenize(text: &str) -> Result<Vec<(usize, Token)>, FormatError> {
    let bytes = text.as_bytes();
    let mut tokens = Vec::new();
    let mut pos = 0;

    while pos < bytes.len() {
        let start = pos;
        let c = bytes[pos];
        let token = match c {
            b' ' | b'\t' | b'\n' | b'\r' => {
                pos += 1;
                continue;
            }
            b'{' => Token::LBrace,
            b'}' => Token::RBrace,
            b'(' => Token::LParen,
            b')' => Token::RParen,
            b':' => Token::Colon,
            b',' => Token::Comma,
            b'\'' | b'"' => {
                let close = bytes[start + 1..]
                    .iter()
                    .position(|&b| b == c)
                    .ok_or_else(|| invalid(start, "unterminated string"))?;
                let end = start + 1 + close;
                pos = end + 1;
                tokens.push((start, Token::Str(text[start + 1..end].to_string())));
                continue;
            }
            b'0'..=b'9' => {
                while pos < bytes.len() && bytes[pos].is_ascii_digit() {
                    pos += 1;
                }
                let value: u64 = text[start..pos]
                    .parse()
                    .map_err(|_| invalid(start, "integer too large"))?;
                // Legacy writers emit long literals such as `3L`
                if pos < bytes.len() && (bytes[pos] == b'L' || bytes[pos] == b'l') {
                    pos += 1;
                }
                tokens.push((start, Token::Int(value)));
                continue;
            }
            c if c.is_ascii_alphabetic() || c == b'_' => {
                while pos < bytes.len() && (bytes[pos].is_ascii_alphanumeric() || bytes[pos] == b'_')
                {
                    pos += 1;
                }
                tokens.push((start, Token::Ident(text[start..pos].to_string())));
                continue;
            }
            other => {
                return Err(invalid(
                    start,
                    format!("unexpected character '{}'", other.escape_ascii()),
                ))
            }
        };
        tokens.push((start, token));
        pos += 1;
    }

    Ok(tokens)
}

// ---------------------------------------------------------------------------
// Parser
// ---------------------------------------------------------------------------

struct Parser {
    tokens: Vec<(usize, Token)>,
    index: usize,
    end: usize,
}

impl Parser {
    fn new(text: &str) -> Result<Self, FormatError> {
        Ok(Self {
            tokens: tokenize(text)?,
            index: 0,
            end: text.len(),
        })
    }

    fn position(&self) -> usize {
        self.tokens
            .get(self.index)
            .map(|(pos, _)| *pos)
            .unwrap_or(self.end)
    }

    fn next(&mut self) -> Result<Token, FormatError> {
        match self.tokens.get(self.index) {
            Some((_, token)) => {
                self.index += 1;
                Ok(token.clone())
            }
            None => Err(invalid(self.end, "unexpected end of metadata")),
        }
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.index).map(|(_, token)| token)
    }

    fn expect(&mut self, expected: Token, what: &str) -> Result<(), FormatError> {
        let pos = self.position();
        if self.next()? == expected {
            Ok(())
        } else {
            Err(invalid(pos, format!("expected {}", what)))
        }
    }

    fn parse_dict(mut self) -> Result<Vec<(String, Value)>, FormatError> {
        self.expect(Token::LBrace, "'{'")?;
        let mut entries: Vec<(String, Value)> = Vec::new();

        loop {
            if self.peek() == Some(&Token::RBrace) {
                self.index += 1;
                break;
            }

            let pos = self.position();
            let key = match self.next()? {
                Token::Str(key) => key,
                _ => return Err(invalid(pos, "expected a quoted key")),
            };
            self.expect(Token::Colon, "':'")?;
            let value = self.parse_value()?;

            if entries.iter().any(|(k, _)| *k == key) {
                return Err(FormatError::DuplicateKey(key));
            }
            entries.push((key, value));

            let pos = self.position();
            match self.next()? {
                Token::Comma => continue,
                Token::RBrace => break,
                _ => return Err(invalid(pos, "expected ',' or '}'")),
            }
        }

        if self.index < self.tokens.len() {
            return Err(invalid(self.position(), "trailing content after '}'"));
        }

        Ok(entries)
    }

    fn parse_value(&mut self) -> Result<Value, FormatError> {
        let pos = self.position();
        match self.next()? {
            Token::Str(s) => Ok(Value::Str(s)),
            Token::Int(n) => Ok(Value::Int(n)),
            Token::Ident(ident) => match ident.as_str() {
                "True" => Ok(Value::Bool(true)),
                "False" => Ok(Value::Bool(false)),
                "None" => Ok(Value::None),
                _ => Err(invalid(pos, format!("unknown identifier '{}'", ident))),
            },
            Token::LParen => self.parse_tuple(),
            _ => Err(invalid(pos, "expected a value")),
        }
    }

    fn parse_tuple(&mut self) -> Result<Value, FormatError> {
        let mut items = Vec::new();
        loop {
            if self.peek() == Some(&Token::RParen) {
                self.index += 1;
                break;
            }

            let pos = self.position();
            match self.next()? {
                Token::Int(n) => items.push(n),
                _ => return Err(invalid(pos, "expected an integer in tuple")),
            }

            let pos = self.position();
            match self.next()? {
                Token::Comma => continue,
                Token::RParen => break,
                _ => return Err(invalid(pos, "expected ',' or ')'")),
            }
        }
        Ok(Value::Tuple(items))
    }
}
