//! 문서 포인터 — 값 트리 안의 하위 트리를 가리키는 토큰 경로
//!
//! [`Pointer`]는 필드 이름 또는 배열 인덱스 토큰의 순서열입니다.
//! 빈 포인터([`Pointer::root`])는 문서 자신을 가리킵니다.
//!
//! 확장은 `/` 연산자를 사용합니다:
//!
//! ```
//! use signalpost_core::Pointer;
//!
//! let p = Pointer::root() / "items" / 3 / "name";
//! assert_eq!(p.to_string(), "/items/3/name");
//! ```
//!
//! 문자열 형식은 RFC 6901을 따르며 (`~0` = `~`, `~1` = `/`), 설정에서
//! 필드를 지정할 때 쓰입니다. 숫자로만 이루어진 토큰은 인덱스로 읽습니다.

use std::fmt;
use std::ops::Div;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::PointerParseError;
use crate::value::Value;

/// 포인터를 구성하는 단일 토큰
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Token {
    /// 오브젝트 필드 이름
    Name(String),
    /// 배열 인덱스
    Index(usize),
}

/// 값 트리 안의 위치
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Pointer {
    tokens: Vec<Token>,
}

impl Pointer {
    /// 빈 포인터 — 문서 루트
    pub const fn root() -> Self {
        Self { tokens: Vec::new() }
    }

    /// 루트 포인터인지 확인합니다.
    pub fn is_root(&self) -> bool {
        self.tokens.is_empty()
    }

    /// 토큰 슬라이스를 반환합니다.
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// 토큰을 뒤에 붙입니다.
    pub fn push(&mut self, token: Token) {
        self.tokens.push(token);
    }

    /// 마지막 토큰과 그 앞 경로를 분리합니다. 루트면 `None`.
    pub fn split_last(&self) -> Option<(&[Token], &Token)> {
        self.tokens.split_last().map(|(last, rest)| (rest, last))
    }

    /// `self`가 `prefix`로 시작하는지 확인합니다.
    pub fn starts_with(&self, prefix: &Pointer) -> bool {
        self.tokens.len() >= prefix.tokens.len()
            && self.tokens[..prefix.tokens.len()] == prefix.tokens[..]
    }

    /// 포인터를 평가하여 하위 트리를 반환합니다.
    ///
    /// 이름 토큰은 `Object`를, 인덱스 토큰은 범위 내 인덱스를 가진 `Array`를
    /// 요구합니다. 어떤 불일치든 (중간 노드 부재 포함) 조용히 `None`이며,
    /// 절대 값을 만들어내지 않습니다.
    pub fn evaluate<'v>(&self, value: &'v Value) -> Option<&'v Value> {
        let mut current = value;
        for token in &self.tokens {
            current = match token {
                Token::Name(name) => current.as_object()?.get(name.as_str())?,
                Token::Index(index) => current.as_array()?.get(*index)?,
            };
        }
        Some(current)
    }
}

impl Div<&str> for Pointer {
    type Output = Pointer;

    fn div(mut self, name: &str) -> Pointer {
        self.tokens.push(Token::Name(name.to_owned()));
        self
    }
}

impl Div<String> for Pointer {
    type Output = Pointer;

    fn div(mut self, name: String) -> Pointer {
        self.tokens.push(Token::Name(name));
        self
    }
}

impl Div<usize> for Pointer {
    type Output = Pointer;

    fn div(mut self, index: usize) -> Pointer {
        self.tokens.push(Token::Index(index));
        self
    }
}

impl fmt::Display for Pointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for token in &self.tokens {
            f.write_str("/")?;
            match token {
                Token::Name(name) => {
                    for c in name.chars() {
                        match c {
                            '~' => f.write_str("~0")?,
                            '/' => f.write_str("~1")?,
                            _ => write!(f, "{c}")?,
                        }
                    }
                }
                Token::Index(index) => write!(f, "{index}")?,
            }
        }
        Ok(())
    }
}

impl FromStr for Pointer {
    type Err = PointerParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Ok(Pointer::root());
        }
        let Some(rest) = s.strip_prefix('/') else {
            return Err(PointerParseError::MissingSlash);
        };

        let mut tokens = Vec::new();
        for raw in rest.split('/') {
            if !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_digit()) {
                let index = raw
                    .parse::<usize>()
                    .map_err(|_| PointerParseError::IndexOverflow)?;
                tokens.push(Token::Index(index));
                continue;
            }

            let mut name = String::with_capacity(raw.len());
            let mut chars = raw.chars();
            while let Some(c) = chars.next() {
                if c == '~' {
                    match chars.next() {
                        Some('0') => name.push('~'),
                        Some('1') => name.push('/'),
                        _ => return Err(PointerParseError::BadEscape),
                    }
                } else {
                    name.push(c);
                }
            }
            tokens.push(Token::Name(name));
        }
        Ok(Pointer { tokens })
    }
}

impl Serialize for Pointer {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Pointer {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
