//! 임의 정밀도 십진수 — JSON 숫자 리터럴의 무손실 표현
//!
//! [`Decimal`]은 i64 범위를 벗어나거나 소수부·지수부를 가진 숫자 리터럴을
//! 정밀도 손실 없이 보관합니다. 파이프라인의 어떤 연산도 십진 산술을
//! 요구하지 않으므로, 리터럴을 (부호, 비스케일 유효숫자, 스케일)로 분해해
//! 저장합니다: 값 = (-1)^neg × digits × 10^(-scale).
//!
//! # 동등성
//!
//! 스케일까지 포함한 구조적 동등성입니다 (`1.0 != 1.00`). 수치 비교가
//! 필요하면 [`Decimal::to_f64`] 같은 변환 접근자를 거치십시오.
//!
//! # 출력 형식
//!
//! 스케일이 음수이거나 조정 지수가 -6 미만이면 `2E+128` 같은 과학적 표기,
//! 그렇지 않으면 평범한 십진 표기입니다. 어느 쪽이든 [`FromStr`]이 같은
//! 값으로 되읽습니다.

use std::fmt;
use std::str::FromStr;

use crate::error::DecimalParseError;

/// 평범한 표기를 포기하는 조정 지수 하한
const MIN_PLAIN_ADJUSTED: i64 = -6;

/// 임의 정밀도 십진수 리터럴
///
/// # 사용 예시
/// ```
/// use signalpost_core::Decimal;
///
/// let d: Decimal = "2e128".parse().unwrap();
/// assert_eq!(d.to_string(), "2E+128");
/// assert!(!d.is_zero());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decimal {
    /// 음수 여부 (0은 항상 false)
    neg: bool,
    /// 비스케일 유효숫자 (leading zero 없음, 0은 "0")
    digits: Box<str>,
    /// 소수 자릿수 — 음수면 10^|scale|을 곱한 값
    scale: i64,
}

impl Decimal {
    /// 0 값을 반환합니다.
    pub fn zero() -> Self {
        Self {
            neg: false,
            digits: "0".into(),
            scale: 0,
        }
    }

    /// 0인지 확인합니다 (스케일 무관).
    pub fn is_zero(&self) -> bool {
        &*self.digits == "0"
    }

    /// 음수인지 확인합니다.
    pub fn is_negative(&self) -> bool {
        self.neg
    }

    /// 비스케일 유효숫자 문자열을 반환합니다.
    pub fn digits(&self) -> &str {
        &self.digits
    }

    /// 스케일(소수 자릿수)을 반환합니다.
    pub fn scale(&self) -> i64 {
        self.scale
    }

    /// 소수부에 0이 아닌 숫자가 없는지 확인합니다.
    pub fn is_integer(&self) -> bool {
        self.fraction_split().1.bytes().all(|b| b == b'0')
    }

    /// 리터럴 조각(정수부, 소수부, 지수)으로부터 값을 만듭니다.
    ///
    /// 숫자가 아닌 바이트가 섞여 있거나 스케일이 i64를 벗어나면 `None`.
    pub fn from_parts(neg: bool, int_part: &str, frac_part: &str, exp: i64) -> Option<Self> {
        if int_part.is_empty() && frac_part.is_empty() {
            return None;
        }
        if !int_part.bytes().all(|b| b.is_ascii_digit())
            || !frac_part.bytes().all(|b| b.is_ascii_digit())
        {
            return None;
        }

        let scale = (frac_part.len() as i64).checked_sub(exp)?;

        let mut digits = String::with_capacity(int_part.len() + frac_part.len());
        digits.push_str(int_part);
        digits.push_str(frac_part);

        // leading zero 제거 (최소 한 자리는 남긴다)
        let start = digits
            .bytes()
            .position(|b| b != b'0')
            .unwrap_or(digits.len() - 1);
        digits.drain(..start);

        let zero = &digits == "0";
        Some(Self {
            neg: neg && !zero,
            digits: digits.into_boxed_str(),
            scale,
        })
    }

    /// (정수부, 소수부)로 나눕니다. 소수부는 암묵적 선행 0을 제외한 부분.
    fn fraction_split(&self) -> (&str, &str) {
        if self.scale <= 0 {
            return (&self.digits, "");
        }
        let len = self.digits.len() as i64;
        if self.scale >= len {
            ("", &self.digits)
        } else {
            self.digits.split_at((len - self.scale) as usize)
        }
    }

    /// 과학적 표기를 쓸지 결정합니다 (Java `BigDecimal.toString` 규칙).
    fn use_scientific(&self) -> bool {
        if self.scale == 0 {
            return false;
        }
        let adjusted = (self.digits.len() as i64 - 1) - self.scale;
        self.scale < 0 || adjusted < MIN_PLAIN_ADJUSTED
    }

    /// 정규 문자열 표현을 만듭니다.
    ///
    /// [`fmt::Display`]와 동일하며, 인코더가 길이 힌트 계산에도 사용합니다.
    pub fn to_canonical_string(&self) -> String {
        let ndigits = self.digits.len() as i64;
        let mut out = String::with_capacity(self.digits.len() + 8);
        if self.neg {
            out.push('-');
        }

        if self.scale == 0 {
            out.push_str(&self.digits);
        } else if self.use_scientific() {
            // d[.ddd]E±adjusted
            let adjusted = (ndigits - 1) - self.scale;
            out.push_str(&self.digits[..1]);
            if ndigits > 1 {
                out.push('.');
                out.push_str(&self.digits[1..]);
            }
            out.push('E');
            if adjusted >= 0 {
                out.push('+');
            } else {
                out.push('-');
            }
            out.push_str(&adjusted.unsigned_abs().to_string());
        } else {
            let pad = self.scale - ndigits;
            if pad >= 0 {
                out.push_str("0.");
                for _ in 0..pad {
                    out.push('0');
                }
                out.push_str(&self.digits);
            } else {
                let point = (ndigits - self.scale) as usize;
                out.push_str(&self.digits[..point]);
                out.push('.');
                out.push_str(&self.digits[point..]);
            }
        }

        out
    }

    /// 정규 문자열 표현의 바이트 길이를 반환합니다.
    pub fn canonical_len(&self) -> usize {
        self.to_canonical_string().len()
    }

    /// 가장 가까운 f64로 변환합니다 (round-half-even).
    ///
    /// 표현 범위를 벗어나면 부호에 맞는 무한대가 됩니다.
    pub fn to_f64(&self) -> f64 {
        let fallback = if self.neg {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };
        self.to_canonical_string().parse().unwrap_or(fallback)
    }

    /// 가장 가까운 f32로 변환합니다 (round-half-even).
    pub fn to_f32(&self) -> f32 {
        let fallback = if self.neg {
            f32::NEG_INFINITY
        } else {
            f32::INFINITY
        };
        self.to_canonical_string().parse().unwrap_or(fallback)
    }

    /// 소수부가 0이고 범위에 맞을 때에만 i64로 변환합니다.
    pub fn to_i64(&self) -> Option<i64> {
        if self.is_zero() {
            return Some(0);
        }
        let (int_part, frac_part) = self.fraction_split();
        if frac_part.bytes().any(|b| b != b'0') {
            return None;
        }
        // 음수 스케일은 10^|scale|배 확대
        let shift = if self.scale < 0 {
            usize::try_from(self.scale.unsigned_abs()).ok()?
        } else {
            0
        };
        // i64 최대값은 19자리
        if int_part.len() + shift > 19 {
            return None;
        }
        let mut text = String::with_capacity(1 + int_part.len() + shift);
        if self.neg {
            text.push('-');
        }
        text.push_str(if int_part.is_empty() { "0" } else { int_part });
        for _ in 0..shift {
            text.push('0');
        }
        text.parse().ok()
    }

    /// 소수부가 0이고 범위에 맞을 때에만 i32로 변환합니다.
    pub fn to_i32(&self) -> Option<i32> {
        self.to_i64().and_then(|n| i32::try_from(n).ok())
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_canonical_string())
    }
}

impl FromStr for Decimal {
    type Err = DecimalParseError;

    /// JSON 숫자 문법(자체 출력의 `E+`/`E-` 포함)을 파싱합니다.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = s.as_bytes();
        let mut pos = 0usize;

        let neg = match bytes.first() {
            Some(b'-') => {
                pos += 1;
                true
            }
            Some(b'+') => {
                pos += 1;
                false
            }
            _ => false,
        };

        let int_start = pos;
        while pos < bytes.len() && bytes[pos].is_ascii_digit() {
            pos += 1;
        }
        let int_part = &s[int_start..pos];

        let mut frac_part = "";
        if pos < bytes.len() && bytes[pos] == b'.' {
            pos += 1;
            let frac_start = pos;
            while pos < bytes.len() && bytes[pos].is_ascii_digit() {
                pos += 1;
            }
            frac_part = &s[frac_start..pos];
            if frac_part.is_empty() {
                return Err(DecimalParseError::Malformed);
            }
        }

        if int_part.is_empty() && frac_part.is_empty() {
            return Err(DecimalParseError::Malformed);
        }

        let mut exp = 0i64;
        if pos < bytes.len() && (bytes[pos] == b'e' || bytes[pos] == b'E') {
            pos += 1;
            let exp_neg = match bytes.get(pos) {
                Some(b'-') => {
                    pos += 1;
                    true
                }
                Some(b'+') => {
                    pos += 1;
                    false
                }
                _ => false,
            };
            let exp_start = pos;
            while pos < bytes.len() && bytes[pos].is_ascii_digit() {
                pos += 1;
            }
            let exp_digits = &s[exp_start..pos];
            if exp_digits.is_empty() {
                return Err(DecimalParseError::Malformed);
            }
            exp = exp_digits
                .parse::<i64>()
                .map_err(|_| DecimalParseError::ExponentOverflow)?;
            if exp_neg {
                exp = -exp;
            }
        }

        if pos != bytes.len() {
            return Err(DecimalParseError::Malformed);
        }

        Decimal::from_parts(neg, int_part, frac_part, exp)
            .ok_or(DecimalParseError::ExponentOverflow)
    }
}

impl From<i64> for Decimal {
    fn from(n: i64) -> Self {
        Decimal::from_parts(n < 0, &n.unsigned_abs().to_string(), "", 0)
            .unwrap_or_else(Decimal::zero)
    }
}

impl From<i32> for Decimal {
    fn from(n: i32) -> Self {
        Decimal::from(i64::from(n))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn parse_plain_integer() {
        let d = dec("42");
        assert_eq!(d.digits(), "42");
        assert_eq!(d.scale(), 0);
        assert!(!d.is_negative());
        assert!(d.is_integer());
    }

    #[test]
    fn parse_fraction() {
        let d = dec("123.45");
        assert_eq!(d.digits(), "12345");
        assert_eq!(d.scale(), 2);
        assert!(!d.is_integer());
    }

    #[test]
    fn parse_exponent() {
        let d = dec("2e128");
        assert_eq!(d.digits(), "2");
        assert_eq!(d.scale(), -128);
        assert!(d.is_integer());
    }

    #[test]
    fn parse_negative() {
        let d = dec("-0.5");
        assert!(d.is_negative());
        assert_eq!(d.digits(), "5");
        assert_eq!(d.scale(), 1);
    }

    #[test]
    fn leading_zeros_stripped_scale_kept() {
        let d = dec("0100.00");
        assert_eq!(d.digits(), "10000");
        assert_eq!(d.scale(), 2);
        assert_eq!(d.to_string(), "100.00");
    }

    #[test]
    fn scale_is_part_of_identity() {
        // Java BigDecimal.equals와 같은 스케일 민감 동등성
        assert_ne!(dec("1.0"), dec("1"));
        assert_ne!(dec("1.0"), dec("1.00"));
        assert_eq!(dec("1.0"), dec("1.0"));
    }

    #[test]
    fn negative_zero_is_zero() {
        let d = dec("-0.0");
        assert!(d.is_zero());
        assert!(!d.is_negative());
        assert_eq!(d.to_string(), "0.0");
    }

    #[test]
    fn scientific_rendering() {
        assert_eq!(dec("2e128").to_string(), "2E+128");
        assert_eq!(dec("2.5e10").to_string(), "2.5E+10");
        assert_eq!(dec("1e-7").to_string(), "1E-7");
        assert_eq!(dec("-2e128").to_string(), "-2E+128");
        assert_eq!(dec("0e2").to_string(), "0E+2");
    }

    #[test]
    fn plain_rendering() {
        assert_eq!(dec("123.45").to_string(), "123.45");
        assert_eq!(dec("0.12345").to_string(), "0.12345");
        assert_eq!(dec("0.001").to_string(), "0.001");
        assert_eq!(dec("0.000001").to_string(), "0.000001");
        assert_eq!(dec("42").to_string(), "42");
        assert_eq!(dec("-7.25").to_string(), "-7.25");
        assert_eq!(dec("1.0").to_string(), "1.0");
        assert_eq!(dec("0.0").to_string(), "0.0");
    }

    #[test]
    fn scientific_boundary_matches_java() {
        // 조정 지수 -6까지는 평범한 표기, -7부터 과학적 표기
        assert_eq!(dec("0.0000001").to_string(), "1E-7");
        assert_eq!(dec("0.000001").to_string(), "0.000001");
        // 음수 스케일은 항상 과학적 표기
        assert_eq!(dec("1e1").to_string(), "1E+1");
        assert_eq!(dec("1.5e3").to_string(), "1.5E+3");
    }

    #[test]
    fn display_round_trips() {
        for s in [
            "2E+128", "123.45", "0.12345", "-7.25", "0", "1E-7", "9.999E-100", "1.0",
            "100.00", "0E+2", "1E+1",
        ] {
            let d = dec(s);
            assert_eq!(dec(&d.to_string()), d, "round trip of {s}");
            assert_eq!(d.to_string(), s, "canonical form of {s}");
        }
    }

    #[test]
    fn to_f64_half_even() {
        // f64로 정확히 표현 가능한 값
        assert_eq!(dec("0.5").to_f64(), 0.5);
        assert_eq!(dec("2e128").to_f64(), 2e128);
        // 범위 초과는 무한대
        assert_eq!(dec("1e999").to_f64(), f64::INFINITY);
        assert_eq!(dec("-1e999").to_f64(), f64::NEG_INFINITY);
    }

    #[test]
    fn to_i64_integral_only() {
        assert_eq!(dec("42").to_i64(), Some(42));
        assert_eq!(dec("-42").to_i64(), Some(-42));
        assert_eq!(dec("4.2").to_i64(), None);
        assert_eq!(dec("42.00").to_i64(), Some(42));
        assert_eq!(dec("1e2").to_i64(), Some(100));
        assert_eq!(dec("1e30").to_i64(), None);
        assert_eq!(dec("0").to_i64(), Some(0));
        assert_eq!(dec("0.000").to_i64(), Some(0));
    }

    #[test]
    fn to_i32_range_check() {
        assert_eq!(dec("2147483647").to_i32(), Some(i32::MAX));
        assert_eq!(dec("2147483648").to_i32(), None);
        assert_eq!(dec("-2147483648").to_i32(), Some(i32::MIN));
    }

    #[test]
    fn malformed_inputs_rejected() {
        for s in ["", "-", ".", ".5x", "1.", "1e", "1e+", "abc", "1 2", "--1"] {
            assert!(s.parse::<Decimal>().is_err(), "should reject {s:?}");
        }
    }

    #[test]
    fn exponent_overflow_rejected() {
        assert!("1e99999999999999999999".parse::<Decimal>().is_err());
    }

    #[test]
    fn from_i64_keeps_plain_form() {
        let d = Decimal::from(100i64);
        assert_eq!(d.digits(), "100");
        assert_eq!(d.scale(), 0);
        assert_eq!(d.to_string(), "100");
        assert_eq!(d.to_i64(), Some(100));
    }

    // Property-based tests
    #[cfg(test)]
    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn parse_never_panics(s in "\\PC{0,40}") {
                let _ = s.parse::<Decimal>();
            }

            #[test]
            fn display_parse_round_trip(n in any::<i64>(), shift in -30i64..30) {
                let d = Decimal::from_parts(n < 0, &n.unsigned_abs().to_string(), "", shift).unwrap();
                let back: Decimal = d.to_string().parse().unwrap();
                prop_assert_eq!(back, d);
            }

            #[test]
            fn canonical_len_matches(n in any::<i64>(), shift in -30i64..30) {
                let d = Decimal::from_parts(n < 0, &n.unsigned_abs().to_string(), "", shift).unwrap();
                prop_assert_eq!(d.canonical_len(), d.to_string().len());
            }

            #[test]
            fn integral_values_convert_back(n in any::<i32>()) {
                let d = Decimal::from(n);
                prop_assert_eq!(d.to_i32(), Some(n));
                prop_assert_eq!(d.to_f64(), f64::from(n));
            }
        }
    }
}
