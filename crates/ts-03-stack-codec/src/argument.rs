//! # Text Arguments
//!
//! Get-method arguments arrive as strings. Each token is tried against these
//! forms in order, and the first match wins:
//!
//! | # | Form | Entry |
//! |---|------|-------|
//! | 1 | `NaN` | [`StackEntry::Nan`] |
//! | 2 | `Null`, `null` | [`StackEntry::Null`] |
//! | 3 | raw or friendly address | slice holding `addr_std` |
//! | 4 | `0x1f`, `-0x1f` | integer |
//! | 5 | `123`, `-123`, `+123` | integer |
//! | 6 | hex bag of cells with one root | slice over the root |

use crate::entry::{fits_int257, StackEntry};
use crate::errors::StackError;
use num_bigint::BigInt;
use num_traits::Num;
use ts_02_cell_codec::{boc, CellSlice};

/// Parses one textual argument.
///
/// # Errors
///
/// Returns [`StackError::UnparsableArgument`] naming `token` when no form
/// matches.
pub fn parse_argument(token: &str) -> Result<StackEntry, StackError> {
    let unparsable = || StackError::UnparsableArgument {
        token: token.to_string(),
    };

    match token {
        "NaN" => return Ok(StackEntry::Nan),
        "Null" | "null" => return Ok(StackEntry::Null),
        _ => {}
    }

    if let Ok(parsed) = ts_01_address_codec::parse(token) {
        return StackEntry::address(&parsed.id).map_err(StackError::from);
    }

    if let Some(value) = parse_hex_int(token) {
        return if fits_int257(&value) {
            Ok(StackEntry::Int(value))
        } else {
            Err(unparsable())
        };
    }

    if let Some(value) = parse_decimal_int(token) {
        return if fits_int257(&value) {
            Ok(StackEntry::Int(value))
        } else {
            Err(unparsable())
        };
    }

    let bytes = hex::decode(token).map_err(|_| unparsable())?;
    let root = boc::deserialize_single(&bytes).map_err(|_| unparsable())?;
    Ok(StackEntry::Slice(CellSlice::new(root)))
}

/// Parses a list of textual arguments. The first failure aborts the whole list.
///
/// # Errors
///
/// Returns the first [`StackError::UnparsableArgument`].
pub fn parse_arguments<S: AsRef<str>>(tokens: &[S]) -> Result<Vec<StackEntry>, StackError> {
    tokens.iter().map(|t| parse_argument(t.as_ref())).collect()
}

fn parse_hex_int(token: &str) -> Option<BigInt> {
    let (negative, digits) = if let Some(rest) = token.strip_prefix("-0x") {
        (true, rest)
    } else {
        (false, token.strip_prefix("0x")?)
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let value = BigInt::from_str_radix(digits, 16).ok()?;
    Some(if negative { -value } else { value })
}

fn parse_decimal_int(token: &str) -> Option<BigInt> {
    let digits = token.strip_prefix(['-', '+']).unwrap_or(token);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    token.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_traits::One;
    use ts_01_address_codec::AccountId;
    use ts_02_cell_codec::{Cell, MsgAddress};

    #[test]
    fn test_keywords() {
        assert_eq!(parse_argument("NaN").unwrap(), StackEntry::Nan);
        assert_eq!(parse_argument("Null").unwrap(), StackEntry::Null);
        assert_eq!(parse_argument("null").unwrap(), StackEntry::Null);
        assert!(parse_argument("nan").is_err());
    }

    #[test]
    fn test_integers() {
        assert_eq!(parse_argument("0x1f").unwrap(), StackEntry::int(31));
        assert_eq!(parse_argument("-0x10").unwrap(), StackEntry::int(-16));
        assert_eq!(parse_argument("-42").unwrap(), StackEntry::int(-42));
        assert_eq!(parse_argument("+7").unwrap(), StackEntry::int(7));
        assert_eq!(parse_argument("0").unwrap(), StackEntry::int(0));
    }

    #[test]
    fn test_int257_range_enforced() {
        let max: BigInt = (BigInt::one() << 256usize) - 1;
        assert_eq!(parse_argument(&max.to_string()).unwrap(), StackEntry::Int(max.clone()));
        let over = (max + 1u32).to_string();
        assert!(matches!(
            parse_argument(&over),
            Err(StackError::UnparsableArgument { .. })
        ));
    }

    #[test]
    fn test_address_becomes_slice() {
        let entry = parse_argument("EQD2NmD_lH5f5u1Kj3KfGyTvhZSX0Eg6qp2a5IQUKXxOG21n").unwrap();
        let StackEntry::Slice(slice) = &entry else {
            panic!("expected slice, got {entry:?}");
        };
        assert_eq!(slice.remaining_bits(), 267);
        let id = entry.load_address().unwrap().account().unwrap();
        assert_eq!(
            id.to_raw(),
            "0:f63660ff947e5fe6ed4a8f729f1b24ef859497d0483aaa9d9ae48414297c4e1b"
        );

        let raw = parse_argument("-1:0000000000000000000000000000000000000000000000000000000000000000")
            .unwrap();
        assert_eq!(
            raw.load_address().unwrap(),
            MsgAddress::Std(AccountId::new(-1, [0; 32]))
        );
    }

    #[test]
    fn test_boc_becomes_slice() {
        let entry = parse_argument("b5ee9c724101010100020000004cacb9cd").unwrap();
        assert_eq!(entry.as_cell().map(|c| c.as_ref()), Some(&Cell::empty()));
    }

    #[test]
    fn test_rejects_garbage() {
        for token in ["abc", "", "0x", "-", "12a", "0xzz", "b5ee9c72"] {
            assert_eq!(
                parse_argument(token),
                Err(StackError::UnparsableArgument {
                    token: token.to_string()
                }),
                "{token}"
            );
        }
    }

    #[test]
    fn test_list_is_atomic() {
        assert_eq!(
            parse_arguments(&["1", "2"]).unwrap(),
            vec![StackEntry::int(1), StackEntry::int(2)]
        );
        let err = parse_arguments(&["1", "abc", "3"]).unwrap_err();
        assert_eq!(
            err,
            StackError::UnparsableArgument {
                token: "abc".into()
            }
        );
    }
}
