//! Token framing.
//!
//! Wire format:
//! `b64u(ciphertext)|b64u(issued_at)|b64u(tid)|b64u(iv)|b64u(mac)`
//!
//! `issued_at` is ASCII decimal seconds since the Unix epoch. The MAC covers
//! the literal text of the first four fields including their delimiters.

use clientstate_crypto::{base64url_decode, base64url_encode};

use crate::error::StateError;

pub const SEPARATOR: char = '|';

pub const FIELD_COUNT: usize = 5;

/// A received token split into its decoded fields.
///
/// `signed` borrows the exact received text the MAC was computed over, so
/// verification never depends on re-encoding.
#[derive(Debug)]
pub struct ParsedToken<'a> {
    pub signed: &'a str,
    pub ciphertext: Vec<u8>,
    pub issued_at: i64,
    pub tid: Vec<u8>,
    pub iv: Vec<u8>,
    pub mac: Vec<u8>,
}

/// Join the four MAC-covered fields.
pub fn join_signed(ciphertext: &[u8], issued_at: i64, tid: &[u8], iv: &[u8]) -> String {
    let mut base = String::new();
    base.push_str(&base64url_encode(ciphertext));
    base.push(SEPARATOR);
    base.push_str(&base64url_encode(issued_at.to_string().as_bytes()));
    base.push(SEPARATOR);
    base.push_str(&base64url_encode(tid));
    base.push(SEPARATOR);
    base.push_str(&base64url_encode(iv));
    base
}

/// Append the MAC field to the output of [`join_signed`].
pub fn append_mac(mut signed: String, mac: &[u8]) -> String {
    signed.push(SEPARATOR);
    signed.push_str(&base64url_encode(mac));
    signed
}

/// Split a token into exactly [`FIELD_COUNT`] fields and decode each one.
pub fn parse(token: &str) -> Result<ParsedToken<'_>, StateError> {
    let fields: Vec<&str> = token.split(SEPARATOR).collect();
    if fields.len() != FIELD_COUNT {
        return Err(StateError::MalformedToken(format!(
            "expected {} fields, got {}",
            FIELD_COUNT,
            fields.len()
        )));
    }

    // Exactly four separators precede the mac, so the last one marks the end
    // of the signed region.
    let mac_start = token.len() - fields[4].len();
    let signed = &token[..mac_start - 1];

    let ciphertext = decode_field("ciphertext", fields[0])?;
    let issued_at = parse_issued_at(&decode_field("issued-at", fields[1])?)?;
    let tid = decode_field("tid", fields[2])?;
    let iv = decode_field("iv", fields[3])?;
    let mac = decode_field("mac", fields[4])?;

    Ok(ParsedToken {
        signed,
        ciphertext,
        issued_at,
        tid,
        iv,
        mac,
    })
}

fn decode_field(name: &str, field: &str) -> Result<Vec<u8>, StateError> {
    base64url_decode(field).map_err(|e| StateError::MalformedToken(format!("{}: {}", name, e)))
}

fn parse_issued_at(raw: &[u8]) -> Result<i64, StateError> {
    let digits = raw.strip_prefix(b"-").unwrap_or(raw);
    if digits.is_empty() || !digits.iter().all(u8::is_ascii_digit) {
        return Err(StateError::MalformedToken(
            "issued-at is not a decimal timestamp".into(),
        ));
    }
    let text = std::str::from_utf8(raw)
        .map_err(|e| StateError::MalformedToken(format!("issued-at: {}", e)))?;
    text.parse::<i64>()
        .map_err(|e| StateError::MalformedToken(format!("issued-at: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = "qNX-WICMw9HwIjIfnUh33-n32TRJ8CU|MTUwMDAwMDAwMA|dGVuYW50LWE|MzMzMzMzMzMzMzMzMzMzMw|3z5DzgBPABLXeOkx1CTYBZBFQ6PlRmcUc3ChiGct3aQ";

    #[test]
    fn parses_fixture() {
        let parsed = parse(FIXTURE).unwrap();
        assert_eq!(parsed.issued_at, 1_500_000_000);
        assert_eq!(parsed.tid, b"tenant-a");
        assert_eq!(parsed.iv, [0x33; 16]);
        assert_eq!(parsed.mac.len(), 32);
        assert_eq!(
            parsed.signed,
            "qNX-WICMw9HwIjIfnUh33-n32TRJ8CU|MTUwMDAwMDAwMA|dGVuYW50LWE|MzMzMzMzMzMzMzMzMzMzMw"
        );
    }

    #[test]
    fn join_matches_fixture() {
        let parsed = parse(FIXTURE).unwrap();
        let signed = join_signed(&parsed.ciphertext, parsed.issued_at, &parsed.tid, &parsed.iv);
        assert_eq!(signed, parsed.signed);
        assert_eq!(append_mac(signed, &parsed.mac), FIXTURE);
    }

    #[test]
    fn rejects_wrong_field_count() {
        let trailing = format!("{}|", FIXTURE);
        for token in ["", "a|b|c|d", "a|b|c|d|e|f", trailing.as_str()] {
            let err = parse(token).unwrap_err();
            assert!(matches!(err, StateError::MalformedToken(_)), "{}", token);
        }
    }

    #[test]
    fn rejects_invalid_base64() {
        let token = FIXTURE.replacen("dGVuYW50LWE", "dGVu=W50LWE", 1);
        assert!(matches!(parse(&token), Err(StateError::MalformedToken(_))));
    }

    #[test]
    fn rejects_non_numeric_timestamp() {
        let bad = base64url_encode(b"15e8");
        let token = FIXTURE.replacen("MTUwMDAwMDAwMA", &bad, 1);
        let err = parse(&token).unwrap_err();
        assert!(err.to_string().contains("issued-at"));
    }

    #[test]
    fn rejects_signed_timestamp_prefix() {
        let bad = base64url_encode(b"+1500000000");
        let token = FIXTURE.replacen("MTUwMDAwMDAwMA", &bad, 1);
        assert!(matches!(parse(&token), Err(StateError::MalformedToken(_))));
    }

    #[test]
    fn accepts_negative_timestamp() {
        let ts = base64url_encode(b"-5");
        let token = FIXTURE.replacen("MTUwMDAwMDAwMA", &ts, 1);
        assert_eq!(parse(&token).unwrap().issued_at, -5);
    }

    #[test]
    fn rejects_overflowing_timestamp() {
        let bad = base64url_encode(b"99999999999999999999");
        let token = FIXTURE.replacen("MTUwMDAwMDAwMA", &bad, 1);
        assert!(matches!(parse(&token), Err(StateError::MalformedToken(_))));
    }
}
