use std::str::FromStr;
use std::str::Utf8Error;

use thiserror::Error;

/// Whitespace the pattern formats allow between tokens.
pub fn is_ws(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\r' | b'\n')
}

/// Consumes the slice until a non-ascii whitespace character is reached.
pub fn take_ws(bytes: &[u8]) -> &[u8] {
    let i = bytes
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(bytes.len());

    &bytes[i..]
}

/// Splits off the first line of `bytes`.
///
/// The linebreak is consumed but not returned. A trailing `\r` is stripped from the line, so both
/// `\n` and `\r\n` files read the same. Returns `None` once the input is exhausted.
pub fn take_line(bytes: &[u8]) -> Option<(&[u8], &[u8])> {
    if bytes.is_empty() {
        return None;
    }

    let (line, rest) = match bytes.iter().position(|&b| b == b'\n') {
        Some(i) => (&bytes[..i], &bytes[i + 1..]),
        None => (bytes, &bytes[bytes.len()..]),
    };

    let line = line.strip_suffix(b"\r").unwrap_or(line);

    Some((line, rest))
}

/// Iterates over the lines of `bytes`, see [`take_line`].
pub fn lines(mut bytes: &[u8]) -> impl Iterator<Item = &[u8]> {
    std::iter::from_fn(move || {
        let (line, rest) = take_line(bytes)?;
        bytes = rest;

        Some(line)
    })
}

/// Takes the next character from the slice. If none is found, the slice is left as-is.
pub const fn take_1(bytes: &[u8]) -> (Option<u8>, &[u8]) {
    let [b, bytes @ ..] = bytes else {
        return (None, bytes);
    };

    (Some(*b), bytes)
}

/// Strips the prefix `bs`, allowing whitespace between the prefix and whatever follows.
pub fn strip_keyword<'a>(bs: &[u8], bytes: &'a [u8]) -> Option<&'a [u8]> {
    bytes.strip_prefix(bs).map(take_ws)
}

/// Lossy printable form of a byte slice, for error messages.
pub fn show(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).trim().to_string()
}

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("Error parsing bytes from UTF-8: {0}")]
    InvalidUTF8(#[from] Utf8Error),

    #[error("Failed to convert \"{str}\"")]
    ParseError { str: String },
}

/// Converts `&[u8]` to `T` if `T: FromStr`.
pub fn convert<T: FromStr>(bytes: &[u8]) -> Result<T, ConvertError> {
    let str = std::str::from_utf8(bytes)?;

    let Ok(res) = str.trim().parse::<T>() else {
        return Err(ConvertError::ParseError {
            str: str.to_string(),
        });
    };

    Ok(res)
}
