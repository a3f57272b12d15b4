//! Hex color parsing with a black fallback.

use burnin_types::Rgb;
use nom::bytes::complete::take_while_m_n;
use nom::combinator::{all_consuming, map_res};
use nom::{IResult, Parser};

fn hex_channel(input: &str) -> IResult<&str, u8> {
    map_res(take_while_m_n(2, 2, |c: char| c.is_ascii_hexdigit()), |s: &str| {
        u8::from_str_radix(s, 16)
    })
    .parse(input)
}

fn hex_rgb(input: &str) -> IResult<&str, (u8, u8, u8)> {
    all_consuming((hex_channel, hex_channel, hex_channel)).parse(input)
}

/// Expands the 3-digit shorthand by doubling each nibble (`f0a` -> `ff00aa`).
fn expand_shorthand(hex: &str) -> String {
    if hex.chars().count() == 3 {
        hex.chars().flat_map(|c| [c, c]).collect()
    } else {
        hex.to_string()
    }
}

/// Parses a `#RGB` / `#RRGGBB` color (the `#` is optional).
///
/// Anything that is not exactly six hex digits after shorthand expansion
/// resolves to black.
pub fn parse_color(input: &str) -> Rgb {
    let hex = input.trim();
    let hex = hex.strip_prefix('#').unwrap_or(hex);
    let expanded = expand_shorthand(hex);

    match hex_rgb(&expanded) {
        Ok((_, (r, g, b))) => Rgb::from_u8(r, g, b),
        Err(_) => {
            log::trace!("Unparseable color '{}', using black", input);
            Rgb::BLACK
        }
    }
}

/// Parses an optional color, treating `None`, empty strings and the
/// `transparent` sentinel as "no color".
pub fn parse_optional_color(input: Option<&str>) -> Option<Rgb> {
    match input.map(str::trim) {
        None | Some("") => None,
        Some(s) if s.eq_ignore_ascii_case("transparent") => None,
        Some(s) => Some(parse_color(s)),
    }
}
