/// Rule option parser using nom combinators
///
/// Parses a Snort-style option body such as
/// `(msg:"Zero window"; window:0; sid:1000001; rev:1;)` and dispatches every
/// non-metadata option through the keyword table.
use super::keyword::KeywordTable;
use super::signature::Signature;
use crate::error::{KsError, Result};
use nom::{
    branch::alt,
    bytes::complete::{tag, take_until, take_while, take_while1},
    character::complete::{char, multispace0},
    combinator::{all_consuming, opt},
    multi::separated_list1,
    sequence::{delimited, preceded, terminated, tuple},
    IResult,
};
use tracing::{debug, warn};

/// Parse an option body into ordered `(keyword, value)` pairs.
///
/// Keywords without a value (e.g. `nocase;`) yield an empty value. The
/// final `;` is optional.
pub fn parse_option_list(input: &str) -> IResult<&str, Vec<(&str, &str)>> {
    terminated(
        separated_list1(char(';'), parse_option),
        tuple((opt(char(';')), multispace0)),
    )(input)
}

/// Parse a single option (key, key:value or key:"value")
fn parse_option(input: &str) -> IResult<&str, (&str, &str)> {
    let (input, _) = multispace0(input)?;
    let (input, key) = take_while1(is_option_key_char)(input)?;
    let (input, _) = multispace0(input)?;

    let (input, value) = opt(preceded(
        char(':'),
        alt((
            delimited(
                preceded(multispace0, tag("\"")),
                take_until("\""),
                preceded(char('"'), multispace0),
            ),
            take_while(|c: char| c != ';' && c != '"'),
        )),
    ))(input)?;

    Ok((input, (key, value.map(str::trim).unwrap_or(""))))
}

/// Parse a complete option body into a signature.
///
/// `sid`, `rev` and `msg` fill the signature header; every other keyword is
/// compiled through `table` and appended to the match list in rule order.
/// With `strict` unset, keywords missing from the table are skipped with a
/// warning instead of rejecting the rule, unless that leaves the rule with
/// no keywords at all.
pub fn parse_signature(table: &KeywordTable, input: &str, strict: bool) -> Result<Signature> {
    let body = strip_parens(input)?;

    let (_, options) = all_consuming(parse_option_list)(body).map_err(|e| {
        KsError::RuleParseError(format!("Malformed option list {:?}: {}", input.trim(), e))
    })?;

    let mut sig = Signature::default();
    let mut sid = None;
    let mut skipped = Vec::new();

    for (key, value) in options {
        match key {
            "sid" => sid = Some(parse_number(key, value)?),
            "rev" => sig.rev = Some(parse_number(key, value)?),
            "msg" => sig.msg = Some(value.to_string()),
            _ => match table.setup(key, value) {
                Ok(sm) => sig.append(sm),
                Err(KsError::UnknownKeyword(name)) if !strict => {
                    warn!("Skipping unsupported rule keyword: {}", name);
                    skipped.push(name);
                }
                Err(e) => return Err(e),
            },
        }
    }

    sig.sid = sid.ok_or_else(|| {
        KsError::RuleParseError(format!("Missing sid in {:?}", input.trim()))
    })?;

    // An empty match list matches every packet; dropping all of a rule's
    // keywords must not widen it to that
    if !skipped.is_empty() && sig.sig_matches().is_empty() {
        return Err(KsError::RuleParseError(format!(
            "Signature sid:{} has no supported keywords (skipped: {})",
            sig.sid,
            skipped.join(", ")
        )));
    }

    debug!(
        "Parsed signature sid:{} with {} keyword(s)",
        sig.sid,
        sig.sig_matches().len()
    );
    Ok(sig)
}

fn strip_parens(input: &str) -> Result<&str> {
    let trimmed = input.trim();
    match (trimmed.strip_prefix('('), trimmed.ends_with(')')) {
        (Some(inner), true) => Ok(&inner[..inner.len() - 1]),
        (None, false) => Ok(trimmed),
        _ => Err(KsError::RuleParseError(format!(
            "Unbalanced parentheses in {:?}",
            trimmed
        ))),
    }
}

fn parse_number(key: &str, value: &str) -> Result<u32> {
    value
        .parse()
        .map_err(|_| KsError::RuleParseError(format!("Invalid {} value {:?}", key, value)))
}

fn is_option_key_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '-' || c == '.'
}
