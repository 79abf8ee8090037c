/// `window` rule keyword: match on the raw TCP window size
///
/// Syntax: `window:[!]<size>;` where size is 0-65535. With `!` the keyword
/// matches every TCP segment whose window differs from size.
use crate::error::{KsError, Result};
use crate::packet::{IpProtocol, PacketView};
use regex::Regex;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;
use tracing::{debug, trace};

/// Largest value the 16-bit TCP window field can carry before scaling
pub const MAX_WINDOW_VALUE: u16 = u16::MAX;

/// Optional negation, then at most nine digits.
///
/// Nine digits always fit a `u32`, so the range check against
/// `MAX_WINDOW_VALUE` below is the only bound that matters.
const PARSE_REGEX: &str = r"(?-u)^\s*(!)?\s*([0-9]{1,9})\s*$";

static WINDOW_OPTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(PARSE_REGEX).expect("window option regex is valid"));

/// Compiled `window` option attached to a signature
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WindowMatch {
    size: u16,
    negated: bool,
}

impl WindowMatch {
    /// Parse a `window` option argument such as `"35402"` or `"!35402"`
    pub fn parse(arg: &str) -> Result<Self> {
        let caps = WINDOW_OPTION.captures(arg).ok_or_else(|| {
            debug!("window: rejecting malformed option {:?}", arg);
            KsError::InvalidWindowOption(arg.to_string())
        })?;

        let negated = caps.get(1).is_some();
        let digits = caps
            .get(2)
            .map(|m| m.as_str())
            .ok_or_else(|| KsError::InvalidWindowOption(arg.to_string()))?;

        let size: u32 = digits
            .parse()
            .map_err(|_| KsError::InvalidWindowOption(arg.to_string()))?;

        let size = u16::try_from(size).map_err(|_| {
            debug!("window: size {} out of range", size);
            KsError::WindowOutOfRange {
                size,
                max: MAX_WINDOW_VALUE,
            }
        })?;

        debug!("window: size {} negated {}", size, negated);
        Ok(Self { size, negated })
    }

    /// Window size the option compares against
    pub fn size(&self) -> u16 {
        self.size
    }

    /// True for `window:!N`, which matches every other window size
    pub fn is_negated(&self) -> bool {
        self.negated
    }

    /// Evaluate the option against a packet. Non-TCP packets never match.
    pub fn matches(&self, packet: &dyn PacketView) -> bool {
        if packet.transport_protocol() != Some(IpProtocol::Tcp) {
            return false;
        }

        let Some(window) = packet.tcp_window() else {
            return false;
        };

        let matched = (window == self.size) != self.negated;
        trace!(
            "window: packet window {} option {} negated {} -> {}",
            window,
            self.size,
            self.negated,
            matched
        );
        matched
    }
}

impl FromStr for WindowMatch {
    type Err = KsError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for WindowMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negated {
            write!(f, "window:!{}", self.size)
        } else {
            write!(f, "window:{}", self.size)
        }
    }
}
