/// Signatures and their per-keyword match lists
use super::window::WindowMatch;
use crate::packet::PacketView;
use std::fmt;

/// One compiled keyword occurrence in a signature's match list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SigMatch {
    /// `window:[!]<size>`
    Window(WindowMatch),
}

impl SigMatch {
    /// Keyword name this entry was built from
    pub fn keyword(&self) -> &'static str {
        match self {
            SigMatch::Window(_) => "window",
        }
    }

    pub fn matches(&self, packet: &dyn PacketView) -> bool {
        match self {
            SigMatch::Window(wd) => wd.matches(packet),
        }
    }
}

impl fmt::Display for SigMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SigMatch::Window(wd) => write!(f, "{}", wd),
        }
    }
}

/// A loaded signature: header metadata plus an ordered match list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Signature {
    /// Signature ID
    pub sid: u32,
    /// Revision number
    pub rev: Option<u32>,
    /// Rule message
    pub msg: Option<String>,
    matches: Vec<SigMatch>,
}

impl Signature {
    pub fn new(sid: u32) -> Self {
        Self {
            sid,
            ..Default::default()
        }
    }

    /// Append a compiled keyword to the end of the match list
    pub fn append(&mut self, sm: SigMatch) {
        self.matches.push(sm);
    }

    /// Match list in rule order
    pub fn sig_matches(&self) -> &[SigMatch] {
        &self.matches
    }

    /// True when every keyword in the match list accepts the packet
    pub fn matches(&self, packet: &dyn PacketView) -> bool {
        self.matches.iter().all(|sm| sm.matches(packet))
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        if let Some(ref msg) = self.msg {
            write!(f, "msg:\"{}\"; ", msg)?;
        }
        for sm in &self.matches {
            write!(f, "{}; ", sm)?;
        }
        write!(f, "sid:{};", self.sid)?;
        if let Some(rev) = self.rev {
            write!(f, " rev:{};", rev)?;
        }
        write!(f, ")")
    }
}
