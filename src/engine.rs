/// Detection engine: owns the keyword table and the loaded signatures
use crate::config::Settings;
use crate::error::{KsError, Result};
use crate::packet::PacketView;
use crate::rules::{parse_signature, KeywordTable, Signature};
use ahash::AHashSet;
use tracing::{debug, info, trace, warn};

/// Outcome of a bulk signature load
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub loaded: usize,
    /// (line number, error message) for every rejected signature
    pub failed: Vec<(usize, String)>,
}

/// Signature engine.
///
/// Signatures are loaded up front; inspection only takes `&self`, so one
/// engine can be shared by any number of worker threads.
#[derive(Debug)]
pub struct DetectEngine {
    keywords: KeywordTable,
    signatures: Vec<Signature>,
    sids: AHashSet<u32>,
    strict_options: bool,
}

impl DetectEngine {
    pub fn new(settings: &Settings) -> Self {
        let keywords =
            KeywordTable::with_defaults().without(settings.detection.disabled_keywords.as_slice());
        info!("Registered rule keywords: {:?}", keywords.names());

        Self {
            keywords,
            signatures: Vec::new(),
            sids: AHashSet::new(),
            strict_options: settings.detection.strict_options,
        }
    }

    pub fn keywords(&self) -> &KeywordTable {
        &self.keywords
    }

    /// Parse and add one signature, returning its SID
    pub fn load_signature(&mut self, text: &str) -> Result<u32> {
        let sig = parse_signature(&self.keywords, text, self.strict_options)?;
        self.add_signature(sig)
    }

    /// Add an already compiled signature
    pub fn add_signature(&mut self, sig: Signature) -> Result<u32> {
        let sid = sig.sid;
        if !self.sids.insert(sid) {
            return Err(KsError::DuplicateSid(sid));
        }

        debug!("Loaded signature {}", sig);
        self.signatures.push(sig);
        Ok(sid)
    }

    /// Load one signature per line, skipping blanks and `#` comments.
    ///
    /// A bad signature is logged and reported but does not stop the load.
    pub fn load_signatures<'a, I>(&mut self, lines: I) -> LoadReport
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut report = LoadReport::default();

        for (idx, line) in lines.into_iter().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            match self.load_signature(line) {
                Ok(_) => report.loaded += 1,
                Err(e) => {
                    warn!("Failed to load signature on line {}: {}", idx + 1, e);
                    report.failed.push((idx + 1, e.to_string()));
                }
            }
        }

        info!(
            "Loaded {} signatures ({} rejected)",
            report.loaded,
            report.failed.len()
        );
        report
    }

    pub fn signatures(&self) -> &[Signature] {
        &self.signatures
    }

    pub fn len(&self) -> usize {
        self.signatures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signatures.is_empty()
    }

    /// SIDs of every signature matching the packet, in load order
    pub fn inspect(&self, packet: &dyn PacketView) -> Vec<u32> {
        let hits: Vec<u32> = self
            .signatures
            .iter()
            .filter(|sig| sig.matches(packet))
            .map(|sig| sig.sid)
            .collect();

        trace!("Packet matched {} signature(s)", hits.len());
        hits
    }
}

impl Default for DetectEngine {
    fn default() -> Self {
        Self::new(&Settings::default())
    }
}
