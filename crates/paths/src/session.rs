use std::collections::HashMap;
use std::fmt;

/// Logical identifier of one scan: subject, session, scan id.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ScanKey {
    pub subject: String,
    pub session_id: u32,
    pub scan_id: u32,
}

impl ScanKey {
    pub fn new(subject: impl Into<String>, session_id: u32, scan_id: u32) -> Self {
        Self {
            subject: subject.into(),
            session_id,
            scan_id,
        }
    }
}

impl fmt::Display for ScanKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "subject={} session_id={} scan_id={}",
            self.subject, self.session_id, self.scan_id
        )
    }
}

/// Lookup seam for the externally-owned session-directory table.
///
/// The pipeline database stores one relative directory per (subject,
/// session); this crate only consumes that mapping.
pub trait SessionDirectorySource {
    /// Relative session directory for the scan's session, if registered.
    fn session_dir(&self, key: &ScanKey) -> Option<String>;
}

/// Map-backed source, preloaded from pipeline rows (or test data).
#[derive(Debug, Clone, Default)]
pub struct InMemorySessionDirectories {
    dirs: HashMap<(String, u32), String>,
}

impl InMemorySessionDirectories {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(
        &mut self,
        subject: impl Into<String>,
        session_id: u32,
        session_dir: impl Into<String>,
    ) {
        self.dirs
            .insert((subject.into(), session_id), session_dir.into());
    }
}

impl SessionDirectorySource for InMemorySessionDirectories {
    fn session_dir(&self, key: &ScanKey) -> Option<String> {
        self.dirs
            .get(&(key.subject.clone(), key.session_id))
            .cloned()
    }
}
