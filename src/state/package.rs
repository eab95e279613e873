//! Package source snapshot types.

/// One file of a package directory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub md5: String,
    /// Modification time in seconds since the epoch.
    pub mtime: u64,
    pub name: String,
}

/// Files of a package at one revision, in the order the service lists them.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PackageSnapshot {
    pub project: String,
    pub package: String,
    pub rev: Option<String>,
    pub srcmd5: Option<String>,
    pub files: Vec<FileEntry>,
}
