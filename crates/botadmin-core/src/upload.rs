//! File attachments for the tenant form: type/size policy, drag state and
//! the accepted file list.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use thiserror::Error;
use tracing::{debug, info};
use url::Url;

pub const BYTES_PER_MIB: u64 = 1024 * 1024;
pub const DEFAULT_MAX_FILE_SIZE: u64 = 10 * BYTES_PER_MIB;
pub const ALLOWED_EXTENSIONS: [&str; 3] = ["pdf", "csv", "txt"];

/// Why a candidate file was turned away. `Display` is the banner text.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FileRejection {
    #[error("Invalid file type. Only PDF, CSV, and TXT files are allowed.")]
    InvalidType { name: String },

    #[error("File size exceeds {limit_mib}MB limit.")]
    TooLarge { name: String, limit_mib: f64 },
}

impl FileRejection {
    pub fn file_name(&self) -> &str {
        match self {
            FileRejection::InvalidType { name } | FileRejection::TooLarge { name, .. } => name,
        }
    }
}

/// Upload widget configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadPolicy {
    pub max_file_size_bytes: u64,
}

impl UploadPolicy {
    pub fn new(max_file_size_bytes: u64) -> Self {
        Self { max_file_size_bytes }
    }

    pub fn limit_mib(&self) -> f64 {
        self.max_file_size_bytes as f64 / BYTES_PER_MIB as f64
    }
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_FILE_SIZE)
    }
}

/// A candidate attachment. Only the name and size are ever inspected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub name: String,
    pub extension: String,
    pub size_bytes: u64,
    pub path: Option<PathBuf>,
}

impl UploadedFile {
    pub fn new(name: impl Into<String>, size_bytes: u64) -> Self {
        let name = name.into();
        // Everything after the last dot; a dotless name is its own "extension".
        let extension = name.rsplit('.').next().unwrap_or_default().to_string();
        Self {
            name,
            extension,
            size_bytes,
            path: None,
        }
    }

    /// Build a candidate from a file on disk, reading metadata only.
    pub fn from_path(path: &Path) -> Result<Self> {
        let metadata = fs::metadata(path)?;
        if !metadata.is_file() {
            anyhow::bail!("{} is not a regular file", path.display());
        }
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        let mut file = Self::new(name, metadata.len());
        file.path = Some(path.to_path_buf());
        Ok(file)
    }

    pub fn size_kib(&self) -> f64 {
        self.size_bytes as f64 / 1024.0
    }
}

/// Session-unique identity of an accepted file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FileHandle(u64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub handle: FileHandle,
    pub file: UploadedFile,
}

/// Drag lifecycle events delivered to the drop target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragEvent {
    Enter,
    Over,
    Leave,
    Drop(Vec<UploadedFile>),
}

/// Suppression hooks of the host event, so a dropped payload is not also
/// handled by whatever sits behind the drop target.
pub trait DefaultAction {
    fn prevent_default(&mut self);
    fn stop_propagation(&mut self);
}

type UploadListener = Box<dyn FnMut(bool)>;

/// Owns the accepted file set for one mounted form.
pub struct FileIngestionManager {
    policy: UploadPolicy,
    files: Vec<FileEntry>,
    drag_active: bool,
    error: Option<FileRejection>,
    next_handle: u64,
    listener: Option<UploadListener>,
}

impl FileIngestionManager {
    pub fn new(policy: UploadPolicy) -> Self {
        Self {
            policy,
            files: Vec::new(),
            drag_active: false,
            error: None,
            next_handle: 0,
            listener: None,
        }
    }

    /// Register the callback fired with `has_files` after every change to
    /// the file set.
    pub fn on_upload_state_changed(mut self, listener: impl FnMut(bool) + 'static) -> Self {
        self.listener = Some(Box::new(listener));
        self
    }

    pub fn policy(&self) -> UploadPolicy {
        self.policy
    }

    pub fn files(&self) -> &[FileEntry] {
        &self.files
    }

    pub fn has_files(&self) -> bool {
        !self.files.is_empty()
    }

    pub fn drag_active(&self) -> bool {
        self.drag_active
    }

    pub fn error(&self) -> Option<&FileRejection> {
        self.error.as_ref()
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    /// Extension first, then size.
    pub fn validate_file(&self, file: &UploadedFile) -> Result<(), FileRejection> {
        let extension = file.extension.to_lowercase();
        if !ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
            return Err(FileRejection::InvalidType {
                name: file.name.clone(),
            });
        }

        if file.size_bytes > self.policy.max_file_size_bytes {
            return Err(FileRejection::TooLarge {
                name: file.name.clone(),
                limit_mib: self.policy.limit_mib(),
            });
        }

        Ok(())
    }

    /// Validate a batch in order and append the accepted files.
    ///
    /// Only the last rejection of the batch is kept in the error slot. A
    /// batch with no rejections clears it.
    pub fn add_files(&mut self, candidates: Vec<UploadedFile>) -> Vec<FileHandle> {
        if candidates.is_empty() {
            return Vec::new();
        }

        let mut accepted = Vec::new();
        let mut last_rejection = None;

        for file in candidates {
            match self.validate_file(&file) {
                Ok(()) => {
                    let handle = FileHandle(self.next_handle);
                    self.next_handle += 1;
                    info!(name = %file.name, size = file.size_bytes, "attachment accepted");
                    self.files.push(FileEntry { handle, file });
                    accepted.push(handle);
                }
                Err(rejection) => {
                    info!(name = %rejection.file_name(), reason = %rejection, "attachment rejected");
                    last_rejection = Some(rejection);
                }
            }
        }

        self.error = last_rejection;

        if !accepted.is_empty() {
            self.notify();
        }
        accepted
    }

    /// File-picker selection; same policy as a drop.
    pub fn select_files(&mut self, candidates: Vec<UploadedFile>) -> Vec<FileHandle> {
        self.add_files(candidates)
    }

    pub fn remove_file(&mut self, handle: FileHandle) -> Option<UploadedFile> {
        let idx = self.files.iter().position(|entry| entry.handle == handle)?;
        let removed = self.files.remove(idx);
        debug!(name = %removed.file.name, "attachment removed");
        self.notify();
        Some(removed.file)
    }

    pub fn handle_drag(&mut self, event: DragEvent, defaults: &mut impl DefaultAction) {
        defaults.prevent_default();
        defaults.stop_propagation();

        match event {
            DragEvent::Enter | DragEvent::Over => self.drag_active = true,
            DragEvent::Leave => self.drag_active = false,
            DragEvent::Drop(files) => {
                self.drag_active = false;
                self.add_files(files);
            }
        }
    }

    fn notify(&mut self) {
        let has_files = self.has_files();
        if let Some(listener) = self.listener.as_mut() {
            listener(has_files);
        }
    }
}

impl Default for FileIngestionManager {
    fn default() -> Self {
        Self::new(UploadPolicy::default())
    }
}

/// Split pasted/dropped terminal text into paths.
///
/// Terminals emit a drop as text: paths separated by whitespace or newlines,
/// optionally quoted or with backslash-escaped spaces, sometimes as
/// `file://` URIs.
pub fn parse_dropped_paths(text: &str) -> Vec<PathBuf> {
    let mut paths = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;
    let mut in_token = false;
    let mut chars = text.chars();

    while let Some(c) = chars.next() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), c) => current.push(c),
            (None, '\'' | '"') => {
                quote = Some(c);
                in_token = true;
            }
            (None, '\\') => {
                if let Some(escaped) = chars.next() {
                    current.push(escaped);
                    in_token = true;
                }
            }
            (None, c) if c.is_whitespace() => {
                if in_token && !current.is_empty() {
                    paths.push(to_path(&current));
                }
                current.clear();
                in_token = false;
            }
            (None, c) => {
                current.push(c);
                in_token = true;
            }
        }
    }

    if in_token && !current.is_empty() {
        paths.push(to_path(&current));
    }

    paths
}

/// Plain tokens are taken verbatim; only `file://` URIs are percent-decoded.
fn to_path(token: &str) -> PathBuf {
    if !token.starts_with("file://") {
        return PathBuf::from(token);
    }
    match Url::parse(token).map(|url| url.to_file_path()) {
        Ok(Ok(path)) => path,
        _ => {
            debug!(token, "not a local file url; using it verbatim");
            PathBuf::from(token)
        }
    }
}
