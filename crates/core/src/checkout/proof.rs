//! Payment proof files

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    fs, io,
    path::Path,
};

use thiserror::Error;

/// Largest proof file accepted, in bytes.
pub const MAX_PROOF_BYTES: u64 = 5 * 1024 * 1024;

/// Accepted proof image formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProofType {
    /// `image/jpeg`
    Jpeg,

    /// `image/png`
    Png,
}

impl ProofType {
    /// MIME type sent with the upload.
    pub fn mime(self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
        }
    }

    /// Match a declared MIME type.
    pub fn from_mime(mime: &str) -> Option<Self> {
        match mime.trim().to_ascii_lowercase().as_str() {
            "image/jpeg" | "image/jpg" => Some(Self::Jpeg),
            "image/png" => Some(Self::Png),
            _ => None,
        }
    }

    /// Guess from a file name's extension.
    pub fn from_file_name(name: &str) -> Option<Self> {
        let extension = Path::new(name).extension()?.to_str()?.to_ascii_lowercase();

        match extension.as_str() {
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "png" => Some(Self::Png),
            _ => None,
        }
    }
}

/// Reasons a proof file is refused. All of them are raised before upload.
#[derive(Debug, Error)]
pub enum ProofError {
    /// No file was selected.
    #[error("Harap upload bukti pembayaran")]
    Missing,

    /// The file exceeds [`MAX_PROOF_BYTES`].
    #[error("File terlalu besar. Maksimal 5MB")]
    TooLarge {
        /// Actual size in bytes
        size: u64,
    },

    /// The file is not a JPEG or PNG image.
    #[error("Format file harus JPG atau PNG")]
    UnsupportedType(String),

    /// The file could not be read.
    #[error("failed to read proof file")]
    Io(#[from] io::Error),
}

/// A validated proof-of-payment image.
#[derive(Clone, PartialEq, Eq)]
pub struct PaymentProof {
    file_name: String,
    content_type: ProofType,
    bytes: Vec<u8>,
}

impl Debug for PaymentProof {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("PaymentProof")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl PaymentProof {
    /// Validate an in-memory file with its declared MIME type.
    ///
    /// Size is checked before type.
    ///
    /// # Errors
    ///
    /// Returns [`ProofError::TooLarge`] or [`ProofError::UnsupportedType`].
    pub fn new(
        file_name: impl Into<String>,
        mime: &str,
        bytes: Vec<u8>,
    ) -> Result<Self, ProofError> {
        check_size(bytes.len() as u64)?;

        let content_type = ProofType::from_mime(mime)
            .ok_or_else(|| ProofError::UnsupportedType(mime.to_string()))?;

        Ok(Self {
            file_name: file_name.into(),
            content_type,
            bytes,
        })
    }

    /// Validate and read a file from disk, typing it by extension.
    ///
    /// The size is taken from file metadata so oversized files are refused
    /// without being read.
    ///
    /// # Errors
    ///
    /// Returns a [`ProofError`] for oversized, mistyped or unreadable files.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ProofError> {
        let path = path.as_ref();

        check_size(fs::metadata(path)?.len())?;

        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("bukti-pembayaran")
            .to_string();

        let content_type = ProofType::from_file_name(&file_name)
            .ok_or_else(|| ProofError::UnsupportedType(file_name.clone()))?;

        Ok(Self {
            file_name,
            content_type,
            bytes: fs::read(path)?,
        })
    }

    /// Original file name.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Image format.
    pub fn content_type(&self) -> ProofType {
        self.content_type
    }

    /// File contents.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Take the file contents.
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

fn check_size(size: u64) -> Result<(), ProofError> {
    if size > MAX_PROOF_BYTES {
        return Err(ProofError::TooLarge { size });
    }

    Ok(())
}
