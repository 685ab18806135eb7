//! Company logo upload rule.
//!
//! Checked locally before a logo is attached to a draft. A rejected file is
//! never transmitted.

use crate::project::LogoUpload;

/// Default logo size ceiling: 5 MiB.
pub const DEFAULT_LOGO_MAX_BYTES: u64 = 5 * 1024 * 1024;

/// Default accepted MIME types.
pub const DEFAULT_LOGO_TYPES: &[&str] = &["image/jpeg", "image/jpg", "image/png"];

pub const MSG_LOGO_TYPE: &str = "Please upload only JPG, JPEG, or PNG files";
/// Size message at the default ceiling.
pub const MSG_LOGO_SIZE: &str = "File size should be less than 5MB";

/// Why a logo was refused.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LogoRejection {
    #[error("Please upload only JPG, JPEG, or PNG files")]
    UnsupportedType { declared: String },

    #[error("File size should be less than {}", size_limit_label(.max))]
    TooLarge { len: u64, max: u64 },
}

/// Render a byte ceiling in the largest whole unit that divides it.
fn size_limit_label(bytes: &u64) -> String {
    const KIB: u64 = 1024;
    const MIB: u64 = 1024 * KIB;
    match *bytes {
        0 => "0 bytes".to_string(),
        b if b % MIB == 0 => format!("{}MB", b / MIB),
        b if b % KIB == 0 => format!("{}KB", b / KIB),
        b => format!("{b} bytes"),
    }
}

/// Allow-list and size ceiling for logo files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogoPolicy {
    pub allowed_types: Vec<String>,
    pub max_bytes: u64,
}

impl Default for LogoPolicy {
    fn default() -> Self {
        Self {
            allowed_types: DEFAULT_LOGO_TYPES.iter().map(|t| t.to_string()).collect(),
            max_bytes: DEFAULT_LOGO_MAX_BYTES,
        }
    }
}

impl LogoPolicy {
    pub fn with_max_bytes(max_bytes: u64) -> Self {
        Self {
            max_bytes,
            ..Self::default()
        }
    }

    /// Check a file by its declared MIME type and length.
    ///
    /// The type is matched exactly against the allow-list. A file of exactly
    /// `max_bytes` is accepted.
    pub fn check(&self, declared_mime: &str, byte_len: u64) -> Result<(), LogoRejection> {
        if !self.allowed_types.iter().any(|t| t == declared_mime) {
            return Err(LogoRejection::UnsupportedType {
                declared: declared_mime.to_string(),
            });
        }
        if byte_len > self.max_bytes {
            return Err(LogoRejection::TooLarge {
                len: byte_len,
                max: self.max_bytes,
            });
        }
        Ok(())
    }

    /// Check `upload` and hand it back if it passes.
    pub fn admit(&self, upload: LogoUpload) -> Result<LogoUpload, LogoRejection> {
        self.check(&upload.mime_type, upload.bytes.len() as u64)?;
        Ok(upload)
    }
}
