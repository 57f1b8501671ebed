//! Writes rendered attachments to the attachments directory so they can be
//! served later by filename.

use std::fs::{self, File, OpenOptions};
use std::io::{self, ErrorKind, Write};
use std::path::Path;

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::{PreviewError, Result};
use crate::mail::Attachment;
use crate::metrics::AttachmentMetrics;

lazy_static! {
    static ref UNSAFE_FILENAME_CHARS: Regex = Regex::new(r"[^A-Za-z0-9_.]").unwrap();
}

/// Replace every character other than ASCII alphanumerics, `_` and `.` with `_`
pub fn sanitize_filename(filename: &str) -> String {
    UNSAFE_FILENAME_CHARS.replace_all(filename, "_").into_owned()
}

/// Write each attachment to `dir/<sanitized filename>` unless that file exists.
///
/// The first attachment to claim a sanitized name wins; later ones with the
/// same name are dropped even if their bytes differ. Creation is exclusive, so
/// concurrent calls never overwrite each other. A failed write removes the
/// partial file so a later call can retry it.
pub fn materialize(attachments: &[Attachment], dir: &Path) -> Result<()> {
    materialize_with(attachments, dir, |file, body| file.write_all(body))
}

fn materialize_with<W>(attachments: &[Attachment], dir: &Path, write: W) -> Result<()>
where
    W: Fn(&mut File, &[u8]) -> io::Result<()>,
{
    if attachments.is_empty() {
        return Ok(());
    }

    fs::create_dir_all(dir).map_err(|e| PreviewError::io(dir, e))?;

    for attachment in attachments {
        let filename = sanitize_filename(attachment.filename());
        if filename.is_empty() || filename == "." || filename == ".." {
            tracing::warn!(
                original = %attachment.filename(),
                "Skipping attachment with unusable filename"
            );
            AttachmentMetrics::record_skipped();
            continue;
        }

        let path = dir.join(&filename);
        let mut file = match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                tracing::debug!(path = %path.display(), "Attachment already materialized");
                AttachmentMetrics::record_skipped();
                continue;
            }
            Err(e) => return Err(PreviewError::io(&path, e)),
        };

        if let Err(e) = write(&mut file, attachment.raw_body()) {
            drop(file);
            if let Err(cleanup) = fs::remove_file(&path) {
                tracing::error!(
                    path = %path.display(),
                    error = %cleanup,
                    "Failed to remove partially written attachment"
                );
            }
            return Err(PreviewError::io(&path, e));
        }

        tracing::debug!(
            path = %path.display(),
            bytes = attachment.raw_body().len(),
            "Attachment written"
        );
        AttachmentMetrics::record_written(attachment.raw_body().len());
    }

    Ok(())
}
