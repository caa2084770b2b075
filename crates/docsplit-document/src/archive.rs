// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Pack a run's output files into one deflated `.zip`.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use docsplit_core::error::{DocsplitError, Result};
use tracing::{info, instrument};
use zip::CompressionMethod;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use crate::materialize::remove_files;

/// Write every file in `files` into `archive_path`, stored under its file
/// name, then delete the loose files.
///
/// The loose files are only removed once the archive has been finished, so a
/// failed packaging leaves them in place. A partially written archive is
/// removed.
#[instrument(skip(files), fields(archive = %archive_path.display(), count = files.len()))]
pub fn package_as_archive(files: &[PathBuf], archive_path: &Path) -> Result<PathBuf> {
    if let Err(err) = write_archive(files, archive_path) {
        remove_files(&[archive_path.to_path_buf()]);
        return Err(err);
    }

    remove_files(files);
    info!("Outputs packaged");
    Ok(archive_path.to_path_buf())
}

fn write_archive(files: &[PathBuf], archive_path: &Path) -> Result<()> {
    let file = File::create(archive_path)?;
    let mut zip = ZipWriter::new(file);
    let options =
        SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for path in files {
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .ok_or_else(|| DocsplitError::Archive(format!("no file name in {}", path.display())))?;
        let data = std::fs::read(path)?;

        zip.start_file(name.as_str(), options)
            .map_err(|err| DocsplitError::Archive(format!("cannot add {name}: {err}")))?;
        zip.write_all(&data)?;
    }

    zip.finish()
        .map_err(|err| DocsplitError::Archive(format!("cannot finish archive: {err}")))?;
    Ok(())
}

/// `<base>_processed.zip` inside `dir`.
pub fn archive_path(dir: &Path, base_name: &str) -> PathBuf {
    dir.join(format!("{base_name}_processed.zip"))
}
