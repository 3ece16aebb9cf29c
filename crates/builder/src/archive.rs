//! Single-entry zip archives for delivery

use ferry_errors::{BuildError, Error};
use ferry_events::{AppEvent, BuildEvent, EventEmitter, EventSender};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tokio::task;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Compress `artifact` into a zip at `dest`, stored under its base name.
///
/// On failure nothing is left at `dest` and the error is also reported as an
/// event.
///
/// # Errors
///
/// Returns an error if the artifact cannot be read, the compression level is
/// out of range, or the archive cannot be written.
pub async fn create_archive(
    artifact: &Path,
    dest: &Path,
    compression_level: i64,
    tx: &EventSender,
) -> Result<PathBuf, Error> {
    let artifact_owned = artifact.to_path_buf();
    let dest_owned = dest.to_path_buf();

    let result = task::spawn_blocking(move || {
        write_archive(&artifact_owned, &dest_owned, compression_level)
    })
    .await
    .unwrap_or_else(|e| Err(Error::internal(format!("archive task failed: {e}"))));

    match result {
        Ok(size) => {
            tx.emit(AppEvent::Build(BuildEvent::ArchiveCreated {
                path: dest.to_path_buf(),
                size,
            }));
            Ok(dest.to_path_buf())
        }
        Err(e) => {
            tx.emit(AppEvent::Build(BuildEvent::ArchiveFailed {
                path: artifact.to_path_buf(),
                error: e.to_string(),
            }));
            Err(e)
        }
    }
}

fn write_archive(artifact: &Path, dest: &Path, compression_level: i64) -> Result<u64, Error> {
    let result = write_entry(artifact, dest, compression_level);
    if result.is_err() {
        // drop any partial zip
        let _ = std::fs::remove_file(dest);
    }
    result
}

fn write_entry(artifact: &Path, dest: &Path, compression_level: i64) -> Result<u64, Error> {
    let entry_name = artifact
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| archive_error(artifact, "artifact has no file name"))?;

    let mut input =
        BufReader::new(File::open(artifact).map_err(|e| Error::io_with_path(&e, artifact))?);
    let output = File::create(dest).map_err(|e| Error::io_with_path(&e, dest))?;

    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Zstd)
        .compression_level(Some(compression_level))
        .large_file(true)
        .unix_permissions(0o755);

    let mut writer = ZipWriter::new(BufWriter::new(output));
    writer
        .start_file(entry_name, options)
        .map_err(|e| archive_error(artifact, e))?;
    std::io::copy(&mut input, &mut writer).map_err(|e| Error::io_with_path(&e, dest))?;
    let mut output = writer.finish().map_err(|e| archive_error(artifact, e))?;
    output.flush().map_err(|e| Error::io_with_path(&e, dest))?;

    let size = std::fs::metadata(dest)
        .map_err(|e| Error::io_with_path(&e, dest))?
        .len();
    Ok(size)
}

fn archive_error(path: &Path, message: impl ToString) -> Error {
    BuildError::ArchiveFailed {
        path: path.display().to_string(),
        message: message.to_string(),
    }
    .into()
}
