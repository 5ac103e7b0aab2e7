use std::io;
use std::path::{Path, PathBuf};

use capture_core::IntakeConfig;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

use crate::error::{StagingError, StagingResult};
use crate::source::SourceHandle;

/// Copies share sources into a private staging directory.
///
/// The stager never deletes a file it has reported as staged. Ownership of a
/// staged file passes to whoever consumes the payload that names it.
#[derive(Debug, Clone)]
pub struct ContentStager {
    staging_dir: PathBuf,
    sync_files: bool,
}

impl ContentStager {
    /// Create a stager, creating the staging directory if needed
    ///
    /// A directory the stager creates is made private to the current user. An
    /// existing directory is used only if it already is: owned by the current
    /// user and inaccessible to anyone else. Its permissions are never changed.
    /// The path is resolved to an absolute one, so staged paths can be handed
    /// to consumers as-is.
    pub async fn new(staging_dir: impl Into<PathBuf>) -> StagingResult<Self> {
        let staging_dir = staging_dir.into();

        match fs::symlink_metadata(&staging_dir).await {
            Ok(_) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                create_private_dir(&staging_dir).await.map_err(|error| {
                    StagingError::DestinationUnwritable {
                        path: staging_dir.clone(),
                        error,
                    }
                })?;
                tracing::debug!(staging_dir = %staging_dir.display(), "Created share staging directory");
            }
            Err(error) => {
                return Err(StagingError::DestinationUnwritable {
                    path: staging_dir,
                    error,
                })
            }
        }

        // Checked after creation too: someone else may have created it first.
        verify_private_dir(&staging_dir)
            .await
            .map_err(|error| StagingError::DestinationUnwritable {
                path: staging_dir.clone(),
                error,
            })?;

        let staging_dir = fs::canonicalize(&staging_dir).await.map_err(|error| {
            StagingError::DestinationUnwritable {
                path: staging_dir.clone(),
                error,
            }
        })?;

        tracing::debug!(staging_dir = %staging_dir.display(), "Share staging directory ready");

        Ok(Self {
            staging_dir,
            sync_files: true,
        })
    }

    pub async fn from_config(config: &IntakeConfig) -> StagingResult<Self> {
        Ok(Self::new(&config.staging_dir)
            .await?
            .with_sync(config.sync_staged_files))
    }

    /// Whether staged files are fsynced before their path is reported
    pub fn with_sync(mut self, sync_files: bool) -> Self {
        self.sync_files = sync_files;
        self
    }

    pub fn staging_dir(&self) -> &Path {
        &self.staging_dir
    }

    /// Copy `source` into a new uniquely named file and return its path.
    ///
    /// The copy is all-or-nothing: on any failure the partially written file is
    /// removed before the error is returned.
    pub async fn stage(
        &self,
        source: Box<dyn SourceHandle>,
        extension: Option<&str>,
    ) -> StagingResult<PathBuf> {
        let id = Uuid::new_v4();
        let final_path = self.staging_dir.join(staged_file_name(id, extension)?);
        let partial_path = self.staging_dir.join(format!(".{}.partial", id));
        let origin = source.describe();
        let start = std::time::Instant::now();

        let mut reader = source
            .open()
            .await
            .map_err(|error| StagingError::SourceUnreadable {
                origin: origin.clone(),
                error,
            })?;

        let mut file = create_private_file(&partial_path).await.map_err(|error| {
            StagingError::DestinationUnwritable {
                path: partial_path.clone(),
                error,
            }
        })?;

        let copy_result = tokio::io::copy(&mut reader, &mut file).await;
        let copied = match copy_result {
            Ok(copied) => copied,
            Err(error) => {
                drop(file);
                discard_partial(&partial_path).await;
                return Err(StagingError::CopyFailed {
                    path: final_path,
                    error,
                });
            }
        };

        if let Err(error) = finish_file(&mut file, self.sync_files).await {
            drop(file);
            discard_partial(&partial_path).await;
            return Err(StagingError::CopyFailed {
                path: final_path,
                error,
            });
        }
        drop(file);

        if let Err(error) = fs::rename(&partial_path, &final_path).await {
            discard_partial(&partial_path).await;
            return Err(StagingError::DestinationUnwritable {
                path: final_path,
                error,
            });
        }

        tracing::info!(
            origin = %origin,
            path = %final_path.display(),
            size_bytes = copied,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Shared content staged"
        );

        Ok(final_path)
    }
}

/// `{uuid}` or `{uuid}.{extension}`; extensions must be plain alphanumerics
fn staged_file_name(id: Uuid, extension: Option<&str>) -> StagingResult<String> {
    match extension {
        None => Ok(id.to_string()),
        Some(ext) if !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()) => {
            Ok(format!("{}.{}", id, ext.to_lowercase()))
        }
        Some(ext) => Err(StagingError::DestinationUnwritable {
            path: PathBuf::from(format!("{}.{}", id, ext)),
            error: io::Error::new(
                io::ErrorKind::InvalidInput,
                "extension must be ASCII alphanumeric",
            ),
        }),
    }
}

async fn create_private_file(path: &Path) -> io::Result<fs::File> {
    let mut options = fs::OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    options.mode(0o600);
    options.open(path).await
}

async fn finish_file(file: &mut fs::File, sync: bool) -> io::Result<()> {
    file.flush().await?;
    if sync {
        file.sync_all().await?;
    }
    Ok(())
}

async fn discard_partial(path: &Path) {
    if let Err(e) = fs::remove_file(path).await {
        if e.kind() != io::ErrorKind::NotFound {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "Failed to remove partially staged file"
            );
        }
    }
}

async fn create_private_dir(dir: &Path) -> io::Result<()> {
    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    builder.mode(0o700);
    builder.create(dir).await
}

#[cfg(unix)]
async fn verify_private_dir(dir: &Path) -> io::Result<()> {
    use std::os::unix::fs::MetadataExt;

    let meta = fs::symlink_metadata(dir).await?;
    if !meta.is_dir() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "staging path is not a directory",
        ));
    }

    // SAFETY: geteuid has no preconditions and cannot fail.
    let uid = unsafe { libc::geteuid() };
    if meta.uid() != uid {
        return Err(io::Error::new(
            io::ErrorKind::PermissionDenied,
            "staging directory is owned by another user",
        ));
    }

    let mode = meta.mode() & 0o777;
    if mode & 0o077 != 0 {
        return Err(io::Error::new(
            io::ErrorKind::PermissionDenied,
            format!("staging directory is accessible to other users (mode {:o})", mode),
        ));
    }

    Ok(())
}

#[cfg(not(unix))]
async fn verify_private_dir(dir: &Path) -> io::Result<()> {
    let meta = fs::symlink_metadata(dir).await?;
    if !meta.is_dir() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "staging path is not a directory",
        ));
    }
    Ok(())
}
