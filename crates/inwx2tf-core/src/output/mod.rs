// # Output Directory
//
// Owns the directory the generated `.tf` files are written to.
//
// ## Layout
//
// ```text
// output/
// ├── contacts.tf      # inwx_domain_contact resources
// ├── example.com.tf   # inwx_domain + inwx_nameserver_record resources
// ├── example.org.tf
// └── import.tf        # every import block, contacts first
// ```
//
// ## Writes
//
// - Files written by the previous run are removed once per run, before
//   anything is written; every other file in the directory is left alone
// - The names of written files are kept in a hidden manifest, which is what
//   the next reset removes
// - Every file is written to a temporary sibling and renamed into place, so a
//   failed run never leaves a half-written file behind

use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::Error;

/// File holding contact resources
pub const CONTACTS_FILE: &str = "contacts.tf";

/// File holding all import blocks
pub const IMPORT_FILE: &str = "import.tf";

/// Hidden file listing the files written into the directory, one per line
pub const MANIFEST_FILE: &str = ".inwx2tf-manifest";

/// Directory the export is written to
#[derive(Debug, Clone)]
pub struct OutputDir {
    path: PathBuf,
}

impl OutputDir {
    /// Create a handle; nothing is touched on disk until [`reset`](Self::reset)
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The directory path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the directory if needed and remove the files of the previous run
    ///
    /// Only files named in the manifest are removed. A directory without a
    /// manifest keeps all of its files; generated files are overwritten later.
    pub async fn reset(&self) -> Result<(), Error> {
        fs::create_dir_all(&self.path).await.map_err(|e| {
            Error::output(format!(
                "Failed to create output directory {}: {}",
                self.path.display(),
                e
            ))
        })?;

        let previous = self.read_manifest().await?;
        for file_name in &previous {
            if !is_generated_file_name(file_name) {
                tracing::warn!("Ignoring manifest entry {:?}", file_name);
                continue;
            }
            self.remove(file_name).await?;
        }
        self.remove(MANIFEST_FILE).await?;

        tracing::debug!(
            "Reset output directory {} ({} stale file(s))",
            self.path.display(),
            previous.len()
        );
        Ok(())
    }

    /// Write `contents` to `file_name` inside the directory atomically
    ///
    /// The name is added to the manifest once the file is in place.
    ///
    /// # Returns
    ///
    /// The path of the written file
    pub async fn write(&self, file_name: &str, contents: &str) -> Result<PathBuf, Error> {
        validate_file_name(file_name)?;

        let path = self.write_atomic(file_name, contents).await?;
        self.record(file_name).await?;

        tracing::debug!("Wrote {} ({} bytes)", path.display(), contents.len());
        Ok(path)
    }

    async fn write_atomic(&self, file_name: &str, contents: &str) -> Result<PathBuf, Error> {
        let path = self.path.join(file_name);
        let temp_path = self.path.join(format!(".{file_name}.tmp"));

        {
            let mut file = fs::File::create(&temp_path).await.map_err(|e| {
                Error::output(format!(
                    "Failed to create temporary file {}: {}",
                    temp_path.display(),
                    e
                ))
            })?;

            file.write_all(contents.as_bytes()).await.map_err(|e| {
                Error::output(format!(
                    "Failed to write temporary file {}: {}",
                    temp_path.display(),
                    e
                ))
            })?;

            file.sync_all().await.map_err(|e| {
                Error::output(format!(
                    "Failed to sync temporary file {}: {}",
                    temp_path.display(),
                    e
                ))
            })?;
        }

        fs::rename(&temp_path, &path).await.map_err(|e| {
            Error::output(format!(
                "Failed to move {} into place: {}",
                path.display(),
                e
            ))
        })?;

        Ok(path)
    }

    async fn read_manifest(&self) -> Result<Vec<String>, Error> {
        let path = self.path.join(MANIFEST_FILE);
        match fs::read_to_string(&path).await {
            Ok(contents) => Ok(contents
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(str::to_string)
                .collect()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(Error::output(format!(
                "Failed to read manifest {}: {}",
                path.display(),
                e
            ))),
        }
    }

    async fn record(&self, file_name: &str) -> Result<(), Error> {
        let mut names = self.read_manifest().await?;
        if names.iter().any(|name| name == file_name) {
            return Ok(());
        }
        names.push(file_name.to_string());

        let mut contents = names.join("\n");
        contents.push('\n');
        self.write_atomic(MANIFEST_FILE, &contents).await?;
        Ok(())
    }

    async fn remove(&self, file_name: &str) -> Result<(), Error> {
        let path = self.path.join(file_name);
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Error::output(format!(
                "Failed to remove {}: {}",
                path.display(),
                e
            ))),
        }
    }
}

/// File name of a domain's resource file
pub fn domain_file_name(domain: &str) -> String {
    format!("{domain}.tf")
}

fn validate_file_name(file_name: &str) -> Result<(), Error> {
    if file_name.is_empty()
        || file_name.starts_with('.')
        || file_name.contains('/')
        || file_name.contains('\\')
    {
        return Err(Error::output(format!("Refusing to write file named {file_name:?}")));
    }
    Ok(())
}

fn is_generated_file_name(file_name: &str) -> bool {
    validate_file_name(file_name).is_ok() && file_name.ends_with(".tf")
}
