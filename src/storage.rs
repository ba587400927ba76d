use anyhow::{Context, Result};
use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

const STORAGE_DIR: &str = ".issue-ops";
const TOKEN_FILENAME: &str = "token";

/// Where a GitHub token is kept between runs.
pub trait TokenStorage {
    /// `Ok(None)` when no token has been stored.
    fn load(&self) -> Result<Option<String>>;
    fn save(&self, token: &str) -> Result<()>;
    /// Removing a token that was never stored is not an error.
    fn delete(&self) -> Result<()>;
}

/// Token kept in a single file readable only by its owner.
#[derive(Debug, Clone)]
pub struct FileTokenStorage {
    path: PathBuf,
}

impl FileTokenStorage {
    /// Storage at `~/.issue-ops/token`.
    pub fn new() -> Result<Self> {
        Ok(Self::at(default_path()?))
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        FileTokenStorage { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn default_path() -> Result<PathBuf> {
    let home = std::env::var_os("HOME").context("HOME environment variable not set")?;
    Ok(PathBuf::from(home).join(STORAGE_DIR).join(TOKEN_FILENAME))
}

/// Opens `path` for writing, truncated, with `0600` permissions on unix.
fn open_private(path: &Path) -> std::io::Result<File> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    let file = options.open(path)?;
    // `mode` only applies when the file is created.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(fs::Permissions::from_mode(0o600))?;
    }
    Ok(file)
}

impl TokenStorage for FileTokenStorage {
    fn load(&self) -> Result<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(content) => Ok(Some(content.trim().to_string()).filter(|t| !t.is_empty())),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err).context("Failed to read token file"),
        }
    }

    fn save(&self, token: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).context("Failed to create storage directory")?;
        }
        open_private(&self.path)
            .and_then(|mut file| file.write_all(token.trim().as_bytes()))
            .context("Failed to write token file")
    }

    fn delete(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Err(err) if err.kind() != ErrorKind::NotFound => {
                Err(err).context("Failed to delete token file")
            }
            _ => Ok(()),
        }
    }
}
