//! Writing rendered documents and encrypting them with sops

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::{EngineError, Result};
use crate::layout::encrypted_path;
use crate::renderer::RenderedDocument;

/// Encrypts a file in place
///
/// Implemented by [`SopsEncryptor`] and by any `Fn(&Path) -> Result<()>`.
pub trait Encryptor {
    fn encrypt_in_place(&self, path: &Path) -> Result<()>;
}

impl<F> Encryptor for F
where
    F: Fn(&Path) -> Result<()>,
{
    fn encrypt_in_place(&self, path: &Path) -> Result<()> {
        self(path)
    }
}

/// Runs `<program> --encrypt --in-place <path>`
#[derive(Debug, Clone)]
pub struct SopsEncryptor {
    program: PathBuf,
}

impl Default for SopsEncryptor {
    fn default() -> Self {
        Self::new(Self::DEFAULT_PROGRAM)
    }
}

impl SopsEncryptor {
    pub const DEFAULT_PROGRAM: &'static str = "sops";

    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }
}

impl Encryptor for SopsEncryptor {
    fn encrypt_in_place(&self, path: &Path) -> Result<()> {
        let program = self.program.display();
        tracing::debug!(%program, path = %path.display(), "encrypting");

        let output = Command::new(&self.program)
            .arg("--encrypt")
            .arg("--in-place")
            .arg(path)
            .output()
            .map_err(|e| EngineError::ExternalTool {
                path: path.to_path_buf(),
                message: if e.kind() == ErrorKind::NotFound {
                    format!("`{program}` not found, is sops installed?")
                } else {
                    format!("failed to run `{program}`: {e}")
                },
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(EngineError::ExternalTool {
                path: path.to_path_buf(),
                message: format!("`{program}` {}: {}", output.status, stderr.trim()),
            });
        }

        Ok(())
    }
}

/// Destination of rendered documents
pub trait DocumentWriter {
    /// Persist `document` for `target`, returning the final path if a file was written
    fn write(&self, document: &RenderedDocument, target: &Path) -> Result<Option<PathBuf>>;
}

/// Writes the plaintext target, encrypts it in place, then renames it to `.enc.yaml`
///
/// The plaintext file is removed when encryption fails.
#[derive(Debug, Clone, Default)]
pub struct EncryptingWriter<E> {
    encryptor: E,
}

impl<E: Encryptor> EncryptingWriter<E> {
    pub fn new(encryptor: E) -> Self {
        Self { encryptor }
    }
}

impl<E: Encryptor> DocumentWriter for EncryptingWriter<E> {
    fn write(&self, document: &RenderedDocument, target: &Path) -> Result<Option<PathBuf>> {
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(|e| EngineError::io(parent, e))?;
        }

        let yaml = document.to_yaml()?;
        fs::write(target, yaml).map_err(|e| EngineError::io(target, e))?;

        if let Err(err) = self.encryptor.encrypt_in_place(target) {
            fs::remove_file(target).ok();
            return Err(err);
        }

        let encrypted = encrypted_path(target);
        fs::rename(target, &encrypted).map_err(|e| EngineError::io(&encrypted, e))?;
        Ok(Some(encrypted))
    }
}

/// Renders without persisting anything
#[derive(Debug, Clone, Copy, Default)]
pub struct DiscardWriter;

impl DocumentWriter for DiscardWriter {
    fn write(&self, document: &RenderedDocument, _target: &Path) -> Result<Option<PathBuf>> {
        document.to_yaml()?;
        Ok(None)
    }
}
