//! Headless Chromium PDF engine.

use std::{
    env, io,
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use tokio::{fs, process::Command};
use tracing::debug;
use url::Url;

use crate::render::{RenderError, engine::PdfEngine};

/// Prints HTML to PDF with `chromium --headless --print-to-pdf`.
#[derive(Debug, Clone)]
pub struct ChromiumEngine {
    binary: PathBuf,
}

impl ChromiumEngine {
    #[must_use]
    pub fn new(binary: PathBuf) -> Self {
        Self { binary }
    }
}

/// Resolve `binary` the way a shell would: paths are checked as given, bare names are
/// searched for on `PATH`.
pub(crate) fn locate(binary: &Path) -> Option<PathBuf> {
    if binary.components().count() > 1 {
        return binary.is_file().then(|| binary.to_path_buf());
    }

    let paths = env::var_os("PATH")?;

    env::split_paths(&paths)
        .map(|dir| dir.join(binary))
        .find(|candidate| candidate.is_file())
}

#[async_trait]
impl PdfEngine for ChromiumEngine {
    async fn render(&self, html: &str) -> Result<Vec<u8>, RenderError> {
        let workdir = tempfile::tempdir()?;
        let input = workdir.path().join("document.html");
        let output = workdir.path().join("document.pdf");

        fs::write(&input, html).await?;

        let page = Url::from_file_path(&input).map_err(|()| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{} is not an absolute path", input.display()),
            )
        })?;

        debug!(binary = %self.binary.display(), "printing document with chromium");

        let result = Command::new(&self.binary)
            .arg("--headless")
            .arg("--disable-gpu")
            .arg("--no-sandbox")
            .arg("--no-pdf-header-footer")
            .arg(format!("--print-to-pdf={}", output.display()))
            .arg(page.as_str())
            .kill_on_drop(true)
            .output()
            .await?;

        if !result.status.success() {
            return Err(RenderError::Chromium {
                status: result.status.to_string(),
                stderr: String::from_utf8_lossy(&result.stderr).trim().to_string(),
            });
        }

        Ok(fs::read(&output).await?)
    }

    fn name(&self) -> &'static str {
        "chromium"
    }
}
