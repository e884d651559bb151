// src/infrastructure/renderer.rs
use crate::constants::BROWSER_LAUNCH_DELAY_MS;
use anyhow::{Context, Result};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::{Builder, TempDir};
use tracing::{debug, instrument};

/// Writes rendered pages to a temporary directory and hands them to the system browser
#[derive(Debug, Default)]
pub struct PageRenderer {
    // Dropping the directory deletes the page
    temp_dir: Option<TempDir>,
}

impl PageRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_temp_file(&mut self, file_name: &str, content: &str) -> Result<PathBuf> {
        let temp_dir = Builder::new()
            .prefix("studyaid-")
            .rand_bytes(5)
            .tempdir()
            .context("Failed to create temporary directory")?;

        let file_path = temp_dir.path().join(file_name);

        File::create(&file_path)
            .with_context(|| format!("Failed to create temp file at {}", file_path.display()))?
            .write_all(content.as_bytes())
            .context("Failed to write content to temporary file")?;

        debug!(path = %file_path.display(), bytes = content.len(), "Wrote page");
        self.temp_dir = Some(temp_dir);

        Ok(file_path)
    }

    #[instrument(level = "debug", skip(self))]
    pub fn open_in_browser(&self, path: &Path) -> Result<()> {
        let path_str = path.to_str().context("Failed to convert path to string")?;

        #[cfg(target_os = "macos")]
        {
            std::process::Command::new("open")
                .arg(path_str)
                .spawn()
                .context("Failed to open browser")?;
        }
        #[cfg(target_os = "windows")]
        {
            std::process::Command::new("cmd")
                .args(["/C", "start", path_str])
                .spawn()
                .context("Failed to open browser")?;
        }
        #[cfg(not(any(target_os = "macos", target_os = "windows")))]
        {
            std::process::Command::new("xdg-open")
                .arg(path_str)
                .spawn()
                .context("Failed to open browser")?;
        }

        // The browser reads the file asynchronously
        std::thread::sleep(std::time::Duration::from_millis(BROWSER_LAUNCH_DELAY_MS));

        Ok(())
    }

    /// Write `content` and open it
    pub fn show(&mut self, file_name: &str, content: &str) -> Result<PathBuf> {
        let path = self.create_temp_file(file_name, content)?;
        self.open_in_browser(&path)?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn given_content_when_creating_temp_file_then_file_holds_content() {
        let mut renderer = PageRenderer::new();

        let path = renderer.create_temp_file("notes.html", "<h1>Notes</h1>").unwrap();

        assert!(path.ends_with("notes.html"));
        assert_eq!(fs::read_to_string(&path).unwrap(), "<h1>Notes</h1>");
    }

    #[test]
    fn given_renderer_dropped_when_checking_file_then_it_is_removed() {
        let mut renderer = PageRenderer::new();
        let path = renderer.create_temp_file("page.html", "x").unwrap();

        drop(renderer);

        assert!(!path.exists());
    }
}
