use anyhow::{bail, Result};
use std::path::{Path, PathBuf};

/// Locate Chrome: an explicit path wins, then well-known install
/// locations, then `PATH`.
pub fn find_chrome_binary(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        if path.exists() {
            return Ok(path.to_path_buf());
        }
        bail!("Chrome binary not found at {}", path.display());
    }

    let candidates = chrome_candidates();
    for candidate in &candidates {
        let path = PathBuf::from(candidate);
        if path.exists() {
            tracing::info!("Found Chrome at: {}", path.display());
            return Ok(path);
        }
    }

    for name in &[
        "google-chrome",
        "google-chrome-stable",
        "chromium-browser",
        "chromium",
    ] {
        if let Ok(path) = which::which(name) {
            tracing::info!("Found Chrome in PATH: {}", path.display());
            return Ok(path);
        }
    }

    bail!(
        "Could not find Chrome or Chromium. Searched:\n{}",
        candidates.join("\n")
    )
}

fn chrome_candidates() -> Vec<String> {
    let mut candidates = Vec::new();

    #[cfg(target_os = "macos")]
    {
        candidates.extend([
            "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome".into(),
            "/Applications/Chromium.app/Contents/MacOS/Chromium".into(),
        ]);
    }

    #[cfg(target_os = "linux")]
    {
        candidates.extend([
            "/usr/bin/google-chrome".into(),
            "/usr/bin/google-chrome-stable".into(),
            "/usr/bin/chromium-browser".into(),
            "/usr/bin/chromium".into(),
            "/snap/bin/chromium".into(),
        ]);
    }

    #[cfg(target_os = "windows")]
    {
        for var in ["PROGRAMFILES", "PROGRAMFILES(X86)", "LOCALAPPDATA"] {
            if let Ok(dir) = std::env::var(var) {
                candidates.push(format!("{}\\Google\\Chrome\\Application\\chrome.exe", dir));
            }
        }
    }

    candidates
}

/// Flags for a quiet, deterministic test browser. Headless mode, profile
/// directory and window size are set through the chromiumoxide builder.
pub fn default_chrome_args(no_sandbox: bool) -> Vec<String> {
    let mut args: Vec<String> = vec![
        "--no-first-run".into(),
        "--no-default-browser-check".into(),
        "--disable-background-networking".into(),
        "--disable-client-side-phishing-detection".into(),
        "--disable-default-apps".into(),
        "--disable-extensions".into(),
        "--disable-hang-monitor".into(),
        "--disable-popup-blocking".into(),
        "--disable-prompt-on-repost".into(),
        "--disable-sync".into(),
        "--disable-translate".into(),
        "--metrics-recording-only".into(),
        "--safebrowsing-disable-auto-update".into(),
    ];

    // Containers without user namespaces cannot start the sandbox.
    if no_sandbox {
        args.push("--no-sandbox".into());
    }

    args
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sandbox_flag_only_when_requested() {
        assert!(!default_chrome_args(false).iter().any(|a| a == "--no-sandbox"));
        assert!(default_chrome_args(true).iter().any(|a| a == "--no-sandbox"));
    }

    #[test]
    fn test_args_leave_headless_to_builder() {
        assert!(!default_chrome_args(true).iter().any(|a| a.starts_with("--headless")));
    }

    #[test]
    fn test_explicit_missing_binary_is_error() {
        let err = find_chrome_binary(Some(Path::new("/nonexistent/chrome"))).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/chrome"));
    }
}
