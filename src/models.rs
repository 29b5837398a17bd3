//! Data models for the probe suite.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The three probes the suite knows how to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProbeKind {
    /// App-readiness: page loads and reports a title.
    App,
    /// Landing page renders its name input and create button.
    Landing,
    /// Create-meeting flow reaches the room view.
    Room,
}

impl ProbeKind {
    /// Short name used in logs and reports.
    pub fn slug(&self) -> &'static str {
        match self {
            ProbeKind::App => "app",
            ProbeKind::Landing => "landing",
            ProbeKind::Room => "room",
        }
    }

    /// Screenshot artifact filename for this probe.
    pub fn screenshot_file(&self) -> &'static str {
        match self {
            ProbeKind::App => "meeting_app.png",
            ProbeKind::Landing => "landing_page_ui.png",
            ProbeKind::Room => "meeting_room_ui.png",
        }
    }
}

/// Resolved probe endpoints and output location.
#[derive(Debug, Clone)]
pub struct ProbeTargets {
    /// Meeting app URL (app and room probes).
    pub app_url: String,
    /// Landing page URL (separate port, separate process).
    pub landing_url: String,
    /// Directory screenshots are written into.
    pub out_dir: PathBuf,
}

impl Default for ProbeTargets {
    fn default() -> Self {
        Self {
            app_url: "http://localhost:3000".to_string(),
            landing_url: "http://localhost:3001".to_string(),
            out_dir: PathBuf::from("verification"),
        }
    }
}

impl ProbeTargets {
    /// URL a probe navigates to.
    pub fn url_for(&self, probe: ProbeKind) -> &str {
        match probe {
            ProbeKind::App | ProbeKind::Room => &self.app_url,
            ProbeKind::Landing => &self.landing_url,
        }
    }

    /// Screenshot path a probe writes to.
    pub fn screenshot_path(&self, probe: ProbeKind) -> PathBuf {
        self.out_dir.join(probe.screenshot_file())
    }
}

/// Record of one probe run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeReport {
    /// Probe slug ("app", "landing", "room").
    pub probe: String,
    /// URL the probe targeted.
    pub url: String,
    /// Whether every step completed.
    pub ok: bool,
    /// Page title, when the probe read one.
    #[serde(default)]
    pub title: Option<String>,
    /// Path of the captured screenshot, when one was written.
    #[serde(default)]
    pub screenshot: Option<String>,
    /// Error chain text for a failed run.
    #[serde(default)]
    pub error: Option<String>,
    /// When the run finished (RFC 3339).
    pub finished_at: String,
}

impl ProbeReport {
    /// Report for a run whose steps all completed.
    pub fn success(probe: ProbeKind, url: &str, title: Option<String>, screenshot: &Path) -> Self {
        Self {
            probe: probe.slug().to_string(),
            url: url.to_string(),
            ok: true,
            title,
            screenshot: Some(screenshot.display().to_string()),
            error: None,
            finished_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Report for a run that failed partway through.
    pub fn failure(probe: ProbeKind, url: &str, error: &anyhow::Error) -> Self {
        Self {
            probe: probe.slug().to_string(),
            url: url.to_string(),
            ok: false,
            title: None,
            screenshot: None,
            error: Some(format!("{error:#}")),
            finished_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_screenshot_files_match_artifacts() {
        assert_eq!(ProbeKind::App.screenshot_file(), "meeting_app.png");
        assert_eq!(ProbeKind::Landing.screenshot_file(), "landing_page_ui.png");
        assert_eq!(ProbeKind::Room.screenshot_file(), "meeting_room_ui.png");
    }

    #[test]
    fn test_default_targets() {
        let targets = ProbeTargets::default();
        assert_eq!(targets.app_url, "http://localhost:3000");
        assert_eq!(targets.landing_url, "http://localhost:3001");
        assert_eq!(targets.url_for(ProbeKind::App), targets.app_url);
        assert_eq!(targets.url_for(ProbeKind::Room), targets.app_url);
        assert_eq!(targets.url_for(ProbeKind::Landing), targets.landing_url);
    }

    #[test]
    fn test_screenshot_path_joins_out_dir() {
        let targets = ProbeTargets {
            out_dir: PathBuf::from("evidence"),
            ..ProbeTargets::default()
        };
        assert_eq!(
            targets.screenshot_path(ProbeKind::Room),
            PathBuf::from("evidence/meeting_room_ui.png")
        );
    }

    #[test]
    fn test_report_serializes_with_stable_fields() {
        let report = ProbeReport::success(
            ProbeKind::App,
            "http://localhost:3000",
            Some("Meeting App".to_string()),
            Path::new("verification/meeting_app.png"),
        );
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["probe"], "app");
        assert_eq!(json["ok"], true);
        assert_eq!(json["title"], "Meeting App");
        assert_eq!(json["screenshot"], "verification/meeting_app.png");
        assert!(json["error"].is_null());
    }

    #[test]
    fn test_failure_report_carries_error_chain() {
        let err = anyhow::anyhow!("connection refused").context("Navigation failed");
        let report = ProbeReport::failure(ProbeKind::Landing, "http://localhost:3001", &err);
        assert!(!report.ok);
        let text = report.error.unwrap();
        assert!(text.contains("Navigation failed"));
        assert!(text.contains("connection refused"));
    }
}
