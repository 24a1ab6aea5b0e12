//! Single-line upload progress

use crate::domain::ports::UploadProgress;

/// Tracks the upload progress line so it is only redrawn when its text
/// changes.
#[derive(Debug, Default)]
pub struct UploadLine {
    last: Option<String>,
}

impl UploadLine {
    pub fn new() -> Self {
        Self::default()
    }

    /// `(<peer>) <file>: (<kB> kBytes) <pct>%`
    pub fn format(progress: &UploadProgress) -> String {
        format!(
            "({}) {}: ({} kBytes) {:.2}%",
            progress.peer,
            progress.filename,
            progress.size / 1024,
            progress.percent()
        )
    }

    /// Text to draw for `progress`, or `None` when the line would not change.
    pub fn update(&mut self, progress: &UploadProgress) -> Option<String> {
        let text = Self::format(progress);
        if self.last.as_deref() == Some(text.as_str()) {
            return None;
        }
        self.last = Some(text.clone());
        Some(text)
    }

    /// Forget the last line (after the upload finished)
    pub fn reset(&mut self) {
        self.last = None;
    }

    pub fn is_active(&self) -> bool {
        self.last.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn progress(size: u64, sent: u64) -> UploadProgress {
        UploadProgress {
            peer: "142.93.170.84:22".to_string(),
            filename: "HowardBot-assembly-0.1.jar".to_string(),
            size,
            sent,
        }
    }

    #[test]
    fn formats_like_scp_progress() {
        assert_eq!(
            UploadLine::format(&progress(2048 * 1024, 1024 * 1024)),
            "(142.93.170.84:22) HowardBot-assembly-0.1.jar: (2048 kBytes) 50.00%"
        );
    }

    #[test]
    fn empty_file_is_complete() {
        assert!(UploadLine::format(&progress(0, 0)).ends_with("(0 kBytes) 100.00%"));
    }

    #[test]
    fn unchanged_text_is_not_redrawn() {
        let mut line = UploadLine::new();
        assert!(line.update(&progress(1_000_000, 10)).is_some());
        assert!(line.update(&progress(1_000_000, 11)).is_none());
        assert!(line.update(&progress(1_000_000, 500_000)).is_some());

        line.reset();
        assert!(!line.is_active());
    }
}
