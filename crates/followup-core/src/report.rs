//! Markdown rendering of a scan report.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use crate::action::Priority;
use crate::followup::Delivery;
use crate::scan::ScanReport;

impl ScanReport {
    /// Human-readable run summary.
    ///
    /// Documents are listed high priority first, then each scheduled
    /// follow-up with its slot and delivery result.
    pub fn to_markdown(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "# Follow-up Summary - {}\n",
            self.started_at.format("%Y-%m-%d")
        );
        let _ = writeln!(out, "## New Documents Processed: {}\n", self.documents.len());

        let mut docs: Vec<_> = self.documents.iter().collect();
        docs.sort_by_key(|d| priority_rank(d.priority));
        for doc in docs {
            let _ = writeln!(out, "### {}", doc.name);
            let _ = writeln!(out, "- **Priority:** {}", doc.priority.as_str().to_uppercase());
            let _ = writeln!(out, "- **Summary:** {}", doc.summary);
            let _ = writeln!(out, "- **Action Items:** {}", doc.action_items.len());
            let _ = writeln!(out, "- **Follow-ups:** {}\n", doc.follow_ups.len());

            if !doc.action_items.is_empty() {
                out.push_str("**Action Items:**\n");
                for item in &doc.action_items {
                    let _ = writeln!(out, "- {item}");
                }
                out.push('\n');
            }
            if !doc.follow_ups.is_empty() {
                out.push_str("**Follow-ups:**\n");
                for item in &doc.follow_ups {
                    let _ = writeln!(out, "- {item}");
                }
                out.push('\n');
            }
        }

        let _ = writeln!(out, "## Total Action Items Created: {}\n", self.action_item_count());
        out.push_str("### High Priority Items:\n");
        for outcome in self
            .outcomes
            .iter()
            .filter(|o| o.plan.item.priority == Priority::High)
        {
            let item = &outcome.plan.item;
            let _ = writeln!(out, "- {} (from {})", item.description, item.source_document);
        }

        if !self.outcomes.is_empty() {
            out.push_str("\n## Scheduled Follow-ups\n");
            for outcome in &self.outcomes {
                let proposal = &outcome.plan.proposal;
                let status = match &outcome.delivery {
                    Delivery::Created { event_id } => format!("created `{event_id}`"),
                    Delivery::Failed { reason } => format!("FAILED: {reason}"),
                };
                let _ = writeln!(
                    out,
                    "- {} - {} to {} ({status})",
                    proposal.title,
                    proposal.start_time.format("%a %Y-%m-%d %H:%M"),
                    proposal.end_time.format("%H:%M"),
                );
            }
        }

        if !self.skipped.is_empty() || !self.failed.is_empty() {
            out.push_str("\n## Not Analyzed\n");
            for note in self.skipped.iter().chain(&self.failed) {
                let _ = writeln!(out, "- {}: {}", note.name, note.reason);
            }
        }

        out
    }

    /// Write `summary_YYYYMMDD.md` into `dir`, creating it if needed.
    pub fn write_to(&self, dir: &Path) -> std::io::Result<PathBuf> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(format!("summary_{}.md", self.started_at.format("%Y%m%d")));
        std::fs::write(&path, self.to_markdown())?;
        Ok(path)
    }
}

fn priority_rank(priority: Priority) -> u8 {
    match priority {
        Priority::High => 0,
        Priority::Medium => 1,
        Priority::Low => 2,
    }
}
