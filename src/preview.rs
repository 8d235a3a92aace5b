use serde::Serialize;

use crate::{formats::time::format_srt_timestamp, model::Transcript};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Preview {
    pub total: usize,
    pub truncated: bool,
    pub items: Vec<PreviewItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewItem {
    pub index: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_ms: Option<u64>,
    pub text: String,
}

/// The first `limit` cues. Timings are left out unless `timed`.
pub fn project(t: &Transcript, limit: usize, timed: bool) -> Preview {
    let items = t
        .cues
        .iter()
        .take(limit)
        .map(|c| PreviewItem {
            index: c.index,
            start_ms: timed.then_some(c.start_ms),
            end_ms: timed.then_some(c.end_ms),
            text: c.text.clone(),
        })
        .collect();

    Preview {
        total: t.len(),
        truncated: t.len() > limit,
        items,
    }
}

impl Preview {
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        for item in &self.items {
            let text = item.text.lines().collect::<Vec<_>>().join(" / ");
            match (item.start_ms, item.end_ms) {
                (Some(start), Some(end)) => out.push_str(&format!(
                    "{:>4}  {} --> {}  {}\n",
                    item.index,
                    format_srt_timestamp(start),
                    format_srt_timestamp(end),
                    text
                )),
                _ => out.push_str(&format!("{:>4}  {}\n", item.index, text)),
            }
        }
        if self.truncated {
            out.push_str(&format!(
                "      ... {} more cue(s)\n",
                self.total - self.items.len()
            ));
        }
        out
    }
}
