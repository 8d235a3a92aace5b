pub mod ass;
pub mod karaoke;
pub mod srt;
pub mod time;

use crate::{cli::Format, model::SubtitleDocument};

pub fn render(doc: &SubtitleDocument<'_>) -> String {
    match doc.format {
        Format::Srt => srt::write_srt(doc.transcript),
        Format::Ass => ass::write_ass(doc.transcript, doc.karaoke),
    }
}
