use crate::{
    formats::{karaoke::karaoke_text, time::format_ass_timestamp},
    model::{Cue, Transcript},
};

pub const ASS_HEADER: &str = "\
[Script Info]
ScriptType: v4.00+
WrapStyle: 2
ScaledBorderAndShadow: yes
YCbCr Matrix: TV.601

[V4+ Styles]
Format: Name, Fontname, Fontsize, PrimaryColour, SecondaryColour, OutlineColour, BackColour, Bold, Italic, Underline, StrikeOut, ScaleX, ScaleY, Spacing, Angle, BorderStyle, Outline, Shadow, Alignment, MarginL, MarginR, MarginV, Encoding
Style: Default, Arial, 44, &H00FFFFFF, &H000000FF, &H00101010, &H64000000, 0, 0, 0, 0, 100, 100, 0, 0, 1, 2, 0, 2, 40, 40, 30, 1

[Events]
Format: Layer, Start, End, Style, Name, MarginL, MarginR, MarginV, Effect, Text
";

/// Renders the fixed header followed by one `Dialogue:` line per cue.
/// With `karaoke`, the text carries `\k` tags instead of the plain lines.
pub fn write_ass(t: &Transcript, karaoke: bool) -> String {
    let mut out = String::from(ASS_HEADER);

    for cue in &t.cues {
        out.push_str(&dialogue_line(cue, karaoke));
        out.push('\n');
    }

    out
}

pub fn dialogue_line(cue: &Cue, karaoke: bool) -> String {
    let text = if karaoke {
        karaoke_text(cue)
    } else {
        escape_ass_text(&cue.text)
    };

    format!(
        "Dialogue: 0,{start},{end},Default,,0,0,0,,{text}",
        start = format_ass_timestamp(cue.start_ms),
        end = format_ass_timestamp(cue.end_ms),
    )
}

fn escape_ass_text(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\n', "\\N")
}
