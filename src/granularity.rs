use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::Transcript;

/// How densely the transcription engine splits speech into cues.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum GranularityPreset {
    Low,
    #[default]
    Medium,
    High,
    Ultra,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct GranularityParams {
    /// `None` leaves caption length to the engine.
    pub max_caption_chars: Option<usize>,
    pub split_on_word: bool,
}

const LOW: GranularityParams = GranularityParams {
    max_caption_chars: None,
    split_on_word: false,
};
const MEDIUM: GranularityParams = GranularityParams {
    max_caption_chars: Some(42),
    split_on_word: true,
};
const HIGH: GranularityParams = GranularityParams {
    max_caption_chars: Some(28),
    split_on_word: true,
};
const ULTRA: GranularityParams = GranularityParams {
    max_caption_chars: Some(18),
    split_on_word: true,
};

impl GranularityPreset {
    pub const ALL: [GranularityPreset; 4] = [
        GranularityPreset::Low,
        GranularityPreset::Medium,
        GranularityPreset::High,
        GranularityPreset::Ultra,
    ];

    /// Case-insensitive; anything unrecognised is `Medium`.
    pub fn parse_lenient(s: &str) -> Self {
        match s.trim().to_ascii_uppercase().as_str() {
            "LOW" => GranularityPreset::Low,
            "MEDIUM" => GranularityPreset::Medium,
            "HIGH" => GranularityPreset::High,
            "ULTRA" => GranularityPreset::Ultra,
            _ => GranularityPreset::Medium,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            GranularityPreset::Low => "LOW",
            GranularityPreset::Medium => "MEDIUM",
            GranularityPreset::High => "HIGH",
            GranularityPreset::Ultra => "ULTRA",
        }
    }

    pub fn params(self) -> GranularityParams {
        match self {
            GranularityPreset::Low => LOW,
            GranularityPreset::Medium => MEDIUM,
            GranularityPreset::High => HIGH,
            GranularityPreset::Ultra => ULTRA,
        }
    }

    /// Segmentation flags for the whisper.cpp command line.
    pub fn engine_args(self) -> Vec<String> {
        let params = self.params();
        let mut args = Vec::new();
        if let Some(max) = params.max_caption_chars.filter(|m| *m > 0) {
            args.push("-ml".to_string());
            args.push(max.to_string());
        }
        if params.split_on_word {
            args.push("--split-on-word".to_string());
        }
        args
    }
}

impl fmt::Display for GranularityPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for GranularityPreset {
    fn from(s: String) -> Self {
        GranularityPreset::parse_lenient(&s)
    }
}

impl From<GranularityPreset> for String {
    fn from(p: GranularityPreset) -> Self {
        p.as_str().to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GranularityReport {
    pub preset: GranularityPreset,
    pub max_caption_chars: Option<usize>,
    pub longest_line_chars: usize,
    /// Indices of cues with a line longer than the preset allows.
    pub over_limit: Vec<u32>,
}

impl GranularityReport {
    pub fn is_consistent(&self) -> bool {
        self.over_limit.is_empty()
    }
}

/// Compares cue line lengths against what `preset` asked the engine for.
pub fn check_cues(preset: GranularityPreset, t: &Transcript) -> GranularityReport {
    let max = preset.params().max_caption_chars;
    let mut longest_line_chars = 0;
    let mut over_limit = Vec::new();

    for cue in &t.cues {
        let longest = cue.lines().map(|l| l.chars().count()).max().unwrap_or(0);
        longest_line_chars = longest_line_chars.max(longest);
        if max.is_some_and(|m| longest > m) {
            over_limit.push(cue.index);
        }
    }

    GranularityReport {
        preset,
        max_caption_chars: max,
        longest_line_chars,
        over_limit,
    }
}
