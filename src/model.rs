use crate::cli::Format;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transcript {
    pub cues: Vec<Cue>,
}

impl Transcript {
    pub fn new(cues: Vec<Cue>) -> Self {
        Self { cues }
    }

    pub fn len(&self) -> usize {
        self.cues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cues.is_empty()
    }

    pub fn duration_ms(&self) -> u64 {
        self.cues.iter().map(|c| c.end_ms).max().unwrap_or(0)
    }
}

/// One timed caption. `end_ms >= start_ms` holds for every cue the parser emits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cue {
    pub index: u32,
    pub start_ms: u64,
    pub end_ms: u64,
    pub text: String,
}

impl Cue {
    pub fn new(index: u32, start_ms: u64, end_ms: u64, text: impl Into<String>) -> Self {
        Self {
            index,
            start_ms,
            end_ms,
            text: text.into(),
        }
    }

    pub fn duration_ms(&self) -> u64 {
        self.end_ms.saturating_sub(self.start_ms)
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.text.lines()
    }
}

/// A word with its share of a cue's display time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KaraokeWord {
    pub word: String,
    pub duration_cs: u64,
}

/// What a serializer consumes: cues plus the chosen output shape.
#[derive(Debug, Clone, Copy)]
pub struct SubtitleDocument<'a> {
    pub transcript: &'a Transcript,
    pub format: Format,
    pub karaoke: bool,
}

impl<'a> SubtitleDocument<'a> {
    pub fn new(transcript: &'a Transcript, format: Format, karaoke: bool) -> Self {
        Self {
            transcript,
            format,
            karaoke,
        }
    }
}
