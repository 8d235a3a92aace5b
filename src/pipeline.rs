use anyhow::{Context, Result, anyhow};
use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};
use tempfile::NamedTempFile;

use crate::{
    cli::{ConvertCmd, Format, PreviewCmd},
    config::Config,
    formats,
    granularity::{self, GranularityPreset, GranularityReport},
    model::{SubtitleDocument, Transcript},
    naming::sanitize_base_name,
    preview::{self, Preview},
};

/// Per-run settings after merging CLI flags over config.
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    pub format: Format,
    pub karaoke: bool,
    pub granularity: GranularityPreset,
    pub overwrite: bool,
    pub preview_limit: usize,
    pub preview_timed: bool,
    pub debug_cue_samples: usize,
}

impl ConvertOptions {
    pub fn resolve(cmd: &ConvertCmd, cfg: &Config) -> Self {
        let format = cmd.to.unwrap_or(cfg.output.format);
        let karaoke = cmd.karaoke || cfg.output.karaoke;
        if karaoke && format != Format::Ass {
            tracing::warn!(?format, "karaoke timing only applies to ASS output; ignoring");
        }

        Self {
            format,
            karaoke: karaoke && format == Format::Ass,
            granularity: cmd.granularity.unwrap_or(cfg.transcription.granularity),
            overwrite: cmd.overwrite || cfg.output.overwrite,
            preview_limit: cfg.preview.limit,
            preview_timed: cfg.preview.timed,
            debug_cue_samples: cfg.logging.debug_cue_samples,
        }
    }
}

#[derive(Debug)]
pub struct Conversion {
    pub transcript: Transcript,
    pub rendered: String,
    pub report: GranularityReport,
}

#[derive(Debug)]
pub struct ConvertOutcome {
    /// `None` when written to stdout.
    pub output: Option<PathBuf>,
    pub cues: usize,
    pub preview: Preview,
}

pub fn run_convert(cmd: ConvertCmd, cfg: &Config) -> Result<()> {
    validate_convert_cmd(&cmd)?;
    let opts = ConvertOptions::resolve(&cmd, cfg);
    tracing::info!(
        inputs = cmd.inputs.len(),
        format = ?opts.format,
        karaoke = opts.karaoke,
        granularity = %opts.granularity,
        "starting conversion"
    );

    let mut failed = 0usize;
    for input in &cmd.inputs {
        match convert_one(input, &cmd, &opts) {
            Ok(outcome) => {
                tracing::info!(
                    input = input.as_str(),
                    output = ?outcome.output,
                    cues = outcome.cues,
                    "converted"
                );
                if !cmd.stdout && !cmd.no_preview {
                    print_preview(&outcome.preview, cmd.json)?;
                }
            }
            Err(e) => {
                failed += 1;
                tracing::error!(input = input.as_str(), error = ?e, "conversion failed");
            }
        }
    }

    if failed > 0 {
        return Err(anyhow!(
            "{failed} of {} conversion(s) failed",
            cmd.inputs.len()
        ));
    }
    Ok(())
}

fn validate_convert_cmd(cmd: &ConvertCmd) -> Result<()> {
    if cmd.inputs.len() > 1 && cmd.output.is_some() {
        return Err(anyhow!("--output can only be used with a single input"));
    }
    if cmd.inputs.len() > 1 && cmd.name.is_some() {
        return Err(anyhow!("--name can only be used with a single input"));
    }
    if cmd.inputs.iter().filter(|i| i.as_str() == "-").count() > 1 {
        return Err(anyhow!("stdin ('-') can only be read once"));
    }
    Ok(())
}

pub fn convert_one(input: &str, cmd: &ConvertCmd, opts: &ConvertOptions) -> Result<ConvertOutcome> {
    let span = tracing::info_span!("convert", input, to = ?opts.format);
    let _g = span.enter();

    let out_path = if cmd.stdout {
        None
    } else {
        Some(resolve_output_path(input, cmd, opts.format)?)
    };

    let raw = read_input_to_string(input)
        .with_context(|| format!("failed reading transcript: {input}"))?;
    tracing::info!(bytes = raw.len(), "read input");

    let conversion = convert_text(&raw, opts);
    let preview = preview::project(&conversion.transcript, opts.preview_limit, opts.preview_timed);

    match &out_path {
        None => {
            print!("{}", conversion.rendered);
            tracing::info!(mode = "stdout", "wrote output");
        }
        Some(path) => {
            write_atomic(path, &conversion.rendered, opts.overwrite)?;
            tracing::info!(path = %path.display(), "wrote output file");
        }
    }

    Ok(ConvertOutcome {
        output: out_path,
        cues: conversion.transcript.len(),
        preview,
    })
}

/// Parses, checks and renders one transcript. Never fails: bad blocks are dropped.
pub fn convert_text(raw: &str, opts: &ConvertOptions) -> Conversion {
    let transcript = formats::srt::parse_srt(raw);
    log_transcript_summary(&transcript, opts.debug_cue_samples);

    let report = granularity::check_cues(opts.granularity, &transcript);
    if !report.is_consistent() {
        tracing::warn!(
            preset = %report.preset,
            max_chars = report.max_caption_chars,
            longest = report.longest_line_chars,
            cues = report.over_limit.len(),
            "cues longer than the granularity preset allows"
        );
    }

    let doc = SubtitleDocument::new(&transcript, opts.format, opts.karaoke);
    let rendered = formats::render(&doc);

    Conversion {
        transcript,
        rendered,
        report,
    }
}

pub fn resolve_output_path(input: &str, cmd: &ConvertCmd, format: Format) -> Result<PathBuf> {
    if let Some(o) = &cmd.output {
        return Ok(o.clone());
    }

    let base = match &cmd.name {
        Some(name) => name.clone(),
        None if input == "-" => {
            return Err(anyhow!(
                "output path required when input is stdin and --stdout is not set"
            ));
        }
        None => Path::new(input)
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| anyhow!("bad input filename: {input}"))?
            .to_string(),
    };

    let base = sanitize_base_name(&base);
    if base.is_empty() {
        return Err(anyhow!("output name is empty after sanitizing"));
    }

    let dir = match &cmd.output_dir {
        Some(d) => d.clone(),
        None if input == "-" => PathBuf::from("."),
        None => Path::new(input)
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."))
            .to_path_buf(),
    };

    Ok(dir.join(format!("{base}.{}", format.extension())))
}

fn read_input_to_string(input: &str) -> Result<String> {
    if input == "-" {
        use std::io::Read;
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        Ok(buf)
    } else {
        Ok(fs::read_to_string(input)?)
    }
}

/// Writes via a temp file in the target directory and renames it into place,
/// so a failed write never leaves a partial file behind.
pub fn write_atomic(path: &Path, data: &str, overwrite: bool) -> Result<()> {
    if path.exists() && !overwrite {
        return Err(anyhow!(
            "refusing to overwrite existing file (pass --overwrite): {}",
            path.display()
        ));
    }

    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(dir)
        .with_context(|| format!("failed creating output directory: {}", dir.display()))?;

    let mut tmp = NamedTempFile::new_in(dir)
        .with_context(|| format!("failed creating temp file in {}", dir.display()))?;
    tmp.write_all(data.as_bytes())
        .context("failed writing subtitle data")?;
    tmp.as_file().sync_all().context("failed flushing subtitle data")?;

    let persisted = if overwrite {
        tmp.persist(path)
    } else {
        tmp.persist_noclobber(path)
    };
    persisted
        .map_err(|e| e.error)
        .with_context(|| format!("failed moving output into place: {}", path.display()))?;

    Ok(())
}

fn log_transcript_summary(t: &Transcript, samples: usize) {
    if t.is_empty() {
        tracing::warn!("no cues parsed from input");
    }
    tracing::info!(
        cues = t.len(),
        duration_ms = t.duration_ms(),
        "transcript summary"
    );

    if tracing::enabled!(tracing::Level::DEBUG) {
        let n = samples.min(t.len());
        for c in t.cues.iter().take(n) {
            tracing::debug!(
                index = c.index,
                start_ms = c.start_ms,
                end_ms = c.end_ms,
                chars = c.text.chars().count(),
                "cue sample"
            );
        }
    }
}

fn print_preview(p: &Preview, json: bool) -> Result<()> {
    if json {
        let s = serde_json::to_string_pretty(p).context("failed serializing preview")?;
        println!("{s}");
    } else {
        print!("{}", p.render_text());
    }
    Ok(())
}

pub fn run_preview(cmd: PreviewCmd, cfg: &Config) -> Result<()> {
    let raw = read_input_to_string(&cmd.input)
        .with_context(|| format!("failed reading transcript: {}", cmd.input))?;
    let transcript = formats::srt::parse_srt(&raw);
    log_transcript_summary(&transcript, cfg.logging.debug_cue_samples);

    let limit = cmd.limit.unwrap_or(cfg.preview.limit);
    let timed = cfg.preview.timed && !cmd.compact;
    print_preview(&preview::project(&transcript, limit, timed), cmd.json)
}

pub fn run_presets(cfg: &Config) {
    print!("{}", presets_table(cfg.transcription.granularity));
}

fn presets_table(current: GranularityPreset) -> String {
    let mut out = String::new();
    for preset in GranularityPreset::ALL {
        let params = preset.params();
        let max = params
            .max_caption_chars
            .map(|m| m.to_string())
            .unwrap_or_else(|| "unbounded".to_string());
        let args = preset.engine_args();
        let args = if args.is_empty() {
            "(none)".to_string()
        } else {
            args.join(" ")
        };
        let marker = if preset == current { "*" } else { " " };
        out.push_str(&format!(
            "{marker} {:<7} max_chars={:<10} split_on_word={:<5} engine_args: {args}\n",
            preset.as_str(),
            max,
            params.split_on_word,
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const INPUT: &str = "1\n00:00:00,320 --> 00:00:03,120\nHello world\n\n\
                         garbage\n\n\
                         2\n00:00:03,120 --> 00:00:06,540\nsecond line\nwraps here\n";

    fn cmd(inputs: &[&str]) -> ConvertCmd {
        ConvertCmd {
            inputs: inputs.iter().map(|s| s.to_string()).collect(),
            output: None,
            output_dir: None,
            name: None,
            to: None,
            karaoke: false,
            granularity: None,
            stdout: false,
            overwrite: false,
            json: false,
            no_preview: true,
        }
    }

    fn opts(format: Format, karaoke: bool) -> ConvertOptions {
        let mut c = cmd(&["x.srt"]);
        c.to = Some(format);
        c.karaoke = karaoke;
        ConvertOptions::resolve(&c, &Config::default())
    }

    #[test]
    fn cli_flags_override_config() {
        let mut cfg = Config::default();
        cfg.output.format = Format::Ass;
        cfg.transcription.granularity = GranularityPreset::Low;

        let resolved = ConvertOptions::resolve(&cmd(&["a.srt"]), &cfg);
        assert_eq!(resolved.format, Format::Ass);
        assert_eq!(resolved.granularity, GranularityPreset::Low);

        let mut c = cmd(&["a.srt"]);
        c.to = Some(Format::Srt);
        c.granularity = Some(GranularityPreset::Ultra);
        let resolved = ConvertOptions::resolve(&c, &cfg);
        assert_eq!(resolved.format, Format::Srt);
        assert_eq!(resolved.granularity, GranularityPreset::Ultra);
    }

    #[test]
    fn karaoke_is_dropped_for_srt() {
        assert!(!opts(Format::Srt, true).karaoke);
        assert!(opts(Format::Ass, true).karaoke);
    }

    #[test]
    fn converts_to_srt_skipping_bad_blocks() {
        let conv = convert_text(INPUT, &opts(Format::Srt, false));
        assert_eq!(conv.transcript.len(), 2);
        assert_eq!(
            conv.rendered,
            "1\n00:00:00,320 --> 00:00:03,120\nHello world\n\n\
             2\n00:00:03,120 --> 00:00:06,540\nsecond line\nwraps here\n"
        );
    }

    #[test]
    fn converts_to_plain_ass() {
        let conv = convert_text(INPUT, &opts(Format::Ass, false));
        assert!(conv.rendered.contains(
            "Dialogue: 0,0:00:00.32,0:00:03.12,Default,,0,0,0,,Hello world\n"
        ));
        assert!(conv.rendered.contains(",,second line\\Nwraps here\n"));
    }

    #[test]
    fn converts_to_karaoke_ass() {
        let conv = convert_text(INPUT, &opts(Format::Ass, true));
        assert!(conv.rendered.contains(",,{\\k140}Hello {\\k140}world\n"));
    }

    #[test]
    fn reports_granularity_mismatch() {
        let mut o = opts(Format::Srt, false);
        o.granularity = GranularityPreset::Ultra;
        let raw = "1\n00:00:00,000 --> 00:00:01,000\nthis caption is far too long for ultra\n";
        let conv = convert_text(raw, &o);
        assert_eq!(conv.report.over_limit, vec![1]);
    }

    #[test]
    fn output_path_defaults_next_to_input() {
        let path = resolve_output_path("media/talk.srt", &cmd(&["media/talk.srt"]), Format::Ass).unwrap();
        assert_eq!(path, PathBuf::from("media/talk.ass"));

        let path = resolve_output_path("talk.srt", &cmd(&["talk.srt"]), Format::Srt).unwrap();
        assert_eq!(path, PathBuf::from("./talk.srt"));
    }

    #[test]
    fn output_path_uses_sanitized_name_and_dir() {
        let mut c = cmd(&["in/talk.srt"]);
        c.name = Some("  final: cut?  ".to_string());
        c.output_dir = Some(PathBuf::from("out"));
        let path = resolve_output_path("in/talk.srt", &c, Format::Ass).unwrap();
        assert_eq!(path, PathBuf::from("out/final cut.ass"));
    }

    #[test]
    fn output_path_errors() {
        assert!(resolve_output_path("-", &cmd(&["-"]), Format::Srt).is_err());

        let mut c = cmd(&["a.srt"]);
        c.name = Some("???".to_string());
        assert!(resolve_output_path("a.srt", &c, Format::Srt).is_err());
    }

    #[test]
    fn explicit_output_wins() {
        let mut c = cmd(&["a.srt"]);
        c.output = Some(PathBuf::from("elsewhere/x.txt"));
        assert_eq!(
            resolve_output_path("a.srt", &c, Format::Ass).unwrap(),
            PathBuf::from("elsewhere/x.txt")
        );
    }

    #[test]
    fn rejects_multi_input_with_single_target() {
        let mut c = cmd(&["a.srt", "b.srt"]);
        c.output = Some(PathBuf::from("x.srt"));
        assert!(validate_convert_cmd(&c).is_err());

        let mut c = cmd(&["a.srt", "b.srt"]);
        c.name = Some("x".to_string());
        assert!(validate_convert_cmd(&c).is_err());

        assert!(validate_convert_cmd(&cmd(&["-", "-"])).is_err());
        assert!(validate_convert_cmd(&cmd(&["a.srt", "b.srt"])).is_ok());
    }

    #[test]
    fn atomic_write_creates_and_refuses_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("out.srt");

        write_atomic(&path, "first", false).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "first");

        let err = write_atomic(&path, "second", false).unwrap_err();
        assert!(err.to_string().contains("refusing to overwrite"));
        assert_eq!(fs::read_to_string(&path).unwrap(), "first");

        write_atomic(&path, "second", true).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "second");

        let leftovers = fs::read_dir(path.parent().unwrap()).unwrap().count();
        assert_eq!(leftovers, 1);
    }

    #[test]
    fn convert_one_writes_file_and_preview() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("lecture.srt");
        fs::write(&input, INPUT).unwrap();
        let input = input.to_string_lossy().to_string();

        let c = cmd(&[input.as_str()]);
        let mut o = opts(Format::Ass, true);
        o.preview_limit = 1;

        let outcome = convert_one(&input, &c, &o).unwrap();
        let out = outcome.output.unwrap();
        assert_eq!(out, dir.path().join("lecture.ass"));
        assert_eq!(outcome.cues, 2);
        assert_eq!(outcome.preview.items.len(), 1);
        assert!(outcome.preview.truncated);

        let written = fs::read_to_string(&out).unwrap();
        assert!(written.starts_with("[Script Info]"));
        assert_eq!(written.lines().filter(|l| l.starts_with("Dialogue:")).count(), 2);
    }

    #[test]
    fn convert_one_fails_on_missing_input_without_writing() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("missing.srt").to_string_lossy().to_string();
        let err = convert_one(&input, &cmd(&[input.as_str()]), &opts(Format::Srt, false)).unwrap_err();
        assert!(format!("{err:#}").contains("failed reading transcript"));
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn batch_reports_failures_but_converts_the_rest() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.srt");
        fs::write(&good, INPUT).unwrap();
        let good = good.to_string_lossy().to_string();
        let missing = dir.path().join("missing.srt").to_string_lossy().to_string();

        let mut c = cmd(&[missing.as_str(), good.as_str()]);
        c.to = Some(Format::Ass);
        let err = run_convert(c, &Config::default()).unwrap_err();
        assert!(err.to_string().contains("1 of 2"));
        assert!(dir.path().join("good.ass").exists());
        assert!(!dir.path().join("missing.ass").exists());
    }

    #[test]
    fn presets_table_marks_current_preset() {
        let table = presets_table(GranularityPreset::High);
        assert_eq!(table.lines().count(), 4);
        let high = table.lines().find(|l| l.contains("HIGH")).unwrap();
        assert!(high.starts_with('*'));
        assert!(high.contains("-ml 28 --split-on-word"));
        let low = table.lines().find(|l| l.contains("LOW")).unwrap();
        assert!(low.contains("unbounded") && low.contains("(none)"));
    }
}
