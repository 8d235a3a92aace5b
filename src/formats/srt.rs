use crate::{
    formats::time::{format_srt_timestamp, parse_time_range_arrow},
    model::{Cue, Transcript},
};

/// Parses SRT leniently: malformed blocks are dropped, bad indices are renumbered.
pub fn parse_srt(input: &str) -> Transcript {
    let normalized = input
        .trim_start_matches('\u{feff}')
        .replace("\r\n", "\n")
        .replace('\r', "\n");
    let mut cues: Vec<Cue> = Vec::new();

    for (block_no, raw_block) in split_blocks(&normalized).into_iter().enumerate() {
        let block: Vec<&str> = raw_block.split('\n').collect();
        if block.len() < 2 {
            tracing::debug!(block = block_no + 1, "dropping block with fewer than 2 lines");
            continue;
        }

        let index = match block[0].trim().parse::<u32>() {
            Ok(i) if i > 0 => i,
            _ => {
                let synthetic = u32::try_from(cues.len()).map_or(u32::MAX, |n| n.saturating_add(1));
                tracing::debug!(
                    block = block_no + 1,
                    raw = block[0].trim(),
                    synthetic,
                    "unparseable cue index; renumbering"
                );
                synthetic
            }
        };

        let (start_ms, end_ms) = match parse_time_range_arrow(block[1]) {
            Ok(range) => range,
            Err(e) => {
                tracing::warn!(block = block_no + 1, error = %e, "dropping block with bad time range");
                continue;
            }
        };
        if end_ms < start_ms {
            tracing::warn!(
                block = block_no + 1,
                start_ms,
                end_ms,
                "dropping block that ends before it starts"
            );
            continue;
        }

        let text = block[2..].join("\n").trim().to_string();
        cues.push(Cue {
            index,
            start_ms,
            end_ms,
            text,
        });
    }

    Transcript::new(cues)
}

// Blocks are separated by runs of empty lines; each block is trimmed.
fn split_blocks(input: &str) -> Vec<String> {
    let mut blocks = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in input.split('\n') {
        if line.is_empty() {
            push_block(&mut blocks, &mut current);
        } else {
            current.push(line);
        }
    }
    push_block(&mut blocks, &mut current);

    blocks
}

fn push_block(blocks: &mut Vec<String>, current: &mut Vec<&str>) {
    let block = current.join("\n");
    current.clear();
    let block = block.trim();
    if !block.is_empty() {
        blocks.push(block.to_string());
    }
}

pub fn write_srt(t: &Transcript) -> String {
    let blocks: Vec<String> = t.cues.iter().map(write_cue).collect();
    blocks.join("\n")
}

fn write_cue(cue: &Cue) -> String {
    format!(
        "{}\n{} --> {}\n{}\n",
        cue.index,
        format_srt_timestamp(cue.start_ms),
        format_srt_timestamp(cue.end_ms),
        cue.text
    )
}
