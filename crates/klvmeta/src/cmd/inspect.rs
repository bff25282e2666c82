use std::fs::File;
use std::io::BufReader;

use klvmeta_frame::{Block, BlockReader};
use serde::Serialize;

use crate::cmd::InspectArgs;
use crate::exit::{frame_error, io_error, CliResult, SUCCESS};
use crate::output::{join_tags, new_table, print_json, OutputFormat};

#[derive(Serialize)]
struct BlockInfo {
    index: usize,
    length: usize,
    fields: usize,
    tags: Vec<u8>,
}

impl BlockInfo {
    fn from_block(index: usize, block: &Block) -> Result<Self, klvmeta_frame::FrameError> {
        let tags = block
            .fields()
            .map(|record| record.map(|r| r.tag))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            index,
            length: block.length,
            fields: tags.len(),
            tags,
        })
    }
}

pub fn run(args: InspectArgs, format: OutputFormat) -> CliResult<i32> {
    let file = File::open(&args.input).map_err(|err| {
        io_error(&format!("failed opening {}", args.input.display()), err)
    })?;
    let reader = BlockReader::new(BufReader::new(file));
    let limit = args.limit.unwrap_or(usize::MAX);

    let mut blocks = Vec::new();
    for (index, block) in reader.take(limit).enumerate() {
        let block = block.map_err(|err| frame_error("inspect failed", err))?;
        let info = BlockInfo::from_block(index, &block)
            .map_err(|err| frame_error(&format!("inspect failed at block {index}"), err))?;
        blocks.push(info);
    }

    print_blocks(&blocks, format);
    Ok(SUCCESS)
}

fn print_blocks(blocks: &[BlockInfo], format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(&blocks),
        OutputFormat::Table => {
            let mut table = new_table(vec!["FRAME", "LENGTH", "FIELDS", "TAGS"]);
            for info in blocks {
                table.add_row(vec![
                    format!("frame_{:05}", info.index),
                    info.length.to_string(),
                    info.fields.to_string(),
                    join_tags(&info.tags),
                ]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            for info in blocks {
                println!(
                    "frame_{:05} length={} fields={} tags={}",
                    info.index,
                    info.length,
                    info.fields,
                    join_tags(&info.tags)
                );
            }
        }
    }
}
