use std::path::PathBuf;

use klvmeta_document::{DecodeOptions, DecodeReport, Decoder, Diagnostic};
use serde::Serialize;

use crate::cmd::DecodeArgs;
use crate::config::Config;
use crate::exit::{document_error, CliResult, SUCCESS};
use crate::output::{new_table, print_json, OutputFormat};

#[derive(Serialize)]
struct DecodeOutput<'a> {
    source: &'a str,
    processing_date: String,
    frames: usize,
    json: Option<PathBuf>,
    kml: Option<PathBuf>,
    diagnostics: &'a [Diagnostic],
}

pub fn run(args: DecodeArgs, format: OutputFormat, config: &Config) -> CliResult<i32> {
    let options = DecodeOptions {
        frame_ids: config.frame_ids() && !args.no_frame_ids,
        ..DecodeOptions::default()
    };
    let report = Decoder::with_options(options)
        .decode_file(&args.input)
        .map_err(|err| document_error("decode failed", err))?;

    if args.stdout {
        let json = report
            .document
            .to_json_pretty()
            .map_err(|err| document_error("render failed", err))?;
        println!("{json}");
        return Ok(SUCCESS);
    }

    let out_dir = config.output_dir(args.out_dir.as_deref());
    let json = report
        .document
        .write_json(&out_dir)
        .map_err(|err| document_error("write failed", err))?;
    tracing::info!(path = %json.display(), "wrote metadata document");

    let kml = if args.kml || config.kml() {
        let path = report
            .document
            .write_kml(&out_dir)
            .map_err(|err| document_error("write failed", err))?;
        tracing::info!(path = %path.display(), "wrote frame-center KML");
        Some(path)
    } else {
        None
    };

    print_summary(&report, Some(json), kml, format);
    Ok(SUCCESS)
}

fn print_summary(
    report: &DecodeReport,
    json: Option<PathBuf>,
    kml: Option<PathBuf>,
    format: OutputFormat,
) {
    let out = DecodeOutput {
        source: &report.document.source,
        processing_date: report.document.processing_date_text(),
        frames: report.document.len(),
        json,
        kml,
        diagnostics: &report.diagnostics,
    };

    match format {
        OutputFormat::Json => print_json(&out),
        OutputFormat::Table => {
            let mut table = new_table(vec!["SOURCE", "FRAMES", "DIAGNOSTICS", "OUTPUT"]);
            let outputs: Vec<String> = [out.json.as_ref(), out.kml.as_ref()]
                .into_iter()
                .flatten()
                .map(|p| p.display().to_string())
                .collect();
            table.add_row(vec![
                out.source.to_string(),
                out.frames.to_string(),
                out.diagnostics.len().to_string(),
                outputs.join("\n"),
            ]);
            println!("{table}");
            for diagnostic in out.diagnostics {
                println!(
                    "frame {:05} tag {}: {}",
                    diagnostic.frame, diagnostic.tag, diagnostic.message
                );
            }
        }
        OutputFormat::Pretty => {
            println!(
                "source={} frames={} diagnostics={} processing_date={}",
                out.source,
                out.frames,
                out.diagnostics.len(),
                out.processing_date
            );
            if let Some(path) = &out.json {
                println!("json={}", path.display());
            }
            if let Some(path) = &out.kml {
                println!("kml={}", path.display());
            }
        }
    }
}
