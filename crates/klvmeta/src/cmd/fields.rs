use klvmeta_registry::FieldRegistry;
use serde::Serialize;

use crate::cmd::FieldsArgs;
use crate::exit::{CliResult, SUCCESS};
use crate::output::{new_table, print_json, OutputFormat};

#[derive(Serialize)]
struct FieldInfo {
    tag: u8,
    name: &'static str,
    encoding: String,
}

pub fn run(_args: FieldsArgs, format: OutputFormat) -> CliResult<i32> {
    let registry = FieldRegistry::standard();
    let fields: Vec<FieldInfo> = registry
        .rules()
        .map(|rule| FieldInfo {
            tag: rule.tag,
            name: rule.name,
            encoding: rule.kind.to_string(),
        })
        .collect();

    match format {
        OutputFormat::Json => print_json(&fields),
        OutputFormat::Table => {
            let mut table = new_table(vec!["TAG", "NAME", "ENCODING"]);
            for field in &fields {
                table.add_row(vec![
                    field.tag.to_string(),
                    field.name.to_string(),
                    field.encoding.clone(),
                ]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            for field in &fields {
                println!("{:>3} {:<32} {}", field.tag, field.name, field.encoding);
            }
        }
    }

    Ok(SUCCESS)
}
