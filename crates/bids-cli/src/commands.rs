use std::path::Path;

use anyhow::{Context, Result};
use bids_cli::pipeline::{ConvertOptions, OutputFormat, convert, discover_inputs};
use bids_cli::types::ConvertResult;
use bids_model::FileKind;
use bids_standards::{SchemaCatalog, SchemaDirectory};
use comfy_table::Table;
use tracing::info;

use crate::cli::{ConvertArgs, OutputFormatArg, SchemaArgs};
use crate::summary::apply_table_style;

pub fn run_convert(args: &ConvertArgs) -> Result<ConvertResult> {
    let catalog = SchemaCatalog::load_embedded().context("load BIDS schema")?;
    let inputs = discover_inputs(&args.input)?;
    let output_dir = args
        .output_dir
        .clone()
        .unwrap_or_else(|| default_output_dir(&args.input));

    let mut options = ConvertOptions::new(output_dir);
    options.format = match args.format {
        OutputFormatArg::Folder => OutputFormat::Folder,
        OutputFormatArg::Text => OutputFormat::Text,
    };
    options.participant_fields = args.participant.clone();
    options.dataset_tables = !args.no_dataset_tables;

    info!(
        inputs = inputs.len(),
        output_dir = %options.output_dir.display(),
        "starting conversion"
    );
    Ok(convert(&inputs, &options, &catalog))
}

fn default_output_dir(input: &Path) -> std::path::PathBuf {
    if input.is_dir() {
        input.to_path_buf()
    } else {
        input
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default()
    }
}

pub fn run_schema(args: &SchemaArgs) -> Result<()> {
    let catalog = SchemaCatalog::load_embedded().context("load BIDS schema")?;
    let mut table = Table::new();
    apply_table_style(&mut table);

    match &args.file_kind {
        Some(name) => {
            let key = name
                .parse::<FileKind>()
                .map(|kind| kind.schema_key().to_string())
                .unwrap_or_else(|_| name.clone());
            let schema = catalog.schema_for(&key)?;
            table.set_header(vec!["Field", "Type", "Level", "Description"]);
            for field in &schema.fields {
                table.add_row(vec![
                    field.name.clone(),
                    field.kind.to_string(),
                    field.level.to_string(),
                    field.description.clone().unwrap_or_default(),
                ]);
            }
        }
        None => {
            table.set_header(vec!["File", "Fields", "Required"]);
            for schema in catalog.files() {
                let required = schema.required_fields().count();
                table.add_row(vec![
                    schema.key.clone(),
                    schema.fields.len().to_string(),
                    required.to_string(),
                ]);
            }
        }
    }
    println!("{table}");
    Ok(())
}
