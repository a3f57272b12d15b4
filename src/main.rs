use burnin::{AnnotatedDocument, Flattener, FlattenError, FlattenerBuilder};
use clap::Parser;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

/// Burns the annotations of a JSON model permanently into a PDF.
#[derive(Parser, Debug)]
#[command(name = "burnin", version, about)]
struct Cli {
    /// Source PDF. Never modified.
    input: PathBuf,

    /// Annotation model: a full document or a `{ "<page>": [...] }` map.
    annotations: PathBuf,

    /// Where to write the flattened PDF.
    #[arg(required_unless_present = "dry_run")]
    output: Option<PathBuf>,

    /// Directory that image references are resolved against.
    #[arg(long, value_name = "DIR")]
    resources: Option<PathBuf>,

    /// JSON file with rendering and embedding settings.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Print the drawing plan as JSON instead of writing a PDF.
    #[arg(long)]
    dry_run: bool,
}

fn build_flattener(cli: &Cli) -> Result<Flattener, FlattenError> {
    let mut builder = FlattenerBuilder::new();
    if let Some(config) = &cli.config {
        builder = builder.with_config_file(config)?;
    }
    if let Some(dir) = &cli.resources {
        builder = builder.with_resource_dir(dir);
    }
    Ok(builder.build())
}

fn run(cli: &Cli) -> Result<usize, FlattenError> {
    let flattener = build_flattener(cli)?;

    if cli.dry_run {
        let pdf = fs::read(&cli.input)?;
        let model = AnnotatedDocument::from_json_file(&cli.annotations)?;
        let plan = flattener.plan(&pdf, &model)?;
        println!("{}", serde_json::to_string_pretty(&plan)?);
        return Ok(plan.diagnostics.len());
    }

    let Some(output) = &cli.output else {
        return Err(FlattenError::Config("no output path given".to_string()));
    };
    let diagnostics = flattener.flatten_file(&cli.input, &cli.annotations, output)?;
    for diagnostic in &diagnostics {
        eprintln!("warning: {}", diagnostic);
    }
    println!("Wrote {}", output.display());
    Ok(diagnostics.len())
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match run(&cli) {
        Ok(0) => ExitCode::SUCCESS,
        Ok(skipped) => {
            eprintln!("{} annotation(s) skipped", skipped);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
