use std::ffi::OsString;
use std::fs;
use std::path::Path;

use clap::Parser;
use rsym_compiler::compile_resources_with_sink;
use rsym_core::ResourceError;
use tracing::debug;

mod cli_args;
mod error_map;
mod logging;
mod options_loader;
mod outline;
mod resource_loader;

pub(crate) use cli_args::{Cli, Command, GenerateArgs, OutputFormat};
pub(crate) use error_map::{
    emit_error, map_cli_config_invalid, map_cli_config_read, map_cli_output_write,
    map_cli_resources_invalid, map_cli_resources_path, map_cli_resources_read,
};
pub(crate) use logging::init_tracing;
pub(crate) use options_loader::load_options;
pub(crate) use outline::render_outline;
pub(crate) use resource_loader::load_resource_bundle;
#[cfg(test)]
pub(crate) use resource_loader::{read_resource_bundle, resolve_resources_dir};

pub fn run_cli_from_args<I, T>(args: I) -> i32
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(error) => {
            let _ = error.print();
            return error.exit_code();
        }
    };
    init_tracing();
    match run(cli) {
        Ok(code) => code,
        Err(error) => emit_error(error),
    }
}

fn run(cli: Cli) -> Result<i32, ResourceError> {
    match cli.command {
        Command::Generate(args) => run_generate(args),
    }
}

fn run_generate(args: GenerateArgs) -> Result<i32, ResourceError> {
    let options = load_options(args.config.as_deref())?;
    let input = load_resource_bundle(&args.resources)?;
    debug!(
        strings = input.strings.len(),
        templates = input.templates.len(),
        assets = input.assets.len(),
        "resources loaded"
    );

    let root = compile_resources_with_sink(&input, &options, |diagnostic| {
        eprintln!("warning: {}", diagnostic);
    });

    let rendered = match args.format {
        OutputFormat::Json => serde_json::to_string_pretty(&root).map_err(map_cli_output_write)?,
        OutputFormat::Outline => render_outline(&root),
    };

    match args.out {
        Some(out) => write_output(Path::new(&out), &rendered)?,
        None => println!("{}", rendered.trim_end()),
    }
    Ok(0)
}

fn write_output(path: &Path, rendered: &str) -> Result<(), ResourceError> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(map_cli_output_write)?;
    }
    let mut payload = rendered.trim_end().to_string();
    payload.push('\n');
    fs::write(path, payload).map_err(map_cli_output_write)
}

#[cfg(test)]
mod tests;
