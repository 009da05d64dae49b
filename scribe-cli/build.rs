use clap::{Arg, ArgAction, Command, ValueHint};
use clap_complete::{generate_to, shells::*};
use std::env;
use std::io::Error;

// Mirror of the formats registered by FormatRegistry::with_defaults
// Build scripts can't link against the library, so the list is duplicated here
const AVAILABLE_FORMATS: &[&str] = &["docx", "json", "pdf", "txt"];

fn format_arg(name: &'static str, help: &'static str) -> Arg {
    Arg::new(name)
        .long(name)
        .help(help)
        .value_parser(clap::builder::PossibleValuesParser::new(AVAILABLE_FORMATS))
        .value_hint(ValueHint::Other)
}

fn main() -> Result<(), Error> {
    let outdir = match env::var_os("OUT_DIR") {
        None => return Ok(()),
        Some(outdir) => outdir,
    };

    let mut cmd = Command::new("scribe")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Convert manuscripts between structured data, DOCX and PDF")
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("PATH")
                .value_hint(ValueHint::FilePath)
                .global(true),
        )
        .arg(
            Arg::new("list-formats")
                .long("list-formats")
                .help("List available formats")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand(
            Command::new("convert")
                .arg(Arg::new("input").index(1).value_hint(ValueHint::FilePath))
                .arg(format_arg("from", "Source format"))
                .arg(format_arg("to", "Target format"))
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .value_hint(ValueHint::FilePath),
                ),
        )
        .subcommand(
            Command::new("export")
                .arg(Arg::new("request").index(1).value_hint(ValueHint::FilePath))
                .arg(format_arg("to", "Target format")),
        )
        .subcommand(
            Command::new("import")
                .arg(Arg::new("input").index(1).value_hint(ValueHint::FilePath))
                .arg(
                    Arg::new("style-config")
                        .long("style-config")
                        .value_hint(ValueHint::FilePath),
                ),
        )
        .subcommand(
            Command::new("inspect").arg(Arg::new("path").index(1).value_hint(ValueHint::FilePath)),
        )
        .subcommand(Command::new("generate-config"));

    // Generate completions for bash
    generate_to(Bash, &mut cmd, "scribe", &outdir)?;

    // Generate completions for zsh
    generate_to(Zsh, &mut cmd, "scribe", &outdir)?;

    // Generate completions for fish
    generate_to(Fish, &mut cmd, "scribe", &outdir)?;

    println!("cargo:warning=Shell completions generated in {outdir:?}");

    Ok(())
}
