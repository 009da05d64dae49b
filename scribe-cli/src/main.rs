// Command-line interface for scribe
//
// This binary converts manuscripts between structured data (JSON), DOCX, PDF and plain text,
// and exposes the same export/import operations a host application reaches through the bridge.
//
// Converting:
//
// The conversion needs a to and from pair. The from can be auto-detected from the file extension,
// while being overwrittable by an explicit --from flag.
// Usage:
//  scribe <input> --to <format> [--from <format>] [--output <file>]  - Convert between formats (default)
//  scribe convert <input> --to <format> [--from <format>] [--output <file>]  - Same as above (explicit)
//  scribe export <request.json> --to <format>        - Run a bridge export, print the result JSON
//  scribe import <file> [--style-config <file>]      - Run a bridge import, print the result JSON
//  scribe inspect <file.docx> [<view>]               - Show the role given to every paragraph
//  scribe generate-config                            - Print the default configuration
//  scribe --list-formats                             - List available formats
//
// Extra Parameters:
//
// Style and layout settings can be overridden using --extra-<parameter-name> <value>.
// The CLI layer strips the "extra-" prefix and applies the value on top of the loaded config.
// Example:
//  scribe novel.json --to docx -o novel.docx --extra-title-size 26 --extra-font-family 宋体

mod inspect;

use clap::{Arg, ArgAction, Command, ValueHint};
use scribe_babel::formats::docx::read_paragraphs;
use scribe_babel::{
    Bridge, ConversionSettings, FormatRegistry, ImportRequest, OperationResult, Role,
    SerializedDocument, StorageResolver, StyleOverride,
};
use scribe_config::{Loader, ScribeConfig, DEFAULT_TOML, USER_CONFIG_FILE};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io::Read;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

/// Parse extra-* arguments from command line args
/// Returns (cleaned_args_without_extras, extra_params_map)
///
/// Supports both:
/// - `--extra-<key> <value>` (explicit value)
/// - `--extra-<key>` (boolean flag, defaults to "true")
/// - `--extras-<key>` (alias for `--extra-<key>`)
fn parse_extra_args(args: &[String]) -> (Vec<String>, HashMap<String, String>) {
    let mut cleaned_args = Vec::new();
    let mut extra_params = HashMap::new();
    let mut i = 0;

    while i < args.len() {
        let arg = &args[i];

        let key_opt = arg
            .strip_prefix("--extra-")
            .or_else(|| arg.strip_prefix("--extras-"));

        if let Some(key) = key_opt {
            let has_value = args
                .get(i + 1)
                .is_some_and(|next| !next.starts_with('-') || is_negative_number(next));

            if has_value {
                extra_params.insert(key.to_string(), args[i + 1].clone());
                i += 2;
            } else {
                extra_params.insert(key.to_string(), "true".to_string());
                i += 1;
            }
            continue;
        }

        cleaned_args.push(arg.clone());
        i += 1;
    }

    (cleaned_args, extra_params)
}

fn is_negative_number(arg: &str) -> bool {
    arg.len() > 1 && arg.parse::<f64>().is_ok()
}

fn format_arg(name: &'static str, help: &'static str) -> Arg {
    Arg::new(name)
        .long(name)
        .help(help)
        .value_hint(ValueHint::Other)
}

fn build_cli() -> Command {
    Command::new("scribe")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Convert manuscripts between structured data, DOCX and PDF")
        .long_about(
            "scribe converts a manuscript (title, description, chapters) between\n\
            structured JSON, styled DOCX, PDF and plain text.\n\n\
            Commands:\n  \
            - convert: Transform between formats (default command)\n  \
            - export:  Render an export request and print the result JSON\n  \
            - import:  Read a document back into a model and print the result JSON\n  \
            - inspect: Show which role each DOCX paragraph is given\n\n\
            Extra Parameters:\n  \
            Use --extra-<name> [value] to override style settings.\n  \
            Boolean flags can omit the value (defaults to 'true').\n\n\
            Examples:\n  \
            scribe novel.json --to docx -o novel.docx    # Build a DOCX manuscript\n  \
            scribe novel.docx --to json                  # Recover the structure (stdout)\n  \
            scribe inspect novel.docx                    # Debug style matching",
        )
        .arg_required_else_help(true)
        .subcommand_required(false)
        .arg(
            Arg::new("list-formats")
                .long("list-formats")
                .help("List available formats")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("PATH")
                .help("Path to a scribe.toml configuration file")
                .value_hint(ValueHint::FilePath)
                .global(true),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Log progress to stderr (RUST_LOG takes precedence)")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand(
            Command::new("convert")
                .about("Convert between document formats (default command)")
                .long_about(
                    "Convert manuscripts between formats.\n\n\
                    Supported formats:\n  \
                    - json: Structure model (.json)\n  \
                    - docx: Styled Word document (.docx)\n  \
                    - pdf:  PDF, export only (.pdf)\n  \
                    - txt:  Plain text, export only (.txt)\n\n\
                    The source format is auto-detected from the file extension.\n\
                    Output goes to stdout by default, or use -o to specify a file.\n\
                    Binary formats (docx, pdf) always need -o.\n\n\
                    Examples:\n  \
                    scribe convert novel.json --to docx -o novel.docx\n  \
                    scribe convert novel.docx --to txt\n  \
                    scribe novel.json --to pdf -o novel.pdf       # 'convert' is optional",
                )
                .arg(
                    Arg::new("input")
                        .help("Input file path")
                        .required(true)
                        .index(1)
                        .value_hint(ValueHint::FilePath),
                )
                .arg(format_arg(
                    "from",
                    "Source format (auto-detected from file extension if not specified)",
                ))
                .arg(format_arg("to", "Target format (required)").required(true))
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .help("Output file path (defaults to stdout)")
                        .value_hint(ValueHint::FilePath),
                ),
        )
        .subcommand(
            Command::new("export")
                .about("Render an export request and print the result JSON")
                .long_about(
                    "Render a JSON export request the way a host application would.\n\n\
                    The request has the shape\n  \
                    {\"title\", \"description\", \"chapters\": [{\"title\", \"content\"}],\n   \
                    \"savePath\", \"format\"}\n\
                    where every field is optional. Without savePath the file is written\n\
                    under the first writable storage directory with a timestamped name.\n\
                    Use '-' to read the request from stdin.\n\n\
                    Examples:\n  \
                    scribe export request.json --to docx\n  \
                    echo '{\"title\": \"Draft\"}' | scribe export - --to pdf",
                )
                .arg(
                    Arg::new("request")
                        .help("Request file path, or '-' for stdin")
                        .required(true)
                        .index(1)
                        .value_hint(ValueHint::FilePath),
                )
                .arg(format_arg("to", "Target format").default_value("docx")),
        )
        .subcommand(
            Command::new("import")
                .about("Import a document and print the result JSON")
                .arg(
                    Arg::new("input")
                        .help("Document to import")
                        .required(true)
                        .index(1)
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("style-config")
                        .long("style-config")
                        .value_name("PATH")
                        .help("JSON map of role to style overrides (e.g. {\"title\": {\"pointSize\": 26}})")
                        .value_hint(ValueHint::FilePath),
                ),
        )
        .subcommand(
            Command::new("inspect")
                .about("Show the role given to every paragraph of a DOCX file")
                .long_about(
                    "Replay the import heuristic over a DOCX file.\n\n\
                    Every paragraph is printed with the role it was given, the style\n\
                    observed on its first run and its text. Blank paragraphs show the\n\
                    role '-'.\n\n\
                    Views:\n  \
                    - table: aligned columns (default)\n  \
                    - json:  JSON array of rows",
                )
                .arg(
                    Arg::new("path")
                        .help("Path to the DOCX file")
                        .required(true)
                        .index(1)
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("view")
                        .help("Output view. Defaults to 'table'")
                        .required(false)
                        .value_parser(clap::builder::PossibleValuesParser::new(
                            inspect::AVAILABLE_VIEWS,
                        ))
                        .index(2)
                        .value_hint(ValueHint::Other),
                ),
        )
        .subcommand(
            Command::new("generate-config")
                .about("Output the default configuration")
                .long_about(
                    "Outputs the built-in configuration in TOML.\n\n\
                    Save it as scribe.toml in the working directory (picked up\n\
                    automatically) or pass it via --config, then edit what you need.\n\n\
                    Examples:\n  \
                    scribe generate-config > scribe.toml",
                ),
        )
}

const SUBCOMMANDS: &[&str] = &[
    "convert",
    "export",
    "import",
    "inspect",
    "generate-config",
    "help",
];

fn main() {
    // Try to parse args. If no subcommand is provided, inject "convert"
    let args: Vec<String> = std::env::args().collect();

    // Parse extra-* arguments before clap processing
    let (cleaned_args, mut extra_params) = parse_extra_args(&args);

    let cli = build_cli();
    let matches = match cli.clone().try_get_matches_from(&cleaned_args) {
        Ok(m) => m,
        Err(e) => {
            if cleaned_args.len() > 1
                && !cleaned_args[1].starts_with('-')
                && !SUBCOMMANDS.contains(&cleaned_args[1].as_str())
            {
                let mut new_args = vec![cleaned_args[0].clone(), "convert".to_string()];
                new_args.extend_from_slice(&cleaned_args[1..]);

                match cli.try_get_matches_from(&new_args) {
                    Ok(m) => m,
                    Err(e2) => e2.exit(),
                }
            } else {
                e.exit();
            }
        }
    };

    init_logging(matches.get_flag("verbose"));

    if matches.get_flag("list-formats") {
        handle_list_formats_command();
        return;
    }

    let mut config = load_cli_config(matches.get_one::<String>("config").map(|s| s.as_str()));
    apply_config_overrides(&mut config, &mut extra_params);
    for key in extra_params.keys() {
        warn!(parameter = key.as_str(), "ignoring unknown --extra parameter");
    }

    match matches.subcommand() {
        Some(("convert", sub_matches)) => {
            let input = required(sub_matches, "input");
            let to = required(sub_matches, "to");

            // Auto-detect --from if not provided
            let from = match sub_matches.get_one::<String>("from") {
                Some(f) => f.to_string(),
                None => {
                    let registry = FormatRegistry::default();
                    match registry.detect_format_from_filename(input) {
                        Some(detected) => detected,
                        None => {
                            eprintln!("Error: Could not detect format from filename '{input}'");
                            eprintln!("Please specify --from explicitly");
                            std::process::exit(1);
                        }
                    }
                }
            };

            let output = sub_matches.get_one::<String>("output").map(|s| s.as_str());
            handle_convert_command(input, &from, to, output, &config);
        }
        Some(("export", sub_matches)) => {
            let request = required(sub_matches, "request");
            let to = required(sub_matches, "to");
            handle_export_command(request, to, &config);
        }
        Some(("import", sub_matches)) => {
            let input = required(sub_matches, "input");
            let style_config = sub_matches
                .get_one::<String>("style-config")
                .map(|s| s.as_str());
            handle_import_command(input, style_config, &config);
        }
        Some(("inspect", sub_matches)) => {
            let path = required(sub_matches, "path");
            let view = sub_matches
                .get_one::<String>("view")
                .map(|s| s.as_str())
                .unwrap_or("table");
            handle_inspect_command(path, view, &config);
        }
        Some(("generate-config", _)) => {
            handle_generate_config_command();
        }
        _ => {
            eprintln!("Unknown subcommand. Use --help for usage information.");
            std::process::exit(1);
        }
    }
}

fn required<'a>(matches: &'a clap::ArgMatches, id: &str) -> &'a str {
    match matches.get_one::<String>(id) {
        Some(value) => value,
        None => {
            eprintln!("Error: missing required argument '{id}'");
            std::process::exit(2);
        }
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Handle the convert command
fn handle_convert_command(
    input: &str,
    from: &str,
    to: &str,
    output: Option<&str>,
    config: &ScribeConfig,
) {
    let registry = FormatRegistry::default();

    // Validate formats exist
    if let Err(e) = registry.get(from) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
    if let Err(e) = registry.get(to) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }

    let source = fs::read(input).unwrap_or_else(|e| {
        eprintln!("Error reading file '{input}': {e}");
        std::process::exit(1);
    });

    let settings = ConversionSettings::from(config);

    let model = registry
        .parse(&source, input, from, &settings)
        .unwrap_or_else(|e| {
            eprintln!("Error: {e}");
            std::process::exit(1);
        });
    debug!(
        title = model.title.as_str(),
        chapters = model.chapters.len(),
        "parsed input"
    );

    let result = registry.serialize(&model, to, &settings).unwrap_or_else(|e| {
        eprintln!("Serialization error: {e}");
        std::process::exit(1);
    });

    match (output, result) {
        (Some(path), data) => {
            fs::write(path, data.into_bytes()).unwrap_or_else(|e| {
                eprintln!("Error writing file '{path}': {e}");
                std::process::exit(1);
            });
        }
        (None, SerializedDocument::Text(text)) => {
            print!("{text}");
        }
        (None, SerializedDocument::Binary(_)) => {
            eprintln!("Binary formats (like DOCX and PDF) require an output file. Use -o <path>.");
            std::process::exit(1);
        }
    }
}

/// Handle the export command
fn handle_export_command(request_path: &str, to: &str, config: &ScribeConfig) {
    let request = read_request(request_path).unwrap_or_else(|e| {
        eprintln!("Error reading request '{request_path}': {e}");
        std::process::exit(1);
    });

    let result = bridge_from_config(config).export_json(to, &request);
    print_result(&result);
}

/// Handle the import command
fn handle_import_command(input: &str, style_config: Option<&str>, config: &ScribeConfig) {
    let mut request = ImportRequest::new(input);
    if let Some(path) = style_config {
        request.style_config = Some(load_style_config(path));
    }

    let result = bridge_from_config(config).import(&request);
    print_result(&result);
}

/// Handle the inspect command
fn handle_inspect_command(path: &str, view: &str, config: &ScribeConfig) {
    let source = fs::read(path).unwrap_or_else(|e| {
        eprintln!("Error reading file '{path}': {e}");
        std::process::exit(1);
    });

    let paragraphs = read_paragraphs(&source).unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        std::process::exit(1);
    });

    let settings = ConversionSettings::from(config);
    let output = inspect::render(&paragraphs, view, &settings).unwrap_or_else(|e| {
        eprintln!("Inspect error: {e}");
        std::process::exit(1);
    });

    print!("{output}");
}

/// Handle the generate-config command
fn handle_generate_config_command() {
    print!("{DEFAULT_TOML}");
}

/// Handle the list-formats command
fn handle_list_formats_command() {
    let registry = FormatRegistry::default();
    println!("Available formats:\n");
    for name in registry.list_formats() {
        let Ok(format) = registry.get(&name) else {
            continue;
        };
        let mut directions = Vec::new();
        if format.supports_parsing() {
            directions.push("import");
        }
        if format.supports_serialization() {
            directions.push("export");
        }
        println!(
            "  {name:<6} {:<30} [{}] (.{})",
            format.description(),
            directions.join(", "),
            format.file_extensions().join(", .")
        );
    }
}

fn bridge_from_config(config: &ScribeConfig) -> Bridge {
    Bridge::new(
        ConversionSettings::from(config),
        StorageResolver::from(&config.storage),
    )
}

fn print_result(result: &OperationResult) {
    println!("{}", result.to_json());
    if !result.success {
        std::process::exit(1);
    }
}

fn read_request(path: &str) -> std::io::Result<String> {
    if path == "-" {
        let mut buffer = String::new();
        std::io::stdin().read_to_string(&mut buffer)?;
        Ok(buffer)
    } else {
        fs::read_to_string(path)
    }
}

fn load_style_config(path: &str) -> BTreeMap<Role, StyleOverride> {
    let text = fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Error reading style config '{path}': {e}");
        std::process::exit(1);
    });
    serde_json::from_str(&text).unwrap_or_else(|e| {
        eprintln!("Invalid style config '{path}': {e}");
        std::process::exit(1);
    })
}

fn load_cli_config(explicit_path: Option<&str>) -> ScribeConfig {
    let loader = Loader::new().with_optional_file(USER_CONFIG_FILE);
    let loader = if let Some(path) = explicit_path {
        loader.with_file(path)
    } else {
        loader
    };

    loader.build().unwrap_or_else(|err| {
        eprintln!("Failed to load configuration: {err}");
        std::process::exit(1);
    })
}

fn apply_config_overrides(config: &mut ScribeConfig, extra_params: &mut HashMap<String, String>) {
    if let Some(raw) = take_override(extra_params, &["title-size"]) {
        config.styles.title.point_size = parse_size_arg("title-size", &raw);
    }
    if let Some(raw) = take_override(extra_params, &["heading-size", "chapter-title-size"]) {
        config.styles.chapter_title.point_size = parse_size_arg("heading-size", &raw);
    }
    if let Some(raw) = take_override(extra_params, &["body-size", "content-size"]) {
        let size = parse_size_arg("body-size", &raw);
        config.styles.chapter_content.point_size = size;
        config.styles.description_content.point_size = size;
    }
    if let Some(raw) = take_override(extra_params, &["line-spacing"]) {
        let spacing = parse_spacing_arg("line-spacing", &raw);
        for role in [
            &mut config.styles.description_content,
            &mut config.styles.chapter_content,
        ] {
            role.line_spacing = spacing;
        }
    }
    if let Some(raw) = take_override(extra_params, &["font-family", "font"]) {
        config.document.font_family = raw;
    }
    if let Some(raw) = take_override(extra_params, &["description-label"]) {
        config.export.description_label = raw;
    }
    if let Some(raw) = take_override(extra_params, &["strip-chapter-prefix"]) {
        config.import.strip_chapter_prefix = parse_bool_arg("strip-chapter-prefix", &raw);
    }
}

fn take_override(map: &mut HashMap<String, String>, keys: &[&str]) -> Option<String> {
    for key in keys {
        if let Some(value) = map.remove(*key) {
            return Some(value);
        }
    }
    None
}

fn parse_bool_arg(flag: &str, raw: &str) -> bool {
    match raw.to_lowercase().as_str() {
        "true" | "1" | "yes" | "y" => true,
        "false" | "0" | "no" | "n" => false,
        other => {
            eprintln!("Invalid boolean value '{other}' for --extra-{flag}");
            std::process::exit(1);
        }
    }
}

fn parse_size_arg(flag: &str, raw: &str) -> i32 {
    match raw.parse::<i32>() {
        Ok(size) if size > 0 => size,
        _ => {
            eprintln!("Invalid point size '{raw}' for --extra-{flag}");
            std::process::exit(1);
        }
    }
}

fn parse_spacing_arg(flag: &str, raw: &str) -> f32 {
    match raw.parse::<f32>() {
        Ok(spacing) if spacing > 0.0 => spacing,
        _ => {
            eprintln!("Invalid line spacing '{raw}' for --extra-{flag}");
            std::process::exit(1);
        }
    }
}
