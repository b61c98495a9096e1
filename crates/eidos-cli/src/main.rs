//! `eidos` - decode a multipart/form-data body from the command line.
//!
//! ```text
//! eidos [OPTIONS] --content-type <VALUE> [INPUT]
//!
//! Arguments:
//!   [INPUT]                 Raw body file; `-` or omitted reads stdin
//!
//! Options:
//!   -t, --content-type      Content-Type header of the request
//!   -X, --method            HTTP method (default PUT)
//!   -c, --config            Configuration file (TOML or JSON)
//!       --force             Decode regardless of method
//!       --save-dir          Copy stored uploads here before cleanup
//!       --pretty            Pretty-print the JSON output
//! ```
//!
//! The decoded form is printed to stdout as JSON in the native shape:
//! `{"fields": {...}, "files": {"name": {name, type, tmp_name, error, size}}}`.
//! Temporary upload files are removed before the process exits, so
//! `tmp_name` only points at a live file when `--save-dir` is given, in which
//! case it is rewritten to the saved copy.
//!
//! Logs go to stderr. Configuration is layered: defaults, then `--config`,
//! then `EIDOS__SECTION__KEY` environment variables (a `.env` file is
//! honored).
//!
//! | Code | Meaning |
//! |------|---------|
//! | 0 | Success, including requests that were not decoded |
//! | 1 | Error (I/O failure, bad configuration, bad arguments) |

use std::collections::HashMap;
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process;

use anyhow::{bail, Context};
use clap::Parser;
use eidos_config::{ConfigLoader, EidosConfig};
use eidos_middleware::stages::should_parse;
use eidos_multipart::{MultipartParser, ParseResult, UploadScope};
use http::Method;
use serde_json::Value;

/// Decode a multipart/form-data request body.
#[derive(Parser, Debug)]
#[command(name = "eidos", version, about = "Decode multipart/form-data bodies sent with PUT or PATCH")]
struct Cli {
    /// Raw request body file. `-` or omitted reads stdin.
    input: Option<PathBuf>,

    /// Content-Type header value, including the boundary parameter.
    #[arg(short = 't', long)]
    content_type: String,

    /// HTTP method of the request.
    #[arg(short = 'X', long, default_value = "PUT")]
    method: String,

    /// Configuration file (TOML or JSON).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Decode even when the method is not PUT or PATCH.
    #[arg(long)]
    force: bool,

    /// Copy stored uploads into this directory before they are removed.
    #[arg(long)]
    save_dir: Option<PathBuf>,

    /// Pretty-print the JSON output.
    #[arg(long)]
    pretty: bool,
}

fn main() {
    let cli = Cli::parse();

    if let Err(err) = run(&cli) {
        eprintln!("error: {err:#}");
        process::exit(1);
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let config = load_config(cli.config.as_deref())?;
    eidos_telemetry::init_logging(&config.logging.log_config())
        .context("initializing logging")?;

    let body = read_body(cli.input.as_deref())?;
    let output = decode(cli, &config, &body)?;

    let rendered = if cli.pretty {
        serde_json::to_string_pretty(&output)?
    } else {
        serde_json::to_string(&output)?
    };

    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{rendered}").context("writing output")?;
    Ok(())
}

fn load_config(path: Option<&Path>) -> anyhow::Result<EidosConfig> {
    let mut loader = ConfigLoader::new().with_dotenv()?;
    if let Some(path) = path {
        loader = loader.with_file(path)?;
    }
    let config = loader.with_env_prefix("EIDOS").load()?;
    Ok(config)
}

fn read_body(input: Option<&Path>) -> anyhow::Result<Vec<u8>> {
    match input {
        Some(path) if path != Path::new("-") => {
            fs::read(path).with_context(|| format!("reading {}", path.display()))
        }
        _ => {
            let mut body = Vec::new();
            io::stdin()
                .lock()
                .read_to_end(&mut body)
                .context("reading stdin")?;
            Ok(body)
        }
    }
}

/// Decodes `body` and returns the JSON to print.
fn decode(cli: &Cli, config: &EidosConfig, body: &[u8]) -> anyhow::Result<Value> {
    let method = Method::from_bytes(cli.method.to_ascii_uppercase().as_bytes())
        .with_context(|| format!("invalid HTTP method '{}'", cli.method))?;

    if !cli.force && !should_parse(&method, Some(&cli.content_type)) {
        tracing::warn!(
            http.method = %method,
            content_type = %cli.content_type,
            "request is not a PUT/PATCH multipart body, nothing decoded (use --force)"
        );
        return Ok(serde_json::to_value(ParseResult::new())?);
    }

    let parser = MultipartParser::new(config.parser_config()?);
    let mut uploads = UploadScope::new();
    let form = parser.parse(body, Some(&cli.content_type), &mut uploads);

    let mut output = serde_json::to_value(&form)?;
    if let Some(dir) = &cli.save_dir {
        let saved = save_uploads(&form, dir)?;
        rewrite_tmp_names(&mut output, &saved);
    }

    uploads.close().context("removing temporary upload files")?;
    Ok(output)
}

// Returns temp path -> saved path.
fn save_uploads(form: &ParseResult, dir: &Path) -> anyhow::Result<HashMap<String, String>> {
    if !dir.is_dir() {
        bail!("save directory {} does not exist", dir.display());
    }

    let mut saved = HashMap::new();
    for (_, file) in form.files.leaves() {
        let Some(temp) = file.path() else {
            continue;
        };
        let Some(name) = temp.file_name() else {
            continue;
        };

        let target = dir.join(name);
        fs::copy(temp, &target)
            .with_context(|| format!("saving {} to {}", file.original_name, target.display()))?;
        tracing::info!(file_name = %file.original_name, path = %target.display(), "saved upload");

        saved.insert(temp.display().to_string(), target.display().to_string());
    }

    Ok(saved)
}

fn rewrite_tmp_names(value: &mut Value, saved: &HashMap<String, String>) {
    let Some(map) = value.as_object_mut() else {
        return;
    };

    if let Some(Value::String(tmp)) = map.get_mut("tmp_name") {
        if let Some(target) = saved.get(tmp.as_str()) {
            *tmp = target.clone();
        }
    }
    for child in map.values_mut() {
        rewrite_tmp_names(child, saved);
    }
}
