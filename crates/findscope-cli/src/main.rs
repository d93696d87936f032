use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use findscope_core::{ParamField, ParseMode, QueryParameter, UNKNOWN};
use findscope_engine::{
    build_report, inject_with, search_service_debug_from_str, AnalyzerConfig, DebugTextAnalyzer,
    InjectConfig, ParameterSet,
};
use std::io::Read;
use std::time::Instant;

mod envelope;

use envelope::{add_envelope_fields, error_payload, warning_hints_from, ErrorCode};

#[derive(Parser, Debug)]
#[command(name = "findscope")]
#[command(
    about = "Prepare Find API request URLs and analyze their debug output",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Force findDebug and the required fl fields onto a request URL.
    Inject(InjectCmd),
    /// List a URL's parameters, apply edits, and print the recomposed URL.
    Params(ParamsCmd),
    /// Analyze the searchServiceDebug section of a response (json file or stdin).
    Analyze(AnalyzeCmd),
    /// Show the effective configuration (json).
    Doctor(DoctorCmd),
    /// Print version info.
    Version(VersionCmd),
}

#[derive(clap::Args, Debug)]
struct InjectCmd {
    /// Request URL (scheme optional).
    url: String,
    /// Output format: json|text
    #[arg(long = "output", alias = "format", env = "FINDSCOPE_OUTPUT", default_value = "json")]
    output: String,
}

#[derive(clap::Args, Debug)]
struct ParamsCmd {
    /// Request URL (scheme optional).
    url: String,
    /// Set KEY=VALUE (updates the first record with KEY, or adds one). Repeatable.
    #[arg(long = "set", value_name = "KEY=VALUE")]
    set: Vec<String>,
    /// Blank the key of the first record named KEY (it is then omitted). Repeatable.
    #[arg(long = "unset", value_name = "KEY")]
    unset: Vec<String>,
    /// Delete the first record named KEY. Repeatable.
    #[arg(long = "drop", value_name = "KEY")]
    drop: Vec<String>,
    /// Replace the base URL (scheme + host + path).
    #[arg(long)]
    base: Option<String>,
    /// Do not run the recomposed URL through `inject`.
    #[arg(long, action = clap::ArgAction::SetTrue)]
    no_inject: bool,
    /// Output format: json|text
    #[arg(long = "output", alias = "format", env = "FINDSCOPE_OUTPUT", default_value = "json")]
    output: String,
}

#[derive(clap::Args, Debug)]
struct AnalyzeCmd {
    /// Response JSON path. Reads stdin when omitted.
    #[arg(long)]
    file: Option<std::path::PathBuf>,
    /// Output format: json|text
    #[arg(long = "output", alias = "format", env = "FINDSCOPE_OUTPUT", default_value = "json")]
    output: String,
}

#[derive(clap::Args, Debug)]
struct DoctorCmd {}

#[derive(clap::Args, Debug)]
struct VersionCmd {
    /// Output format: json|text
    #[arg(long = "output", alias = "format", env = "FINDSCOPE_OUTPUT", default_value = "json")]
    output: String,
}

fn init_tracing() {
    let filter = std::env::var("FINDSCOPE_LOG")
        .or_else(|_| std::env::var("RUST_LOG"))
        .unwrap_or_else(|_| "warn".to_string());
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .try_init();
}

fn is_text(output: &str) -> bool {
    output.eq_ignore_ascii_case("text")
}

/// Print one result. Returns the process exit code.
fn emit(
    output: &str,
    kind: &str,
    started: Instant,
    mut payload: serde_json::Value,
    text: String,
) -> i32 {
    let ok = payload["ok"].as_bool().unwrap_or(false);
    if is_text(output) {
        if ok {
            println!("{text}");
        } else {
            let msg = payload["error"]["message"].as_str().unwrap_or("error");
            let hint = payload["error"]["hint"].as_str().unwrap_or("");
            eprintln!("error: {msg}");
            if !hint.is_empty() {
                eprintln!("hint: {hint}");
            }
        }
    } else {
        add_envelope_fields(&mut payload, kind, started.elapsed().as_millis());
        println!("{payload}");
    }
    if ok {
        0
    } else {
        1
    }
}

fn core_error(e: &findscope_core::Error) -> serde_json::Value {
    error_payload(ErrorCode::from(e), e)
}

fn run_inject(args: InjectCmd) -> i32 {
    let started = Instant::now();
    let cfg = InjectConfig::from_env();
    match inject_with(&args.url, &cfg) {
        Ok(url) => emit(
            &args.output,
            "inject",
            started,
            serde_json::json!({ "ok": true, "input": args.url, "url": url }),
            url.clone(),
        ),
        Err(e) => {
            tracing::debug!(error = %e, "inject failed");
            emit(&args.output, "inject", started, core_error(&e), String::new())
        }
    }
}

fn split_assignment(s: &str) -> Option<(&str, &str)> {
    let (k, v) = s.split_once('=')?;
    let k = k.trim();
    (!k.is_empty()).then_some((k, v))
}

fn apply_edits(
    set: &mut ParameterSet,
    args: &ParamsCmd,
) -> std::result::Result<(), serde_json::Value> {
    if let Some(base) = &args.base {
        set.set_base_url(base.trim());
    }
    for a in &args.set {
        let (k, v) = split_assignment(a).ok_or_else(|| {
            error_payload(
                ErrorCode::InvalidParams,
                format!("--set expects KEY=VALUE, got {a:?}"),
            )
        })?;
        let id = match set.find_key(k) {
            Some(id) => id,
            None => {
                let id = set.add_parameter();
                set.update_parameter(id, ParamField::Key, k)
                    .map_err(|e| core_error(&e))?;
                id
            }
        };
        set.update_parameter(id, ParamField::Value, v)
            .map_err(|e| core_error(&e))?;
    }
    for k in &args.unset {
        let id = set.find_key(k.trim()).ok_or_else(|| {
            error_payload(ErrorCode::UnknownParameter, format!("no parameter named {k:?}"))
        })?;
        set.update_parameter(id, ParamField::Key, "")
            .map_err(|e| core_error(&e))?;
    }
    for k in &args.drop {
        let id = set.find_key(k.trim()).ok_or_else(|| {
            error_payload(ErrorCode::UnknownParameter, format!("no parameter named {k:?}"))
        })?;
        set.remove_parameter(id).map_err(|e| core_error(&e))?;
    }
    Ok(())
}

fn param_json(p: &QueryParameter) -> serde_json::Value {
    serde_json::json!({
        "id": p.id,
        "key": p.key,
        "value": p.value,
        "original_key": p.original_key,
        "original_value": p.original_value,
        "status": p.status(),
    })
}

fn param_text(p: &QueryParameter) -> String {
    let status = p.status();
    let mut line = format!("{:<9} {}={}", status.as_str(), p.key, p.value);
    if status == findscope_core::ParameterStatus::Modified {
        line.push_str(&format!("  (original: {}={})", p.original_key, p.original_value));
    }
    line
}

fn run_params(args: ParamsCmd) -> i32 {
    let started = Instant::now();
    if args.url.trim().is_empty() {
        return emit(
            &args.output,
            "params",
            started,
            core_error(&findscope_core::Error::EmptyUrl),
            String::new(),
        );
    }

    let mut set = ParameterSet::open(&args.url);
    let mut warnings: Vec<&'static str> = Vec::new();
    if set.mode() == ParseMode::Lenient {
        warnings.push("lenient_parse");
    }
    if let Err(payload) = apply_edits(&mut set, &args) {
        return emit(&args.output, "params", started, payload, String::new());
    }

    let composed = match set.compose() {
        Ok(u) => u,
        Err(e) => return emit(&args.output, "params", started, core_error(&e), String::new()),
    };
    let final_url = if args.no_inject {
        None
    } else {
        match inject_with(&composed, &InjectConfig::from_env()) {
            Ok(u) => Some(u),
            Err(e) => {
                return emit(&args.output, "params", started, core_error(&e), String::new())
            }
        }
    };

    let mut text: Vec<String> = vec![format!("base: {}", set.base_url())];
    text.extend(set.parameters().iter().map(param_text));
    text.push(format!("preview: {}", set.preview()));
    text.push(format!("composed: {composed}"));
    if let Some(u) = &final_url {
        text.push(format!("final: {u}"));
    }

    let payload = serde_json::json!({
        "ok": true,
        "source_url": set.source_url(),
        "mode": set.mode(),
        "base_url": set.base_url(),
        "dirty": set.is_dirty(),
        "parameters": set.parameters().iter().map(param_json).collect::<Vec<_>>(),
        "preview_url": set.preview(),
        "composed_url": composed,
        "final_url": final_url,
        "warnings": warnings,
        "warning_hints": warning_hints_from(&warnings),
    });
    emit(&args.output, "params", started, payload, text.join("\n"))
}

fn read_body(file: Option<&std::path::Path>) -> Result<String> {
    match file {
        Some(p) => std::fs::read_to_string(p).with_context(|| format!("read {}", p.display())),
        None => {
            let mut s = String::new();
            std::io::stdin()
                .read_to_string(&mut s)
                .context("read response from stdin")?;
            Ok(s)
        }
    }
}

fn run_analyze(args: AnalyzeCmd) -> i32 {
    let started = Instant::now();
    let body = match read_body(args.file.as_deref()) {
        Ok(b) => b,
        Err(e) => {
            let payload = error_payload(ErrorCode::UnexpectedError, format!("{e:#}"));
            return emit(&args.output, "analyze", started, payload, String::new());
        }
    };
    let dbg = match search_service_debug_from_str(&body) {
        Ok(d) => d,
        Err(e) => return emit(&args.output, "analyze", started, core_error(&e), String::new()),
    };

    let Some(dbg) = dbg else {
        let warnings = ["no_debug_section"];
        let payload = serde_json::json!({
            "ok": true,
            "report": null,
            "warnings": warnings,
            "warning_hints": warning_hints_from(&warnings),
        });
        return emit(
            &args.output,
            "analyze",
            started,
            payload,
            "no searchServiceDebug section in response".to_string(),
        );
    };

    let analyzer = DebugTextAnalyzer::new(AnalyzerConfig::from_env());
    let report = build_report(&dbg, &analyzer);
    let mut warnings: Vec<&'static str> = Vec::new();
    if report.hybrid_search.is_empty() {
        warnings.push("no_hybrid_search_lines");
    } else if report.analysis.vector_algorithm == UNKNOWN {
        warnings.push("vector_algorithm_unknown");
    }

    let a = &report.analysis;
    let mut text = vec![
        format!("Hybrid Search Flow: {}", a.hybrid_search_flow),
        format!("Vector Algorithm: {}", a.vector_algorithm),
        format!("Min Return Value: {}", a.min_return_value),
    ];
    if let Some(n) = &a.top_results {
        text.push(format!("Top Results: {n}"));
    }
    if let Some(s) = &report.summary {
        text.push(format!("Vector Search Configuration: {s}"));
    }
    if !report.request_params.is_empty() {
        text.push("Search Request:".to_string());
        text.extend(
            report
                .request_params
                .iter()
                .map(|r| format!("  {}: {}", r.key, r.value)),
        );
    }

    let payload = serde_json::json!({
        "ok": true,
        "report": report,
        "warnings": warnings,
        "warning_hints": warning_hints_from(&warnings),
    });
    emit(&args.output, "analyze", started, payload, text.join("\n"))
}

fn run_doctor() -> i32 {
    let started = Instant::now();
    let vars = [
        "FINDSCOPE_FIND_DEBUG",
        "FINDSCOPE_REQUIRED_FIELDS",
        "FINDSCOPE_VECTOR_ALGORITHMS",
        "FINDSCOPE_OUTPUT",
        "FINDSCOPE_LOG",
    ];
    let env: serde_json::Map<String, serde_json::Value> = vars
        .iter()
        .map(|k| (k.to_string(), serde_json::json!(std::env::var(k).is_ok())))
        .collect();
    let payload = serde_json::json!({
        "ok": true,
        "inject": InjectConfig::from_env(),
        "analyzer": AnalyzerConfig::from_env(),
        "env_set": env,
    });
    emit("json", "doctor", started, payload, String::new())
}

fn run_version(args: VersionCmd) -> i32 {
    let started = Instant::now();
    let payload = serde_json::json!({
        "ok": true,
        "name": "findscope",
        "version": env!("CARGO_PKG_VERSION"),
    });
    let text = format!("findscope {}", env!("CARGO_PKG_VERSION"));
    emit(&args.output, "version", started, payload, text)
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let code = match cli.command {
        Commands::Inject(args) => run_inject(args),
        Commands::Params(args) => run_params(args),
        Commands::Analyze(args) => run_analyze(args),
        Commands::Doctor(_) => run_doctor(),
        Commands::Version(args) => run_version(args),
    };
    if code != 0 {
        std::process::exit(code);
    }
    Ok(())
}
