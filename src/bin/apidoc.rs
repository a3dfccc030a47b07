//! API document CLI
//!
//! Command-line interface for extracting field lists from a type model and
//! rendering endpoint documentation.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use apidoc_schema::{
    controller_endpoints, enumerate_endpoints, generate_json_template_with,
    generate_parameter_table, join_documents, lint_model, load_model_auto, Assembler,
    DocSettings, Endpoint, ExclusionPolicy, Extractor, ItemStatus, Severity, TypeModel, TypeRef,
    ValidateError, TABLE_HEADER,
};
use clap::{ArgAction, Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "apidoc")]
#[command(about = "Generate API parameter documentation from a type model")]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Options shared by every subcommand.
#[derive(Args)]
struct ModelArgs {
    /// Model document: file path or URL (http:// or https://)
    model: String,

    /// Settings file (JSON)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Extra exclusions, e.g. "com.acme.User:password;AuditInfo:*"
    #[arg(long)]
    exclude: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract the field list of a single type
    Fields {
        #[command(flatten)]
        model: ModelArgs,

        /// Type to extract, e.g. "com.acme.Result<com.acme.User>"
        #[arg(long = "type", short = 't')]
        type_name: String,

        /// Output format: table (default), json (template) or list (raw fields)
        #[arg(long, default_value = "table", value_parser = ["table", "json", "list"])]
        format: String,

        /// Render placeholder literals instead of type names in JSON templates
        #[arg(long)]
        example_values: bool,

        /// Omit description comments from JSON templates
        #[arg(long)]
        no_comments: bool,

        /// Output file (stdout if not specified)
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Render Markdown documentation for controller endpoints
    Endpoint {
        #[command(flatten)]
        model: ModelArgs,

        /// Only this controller (qualified or simple name)
        #[arg(long)]
        controller: Option<String>,

        /// Only the endpoint backed by this method
        #[arg(long, requires = "controller")]
        method: Option<String>,

        /// Application name placed in front of request URLs
        #[arg(long)]
        app: Option<String>,

        /// Output pages as a JSON array instead of Markdown
        #[arg(long)]
        json: bool,

        /// Output file (stdout if not specified)
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Lint a model for unresolvable types and stale exclusions
    Lint {
        #[command(flatten)]
        model: ModelArgs,

        /// Output format: text (default) or json
        #[arg(long, default_value = "text", value_parser = ["text", "json"])]
        format: String,

        /// Treat warnings as errors
        #[arg(long)]
        strict: bool,

        /// Suppress progress output, only show errors
        #[arg(long, short)]
        quiet: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Fields {
            model,
            type_name,
            format,
            example_values,
            no_comments,
            output,
        } => run_fields(FieldsArgs {
            model,
            type_name,
            format,
            example_values,
            no_comments,
            output,
        }),

        Commands::Endpoint {
            model,
            controller,
            method,
            app,
            json,
            output,
        } => run_endpoint(EndpointArgs {
            model,
            controller,
            method,
            app,
            json,
            output,
        }),

        Commands::Lint {
            model,
            format,
            strict,
            quiet,
        } => run_lint(&model, &format, strict, quiet),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(code) => ExitCode::from(code),
    }
}

/// `-v` flags win over `RUST_LOG`; with neither, only warnings are shown.
fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Model, settings and effective exclusion policy for one run.
struct Context {
    model: TypeModel,
    settings: DocSettings,
    policy: ExclusionPolicy,
}

fn load_context(args: &ModelArgs) -> Result<Context, u8> {
    let settings = match &args.config {
        Some(path) => DocSettings::load(path).map_err(|e| {
            eprintln!("Error loading settings: {}", e);
            e.exit_code() as u8
        })?,
        None => DocSettings::default(),
    };

    let mut policy = settings.exclusion_policy();
    if let Some(extra) = &args.exclude {
        for (class, spec) in ExclusionPolicy::parse(extra).entries() {
            policy.insert(class, spec.clone());
        }
    }

    let model = load_model_auto(&args.model).map_err(|e| {
        report_load_error(&e);
        e.exit_code() as u8
    })?;
    tracing::info!(
        types = model.types().len(),
        controllers = model.controllers().len(),
        "model loaded"
    );

    Ok(Context {
        model,
        settings,
        policy,
    })
}

fn report_load_error(err: &ValidateError) {
    match err {
        ValidateError::Invalid { errors } => {
            eprintln!("Error: invalid model document:");
            for error in errors {
                eprintln!("  {}", error);
            }
        }
        ValidateError::Load(e) => eprintln!("Error: {}", e),
    }
}

fn write_output(output: Option<&Path>, text: &str) -> Result<(), u8> {
    match output {
        Some(path) => std::fs::write(path, text).map_err(|e| {
            eprintln!("Error writing to {}: {}", path.display(), e);
            3u8
        }),
        None => {
            println!("{}", text);
            Ok(())
        }
    }
}

struct FieldsArgs {
    model: ModelArgs,
    type_name: String,
    format: String,
    example_values: bool,
    no_comments: bool,
    output: Option<PathBuf>,
}

fn run_fields(args: FieldsArgs) -> Result<(), u8> {
    let ty = TypeRef::parse(&args.type_name).map_err(|e| {
        eprintln!("Error: {}", e);
        2u8
    })?;
    let mut ctx = load_context(&args.model)?;
    if args.example_values {
        ctx.settings.example_values = true;
    }
    if args.no_comments {
        ctx.settings.show_json_comments = false;
    }

    let fields = Extractor::new(&ctx.model, &ctx.policy).extract(&ty);
    if fields.is_empty() {
        tracing::warn!(ty = %ty, "no fields extracted");
    }

    let text = match args.format.as_str() {
        "json" => generate_json_template_with(&fields, &ctx.settings.template_options()),
        "list" => serde_json::to_string_pretty(&fields).map_err(|e| {
            eprintln!("Error serializing output: {}", e);
            2u8
        })?,
        _ => format!("{}{}", TABLE_HEADER, generate_parameter_table(&fields)),
    };

    write_output(args.output.as_deref(), text.trim_end())
}

struct EndpointArgs {
    model: ModelArgs,
    controller: Option<String>,
    method: Option<String>,
    app: Option<String>,
    json: bool,
    output: Option<PathBuf>,
}

fn run_endpoint(args: EndpointArgs) -> Result<(), u8> {
    let mut ctx = load_context(&args.model)?;
    if let Some(app) = args.app {
        ctx.settings.application = app;
    }

    let mut endpoints: Vec<Endpoint<'_>> = match &args.controller {
        Some(name) => {
            let controller = ctx.model.controller(name).ok_or_else(|| {
                eprintln!("Error: controller not found: {}", name);
                1u8
            })?;
            controller_endpoints(controller)
        }
        None => enumerate_endpoints(&ctx.model),
    };
    if let Some(method) = &args.method {
        endpoints.retain(|e| e.method.name == *method);
        if endpoints.is_empty() {
            eprintln!("Error: no endpoint method named {}", method);
            return Err(1);
        }
    }
    tracing::info!(count = endpoints.len(), "rendering endpoints");

    let assembler = Assembler::new(&ctx.model, &ctx.policy, &ctx.settings);
    let docs = assembler.render_all(&endpoints);

    let text = if args.json {
        serde_json::to_string_pretty(&docs).map_err(|e| {
            eprintln!("Error serializing output: {}", e);
            2u8
        })?
    } else {
        join_documents(&docs)
    };

    write_output(args.output.as_deref(), text.trim_end())
}

fn run_lint(args: &ModelArgs, format: &str, strict: bool, quiet: bool) -> Result<(), u8> {
    let ctx = load_context(args)?;
    let result = lint_model(&ctx.model, &ctx.policy);

    if format == "json" {
        let json = serde_json::to_string_pretty(&result).map_err(|e| {
            eprintln!("Error serializing output: {}", e);
            2u8
        })?;
        println!("{}", json);
    } else {
        if !quiet {
            println!("Linting {} ...\n", args.model);
        }

        for item in &result.results {
            let status_icon = match item.status {
                ItemStatus::Ok => "\x1b[32m✓\x1b[0m",
                ItemStatus::Warning => "\x1b[33m⚠\x1b[0m",
                ItemStatus::Error => "\x1b[31m✗\x1b[0m",
            };
            if !quiet || item.status == ItemStatus::Error {
                println!("  {} {}", status_icon, item.item);
            }

            for diag in &item.diagnostics {
                let (color, label) = match diag.severity {
                    Severity::Error => ("\x1b[31m", "error"),
                    Severity::Warning => ("\x1b[33m", "warning"),
                };
                if !quiet || diag.severity == Severity::Error {
                    println!(
                        "    {}{}[{}]\x1b[0m: {} - {}",
                        color, label, diag.code, diag.path, diag.message
                    );
                }
            }
        }

        println!();
        if result.passes(strict) {
            println!(
                "\x1b[32m✓ {} types, {} endpoints checked, all passed\x1b[0m",
                result.types_checked, result.endpoints_checked
            );
        } else {
            println!(
                "\x1b[31m✗ {} types, {} endpoints checked ({} errors, {} warnings)\x1b[0m",
                result.types_checked, result.endpoints_checked, result.errors, result.warnings
            );
        }
    }

    if result.passes(strict) {
        Ok(())
    } else {
        Err(1)
    }
}
