use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use tsgen::{Manifest, TsgenConfig, TypeGen, Warning};

#[derive(Parser)]
#[command(
    name = "tsgen",
    version,
    about = "Generate TypeScript declarations and typed API/hub client stubs from type metadata"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate the three artifacts from a descriptor manifest.
    Build {
        /// Project configuration file.
        #[arg(long, default_value = "tsgen.toml")]
        config: PathBuf,
        /// Descriptor manifest JSON (overrides the config file).
        #[arg(long)]
        manifest: Option<PathBuf>,
        /// Output directory (overrides the config file).
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();
    let result = match cli.command {
        Command::Build {
            config,
            manifest,
            out,
        } => build(&config, manifest, out),
    };
    if let Err(err) = result {
        report_error(&err);
        std::process::exit(1);
    }
}

fn build(
    config_path: &Path,
    manifest_arg: Option<PathBuf>,
    out_arg: Option<PathBuf>,
) -> anyhow::Result<()> {
    let config = TsgenConfig::load_from_path(config_path).unwrap_or_default();

    let manifest_path = manifest_arg
        .or_else(|| config.manifest.as_ref().map(PathBuf::from))
        .context("no descriptor manifest given (pass --manifest or set `manifest` in tsgen.toml)")?;
    let data = fs::read_to_string(&manifest_path)
        .with_context(|| format!("failed to read {}", manifest_path.display()))?;
    let manifest: Manifest = serde_json::from_str(&data)
        .with_context(|| format!("failed to parse {}", manifest_path.display()))?;

    let mut gen = TypeGen::new();
    for t in manifest.types {
        gen = gen.add_type(t);
    }
    for s in manifest.services {
        gen = gen.add_service(s);
    }
    for h in manifest.hubs {
        gen = gen.add_hub(h);
    }

    let generate = &config.generate;
    if let Some(const_enums) = generate.const_enums {
        gen = gen.with_const_enums(const_enums);
    }
    if let Some(ns) = &generate.global_namespace {
        gen = gen.with_global_namespace(ns.clone());
    }
    if let Some(promise) = &generate.promise_type {
        gen = gen.with_promise_type(promise.clone());
    }
    if let Some(overrides) = &generate.scalar_overrides {
        for (name, rendered) in overrides {
            gen = gen.with_scalar_override(name.clone(), rendered.clone());
        }
    }
    if let Some(reserved) = &generate.reserved_namespaces {
        for ns in reserved {
            gen = gen.with_reserved_namespace(ns.clone());
        }
    }
    if let Some(prefix) = generate.url_prefix.clone() {
        gen = gen.with_url_rewriter(move |url| {
            format!(
                "{}/{}",
                prefix.trim_end_matches('/'),
                url.trim_start_matches('/')
            )
        });
    }

    let out_dir = out_arg.unwrap_or_else(|| PathBuf::from(config.output.dir()));
    let definitions = out_dir.join(config.output.definitions_name());
    let services = out_dir.join(config.output.services_name());
    let enums = out_dir.join(config.output.enums_name());

    let output = gen.build_files(definitions.clone(), services.clone(), enums.clone())?;

    report_warnings(&output.warnings);
    println!("Wrote {}", definitions.display());
    println!("Wrote {}", services.display());
    println!("Wrote {}", enums.display());
    Ok(())
}

fn stderr_stream() -> StandardStream {
    let choice = if atty::is(atty::Stream::Stderr) {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    };
    StandardStream::stderr(choice)
}

fn report_warnings(warnings: &[Warning]) {
    let mut stderr = stderr_stream();
    for warning in warnings {
        let _ = stderr.set_color(ColorSpec::new().set_fg(Some(Color::Yellow)).set_bold(true));
        let _ = write!(stderr, "warning");
        let _ = stderr.reset();
        let _ = writeln!(stderr, ": {}", warning.message);
    }
}

fn report_error(err: &anyhow::Error) {
    let mut stderr = stderr_stream();
    let _ = stderr.set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true));
    let _ = write!(stderr, "error");
    let _ = stderr.reset();
    let _ = writeln!(stderr, ": {:#}", err);
}
