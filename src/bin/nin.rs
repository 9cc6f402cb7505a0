use std::io::Write as _;
use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};

/// Environment variable holding the log filter.
const LOG_ENV: &str = "NIN_LOG";

#[derive(Parser, Debug)]
#[command(name = "nin", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build `bin/demo.html` and `bin/demo.png.html` for a project.
    Compile(CompileArgs),
    /// Print the encoded asset module for a directory.
    Manifest(ManifestArgs),
    /// Print the generated shader module for a project.
    Shaders(ShadersArgs),
}

#[derive(Parser, Debug)]
struct CompileArgs {
    /// Project directory.
    project: PathBuf,

    /// Engine directory.
    #[arg(long, default_value = "engine")]
    engine: PathBuf,

    /// Losslessly optimize PNG assets (uses `optipng` when on PATH).
    #[arg(long)]
    optimize_images: bool,

    /// Script compiler to run.
    #[arg(long, value_enum, default_value_t = CompilerChoice::Closure)]
    compiler: CompilerChoice,

    /// Closure Compiler executable (overrides `NIN_CLOSURE_COMPILER`).
    #[arg(long)]
    compiler_bin: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct ManifestArgs {
    /// Asset directory.
    dir: PathBuf,

    /// Losslessly optimize PNG assets.
    #[arg(long)]
    optimize_images: bool,
}

#[derive(Parser, Debug)]
struct ShadersArgs {
    /// Project directory.
    project: PathBuf,

    /// Engine directory.
    #[arg(long, default_value = "engine")]
    engine: PathBuf,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum CompilerChoice {
    /// Google Closure Compiler.
    Closure,
    /// Plain concatenation, no minification.
    Concat,
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    match cli.cmd {
        Command::Compile(args) => cmd_compile(args),
        Command::Manifest(args) => cmd_manifest(args),
        Command::Shaders(args) => cmd_shaders(args),
    }
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn make_compiler(
    choice: CompilerChoice,
    program: Option<PathBuf>,
) -> Box<dyn nin::ScriptCompiler> {
    match choice {
        CompilerChoice::Closure => {
            let mut opts = nin::ClosureCompilerOpts::default();
            if let Some(program) = program {
                opts.program = program;
            }
            Box::new(nin::ClosureCompiler::new(opts))
        }
        CompilerChoice::Concat => Box::new(nin::ConcatCompiler),
    }
}

fn cmd_compile(args: CompileArgs) -> anyhow::Result<()> {
    let optimizer: Box<dyn nin::ImageOptimizer> = if args.optimize_images {
        nin::default_optimizer()
    } else {
        Box::new(nin::NoopOptimizer)
    };
    let services = nin::BuildServices {
        optimizer,
        compiler: make_compiler(args.compiler, args.compiler_bin),
        ..Default::default()
    };
    let options = nin::BuildOptions {
        optimize_images: args.optimize_images,
        ..Default::default()
    };

    let report = nin::compile_project(&args.project, &args.engine, options, services)
        .with_context(|| format!("build '{}'", args.project.display()))?;

    for path in &report.optimizer_fallbacks {
        eprintln!("packed unoptimized: {path}");
    }
    eprintln!(
        "{} assets, {} shader effects, {} bytes saved by image optimization",
        report.assets, report.shader_effects, report.optimized_bytes_saved
    );
    eprintln!("wrote {}", report.html_path.display());
    eprintln!("wrote {}", report.compressed_path.display());
    Ok(())
}

fn cmd_manifest(args: ManifestArgs) -> anyhow::Result<()> {
    let optimizer: Box<dyn nin::ImageOptimizer> = if args.optimize_images {
        nin::default_optimizer()
    } else {
        Box::new(nin::NoopOptimizer)
    };
    let collected = nin::collect_assets(
        &args.dir,
        &nin::CollectOptions {
            optimize_images: args.optimize_images,
        },
        optimizer.as_ref(),
    )?;

    let mut out = std::io::stdout().lock();
    out.write_all(collected.manifest.to_module().as_bytes())
        .context("write asset module to stdout")?;
    out.write_all(b"\n").context("write asset module to stdout")?;
    eprintln!(
        "{} assets, {} encoded bytes",
        collected.manifest.len(),
        collected.manifest.encoded_len()
    );
    Ok(())
}

fn cmd_shaders(args: ShadersArgs) -> anyhow::Result<()> {
    let project = nin::ProjectLayout::open(&args.project)?;
    let engine = nin::EngineLayout::new(&args.engine);
    let manifest = nin::generate_shaders(&project.shaders_dir(), &engine.shaders_dir())?;

    std::io::stdout()
        .lock()
        .write_all(manifest.to_module()?.as_bytes())
        .context("write shader module to stdout")?;
    Ok(())
}
