use clap::Parser;
use miette::Result;
use partmaster::cli::{Cli, Commands, GlobalOpts};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() -> Result<()> {
    // Reset SIGPIPE to default behavior (terminate silently) for proper Unix piping.
    // Without this, piping to `head`, `grep -q`, etc. causes a panic on broken pipe.
    #[cfg(unix)]
    {
        unsafe {
            libc::signal(libc::SIGPIPE, libc::SIG_DFL);
        }
    }
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .tab_width(4)
                .build(),
        )
    }))?;

    let cli = Cli::parse();
    let global = cli.global;
    init_tracing(&global, matches!(cli.command, Commands::Serve(_)));

    match cli.command {
        Commands::Serve(args) => partmaster::cli::commands::serve::run(args, &global),
        Commands::Categories(args) => partmaster::cli::commands::categories::run(args, &global),
        Commands::Parts(args) => partmaster::cli::commands::parts::run(args, &global),
        Commands::Show(args) => partmaster::cli::commands::show::run(args, &global),
        Commands::Sources(args) => partmaster::cli::commands::sources::run(args, &global),
        Commands::Update(args) => partmaster::cli::commands::update::run(args, &global),
        Commands::Revise(args) => partmaster::cli::commands::revise::run(args, &global),
        Commands::Check(args) => partmaster::cli::commands::check::run(args, &global),
        Commands::Completions(args) => partmaster::cli::commands::completions::run(args),
    }
}

/// Log to stderr; `RUST_LOG` overrides the level picked from the flags
fn init_tracing(global: &GlobalOpts, serving: bool) {
    let level = if global.verbose {
        "debug"
    } else if global.quiet {
        "error"
    } else if serving {
        "info"
    } else {
        "warn"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .init();
}
