use clap::Parser;
use miette::Result;
use tsa::cli::helpers::load_config;
use tsa::cli::{Cli, Commands};
use tsa::core::logging;

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
    let mut global = cli.global;

    let (config, problems) = load_config(&global);
    logging::init(&logging::level_for(
        global.verbose,
        global.quiet,
        config.log_level.as_deref(),
    ));
    for problem in &problems {
        tracing::warn!("{}", problem);
    }
    global.config = config;

    match cli.command {
        Commands::Init(args) => tsa::cli::commands::init::run(args),
        Commands::Project(cmd) => tsa::cli::commands::project::run(cmd, &global),
        Commands::Section(cmd) => tsa::cli::commands::section::run(cmd, &global),
        Commands::Span(cmd) => tsa::cli::commands::span::run(cmd, &global),
        Commands::Assess(args) => tsa::cli::commands::assess::run(args, &global),
        Commands::Report(args) => tsa::cli::commands::report::run(args, &global),
        Commands::Score(args) => tsa::cli::commands::score::run(args, &global),
        Commands::Config(cmd) => tsa::cli::commands::config::run(cmd, &global),
        Commands::Completions(args) => tsa::cli::commands::completions::run(args),
    }
}
