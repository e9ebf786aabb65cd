use clap::Parser;
use miette::Result;
use curtain::cli::{logging, Cli, Commands};

fn main() -> Result<()> {
    // Reset SIGPIPE to default behavior so piping into `head` exits quietly
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
    logging::init(global.verbose, global.quiet);

    match cli.command {
        Commands::Calc(args) => curtain::cli::commands::calc::run(args, &global),
        Commands::Batch(args) => curtain::cli::commands::batch::run(args, &global),
        Commands::Styles(args) => curtain::cli::commands::styles::run(args, &global),
        Commands::Config(cmd) => curtain::cli::commands::config::run(cmd, &global),
        Commands::Completions(args) => curtain::cli::commands::completions::run(args),
    }
}
