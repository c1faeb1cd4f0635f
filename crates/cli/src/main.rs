//! `bosun` binary

use bosun::error::CommandError;
use bosun_core::Error;
use clap::Parser;
use std::process::ExitCode;

fn main() -> ExitCode {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(false)
                .unicode(true)
                .context_lines(2)
                .tab_width(4)
                .build(),
        )
    }))
    .ok();

    let cli = bosun::Cli::parse();
    let Err(e) = bosun::run(cli) else {
        return ExitCode::SUCCESS;
    };

    // Failed actions were already reported with their output
    if let Some(CommandError::Bosun(hook_failed @ Error::HookFailed { .. })) =
        e.downcast_ref::<CommandError>()
    {
        eprintln!("bosun: {hook_failed}");
    } else {
        let report = miette::Report::msg(format!("{e:#}"));
        eprintln!("{report:?}");
    }
    ExitCode::FAILURE
}
