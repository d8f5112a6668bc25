use std::{process::ExitCode, time::Duration};

use clap::Parser;

use crate::{
    cli::{Cli, Command, OutputArgs},
    extract::{extract, is_bot_protected},
    page::RawPage,
    source::{Source, proxy::ScholarProxy},
    status::Status,
};

mod cli;
mod extract;
mod output;
mod page;
mod record;
mod source;
mod status;

fn main() -> ExitCode {
    let args = Cli::parse();
    let status = Status::new(args.quiet);
    match run(args.command, status) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            status.error(&e);
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command, status: Status) -> anyhow::Result<()> {
    match command {
        Command::Fetch {
            profile,
            proxy,
            timeout,
            save_raw,
            output,
        } => {
            let src = ScholarProxy::new(&profile.user, proxy, Duration::from_secs(timeout))
                .save_raw_to(save_raw);
            let spinner = status.spinner(&src.describe());
            let page = src.load();
            spinner.finish_and_clear();
            emit(&page?, &src.describe(), &profile.user, &output, status)
        }
        Command::Parse {
            input,
            profile,
            output,
        } => {
            let page = input.load()?;
            emit(&page, &input.describe(), &profile.user, &output, status)
        }
    }
}

fn emit(
    page: &RawPage,
    from: &str,
    user: &str,
    out: &OutputArgs,
    status: Status,
) -> anyhow::Result<()> {
    let result = extract(page);
    let profile = source::proxy::profile_url(user)?;
    let rendered = output::render(&result, &profile, out.format, out.compact)?;
    if !rendered.is_empty() {
        println!("{}", rendered.trim_end());
    }

    if is_bot_protected(page) {
        status.bot_protected(from);
    } else {
        status.extracted(result.len(), from);
    }
    Ok(())
}
