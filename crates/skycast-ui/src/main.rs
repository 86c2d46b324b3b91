mod bootstrap;
mod command;
mod render;

use std::future::Future;

use anyhow::{Context, Result};
use skycast_core::{AppError, Config};
use skycast_session::{Outcome, PendingFetch, Session};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines};

use command::Command;
use render::RenderOptions;

#[tokio::main]
async fn main() -> Result<()> {
    skycast_core::init()?;

    let (config, _warnings) = Config::load_validated()
        .map_err(|e| {
            let e = AppError::from(e);
            eprintln!("{}", e.user_message());
            e
        })
        .context("Failed to load configuration")?;
    let options = bootstrap::render_options(&config);
    let mut session = bootstrap::build_session(&config)?;

    tracing::info!("SkyCast started");
    println!("{}", render::HELP);
    show(&mut session, &options);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = match next_input(&mut lines, tokio::signal::ctrl_c()).await? {
            Input::Line(line) => line,
            Input::Interrupt | Input::Closed => break,
        };

        let command = match Command::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                println!("{e}");
                continue;
            }
        };

        match command {
            Command::Quit => break,
            Command::Help => {
                println!("{}", render::HELP);
                continue;
            }
            Command::Search => session.open_search(),
            Command::Back => session.go_back(),
            Command::Home => session.go_home(),
            Command::Clear => session.clear_recent(),
            Command::Find(city) => {
                let pending = session.begin_query(&city);
                lookup(&mut session, pending, tokio::signal::ctrl_c()).await;
            }
            Command::Recent(n) => match session.recent_at(n - 1).map(str::to_string) {
                Some(name) => {
                    let pending = session.begin_query(&name);
                    lookup(&mut session, pending, tokio::signal::ctrl_c()).await;
                }
                None => {
                    println!("No recent search #{n}");
                    continue;
                }
            },
            Command::Locate => {
                let pending = session.begin_locate();
                lookup(&mut session, pending, tokio::signal::ctrl_c()).await;
            }
        }

        show(&mut session, &options);
    }

    tracing::info!("SkyCast exiting");
    Ok(())
}

/// Print the screen. An error is shown once, then dismissed.
fn show(session: &mut Session, options: &RenderOptions) {
    let now = chrono::Utc::now().timestamp();
    println!("{}", render::render(session, options, now));
    session.dismiss_error();
}

#[derive(Debug, PartialEq, Eq)]
enum Input {
    Line(String),
    /// Ctrl-C at the prompt
    Interrupt,
    /// End of input
    Closed,
}

/// Wait for the next line or an interrupt, whichever comes first.
///
/// An interrupt source that fails to register is ignored.
async fn next_input<R, I>(lines: &mut Lines<R>, interrupt: I) -> Result<Input>
where
    R: AsyncBufRead + Unpin,
    I: Future<Output = std::io::Result<()>>,
{
    tokio::select! {
        line = lines.next_line() => Ok(match line.context("Failed to read input")? {
            Some(line) => Input::Line(line),
            None => Input::Closed,
        }),
        Ok(()) = interrupt => Ok(Input::Interrupt),
    }
}

/// Run a started lookup to completion, or cancel it on interrupt.
async fn lookup<I>(session: &mut Session, pending: Option<PendingFetch>, interrupt: I) -> Outcome
where
    I: Future<Output = std::io::Result<()>>,
{
    let Some(pending) = pending else {
        return Outcome::Ignored;
    };

    println!("{}", render::loading());
    let outcome = tokio::select! {
        biased;
        Ok(()) = interrupt => {
            session.cancel();
            println!("Cancelled");
            Outcome::Ignored
        }
        completion = pending.run() => session.finish(completion),
    };

    tracing::debug!(?outcome, "Lookup finished");
    outcome
}
