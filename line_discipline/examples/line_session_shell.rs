// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! A tiny shell on top of a [`LineSession`]. It puts the terminal in raw mode, feeds
//! stdin to the session one read at a time (one keypress, or one paste), and echoes
//! back every line it gets. A background task prints a heartbeat so you can see output
//! and the prompt stay out of each other's way.
//!
//! ```text
//! cargo run --example line_session_shell -- --prompt "λ " --heartbeat-secs 3
//! ```
//!
//! `Ctrl-C` or `Ctrl-D` exits.

use clap::Parser;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use miette::IntoDiagnostic;
use r3bl_line_discipline::{InputMode, LineSession, PinnedInputStream, SafeRawTerminal,
                           SessionEvent, SessionOptions, StdMutex, TracingConfig};
use std::{io::Write, sync::Arc, time::Duration};
use tokio::io::AsyncReadExt;

#[derive(Debug, Parser)]
#[command(bin_name = "line_session_shell")]
#[command(about = "Line discipline demo: type lines, watch concurrent output")]
struct CliArgs {
    /// Text shown before the line being typed.
    #[arg(long, default_value = "> ")]
    prompt: String,

    /// One of `cooked`, `raw-echo`, `raw`, `disabled`.
    #[arg(long, default_value = "cooked")]
    input_mode: InputMode,

    /// Print a heartbeat line this often. `0` turns it off.
    #[arg(long, default_value_t = 5)]
    heartbeat_secs: u64,

    /// Write `tracing` output to this file.
    #[arg(long)]
    log_file: Option<String>,
}

#[tokio::main]
async fn main() -> miette::Result<()> {
    let cli_args = CliArgs::parse();

    if let Some(log_file) = cli_args.log_file.clone() {
        r3bl_line_discipline::init(TracingConfig::new_file(Some(log_file)))?;
    }

    enable_raw_mode().into_diagnostic()?;
    let result = run(cli_args).await;
    disable_raw_mode().into_diagnostic()?;

    // Tokio reads stdin on a blocking thread that can't be cancelled, so don't wait for
    // the runtime to shut down.
    if let Err(report) = result {
        eprintln!("{report:?}");
        std::process::exit(1);
    }
    std::process::exit(0);
}

async fn run(cli_args: CliArgs) -> miette::Result<()> {
    let options = SessionOptions::new("line_session_shell")
        .with_prompt(cli_args.prompt)
        .with_input_mode(cli_args.input_mode);
    let display: SafeRawTerminal = Arc::new(StdMutex::new(std::io::stdout()));
    let (session, mut events) = LineSession::new(options, display)?;
    let session = Arc::new(session);

    tokio::spawn({
        let session = session.clone();
        async move { session.drive(stdin_token_stream()).await }
    });

    if cli_args.heartbeat_secs > 0 {
        let mut writer = session.writer();
        let period = Duration::from_secs(cli_args.heartbeat_secs);
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.tick().await;
            for count in 1_u64.. {
                interval.tick().await;
                if writeln!(writer, "[heartbeat {count}]").is_err() {
                    break;
                }
            }
        });
    }

    while let Some(event) = events.recv().await {
        match event {
            SessionEvent::Data(data) => match cli_args.input_mode {
                InputMode::Cooked => session.write(&format!("you typed: {data}")),
                _ => session.write(&format!("token: {data:?}\n")),
            },
            SessionEvent::Break | SessionEvent::Eof => {
                session.write("bye\n");
                break;
            }
            SessionEvent::Close => break,
        }
    }

    session.dispose();
    Ok(())
}

/// Every read from stdin is one token. In raw mode a read returns as soon as a key is
/// pressed, so arrow keys arrive as a whole `ESC [ <letter>` sequence.
fn stdin_token_stream() -> PinnedInputStream<String> {
    Box::pin(futures_util::stream::unfold(
        tokio::io::stdin(),
        |mut stdin| async move {
            let mut buffer = [0_u8; 1024];
            match stdin.read(&mut buffer).await {
                Ok(0) | Err(_) => None,
                Ok(count) => Some((
                    String::from_utf8_lossy(&buffer[..count]).into_owned(),
                    stdin,
                )),
            }
        },
    ))
}
