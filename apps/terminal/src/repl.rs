//! Line-oriented input loop.
//!
//! Reads commands while keeping the active drill's timers running: whichever
//! comes first, the next input line or the next scheduled transition, is
//! handled and the view is redrawn when it changes.

use std::time::Duration;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::time::Instant;
use tracing::debug;

use crate::command::{parse_command, Command, END_OF_INPUT};
use crate::session::Session;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CaptureKind {
    Cards,
    Notes,
}

/// Multi-line block being collected for `load` or `extract`.
struct Capture {
    kind: CaptureKind,
    text: String,
}

pub async fn run_repl<R, W>(session: &mut Session, input: R, output: &mut W) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = input.lines();
    let mut capture: Option<Capture> = None;
    let mut last_tick = Instant::now();

    loop {
        let wait = session.time_until_next();
        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = wait_for(wait) => {
                tick(session, output, &mut last_tick).await?;
                continue;
            }
        };
        tick(session, output, &mut last_tick).await?;

        let Some(line) = line else {
            debug!("input closed");
            break;
        };

        if let Some(block) = capture.as_mut() {
            if line.trim() != END_OF_INPUT {
                block.text.push_str(&line);
                block.text.push('\n');
                continue;
            }
            let Some(block) = capture.take() else {
                continue;
            };
            let replies = match block.kind {
                CaptureKind::Cards => session.load_cards(&block.text),
                CaptureKind::Notes => {
                    write_block(output, "Generating cards...").await?;
                    session.extract(&block.text).await
                }
            };
            write_all(output, &replies).await?;
            last_tick = Instant::now();
            continue;
        }

        match parse_command(&line) {
            Ok(Command::Quit) => break,
            Ok(Command::Load) => {
                capture = Some(Capture {
                    kind: CaptureKind::Cards,
                    text: String::new(),
                });
                write_block(
                    output,
                    "Paste TERM,DEFINITION lines. End with a line containing only `.`",
                )
                .await?;
            }
            Ok(Command::Extract) => {
                if !session.ai_enabled() {
                    write_block(output, "AI is disabled: set OPENROUTER_API_KEY to extract cards.").await?;
                    continue;
                }
                capture = Some(Capture {
                    kind: CaptureKind::Notes,
                    text: String::new(),
                });
                write_block(output, "Paste your notes. End with a line containing only `.`").await?;
            }
            Ok(command) => {
                let replies = session.execute(command).await;
                write_all(output, &replies).await?;
                last_tick = Instant::now();
            }
            Err(e) => write_block(output, &format!("Error: {}", e)).await?,
        }
    }

    output.flush().await?;
    Ok(())
}

/// Advance the session by the real time since the last tick.
async fn tick<W>(session: &mut Session, output: &mut W, last_tick: &mut Instant) -> anyhow::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let now = Instant::now();
    let elapsed = now.duration_since(*last_tick);
    *last_tick = now;
    if let Some(view) = session.elapse(elapsed).await {
        write_block(output, &view).await?;
    }
    Ok(())
}

async fn wait_for(delay: Option<Duration>) {
    match delay {
        Some(delay) => tokio::time::sleep(delay).await,
        None => std::future::pending().await,
    }
}

async fn write_all<W>(output: &mut W, blocks: &[String]) -> anyhow::Result<()>
where
    W: AsyncWrite + Unpin,
{
    for block in blocks {
        write_block(output, block).await?;
    }
    Ok(())
}

async fn write_block<W>(output: &mut W, block: &str) -> anyhow::Result<()>
where
    W: AsyncWrite + Unpin,
{
    output.write_all(block.as_bytes()).await?;
    output.write_all(b"\n").await?;
    output.flush().await?;
    Ok(())
}
