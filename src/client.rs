//! Interactive terminal client: relays server lines to the user and the
//! user's moves back to the server.

use crate::endpoint::{Endpoint, EndpointError, LineEndpoint};
use crate::protocol::Notice;
use anyhow::{Context, Result};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info, instrument};

/// Prompt shown whenever the server asks for a move.
pub const MOVE_PROMPT: &str = "Please enter the position for your move:";

/// Printed once the session is over, however it ended.
pub const GAME_ENDED: &str = "GAME ENDED!";

/// Plays one session over `stream`, reading moves from `input` and echoing
/// everything to `output`.
///
/// Returns when the server terminates the session, the server hangs up, or
/// `input` runs out.
#[instrument(skip_all)]
pub async fn play<S, I, O>(stream: S, mut input: I, mut output: O) -> Result<()>
where
    S: AsyncRead + AsyncWrite + Send + Unpin,
    I: AsyncBufRead + Unpin,
    O: AsyncWrite + Unpin,
{
    let mut server = LineEndpoint::new(stream, "server");
    let result = relay(&mut server, &mut input, &mut output).await;

    output.write_all(GAME_ENDED.as_bytes()).await?;
    output.write_all(b"\n").await?;
    output.flush().await?;
    if let Err(err) = server.close().await {
        debug!(error = %err, "Error while closing server connection");
    }
    result
}

async fn relay<S, I, O>(server: &mut LineEndpoint<S>, input: &mut I, output: &mut O) -> Result<()>
where
    S: AsyncRead + AsyncWrite + Send + Unpin,
    I: AsyncBufRead + Unpin,
    O: AsyncWrite + Unpin,
{
    loop {
        let line = match server.recv_line().await {
            Ok(line) => line,
            Err(EndpointError::Closed) => {
                info!("Server closed the connection");
                return Ok(());
            }
            Err(err) => return Err(err).context("Failed to read from server"),
        };

        if !Notice::expects_move(&line) {
            write_line(output, &line).await?;
            if Notice::ends_session(&line) {
                return Ok(());
            }
            continue;
        }

        // Move requests are shown as the prompt alone.
        write_line(output, MOVE_PROMPT).await?;
        let mut mv = String::new();
        if input.read_line(&mut mv).await? == 0 {
            info!("Input closed, leaving the game");
            return Ok(());
        }
        let mv = mv.trim_end();
        write_line(output, &format!("Move: {}", mv)).await?;
        server
            .send_line(mv)
            .await
            .context("Failed to send move to server")?;
    }
}

async fn write_line<O: AsyncWrite + Unpin>(output: &mut O, line: &str) -> Result<()> {
    output.write_all(line.as_bytes()).await?;
    output.write_all(b"\n").await?;
    output.flush().await?;
    Ok(())
}
