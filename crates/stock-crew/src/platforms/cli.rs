//! Interactive console front-end
//!
//! Each non-empty line is one request. `exit`, `quit` or end of input stops
//! the loop.

use crate::crew::StockCrew;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

const PROMPT: &str = "company> ";

/// Read requests from `input` and write each reply to `output`
pub async fn run_repl<R, W>(crew: &StockCrew, input: R, mut output: W) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = input.lines();
    loop {
        output.write_all(PROMPT.as_bytes()).await?;
        output.flush().await?;

        let Some(line) = lines.next_line().await? else {
            output.write_all(b"\nGoodbye!\n").await?;
            break;
        };

        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line.eq_ignore_ascii_case("exit") || line.eq_ignore_ascii_case("quit") {
            output.write_all(b"Goodbye!\n").await?;
            break;
        }

        let reply = crew.handle(line).await;
        output.write_all(reply.as_bytes()).await?;
        output.write_all(b"\n\n").await?;
    }
    output.flush().await
}
