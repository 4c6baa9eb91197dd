//! Stream runner -- feeds input lines to the line processor until EOF.

use std::io::Write;

use anyhow::Result;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use logrecycler_pipeline::{LineOutcome, LineProcessor};

/// Counts for one run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Lines read from input.
    pub read: u64,
    /// Lines written as JSON records.
    pub emitted: u64,
    /// Lines dropped by a discard rule.
    pub discarded: u64,
}

/// Process `input` line by line, writing records to `out`.
///
/// A trailing `\n` or `\r\n` is stripped and bytes are decoded lossily as
/// UTF-8. A final line without a newline is still processed. Returns when
/// input ends; a failed write to `out` stops the run with an error.
pub async fn run_stream<R, W>(
    processor: &LineProcessor,
    mut input: R,
    out: &mut W,
) -> Result<RunSummary>
where
    R: AsyncBufRead + Unpin,
    W: Write + ?Sized,
{
    let mut summary = RunSummary::default();
    let mut buf = Vec::with_capacity(1024);

    loop {
        buf.clear();
        let n = input
            .read_until(b'\n', &mut buf)
            .await
            .map_err(|e| anyhow::anyhow!("failed to read input: {}", e))?;
        if n == 0 {
            break;
        }

        let line = String::from_utf8_lossy(trim_line_ending(&buf));
        summary.read += 1;

        match processor
            .process_line(&line, &mut *out)
            .map_err(|e| anyhow::anyhow!("failed to write record: {}", e))?
        {
            LineOutcome::Emitted => summary.emitted += 1,
            LineOutcome::Discarded => summary.discarded += 1,
        }
    }

    tracing::debug!(
        read = summary.read,
        emitted = summary.emitted,
        discarded = summary.discarded,
        "input stream ended"
    );

    Ok(summary)
}

fn trim_line_ending(buf: &[u8]) -> &[u8] {
    match buf.strip_suffix(b"\n") {
        Some(line) => line.strip_suffix(b"\r").unwrap_or(line),
        None => buf,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_lf_and_crlf() {
        assert_eq!(trim_line_ending(b"a\n"), b"a");
        assert_eq!(trim_line_ending(b"a\r\n"), b"a");
        assert_eq!(trim_line_ending(b"a"), b"a");
        assert_eq!(trim_line_ending(b"\n"), b"");
    }

    #[test]
    fn carriage_return_without_newline_is_kept() {
        assert_eq!(trim_line_ending(b"a\r"), b"a\r");
    }
}
