use std::time::Duration;

use farkle_engine::{ServerMessage, PROMPT};
use tokio::io::{
    AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader, ReadHalf, WriteHalf,
};
use tokio::time;

use crate::error::TransportError;

/// Longest command line accepted in one read; the remainder arrives as the next line.
pub const MAX_LINE: u64 = 4096;

/// Newline-framed text over any byte stream. The timeout bounds every read and every write.
pub struct LineChannel<S> {
    reader: BufReader<ReadHalf<S>>,
    writer: WriteHalf<S>,
    timeout: Option<Duration>,
}

impl<S> LineChannel<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    pub fn new(stream: S, timeout: Option<Duration>) -> Self {
        let (read, write) = tokio::io::split(stream);
        Self { reader: BufReader::new(read), writer: write, timeout }
    }

    /// Writes and flushes `text`. A peer that stops reading yields `Stalled`.
    pub async fn send(&mut self, text: &str) -> Result<(), TransportError> {
        let writer = &mut self.writer;
        let write = async move {
            writer.write_all(text.as_bytes()).await?;
            writer.flush().await?;
            Ok::<_, std::io::Error>(())
        };
        match self.timeout {
            Some(limit) => time::timeout(limit, write).await.map_err(|_| TransportError::Stalled(limit))??,
            None => write.await?,
        }
        Ok(())
    }

    pub async fn send_message(&mut self, msg: &ServerMessage) -> Result<(), TransportError> {
        self.send(&msg.encode()).await
    }

    /// Waits for the next line, honoring the timeout. EOF is `Closed`.
    pub async fn recv_line(&mut self) -> Result<String, TransportError> {
        let mut buf = Vec::new();
        let mut limited = (&mut self.reader).take(MAX_LINE);
        let read = limited.read_until(b'\n', &mut buf);
        let n = match self.timeout {
            Some(limit) => time::timeout(limit, read).await.map_err(|_| TransportError::Timeout(limit))??,
            None => read.await?,
        };
        if n == 0 { return Err(TransportError::Closed); }
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }

    /// Like `recv_line`, but also returns the bare prompt, which has no newline.
    pub async fn recv_frame(&mut self) -> Result<String, TransportError> {
        let mut buf = Vec::new();
        loop {
            let byte = match self.reader.read_u8().await {
                Ok(b) => b,
                Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                    if buf.is_empty() { return Err(TransportError::Closed); }
                    break;
                }
                Err(e) => return Err(e.into()),
            };
            buf.push(byte);
            if byte == b'\n' || buf == PROMPT.as_bytes() || buf.len() as u64 >= MAX_LINE { break; }
        }
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }

    /// Best-effort shutdown of the write side, bounded like `send`.
    pub async fn close(&mut self) {
        let shutdown = self.writer.shutdown();
        let _ = match self.timeout {
            Some(limit) => time::timeout(limit, shutdown).await.ok(),
            None => Some(shutdown.await),
        };
    }
}
