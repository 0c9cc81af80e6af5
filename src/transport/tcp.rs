use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader, BufWriter};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::{TcpStream, ToSocketAddrs};

use crate::config::MAX_LINE_LEN;
use crate::transport::{LineSink, LineSource};

fn describe_io_error(e: std::io::Error) -> anyhow::Error {
    match e.kind() {
        std::io::ErrorKind::UnexpectedEof => anyhow::anyhow!("Connection closed by peer"),
        std::io::ErrorKind::ConnectionReset => anyhow::anyhow!("Connection reset by peer"),
        std::io::ErrorKind::BrokenPipe => anyhow::anyhow!("Connection closed by peer"),
        _ => anyhow::anyhow!("I/O error: {}", e),
    }
}

/// Reads newline-terminated lines from any byte stream.
pub struct LineReader<R> {
    reader: BufReader<R>,
    max_line_len: usize,
    buf: Vec<u8>,
}

impl<R: AsyncRead + Unpin + Send> LineReader<R> {
    pub fn new(reader: R) -> Self {
        Self::with_max_line_len(reader, MAX_LINE_LEN)
    }

    pub fn with_max_line_len(reader: R, max_line_len: usize) -> Self {
        Self {
            reader: BufReader::new(reader),
            max_line_len,
            buf: Vec::new(),
        }
    }
}

#[async_trait::async_trait]
impl<R: AsyncRead + Unpin + Send> LineSource for LineReader<R> {
    async fn recv_line(&mut self) -> anyhow::Result<Option<String>> {
        self.buf.clear();
        // One byte past the limit lets an over-long line be told apart from
        // one that exactly fits.
        let limit = self.max_line_len as u64 + 1;
        let n = (&mut self.reader)
            .take(limit)
            .read_until(b'\n', &mut self.buf)
            .await
            .map_err(describe_io_error)?;
        if n == 0 {
            return Ok(None);
        }
        if self.buf.last() == Some(&b'\n') {
            self.buf.pop();
            if self.buf.last() == Some(&b'\r') {
                self.buf.pop();
            }
        } else if n as u64 == limit {
            return Err(anyhow::anyhow!(
                "Line too long: more than {} bytes",
                self.max_line_len
            ));
        }
        // Invalid UTF-8 degrades into an unparseable line instead of a
        // connection error.
        Ok(Some(String::from_utf8_lossy(&self.buf).into_owned()))
    }
}

/// Writes newline-terminated lines to any byte stream.
pub struct LineWriter<W> {
    writer: BufWriter<W>,
}

impl<W: AsyncWrite + Unpin + Send> LineWriter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: BufWriter::new(writer),
        }
    }
}

#[async_trait::async_trait]
impl<W: AsyncWrite + Unpin + Send> LineSink for LineWriter<W> {
    async fn send_line(&mut self, line: &str) -> anyhow::Result<()> {
        self.writer
            .write_all(line.as_bytes())
            .await
            .map_err(describe_io_error)?;
        self.writer.write_all(b"\n").await.map_err(describe_io_error)?;
        self.writer.flush().await.map_err(describe_io_error)
    }

    async fn shutdown(&mut self) -> anyhow::Result<()> {
        self.writer.shutdown().await.map_err(describe_io_error)
    }
}

pub type TcpLineReader = LineReader<OwnedReadHalf>;
pub type TcpLineWriter = LineWriter<OwnedWriteHalf>;

/// Split an accepted socket into its line halves.
pub fn split(stream: TcpStream, max_line_len: usize) -> (TcpLineReader, TcpLineWriter) {
    if let Err(e) = stream.set_nodelay(true) {
        log::debug!("could not set TCP_NODELAY: {}", e);
    }
    let (read, write) = stream.into_split();
    (
        LineReader::with_max_line_len(read, max_line_len),
        LineWriter::new(write),
    )
}

/// Connect to a server and split the socket into its line halves.
pub async fn connect<A: ToSocketAddrs>(addr: A) -> anyhow::Result<(TcpLineReader, TcpLineWriter)> {
    let stream = TcpStream::connect(addr).await?;
    Ok(split(stream, MAX_LINE_LEN))
}
