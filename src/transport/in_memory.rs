use tokio::io::{duplex, split, DuplexStream, ReadHalf, WriteHalf};

use crate::config::MAX_LINE_LEN;
use crate::transport::tcp::{LineReader, LineWriter};

pub type MemoryLineReader = LineReader<ReadHalf<DuplexStream>>;
pub type MemoryLineWriter = LineWriter<WriteHalf<DuplexStream>>;

/// Both ends of an in-process connection.
pub struct InMemoryTransport {
    pub reader: MemoryLineReader,
    pub writer: MemoryLineWriter,
}

impl InMemoryTransport {
    /// Two connected ends: lines written on one are read on the other.
    pub fn pair() -> (Self, Self) {
        let (a, b) = duplex(64 * 1024);
        (Self::wrap(a), Self::wrap(b))
    }

    fn wrap(stream: DuplexStream) -> Self {
        let (read, write) = split(stream);
        Self {
            reader: LineReader::with_max_line_len(read, MAX_LINE_LEN),
            writer: LineWriter::new(write),
        }
    }

    pub fn into_split(self) -> (MemoryLineReader, MemoryLineWriter) {
        (self.reader, self.writer)
    }
}
