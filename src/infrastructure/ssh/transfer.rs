//! Chunked copy with progress reporting.

use std::io::{self, Read, Write};

/// Bytes sent between progress callbacks
pub const CHUNK_SIZE: usize = 32 * 1024;

/// Copy `reader` into `writer`, calling `on_progress` with the running total
/// after every chunk. An empty source still reports once.
///
/// `writer` is dropped on return so the receiving end sees EOF.
pub fn stream_with_progress<R, W>(
    mut reader: R,
    mut writer: W,
    mut on_progress: impl FnMut(u64),
) -> io::Result<u64>
where
    R: Read,
    W: Write,
{
    let mut buf = vec![0u8; CHUNK_SIZE];
    let mut sent: u64 = 0;

    loop {
        let n = match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        writer.write_all(&buf[..n])?;
        sent += n as u64;
        on_progress(sent);
    }

    if sent == 0 {
        on_progress(0);
    }
    writer.flush()?;
    Ok(sent)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_running_total_per_chunk() {
        let data = vec![7u8; CHUNK_SIZE * 2 + 10];
        let mut out = Vec::new();
        let mut totals = Vec::new();

        let sent = stream_with_progress(&data[..], &mut out, |s| totals.push(s)).unwrap();

        assert_eq!(sent, data.len() as u64);
        assert_eq!(out, data);
        assert_eq!(
            totals,
            vec![
                CHUNK_SIZE as u64,
                2 * CHUNK_SIZE as u64,
                data.len() as u64
            ]
        );
    }

    #[test]
    fn empty_source_reports_once() {
        let mut out = Vec::new();
        let mut totals = Vec::new();

        let sent = stream_with_progress(&b""[..], &mut out, |s| totals.push(s)).unwrap();

        assert_eq!(sent, 0);
        assert_eq!(totals, vec![0]);
    }

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "remote closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn write_failure_propagates() {
        let err = stream_with_progress(&b"payload"[..], BrokenPipe, |_| {}).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
    }
}
