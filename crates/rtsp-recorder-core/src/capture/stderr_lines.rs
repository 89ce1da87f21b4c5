//! Line splitting for `ffmpeg` stderr.
//!
//! ffmpeg ends progress updates with `\r` and echoes stream metadata in
//! whatever encoding the camera sent, so stderr is split on both `\r` and
//! `\n`, decoded lossily, and each line is capped at [`MAX_LINE_BYTES`].

/// Longest line kept; the rest of an over-long line is dropped.
pub(crate) const MAX_LINE_BYTES: usize = 1024;

/// Incremental splitter fed with raw stderr chunks.
#[derive(Debug, Default)]
pub(crate) struct StderrLines {
    pending: Vec<u8>,
}

impl StderrLines {
    /// Feed a chunk and return every line it completes.
    pub(crate) fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        let mut lines = Vec::new();

        for &byte in chunk {
            if byte == b'\n' || byte == b'\r' {
                if let Some(line) = self.take() {
                    lines.push(line);
                }
            } else if self.pending.len() < MAX_LINE_BYTES {
                self.pending.push(byte);
            }
        }

        lines
    }

    /// The trailing line left when stderr closes without a terminator.
    pub(crate) fn finish(mut self) -> Option<String> {
        self.take()
    }

    fn take(&mut self) -> Option<String> {
        if self.pending.is_empty() {
            return None;
        }
        let line = String::from_utf8_lossy(&self.pending).into_owned();
        self.pending.clear();
        Some(line)
    }
}
