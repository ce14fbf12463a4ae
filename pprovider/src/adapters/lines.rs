use crate::ProviderError;

/// Splits a chunked byte stream into complete text lines.
///
/// Bytes are buffered until a `\n` arrives, so a multi-byte character split
/// across two network chunks decodes correctly.
#[derive(Debug, Default)]
pub(crate) struct LineBuffer {
    pending: Vec<u8>,
}

impl LineBuffer {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, bytes: &[u8]) {
        self.pending.extend_from_slice(bytes);
    }

    /// Pops the next complete line with its trailing `\r\n`/`\n` removed.
    pub(crate) fn next_line(&mut self) -> Option<Result<String, ProviderError>> {
        let newline = self.pending.iter().position(|byte| *byte == b'\n')?;
        let mut line = self.pending.drain(..=newline).collect::<Vec<_>>();
        line.pop();
        if line.last() == Some(&b'\r') {
            line.pop();
        }

        Some(decode(line))
    }

    /// Drains an unterminated final line, if any bytes remain.
    pub(crate) fn finish(&mut self) -> Option<Result<String, ProviderError>> {
        if self.pending.iter().all(u8::is_ascii_whitespace) {
            self.pending.clear();
            return None;
        }

        Some(decode(std::mem::take(&mut self.pending)))
    }
}

fn decode(line: Vec<u8>) -> Result<String, ProviderError> {
    String::from_utf8(line).map_err(|err| ProviderError::protocol(err.to_string()))
}
