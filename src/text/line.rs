use crate::text::{read_exact_at, ReadAt, ResolveError};

const SCAN_CHUNK: usize = 128;

/// Read the full line containing `offset` using positional reads only.
///
/// If the offset is a newline character the line preceding that character
/// is returned. The last line needs no trailing newline. An offset with no
/// data at all (at or past the end) is [`ResolveError::EndOfInput`].
pub fn enclosing_line<R: ReadAt + ?Sized>(source: &R, offset: u64) -> Result<Vec<u8>, ResolveError> {
    let tail = scan_forward(source, offset)?;
    let mut line = scan_backward(source, offset)?;
    line.extend_from_slice(&tail);
    Ok(line)
}

/// Bytes from `offset` up to (excluding) the next newline or end of input.
fn scan_forward<R: ReadAt + ?Sized>(source: &R, offset: u64) -> Result<Vec<u8>, ResolveError> {
    let mut out = Vec::new();
    let mut chunk = [0u8; SCAN_CHUNK];
    let mut pos = offset;
    loop {
        let n = source.read_at(&mut chunk, pos)?;
        if n == 0 {
            if pos == offset {
                return Err(ResolveError::EndOfInput { offset });
            }
            return Ok(out);
        }
        if let Some(i) = chunk[..n].iter().position(|&b| b == b'\n') {
            out.extend_from_slice(&chunk[..i]);
            return Ok(out);
        }
        out.extend_from_slice(&chunk[..n]);
        pos += n as u64;
    }
}

/// Bytes from the previous newline (exclusive) or start of input up to `offset`.
fn scan_backward<R: ReadAt + ?Sized>(source: &R, offset: u64) -> Result<Vec<u8>, ResolveError> {
    // accumulated in reverse, restored at the end
    let mut reversed = Vec::new();
    let mut chunk = [0u8; SCAN_CHUNK];
    let mut end = offset;
    while end > 0 {
        let start = end.saturating_sub(SCAN_CHUNK as u64);
        let len = (end - start) as usize;
        let buf = &mut chunk[..len];
        read_exact_at(source, buf, start)?;
        if let Some(i) = buf.iter().rposition(|&b| b == b'\n') {
            reversed.extend(buf[i + 1..].iter().rev());
            break;
        }
        reversed.extend(buf.iter().rev());
        end = start;
    }
    reversed.reverse();
    Ok(reversed)
}
