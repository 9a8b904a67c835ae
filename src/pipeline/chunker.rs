//! Transcript splitting.
//!
//! Splits raw transcript text into bounded, ordered chunks. Line breaks
//! are the preferred split boundary, and a configurable overlap carries
//! trailing lines from each chunk into the next.

use crate::{RecapError, Result};

/// A bounded, contiguous slice of the transcript.
///
/// Chunks are produced once by [`split`] and never mutated; `index` is the
/// chunk's position in transcript order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    pub index: usize,
    pub text: String,
}

/// Split `transcript` into chunks of at most `chunk_size` characters.
///
/// Consecutive chunks share up to `overlap` characters of trailing lines.
/// An empty transcript yields no chunks; a transcript shorter than
/// `chunk_size` yields exactly one.
pub fn split(transcript: &str, chunk_size: usize, overlap: usize) -> Result<Vec<Chunk>> {
    if chunk_size == 0 {
        return Err(RecapError::InvalidInput(
            "chunk size must be greater than zero".to_string(),
        ));
    }
    if overlap >= chunk_size {
        return Err(RecapError::InvalidInput(format!(
            "overlap ({overlap}) must be smaller than chunk size ({chunk_size})"
        )));
    }

    // Lines are the atomic unit; a line longer than the chunk size is
    // force-split so packing always makes progress.
    let mut pieces: Vec<&str> = Vec::new();
    for line in transcript.split('\n') {
        if line.is_empty() {
            continue;
        }
        if line.chars().count() <= chunk_size {
            pieces.push(line);
        } else {
            pieces.extend(force_split(line, chunk_size));
        }
    }

    let mut chunks: Vec<Chunk> = Vec::new();
    let mut window: Vec<&str> = Vec::new();

    for piece in pieces {
        let piece_len = piece.chars().count();

        if !window.is_empty() && joined_len(&window) + 1 + piece_len > chunk_size {
            push_chunk(&mut chunks, &window);

            // Keep a trailing window of at most `overlap` characters,
            // shrinking further until the incoming piece fits.
            while !window.is_empty()
                && (joined_len(&window) > overlap
                    || joined_len(&window) + 1 + piece_len > chunk_size)
            {
                window.remove(0);
            }
        }

        window.push(piece);
    }

    if !window.is_empty() {
        push_chunk(&mut chunks, &window);
    }

    Ok(chunks)
}

/// Joined length of `pieces` in characters, counting one joiner between
/// neighbors.
fn joined_len(pieces: &[&str]) -> usize {
    let chars: usize = pieces.iter().map(|p| p.chars().count()).sum();
    chars + pieces.len().saturating_sub(1)
}

fn push_chunk(chunks: &mut Vec<Chunk>, window: &[&str]) {
    let text = window.join("\n").trim().to_string();
    if !text.is_empty() {
        chunks.push(Chunk {
            index: chunks.len(),
            text,
        });
    }
}

/// Split a single unbroken run at raw character boundaries.
fn force_split(line: &str, chunk_size: usize) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut count = 0;

    for (offset, _) in line.char_indices() {
        if count == chunk_size {
            parts.push(&line[start..offset]);
            start = offset;
            count = 0;
        }
        count += 1;
    }
    if start < line.len() {
        parts.push(&line[start..]);
    }

    parts
}
