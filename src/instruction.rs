//! Lazy instruction decoding over raw script bytes.
//!
//! Decoding walks the buffer one opcode at a time, resolving the operand of
//! each push as a borrowed slice of the source bytes. Nothing is copied and
//! nothing is retained: a fresh iterator re-decodes from the start, and the
//! borrow checker keeps every `Instruction` from outliving its script.
//!
//! Truncation is not an error. If a push declares more bytes than remain
//! (or a PUSHDATA length prefix itself is cut short), the iterator yields
//! one final instruction carrying `Opcode::Invalid` and stops. Callers
//! treat that sentinel as "the script is malformed from here on".

use std::fmt;

use crate::opcodes::Opcode;

/// A single decoded instruction.
///
/// The operand borrows from the script bytes the iterator was built over;
/// non-push opcodes carry an empty operand. `offset` is the position of the
/// opcode byte within the script.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Instruction<'a> {
    opcode: Opcode,
    operand: &'a [u8],
    offset: usize,
}

impl<'a> Instruction<'a> {
    /// The decoded opcode.
    pub fn opcode(&self) -> Opcode {
        self.opcode
    }

    /// The operand bytes, borrowed from the source script.
    ///
    /// Empty for non-push opcodes and for the truncation sentinel.
    pub fn operand(&self) -> &'a [u8] {
        self.operand
    }

    /// Byte offset of the opcode within the source script.
    pub fn offset(&self) -> usize {
        self.offset
    }
}

impl fmt::Display for Instruction<'_> {
    /// Pushes render as the hex of their operand, other opcodes by name.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.operand.is_empty() {
            f.write_str(&hex::encode(self.operand))
        } else {
            write!(f, "{}", self.opcode)
        }
    }
}

/// Lazy iterator over the instructions of a byte buffer.
///
/// Finite and restartable: iteration is a pure function of the input bytes
/// and the starting position, so two passes over the same buffer yield
/// identical sequences. An empty buffer yields nothing.
#[derive(Debug, Clone)]
pub struct InstructionIter<'a> {
    script: &'a [u8],
    pos: usize,
    done: bool,
}

impl<'a> InstructionIter<'a> {
    /// Decode from the start of `script`.
    pub fn new(script: &'a [u8]) -> Self {
        Self::from_position(script, 0)
    }

    /// Decode starting at byte offset `pos`.
    pub fn from_position(script: &'a [u8], pos: usize) -> Self {
        InstructionIter {
            script,
            pos,
            done: false,
        }
    }

    // Marks the stream malformed: one Invalid sentinel, then the end.
    fn truncated(&mut self, offset: usize) -> Instruction<'a> {
        self.done = true;
        Instruction {
            opcode: Opcode::Invalid,
            operand: &[],
            offset,
        }
    }
}

impl<'a> Iterator for InstructionIter<'a> {
    type Item = Instruction<'a>;

    fn next(&mut self) -> Option<Instruction<'a>> {
        if self.done || self.pos >= self.script.len() {
            return None;
        }

        let offset = self.pos;
        let opcode = Opcode::from_byte(self.script[offset]);

        // Resolve the operand length; PUSHDATA length prefixes are
        // little-endian and themselves part of the header.
        let (header_len, operand_len) = match opcode {
            Opcode::PushBytes(n) => (1, n as usize),
            Opcode::PushData1 => {
                if self.script.len() < offset + 2 {
                    return Some(self.truncated(offset));
                }
                (2, self.script[offset + 1] as usize)
            }
            Opcode::PushData2 => {
                if self.script.len() < offset + 3 {
                    return Some(self.truncated(offset));
                }
                let len = u16::from_le_bytes([self.script[offset + 1], self.script[offset + 2]]);
                (3, len as usize)
            }
            Opcode::PushData4 => {
                if self.script.len() < offset + 5 {
                    return Some(self.truncated(offset));
                }
                let len = u32::from_le_bytes([
                    self.script[offset + 1],
                    self.script[offset + 2],
                    self.script[offset + 3],
                    self.script[offset + 4],
                ]);
                (5, len as usize)
            }
            _ => (1, 0),
        };

        let data_start = offset + header_len;
        let data_end = match data_start.checked_add(operand_len) {
            Some(end) if end <= self.script.len() => end,
            _ => return Some(self.truncated(offset)),
        };

        self.pos = data_end;
        Some(Instruction {
            opcode,
            operand: &self.script[data_start..data_end],
            offset,
        })
    }
}
