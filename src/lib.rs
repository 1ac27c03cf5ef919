//! Byte-level model of Bitcoin SV transaction scripts.
//!
//! Decodes raw, untrusted script bytes into a lazy sequence of
//! instructions, classifies scripts by structural pattern (P2SH, witness
//! program, push-only), encodes and decodes script numbers under the
//! minimal-encoding rule, and computes the consensus-critical sigop count
//! on both sides of the Genesis upgrade. Malformed input degrades
//! predictably: decoding ends in a sentinel instruction, classifiers
//! return non-matching, and numeric or multisig-count violations surface
//! as typed errors. Script execution, hashing and serialization live in
//! other crates.

pub mod config;
pub mod instruction;
pub mod opcodes;
pub mod script;
pub mod script_num;
pub mod sigops;

mod error;

pub use error::ScriptError;
pub use instruction::{Instruction, InstructionIter};
pub use opcodes::Opcode;
pub use script::{Script, WitnessProgram};
pub use script_num::{is_minimally_encoded, ScriptNum, ScriptNumError};
pub use sigops::SigOpCountError;
