//! The script value type: an owned byte buffer with builder operations and
//! structural pattern classifiers.
//!
//! A `Script` is immutable once built; instructions decoded from it borrow
//! its bytes. Builders always choose the shortest push prefix the decoder
//! accepts, so building and re-decoding round-trips byte for byte.

use std::fmt;

use crate::error::ScriptError;
use crate::instruction::InstructionIter;
use crate::opcodes::Opcode;
use crate::script_num::ScriptNum;

/// A script, represented as a byte vector newtype.
#[derive(Clone, PartialEq, Eq, Default)]
pub struct Script(Vec<u8>);

/// A matched witness program: a small-int version and a 2..=40 byte
/// program borrowed from the script.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WitnessProgram<'a> {
    /// Version encoded by the leading small-int opcode (0 for OP_0).
    pub version: u8,
    /// The pushed program bytes.
    pub program: &'a [u8],
}

impl Script {
    // -----------------------------------------------------------------------
    // Constructors
    // -----------------------------------------------------------------------

    /// Create a new empty script.
    pub fn new() -> Self {
        Script(Vec::new())
    }

    /// Create a script from raw bytes.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Script(bytes.to_vec())
    }

    /// Create a script from a hex-encoded string.
    pub fn from_hex(hex_str: &str) -> Result<Self, ScriptError> {
        let bytes = hex::decode(hex_str).map_err(|e| ScriptError::InvalidHex(e.to_string()))?;
        Ok(Script(bytes))
    }

    /// Create a script from a space-separated ASM string.
    ///
    /// Known opcode names (e.g. "OP_DUP") are emitted directly; any other
    /// token is parsed as hex and emitted as a data push.
    pub fn from_asm(asm: &str) -> Result<Self, ScriptError> {
        let mut script = Script::new();
        if asm.is_empty() {
            return Ok(script);
        }
        for token in asm.split(' ') {
            if let Some(opcode) = Opcode::from_name(token) {
                script.append_opcode(opcode)?;
            } else {
                let data =
                    hex::decode(token).map_err(|_| ScriptError::InvalidAsmToken(token.to_string()))?;
                script.append_push_data(&data)?;
            }
        }
        Ok(script)
    }

    // -----------------------------------------------------------------------
    // Serialization / access
    // -----------------------------------------------------------------------

    /// Encode the script as a lowercase hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }

    /// Convert the script to its ASM representation: data pushes as hex,
    /// other opcodes by name. Returns an empty string for malformed scripts.
    pub fn to_asm(&self) -> String {
        let mut parts = Vec::new();
        for inst in self.instructions() {
            let rendered = match inst.opcode() {
                Opcode::Invalid => return String::new(),
                Opcode::PushBytes(_)
                | Opcode::PushData1
                | Opcode::PushData2
                | Opcode::PushData4 => hex::encode(inst.operand()),
                op => op.name().to_string(),
            };
            if !rendered.is_empty() {
                parts.push(rendered);
            }
        }
        parts.join(" ")
    }

    /// The underlying script bytes.
    pub fn to_bytes(&self) -> &[u8] {
        &self.0
    }

    /// The length of the script in bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the script has no bytes.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Lazily decode the script's instructions from the start.
    ///
    /// The instructions borrow this script's bytes; a fresh call restarts
    /// decoding from the beginning.
    pub fn instructions(&self) -> InstructionIter<'_> {
        InstructionIter::new(&self.0)
    }

    /// Lazily decode starting at byte offset `pos`.
    pub fn instructions_from(&self, pos: usize) -> InstructionIter<'_> {
        InstructionIter::from_position(&self.0, pos)
    }

    // -----------------------------------------------------------------------
    // Builders
    // -----------------------------------------------------------------------

    /// Append a non-push opcode.
    ///
    /// Push opcodes are rejected: their operand bytes must come with them,
    /// so use `append_push_data` instead.
    pub fn append_opcode(&mut self, opcode: Opcode) -> Result<&mut Self, ScriptError> {
        if matches!(
            opcode,
            Opcode::PushBytes(_) | Opcode::PushData1 | Opcode::PushData2 | Opcode::PushData4
        ) {
            return Err(ScriptError::InvalidOpcodeType(opcode.name().to_string()));
        }
        self.0.push(opcode.to_byte());
        Ok(self)
    }

    /// Append a data push with the shortest valid prefix: a direct length
    /// byte for up to 75 bytes, then OP_PUSHDATA1/2/4 by size.
    pub fn append_push_data(&mut self, data: &[u8]) -> Result<&mut Self, ScriptError> {
        let prefix = push_data_prefix(data.len())?;
        self.0.extend_from_slice(&prefix);
        self.0.extend_from_slice(data);
        Ok(self)
    }

    /// Append an integer the way a script encodes one: -1 and 1..=16 as
    /// their small-int opcode, 0 as OP_0, anything else as a data push of
    /// the minimal encoding.
    pub fn append_int(&mut self, n: i64) -> &mut Self {
        if n == -1 || (1..=16).contains(&n) {
            self.0.push((Opcode::Op1.to_byte() as i64 + n - 1) as u8);
        } else if n == 0 {
            self.0.push(Opcode::Op0.to_byte());
        } else {
            let bytes = ScriptNum::from(n).to_bytes();
            // A minimal i64 encoding is at most 9 bytes: always a direct push.
            self.0.push(bytes.len() as u8);
            self.0.extend_from_slice(&bytes);
        }
        self
    }

    /// Append a script number as a data push of its minimal encoding.
    ///
    /// Unlike `append_int`, small values stay data pushes; zero becomes the
    /// empty push (the OP_0 byte).
    pub fn append_num(&mut self, n: ScriptNum) -> &mut Self {
        let bytes = n.to_bytes();
        self.0.push(bytes.len() as u8);
        self.0.extend_from_slice(&bytes);
        self
    }

    // -----------------------------------------------------------------------
    // Pattern classifiers
    // -----------------------------------------------------------------------

    /// Exact pay-to-script-hash test: OP_HASH160 <20 bytes> OP_EQUAL,
    /// 23 bytes total. A fixed-offset byte test, no decoding.
    pub fn is_p2sh(&self) -> bool {
        let b = &self.0;
        b.len() == 23
            && b[0] == Opcode::Hash160.to_byte()
            && b[1] == 0x14
            && b[22] == Opcode::Equal.to_byte()
    }

    /// Match the witness-program pattern: a small-int version opcode
    /// followed by a single push whose length byte accounts for the whole
    /// remainder of the script (2..=40 program bytes).
    pub fn witness_program(&self) -> Option<WitnessProgram<'_>> {
        let b = &self.0;
        if b.len() < 4 || b.len() > 42 {
            return None;
        }
        let version = Opcode::from_byte(b[0]).small_int_value()?;
        if b[1] as usize + 2 != b.len() {
            return None;
        }
        Some(WitnessProgram {
            version: version as u8,
            program: &b[2..],
        })
    }

    /// Whether the script matches the witness-program pattern.
    pub fn is_witness_program(&self) -> bool {
        self.witness_program().is_some()
    }

    /// Whether every instruction is push-like (opcode at or below OP_16).
    ///
    /// OP_RESERVED counts as push-like: this is a structural question, and
    /// a scriptSig containing it fails before any pattern-specific
    /// validation would run. False as soon as decoding hits a truncation.
    pub fn is_push_only(&self) -> bool {
        self.is_push_only_from(0)
    }

    /// `is_push_only` starting at byte offset `pos`.
    pub fn is_push_only_from(&self, pos: usize) -> bool {
        self.instructions_from(pos).all(|inst| inst.opcode().is_push())
    }
}

/// Prefix bytes for a data push of `data_len` bytes: the shortest of the
/// direct-length and PUSHDATA1/2/4 families.
fn push_data_prefix(data_len: usize) -> Result<Vec<u8>, ScriptError> {
    if data_len <= 75 {
        Ok(vec![data_len as u8])
    } else if data_len <= 0xff {
        Ok(vec![Opcode::PushData1.to_byte(), data_len as u8])
    } else if data_len <= 0xffff {
        let mut buf = vec![Opcode::PushData2.to_byte()];
        buf.extend_from_slice(&(data_len as u16).to_le_bytes());
        Ok(buf)
    } else if data_len <= 0xffff_ffff {
        let mut buf = vec![Opcode::PushData4.to_byte()];
        buf.extend_from_slice(&(data_len as u32).to_le_bytes());
        Ok(buf)
    } else {
        Err(ScriptError::DataTooBig)
    }
}

impl fmt::Display for Script {
    /// Display the script as a lowercase hex string.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Debug for Script {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Script({})", self.to_hex())
    }
}

impl serde::Serialize for Script {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> serde::Deserialize<'de> for Script {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Script::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    //! Tests for the script value: construction and hex/ASM round-trips,
    //! builder prefix selection, integer pushes, the three structural
    //! classifiers and the serde surface.

    use super::*;

    // -----------------------------------------------------------------------
    // Construction & roundtrips
    // -----------------------------------------------------------------------

    /// from_hex decodes and to_hex reproduces the same string.
    #[test]
    fn test_from_hex_roundtrip() {
        let hex_str = "76a914e2a623699e81b291c0327f408fea765d534baa2a88ac";
        let script = Script::from_hex(hex_str).expect("valid hex should parse");
        assert_eq!(script.to_hex(), hex_str);
        assert_eq!(script.len(), 25);
    }

    /// from_hex with an empty string produces an empty script.
    #[test]
    fn test_from_hex_empty() {
        let script = Script::from_hex("").expect("empty hex should parse");
        assert!(script.is_empty());
    }

    /// from_hex rejects non-hex characters.
    #[test]
    fn test_from_hex_invalid() {
        assert!(Script::from_hex("ZZZZ").is_err());
    }

    /// to_asm renders a P2PKH script with names and hex data.
    #[test]
    fn test_to_asm_p2pkh() {
        let script = Script::from_hex("76a914e2a623699e81b291c0327f408fea765d534baa2a88ac")
            .expect("valid hex");
        assert_eq!(
            script.to_asm(),
            "OP_DUP OP_HASH160 e2a623699e81b291c0327f408fea765d534baa2a OP_EQUALVERIFY OP_CHECKSIG"
        );
    }

    /// to_asm of a malformed script is empty.
    #[test]
    fn test_to_asm_truncated() {
        let script = Script::from_hex("76a9140102").expect("valid hex");
        assert_eq!(script.to_asm(), "");
    }

    /// from_asm parses names and hex tokens back to the same bytes.
    #[test]
    fn test_from_asm_roundtrip() {
        let asm = "OP_DUP OP_HASH160 e2a623699e81b291c0327f408fea765d534baa2a OP_EQUALVERIFY OP_CHECKSIG";
        let script = Script::from_asm(asm).expect("valid ASM");
        assert_eq!(
            script.to_hex(),
            "76a914e2a623699e81b291c0327f408fea765d534baa2a88ac"
        );
        assert_eq!(script.to_asm(), asm);
    }

    /// from_asm with an empty string produces an empty script.
    #[test]
    fn test_from_asm_empty() {
        assert!(Script::from_asm("").expect("empty ASM").is_empty());
    }

    /// from_asm rejects tokens that are neither opcode names nor hex.
    #[test]
    fn test_from_asm_bad_token() {
        assert!(Script::from_asm("OP_DUP nonsense").is_err());
    }

    // -----------------------------------------------------------------------
    // Builders
    // -----------------------------------------------------------------------

    /// A small data push gets a direct length prefix.
    #[test]
    fn test_append_push_data_small() {
        let mut script = Script::new();
        script
            .append_push_data(&[0x01, 0x02, 0x03, 0x04, 0x05])
            .expect("push should succeed");
        assert_eq!(script.to_hex(), "050102030405");
    }

    /// 76..=255 bytes use the OP_PUSHDATA1 prefix.
    #[test]
    fn test_append_push_data_pushdata1() {
        let mut script = Script::new();
        script.append_push_data(&[0xaa; 80]).expect("push should succeed");
        let hex_str = script.to_hex();
        assert_eq!(&hex_str[..4], "4c50");
        assert_eq!(hex_str.len(), 4 + 80 * 2);
    }

    /// 256..=65535 bytes use the OP_PUSHDATA2 prefix, little-endian.
    #[test]
    fn test_append_push_data_pushdata2() {
        let mut script = Script::new();
        script.append_push_data(&[0xbb; 256]).expect("push should succeed");
        assert_eq!(&script.to_hex()[..6], "4d0001");
    }

    /// Boundary at 75/76 bytes switches prefix families.
    #[test]
    fn test_push_prefix_boundary() {
        let mut at75 = Script::new();
        at75.append_push_data(&[0x00; 75]).expect("push should succeed");
        assert_eq!(at75.to_bytes()[0], 75);

        let mut at76 = Script::new();
        at76.append_push_data(&[0x00; 76]).expect("push should succeed");
        assert_eq!(at76.to_bytes()[0], Opcode::PushData1.to_byte());
        assert_eq!(at76.to_bytes()[1], 76);
    }

    /// Appended pushes decode back to the same operand.
    #[test]
    fn test_push_then_decode() {
        let data = [0xaa; 100];
        let mut script = Script::new();
        script.append_push_data(&data).expect("push should succeed");
        let insts: Vec<_> = script.instructions().collect();
        assert_eq!(insts.len(), 1);
        assert_eq!(insts[0].operand(), &data[..]);
    }

    /// append_opcode appends plain opcodes and chains.
    #[test]
    fn test_append_opcode() {
        let mut script = Script::new();
        script
            .append_opcode(Opcode::Dup)
            .and_then(|s| s.append_opcode(Opcode::Hash160))
            .expect("plain opcodes should append");
        assert_eq!(script.to_bytes(), &[0x76, 0xa9]);
    }

    /// append_opcode rejects push opcodes.
    #[test]
    fn test_append_opcode_rejects_push() {
        let mut script = Script::new();
        assert!(script.append_opcode(Opcode::PushData1).is_err());
        assert!(script.append_opcode(Opcode::PushBytes(5)).is_err());
        assert!(script.is_empty());
    }

    /// append_int encodes small ints as opcodes and the rest as pushes.
    #[test]
    fn test_append_int() {
        let mut script = Script::new();
        script.append_int(0);
        script.append_int(-1);
        script.append_int(1);
        script.append_int(16);
        assert_eq!(script.to_hex(), "004f5160");

        let mut script = Script::new();
        script.append_int(17);
        assert_eq!(script.to_hex(), "0111");

        let mut script = Script::new();
        script.append_int(-5);
        assert_eq!(script.to_hex(), "0185");

        let mut script = Script::new();
        script.append_int(128);
        assert_eq!(script.to_hex(), "028000");
    }

    /// append_num always data-pushes, even for small-int values.
    #[test]
    fn test_append_num() {
        let mut script = Script::new();
        script.append_num(ScriptNum::from(0));
        assert_eq!(script.to_hex(), "00");

        let mut script = Script::new();
        script.append_num(ScriptNum::from(3));
        assert_eq!(script.to_hex(), "0103");

        let mut script = Script::new();
        script.append_num(ScriptNum::from(-256));
        assert_eq!(script.to_hex(), "020081");
    }

    // -----------------------------------------------------------------------
    // Pay-to-script-hash
    // -----------------------------------------------------------------------

    /// The exact 23-byte P2SH pattern matches.
    #[test]
    fn test_is_p2sh() {
        let script = Script::from_hex("a9149de5aeaff9c48431ba4dd6e8af73d51f38e451cb87")
            .expect("valid hex");
        assert!(script.is_p2sh());
    }

    /// Any length or byte deviation fails the P2SH test.
    #[test]
    fn test_is_p2sh_deviations() {
        // P2PKH is not P2SH
        assert!(!Script::from_hex("76a91403ececf2d12a7f614aef4c82ecf13c303bd9975d88ac")
            .expect("valid hex")
            .is_p2sh());
        // One byte short
        assert!(!Script::from_hex("a9149de5aeaff9c48431ba4dd6e8af73d51f38e451cb")
            .expect("valid hex")
            .is_p2sh());
        // Wrong push length byte
        assert!(!Script::from_hex("a9139de5aeaff9c48431ba4dd6e8af73d51f38e45187")
            .expect("valid hex")
            .is_p2sh());
        // Trailing EQUALVERIFY instead of EQUAL
        assert!(!Script::from_hex("a9149de5aeaff9c48431ba4dd6e8af73d51f38e451cb88")
            .expect("valid hex")
            .is_p2sh());
        assert!(!Script::new().is_p2sh());
    }

    // -----------------------------------------------------------------------
    // Witness program
    // -----------------------------------------------------------------------

    /// Minimum form: OP_0 with a 2-byte program.
    #[test]
    fn test_witness_program_min() {
        let script = Script::from_bytes(&[0x00, 0x02, 0xab, 0xcd]);
        let wp = script.witness_program().expect("should match");
        assert_eq!(wp.version, 0);
        assert_eq!(wp.program, &[0xab, 0xcd]);
    }

    /// Maximum form: OP_1 with a 40-byte program.
    #[test]
    fn test_witness_program_max() {
        let mut bytes = vec![Opcode::Op1.to_byte(), 40];
        bytes.extend_from_slice(&[0x11; 40]);
        let script = Script::from_bytes(&bytes);
        let wp = script.witness_program().expect("should match");
        assert_eq!(wp.version, 1);
        assert_eq!(wp.program.len(), 40);
    }

    /// Total lengths 3 and 43 are always rejected.
    #[test]
    fn test_witness_program_length_bounds() {
        assert!(Script::from_bytes(&[0x00, 0x01, 0xab]).witness_program().is_none());
        let mut bytes = vec![Opcode::Op1.to_byte(), 41];
        bytes.extend_from_slice(&[0x11; 41]);
        assert!(Script::from_bytes(&bytes).witness_program().is_none());
    }

    /// The length byte must account for the whole remainder.
    #[test]
    fn test_witness_program_length_mismatch() {
        assert!(Script::from_bytes(&[0x00, 0x03, 0xab, 0xcd])
            .witness_program()
            .is_none());
    }

    /// The first opcode must be OP_0 or OP_1..OP_16.
    #[test]
    fn test_witness_program_version_opcode() {
        assert!(Script::from_bytes(&[Opcode::Op16.to_byte(), 0x02, 0xab, 0xcd])
            .witness_program()
            .is_some());
        assert!(Script::from_bytes(&[Opcode::Op1Negate.to_byte(), 0x02, 0xab, 0xcd])
            .witness_program()
            .is_none());
        assert!(Script::from_bytes(&[Opcode::Dup.to_byte(), 0x02, 0xab, 0xcd])
            .witness_program()
            .is_none());
    }

    // -----------------------------------------------------------------------
    // Push-only
    // -----------------------------------------------------------------------

    /// Scripts of pushes and small ints are push-only; OP_RESERVED counts.
    #[test]
    fn test_is_push_only() {
        assert!(Script::new().is_push_only());

        let mut script = Script::new();
        script.append_int(0);
        script.append_push_data(&[0xaa; 20]).expect("push should succeed");
        script.append_int(16);
        assert!(script.is_push_only());

        let mut reserved = Script::new();
        reserved.append_opcode(Opcode::Reserved).expect("plain opcode");
        assert!(reserved.is_push_only());
    }

    /// Any opcode above OP_16 breaks push-only.
    #[test]
    fn test_is_push_only_rejects_higher_opcodes() {
        let mut script = Script::new();
        script.append_int(1);
        script.append_opcode(Opcode::Nop).expect("plain opcode");
        assert!(!script.is_push_only());

        let mut checksig = Script::new();
        checksig.append_opcode(Opcode::CheckSig).expect("plain opcode");
        assert!(!checksig.is_push_only());
    }

    /// Truncation makes push-only false.
    #[test]
    fn test_is_push_only_truncated() {
        let script = Script::from_bytes(&[0x05, 0x01, 0x02]);
        assert!(!script.is_push_only());
    }

    /// Starting offset is honoured.
    #[test]
    fn test_is_push_only_from() {
        let mut script = Script::new();
        script.append_opcode(Opcode::CheckSig).expect("plain opcode");
        script.append_int(2);
        assert!(!script.is_push_only());
        assert!(script.is_push_only_from(1));
        assert!(script.is_push_only_from(script.len()));
    }

    // -----------------------------------------------------------------------
    // Display / serde
    // -----------------------------------------------------------------------

    /// Display is the hex string; Debug wraps it.
    #[test]
    fn test_display_debug() {
        let script = Script::from_hex("5152").expect("valid hex");
        assert_eq!(script.to_string(), "5152");
        assert_eq!(format!("{:?}", script), "Script(5152)");
    }

    /// Script serializes to and from a hex JSON string.
    #[test]
    fn test_serde_roundtrip() {
        let script = Script::from_asm("OP_2 OP_2 OP_ADD OP_4 OP_EQUALVERIFY").expect("valid ASM");
        let json_str = serde_json::to_string(&script).expect("should serialize");
        assert_eq!(json_str, r#""5252935488""#);
        let back: Script = serde_json::from_str(&json_str).expect("should deserialize");
        assert_eq!(back, script);
    }
}
