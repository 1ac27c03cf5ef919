//! Opcode catalog: every byte value a script can contain.
//!
//! An opcode is one byte. Values 0x01..=0x4b are direct pushes whose numeric
//! value is the operand length; the remaining assigned values have symbolic
//! names. The byte -> opcode mapping is total: unassigned bytes map to
//! `Unknown`, so decoding never fails at the catalog level.

use std::fmt;

/// A script opcode, tagged by meaning rather than raw byte value.
///
/// `PushBytes(n)` covers the 75 direct-push opcodes (the byte *is* the push
/// length); `Unknown` covers the unassigned range 0xba..=0xfe; everything
/// else is a named opcode. `Invalid` (0xff) doubles as the decoder's
/// truncation sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Opcode {
    // push value
    Op0,
    /// Direct push of the next `n` bytes, `n` in 1..=75.
    PushBytes(u8),
    PushData1,
    PushData2,
    PushData4,
    Op1Negate,
    Reserved,
    Op1,
    Op2,
    Op3,
    Op4,
    Op5,
    Op6,
    Op7,
    Op8,
    Op9,
    Op10,
    Op11,
    Op12,
    Op13,
    Op14,
    Op15,
    Op16,

    // control
    Nop,
    Ver,
    If,
    NotIf,
    VerIf,
    VerNotIf,
    Else,
    EndIf,
    Verify,
    Return,

    // stack ops
    ToAltStack,
    FromAltStack,
    Drop2,
    Dup2,
    Dup3,
    Over2,
    Rot2,
    Swap2,
    IfDup,
    Depth,
    Drop,
    Dup,
    Nip,
    Over,
    Pick,
    Roll,
    Rot,
    Swap,
    Tuck,

    // splice ops
    Cat,
    Split,
    Num2Bin,
    Bin2Num,
    Size,

    // bit logic
    Invert,
    And,
    Or,
    Xor,
    Equal,
    EqualVerify,
    Reserved1,
    Reserved2,

    // numeric
    Add1,
    Sub1,
    Mul2,
    Div2,
    Negate,
    Abs,
    Not,
    ZeroNotEqual,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    LShift,
    RShift,
    BoolAnd,
    BoolOr,
    NumEqual,
    NumEqualVerify,
    NumNotEqual,
    LessThan,
    GreaterThan,
    LessThanOrEqual,
    GreaterThanOrEqual,
    Min,
    Max,
    Within,

    // crypto
    Ripemd160,
    Sha1,
    Sha256,
    Hash160,
    Hash256,
    CodeSeparator,
    CheckSig,
    CheckSigVerify,
    CheckMultiSig,
    CheckMultiSigVerify,

    // expansion
    Nop1,
    CheckLockTimeVerify,
    CheckSequenceVerify,
    Nop4,
    Nop5,
    Nop6,
    Nop7,
    Nop8,
    Nop9,
    Nop10,

    /// 0xff. Also produced by the decoder when a script is truncated.
    Invalid,
    /// An unassigned byte value (0xba..=0xfe).
    Unknown(u8),
}

impl Opcode {
    /// Map a raw byte to its opcode. Total: every byte has a meaning,
    /// with 1..=75 becoming `PushBytes` and unassigned bytes `Unknown`.
    pub fn from_byte(b: u8) -> Opcode {
        use Opcode::*;
        match b {
            0x00 => Op0,
            0x01..=0x4b => PushBytes(b),
            0x4c => PushData1,
            0x4d => PushData2,
            0x4e => PushData4,
            0x4f => Op1Negate,
            0x50 => Reserved,
            0x51 => Op1,
            0x52 => Op2,
            0x53 => Op3,
            0x54 => Op4,
            0x55 => Op5,
            0x56 => Op6,
            0x57 => Op7,
            0x58 => Op8,
            0x59 => Op9,
            0x5a => Op10,
            0x5b => Op11,
            0x5c => Op12,
            0x5d => Op13,
            0x5e => Op14,
            0x5f => Op15,
            0x60 => Op16,
            0x61 => Nop,
            0x62 => Ver,
            0x63 => If,
            0x64 => NotIf,
            0x65 => VerIf,
            0x66 => VerNotIf,
            0x67 => Else,
            0x68 => EndIf,
            0x69 => Verify,
            0x6a => Return,
            0x6b => ToAltStack,
            0x6c => FromAltStack,
            0x6d => Drop2,
            0x6e => Dup2,
            0x6f => Dup3,
            0x70 => Over2,
            0x71 => Rot2,
            0x72 => Swap2,
            0x73 => IfDup,
            0x74 => Depth,
            0x75 => Drop,
            0x76 => Dup,
            0x77 => Nip,
            0x78 => Over,
            0x79 => Pick,
            0x7a => Roll,
            0x7b => Rot,
            0x7c => Swap,
            0x7d => Tuck,
            0x7e => Cat,
            0x7f => Split,
            0x80 => Num2Bin,
            0x81 => Bin2Num,
            0x82 => Size,
            0x83 => Invert,
            0x84 => And,
            0x85 => Or,
            0x86 => Xor,
            0x87 => Equal,
            0x88 => EqualVerify,
            0x89 => Reserved1,
            0x8a => Reserved2,
            0x8b => Add1,
            0x8c => Sub1,
            0x8d => Mul2,
            0x8e => Div2,
            0x8f => Negate,
            0x90 => Abs,
            0x91 => Not,
            0x92 => ZeroNotEqual,
            0x93 => Add,
            0x94 => Sub,
            0x95 => Mul,
            0x96 => Div,
            0x97 => Mod,
            0x98 => LShift,
            0x99 => RShift,
            0x9a => BoolAnd,
            0x9b => BoolOr,
            0x9c => NumEqual,
            0x9d => NumEqualVerify,
            0x9e => NumNotEqual,
            0x9f => LessThan,
            0xa0 => GreaterThan,
            0xa1 => LessThanOrEqual,
            0xa2 => GreaterThanOrEqual,
            0xa3 => Min,
            0xa4 => Max,
            0xa5 => Within,
            0xa6 => Ripemd160,
            0xa7 => Sha1,
            0xa8 => Sha256,
            0xa9 => Hash160,
            0xaa => Hash256,
            0xab => CodeSeparator,
            0xac => CheckSig,
            0xad => CheckSigVerify,
            0xae => CheckMultiSig,
            0xaf => CheckMultiSigVerify,
            0xb0 => Nop1,
            0xb1 => CheckLockTimeVerify,
            0xb2 => CheckSequenceVerify,
            0xb3 => Nop4,
            0xb4 => Nop5,
            0xb5 => Nop6,
            0xb6 => Nop7,
            0xb7 => Nop8,
            0xb8 => Nop9,
            0xb9 => Nop10,
            0xff => Invalid,
            other => Unknown(other),
        }
    }

    /// The raw byte value of this opcode. Total inverse of `from_byte`.
    pub fn to_byte(self) -> u8 {
        use Opcode::*;
        match self {
            Op0 => 0x00,
            PushBytes(n) => n,
            PushData1 => 0x4c,
            PushData2 => 0x4d,
            PushData4 => 0x4e,
            Op1Negate => 0x4f,
            Reserved => 0x50,
            Op1 => 0x51,
            Op2 => 0x52,
            Op3 => 0x53,
            Op4 => 0x54,
            Op5 => 0x55,
            Op6 => 0x56,
            Op7 => 0x57,
            Op8 => 0x58,
            Op9 => 0x59,
            Op10 => 0x5a,
            Op11 => 0x5b,
            Op12 => 0x5c,
            Op13 => 0x5d,
            Op14 => 0x5e,
            Op15 => 0x5f,
            Op16 => 0x60,
            Nop => 0x61,
            Ver => 0x62,
            If => 0x63,
            NotIf => 0x64,
            VerIf => 0x65,
            VerNotIf => 0x66,
            Else => 0x67,
            EndIf => 0x68,
            Verify => 0x69,
            Return => 0x6a,
            ToAltStack => 0x6b,
            FromAltStack => 0x6c,
            Drop2 => 0x6d,
            Dup2 => 0x6e,
            Dup3 => 0x6f,
            Over2 => 0x70,
            Rot2 => 0x71,
            Swap2 => 0x72,
            IfDup => 0x73,
            Depth => 0x74,
            Drop => 0x75,
            Dup => 0x76,
            Nip => 0x77,
            Over => 0x78,
            Pick => 0x79,
            Roll => 0x7a,
            Rot => 0x7b,
            Swap => 0x7c,
            Tuck => 0x7d,
            Cat => 0x7e,
            Split => 0x7f,
            Num2Bin => 0x80,
            Bin2Num => 0x81,
            Size => 0x82,
            Invert => 0x83,
            And => 0x84,
            Or => 0x85,
            Xor => 0x86,
            Equal => 0x87,
            EqualVerify => 0x88,
            Reserved1 => 0x89,
            Reserved2 => 0x8a,
            Add1 => 0x8b,
            Sub1 => 0x8c,
            Mul2 => 0x8d,
            Div2 => 0x8e,
            Negate => 0x8f,
            Abs => 0x90,
            Not => 0x91,
            ZeroNotEqual => 0x92,
            Add => 0x93,
            Sub => 0x94,
            Mul => 0x95,
            Div => 0x96,
            Mod => 0x97,
            LShift => 0x98,
            RShift => 0x99,
            BoolAnd => 0x9a,
            BoolOr => 0x9b,
            NumEqual => 0x9c,
            NumEqualVerify => 0x9d,
            NumNotEqual => 0x9e,
            LessThan => 0x9f,
            GreaterThan => 0xa0,
            LessThanOrEqual => 0xa1,
            GreaterThanOrEqual => 0xa2,
            Min => 0xa3,
            Max => 0xa4,
            Within => 0xa5,
            Ripemd160 => 0xa6,
            Sha1 => 0xa7,
            Sha256 => 0xa8,
            Hash160 => 0xa9,
            Hash256 => 0xaa,
            CodeSeparator => 0xab,
            CheckSig => 0xac,
            CheckSigVerify => 0xad,
            CheckMultiSig => 0xae,
            CheckMultiSigVerify => 0xaf,
            Nop1 => 0xb0,
            CheckLockTimeVerify => 0xb1,
            CheckSequenceVerify => 0xb2,
            Nop4 => 0xb3,
            Nop5 => 0xb4,
            Nop6 => 0xb5,
            Nop7 => 0xb6,
            Nop8 => 0xb7,
            Nop9 => 0xb8,
            Nop10 => 0xb9,
            Invalid => 0xff,
            Unknown(b) => b,
        }
    }

    /// The canonical name of this opcode.
    ///
    /// Total and stable: direct pushes name as "OP_PUSHBYTES" and
    /// unassigned bytes as "OP_UNKNOWN".
    pub fn name(self) -> &'static str {
        use Opcode::*;
        match self {
            Op0 => "OP_0",
            PushBytes(_) => "OP_PUSHBYTES",
            PushData1 => "OP_PUSHDATA1",
            PushData2 => "OP_PUSHDATA2",
            PushData4 => "OP_PUSHDATA4",
            Op1Negate => "OP_1NEGATE",
            Reserved => "OP_RESERVED",
            Op1 => "OP_1",
            Op2 => "OP_2",
            Op3 => "OP_3",
            Op4 => "OP_4",
            Op5 => "OP_5",
            Op6 => "OP_6",
            Op7 => "OP_7",
            Op8 => "OP_8",
            Op9 => "OP_9",
            Op10 => "OP_10",
            Op11 => "OP_11",
            Op12 => "OP_12",
            Op13 => "OP_13",
            Op14 => "OP_14",
            Op15 => "OP_15",
            Op16 => "OP_16",
            Nop => "OP_NOP",
            Ver => "OP_VER",
            If => "OP_IF",
            NotIf => "OP_NOTIF",
            VerIf => "OP_VERIF",
            VerNotIf => "OP_VERNOTIF",
            Else => "OP_ELSE",
            EndIf => "OP_ENDIF",
            Verify => "OP_VERIFY",
            Return => "OP_RETURN",
            ToAltStack => "OP_TOALTSTACK",
            FromAltStack => "OP_FROMALTSTACK",
            Drop2 => "OP_2DROP",
            Dup2 => "OP_2DUP",
            Dup3 => "OP_3DUP",
            Over2 => "OP_2OVER",
            Rot2 => "OP_2ROT",
            Swap2 => "OP_2SWAP",
            IfDup => "OP_IFDUP",
            Depth => "OP_DEPTH",
            Drop => "OP_DROP",
            Dup => "OP_DUP",
            Nip => "OP_NIP",
            Over => "OP_OVER",
            Pick => "OP_PICK",
            Roll => "OP_ROLL",
            Rot => "OP_ROT",
            Swap => "OP_SWAP",
            Tuck => "OP_TUCK",
            Cat => "OP_CAT",
            Split => "OP_SPLIT",
            Num2Bin => "OP_NUM2BIN",
            Bin2Num => "OP_BIN2NUM",
            Size => "OP_SIZE",
            Invert => "OP_INVERT",
            And => "OP_AND",
            Or => "OP_OR",
            Xor => "OP_XOR",
            Equal => "OP_EQUAL",
            EqualVerify => "OP_EQUALVERIFY",
            Reserved1 => "OP_RESERVED1",
            Reserved2 => "OP_RESERVED2",
            Add1 => "OP_1ADD",
            Sub1 => "OP_1SUB",
            Mul2 => "OP_2MUL",
            Div2 => "OP_2DIV",
            Negate => "OP_NEGATE",
            Abs => "OP_ABS",
            Not => "OP_NOT",
            ZeroNotEqual => "OP_0NOTEQUAL",
            Add => "OP_ADD",
            Sub => "OP_SUB",
            Mul => "OP_MUL",
            Div => "OP_DIV",
            Mod => "OP_MOD",
            LShift => "OP_LSHIFT",
            RShift => "OP_RSHIFT",
            BoolAnd => "OP_BOOLAND",
            BoolOr => "OP_BOOLOR",
            NumEqual => "OP_NUMEQUAL",
            NumEqualVerify => "OP_NUMEQUALVERIFY",
            NumNotEqual => "OP_NUMNOTEQUAL",
            LessThan => "OP_LESSTHAN",
            GreaterThan => "OP_GREATERTHAN",
            LessThanOrEqual => "OP_LESSTHANOREQUAL",
            GreaterThanOrEqual => "OP_GREATERTHANOREQUAL",
            Min => "OP_MIN",
            Max => "OP_MAX",
            Within => "OP_WITHIN",
            Ripemd160 => "OP_RIPEMD160",
            Sha1 => "OP_SHA1",
            Sha256 => "OP_SHA256",
            Hash160 => "OP_HASH160",
            Hash256 => "OP_HASH256",
            CodeSeparator => "OP_CODESEPARATOR",
            CheckSig => "OP_CHECKSIG",
            CheckSigVerify => "OP_CHECKSIGVERIFY",
            CheckMultiSig => "OP_CHECKMULTISIG",
            CheckMultiSigVerify => "OP_CHECKMULTISIGVERIFY",
            Nop1 => "OP_NOP1",
            CheckLockTimeVerify => "OP_CHECKLOCKTIMEVERIFY",
            CheckSequenceVerify => "OP_CHECKSEQUENCEVERIFY",
            Nop4 => "OP_NOP4",
            Nop5 => "OP_NOP5",
            Nop6 => "OP_NOP6",
            Nop7 => "OP_NOP7",
            Nop8 => "OP_NOP8",
            Nop9 => "OP_NOP9",
            Nop10 => "OP_NOP10",
            Invalid => "OP_INVALIDOPCODE",
            Unknown(_) => "OP_UNKNOWN",
        }
    }

    /// Look up a named opcode by its canonical name.
    ///
    /// Accepts the "OP_FALSE"/"OP_TRUE" aliases used in ASM text. Direct
    /// pushes and unassigned bytes have no unique name and never match.
    pub fn from_name(name: &str) -> Option<Opcode> {
        match name {
            "OP_FALSE" => return Some(Opcode::Op0),
            "OP_TRUE" => return Some(Opcode::Op1),
            _ => {}
        }
        (0u8..=0xff)
            .map(Opcode::from_byte)
            .find(|op| !matches!(op, Opcode::PushBytes(_) | Opcode::Unknown(_)) && op.name() == name)
    }

    /// The integer a small-int push opcode stands for: 0 for OP_0,
    /// 1..=16 for OP_1..OP_16. `None` for everything else.
    pub fn small_int_value(self) -> Option<i64> {
        match self {
            Opcode::Op0 => Some(0),
            _ => {
                let b = self.to_byte();
                if (Opcode::Op1.to_byte()..=Opcode::Op16.to_byte()).contains(&b) {
                    Some((b - Opcode::Op1.to_byte() + 1) as i64)
                } else {
                    None
                }
            }
        }
    }

    /// Whether this opcode is push-like: byte value at or below OP_16.
    ///
    /// This is a structural test, not an executability test: OP_RESERVED
    /// sits in the push range and counts, even though executing it fails.
    pub fn is_push(self) -> bool {
        self.to_byte() <= Opcode::Op16.to_byte()
    }
}

impl From<Opcode> for u8 {
    fn from(op: Opcode) -> u8 {
        op.to_byte()
    }
}

impl From<u8> for Opcode {
    fn from(b: u8) -> Opcode {
        Opcode::from_byte(b)
    }
}

impl fmt::Display for Opcode {
    /// Direct pushes display as their decimal length, everything else by name.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Opcode::PushBytes(n) => write!(f, "{}", n),
            other => f.write_str(other.name()),
        }
    }
}
