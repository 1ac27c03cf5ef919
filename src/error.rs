/// Errors from script construction and parsing.
///
/// Consensus-path failures have their own representations: decode
/// truncation surfaces as a sentinel instruction, numeric failures as
/// `ScriptNumError`, and permanent sigop failures as `SigOpCountError`.
#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
    /// Invalid hex string.
    #[error("invalid hex: {0}")]
    InvalidHex(String),

    /// Hex decoding error.
    #[error("hex decode error: {0}")]
    HexDecode(#[from] hex::FromHexError),

    /// An ASM token that is neither an opcode name nor hex data.
    #[error("invalid ASM token: {0}")]
    InvalidAsmToken(String),

    /// Attempted to append a push-data opcode without its data.
    #[error("use append_push_data for push opcodes: {0}")]
    InvalidOpcodeType(String),

    /// Push data exceeds the maximum a PUSHDATA4 prefix can express.
    #[error("data too big")]
    DataTooBig,
}
