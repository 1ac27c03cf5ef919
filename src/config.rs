//! Protocol limit constants that apply before the Genesis upgrade.
//!
//! Post-Genesis most of these bounds become policy knobs owned by the
//! caller; the values below are the fixed pre-fork consensus limits this
//! crate's counting and encoding rules reference.

/// Maximum serialized script size before Genesis.
pub const MAX_SCRIPT_SIZE_BEFORE_GENESIS: usize = 10_000;

/// Maximum stack element size before Genesis.
pub const MAX_SCRIPT_ELEMENT_SIZE_BEFORE_GENESIS: usize = 520;

/// Maximum non-push operations per script before Genesis.
pub const MAX_OPS_BEFORE_GENESIS: usize = 500;

/// Maximum combined stack depth before Genesis.
pub const MAX_STACK_SIZE_BEFORE_GENESIS: usize = 1_000;

/// Maximum byte length of a script number. Multisig key counts are bound
/// by this in post-Genesis accurate sigop counting.
pub const MAX_SCRIPT_NUMBER_LENGTH_BEFORE_GENESIS: usize = 4;

/// Maximum keys in a CHECKMULTISIG before Genesis; also the ceiling
/// charged per multisig in pre-fork inaccurate sigop counting.
pub const MAX_PUB_KEYS_PER_MULTISIG_BEFORE_GENESIS: usize = 20;
