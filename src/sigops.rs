//! Consensus signature-operation counting.
//!
//! The count bounds block validation cost, so the rules are bit-exact
//! across the Genesis boundary: pre-fork inaccurate counting charges a
//! fixed ceiling per CHECKMULTISIG, accurate and post-fork counting read
//! the preceding push as the key count, and post-fork a malformed key
//! count makes the whole script permanently unspendable.

use crate::config::{
    MAX_PUB_KEYS_PER_MULTISIG_BEFORE_GENESIS, MAX_SCRIPT_NUMBER_LENGTH_BEFORE_GENESIS,
};
use crate::opcodes::Opcode;
use crate::script::Script;
use crate::script_num::{is_minimally_encoded, ScriptNum};

/// Permanent consensus failure: a CHECKMULTISIG key count that is
/// oversized, non-minimally encoded or negative. A script that trips this
/// can never be spent; callers must treat it as a hard validation failure,
/// not a retryable condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("malformed multisig key count makes the script unspendable")]
pub struct SigOpCountError;

impl Script {
    /// Count signature operations in this script.
    ///
    /// A single left-to-right pass; decoding stops silently at a
    /// truncation sentinel, so a malformed tail simply stops contributing.
    /// CHECKSIG and CHECKSIGVERIFY count one each. For CHECKMULTISIG and
    /// CHECKMULTISIGVERIFY the instruction before the opcode carries the
    /// key count:
    ///
    /// - with `accurate` (or post-Genesis) and a preceding OP_1..OP_16,
    ///   that value is charged;
    /// - post-Genesis with any other preceding push, the operand is read
    ///   as a bounded, minimally-encoded, non-negative number; violations
    ///   are a permanent [`SigOpCountError`] (OP_0 charges nothing);
    /// - otherwise the pre-fork ceiling of
    ///   [`MAX_PUB_KEYS_PER_MULTISIG_BEFORE_GENESIS`] is charged.
    pub fn sig_op_count(
        &self,
        accurate: bool,
        genesis_enabled: bool,
    ) -> Result<u64, SigOpCountError> {
        let mut n: u64 = 0;
        let mut last_opcode = Opcode::Invalid;
        let mut last_operand: &[u8] = &[];

        for inst in self.instructions() {
            let opcode = inst.opcode();
            if opcode == Opcode::Invalid {
                break;
            }

            match opcode {
                Opcode::CheckSig | Opcode::CheckSigVerify => n += 1,
                Opcode::CheckMultiSig | Opcode::CheckMultiSigVerify => {
                    // OP_1..OP_16 directly before the multisig, excluding OP_0.
                    let prev_small = last_opcode
                        .small_int_value()
                        .filter(|&v| v >= 1)
                        .map(|v| v as u64);
                    if let Some(keys) = prev_small.filter(|_| accurate || genesis_enabled) {
                        n += keys;
                    } else if genesis_enabled {
                        // Post-Genesis the count is always accurate; a key
                        // count the interpreter would reject at spend time
                        // makes the coin unspendable.
                        if last_opcode == Opcode::Op0 {
                            // zero keys, nothing to add
                        } else if last_operand.len() > MAX_SCRIPT_NUMBER_LENGTH_BEFORE_GENESIS {
                            return Err(SigOpCountError);
                        } else if !is_minimally_encoded(
                            last_operand,
                            MAX_SCRIPT_NUMBER_LENGTH_BEFORE_GENESIS,
                        ) {
                            return Err(SigOpCountError);
                        } else {
                            let num = ScriptNum::from_bytes(
                                last_operand,
                                true,
                                MAX_SCRIPT_NUMBER_LENGTH_BEFORE_GENESIS,
                            )
                            .map_err(|_| SigOpCountError)?;
                            if num.value() < 0 {
                                return Err(SigOpCountError);
                            }
                            n += num.value() as u64;
                        }
                    } else {
                        n += MAX_PUB_KEYS_PER_MULTISIG_BEFORE_GENESIS as u64;
                    }
                }
                _ => {}
            }

            last_opcode = opcode;
            last_operand = inst.operand();
        }

        Ok(n)
    }

    /// Count the signature operations a spend of this output executes,
    /// unwrapping one level of pay-to-script-hash.
    ///
    /// For a non-P2SH output this is the accurate count of the output
    /// script itself. For P2SH, `script_sig` must decode cleanly and be
    /// push-only, or the count is zero; the last pushed operand is the
    /// redeem script. Post-Genesis the redeem script is never executed
    /// under this pattern, so the count is zero; pre-Genesis the redeem
    /// script is counted accurately. Redeem scripts are not unwrapped
    /// further.
    pub fn sig_op_count_for_spend(
        &self,
        script_sig: &Script,
        genesis_enabled: bool,
    ) -> Result<u64, SigOpCountError> {
        if !self.is_p2sh() {
            return self.sig_op_count(true, genesis_enabled);
        }

        // The redeem script is the last item the scriptSig pushes.
        let mut redeem: &[u8] = &[];
        for inst in script_sig.instructions() {
            if inst.opcode() == Opcode::Invalid || !inst.opcode().is_push() {
                return Ok(0);
            }
            redeem = inst.operand();
        }

        if genesis_enabled {
            // P2SH is not supported after Genesis; the redeem script is
            // never executed.
            return Ok(0);
        }

        Script::from_bytes(redeem).sig_op_count(true, genesis_enabled)
    }
}
