use proptest::prelude::*;

use bsv_script_core::{is_minimally_encoded, InstructionIter, Opcode, Script, ScriptNum};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn script_num_encode_decode_roundtrip(val in -0x7FFFFFFFi64..=0x7FFFFFFFi64) {
        let bytes = ScriptNum::from(val).to_bytes();
        prop_assert!(bytes.len() <= 4);
        prop_assert!(is_minimally_encoded(&bytes, 4));
        let back = ScriptNum::from_bytes(&bytes, true, 4).unwrap();
        prop_assert_eq!(back.value(), val);
    }

    #[test]
    fn script_bytes_roundtrip(data in prop::collection::vec(any::<u8>(), 0..512)) {
        let script = Script::from_bytes(&data);
        prop_assert_eq!(&data[..], script.to_bytes());
    }

    #[test]
    fn script_hex_roundtrip(data in prop::collection::vec(any::<u8>(), 0..256)) {
        let script = Script::from_bytes(&data);
        let script2 = Script::from_hex(&script.to_hex()).unwrap();
        prop_assert_eq!(script.to_bytes(), script2.to_bytes());
    }

    #[test]
    fn opcode_byte_roundtrip(b in any::<u8>()) {
        prop_assert_eq!(Opcode::from_byte(b).to_byte(), b);
    }

    // Decoding arbitrary bytes never panics, terminates, and is
    // restartable: two passes see the same instructions.
    #[test]
    fn decode_is_total_and_restartable(data in prop::collection::vec(any::<u8>(), 0..512)) {
        let first: Vec<_> = InstructionIter::new(&data).collect();
        let second: Vec<_> = InstructionIter::new(&data).collect();
        prop_assert_eq!(first, second);
    }

    // Every decoded instruction spans exactly the bytes between its offset
    // and the next instruction's offset.
    #[test]
    fn decode_offsets_are_ordered(data in prop::collection::vec(any::<u8>(), 0..512)) {
        let offsets: Vec<_> = InstructionIter::new(&data).map(|i| i.offset()).collect();
        for pair in offsets.windows(2) {
            prop_assert!(pair[0] < pair[1]);
        }
    }

    // Whatever append_push_data wrote, decoding returns the same operand.
    #[test]
    fn push_data_decodes_back(data in prop::collection::vec(any::<u8>(), 0..300)) {
        let mut script = Script::new();
        script.append_push_data(&data).unwrap();
        let insts: Vec<_> = script.instructions().collect();
        prop_assert_eq!(insts.len(), 1);
        prop_assert_eq!(insts[0].operand(), &data[..]);
    }

    // append_int round-trips through the decoder: a small int comes back
    // as its opcode value, anything else as its minimal encoding.
    #[test]
    fn append_int_decodes_back(val in -0x7FFFFFFFi64..=0x7FFFFFFFi64) {
        let mut script = Script::new();
        script.append_int(val);
        let inst = script.instructions().next().unwrap();
        if val == -1 {
            prop_assert_eq!(inst.opcode(), Opcode::Op1Negate);
        } else if val == 0 {
            prop_assert_eq!(inst.opcode(), Opcode::Op0);
        } else if (1..=16).contains(&val) {
            prop_assert_eq!(inst.opcode().small_int_value(), Some(val));
        } else {
            let back = ScriptNum::from_bytes(inst.operand(), true, 4).unwrap();
            prop_assert_eq!(back.value(), val);
        }
    }

    // Sigop counting over arbitrary bytes never panics and the count is
    // identical on repeated runs.
    #[test]
    fn sig_op_count_is_deterministic(
        data in prop::collection::vec(any::<u8>(), 0..512),
        accurate in any::<bool>(),
        genesis in any::<bool>(),
    ) {
        let script = Script::from_bytes(&data);
        prop_assert_eq!(
            script.sig_op_count(accurate, genesis),
            script.sig_op_count(accurate, genesis)
        );
    }
}
