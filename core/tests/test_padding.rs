// Merkle-Damgard padding: block geometry, length-field placement, streaming
// segmentation and agreement with the real SHA-2 compression functions.

#[cfg(test)]
mod tests {
    use hashprep_core::padding::{
        pad_message, PaddedBlock, PaddingError, PaddingParams, PaddingPlan, Segmenter, ShaFamily,
    };
    use hashprep_core::stream::InputChunk;
    use hashprep_core::utils::blocks_to_bytes;
    use proptest::prelude::*;
    use sha2::digest::consts::{U128, U64};
    use sha2::digest::generic_array::GenericArray;
    use sha2::{Digest, Sha256, Sha512};

    const SHA256_IV: [u32; 8] = [
        0x6a09e667, 0xbb67ae85, 0x3c6ef372, 0xa54ff53a,
        0x510e527f, 0x9b05688c, 0x1f83d9ab, 0x5be0cd19,
    ];

    const SHA512_IV: [u64; 8] = [
        0x6a09e667f3bcc908, 0xbb67ae8584caa73b, 0x3c6ef372fe94f82b, 0xa54ff53a5f1d36f1,
        0x510e527fade682d1, 0x9b05688c2b3e6c1f, 0x1f83d9abfb41bd6b, 0x5be0cd19137e2179,
    ];

    fn message(len: usize) -> Vec<u8> {
        (0..len).map(|i| (i as u8) ^ 0x5a).collect()
    }

    fn assert_block_shape(blocks: &[PaddedBlock], width: usize) {
        assert!(!blocks.is_empty());
        for (i, block) in blocks.iter().enumerate() {
            assert_eq!(block.len(), width);
            assert_eq!(block.index, i as u64);
            assert_eq!(block.is_last, i + 1 == blocks.len());
        }
    }

// # ✅ 1. SHA-256 geometry

    #[test]
    fn abc_single_block() {
        let blocks = pad_message(b"abc", PaddingParams::SHA256).unwrap();
        assert_block_shape(&blocks, 64);
        assert_eq!(blocks.len(), 1);

        let b = &blocks[0].bytes;
        assert_eq!(&b[..3], b"abc");
        assert_eq!(b[3], 0x80);
        assert!(b[4..56].iter().all(|x| *x == 0));
        assert_eq!(&b[56..], &[0, 0, 0, 0, 0, 0, 0, 0x18]);
    }

    #[test]
    fn empty_message_is_one_block() {
        let blocks = pad_message(&[], PaddingParams::SHA256).unwrap();
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].bytes[0], 0x80);
        assert!(blocks[0].bytes[1..].iter().all(|x| *x == 0));
    }

    #[test]
    fn exact_fit_at_55_bytes() {
        let plan = PaddingPlan::new(55, PaddingParams::SHA256).unwrap();
        assert!(!plan.extra_block_needed);
        assert_eq!(plan.zero_fill, 0);
        assert_eq!(plan.total_blocks, 1);

        let blocks = pad_message(&message(55), PaddingParams::SHA256).unwrap();
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].bytes[55], 0x80);
        assert_eq!(&blocks[0].bytes[56..], &(55u64 * 8).to_be_bytes());
    }

    #[test]
    fn extra_block_at_56_bytes() {
        let plan = PaddingPlan::new(56, PaddingParams::SHA256).unwrap();
        assert!(plan.extra_block_needed);
        assert_eq!(plan.remaining, 56);
        assert_eq!(plan.zero_fill, 63);
        assert_eq!(plan.total_blocks, 2);
        assert_eq!(plan.last_block_index, 1);
        assert_eq!(plan.padded_len(), 128);

        let blocks = pad_message(&message(56), PaddingParams::SHA256).unwrap();
        assert_block_shape(&blocks, 64);
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].bytes[56], 0x80);
        assert!(blocks[0].bytes[57..].iter().all(|x| *x == 0));
        assert!(blocks[1].bytes[..56].iter().all(|x| *x == 0));
        assert_eq!(&blocks[1].bytes[56..], &448u64.to_be_bytes());
    }

    #[test]
    fn block_aligned_message_gets_padding_block() {
        let blocks = pad_message(&message(64), PaddingParams::SHA256).unwrap();
        assert_eq!(blocks.len(), 2);
        assert_eq!(&blocks[0].bytes[..], &message(64)[..]);
        assert!(!blocks[0].is_last);
        assert_eq!(blocks[1].bytes[0], 0x80);
        assert_eq!(&blocks[1].bytes[56..], &512u64.to_be_bytes());
    }

// # ✅ 2. SHA-512 geometry

    #[test]
    fn sha512_boundaries() {
        let fit = PaddingPlan::new(111, PaddingParams::SHA512).unwrap();
        assert_eq!((fit.total_blocks, fit.extra_block_needed, fit.zero_fill), (1, false, 0));

        let spill = PaddingPlan::new(112, PaddingParams::SHA512).unwrap();
        assert_eq!((spill.total_blocks, spill.extra_block_needed), (2, true));
        assert_eq!(spill.zero_fill, 256 - 112 - 17);

        let blocks = pad_message(&message(112), PaddingParams::SHA512).unwrap();
        assert_block_shape(&blocks, 128);
        assert_eq!(&blocks[1].bytes[112..], &(112u128 * 8).to_be_bytes());
    }

    #[test]
    fn family_select() {
        assert_eq!(ShaFamily::try_from(0u8).unwrap().params(), PaddingParams::SHA256);
        assert_eq!(PaddingParams::from(ShaFamily::Sha512), PaddingParams::SHA512);
        assert!(ShaFamily::try_from(2u8).is_err());
    }

// # ✅ 3. Custom widths

    #[test]
    fn narrow_length_field() {
        let params = PaddingParams::new(32, 4).unwrap();
        let plan = PaddingPlan::new(28, params).unwrap();
        assert!(plan.extra_block_needed);
        assert_eq!(plan.zero_fill, 64 - 28 - 5);

        let tail = plan.padding_bytes();
        assert_eq!(tail.len(), plan.padding_len());
        assert_eq!(tail[0], 0x80);
        assert_eq!(&tail[tail.len() - 4..], &(28u32 * 8).to_be_bytes());

        let blocks = pad_message(&message(28), params).unwrap();
        assert_block_shape(&blocks, 32);
        assert_eq!(blocks_to_bytes(&blocks).len() as u64, plan.padded_len());
    }

    #[test]
    fn max_message_len_per_field_width() {
        assert_eq!(PaddingParams::SHA256.max_message_len(), (1u64 << 61) - 1);
        assert_eq!(PaddingParams::SHA512.max_message_len(), u64::MAX);
        assert_eq!(PaddingParams::new(16, 1).unwrap().max_message_len(), 31);
    }

// # ❌ 4. Invalid parameters and oversized messages

    #[test]
    fn invalid_params() {
        assert!(matches!(
            PaddingParams::new(64, 0),
            Err(PaddingError::InvalidParams { length_field_width: 0, .. })
        ));
        assert!(matches!(
            PaddingParams::new(256, 17),
            Err(PaddingError::InvalidParams { length_field_width: 17, .. })
        ));
        // marker + 8-byte field need 9 bytes, the block must be wider
        assert!(matches!(
            PaddingParams::new(9, 8),
            Err(PaddingError::InvalidParams { block_width: 9, .. })
        ));
        assert!(PaddingParams::new(10, 8).is_ok());
        assert!(Segmenter::new(PaddingParams { block_width: 4, length_field_width: 8 }).is_err());
    }

    #[test]
    fn length_overflow_in_plan() {
        let params = PaddingParams::new(16, 1).unwrap();
        assert!(PaddingPlan::new(31, params).is_ok());
        assert_eq!(
            PaddingPlan::new(32, params),
            Err(PaddingError::LengthOverflow { message_len: 32, field_width: 1 })
        );
    }

    #[test]
    fn length_overflow_while_streaming() {
        let params = PaddingParams::new(16, 1).unwrap();
        let mut seg = Segmenter::new(params).unwrap();

        assert_eq!(seg.push(&message(20)).unwrap().len(), 1);
        assert_eq!(
            seg.push(&message(12)),
            Err(PaddingError::LengthOverflow { message_len: 32, field_width: 1 })
        );
        assert_eq!(seg.message_len(), 0);
        assert_eq!(seg.counters().messages_failed, 1);

        // the segmenter is usable again
        let blocks = seg.push_chunk(&InputChunk::last(message(5))).unwrap();
        assert_block_shape(&blocks, 16);
        assert_eq!(blocks[0].bytes[15], 40);
    }

// # ✅ 5. Streaming segmentation

    #[test]
    fn full_blocks_leave_early_and_are_never_last() {
        let mut seg = Segmenter::new(PaddingParams::SHA256).unwrap();

        assert!(seg.push(&message(63)).unwrap().is_empty());
        let early = seg.push(&message(70)).unwrap();
        assert_eq!(early.len(), 2);
        assert!(early.iter().all(|b| !b.is_last));
        assert_eq!(seg.message_len(), 133);

        let tail = seg.finish().unwrap();
        assert_eq!(tail.len(), 1);
        assert_eq!(tail[0].index, 2);
        assert!(tail[0].is_last);
    }

    #[test]
    fn chunks_equal_whole_message() {
        let msg = message(300);
        let whole = pad_message(&msg, PaddingParams::SHA512).unwrap();

        let mut seg = Segmenter::new(PaddingParams::SHA512).unwrap();
        let mut streamed = Vec::new();
        for chunk in InputChunk::split_message(&msg, 7) {
            streamed.extend(seg.push_chunk(&chunk).unwrap());
        }
        assert_eq!(streamed, whole);
    }

    #[test]
    fn abort_discards_partial_message() {
        let mut seg = Segmenter::new(PaddingParams::SHA256).unwrap();
        assert_eq!(seg.push_chunk(&InputChunk::new(message(100))).unwrap().len(), 1);
        assert!(seg.push_chunk(&InputChunk::abort()).unwrap().is_empty());
        assert_eq!(seg.message_len(), 0);
        assert_eq!(seg.counters().messages_failed, 1);

        let blocks = seg.push_chunk(&InputChunk::last(b"abc".to_vec())).unwrap();
        assert_eq!(blocks, pad_message(b"abc", PaddingParams::SHA256).unwrap());
    }

    #[test]
    fn abort_after_empty_chunks_counts_as_failed() {
        let mut seg = Segmenter::new(PaddingParams::SHA256).unwrap();

        // nothing in flight yet
        seg.push_chunk(&InputChunk::abort()).unwrap();
        assert_eq!(seg.counters().messages_failed, 0);

        seg.push_chunk(&InputChunk::new(Vec::new())).unwrap();
        seg.push_chunk(&InputChunk::new(Vec::new())).unwrap();
        seg.push_chunk(&InputChunk::abort()).unwrap();
        assert_eq!(seg.counters().messages_failed, 1);

        // a finished message leaves nothing to abort
        seg.push_chunk(&InputChunk::last(Vec::new())).unwrap();
        seg.push_chunk(&InputChunk::abort()).unwrap();
        assert_eq!(seg.counters().messages_failed, 1);
        assert_eq!(seg.counters().messages_ok, 1);
    }

    #[test]
    fn back_to_back_messages_restart_indices() {
        let mut seg = Segmenter::new(PaddingParams::SHA256).unwrap();
        let first = seg.push_chunk(&InputChunk::last(message(70))).unwrap();
        let second = seg.push_chunk(&InputChunk::last(message(10))).unwrap();

        assert_block_shape(&first, 64);
        assert_block_shape(&second, 64);
        assert_eq!(seg.counters().messages_ok, 2);
    }

    #[test]
    fn counters_track_padding() {
        let mut seg = Segmenter::new(PaddingParams::SHA256).unwrap();
        seg.push_chunk(&InputChunk::last(message(56))).unwrap();

        let c = seg.counters();
        assert_eq!(c.bytes_in, 56);
        assert_eq!(c.bytes_out, 128);
        assert_eq!(c.blocks_emitted, 2);
        assert_eq!(c.extra_blocks, 1);
        assert_eq!(c.padding_bytes, 72);
        assert_eq!(c.messages_ok, 1);
    }

    #[test]
    fn block_summary_is_hex() {
        let blocks = pad_message(&[], PaddingParams::SHA256).unwrap();
        let summary = blocks[0].summary();
        assert!(summary.contains("index: 0"));
        assert!(summary.contains("last: true"));
        assert!(summary.contains("8000000000"));
    }

// # ✅ 6. Padded blocks hash to the real digest

    fn sha256_of_blocks(blocks: &[PaddedBlock]) -> Vec<u8> {
        let mut state = SHA256_IV;
        let arrays: Vec<GenericArray<u8, U64>> = blocks.iter().map(|b| GenericArray::clone_from_slice(&b.bytes)).collect();
        sha2::compress256(&mut state, &arrays);
        state.iter().flat_map(|w| w.to_be_bytes()).collect()
    }

    fn sha512_of_blocks(blocks: &[PaddedBlock]) -> Vec<u8> {
        let mut state = SHA512_IV;
        let arrays: Vec<GenericArray<u8, U128>> = blocks.iter().map(|b| GenericArray::clone_from_slice(&b.bytes)).collect();
        sha2::compress512(&mut state, &arrays);
        state.iter().flat_map(|w| w.to_be_bytes()).collect()
    }

    #[test]
    fn sha256_digest_matches() {
        for len in [0usize, 1, 3, 55, 56, 63, 64, 65, 119, 120, 128, 1000] {
            let msg = message(len);
            let blocks = pad_message(&msg, PaddingParams::SHA256).unwrap();
            assert_eq!(sha256_of_blocks(&blocks), Sha256::digest(&msg).to_vec(), "len {len}");
        }
    }

    #[test]
    fn sha512_digest_matches() {
        for len in [0usize, 1, 3, 111, 112, 127, 128, 129, 239, 240, 1000] {
            let msg = message(len);
            let blocks = pad_message(&msg, PaddingParams::SHA512).unwrap();
            assert_eq!(sha512_of_blocks(&blocks), Sha512::digest(&msg).to_vec(), "len {len}");
        }
    }

// # ✅ 7. Properties

    proptest! {
        #[test]
        fn padded_output_is_well_formed(
            msg in proptest::collection::vec(any::<u8>(), 0..400),
            chunk_size in 1usize..80,
            wide in any::<bool>(),
        ) {
            let params = if wide { PaddingParams::SHA512 } else { PaddingParams::SHA256 };
            let width = params.block_width;
            let lfw = params.length_field_width;

            let mut seg = Segmenter::new(params).unwrap();
            let mut blocks = Vec::new();
            for chunk in InputChunk::split_message(&msg, chunk_size) {
                blocks.extend(seg.push_chunk(&chunk).unwrap());
            }

            let plan = PaddingPlan::new(msg.len() as u64, params).unwrap();
            prop_assert_eq!(blocks.len() as u64, plan.total_blocks);
            prop_assert_eq!(blocks.iter().filter(|b| b.is_last).count(), 1);

            let out = blocks_to_bytes(&blocks);
            prop_assert_eq!(out.len() % width, 0);
            prop_assert_eq!(&out[..msg.len()], &msg[..]);
            prop_assert_eq!(out[msg.len()], 0x80);
            prop_assert!(out[msg.len() + 1..out.len() - lfw].iter().all(|x| *x == 0));

            let mut field = [0u8; 16];
            field[16 - lfw..].copy_from_slice(&out[out.len() - lfw..]);
            prop_assert_eq!(u128::from_be_bytes(field), msg.len() as u128 * 8);
        }
    }
}
