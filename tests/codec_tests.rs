use lsb_codec::{
    BitWidth, StegError, bits::BitGroups, bits::regroup, capacity_bits, embed, embed_framed,
    extract, extract_framed, framed_capacity_bytes,
};
use rand::{Rng, RngCore};

/// 生成指定长度的随机字节
fn random_bytes(len: usize) -> Vec<u8> {
    let mut bytes = vec![0u8; len];
    rand::rng().fill_bytes(&mut bytes);
    bytes
}

/// 恰好容纳 `payload_len` 字节所需的最少采样数
fn samples_needed(payload_len: usize, bit_width: u8) -> usize {
    (payload_len * 8).div_ceil(bit_width as usize)
}

/// 验证文档中的具体场景
#[test]
fn test_concrete_single_bit_scenario() {
    let cover = [255, 0, 240, 255, 0, 240, 255, 0];

    let stego = embed(&cover, &[0b0000_0001], 1).unwrap();
    assert_eq!(stego, [254, 0, 240, 254, 0, 240, 254, 1]);

    let recovered = extract(&stego, 1).unwrap();
    assert_eq!(recovered, [0x01]);
}

/// 验证载荷按字节高位优先展开，组内高位先写
#[test]
fn test_msb_first_grouping() {
    // 0x41 = 0100_0001，按 3 位一组：010, 000, 01(0)
    let groups: Vec<u8> = BitGroups::new(&[0x41], 3).collect();
    assert_eq!(groups, [0b010, 0b000, 0b010]);

    let stego = embed(&[0xFF; 3], &[0x41], 3).unwrap();
    assert_eq!(stego, [0b1111_1010, 0b1111_1000, 0b1111_1010]);
}

/// 验证所有合法位宽下的往返一致性
#[test]
fn test_round_trip_all_widths() {
    let mut rng = rand::rng();

    for bit_width in 1..=7u8 {
        for _ in 0..20 {
            let payload = random_bytes(rng.random_range(0..64));
            let extra = rng.random_range(0..32);
            let cover = random_bytes(samples_needed(payload.len(), bit_width) + extra);

            let stego = embed(&cover, &payload, bit_width).unwrap();
            assert_eq!(stego.len(), cover.len());

            let recovered = extract(&stego, bit_width).unwrap();
            assert!(recovered.len() >= payload.len());
            assert_eq!(
                &recovered[..payload.len()],
                &payload[..],
                "round trip failed at bit width {bit_width}"
            );
        }
    }
}

/// 验证容量边界：恰好相等时成功，多一位即失败
#[test]
fn test_capacity_boundary() {
    // 3 个字节 = 24 位，位宽 3 时恰好需要 8 个采样
    let payload = b"abc";
    let exact = vec![0x5A; 8];
    assert_eq!(capacity_bits(exact.len(), 3).unwrap(), 24);
    assert!(embed(&exact, payload, 3).is_ok());

    // 24 位在位宽 5 下需要 4.8 个采样：5 个采样 = 25 位，4 个采样 = 20 位
    assert!(embed(&[0; 5], payload, 5).is_ok());
    assert_eq!(
        embed(&[0; 4], payload, 5),
        Err(StegError::PayloadTooLarge {
            needed_bits: 24,
            capacity_bits: 20
        })
    );

    // 位宽 1 时 23 个采样只差一位
    assert_eq!(
        embed(&[0; 23], payload, 1),
        Err(StegError::PayloadTooLarge {
            needed_bits: 24,
            capacity_bits: 23
        })
    );
}

/// 验证每个采样的高位都不会被改动
#[test]
fn test_high_bits_preserved() {
    let cover = random_bytes(512);
    let payload = random_bytes(100);

    for bit_width in 1..=7u8 {
        let stego = embed(&cover, &payload, bit_width).unwrap();
        let keep = 0xFFu8 << bit_width;

        for (i, (&before, &after)) in cover.iter().zip(&stego).enumerate() {
            assert_eq!(
                before & keep,
                after & keep,
                "high bits changed at sample {i} (bit width {bit_width})"
            );
        }
    }
}

/// 验证未使用的采样保持原样，且调用方的缓冲区不被修改
#[test]
fn test_unused_samples_untouched() {
    let cover = random_bytes(64);
    let snapshot = cover.clone();

    let stego = embed(&cover, b"hi", 2).unwrap();

    assert_eq!(cover, snapshot);
    assert_eq!(&stego[8..], &cover[8..]);
}

/// 验证空载荷时原样返回
#[test]
fn test_empty_payload_is_identity() {
    for bit_width in 1..=7u8 {
        let cover = random_bytes(37);
        assert_eq!(embed(&cover, &[], bit_width).unwrap(), cover);
    }
    assert_eq!(embed(&[], &[], 4).unwrap(), Vec::<u8>::new());
}

/// 验证非法位宽在所有操作中都被拒绝
#[test]
fn test_invalid_bit_width_rejected() {
    for bit_width in [0u8, 8, 9, 255] {
        let expected = StegError::InvalidParameter { bit_width };

        assert_eq!(capacity_bits(100, bit_width), Err(expected.clone()));
        assert_eq!(embed(&[0; 100], b"x", bit_width), Err(expected.clone()));
        assert_eq!(embed(&[], &[], bit_width), Err(expected.clone()));
        assert_eq!(extract(&[0; 100], bit_width), Err(expected.clone()));
        assert_eq!(BitWidth::new(bit_width), Err(expected.clone()));
        assert_eq!(framed_capacity_bytes(100, bit_width), Err(expected.clone()));
        assert_eq!(embed_framed(&[0; 100], b"x", bit_width), Err(expected.clone()));
        assert_eq!(extract_framed(&[0; 100], bit_width), Err(expected));
    }
}

/// 验证位宽的掩码
#[test]
fn test_bit_width_masks() {
    let width = BitWidth::try_from(3).unwrap();
    assert_eq!(width.get(), 3);
    assert_eq!(width.keep_mask(), 0b1111_1000);
    assert_eq!(width.data_mask(), 0b0000_0111);

    let widest = BitWidth::new(7).unwrap();
    assert_eq!(widest.keep_mask(), 0b1000_0000);
}

/// 验证提取时丢弃末尾不足一个字节的位
#[test]
fn test_extract_discards_partial_byte() {
    // 11 个采样 × 3 位 = 33 位，只能得到 4 个完整字节
    assert_eq!(extract(&[0xFF; 11], 3).unwrap(), [0xFF; 4]);
    assert_eq!(extract(&[0xFF; 7], 1).unwrap(), Vec::<u8>::new());
    assert!(regroup([1, 1, 1], 2).is_empty());
    assert_eq!(regroup([1, 1, 1, 1, 3], 2), [0b0101_0101]);
}

/// 验证位组迭代器报告的长度
#[test]
fn test_bit_groups_len() {
    assert_eq!(BitGroups::new(&[0; 3], 5).len(), 5);
    assert_eq!(BitGroups::new(&[0; 3], 5).count(), 5);
    assert_eq!(BitGroups::new(&[], 2).count(), 0);
}

/// 验证带长度前缀的往返，提取结果恰好等于载荷
#[test]
fn test_framed_round_trip() {
    let cover = random_bytes(4096);

    for bit_width in 1..=7u8 {
        let payload = random_bytes(framed_capacity_bytes(cover.len(), bit_width).unwrap().min(200));
        let stego = embed_framed(&cover, &payload, bit_width).unwrap();
        assert_eq!(extract_framed(&stego, bit_width).unwrap(), payload);
    }

    let stego = embed_framed(&cover, &[], 2).unwrap();
    assert_eq!(extract_framed(&stego, 2).unwrap(), Vec::<u8>::new());
}

/// 验证带长度前缀时的容量计算包含前缀
#[test]
fn test_framed_capacity() {
    // 100 个采样 × 2 位 = 25 字节，扣除 8 字节前缀后剩 17 字节
    assert_eq!(framed_capacity_bytes(100, 2).unwrap(), 17);
    assert_eq!(framed_capacity_bytes(10, 1).unwrap(), 0);

    let cover = vec![0u8; 100];
    assert!(embed_framed(&cover, &[7; 17], 2).is_ok());
    assert_eq!(
        embed_framed(&cover, &[7; 18], 2),
        Err(StegError::PayloadTooLarge {
            needed_bits: 208,
            capacity_bits: 200
        })
    );
}

/// 验证无效的长度前缀会被识别
#[test]
fn test_framed_invalid_length() {
    // 全 1 的低位会解码出一个巨大的长度
    assert!(matches!(
        extract_framed(&[0xFF; 256], 1),
        Err(StegError::InvalidLength { available: 24, .. })
    ));

    // 放不下前缀
    assert_eq!(
        extract_framed(&[0; 10], 1),
        Err(StegError::InvalidLength {
            declared: 0,
            available: 1
        })
    );
}

fn assert_send_sync<T: Send + Sync>() {}

/// 验证公开类型可以跨线程使用
#[test]
fn test_public_types_are_send_sync() {
    assert_send_sync::<BitWidth>();
    assert_send_sync::<StegError>();
    assert_send_sync::<lsb_codec::carrier::Carrier>();

    let cover = random_bytes(256);
    let handles: Vec<_> = (1..=7u8)
        .map(|bit_width| {
            let cover = cover.clone();
            std::thread::spawn(move || {
                let stego = embed(&cover, b"threads", bit_width).unwrap();
                extract(&stego, bit_width).unwrap()
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(&handle.join().unwrap()[..7], b"threads");
    }
}
