use enough::Unstoppable;
use rgb::RGB8;
use zenrgba::*;

fn pixels(bmp: &Bitmap, row: u32) -> Vec<[u8; 4]> {
    bmp.scanline(row)[..bmp.width() as usize * 4]
        .chunks_exact(4)
        .map(|p| [p[0], p[1], p[2], p[3]])
        .collect()
}

fn gradient_palette(n: usize) -> Vec<RGB8> {
    (0..n)
        .map(|i| RGB8::new(i as u8, 255 - i as u8, (i * 7) as u8))
        .collect()
}

#[test]
fn one_bit_always_opaque() {
    let mut src = Bitmap::allocate(19, 3, 1, ChannelMasks::NONE)
        .unwrap()
        .with_palette(vec![RGB8::new(0, 0, 0), RGB8::new(255, 255, 255)])
        .unwrap();
    for row in 0..3 {
        for (i, b) in src.scanline_mut(row).iter_mut().enumerate() {
            *b = (i as u8).wrapping_mul(37) ^ (row as u8 * 91);
        }
    }
    let out = convert_to_32bits(Some(&src), Unstoppable).unwrap();
    for row in 0..3 {
        assert!(pixels(&out, row).iter().all(|p| p[3] == 255));
    }
}

#[test]
fn eight_bit_transparency_bounds() {
    let table: Vec<u8> = vec![0, 50, 100, 150];
    let mut src = Bitmap::allocate(256, 1, 8, ChannelMasks::NONE)
        .unwrap()
        .with_palette(gradient_palette(256))
        .unwrap()
        .with_transparency(table.clone())
        .unwrap();
    for (i, b) in src.scanline_mut(0).iter_mut().enumerate() {
        *b = i as u8;
    }
    let out = convert_to_32bits(Some(&src), Unstoppable).unwrap();
    for (index, px) in pixels(&out, 0).iter().enumerate() {
        let expected = table.get(index).copied().unwrap_or(255);
        assert_eq!(px[3], expected, "alpha for index {index}");
        assert_eq!(&px[..3], &[index as u8, 255 - index as u8, (index * 7) as u8]);
    }
}

#[test]
fn sixteen_bit_555_white() {
    let mut src = Bitmap::allocate(1, 1, 16, ChannelMasks::RGB555).unwrap();
    src.scanline_mut(0)[..2].copy_from_slice(&0x7FFFu16.to_le_bytes());
    let out = convert_to_32bits(Some(&src), Unstoppable).unwrap();
    assert_eq!(pixels(&out, 0), [[255, 255, 255, 255]]);
}

#[test]
fn sixteen_bit_layout_detection() {
    // 0xF800 is pure red in 565; in 555 it is the top (unused) bit plus four red bits
    let word = 0xF800u16.to_le_bytes();

    let mut src565 = Bitmap::allocate(1, 1, 16, ChannelMasks::RGB565).unwrap();
    src565.scanline_mut(0)[..2].copy_from_slice(&word);
    let out = convert_to_32bits(Some(&src565), Unstoppable).unwrap();
    assert_eq!(pixels(&out, 0), [[255, 0, 0, 255]]);

    let mut undeclared = Bitmap::allocate(1, 1, 16, ChannelMasks::NONE).unwrap();
    undeclared.scanline_mut(0)[..2].copy_from_slice(&word);
    let out = convert_to_32bits(Some(&undeclared), Unstoppable).unwrap();
    // (0xF800 & 0x7C00) >> 10 = 30; 30 * 255 / 31 = 246
    // (0xF800 & 0x03E0) >> 5 = 0
    assert_eq!(pixels(&out, 0), [[246, 0, 0, 255]]);
}

#[test]
fn twenty_four_bit_structural_copy() {
    let width = 85u32; // 255 bytes of colour, stride padded to 256
    let mut src = Bitmap::allocate(width, 2, 24, ChannelMasks::NONE).unwrap();
    for row in 0..2 {
        for (i, b) in src.scanline_mut(row)[..width as usize * 3]
            .iter_mut()
            .enumerate()
        {
            *b = (i as u8).wrapping_add(row as u8);
        }
    }
    let out = convert_to_32bits(Some(&src), Unstoppable).unwrap();
    for row in 0..2 {
        let rgb = &src.scanline(row)[..width as usize * 3];
        for (px, triplet) in pixels(&out, row).iter().zip(rgb.chunks_exact(3)) {
            assert_eq!(px, &[triplet[0], triplet[1], triplet[2], 255]);
        }
    }
}

#[test]
fn thirty_two_bit_identity() {
    let mut src = Bitmap::allocate(3, 2, 32, ChannelMasks::for_order(ChannelOrder::BGRA)).unwrap();
    for row in 0..2 {
        for (i, b) in src.scanline_mut(row).iter_mut().enumerate() {
            *b = (i as u8) * 3 + row as u8;
        }
    }
    let out = convert_to_32bits(Some(&src), Unstoppable).unwrap();
    assert_eq!(out, src);
    assert_eq!(out.pixels(), src.pixels());
}

#[test]
fn unsupported_depth_is_duplicated() {
    for depth in [2u16, 48, 64, 128] {
        let mut src = Bitmap::allocate(5, 2, depth, ChannelMasks::NONE).unwrap();
        src.scanline_mut(1)[0] = 0xA5;
        let out = convert_to_32bits(Some(&src), Unstoppable)
            .unwrap_or_else(|e| panic!("depth {depth} should duplicate, got {e:?}"));
        assert_eq!(out.bit_depth(), depth);
        assert_eq!(out, src);
    }
}

#[test]
fn absent_input_is_error_not_panic() {
    let result = convert_to_32bits::<Bitmap>(None, Unstoppable);
    assert!(matches!(result, Err(BitmapError::AbsentInput)));
    let result = ConvertRequest::<Bitmap>::from_option(None).convert(Unstoppable);
    assert!(matches!(result, Err(BitmapError::AbsentInput)));
}

#[test]
fn four_bit_end_to_end() {
    let mut src = Bitmap::allocate(2, 1, 4, ChannelMasks::NONE)
        .unwrap()
        .with_palette(vec![RGB8::new(0, 0, 0), RGB8::new(255, 0, 0)])
        .unwrap()
        .with_transparency(vec![128])
        .unwrap();
    src.scanline_mut(0)[0] = 0x10;
    let out = convert_to_32bits(Some(&src), Unstoppable).unwrap();
    assert_eq!(out.width(), 2);
    assert_eq!(out.height(), 1);
    assert_eq!(out.bit_depth(), 32);
    assert_eq!(pixels(&out, 0), [[255, 0, 0, 255], [0, 0, 0, 128]]);
}

#[test]
fn rows_keep_stored_order() {
    let mut src = Bitmap::allocate(1, 3, 8, ChannelMasks::NONE)
        .unwrap()
        .with_palette(gradient_palette(3))
        .unwrap();
    for row in 0..3 {
        src.scanline_mut(row)[0] = row as u8;
    }
    let out = convert_to_32bits(Some(&src), Unstoppable).unwrap();
    for row in 0..3 {
        assert_eq!(pixels(&out, row)[0][0], row as u8);
    }
}

#[test]
fn source_is_not_mutated() {
    let mut src = Bitmap::allocate(4, 2, 8, ChannelMasks::NONE)
        .unwrap()
        .with_palette(gradient_palette(4))
        .unwrap()
        .with_transparency(vec![1, 2])
        .unwrap();
    src.scanline_mut(0)[..4].copy_from_slice(&[0, 1, 2, 3]);
    let before = src.clone();
    let _ = convert_to_32bits(Some(&src), Unstoppable).unwrap();
    assert_eq!(src, before);
}
