#![no_main]
use libfuzzer_sys::fuzz_target;
use rgb::RGB8;
use zenrgba::{
    Bitmap, ChannelMasks, ChannelOrder, Limits, convert_to_32bits, convert_to_32bits_bgra, row,
};

const DEPTHS: [u16; 8] = [1, 2, 4, 8, 16, 24, 32, 48];

fuzz_target!(|data: &[u8]| {
    // header: depth selector, width, height, stride slack, palette len, table len, masks
    if data.len() < 8 {
        return;
    }
    let depth = DEPTHS[data[0] as usize % DEPTHS.len()];
    let width = u32::from(data[1] % 64) + 1;
    let height = u32::from(data[2] % 32) + 1;
    let slack = usize::from(data[3] % 8);
    let palette_len = usize::from(data[4]) + 1;
    let table_len = usize::from(data[5]);
    let masks = match data[6] % 3 {
        0 => ChannelMasks::NONE,
        1 => ChannelMasks::RGB555,
        _ => ChannelMasks::RGB565,
    };
    let body = &data[8..];

    let Ok(packed) = zenrgba::row_bytes(width, depth) else {
        return;
    };
    let stride = packed + slack;
    let pixels: Vec<u8> = body.iter().copied().cycle().take(stride * height as usize).collect();
    if pixels.len() < stride * height as usize {
        return;
    }

    let palette: Vec<RGB8> = body
        .chunks_exact(3)
        .take(palette_len)
        .map(|c| RGB8::new(c[0], c[1], c[2]))
        .collect();
    let table: Vec<u8> = body.iter().rev().take(table_len).copied().collect();

    let Ok(bmp) = Bitmap::from_parts(width, height, depth, stride, pixels) else {
        return;
    };
    let Ok(bmp) = bmp.with_palette(palette) else {
        return;
    };
    let Ok(bmp) = bmp.with_transparency(table) else {
        return;
    };
    let bmp = bmp.with_channel_masks(masks);

    // Must never panic, for any depth or palette shape
    let rgba = convert_to_32bits(Some(&bmp), enough::Unstoppable);
    let bgra = convert_to_32bits_bgra(Some(&bmp), enough::Unstoppable);
    if let (Ok(rgba), Ok(bgra)) = (rgba, bgra) {
        assert_eq!(rgba.width(), width);
        assert_eq!(rgba.height(), height);
        assert_eq!(rgba.pixels().len(), bgra.pixels().len());
    }

    // Row functions with arbitrary (often short) buffers: errors, never panics
    let mut row_dst = vec![0u8; usize::from(data[7])];
    let row_width = width as usize;
    let order = if data[7] & 1 == 0 { ChannelOrder::RGBA } else { ChannelOrder::BGRA };
    let _ = row::row_1_to_32(body, row_width, bmp.palette(), order, &mut row_dst);
    let _ = row::row_4_to_32_with_transparency(body, row_width, bmp.palette(), body, table_len, order, &mut row_dst);
    let _ = row::row_8_to_32(body, row_width, bmp.palette(), order, &mut row_dst);
    let _ = row::row_16_565_to_32(body, row_width, order, &mut row_dst);
    let _ = row::row_24_to_32(body, row_width, ChannelOrder::BGRA, order, &mut row_dst);

    let tight = Limits {
        max_memory_bytes: Some(1024),
        ..Default::default()
    };
    let _ = zenrgba::ConvertRequest::new(&bmp)
        .with_limits(&tight)
        .convert(enough::Unstoppable);
});
