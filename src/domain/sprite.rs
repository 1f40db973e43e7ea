/// Animation asset table: fixed-size 1-bit frames in XBM layout.
///
/// XBM rows are `ceil(width / 8)` bytes; within a byte the least
/// significant bit is the leftmost pixel. Frames are authored as ASCII art
/// (`#` = ink, anything else = blank) and packed once at startup.

#[derive(Clone, Debug)]
pub struct AnimationTable {
    width: i32,
    height: i32,
    frames: Vec<Vec<u8>>,
}

impl AnimationTable {
    /// Pack ASCII-art frames. Rows shorter than `width` are padded with
    /// blanks; extra characters and rows are ignored.
    pub fn from_art(width: i32, height: i32, frames: &[&[&str]]) -> Self {
        let packed = frames.iter().map(|rows| pack_xbm(width, height, rows)).collect();
        AnimationTable { width, height, frames: packed }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Frame `idx`, wrapping. `None` only for an empty table.
    pub fn frame(&self, idx: usize) -> Option<&[u8]> {
        if self.frames.is_empty() {
            return None;
        }
        self.frames.get(idx % self.frames.len()).map(Vec::as_slice)
    }
}

/// Bytes per XBM row for a bitmap `width` pixels wide.
pub fn xbm_stride(width: i32) -> usize {
    (width.max(0) as usize).div_ceil(8)
}

/// Is pixel `(x, y)` set in an XBM bitmap?
pub fn xbm_pixel(data: &[u8], width: i32, x: i32, y: i32) -> bool {
    if x < 0 || y < 0 || x >= width {
        return false;
    }
    let idx = y as usize * xbm_stride(width) + x as usize / 8;
    data.get(idx).is_some_and(|byte| byte & (1 << (x % 8)) != 0)
}

fn pack_xbm(width: i32, height: i32, rows: &[&str]) -> Vec<u8> {
    let stride = xbm_stride(width);
    let mut out = vec![0u8; stride * height.max(0) as usize];
    for (y, row) in rows.iter().take(height.max(0) as usize).enumerate() {
        for (x, ch) in row.chars().take(width.max(0) as usize).enumerate() {
            if ch == '#' {
                out[y * stride + x / 8] |= 1 << (x % 8);
            }
        }
    }
    out
}
