//! # 位流辅助模块
//!
//! 将字节序列按高位优先展开成固定宽度的位组，以及反向把位组重新拼回字节。

/// 按高位优先把字节切分为 `width` 位一组的迭代器。
///
/// 总位数不是 `width` 的整数倍时，最后一组在右侧补零。
#[derive(Debug, Clone)]
pub struct BitGroups<'a> {
    bytes: std::slice::Iter<'a, u8>,
    width: u32,
    acc: u32,
    filled: u32,
}

impl<'a> BitGroups<'a> {
    /// `width` 必须在 `1..=7` 之内，由调用方保证。
    pub fn new(bytes: &'a [u8], width: u8) -> Self {
        debug_assert!((1..=7).contains(&width));
        Self {
            bytes: bytes.iter(),
            width: u32::from(width),
            acc: 0,
            filled: 0,
        }
    }

    fn mask(&self) -> u32 {
        (1 << self.width) - 1
    }
}

impl Iterator for BitGroups<'_> {
    type Item = u8;

    fn next(&mut self) -> Option<u8> {
        while self.filled < self.width {
            match self.bytes.next() {
                Some(&byte) => {
                    self.acc = (self.acc << 8) | u32::from(byte);
                    self.filled += 8;
                }
                None => break,
            }
        }

        if self.filled == 0 {
            return None;
        }

        let group = if self.filled >= self.width {
            self.filled -= self.width;
            (self.acc >> self.filled) & self.mask()
        } else {
            // 最后不足一组的位，右侧补零
            let padded = (self.acc << (self.width - self.filled)) & self.mask();
            self.filled = 0;
            padded
        };
        self.acc &= (1 << self.filled) - 1;

        Some(group as u8)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let bits = self.bytes.len() * 8 + self.filled as usize;
        let groups = bits.div_ceil(self.width as usize);
        (groups, Some(groups))
    }
}

impl ExactSizeIterator for BitGroups<'_> {}

/// 把 `width` 位一组的位流按高位优先重新拼接成字节。
///
/// 末尾不足 8 位的部分会被直接丢弃。
pub fn regroup<I>(groups: I, width: u8) -> Vec<u8>
where
    I: IntoIterator<Item = u8>,
{
    let width = u32::from(width);
    let mask = (1u32 << width) - 1;
    let groups = groups.into_iter();
    let mut out = Vec::with_capacity(groups.size_hint().0 * width as usize / 8);

    let mut acc: u32 = 0;
    let mut filled: u32 = 0;
    for group in groups {
        acc = (acc << width) | (u32::from(group) & mask);
        filled += width;
        if filled >= 8 {
            filled -= 8;
            out.push((acc >> filled) as u8);
            acc &= (1 << filled) - 1;
        }
    }

    out
}
