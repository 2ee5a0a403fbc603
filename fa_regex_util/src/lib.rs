//! Const-evaluable helpers used by code generated with `proc_fa_regex::regex!`.

#[inline(always)]
const fn code_point_len(marker: u8) -> usize {
    if marker >> 7 == 0 {
        1
    }
    else if marker >> 5 == 0b110 {
        2
    }
    else if marker >> 4 == 0b1110 {
        3
    }
    else if marker >> 3 == 0b11110 {
        4
    }
    else {
        panic!("Malformed UTF-8 codepoint");
    }
}

/// Decodes the character starting at byte `pos`, returning its scalar value and the offset
/// of the character after it.
#[inline(always)]
pub const fn next_char(s: &str, pos: usize) -> (u32, usize) {
    let bs = s.as_bytes();
    let len = code_point_len(bs[pos]);

    let mut value = match len {
        1 => bs[pos] as u32,
        2 => (bs[pos] & 0x1F) as u32,
        3 => (bs[pos] & 0x0F) as u32,
        _ => (bs[pos] & 0x07) as u32,
    };

    let mut i = 1;
    while i < len {
        value = (value << 6) | (bs[pos + i] & 0x3F) as u32;
        i += 1;
    }

    (value, pos + len)
}

/// A cursor over the characters of a string that can be stepped in const code.
#[derive(Debug, Copy, Clone)]
pub struct CharSlice<'a> {
    offset: usize,
    base: &'a str,
}

impl<'a> CharSlice<'a> {
    #[inline(always)]
    pub const fn new(s: &'a str) -> Self {
        Self { offset: 0, base: s }
    }

    #[inline(always)]
    pub const fn is_empty(&self) -> bool { self.offset == self.base.len() }

    /// The next character as a scalar value, and the slice after it. Must not be called on an
    /// empty slice.
    #[inline(always)]
    pub const fn get_advance(&self) -> (u32, CharSlice<'a>) {
        let (c, next_offset) = next_char(self.base, self.offset);
        (c, CharSlice { offset: next_offset, base: self.base })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(s: &str) -> Vec<u32> {
        let mut out = Vec::new();
        let mut slice = CharSlice::new(s);
        while !slice.is_empty() {
            let (c, rest) = slice.get_advance();
            out.push(c);
            slice = rest;
        }
        out
    }

    #[test]
    fn decodes_every_width() {
        let s = "€1𝄞123é";
        assert_eq!(collect(s), s.chars().map(u32::from).collect::<Vec<_>>());
        assert_eq!(next_char(s, 0), (0x20AC, 3));
        assert_eq!(next_char(s, 4), (0x1D11E, 8));
    }

    #[test]
    fn empty_string() {
        assert!(CharSlice::new("").is_empty());
        assert!(collect("").is_empty());
    }

    #[test]
    fn usable_in_const() {
        const SECOND: u32 = CharSlice::new("aé").get_advance().1.get_advance().0;
        assert_eq!(SECOND, 'é' as u32);
    }
}
