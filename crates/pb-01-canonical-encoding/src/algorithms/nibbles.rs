// =============================================================================
// NIBBLES: Half-byte path representation
// =============================================================================

/// Nibble path for trie construction.
///
/// Keys are split into half-bytes (0-15); a one-byte RLP index becomes two
/// nibbles.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Nibbles(pub Vec<u8>);

impl Nibbles {
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let mut nibbles = Vec::with_capacity(bytes.len() * 2);
        for byte in bytes {
            nibbles.push(byte >> 4);
            nibbles.push(byte & 0x0F);
        }
        Nibbles(nibbles)
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Length of the common prefix of two nibble paths.
pub fn common_prefix_len(a: &[u8], b: &[u8]) -> usize {
    a.iter().zip(b.iter()).take_while(|(x, y)| x == y).count()
}

/// Hex-prefix encode a nibble path.
///
/// The first nibble carries the flags: 0 = extension even, 1 = extension odd,
/// 2 = leaf even, 3 = leaf odd. An odd path stores its first nibble alongside
/// the flag; an even path pads with a zero nibble.
pub fn encode_hex_prefix(path: &[u8], is_leaf: bool) -> Vec<u8> {
    let odd = path.len() % 2 == 1;
    let flag = if is_leaf { 2 } else { 0 } + u8::from(odd);

    let mut result = Vec::with_capacity(path.len() / 2 + 1);
    let rest = if odd {
        result.push((flag << 4) | path[0]);
        &path[1..]
    } else {
        result.push(flag << 4);
        path
    };

    for pair in rest.chunks(2) {
        result.push((pair[0] << 4) | pair.get(1).copied().unwrap_or(0));
    }
    result
}
