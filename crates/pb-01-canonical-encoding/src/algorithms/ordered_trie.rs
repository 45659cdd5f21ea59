//! Merkle-Patricia trie roots built in one pass over sorted entries.
//!
//! Nothing is stored: entries are sorted by nibble path and each node is
//! emitted as soon as its children are known. Children whose encoding is
//! shorter than 32 bytes are embedded in their parent; larger ones are
//! referenced by hash. The root itself is always hashed.

use rlp::RlpStream;
use shared_types::Hash;

use super::keccak256;
use super::nibbles::{common_prefix_len, encode_hex_prefix, Nibbles};

const BRANCH_WIDTH: u8 = 16;

/// Root of the trie holding `entries`. Later duplicates of a key win.
pub fn trie_root<I, K, V>(entries: I) -> Hash
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<[u8]>,
    V: AsRef<[u8]>,
{
    let mut items: Vec<(Nibbles, V)> = entries
        .into_iter()
        .map(|(key, value)| (Nibbles::from_bytes(key.as_ref()), value))
        .collect();
    items.reverse();
    items.sort_by(|a, b| a.0.cmp(&b.0));
    items.dedup_by(|later, earlier| later.0 == earlier.0);

    let mut stream = RlpStream::new();
    encode_node(&items, 0, &mut stream);
    keccak256(&stream.out())
}

/// Root of the trie mapping `rlp(index)` to each item, in sequence order.
///
/// This is the commitment used for a block's transactions and receipts.
pub fn ordered_trie_root<T: AsRef<[u8]>>(items: &[T]) -> Hash {
    trie_root(
        items
            .iter()
            .enumerate()
            .map(|(index, item)| (rlp::encode(&(index as u64)), item.as_ref())),
    )
}

fn encode_node<V: AsRef<[u8]>>(items: &[(Nibbles, V)], depth: usize, s: &mut RlpStream) {
    let (first, last) = match (items.first(), items.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => {
            s.append_empty_data();
            return;
        }
    };

    // Leaf
    if items.len() == 1 {
        s.begin_list(2);
        s.append(&encode_hex_prefix(&first.0.as_slice()[depth..], true));
        s.append(&first.1.as_ref().to_vec());
        return;
    }

    // Extension: the sorted extremes bound the prefix shared by all entries.
    let shared = common_prefix_len(&first.0.as_slice()[depth..], &last.0.as_slice()[depth..]);
    if shared > 0 {
        s.begin_list(2);
        s.append(&encode_hex_prefix(
            &first.0.as_slice()[depth..depth + shared],
            false,
        ));
        encode_child(items, depth + shared, s);
        return;
    }

    // Branch
    let (value, mut rest) = if first.0.len() == depth {
        (Some(&first.1), &items[1..])
    } else {
        (None, items)
    };

    s.begin_list(BRANCH_WIDTH as usize + 1);
    for nibble in 0..BRANCH_WIDTH {
        let split = rest
            .iter()
            .position(|(path, _)| path.as_slice()[depth] != nibble)
            .unwrap_or(rest.len());
        let (group, tail) = rest.split_at(split);
        encode_child(group, depth + 1, s);
        rest = tail;
    }
    match value {
        Some(value) => s.append(&value.as_ref().to_vec()),
        None => s.append_empty_data(),
    };
}

fn encode_child<V: AsRef<[u8]>>(items: &[(Nibbles, V)], depth: usize, s: &mut RlpStream) {
    if items.is_empty() {
        s.append_empty_data();
        return;
    }

    let mut child = RlpStream::new();
    encode_node(items, depth, &mut child);
    let encoded = child.out();
    if encoded.len() < 32 {
        s.append_raw(&encoded, 1);
    } else {
        s.append(&keccak256(&encoded));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::EMPTY_TRIE_ROOT;

    fn hash(hex_str: &str) -> Hash {
        Hash::from_slice(&hex::decode(hex_str).unwrap())
    }

    #[test]
    fn test_empty_trie() {
        let empty: [&[u8]; 0] = [];
        assert_eq!(ordered_trie_root(&empty), EMPTY_TRIE_ROOT);
    }

    #[test]
    fn test_known_keyed_root() {
        let root = trie_root([
            (b"doe".as_slice(), b"reindeer".as_slice()),
            (b"dog".as_slice(), b"puppy".as_slice()),
            (b"dogglesworth".as_slice(), b"cat".as_slice()),
        ]);
        assert_eq!(
            root,
            hash("8aad789dff2f538bca5d8ea56e8abe10f4c7ba3a5dea95fea4cd6e7c3a1168d3")
        );
    }

    #[test]
    fn test_insertion_order_irrelevant() {
        let doe = (b"doe".as_slice(), b"reindeer".as_slice());
        let dog = (b"dog".as_slice(), b"puppy".as_slice());
        assert_eq!(trie_root([doe, dog]), trie_root([dog, doe]));
    }

    #[test]
    fn test_duplicate_key_last_wins() {
        let first = (b"dog".as_slice(), b"puppy".as_slice());
        let second = (b"dog".as_slice(), b"hound".as_slice());
        assert_eq!(trie_root([first, second]), trie_root([second]));
    }

    #[test]
    fn test_single_item() {
        assert_eq!(
            ordered_trie_root(&[vec![0x01]]),
            hash("ac92bc8d02906a87a573c32c72bb427036f0e43d7a7375c5c491ebba064add15")
        );
    }

    #[test]
    fn test_small_items_are_inlined() {
        assert_eq!(
            ordered_trie_root(&[b"a", b"b", b"c"]),
            hash("1156fedce89fc940f90d82bd4baa43747209e85d14ee5f533460cbc44530aeea")
        );
    }

    #[test]
    fn test_two_hundred_items() {
        // Crosses the one-byte/two-byte index boundary at 128.
        let items: Vec<Vec<u8>> = (0..200usize)
            .map(|i| vec![(i % 256) as u8; i % 40 + 1])
            .collect();
        assert_eq!(
            ordered_trie_root(&items),
            hash("09f3ef3772261d6fa788bf21d351a88d96c9ca902badf5a0931af21df2bb16cd")
        );
    }

    #[test]
    fn test_order_matters() {
        let a = ordered_trie_root(&[b"a", b"b"]);
        let b = ordered_trie_root(&[b"b", b"a"]);
        assert_ne!(a, b);
    }
}
