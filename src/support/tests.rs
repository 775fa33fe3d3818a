use super::*;

use simple_sds::serialize;

use rand::Rng;

//-----------------------------------------------------------------------------

#[test]
fn orientation() {
    assert!(!Orientation::Forward.is_reverse(), "Forward orientation is reverse");
    assert!(Orientation::Reverse.is_reverse(), "Reverse orientation is not reverse");
    assert_eq!(Orientation::Forward.flip(), Orientation::Reverse, "Invalid flip of Forward");
    assert_eq!(Orientation::Reverse.flip(), Orientation::Forward, "Invalid flip of Reverse");
    assert_eq!(Orientation::from_is_reverse(false), Orientation::Forward, "Invalid conversion from false");
    assert_eq!(Orientation::from_is_reverse(true), Orientation::Reverse, "Invalid conversion from true");
}

#[test]
fn base_coding() {
    for c in [b'A', b'T', b'C', b'G', b'N'] {
        assert_eq!(decode_base(encode_base(c)), c, "Base {} does not round-trip", c as char);
    }
    assert_eq!(decode_base(encode_base(b'X')), b'N', "Unknown bases should become N");
    assert!(encode_base(b'G') < (1 << BASE_WIDTH), "Codes must fit into BASE_WIDTH bits");
}

#[test]
fn complements() {
    assert_eq!(complement(b'A'), b'T');
    assert_eq!(complement(b'T'), b'A');
    assert_eq!(complement(b'C'), b'G');
    assert_eq!(complement(b'G'), b'C');
    assert_eq!(complement(b'N'), b'N');
    assert_eq!(complement(b'#'), b'$');
    assert_eq!(complement(b'$'), b'#');
    assert_eq!(reverse_complement(b"GATTACA"), b"TGTAATC".to_vec(), "Invalid reverse complement");
    assert!(reverse_complement(b"").is_empty(), "Reverse complement of an empty sequence is not empty");
}

//-----------------------------------------------------------------------------

fn check_tree(tree: &WaveletTree, truth: &[u64]) {
    assert_eq!(tree.len(), truth.len(), "Incorrect tree length");
    assert_eq!(tree.is_empty(), truth.is_empty(), "Incorrect emptiness");

    let max_value = truth.iter().copied().max().unwrap_or(0);
    for i in 0..truth.len() {
        assert_eq!(tree.get(i), truth[i], "Incorrect value at {}", i);
    }
    for value in 0..=max_value + 1 {
        let mut seen = 0;
        for i in 0..truth.len() {
            assert_eq!(tree.rank(i, value), seen, "Incorrect rank({}, {})", i, value);
            if truth[i] == value {
                assert_eq!(tree.select(seen, value), Some(i), "Incorrect select({}, {})", seen, value);
                seen += 1;
            }
        }
        assert_eq!(tree.count(value), seen, "Incorrect count({})", value);
        assert_eq!(tree.select(seen, value), None, "Got a position for a missing occurrence of {}", value);
        assert_eq!(tree.rank(truth.len() + 10, value), seen, "Rank past the end is not clamped for {}", value);
    }
}

#[test]
fn empty_wavelet_tree() {
    let tree = WaveletTree::from(Vec::new());
    check_tree(&tree, &[]);
    let _ = serialize::test(&tree, "empty-wavelet-tree", None, true);
}

#[test]
fn wavelet_tree() {
    let truth: Vec<u64> = vec![3, 0, 1, 5, 2, 2, 7, 0, 3, 3, 6, 4, 1, 0];
    let tree = WaveletTree::from(truth.clone());
    check_tree(&tree, &truth);
    let _ = serialize::test(&tree, "wavelet-tree", None, true);
}

#[test]
fn uniform_wavelet_tree() {
    let truth: Vec<u64> = vec![4; 18];
    let tree = WaveletTree::from(truth.clone());
    check_tree(&tree, &truth);
}

#[test]
fn random_wavelet_tree() {
    let mut rng = rand::thread_rng();
    let truth: Vec<u64> = (0..200).map(|_| rng.gen_range(0..47)).collect();
    let tree = WaveletTree::from(truth.clone());
    check_tree(&tree, &truth);
    let _ = serialize::test(&tree, "random-wavelet-tree", None, true);
}

//-----------------------------------------------------------------------------

// Count pattern occurrences by scanning the text.
fn scan_count(text: &[u8], pattern: &[u8]) -> Vec<usize> {
    if pattern.is_empty() || pattern.len() > text.len() {
        return Vec::new();
    }
    (0..=text.len() - pattern.len()).filter(|i| &text[*i..*i + pattern.len()] == pattern).collect()
}

fn check_csa(csa: &NameCsa, text: &[u8], patterns: &[&[u8]]) {
    assert_eq!(csa.len(), text.len(), "Incorrect text length");
    for pattern in patterns {
        let truth = scan_count(text, pattern);
        assert_eq!(csa.count(pattern), truth.len(), "Incorrect count for {:?}", String::from_utf8_lossy(pattern));
        assert_eq!(csa.locate(pattern), truth, "Incorrect occurrences for {:?}", String::from_utf8_lossy(pattern));
    }
}

#[test]
fn empty_csa() {
    let csa = NameCsa::new(b"");
    assert!(csa.is_empty(), "Index over an empty text is not empty");
    assert_eq!(csa.count(b"#x$"), 0, "Found a pattern in an empty text");
    let _ = serialize::test(&csa, "empty-csa", None, true);
}

#[test]
fn name_store_csa() {
    let text = b"#alpha$#beta$#alphabet$#a$";
    let csa = NameCsa::new(text);
    let patterns: Vec<&[u8]> = vec![
        b"#alpha$", b"#beta$", b"#alphabet$", b"#a$",
        b"#gamma$", b"#alpha", b"alpha", b"$#", b"a", b"#", b"$",
    ];
    check_csa(&csa, text, &patterns);
    let _ = serialize::test(&csa, "name-store-csa", None, true);
}

#[test]
fn csa_with_repeated_names() {
    // The same name twice: a lookup should see both occurrences.
    let text = b"#dup$#dup$";
    let csa = NameCsa::new(text);
    assert_eq!(csa.count(b"#dup$"), 2, "Incorrect count for a repeated name");
    assert_eq!(csa.locate(b"#dup$"), vec![0, 5], "Incorrect occurrences for a repeated name");
}

#[test]
fn random_csa() {
    let mut rng = rand::thread_rng();
    let text: Vec<u8> = (0..300).map(|_| b"ACGT#$"[rng.gen_range(0..6)]).collect();
    let csa = NameCsa::new(&text);
    for _ in 0..20 {
        let start = rng.gen_range(0..text.len());
        let limit = (start + rng.gen_range(1..8)).min(text.len());
        let pattern = text[start..limit].to_vec();
        let truth = scan_count(&text, &pattern);
        assert_eq!(csa.count(&pattern), truth.len(), "Incorrect count for a random pattern");
        assert_eq!(csa.locate(&pattern), truth, "Incorrect occurrences for a random pattern");
    }
}

//-----------------------------------------------------------------------------
