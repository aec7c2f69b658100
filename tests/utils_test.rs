use std::collections::BTreeSet;

use kexcli::utils::*;

#[test]
fn test_partition_covers_every_index_exactly_once() {
    let slices = partition_slices(103, 4);

    // Four slices, in order, covering 0..103 with no gaps or overlap
    assert_eq!(slices.len(), 4);

    let mut seen = BTreeSet::new();
    for range in &slices {
        for index in range.clone() {
            assert!(seen.insert(index), "index {} appeared twice", index);
        }
    }
    assert_eq!(seen.len(), 103);
    assert_eq!(seen.first(), Some(&0));
    assert_eq!(seen.last(), Some(&102));

    // Slices are contiguous: each starts where the previous ended
    for window in slices.windows(2) {
        assert_eq!(window[0].end, window[1].start);
    }
}

#[test]
fn test_partition_remainder_lands_in_last_slice() {
    let slices = partition_slices(103, 4);

    // 103 / 4 = 25, so the first three slices hold 25 and the last 28
    assert_eq!(slices[0], 0..25);
    assert_eq!(slices[1], 25..50);
    assert_eq!(slices[2], 50..75);
    assert_eq!(slices[3], 75..103);
}

#[test]
fn test_partition_exact_division_has_no_remainder() {
    let slices = partition_slices(100, 4);
    for (i, range) in slices.iter().enumerate() {
        assert_eq!(*range, i * 25..(i + 1) * 25);
    }
}

#[test]
fn test_partition_fewer_items_than_workers() {
    let slices = partition_slices(3, 20);

    // Integer division gives every slice size zero; the last one absorbs
    // the whole list
    assert_eq!(slices.len(), 20);
    for range in &slices[..19] {
        assert!(range.is_empty());
    }
    assert_eq!(slices[19], 0..3);
}

#[test]
fn test_partition_degenerate_inputs() {
    // Zero workers is treated as one
    let slices = partition_slices(10, 0);
    assert_eq!(slices, vec![0..10]);

    // Zero items yields only empty slices
    let slices = partition_slices(0, 4);
    assert_eq!(slices.len(), 4);
    assert!(slices.iter().all(|range| range.is_empty()));
}

#[test]
fn test_kpop_genre_matching_is_case_insensitive() {
    let genres = vec!["K-Pop".to_string(), "dance".to_string()];
    assert!(has_kpop_genre(&genres));

    let genres = vec!["KOREAN OST".to_string()];
    assert!(has_kpop_genre(&genres));
}

#[test]
fn test_kpop_genre_requires_exact_tag() {
    // Adjacent scenes and supersets of the tag do not count
    let genres = vec!["j-pop".to_string(), "pop".to_string()];
    assert!(!has_kpop_genre(&genres));

    let genres = vec!["k-pop fusion".to_string()];
    assert!(!has_kpop_genre(&genres));

    assert!(!has_kpop_genre(&[]));
}

#[test]
fn test_kpop_genre_allow_list_is_complete() {
    assert_eq!(KPOP_GENRES.len(), 10);
    for tag in KPOP_GENRES {
        // The list itself must be stored lowercased for matching to work
        assert_eq!(tag, tag.to_lowercase());
        assert!(has_kpop_genre(&[tag.to_string()]));
    }
}

#[test]
fn test_mask_client_id_keeps_only_edges() {
    let masked = mask_client_id("0123456789abcdef");
    assert_eq!(masked, "0123...cdef");

    // Nothing from the middle may leak through
    assert!(!masked.contains("4567"));
}

#[test]
fn test_mask_client_id_short_ids_fully_masked() {
    assert_eq!(mask_client_id("short"), "*****");
    assert_eq!(mask_client_id("12345678"), "********");
    assert_eq!(mask_client_id(""), "");
}

#[test]
fn test_today_stamp_shape() {
    let stamp = today_stamp();

    // YYYYMMDD, digits only
    assert_eq!(stamp.len(), 8);
    assert!(stamp.chars().all(|c| c.is_ascii_digit()));
    assert!(stamp.starts_with("20"));
}
