use super::*;

use crate::index::{Index, IndexBuilder};

/// Build an index from (path, hash-with-line records) groups.
fn build(files: &[(&str, &[(u64, u16)])]) -> Index {
    let mut b = IndexBuilder::new();
    for (path, records) in files {
        b.add_path(path).unwrap();
        for &(hash, line) in *records {
            b.add_hash(hash, line).unwrap();
        }
    }
    b.build()
}

fn run_stsc(tgt: &Index, src: &Index, min: usize) -> String {
    let mut out = Vec::new();
    stsc::map_regions(tgt, src, min, &mut out).unwrap();
    String::from_utf8(out).unwrap()
}

fn run_ilcs(tgt: &Index, src: &Index, min: usize) -> String {
    let mut tgt = tgt.clone();
    let mut src = src.clone();
    let mut out = Vec::new();
    ilcs::map_regions(&mut tgt, &mut src, min, &mut out).unwrap();
    String::from_utf8(out).unwrap()
}

const A: u64 = 101;
const B: u64 = 102;
const C: u64 = 103;
const D: u64 = 104;
const E: u64 = 105;
const X: u64 = 901;
const Y: u64 = 902;

#[test]
fn test_stsc_extends_maximally() {
    // target a,b,c,d,e vs source x,a,b,c,d,y: one region of length 4
    let tgt = build(&[("/t", &[(A, 1), (B, 2), (C, 3), (D, 4), (E, 5)])]);
    let src = build(&[(
        "/s",
        &[(X, 1), (A, 2), (B, 3), (C, 4), (D, 5), (Y, 6)],
    )]);
    assert_eq!(run_stsc(&tgt, &src, 3), "/t:1,3 -- /s:2,3\n");
}

#[test]
fn test_ilcs_finds_same_region() {
    let tgt = build(&[("/t", &[(A, 1), (B, 2), (C, 3), (D, 4), (E, 5)])]);
    let src = build(&[(
        "/s",
        &[(X, 1), (A, 2), (B, 3), (C, 4), (D, 5), (Y, 6)],
    )]);
    assert_eq!(run_ilcs(&tgt, &src, 3), "/t:1,3 -- /s:2,3\n");
}

#[test]
fn test_short_match_suppressed() {
    let tgt = build(&[("/t", &[(A, 1), (B, 2)])]);
    let src = build(&[("/s", &[(A, 1), (B, 2)])]);
    assert_eq!(run_stsc(&tgt, &src, 3), "");
    assert_eq!(run_ilcs(&tgt, &src, 3), "");
}

#[test]
fn test_no_common_hashes() {
    let tgt = build(&[("/t", &[(A, 1), (B, 2)])]);
    let src = build(&[("/s", &[(X, 1), (Y, 2)])]);
    assert_eq!(run_stsc(&tgt, &src, 1), "");
    assert_eq!(run_ilcs(&tgt, &src, 1), "");
}

#[test]
fn test_empty_indices() {
    let tgt = build(&[("/t", &[])]);
    let src = build(&[("/s", &[])]);
    assert_eq!(run_stsc(&tgt, &src, 1), "");
    assert_eq!(run_ilcs(&tgt, &src, 1), "");
}

#[test]
fn test_target_file_boundary_splits_regions() {
    // target spans two files; the source run may not bridge them
    let tgt = build(&[
        ("/f1", &[(A, 1), (B, 2), (C, 3)]),
        ("/f2", &[(D, 1), (E, 2)]),
    ]);
    let src = build(&[("/g", &[(A, 1), (B, 2), (C, 3), (D, 4), (E, 5)])]);
    assert_eq!(
        run_stsc(&tgt, &src, 2),
        "/f1:1,2 -- /g:1,2\n/f2:1,1 -- /g:4,1\n"
    );
    assert_eq!(
        run_ilcs(&tgt, &src, 2),
        "/f1:1,2 -- /g:1,2\n/f2:1,1 -- /g:4,1\n"
    );
}

#[test]
fn test_source_file_boundary_stops_extension() {
    let tgt = build(&[("/t", &[(A, 1), (B, 2)])]);
    let src = build(&[("/s1", &[(A, 1)]), ("/s2", &[(B, 1)])]);
    assert_eq!(run_stsc(&tgt, &src, 2), "");
    assert_eq!(run_ilcs(&tgt, &src, 2), "");
    // with min 1 the two halves surface separately
    assert_eq!(
        run_stsc(&tgt, &src, 1),
        "/t:1,0 -- /s1:1,0\n/t:2,0 -- /s2:1,0\n"
    );
}

#[test]
fn test_stsc_picks_longest_candidate() {
    // source holds a short and a long occurrence of the target prefix;
    // the long one must win regardless of sorted position
    let tgt = build(&[("/t", &[(A, 1), (B, 2), (C, 3)])]);
    let src = build(&[(
        "/s",
        &[(A, 1), (X, 2), (A, 3), (B, 4), (C, 5)],
    )]);
    assert_eq!(run_stsc(&tgt, &src, 2), "/t:1,2 -- /s:3,2\n");
}

#[test]
fn test_stsc_tie_takes_first_occurrence() {
    let tgt = build(&[("/t", &[(A, 5)])]);
    let src = build(&[("/s", &[(A, 3), (X, 4), (A, 9)])]);
    assert_eq!(run_stsc(&tgt, &src, 1), "/t:5,0 -- /s:3,0\n");
}

#[test]
fn test_stsc_resumes_after_matched_span() {
    // the walk continues after the region, so a repeated block in the
    // target is reported once per occurrence
    let tgt = build(&[("/t", &[(A, 1), (B, 2), (A, 3), (B, 4)])]);
    let src = build(&[("/s", &[(A, 1), (B, 2)])]);
    assert_eq!(
        run_stsc(&tgt, &src, 2),
        "/t:1,1 -- /s:1,1\n/t:3,1 -- /s:1,1\n"
    );
}

#[test]
fn test_ilcs_consumes_matched_source() {
    // ILCS splices the match out of both sides, so the second target
    // copy has nothing left to match against
    let tgt = build(&[("/t", &[(A, 1), (B, 2), (A, 3), (B, 4)])]);
    let src = build(&[("/s", &[(A, 1), (B, 2)])]);
    assert_eq!(run_ilcs(&tgt, &src, 2), "/t:1,1 -- /s:1,1\n");
}

#[test]
fn test_ilcs_emits_longest_first() {
    // two disjoint common runs: the longer one is reported first even
    // though it appears later in the target
    let tgt = build(&[(
        "/t",
        &[(A, 1), (B, 2), (X, 3), (C, 4), (D, 5), (E, 6)],
    )]);
    let src = build(&[(
        "/s",
        &[(C, 1), (D, 2), (E, 3), (Y, 4), (A, 5), (B, 6)],
    )]);
    assert_eq!(
        run_ilcs(&tgt, &src, 2),
        "/t:4,2 -- /s:1,2\n/t:1,1 -- /s:5,1\n"
    );
}

#[test]
fn test_ilcs_cut_does_not_rejoin_neighbors() {
    // after cutting b,c out of a,b,c,d the remaining a and d must not
    // act as consecutive; a 2-run a,d elsewhere must not match
    let tgt = build(&[("/t", &[(A, 1), (B, 2), (C, 3), (D, 4)])]);
    let src = build(&[(
        "/s",
        &[(B, 1), (C, 2), (X, 3), (A, 4), (D, 5)],
    )]);
    // round 1 takes b,c; a lone a and d remain on the target side but
    // they are separated by the cut
    assert_eq!(run_ilcs(&tgt, &src, 2), "/t:2,1 -- /s:1,1\n");
}

#[test]
fn test_single_line_region_has_length_zero() {
    let tgt = build(&[("/t", &[(A, 5), (B, 5)])]);
    let src = build(&[("/s", &[(A, 1), (B, 2)])]);
    assert_eq!(run_stsc(&tgt, &src, 2), "/t:5,0 -- /s:1,1\n");
}

#[test]
fn test_duplicate_hash_runs_in_source() {
    // all, i.e. also non-leading, source occurrences are candidates
    let tgt = build(&[("/t", &[(B, 1), (C, 2)])]);
    let src = build(&[("/s", &[(A, 1), (B, 2), (C, 3), (B, 7), (C, 8)])]);
    assert_eq!(run_stsc(&tgt, &src, 2), "/t:1,1 -- /s:2,1\n");
}

#[test]
fn test_algorithms_agree_on_clean_clone() {
    // one shared block, unique context on both sides
    let tgt = build(&[(
        "/t",
        &[(X, 1), (A, 2), (B, 3), (C, 4), (D, 5), (Y, 6)],
    )]);
    let src = build(&[(
        "/s",
        &[(Y, 10), (A, 11), (B, 12), (C, 13), (D, 14), (X, 15)],
    )]);
    let expect = "/t:2,3 -- /s:11,3\n";
    assert_eq!(run_stsc(&tgt, &src, 4), expect);
    assert_eq!(run_ilcs(&tgt, &src, 4), expect);
}
