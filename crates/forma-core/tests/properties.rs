//! Property tests for the validation policy and parser

#![allow(clippy::unwrap_used)]

use forma_core::prelude::*;
use forma_core::stl::{MIN_FILE_LEN, RECORD_LEN, encode_triangles};
use proptest::prelude::*;

fn buffer_with_count(count: u32, len: usize) -> Vec<u8> {
    let mut bytes = vec![0u8; len];
    bytes[80..84].copy_from_slice(&count.to_le_bytes());
    bytes
}

fn with_commas(n: u32) -> String {
    let digits = n.to_string();
    let mut groups: Vec<&str> = Vec::new();
    let mut end = digits.len();
    while end > 3 {
        groups.push(&digits[end - 3..end]);
        end -= 3;
    }
    groups.push(&digits[..end]);
    groups.reverse();
    groups.join(",")
}

fn coord() -> impl Strategy<Value = f32> {
    -1000.0f32..1000.0
}

fn triangle() -> impl Strategy<Value = [Vec3; 3]> {
    prop::array::uniform9(coord()).prop_map(|c| {
        [
            Vec3::new(c[0], c[1], c[2]),
            Vec3::new(c[3], c[4], c[5]),
            Vec3::new(c[6], c[7], c[8]),
        ]
    })
}

proptest! {
    #[test]
    fn short_buffers_are_too_small(bytes in prop::collection::vec(any::<u8>(), 0..84)) {
        prop_assert!(matches!(validate(&bytes), Err(Error::TooSmall { .. })), "expected TooSmall");
    }

    #[test]
    fn well_formed_lengths_validate(count in 0u32..500) {
        let len = MIN_FILE_LEN + count as usize * RECORD_LEN;
        let info = validate(&buffer_with_count(count, len)).unwrap();
        prop_assert_eq!(info.triangle_count, count);
    }

    #[test]
    fn counts_above_cap_are_rejected(count in 10_000_001u32..=u32::MAX, extra in 0usize..256) {
        let err = validate(&buffer_with_count(count, MIN_FILE_LEN + extra)).unwrap_err();
        let is_too_many = matches!(err, Error::TooManyTriangles { count: c, .. } if c == count);
        prop_assert!(is_too_many, "expected TooManyTriangles");
        prop_assert!(err.to_string().contains(&with_commas(count)));
    }

    #[test]
    fn lengths_off_by_more_than_one_mismatch(count in 2u32..200, delta in 2usize..100, grow in any::<bool>()) {
        let expected = MIN_FILE_LEN + count as usize * RECORD_LEN;
        let len = if grow { expected + delta } else { expected - delta };
        let is_mismatch = matches!(
            validate(&buffer_with_count(count, len)),
            Err(Error::SizeMismatch { .. })
        );
        prop_assert!(is_mismatch, "expected SizeMismatch");
    }

    #[test]
    fn parsed_triangles_match_input(tris in prop::collection::vec(triangle(), 1..40)) {
        let mesh = parse(&encode_triangles("prop", tris.clone())).unwrap();
        prop_assert_eq!(mesh.triangle_count(), tris.len());

        for (parsed, original) in mesh.triangles.iter().zip(&tris) {
            for (p, o) in parsed.vertices.iter().zip(original) {
                prop_assert!((mesh.original_position(*p) - *o).abs().max_element() < 1e-3);
            }
        }

        // Centred: bounds are symmetric about the origin
        let bounds = compute_bounding_box(&mesh).unwrap();
        prop_assert!((bounds.min + bounds.max).abs().max_element() < 1e-3);
    }

    #[test]
    fn parsing_twice_is_identical(tris in prop::collection::vec(triangle(), 0..20)) {
        let bytes = encode_triangles("prop", tris);
        prop_assert_eq!(parse(&bytes).unwrap(), parse(&bytes).unwrap());
    }
}
