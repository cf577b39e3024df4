use proptest::prelude::*;
use s3_image_optim::codec::CodecOptions;
use s3_image_optim::event::decode_key;
use s3_image_optim::formats::is_supported_key;
use s3_image_optim::utils::size_trimmed_percent;
use s3_image_optim::ImageKind;

proptest! {
    #[test]
    fn codec_quality_in_range(quality in 1u8..=100u8) {
        prop_assert!(CodecOptions::new(Some(quality), Some(quality), None).is_ok());
    }

    #[test]
    fn codec_options_validation(quality in 0u8..=255u8, level in 0u8..=20u8) {
        let result = CodecOptions::new(Some(quality), None, Some(level));
        prop_assert_eq!(result.is_ok(), (1..=100).contains(&quality) && level <= 7);
    }

    #[test]
    fn supported_extension_any_case(
        stem in "[a-z0-9/_ -]{1,20}",
        ext in prop::sample::select(vec!["jpg", "jpeg", "png", "gif", "svg", "webp"]),
        upper in any::<bool>()
    ) {
        let ext = if upper { ext.to_uppercase() } else { ext.to_string() };
        let key = format!("{}.{}", stem, ext);
        prop_assert!(is_supported_key(&key));
        prop_assert!(ImageKind::from_key(&key).is_some());
    }

    #[test]
    fn unsupported_extension_rejected(
        stem in "[a-z0-9_]{1,20}",
        ext in prop::sample::select(vec!["txt", "bmp", "tiff", "pdf", "json", "avif"])
    ) {
        let key = format!("{}.{}", stem, ext);
        prop_assert!(!is_supported_key(&key));
    }

    #[test]
    fn percent_has_one_decimal(size_init in 1u64..10_000_000u64, size_end in 0u64..10_000_000u64) {
        let percent = size_trimmed_percent(size_init, size_end);
        let tenths = percent * 10.0;
        prop_assert!((tenths - tenths.round()).abs() < 1e-3);
        prop_assert!(percent <= 100.0);
        if size_end <= size_init {
            prop_assert!(percent >= 0.0);
        } else {
            prop_assert!(percent <= 0.0);
        }
    }

    #[test]
    fn plain_keys_decode_to_themselves(key in "[a-zA-Z0-9/._-]{0,40}") {
        prop_assert_eq!(decode_key(&key), key);
    }

    #[test]
    fn encoded_spaces_decode(left in "[a-z]{1,10}", right in "[a-z]{1,10}") {
        let expected = format!("{} {}", left, right);
        prop_assert_eq!(decode_key(&format!("{}+{}", left, right)), expected.clone());
        prop_assert_eq!(decode_key(&format!("{}%20{}", left, right)), expected);
    }
}

#[test]
fn percent_of_empty_object_is_zero() {
    assert_eq!(size_trimmed_percent(0, 0), 0.0);
}
