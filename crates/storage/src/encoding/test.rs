use proptest::prelude::*;

use super::{DecodeError, decode, encode};

#[test]
fn encoded_form_avoids_forbidden_key_characters() {
    let encoded = encode("a/b\\c#d?e\u{0}\u{7f}/??//");

    assert!(
        !encoded.contains(['/', '\\', '#', '?']),
        "`{encoded}` contains a forbidden character"
    );
    assert!(encoded.chars().all(|c| !c.is_control()));
}

#[test]
fn empty_string_round_trips() {
    assert_eq!(encode(""), "");
    assert_eq!(decode("").unwrap(), "");
}

#[test]
fn known_value() {
    assert_eq!(encode("alice"), "YWxpY2U=");
    assert_eq!(decode("YWxpY2U=").unwrap(), "alice");
}

#[test]
fn rejects_foreign_input() {
    assert!(matches!(decode("not base64!"), Err(DecodeError::Base64(_))));

    // 0xff 0xfe is valid base64 but not UTF-8
    assert!(matches!(decode("__4="), Err(DecodeError::Utf8(_))));
}

proptest! {
    #[test]
    fn decode_inverts_encode(plain in any::<String>()) {
        prop_assert_eq!(decode(&encode(&plain)).unwrap(), plain);
    }

    #[test]
    fn encode_is_injective(a in any::<String>(), b in any::<String>()) {
        prop_assume!(a != b);
        prop_assert_ne!(encode(&a), encode(&b));
    }
}
