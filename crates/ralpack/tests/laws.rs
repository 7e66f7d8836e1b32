//! Algebraic laws every codec must satisfy, checked over generated inputs.
//!
//! Set `RUST_LOG=ralpack=trace` to see registry and decode events.

use proptest::prelude::*;
use ralpack::ArrayCodec;
use ralpack::BoolCodec;
use ralpack::BytesCodec;
use ralpack::Codec;
use ralpack::Field;
use ralpack::IntCodec;
use ralpack::OptionCodec;
use ralpack::Registry;
use ralpack::Signedness;
use ralpack::TypeDescriptor;
use ralpack::Value;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Asserts that `decode(encode(v)) == (v, [])` and returns the encoding.
fn roundtrip<C>(codec: &C, value: &C::Value) -> Result<Vec<u8>, TestCaseError>
where
    C: Codec,
    C::Value: PartialEq + std::fmt::Debug,
{
    let bytes = codec.encode(value).map_err(|e| TestCaseError::fail(e.to_string()))?;
    let (decoded, rest) = codec.decode(&bytes).map_err(|e| TestCaseError::fail(e.to_string()))?;
    prop_assert_eq!(&decoded, value);
    prop_assert!(rest.is_empty());
    Ok(bytes)
}

/// Asserts that every strict prefix of `bytes` fails with an underflow-class error.
fn truncations_underflow<C: Codec>(codec: &C, bytes: &[u8]) -> Result<(), TestCaseError> {
    for cut in 0..bytes.len() {
        match codec.decode(&bytes[..cut]) {
            Err(e) => {
                prop_assert!(e.is_underflow(), "prefix {} gave {:?}", cut, e);
            }
            Ok(_) => {
                prop_assert!(false, "prefix {} of {:?} decoded", cut, bytes);
            }
        }
    }
    Ok(())
}

fn transfer_registry() -> Registry {
    let mut reg = Registry::new();
    reg.register_struct(
        "Transfer",
        vec![
            Field::new("to", TypeDescriptor::FixedBytes(4)),
            Field::new("amount", TypeDescriptor::Int { width: 8, signedness: Signedness::Unsigned }),
            Field::new("memo", TypeDescriptor::option(TypeDescriptor::int4())),
            Field::new("flags", TypeDescriptor::array(TypeDescriptor::Bool, 3)),
        ],
    )
    .expect("Transfer resolves");
    reg
}

fn transfer_value() -> impl Strategy<Value = Value> {
    (
        prop::collection::vec(any::<u8>(), 4),
        any::<u64>(),
        prop::option::of(any::<i32>()),
        prop::collection::vec(any::<bool>(), 3),
    )
        .prop_map(|(to, amount, memo, flags)| {
            Value::Struct(vec![
                to.into(),
                amount.into(),
                memo.into(),
                Value::Array(flags.into_iter().map(Value::from).collect()),
            ])
        })
}

proptest! {
    #[test]
    fn int4_roundtrips_in_four_bytes(v in any::<i32>()) {
        let bytes = roundtrip(&IntCodec::int4(), &(v as i128))?;
        prop_assert_eq!(bytes.len(), 4);
        prop_assert_eq!(bytes, v.to_be_bytes().to_vec());
    }

    #[test]
    fn int4_rejects_out_of_range(v in prop_oneof![
        (i32::MAX as i128 + 1)..=i64::MAX as i128,
        i64::MIN as i128..(i32::MIN as i128),
    ]) {
        let err = IntCodec::int4().encode(&v).unwrap_err();
        let is_range = matches!(err, ralpack::Error::Range { .. });
        prop_assert!(is_range);
    }

    #[test]
    fn unsigned_widths_roundtrip(width in 1usize..=8, seed in any::<u64>()) {
        let codec = IntCodec::new(width, Signedness::Unsigned).unwrap();
        let v = seed as i128 % (codec.max() + 1);
        let bytes = roundtrip(&codec, &v)?;
        prop_assert_eq!(bytes.len(), width);
    }

    #[test]
    fn option_discriminator_law(v in prop::option::of(any::<i32>())) {
        let inner = IntCodec::int4();
        let codec = OptionCodec::new(inner);
        let v = v.map(i128::from);
        let bytes = roundtrip(&codec, &v)?;
        match v {
            None => {
                prop_assert_eq!(bytes, vec![0x00]);
            }
            Some(x) => {
                let payload = inner.encode(&x).unwrap();
                prop_assert_eq!(bytes[0], 0x01);
                prop_assert_eq!(&bytes[1..], payload.as_slice());
            }
        }
        truncations_underflow(&codec, &codec.encode(&v).unwrap())?;
    }

    #[test]
    fn option_accepts_any_nonzero_tag(tag in 1u8..=255, b in any::<bool>()) {
        let codec = OptionCodec::new(BoolCodec);
        let decoded = codec.decode_exact(&[tag, b as u8]).unwrap();
        prop_assert_eq!(decoded, Some(b));
    }

    #[test]
    fn bool_accepts_any_nonzero_byte(byte in any::<u8>()) {
        prop_assert_eq!(BoolCodec.decode_exact(&[byte]).unwrap(), byte != 0);
    }

    #[test]
    fn struct_is_concatenation(a in any::<i32>(), b in prop::option::of(any::<bool>()), tail in any::<u8>()) {
        let c1 = IntCodec::int4();
        let c2 = OptionCodec::new(BoolCodec);
        let codec = (c1, c2);
        let value = (a as i128, b);

        let mut expected = c1.encode(&value.0).unwrap();
        expected.extend(c2.encode(&value.1).unwrap());
        let bytes = roundtrip(&codec, &value)?;
        prop_assert_eq!(&bytes, &expected);

        // consumes no extra bytes
        let mut padded = bytes.clone();
        padded.push(tail);
        let (_, rest) = codec.decode(&padded).unwrap();
        let expected_rest = [tail];
        prop_assert_eq!(rest, &expected_rest[..]);

        truncations_underflow(&codec, &bytes)?;
    }

    #[test]
    fn arrays_roundtrip_and_underflow(items in prop::collection::vec(prop::option::of(any::<u16>()), 0..8)) {
        let codec = ArrayCodec::new(OptionCodec::new(IntCodec::u16()), items.len());
        let items: Vec<_> = items.into_iter().map(|o| o.map(i128::from)).collect();
        let bytes = roundtrip(&codec, &items)?;
        truncations_underflow(&codec, &bytes)?;
    }

    #[test]
    fn fixed_bytes_pass_through(data in prop::collection::vec(any::<u8>(), 0..64)) {
        let codec = BytesCodec::fixed(data.len());
        let bytes = roundtrip(&codec, &data)?;
        prop_assert_eq!(&bytes, &data);
    }

    #[test]
    fn registry_codec_roundtrips(value in transfer_value()) {
        init_tracing();
        let reg = transfer_registry();
        let codec = reg.resolve_str("[Transfer;2]").unwrap();
        let value = Value::Array(vec![value.clone(), value]);
        let bytes = roundtrip(&codec, &value)?;
        truncations_underflow(&codec, &bytes)?;
    }
}
