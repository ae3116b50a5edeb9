// SPDX-License-Identifier: CC0-1.0

//! Internal macros.
//!
//! Macros meant to be used inside the library only.

/// Implements `Encodable` and `Decodable` for a struct by encoding/decoding
/// each field in order.
macro_rules! impl_consensus_encoding {
    ($thing:ident, $($field:ident),+) => (
        impl crate::consensus::Encodable for $thing {
            #[inline]
            fn consensus_encode<W: std::io::Write + ?Sized>(
                &self,
                w: &mut W,
            ) -> Result<usize, std::io::Error> {
                let mut len = 0;
                $(len += self.$field.consensus_encode(w)?;)+
                Ok(len)
            }
        }

        impl crate::consensus::Decodable for $thing {
            #[inline]
            fn consensus_decode_from_finite_reader<R: std::io::Read + ?Sized>(
                r: &mut R,
            ) -> Result<$thing, crate::consensus::encode::Error> {
                Ok($thing {
                    $($field: crate::consensus::Decodable::consensus_decode_from_finite_reader(r)?,)+
                })
            }
        }
    );
}

/// Formats an error with its source the way `anyhow` style chains read,
/// without requiring `std::error::Error` in the `Display` path.
macro_rules! write_err {
    ($writer:expr, $string:literal $(, $args:expr)*; $source:expr) => {
        {
            let _ = &$source;   // Prevent clippy warnings.
            write!($writer, concat!($string, ": {}") $(, $args)*, $source)
        }
    }
}

/// Implements serde (de)serialization through `Display` and `FromStr`.
///
/// The type must implement both traits; the string form is what appears in
/// JSON documents.
#[cfg(feature = "serde")]
macro_rules! serde_string_impl {
    ($name:ident, $expecting:literal) => {
        impl<'de> $crate::serde::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<$name, D::Error>
            where
                D: $crate::serde::de::Deserializer<'de>,
            {
                struct Visitor;
                impl<'de> $crate::serde::de::Visitor<'de> for Visitor {
                    type Value = $name;

                    fn expecting(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
                        f.write_str($expecting)
                    }

                    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
                    where
                        E: $crate::serde::de::Error,
                    {
                        v.parse::<$name>().map_err($crate::serde::de::Error::custom)
                    }
                }

                deserializer.deserialize_str(Visitor)
            }
        }

        impl $crate::serde::Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: $crate::serde::Serializer,
            {
                serializer.collect_str(&self)
            }
        }
    };
}
