// SPDX-License-Identifier: CC0-1.0

//! Hash types used throughout the library.
//!
//! These newtypes exist to avoid mixing data of the same hash format (like
//! SHA256d) but of different meaning (transaction id, signature hash etc.).

use std::io;

use crate::consensus::encode::{self, Decodable, Encodable};
use crate::hashes::{hash160, sha256d, Hash};

macro_rules! impl_hashencode {
    ($hashtype:ident) => {
        impl Encodable for $hashtype {
            fn consensus_encode<W: io::Write + ?Sized>(
                &self,
                w: &mut W,
            ) -> Result<usize, io::Error> {
                self.0.consensus_encode(w)
            }
        }

        impl Decodable for $hashtype {
            fn consensus_decode<R: io::Read + ?Sized>(
                r: &mut R,
            ) -> Result<Self, encode::Error> {
                let inner = <<$hashtype as Hash>::Inner>::consensus_decode(r)?;
                Ok(Self::from_slice(&inner).expect("length checked by decoder"))
            }
        }
    };
}

hash_newtype!(Txid, sha256d::Hash, 32, doc = "A bitcoin transaction hash/transaction ID.");
hash_newtype!(Sighash, sha256d::Hash, 32, doc = "Hash of a transaction according to the legacy signature hash algorithm.");
hash_newtype!(PubkeyHash, hash160::Hash, 20, doc = "A hash of a public key.");

impl_hashencode!(Txid);
