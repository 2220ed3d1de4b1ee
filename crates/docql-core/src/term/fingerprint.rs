//! Deterministic term fingerprinting over a canonical tagged encoding.
#![allow(clippy::cast_possible_truncation)]

use crate::term::{Datum, Term};
use sha2::{Digest, Sha256};
use std::fmt;

///
/// TermFingerprint
///
/// Stable, deterministic fingerprint for generated terms.
///

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct TermFingerprint([u8; 32]);

impl TermFingerprint {
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    #[must_use]
    pub fn as_hex(&self) -> String {
        let mut out = String::with_capacity(64);
        for byte in self.0 {
            use std::fmt::Write as _;
            let _ = write!(out, "{byte:02x}");
        }
        out
    }
}

impl fmt::Display for TermFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_hex())
    }
}

impl Term {
    /// Compute a stable fingerprint for this term.
    #[must_use]
    pub fn fingerprint(&self) -> TermFingerprint {
        let mut hasher = Sha256::new();
        hasher.update(b"termfp:v1");
        hash_term(&mut hasher, self);
        let digest = hasher.finalize();
        let mut out = [0u8; 32];
        out.copy_from_slice(&digest);
        TermFingerprint(out)
    }
}

fn hash_term(hasher: &mut Sha256, term: &Term) {
    match term {
        Term::Datum(datum) => {
            write_tag(hasher, 0x01);
            hash_datum(hasher, datum);
        }
        Term::Apply {
            kind,
            args,
            optargs,
        } => {
            write_tag(hasher, 0x02);
            hasher.update(kind.tag().to_be_bytes());
            write_u32(hasher, args.len() as u32);
            for arg in args {
                hash_term(hasher, arg);
            }
            // BTreeMap iteration is already name-ordered.
            write_u32(hasher, optargs.len() as u32);
            for (name, value) in optargs {
                write_str(hasher, name);
                hash_term(hasher, value);
            }
        }
    }
}

fn hash_datum(hasher: &mut Sha256, datum: &Datum) {
    match datum {
        Datum::Null => write_tag(hasher, 0x10),
        Datum::Bool(v) => {
            write_tag(hasher, 0x11);
            hasher.update([u8::from(*v)]);
        }
        Datum::Number(v) => {
            write_tag(hasher, 0x12);
            hasher.update(v.to_bits().to_be_bytes());
        }
        Datum::String(v) => {
            write_tag(hasher, 0x13);
            write_str(hasher, v);
        }
        Datum::Array(items) => {
            write_tag(hasher, 0x14);
            write_u32(hasher, items.len() as u32);
            for item in items {
                hash_datum(hasher, item);
            }
        }
        Datum::Object(entries) => {
            write_tag(hasher, 0x15);
            write_u32(hasher, entries.len() as u32);
            for (key, value) in entries {
                write_str(hasher, key);
                hash_datum(hasher, value);
            }
        }
    }
}

fn write_str(hasher: &mut Sha256, value: &str) {
    write_u32(hasher, value.len() as u32);
    hasher.update(value.as_bytes());
}

fn write_u32(hasher: &mut Sha256, value: u32) {
    hasher.update(value.to_be_bytes());
}

fn write_tag(hasher: &mut Sha256, tag: u8) {
    hasher.update([tag]);
}
