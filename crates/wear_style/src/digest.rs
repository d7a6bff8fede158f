//! Schema digest hashing
//!
//! The digest is a SHA-256 over a canonical, length-prefixed encoding of the
//! schema. Affected layers are sorted before encoding so their declaration
//! order does not matter. Icons are not encoded.

use std::fmt;

use sha2::{Digest, Sha256};

use crate::layer::canonical_layers;
use crate::setting::UserStyleSetting;

const DIGEST_DOMAIN: &[u8] = b"wear.user_style_schema.v1";

/// Fingerprint of a [`UserStyleSchema`](crate::UserStyleSchema)
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct DigestHash([u8; 32]);

impl DigestHash {
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for DigestHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for DigestHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DigestHash({})", self.to_hex())
    }
}

/// Length-prefixed writer so adjacent fields cannot run into each other
struct CanonicalEncoder {
    hasher: Sha256,
}

impl CanonicalEncoder {
    fn new() -> Self {
        let mut hasher = Sha256::new();
        hasher.update(DIGEST_DOMAIN);
        Self { hasher }
    }

    fn u8(&mut self, value: u8) {
        self.hasher.update([value]);
    }

    fn len(&mut self, len: usize) {
        self.hasher.update((len as u64).to_be_bytes());
    }

    fn bytes(&mut self, bytes: &[u8]) {
        self.len(bytes.len());
        self.hasher.update(bytes);
    }

    fn str(&mut self, s: &str) {
        self.bytes(s.as_bytes());
    }

    fn optional_str(&mut self, s: Option<&str>) {
        match s {
            Some(s) => {
                self.u8(1);
                self.str(s);
            }
            None => self.u8(0),
        }
    }

    fn finish(self) -> DigestHash {
        DigestHash(self.hasher.finalize().into())
    }
}

pub(crate) fn digest_settings<'a>(
    settings: impl ExactSizeIterator<Item = &'a UserStyleSetting>,
) -> DigestHash {
    let mut enc = CanonicalEncoder::new();
    enc.len(settings.len());
    for setting in settings {
        enc.u8(setting.kind().tag());
        enc.str(setting.id().as_str());
        enc.str(setting.display_name());
        enc.str(setting.description());

        let layers = canonical_layers(setting.affected_layers());
        enc.len(layers.len());
        for layer in layers {
            enc.u8(layer.tag());
        }

        enc.len(setting.default_option_index());
        enc.len(setting.options().len());
        for option in setting.options() {
            enc.bytes(option.id().as_bytes());
            enc.optional_str(option.display_name());
            let children = option.child_settings();
            enc.len(children.len());
            for child in children {
                enc.str(child.as_str());
            }
        }
    }
    enc.finish()
}
