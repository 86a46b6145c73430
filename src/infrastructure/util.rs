use crate::application::ports::util::CodeGenerator;
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::{RngCore, rngs::OsRng};

/// Bytes of entropy per authorization code.
pub const CODE_ENTROPY_BYTES: usize = 32;

/// 32 bytes from the OS CSPRNG, unpadded base64url (43 characters).
#[derive(Debug, Default, Clone, Copy)]
pub struct OsRngCodeGenerator;

impl CodeGenerator for OsRngCodeGenerator {
    fn generate(&self) -> String {
        let mut bytes = [0u8; CODE_ENTROPY_BYTES];
        OsRng.fill_bytes(&mut bytes);
        URL_SAFE_NO_PAD.encode(bytes)
    }
}
