//! Armor format: hex bodies wrapped in BEGIN/END marker lines.
//!
//! Proof messages carry the raw hex body only (the signature block of the
//! transcript); the caller wraps it with the headers before verification.
//! Key documents are exported fully armored.

use crate::error::CryptoError;

/// Armor label for a signed proof envelope.
pub const SIGNED_MESSAGE: &str = "LINKPROOF SIGNED MESSAGE";

/// Armor label for an exported public key.
pub const PUBLIC_KEY: &str = "LINKPROOF PUBLIC KEY";

/// Width at which armored hex bodies are line-wrapped.
const WRAP_WIDTH: usize = 64;

fn header(label: &str) -> String {
    format!("-----BEGIN {label}-----")
}

fn footer(label: &str) -> String {
    format!("-----END {label}-----")
}

/// Armor raw bytes under the given label.
pub fn armor(label: &str, bytes: &[u8]) -> String {
    let body = hex::encode(bytes);
    let mut out = String::with_capacity(body.len() + 80);
    out.push_str(&header(label));
    out.push_str("\n\n");
    for chunk in body.as_bytes().chunks(WRAP_WIDTH) {
        // chunks of an ASCII hex string are always valid UTF-8
        out.push_str(std::str::from_utf8(chunk).unwrap_or_default());
        out.push('\n');
    }
    out.push_str(&footer(label));
    out
}

/// Wrap a bare hex signature body with the signed-message armor.
///
/// This is the caller-side half of the transcript contract: messages carry
/// the body alone, verification wants the full envelope.
pub fn wrap_signature_body(body: &str) -> String {
    format!(
        "{}\n\n{}\n{}",
        header(SIGNED_MESSAGE),
        body.trim(),
        footer(SIGNED_MESSAGE)
    )
}

/// Strip the armor for `label` and decode the hex body.
pub fn dearmor(label: &str, text: &str) -> Result<Vec<u8>, CryptoError> {
    let header = header(label);
    let footer = footer(label);
    let mut in_body = false;
    let mut body = String::new();
    let mut closed = false;

    for line in text.lines() {
        let line = line.trim();
        if line == header {
            in_body = true;
            continue;
        }
        if line == footer {
            closed = true;
            break;
        }
        if in_body && !line.is_empty() {
            body.push_str(line);
        }
    }

    if !in_body {
        return Err(CryptoError::MalformedArmor(format!("missing {header}")));
    }
    if !closed {
        return Err(CryptoError::MalformedArmor(format!("missing {footer}")));
    }
    if body.is_empty() {
        return Err(CryptoError::MalformedArmor("empty armor body".into()));
    }

    hex::decode(&body).map_err(|e| CryptoError::MalformedArmor(format!("hex decode: {e}")))
}
