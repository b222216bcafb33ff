use sha2::{Digest, Sha256};
use ulid::Ulid;

pub fn run_id_ulid() -> String {
    format!("r_{}", Ulid::new())
}

pub fn call_id(run_id: &str, section_number: u8) -> String {
    format!("{}_s{:02}", run_id, section_number)
}

pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut h = Sha256::new();
    h.update(bytes);
    hex::encode(h.finalize())
}
