pub mod appointment;
pub mod clinic;
pub mod doctor;
pub mod enums;

pub use appointment::*;
pub use clinic::*;
pub use doctor::*;
pub use enums::*;

use rand::Rng;

const ID_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const ID_LENGTH: usize = 9;

/// Random record identifier: 9 lowercase base-36 characters.
pub fn new_record_id() -> String {
    let mut rng = rand::thread_rng();
    (0..ID_LENGTH)
        .map(|_| ID_ALPHABET[rng.gen_range(0..ID_ALPHABET.len())] as char)
        .collect()
}
