//! Domain factories for creating domain entities and value objects.

use super::RoomId;

/// Length of generated room identifiers
pub const ROOM_ID_LENGTH: usize = 8;

const ALPHABET: &[u8; 62] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Factory for generating RoomId instances.
///
/// Uniqueness among live rooms is enforced by the repository, which
/// regenerates on collision.
pub struct RoomIdFactory;

impl RoomIdFactory {
    /// Generate a random 8-character alphanumeric RoomId.
    ///
    /// Each character is drawn from two random bytes of a UUID v4 so the
    /// modulo bias stays negligible.
    pub fn generate() -> RoomId {
        let bytes = uuid::Uuid::new_v4().into_bytes();
        let id: String = bytes
            .chunks_exact(2)
            .take(ROOM_ID_LENGTH)
            .map(|pair| {
                let n = u16::from_be_bytes([pair[0], pair[1]]) as usize;
                ALPHABET[n % ALPHABET.len()] as char
            })
            .collect();
        RoomId::from_generated(id)
    }
}
