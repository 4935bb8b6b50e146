//! Security primitives backing core seams

mod bcrypt_hasher;

pub use bcrypt_hasher::BcryptCredentialHasher;
