//! `prople-pocket-core` holds the domain logic of the pocket: the CESR codec used
//! by credential proofs, the credential body, the proof attachment, the pocket
//! store contract and the wallet usecase that ties them together
pub mod cesr;
pub mod credential;
pub mod pocket;
pub mod proof;
pub mod wallet;
